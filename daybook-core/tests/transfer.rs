//! Export, import and backup across separate data directories.

use std::collections::HashSet;

use chrono::NaiveDate;
use daybook_core::event::{Calendar, EventDraft};
use daybook_core::goal::{GoalBook, GoalDraft, GoalKind, NumericTarget};
use daybook_core::note::{NoteDraft, Notebook};
use daybook_core::profile::Profile;
use daybook_core::store::{ImportSummary, Store};
use daybook_core::task::{TaskDraft, TaskList};
use daybook_core::transfer::{Backup, CollectionKind};
use uuid::Uuid;

fn open() -> (tempfile::TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::open(dir.path()).unwrap();
    (dir, store)
}

fn fill(store: &Store) {
    let mut tasks = TaskList::load(store).unwrap();
    tasks.add(TaskDraft::new("Revise chapter 3")).unwrap();
    tasks.add(TaskDraft::new("Buy notebook")).unwrap();

    let mut notes = Notebook::load(store).unwrap();
    notes
        .create(NoteDraft {
            title: "Lecture".into(),
            content: "Ownership and borrowing".into(),
            ..NoteDraft::default()
        })
        .unwrap();

    let mut goals = GoalBook::load(store).unwrap();
    goals
        .add(GoalDraft::new(
            "Read 12 books",
            GoalKind::Numeric(NumericTarget {
                target: 12,
                current: 3,
                unit: "books".into(),
            }),
        ))
        .unwrap();

    let day = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let mut calendar = Calendar::load(store).unwrap();
    calendar.create(EventDraft::for_date("Study group", day)).unwrap();
    calendar.create(EventDraft::all_day("Exam week", day, 5)).unwrap();

    let mut profile = Profile::load(store).unwrap();
    profile.add_interest("rust").unwrap();
}

fn ids(store: &Store) -> HashSet<Uuid> {
    Calendar::load(store).unwrap().events().iter().map(|e| e.id).collect()
}

#[test]
fn every_collection_round_trips_into_an_empty_store() {
    let (_a, source) = open();
    let (_b, target) = open();
    fill(&source);

    for kind in CollectionKind::ALL {
        let json = kind.export(&source).unwrap();
        let summary = kind.import(&target, &json).unwrap();
        assert_eq!(summary.replaced, 0, "{kind}");
        assert_eq!(kind.export(&target).unwrap(), json, "{kind}");
    }

    assert_eq!(ids(&source), ids(&target));
}

#[test]
fn repeated_import_does_not_duplicate() {
    let (_a, source) = open();
    let (_b, target) = open();
    fill(&source);

    let json = CollectionKind::Events.export(&source).unwrap();
    for _ in 0..3 {
        CollectionKind::Events.import(&target, &json).unwrap();
    }

    assert_eq!(Calendar::load(&target).unwrap().events().len(), 2);
    assert_eq!(
        CollectionKind::Events.import(&target, &json).unwrap(),
        ImportSummary {
            added: 0,
            replaced: 2
        }
    );
}

#[test]
fn import_merges_with_existing_records() {
    let (_a, source) = open();
    let (_b, target) = open();
    fill(&source);

    let mut local = TaskList::load(&target).unwrap();
    local.add(TaskDraft::new("Local only")).unwrap();

    let json = CollectionKind::Tasks.export(&source).unwrap();
    let summary = CollectionKind::Tasks.import(&target, &json).unwrap();

    assert_eq!(summary.added, 2);
    let titles: Vec<_> = TaskList::load(&target)
        .unwrap()
        .tasks()
        .iter()
        .map(|t| t.title.clone())
        .collect();
    assert_eq!(titles, ["Local only", "Revise chapter 3", "Buy notebook"]);
}

#[test]
fn backup_then_restore_reproduces_the_store() {
    let (_a, source) = open();
    let (_b, target) = open();
    fill(&source);

    let json = Backup::collect(&source).unwrap().to_json().unwrap();
    let restored = Backup::from_json(&json).unwrap().restore(&target).unwrap();
    assert_eq!(restored.len(), 5);

    for kind in CollectionKind::ALL {
        assert_eq!(kind.export(&target).unwrap(), kind.export(&source).unwrap());
    }
    assert_eq!(
        Profile::load(&target).unwrap().user(),
        Profile::load(&source).unwrap().user()
    );
}
