//! Notes and the notebook.

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::date_range::now;
use crate::error::{DaybookError, DaybookResult};
use crate::keyword::keyword_enum;
use crate::store::{Collection, Record, Store, StoreKey};

/// Characters of content shown in a list preview.
pub const PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteCategory {
    #[default]
    Personal,
    Work,
    Study,
    Ideas,
    Projects,
}

keyword_enum!(NoteCategory, "note category", {
    Personal => "personal",
    Work => "work",
    Study => "study",
    Ideas => "ideas",
    Projects => "projects",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: NoteCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Note {
    /// Last modification, falling back to creation.
    pub fn touched_at(&self) -> NaiveDateTime {
        self.updated_at.unwrap_or(self.created_at)
    }

    /// The first 150 characters of the content, with "..." when cut.
    pub fn preview(&self) -> String {
        preview(&self.content, PREVIEW_CHARS)
    }
}

impl Record for Note {
    const KEY: StoreKey = StoreKey::Notes;
    const KIND: &'static str = "note";

    fn id(&self) -> Uuid {
        self.id
    }
}

pub fn preview(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSort {
    #[default]
    Newest,
    Oldest,
    Title,
}

keyword_enum!(NoteSort, "note sort", {
    Newest => "newest",
    Oldest => "oldest",
    Title => "title",
});

#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    /// Case-insensitive substring of the title or the content.
    pub search: Option<String>,
    pub category: Option<NoteCategory>,
    pub sort: NoteSort,
}

impl NoteFilter {
    pub fn matches(&self, note: &Note) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|q| {
            let q = q.to_lowercase();
            note.title.to_lowercase().contains(&q) || note.content.to_lowercase().contains(&q)
        });

        search_ok && self.category.is_none_or(|c| note.category == c)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub category: NoteCategory,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<NoteCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoteStats {
    pub total: usize,
    pub categories: usize,
    pub tags: usize,
    pub this_month: usize,
}

pub struct Notebook {
    store: Store,
    notes: Collection<Note>,
}

impl Notebook {
    pub fn load(store: &Store) -> DaybookResult<Self> {
        Ok(Notebook {
            store: store.clone(),
            notes: Collection::load(store)?,
        })
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.items()
    }

    pub fn get(&self, id: Uuid) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn resolve(&self, prefix: &str) -> DaybookResult<Uuid> {
        self.notes.resolve(prefix)
    }

    pub fn create(&mut self, draft: NoteDraft) -> DaybookResult<&Note> {
        let title = required_title(&draft.title)?;

        let mut tags = Vec::new();
        for tag in draft.tags {
            push_tag(&mut tags, &tag);
        }

        let note = Note {
            id: Uuid::new_v4(),
            title,
            content: draft.content.trim().to_string(),
            category: draft.category,
            tags,
            created_at: now(),
            updated_at: None,
        };
        debug!(id = %note.id, "creating note");

        self.notes.push(note);
        self.notes.save(&self.store)?;
        Ok(&self.notes.items()[self.notes.len() - 1])
    }

    pub fn update(&mut self, id: Uuid, patch: NotePatch) -> DaybookResult<&Note> {
        let title = patch.title.as_deref().map(required_title).transpose()?;

        self.modify(id, |note| {
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(content) = patch.content {
                note.content = content.trim().to_string();
            }
            if let Some(category) = patch.category {
                note.category = category;
            }
            true
        })
    }

    pub fn delete(&mut self, id: Uuid) -> DaybookResult<Note> {
        let removed = self.notes.remove(id).ok_or_else(|| not_found(id))?;
        self.notes.save(&self.store)?;
        Ok(removed)
    }

    /// Add a tag. Blank and duplicate tags are ignored.
    pub fn add_tag(&mut self, id: Uuid, tag: &str) -> DaybookResult<&Note> {
        self.modify(id, |note| push_tag(&mut note.tags, tag))
    }

    pub fn remove_tag(&mut self, id: Uuid, tag: &str) -> DaybookResult<&Note> {
        let tag = tag.trim();
        self.modify(id, |note| {
            let before = note.tags.len();
            note.tags.retain(|t| t != tag);
            note.tags.len() != before
        })
    }

    /// Matching notes in the filter's sort order.
    pub fn filtered(&self, filter: &NoteFilter) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.iter().filter(|n| filter.matches(n)).collect();

        match filter.sort {
            NoteSort::Newest => notes.sort_by_key(|n| Reverse(n.touched_at())),
            NoteSort::Oldest => notes.sort_by_key(|n| n.touched_at()),
            NoteSort::Title => notes.sort_by_cached_key(|n| n.title.to_lowercase()),
        }

        notes
    }

    pub fn stats(&self, today: NaiveDate) -> NoteStats {
        let categories: HashSet<NoteCategory> = self.notes.iter().map(|n| n.category).collect();
        let tags: HashSet<&str> = self
            .notes
            .iter()
            .flat_map(|n| n.tags.iter().map(String::as_str))
            .collect();
        let this_month = self
            .notes
            .iter()
            .filter(|n| {
                n.created_at.year() == today.year() && n.created_at.month() == today.month()
            })
            .count();

        NoteStats {
            total: self.notes.len(),
            categories: categories.len(),
            tags: tags.len(),
            this_month,
        }
    }

    /// Apply `change`; when it reports a modification, stamp and save.
    fn modify(&mut self, id: Uuid, change: impl FnOnce(&mut Note) -> bool) -> DaybookResult<&Note> {
        let note = self.notes.get_mut(id).ok_or_else(|| not_found(id))?;
        if change(note) {
            note.updated_at = Some(now());
            self.notes.save(&self.store)?;
        }
        self.notes.get(id).ok_or_else(|| not_found(id))
    }
}

fn required_title(title: &str) -> DaybookResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DaybookError::validation("Title is required"));
    }
    Ok(title.to_string())
}

fn push_tag(tags: &mut Vec<String>, tag: &str) -> bool {
    let tag = tag.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_string());
    true
}

fn not_found(id: Uuid) -> DaybookError {
    DaybookError::NotFound {
        kind: Note::KIND,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notebook() -> (tempfile::TempDir, Notebook) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let notebook = Notebook::load(&store).unwrap();
        (dir, notebook)
    }

    fn draft(title: &str, content: &str) -> NoteDraft {
        NoteDraft {
            title: title.to_string(),
            content: content.to_string(),
            ..NoteDraft::default()
        }
    }

    #[test]
    fn create_trims_and_requires_title() {
        let (_dir, mut book) = notebook();
        assert!(book.create(draft(" ", "body")).is_err());

        let note = book
            .create(NoteDraft {
                tags: vec!["rust".into(), " rust ".into(), "".into()],
                ..draft(" Ideas ", "  body  ")
            })
            .unwrap();
        assert_eq!(note.title, "Ideas");
        assert_eq!(note.content, "body");
        assert_eq!(note.tags, ["rust"]);
        assert!(note.updated_at.is_none());
    }

    #[test]
    fn update_stamps_updated_at() {
        let (_dir, mut book) = notebook();
        let id = book.create(draft("Draft", "")).unwrap().id;

        let note = book
            .update(
                id,
                NotePatch {
                    content: Some("written".into()),
                    category: Some(NoteCategory::Ideas),
                    ..NotePatch::default()
                },
            )
            .unwrap();
        assert_eq!(note.content, "written");
        assert_eq!(note.category, NoteCategory::Ideas);
        assert!(note.updated_at.is_some());
    }

    #[test]
    fn tags_are_unique_and_removable() {
        let (_dir, mut book) = notebook();
        let id = book.create(draft("Tagged", "")).unwrap().id;

        book.add_tag(id, "school").unwrap();
        book.add_tag(id, " school").unwrap();
        book.add_tag(id, "exam").unwrap();
        assert_eq!(book.get(id).unwrap().tags, ["school", "exam"]);

        book.remove_tag(id, "school").unwrap();
        assert_eq!(book.get(id).unwrap().tags, ["exam"]);
    }

    #[test]
    fn search_covers_title_and_content() {
        let (_dir, mut book) = notebook();
        book.create(draft("Groceries", "milk, eggs")).unwrap();
        book.create(draft("Reading list", "Dune")).unwrap();

        let by_content = NoteFilter {
            search: Some("EGGS".into()),
            ..NoteFilter::default()
        };
        assert_eq!(book.filtered(&by_content)[0].title, "Groceries");

        let by_title = NoteFilter {
            search: Some("reading".into()),
            sort: NoteSort::Title,
            ..NoteFilter::default()
        };
        assert_eq!(book.filtered(&by_title).len(), 1);
    }

    #[test]
    fn sort_orders() {
        let (_dir, mut book) = notebook();
        let b = book.create(draft("b", "")).unwrap().id;
        book.create(draft("A", "")).unwrap();
        book.create(draft("c", "")).unwrap();

        // Touching "b" makes it the most recent.
        book.update(
            b,
            NotePatch {
                content: Some("edited".into()),
                ..NotePatch::default()
            },
        )
        .unwrap();

        let titles = |sort| -> Vec<String> {
            let filter = NoteFilter {
                sort,
                ..NoteFilter::default()
            };
            book.filtered(&filter).iter().map(|n| n.title.clone()).collect()
        };

        assert_eq!(titles(NoteSort::Title), ["A", "b", "c"]);
        assert_eq!(titles(NoteSort::Newest)[0], "b");
        assert_eq!(titles(NoteSort::Oldest)[2], "b");
    }

    #[test]
    fn preview_cuts_at_150_chars() {
        let short = "é".repeat(150);
        assert_eq!(preview(&short, PREVIEW_CHARS), short);

        let long = "é".repeat(151);
        let cut = preview(&long, PREVIEW_CHARS);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 153);
    }

    #[test]
    fn stats_count_distinct_values() {
        let (_dir, mut book) = notebook();
        let today = now().date();
        book.create(NoteDraft {
            tags: vec!["a".into(), "b".into()],
            ..draft("one", "")
        })
        .unwrap();
        book.create(NoteDraft {
            category: NoteCategory::Work,
            tags: vec!["b".into()],
            ..draft("two", "")
        })
        .unwrap();

        assert_eq!(
            book.stats(today),
            NoteStats {
                total: 2,
                categories: 2,
                tags: 2,
                this_month: 2,
            }
        );
    }
}
