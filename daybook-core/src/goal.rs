//! Goals: one-off, numeric targets and habits.

use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::date_range::now;
use crate::error::{DaybookError, DaybookResult};
use crate::event::non_empty;
use crate::keyword::keyword_enum;
use crate::store::{Collection, Record, Store, StoreKey};
use crate::task::Priority;

/// A habit streak of this many days counts as 100%.
pub const HABIT_STREAK_TARGET: u32 = 30;

/// Months covered by [`GoalBook::monthly_completions`].
pub const MONTHLY_HISTORY: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    #[default]
    Personal,
    Career,
    Education,
    Health,
    Financial,
    Relationships,
    Hobbies,
}

keyword_enum!(GoalCategory, "goal category", {
    Personal => "personal",
    Career => "career",
    Education => "education",
    Health => "health",
    Financial => "financial",
    Relationships => "relationships",
    Hobbies => "hobbies",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

keyword_enum!(Frequency, "frequency", {
    Daily => "daily",
    Weekly => "weekly",
    Monthly => "monthly",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericTarget {
    pub target: u32,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Habit {
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(default)]
    pub streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<NaiveDate>,
}

impl Habit {
    /// Record a completion on `today`: once per day, extending the streak
    /// only when the previous completion was yesterday.
    pub fn complete_on(&mut self, today: NaiveDate) {
        match self.last_completed {
            Some(last) if last == today => return,
            Some(last) if last.succ_opt() == Some(today) => self.streak += 1,
            _ => self.streak = 1,
        }
        self.last_completed = Some(today);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GoalKind {
    #[default]
    Binary,
    Numeric(NumericTarget),
    Habit(Habit),
}

impl GoalKind {
    pub fn goal_type(&self) -> GoalType {
        match self {
            GoalKind::Binary => GoalType::Binary,
            GoalKind::Numeric(_) => GoalType::Numeric,
            GoalKind::Habit(_) => GoalType::Habit,
        }
    }
}

/// The kind of a goal without its data, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalType {
    Binary,
    Numeric,
    Habit,
}

keyword_enum!(GoalType, "goal type", {
    Binary => "binary",
    Numeric => "numeric",
    Habit => "habit",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub kind: GoalKind,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

impl Goal {
    /// Completion in percent, 0.0 to 100.0.
    pub fn progress(&self) -> f64 {
        if self.completed {
            return 100.0;
        }
        match &self.kind {
            GoalKind::Numeric(n) if n.target > 0 => f64::from(n.current) / f64::from(n.target) * 100.0,
            GoalKind::Habit(h) => {
                (f64::from(h.streak) / f64::from(HABIT_STREAK_TARGET) * 100.0).min(100.0)
            }
            _ => 0.0,
        }
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.target_date.is_some_and(|d| d < today)
    }

    fn mark_completed(&mut self, at: NaiveDateTime) {
        self.completed = true;
        self.completed_at = Some(at);
        if let GoalKind::Habit(habit) = &mut self.kind {
            habit.complete_on(at.date());
        }
    }
}

impl Record for Goal {
    const KEY: StoreKey = StoreKey::Goals;
    const KIND: &'static str = "goal";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub title: String,
    pub description: Option<String>,
    pub category: GoalCategory,
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub kind: GoalKind,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>, kind: GoalKind) -> Self {
        GoalDraft {
            title: title.into(),
            kind,
            ..GoalDraft::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<GoalCategory>,
    pub priority: Option<Priority>,
    pub start_date: Option<Option<NaiveDate>>,
    pub target_date: Option<Option<NaiveDate>>,
    pub kind: Option<GoalKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalStatus {
    #[default]
    All,
    Active,
    Completed,
    Overdue,
}

impl FromStr for GoalStatus {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(GoalStatus::All),
            "active" => Ok(GoalStatus::Active),
            "completed" | "done" => Ok(GoalStatus::Completed),
            "overdue" => Ok(GoalStatus::Overdue),
            other => Err(DaybookError::validation(format!(
                "Unknown goal status '{}'. Expected all, active, completed or overdue",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoalFilter {
    pub status: GoalStatus,
    pub category: Option<GoalCategory>,
    pub goal_type: Option<GoalType>,
    pub search: Option<String>,
}

impl GoalFilter {
    pub fn matches(&self, goal: &Goal, today: NaiveDate) -> bool {
        let status_ok = match self.status {
            GoalStatus::All => true,
            GoalStatus::Active => !goal.completed,
            GoalStatus::Completed => goal.completed,
            GoalStatus::Overdue => goal.is_overdue(today),
        };

        status_ok
            && self.category.is_none_or(|c| goal.category == c)
            && self.goal_type.is_none_or(|t| goal.kind.goal_type() == t)
            && self
                .search
                .as_deref()
                .is_none_or(|q| goal.title.to_lowercase().contains(&q.to_lowercase()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GoalStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    /// Completed share of all goals, rounded percent.
    pub success_rate: u32,
}

pub struct GoalBook {
    store: Store,
    goals: Collection<Goal>,
}

impl GoalBook {
    pub fn load(store: &Store) -> DaybookResult<Self> {
        Ok(GoalBook {
            store: store.clone(),
            goals: Collection::load(store)?,
        })
    }

    pub fn goals(&self) -> &[Goal] {
        self.goals.items()
    }

    pub fn get(&self, id: Uuid) -> Option<&Goal> {
        self.goals.get(id)
    }

    pub fn resolve(&self, prefix: &str) -> DaybookResult<Uuid> {
        self.goals.resolve(prefix)
    }

    pub fn add(&mut self, draft: GoalDraft) -> DaybookResult<&Goal> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DaybookError::validation("Title is required"));
        }

        let goal = Goal {
            id: Uuid::new_v4(),
            title,
            description: non_empty(draft.description),
            category: draft.category,
            priority: draft.priority,
            start_date: draft.start_date,
            target_date: draft.target_date,
            kind: draft.kind,
            created_at: now(),
            completed: false,
            completed_at: None,
        };
        debug!(id = %goal.id, kind = %goal.kind.goal_type(), "adding goal");

        self.goals.push(goal);
        self.goals.save(&self.store)?;
        Ok(&self.goals.items()[self.goals.len() - 1])
    }

    pub fn update(&mut self, id: Uuid, patch: GoalPatch) -> DaybookResult<&Goal> {
        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            return Err(DaybookError::validation("Title is required"));
        }

        self.modify(id, |goal| {
            if let Some(title) = patch.title {
                goal.title = title.trim().to_string();
            }
            if let Some(description) = patch.description {
                goal.description = non_empty(description);
            }
            if let Some(category) = patch.category {
                goal.category = category;
            }
            if let Some(priority) = patch.priority {
                goal.priority = priority;
            }
            if let Some(start_date) = patch.start_date {
                goal.start_date = start_date;
            }
            if let Some(target_date) = patch.target_date {
                goal.target_date = target_date;
            }
            if let Some(kind) = patch.kind {
                goal.kind = kind;
            }
            Ok(())
        })
    }

    pub fn delete(&mut self, id: Uuid) -> DaybookResult<Goal> {
        let removed = self.goals.remove(id).ok_or_else(|| not_found(id))?;
        self.goals.save(&self.store)?;
        Ok(removed)
    }

    /// Flip completion. Completing a habit also records today in its streak.
    pub fn toggle(&mut self, id: Uuid) -> DaybookResult<&Goal> {
        let at = now();
        self.modify(id, |goal| {
            if goal.completed {
                goal.completed = false;
                goal.completed_at = None;
            } else {
                goal.mark_completed(at);
            }
            Ok(())
        })
    }

    /// Set the current value of a numeric goal, clamped to `0..=target`.
    /// Reaching the target completes the goal.
    pub fn update_progress(&mut self, id: Uuid, value: i64) -> DaybookResult<&Goal> {
        let at = now();
        self.modify(id, |goal| {
            let GoalKind::Numeric(numeric) = &mut goal.kind else {
                return Err(DaybookError::validation(format!(
                    "'{}' is not a numeric goal",
                    goal.title
                )));
            };

            numeric.current = u32::try_from(value.max(0))
                .unwrap_or(u32::MAX)
                .min(numeric.target);
            let reached = numeric.current >= numeric.target;

            if reached && !goal.completed {
                goal.mark_completed(at);
            }
            Ok(())
        })
    }

    pub fn filtered(&self, filter: &GoalFilter, today: NaiveDate) -> Vec<&Goal> {
        self.goals
            .iter()
            .filter(|g| filter.matches(g, today))
            .collect()
    }

    pub fn stats(&self) -> GoalStats {
        let total = self.goals.len();
        let completed = self.goals.iter().filter(|g| g.completed).count();
        let success_rate = if total > 0 {
            (completed as f64 / total as f64 * 100.0).round() as u32
        } else {
            0
        };

        GoalStats {
            total,
            completed,
            active: total - completed,
            success_rate,
        }
    }

    /// Goal counts per category, in category order, omitting empty ones.
    pub fn by_category(&self) -> Vec<(GoalCategory, usize)> {
        GoalCategory::ALL
            .iter()
            .map(|&c| (c, self.goals.iter().filter(|g| g.category == c).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Completions per calendar month for the last six months, oldest first.
    /// Each entry is keyed by the first day of its month.
    pub fn monthly_completions(&self, today: NaiveDate) -> Vec<(NaiveDate, usize)> {
        let Some(this_month) = today.with_day(1) else {
            return Vec::new();
        };

        (0..MONTHLY_HISTORY)
            .rev()
            .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
            .map(|month| {
                let count = self
                    .goals
                    .iter()
                    .filter_map(|g| g.completed_at)
                    .filter(|at| at.year() == month.year() && at.month() == month.month())
                    .count();
                (month, count)
            })
            .collect()
    }

    fn modify(
        &mut self,
        id: Uuid,
        change: impl FnOnce(&mut Goal) -> DaybookResult<()>,
    ) -> DaybookResult<&Goal> {
        let goal = self.goals.get_mut(id).ok_or_else(|| not_found(id))?;
        change(goal)?;
        self.goals.save(&self.store)?;
        self.goals.get(id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> DaybookError {
    DaybookError::NotFound {
        kind: Goal::KIND,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal_book() -> (tempfile::TempDir, GoalBook) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let book = GoalBook::load(&store).unwrap();
        (dir, book)
    }

    fn numeric(target: u32) -> GoalKind {
        GoalKind::Numeric(NumericTarget {
            target,
            current: 0,
            unit: "km".into(),
        })
    }

    #[test]
    fn habit_streak_rules() {
        let mut habit = Habit::default();

        habit.complete_on(date(2024, 3, 10));
        assert_eq!(habit.streak, 1);

        habit.complete_on(date(2024, 3, 10));
        assert_eq!(habit.streak, 1);

        habit.complete_on(date(2024, 3, 11));
        assert_eq!(habit.streak, 2);

        habit.complete_on(date(2024, 3, 14));
        assert_eq!(habit.streak, 1);
        assert_eq!(habit.last_completed, Some(date(2024, 3, 14)));
    }

    #[test]
    fn progress_by_kind() {
        let base = Goal {
            id: Uuid::new_v4(),
            title: "g".into(),
            description: None,
            category: GoalCategory::Health,
            priority: Priority::Medium,
            start_date: None,
            target_date: None,
            kind: GoalKind::Binary,
            created_at: now(),
            completed: false,
            completed_at: None,
        };
        assert_eq!(base.progress(), 0.0);

        let run = Goal {
            kind: GoalKind::Numeric(NumericTarget {
                target: 40,
                current: 10,
                unit: "km".into(),
            }),
            ..base.clone()
        };
        assert_eq!(run.progress(), 25.0);

        let habit = Goal {
            kind: GoalKind::Habit(Habit {
                streak: 45,
                ..Habit::default()
            }),
            ..base.clone()
        };
        assert_eq!(habit.progress(), 100.0);

        let done = Goal {
            completed: true,
            ..base
        };
        assert_eq!(done.progress(), 100.0);
    }

    #[test]
    fn numeric_progress_clamps_and_completes() {
        let (_dir, mut book) = goal_book();
        let id = book.add(GoalDraft::new("Run", numeric(40))).unwrap().id;

        let goal = book.update_progress(id, -5).unwrap();
        assert!(matches!(&goal.kind, GoalKind::Numeric(n) if n.current == 0));
        assert!(!goal.completed);

        let goal = book.update_progress(id, 100).unwrap();
        assert!(matches!(&goal.kind, GoalKind::Numeric(n) if n.current == 40));
        assert!(goal.completed);
        assert!(goal.completed_at.is_some());
    }

    #[test]
    fn progress_on_binary_goal_is_rejected() {
        let (_dir, mut book) = goal_book();
        let id = book.add(GoalDraft::new("Ship", GoalKind::Binary)).unwrap().id;
        assert!(matches!(
            book.update_progress(id, 1),
            Err(DaybookError::Validation(_))
        ));
    }

    #[test]
    fn toggle_habit_starts_streak() {
        let (_dir, mut book) = goal_book();
        let id = book
            .add(GoalDraft::new("Read", GoalKind::Habit(Habit::default())))
            .unwrap()
            .id;

        let goal = book.toggle(id).unwrap();
        assert!(goal.completed);
        assert!(matches!(&goal.kind, GoalKind::Habit(h) if h.streak == 1));

        let goal = book.toggle(id).unwrap();
        assert!(!goal.completed);
        assert!(goal.completed_at.is_none());
    }

    #[test]
    fn filters_and_stats() {
        let (_dir, mut book) = goal_book();
        let today = date(2024, 3, 10);

        book.add(GoalDraft {
            target_date: Some(date(2024, 3, 1)),
            category: GoalCategory::Career,
            ..GoalDraft::new("Promotion", GoalKind::Binary)
        })
        .unwrap();
        let done = book.add(GoalDraft::new("Marathon", numeric(42))).unwrap().id;
        book.toggle(done).unwrap();
        book.add(GoalDraft::new("Meditate", GoalKind::Habit(Habit::default())))
            .unwrap();

        let overdue = GoalFilter {
            status: GoalStatus::Overdue,
            ..GoalFilter::default()
        };
        assert_eq!(book.filtered(&overdue, today)[0].title, "Promotion");

        let habits = GoalFilter {
            goal_type: Some(GoalType::Habit),
            ..GoalFilter::default()
        };
        assert_eq!(book.filtered(&habits, today).len(), 1);

        let search = GoalFilter {
            status: GoalStatus::Active,
            search: Some("MARA".into()),
            ..GoalFilter::default()
        };
        assert!(book.filtered(&search, today).is_empty());

        assert_eq!(
            book.stats(),
            GoalStats {
                total: 3,
                completed: 1,
                active: 2,
                success_rate: 33,
            }
        );
        assert_eq!(
            book.by_category(),
            [(GoalCategory::Personal, 2), (GoalCategory::Career, 1)]
        );
    }

    #[test]
    fn monthly_completions_cover_six_months() {
        let (_dir, mut book) = goal_book();
        let id = book.add(GoalDraft::new("Done", GoalKind::Binary)).unwrap().id;
        book.toggle(id).unwrap();

        let today = now().date();
        let months = book.monthly_completions(today);
        assert_eq!(months.len(), 6);
        assert!(months.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(months[5], (today.with_day(1).unwrap(), 1));
        assert_eq!(months.iter().map(|(_, n)| n).sum::<usize>(), 1);
    }

    #[test]
    fn kind_is_tagged_in_json() {
        let kind = numeric(10);
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["type"], "numeric");
        assert_eq!(json["target"], 10);

        let habit: GoalKind = serde_json::from_str(r#"{"type":"habit","frequency":"weekly"}"#).unwrap();
        assert!(matches!(habit, GoalKind::Habit(h) if h.frequency == Frequency::Weekly && h.streak == 0));
    }
}
