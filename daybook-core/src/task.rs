//! Tasks and the task list.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::date_range::now;
use crate::error::{DaybookError, DaybookResult};
use crate::event::non_empty;
use crate::keyword::keyword_enum;
use crate::store::{Collection, Record, Store, StoreKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

keyword_enum!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
    Urgent => "urgent",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Study,
    #[default]
    Personal,
    Health,
    Shopping,
    Other,
}

keyword_enum!(TaskCategory, "task category", {
    Work => "work",
    Study => "study",
    Personal => "personal",
    Health => "health",
    Shopping => "shopping",
    Other => "other",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

keyword_enum!(TaskStatus, "task status", {
    Pending => "pending",
    InProgress => "in-progress",
    Completed => "completed",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Open and due before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_completed() && self.due_date.is_some_and(|due| due < today)
    }
}

impl Record for Task {
    const KEY: StoreKey = StoreKey::Tasks;
    const KIND: &'static str = "task";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub category: TaskCategory,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..TaskDraft::default()
        }
    }
}

/// Changes to an existing task. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
    pub category: Option<TaskCategory>,
}

/// Which tasks a listing shows, by completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl FromStr for StatusFilter {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" | "open" => Ok(StatusFilter::Pending),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(DaybookError::validation(format!(
                "Unknown status filter '{}'. Expected all, pending or completed",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub priority: Option<Priority>,
    pub category: Option<TaskCategory>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.is_completed(),
            StatusFilter::Completed => task.is_completed(),
        };

        status_ok
            && self.priority.is_none_or(|p| task.priority == p)
            && self.category.is_none_or(|c| task.category == c)
            && self
                .search
                .as_deref()
                .is_none_or(|q| task.title.to_lowercase().contains(&q.to_lowercase()))
    }
}

/// Kanban board columns.
#[derive(Debug, Default)]
pub struct TaskBoard<'a> {
    pub todo: Vec<&'a Task>,
    pub in_progress: Vec<&'a Task>,
    pub done: Vec<&'a Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    pub overdue: usize,
}

/// All stored tasks, persisted on every change.
pub struct TaskList {
    store: Store,
    tasks: Collection<Task>,
}

impl TaskList {
    pub fn load(store: &Store) -> DaybookResult<Self> {
        Ok(TaskList {
            store: store.clone(),
            tasks: Collection::load(store)?,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.items()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn resolve(&self, prefix: &str) -> DaybookResult<Uuid> {
        self.tasks.resolve(prefix)
    }

    pub fn add(&mut self, draft: TaskDraft) -> DaybookResult<&Task> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(DaybookError::validation("Title is required"));
        }

        let task = Task {
            id: Uuid::new_v4(),
            title,
            description: non_empty(draft.description),
            due_date: draft.due_date,
            priority: draft.priority,
            category: draft.category,
            status: TaskStatus::Pending,
            created_at: now(),
            completed_at: None,
            tags: draft.tags,
        };
        debug!(id = %task.id, "adding task");

        self.tasks.push(task);
        self.tasks.save(&self.store)?;
        Ok(&self.tasks.items()[self.tasks.len() - 1])
    }

    pub fn update(&mut self, id: Uuid, patch: TaskPatch) -> DaybookResult<&Task> {
        if let Some(title) = &patch.title
            && title.trim().is_empty()
        {
            return Err(DaybookError::validation("Title is required"));
        }

        self.modify(id, |task| {
            if let Some(title) = patch.title {
                task.title = title.trim().to_string();
            }
            if let Some(description) = patch.description {
                task.description = non_empty(description);
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = due_date;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(category) = patch.category {
                task.category = category;
            }
        })
    }

    /// Flip between completed and pending.
    pub fn toggle(&mut self, id: Uuid) -> DaybookResult<&Task> {
        self.modify(id, |task| {
            if task.is_completed() {
                task.status = TaskStatus::Pending;
                task.completed_at = None;
            } else {
                task.status = TaskStatus::Completed;
                task.completed_at = Some(now());
            }
        })
    }

    /// Move an open task to the in-progress column.
    pub fn start(&mut self, id: Uuid) -> DaybookResult<&Task> {
        self.modify(id, |task| {
            task.status = TaskStatus::InProgress;
            task.completed_at = None;
        })
    }

    pub fn set_priority(&mut self, id: Uuid, priority: Priority) -> DaybookResult<&Task> {
        self.modify(id, |task| task.priority = priority)
    }

    pub fn delete(&mut self, id: Uuid) -> DaybookResult<Task> {
        let removed = self.tasks.remove(id).ok_or_else(|| not_found(id))?;
        self.tasks.save(&self.store)?;
        Ok(removed)
    }

    /// Remove every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> DaybookResult<usize> {
        let removed = self.tasks.retain(|t| !t.is_completed());
        if removed > 0 {
            self.tasks.save(&self.store)?;
        }
        Ok(removed)
    }

    pub fn filtered(&self, filter: &TaskFilter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    pub fn board(&self, filter: &TaskFilter) -> TaskBoard<'_> {
        let mut board = TaskBoard::default();
        for task in self.filtered(filter) {
            match task.status {
                TaskStatus::Pending => board.todo.push(task),
                TaskStatus::InProgress => board.in_progress.push(task),
                TaskStatus::Completed => board.done.push(task),
            }
        }
        board
    }

    pub fn stats(&self, today: NaiveDate) -> TaskStats {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.is_completed()).count();
        let overdue = self.tasks.iter().filter(|t| t.is_overdue(today)).count();

        TaskStats {
            total,
            pending: total - completed,
            completed,
            overdue,
        }
    }

    fn modify(&mut self, id: Uuid, change: impl FnOnce(&mut Task)) -> DaybookResult<&Task> {
        let task = self.tasks.get_mut(id).ok_or_else(|| not_found(id))?;
        change(task);
        self.tasks.save(&self.store)?;
        self.tasks.get(id).ok_or_else(|| not_found(id))
    }
}

fn not_found(id: Uuid) -> DaybookError {
    DaybookError::NotFound {
        kind: Task::KIND,
        id: id.to_string(),
    }
}
