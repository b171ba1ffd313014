//! Calendar events and the calendar that owns them.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::date_range::DateRange;
use crate::error::{DaybookError, DaybookResult};
use crate::store::{Collection, Record, Store, StoreKey};

pub const DEFAULT_EVENT_COLOR: &str = "#667eea";
pub const DEFAULT_EVENT_CATEGORY: &str = "personal";

fn default_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

fn default_category() -> String {
    DEFAULT_EVENT_CATEGORY.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub all_day: bool,
}

impl Event {
    /// Length in minutes. Stored events with `end < start` have no length.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    /// Flagged all-day and bounded by midnights. A flagged event with
    /// clock-time bounds is laid out as a timed event.
    pub fn is_all_day(&self) -> bool {
        self.all_day
            && self.start.time() == NaiveTime::MIN
            && self.end.time() == NaiveTime::MIN
            && self.end > self.start
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn starts_within(&self, range: &DateRange) -> bool {
        range.contains(self.start)
    }
}

impl Record for Event {
    const KEY: StoreKey = StoreKey::Events;
    const KIND: &'static str = "event";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Input for a new event.
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub all_day: bool,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        EventDraft {
            title: title.into(),
            start,
            end,
            description: None,
            color: None,
            category: None,
            all_day: false,
        }
    }

    /// A 09:00-10:00 slot on `date`, used when creating an event from a day cell.
    pub fn for_date(title: impl Into<String>, date: NaiveDate) -> Self {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        let ten = NaiveTime::from_hms_opt(10, 0, 0).unwrap_or(NaiveTime::MIN);
        Self::new(title, date.and_time(nine), date.and_time(ten))
    }

    /// An all-day event spanning `days` days from `date`.
    pub fn all_day(title: impl Into<String>, date: NaiveDate, days: u64) -> Self {
        let end = date.checked_add_days(Days::new(days.max(1))).unwrap_or(date);
        let mut draft = Self::new(title, date.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN));
        draft.all_day = true;
        draft
    }

    fn into_event(self) -> DaybookResult<Event> {
        let title = self.title.trim().to_string();
        validate(&title, self.start, self.end)?;

        Ok(Event {
            id: Uuid::new_v4(),
            title,
            start: self.start,
            end: self.end,
            description: non_empty(self.description),
            color: self.color.unwrap_or_else(default_color),
            category: self.category.unwrap_or_else(default_category),
            all_day: self.all_day,
        })
    }
}

/// Changes to an existing event. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub all_day: Option<bool>,
}

fn validate(title: &str, start: NaiveDateTime, end: NaiveDateTime) -> DaybookResult<()> {
    if title.is_empty() {
        return Err(DaybookError::validation("Title is required"));
    }
    if end < start {
        return Err(DaybookError::validation("End is before start"));
    }
    Ok(())
}

pub(crate) fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// All stored events, persisted on every change.
pub struct Calendar {
    store: Store,
    events: Collection<Event>,
}

impl Calendar {
    pub fn load(store: &Store) -> DaybookResult<Self> {
        Ok(Calendar {
            store: store.clone(),
            events: Collection::load(store)?,
        })
    }

    pub fn events(&self) -> &[Event] {
        self.events.items()
    }

    pub fn get(&self, id: Uuid) -> Option<&Event> {
        self.events.get(id)
    }

    pub fn resolve(&self, prefix: &str) -> DaybookResult<Uuid> {
        self.events.resolve(prefix)
    }

    pub fn create(&mut self, draft: EventDraft) -> DaybookResult<&Event> {
        let event = draft.into_event()?;
        debug!(id = %event.id, start = %event.start, "creating event");

        self.events.push(event);
        self.events.save(&self.store)?;

        Ok(&self.events.items()[self.events.len() - 1])
    }

    pub fn update(&mut self, id: Uuid, patch: EventPatch) -> DaybookResult<&Event> {
        let event = self.events.get_mut(id).ok_or_else(|| DaybookError::NotFound {
            kind: Event::KIND,
            id: id.to_string(),
        })?;

        let mut updated = event.clone();
        if let Some(title) = patch.title {
            updated.title = title.trim().to_string();
        }
        if let Some(start) = patch.start {
            updated.start = start;
        }
        if let Some(end) = patch.end {
            updated.end = end;
        }
        if let Some(description) = patch.description {
            updated.description = non_empty(description);
        }
        if let Some(color) = patch.color {
            updated.color = color;
        }
        if let Some(category) = patch.category {
            updated.category = category;
        }
        if let Some(all_day) = patch.all_day {
            updated.all_day = all_day;
        }

        validate(&updated.title, updated.start, updated.end)?;
        *event = updated;

        self.events.save(&self.store)?;
        self.events.get(id).ok_or_else(|| DaybookError::NotFound {
            kind: Event::KIND,
            id: id.to_string(),
        })
    }

    pub fn delete(&mut self, id: Uuid) -> DaybookResult<Event> {
        let removed = self.events.remove(id).ok_or_else(|| DaybookError::NotFound {
            kind: Event::KIND,
            id: id.to_string(),
        })?;
        self.events.save(&self.store)?;
        Ok(removed)
    }

    /// Events whose start falls in `range`, ordered by start.
    pub fn in_range(&self, range: &DateRange) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().filter(|e| e.starts_within(range)).collect();
        events.sort_by_key(|e| e.start);
        events
    }
}
