//! Terminal rendering for daybook types.
//!
//! Extension traits add colored output to daybook-core types and layouts
//! using owo_colors.

use chrono::{NaiveDate, NaiveDateTime};
use daybook_core::dashboard::{Achievement, Summary};
use daybook_core::event::Event;
use daybook_core::goal::{Goal, GoalKind};
use daybook_core::layout::{Agenda, DayLayout, Layout, MonthGrid, WeekLayout};
use daybook_core::note::Note;
use daybook_core::profile::{Preferences, UserProfile};
use daybook_core::task::{Priority, Task, TaskStatus};
use owo_colors::OwoColorize;
use uuid::Uuid;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// First eight hex digits, enough to address a record from the command line.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// "Today", "Tomorrow", or e.g. "Wed Feb 25".
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

fn hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// A bullet in the event's own color.
fn swatch(event: &Event) -> String {
    match hex_rgb(&event.color) {
        Some((r, g, b)) => "●".truecolor(r, g, b).to_string(),
        None => "●".to_string(),
    }
}

fn clock(t: NaiveDateTime) -> String {
    t.format("%H:%M").to_string()
}

fn minutes_label(minutes: i64) -> String {
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h{:02}", h, m),
    }
}

impl Render for Event {
    fn render(&self) -> String {
        let time = if self.is_all_day() {
            format!("{:>13}", "all-day")
        } else {
            format!("{:>5} – {:>5}", clock(self.start), clock(self.end))
        };
        format!(
            "{} {} {} {}",
            time.dimmed(),
            swatch(self),
            self.title,
            format!("[{}] {}", self.category, short_id(self.id)).dimmed()
        )
    }
}

impl Render for Priority {
    fn render(&self) -> String {
        match self {
            Priority::Low => "low".dimmed().to_string(),
            Priority::Medium => "medium".blue().to_string(),
            Priority::High => "high".yellow().to_string(),
            Priority::Urgent => "urgent".red().bold().to_string(),
        }
    }
}

impl Render for Task {
    fn render(&self) -> String {
        let check = match self.status {
            TaskStatus::Pending => "[ ]".to_string(),
            TaskStatus::InProgress => "[~]".yellow().to_string(),
            TaskStatus::Completed => "[x]".green().to_string(),
        };
        let title = if self.is_completed() {
            self.title.strikethrough().dimmed().to_string()
        } else {
            self.title.clone()
        };
        let due = self
            .due_date
            .map(|d| format!(" due {}", d.format("%b %-d")))
            .unwrap_or_default();
        let tags: String = self.tags.iter().map(|t| format!(" #{}", t)).collect();

        format!(
            "{} {} {} {}{}{}",
            short_id(self.id).dimmed(),
            check,
            title,
            self.priority.render(),
            format!(" {}{}", self.category, due).dimmed(),
            tags.cyan()
        )
    }
}

impl Render for Note {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {} {}",
            short_id(self.id).dimmed(),
            self.title.bold(),
            format!(
                "[{}] {}",
                self.category,
                self.touched_at().format("%b %-d %Y")
            )
            .dimmed()
        )];

        let preview = self.preview();
        if !preview.is_empty() {
            lines.push(format!("   {}", preview.replace('\n', " ")));
        }
        if !self.tags.is_empty() {
            let tags: Vec<String> = self.tags.iter().map(|t| format!("#{}", t)).collect();
            lines.push(format!("   {}", tags.join(" ").cyan()));
        }

        lines.join("\n")
    }
}

/// Ten-cell progress bar for a 0-100 percentage.
fn progress_bar(percent: f64) -> String {
    let filled = (percent / 10.0).round().clamp(0.0, 10.0) as usize;
    format!("{}{}", "█".repeat(filled).green(), "░".repeat(10 - filled).dimmed())
}

impl Render for Goal {
    fn render(&self) -> String {
        let check = if self.completed {
            "[x]".green().to_string()
        } else {
            "[ ]".to_string()
        };
        let detail = match &self.kind {
            GoalKind::Binary => String::new(),
            GoalKind::Numeric(n) => format!(" {}/{} {}", n.current, n.target, n.unit),
            GoalKind::Habit(h) => format!(
                " {} streak {} {}",
                h.frequency,
                h.streak,
                pluralize("day", h.streak as usize)
            ),
        };
        let target = self
            .target_date
            .map(|d| format!(" by {}", d.format("%b %-d %Y")))
            .unwrap_or_default();

        format!(
            "{} {} {} {} {:>3.0}%{}",
            short_id(self.id).dimmed(),
            check,
            self.title,
            progress_bar(self.progress()),
            self.progress(),
            format!(" {}{}{}", self.category, detail, target).dimmed()
        )
    }
}

impl Render for MonthGrid<'_> {
    fn render(&self) -> String {
        let mut lines = vec![" Mo  Tu  We  Th  Fr  Sa  Su".dimmed().to_string()];

        for week in self.weeks() {
            let row: Vec<String> = week
                .iter()
                .map(|cell| {
                    let marker = if cell.events.is_empty() { ' ' } else { '•' };
                    let text = format!("{:>3}{}", cell.date.format("%-d"), marker);
                    if cell.is_today {
                        text.reversed().to_string()
                    } else if !cell.in_month() {
                        text.dimmed().to_string()
                    } else if !cell.events.is_empty() {
                        text.bold().to_string()
                    } else {
                        text
                    }
                })
                .collect();
            lines.push(row.join(""));
        }

        let busy: Vec<_> = self
            .cells
            .iter()
            .filter(|c| c.in_month() && !c.events.is_empty())
            .collect();
        if !busy.is_empty() {
            lines.push(String::new());
        }
        for cell in busy {
            lines.push(cell.date.format("%a %-d").bold().to_string());
            for event in &cell.events {
                lines.push(format!("  {}", event.render()));
            }
            if cell.hidden > 0 {
                lines.push(format!("  +{} more", cell.hidden).dimmed().to_string());
            }
        }

        lines.join("\n")
    }
}

impl Render for WeekLayout<'_> {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for (column, day) in (0u32..).zip(self.days.iter()) {
            lines.push(day.format("%a %-d %b").bold().to_string());

            let banners: Vec<_> = self.all_day.iter().filter(|p| p.column == column).collect();
            let timed: Vec<_> = self.column(column).collect();

            if banners.is_empty() && timed.is_empty() {
                lines.push(format!("  {}", "—".dimmed()));
                continue;
            }
            for banner in banners {
                lines.push(format!("  {}", banner.event.render()));
            }
            for placement in timed {
                lines.push(format!(
                    "  {} {}",
                    placement.event.render(),
                    format!(
                        "+{} {}",
                        minutes_label(i64::from(placement.offset_minutes)),
                        minutes_label(placement.height_minutes)
                    )
                    .dimmed()
                ));
            }
        }

        lines.join("\n")
    }
}

impl Render for DayLayout<'_> {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        for event in &self.all_day {
            lines.push(format!("{} {}", " all-day │".dimmed(), event.render()));
        }

        for row in &self.rows {
            let hour = format!("{:>5}:00 │", row.hour);
            if row.placements.is_empty() {
                lines.push(hour.dimmed().to_string());
                continue;
            }
            for placement in &row.placements {
                lines.push(format!(
                    "{} {} {}",
                    hour,
                    placement.event.render(),
                    minutes_label(placement.height_minutes).dimmed()
                ));
            }
        }

        lines.join("\n")
    }
}

impl Render for Agenda<'_> {
    fn render(&self) -> String {
        if self.is_empty() {
            return "No upcoming events".dimmed().to_string();
        }

        let today = self.from.date();
        let mut lines = Vec::new();

        for (i, (date, events)) in self.by_day().into_iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            lines.push(date_label(date, today).bold().to_string());
            for event in events {
                lines.push(format!("  {}", event.render()));
            }
        }

        lines.join("\n")
    }
}

impl Render for Layout<'_> {
    fn render(&self) -> String {
        match self {
            Layout::Month(grid) => grid.render(),
            Layout::Week(week) => week.render(),
            Layout::Day(day) => day.render(),
            Layout::Agenda(agenda) => agenda.render(),
        }
    }
}

impl Render for UserProfile {
    fn render(&self) -> String {
        let mut lines = vec![format!(
            "{} {}",
            self.avatar.as_deref().unwrap_or("👤"),
            self.name.bold()
        )];

        let fields = [
            ("Email", self.email.clone()),
            ("Age", self.age.map(|a| a.to_string())),
            ("Location", self.location.clone()),
            ("Bio", self.bio.clone()),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                lines.push(format!("  {:<10}{}", label.dimmed(), value));
            }
        }
        if !self.interests.is_empty() {
            lines.push(format!("  {:<10}{}", "Interests".dimmed(), self.interests.join(", ")));
        }
        lines.push(
            format!("  Member since {}", self.created_at.format("%b %-d %Y"))
                .dimmed()
                .to_string(),
        );

        lines.join("\n")
    }
}

impl Render for Preferences {
    fn render(&self) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" };
        [
            format!("  {:<16}{}", "Theme".dimmed(), self.theme),
            format!(
                "  {:<16}tasks {}, events {}, goals {}",
                "Notifications".dimmed(),
                on_off(self.notifications.tasks),
                on_off(self.notifications.events),
                on_off(self.notifications.goals)
            ),
            format!(
                "  {:<16}{} view, {}",
                "Display".dimmed(),
                self.display.default_view,
                self.display.density
            ),
            format!(
                "  {:<16}tasks by {}, notes by {}",
                "Organization".dimmed(),
                self.organization.tasks_sort,
                self.organization.notes_grouping
            ),
        ]
        .join("\n")
    }
}

impl Render for Summary {
    fn render(&self) -> String {
        [
            format!(
                "  {:>4} {} ({}% done)",
                self.tasks,
                pluralize("task", self.tasks),
                self.task_completion_rate
            ),
            format!("  {:>4} {}", self.notes, pluralize("note", self.notes)),
            format!(
                "  {:>4} active {}, {} achieved",
                self.active_goals,
                pluralize("goal", self.active_goals),
                self.goals_achieved
            ),
            format!(
                "  {:>4} upcoming {} this week",
                self.upcoming_events,
                pluralize("event", self.upcoming_events)
            ),
        ]
        .join("\n")
    }
}

impl Render for Achievement {
    fn render(&self) -> String {
        let badge = if self.unlocked() {
            "★".yellow().to_string()
        } else {
            "☆".dimmed().to_string()
        };
        format!(
            "  {} {:<20} {} {}",
            badge,
            self.title,
            progress_bar(f64::from(self.progress())),
            self.description.dimmed()
        )
    }
}
