//! Cross-collection summary and achievement badges.

use chrono::NaiveDateTime;

use crate::event::Event;
use crate::goal::{Goal, GoalKind};
use crate::layout::agenda;
use crate::note::Note;
use crate::task::Task;

/// Window for the "upcoming events" count.
pub const UPCOMING_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub tasks: usize,
    pub completed_tasks: usize,
    /// Rounded percent of tasks completed.
    pub task_completion_rate: u32,
    pub notes: usize,
    pub active_goals: usize,
    pub goals_achieved: usize,
    pub events: usize,
    pub upcoming_events: usize,
    /// Longest current streak among habit goals.
    pub best_streak: u32,
}

impl Summary {
    pub fn collect(
        tasks: &[Task],
        notes: &[Note],
        goals: &[Goal],
        events: &[Event],
        now: NaiveDateTime,
    ) -> Self {
        let completed_tasks = tasks.iter().filter(|t| t.is_completed()).count();
        let goals_achieved = goals.iter().filter(|g| g.completed).count();

        let best_streak = goals
            .iter()
            .filter_map(|g| match &g.kind {
                GoalKind::Habit(habit) => Some(habit.streak),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        Summary {
            tasks: tasks.len(),
            completed_tasks,
            task_completion_rate: percent(completed_tasks, tasks.len()),
            notes: notes.len(),
            active_goals: goals.len() - goals_achieved,
            goals_achieved,
            events: events.len(),
            upcoming_events: agenda(events, now, UPCOMING_DAYS).len(),
            best_streak,
        }
    }

    pub fn achievements(&self) -> Vec<Achievement> {
        let mut badges = vec![
            Achievement::new("Productive", "Complete 10 tasks", self.completed_tasks, 10),
            Achievement::new("Achiever", "Reach 5 goals", self.goals_achieved, 5),
            Achievement::new("Writer", "Write 20 notes", self.notes, 20),
            Achievement::new("Organized", "Plan 15 events", self.events, 15),
            Achievement::new(
                "Dedicated",
                "Keep a habit for 30 days",
                self.best_streak as usize,
                30,
            ),
        ];

        let unlocked = badges.iter().filter(|b| b.unlocked()).count();
        let others = badges.len();
        badges.push(Achievement::new(
            "Productivity master",
            "Unlock every other badge",
            unlocked,
            others,
        ));
        badges
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    pub title: &'static str,
    pub description: &'static str,
    pub count: usize,
    pub goal: usize,
}

impl Achievement {
    fn new(title: &'static str, description: &'static str, count: usize, goal: usize) -> Self {
        Achievement {
            title,
            description,
            count,
            goal,
        }
    }

    pub fn unlocked(&self) -> bool {
        self.count >= self.goal
    }

    /// Percent towards the goal, capped at 100.
    pub fn progress(&self) -> u32 {
        percent(self.count, self.goal).min(100)
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_range::now;
    use crate::goal::Habit;
    use crate::layout::test_support::{at, event};
    use crate::task::{Priority, TaskCategory, TaskStatus};
    use uuid::Uuid;

    fn task(status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: "t".into(),
            description: None,
            due_date: None,
            priority: Priority::Medium,
            category: TaskCategory::Work,
            status,
            created_at: now(),
            completed_at: None,
            tags: Vec::new(),
        }
    }

    fn habit_goal(streak: u32, completed: bool) -> Goal {
        Goal {
            id: Uuid::new_v4(),
            title: "g".into(),
            description: None,
            category: Default::default(),
            priority: Priority::Low,
            start_date: None,
            target_date: None,
            kind: GoalKind::Habit(Habit {
                streak,
                ..Habit::default()
            }),
            created_at: now(),
            completed,
            completed_at: None,
        }
    }

    #[test]
    fn summary_counts() {
        let tasks = vec![
            task(TaskStatus::Completed),
            task(TaskStatus::Pending),
            task(TaskStatus::InProgress),
        ];
        let goals = vec![habit_goal(4, true), habit_goal(12, false)];
        let events = vec![
            event("soon", at(2024, 3, 12, 9, 0), at(2024, 3, 12, 10, 0)),
            event("later", at(2024, 4, 12, 9, 0), at(2024, 4, 12, 10, 0)),
        ];

        let summary = Summary::collect(&tasks, &[], &goals, &events, at(2024, 3, 10, 8, 0));
        assert_eq!(summary.tasks, 3);
        assert_eq!(summary.task_completion_rate, 33);
        assert_eq!(summary.active_goals, 1);
        assert_eq!(summary.goals_achieved, 1);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.upcoming_events, 1);
        assert_eq!(summary.best_streak, 12);
    }

    #[test]
    fn achievements_unlock_at_thresholds() {
        let summary = Summary {
            completed_tasks: 10,
            goals_achieved: 2,
            notes: 20,
            events: 15,
            best_streak: 30,
            ..Summary::default()
        };

        let badges = summary.achievements();
        assert_eq!(badges.len(), 6);
        let unlocked: Vec<_> = badges.iter().filter(|b| b.unlocked()).map(|b| b.title).collect();
        assert_eq!(unlocked, ["Productive", "Writer", "Organized", "Dedicated"]);
        assert_eq!(badges[1].progress(), 40);
        assert_eq!(badges[5].progress(), 80);

        let all = Summary {
            goals_achieved: 5,
            ..summary
        };
        assert!(all.achievements().iter().all(|b| b.unlocked()));
    }

    #[test]
    fn empty_summary_has_no_rates() {
        let summary = Summary::collect(&[], &[], &[], &[], now());
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.achievements()[0].progress(), 0);
    }
}
