use anyhow::Result;
use clap::Subcommand;
use daybook_core::Daybook;
use daybook_core::date_range::today;
use daybook_core::goal::{
    Frequency, GoalBook, GoalCategory, GoalDraft, GoalFilter, GoalKind, GoalPatch, GoalStatus,
    GoalType, Habit, NumericTarget,
};
use daybook_core::task::Priority;
use owo_colors::OwoColorize;

use crate::commands::{clearable, confirm};
use crate::dates::parse_day;
use crate::render::{Render, short_id};

#[derive(Subcommand)]
pub enum GoalCommand {
    /// Set a new goal
    Add {
        title: String,

        /// binary, numeric or habit
        #[arg(short = 't', long = "type", default_value = "binary")]
        goal_type: GoalType,

        /// Target value for numeric goals
        #[arg(long, required_if_eq("goal_type", "numeric"))]
        target: Option<u32>,

        /// Starting value for numeric goals
        #[arg(long, default_value_t = 0)]
        current: u32,

        /// Unit for numeric goals, e.g. "km"
        #[arg(long, default_value = "")]
        unit: String,

        /// daily, weekly or monthly, for habits
        #[arg(long, default_value = "daily")]
        frequency: Frequency,

        #[arg(short, long, default_value = "personal")]
        category: GoalCategory,

        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        #[arg(long)]
        start: Option<String>,

        /// Target date
        #[arg(long)]
        by: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },
    /// List goals with progress
    List {
        /// all, active, completed or overdue
        #[arg(short, long, default_value = "all")]
        status: GoalStatus,

        #[arg(short, long)]
        category: Option<GoalCategory>,

        #[arg(short = 't', long = "type")]
        goal_type: Option<GoalType>,

        #[arg(long)]
        search: Option<String>,
    },
    /// Toggle completion; completing a habit extends its streak
    Done { id: String },
    /// Set the current value of a numeric goal
    Progress { id: String, value: i64 },
    /// Change fields of a goal
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        category: Option<GoalCategory>,

        #[arg(short, long)]
        priority: Option<Priority>,

        /// Target date; pass "" to clear
        #[arg(long)]
        by: Option<String>,

        /// Pass "" to clear
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a goal
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },
    /// Totals, categories and completions over the last months
    Stats,
}

pub fn run(daybook: &Daybook, command: GoalCommand) -> Result<()> {
    let mut goals = GoalBook::load(&daybook.store()?)?;

    match command {
        GoalCommand::Add {
            title,
            goal_type,
            target,
            current,
            unit,
            frequency,
            category,
            priority,
            start,
            by,
            description,
        } => {
            let kind = match goal_type {
                GoalType::Binary => GoalKind::Binary,
                GoalType::Numeric => {
                    let target = target.unwrap_or_default();
                    GoalKind::Numeric(NumericTarget {
                        target,
                        current: current.min(target),
                        unit,
                    })
                }
                GoalType::Habit => GoalKind::Habit(Habit {
                    frequency,
                    ..Habit::default()
                }),
            };

            let goal = goals.add(GoalDraft {
                description,
                category,
                priority,
                start_date: start.as_deref().map(parse_day).transpose()?,
                target_date: by.as_deref().map(parse_day).transpose()?,
                ..GoalDraft::new(title, kind)
            })?;
            println!("{}", format!("  Added: {}", goal.title).green());
        }
        GoalCommand::List {
            status,
            category,
            goal_type,
            search,
        } => {
            let today = today();
            let filter = GoalFilter {
                status,
                category,
                goal_type,
                search,
            };
            let listed = goals.filtered(&filter, today);
            if listed.is_empty() {
                println!("{}", "No goals found".dimmed());
            }
            for goal in listed {
                if goal.is_overdue(today) {
                    println!("{} {}", goal.render(), "overdue".red());
                } else {
                    println!("{}", goal.render());
                }
            }
        }
        GoalCommand::Done { id } => {
            let id = goals.resolve(&id)?;
            let goal = goals.toggle(id)?;
            if goal.completed {
                println!("{}", format!("  Achieved: {} 🎉", goal.title).green());
            } else {
                println!("  Reactivated: {}", goal.title);
            }
        }
        GoalCommand::Progress { id, value } => {
            let id = goals.resolve(&id)?;
            let goal = goals.update_progress(id, value)?;
            println!("{}", goal.render());
        }
        GoalCommand::Edit {
            id,
            title,
            category,
            priority,
            by,
            description,
        } => {
            let id = goals.resolve(&id)?;
            let target_date = match clearable(by) {
                Some(Some(input)) => Some(Some(parse_day(&input)?)),
                Some(None) => Some(None),
                None => None,
            };
            let goal = goals.update(
                id,
                GoalPatch {
                    title,
                    description: clearable(description),
                    category,
                    priority,
                    target_date,
                    ..GoalPatch::default()
                },
            )?;
            println!("{}", format!("  Updated: {}", goal.title).green());
        }
        GoalCommand::Delete { id, force } => {
            let id = goals.resolve(&id)?;
            let title = goals.get(id).map(|g| g.title.clone()).unwrap_or_default();

            if !confirm(&format!("Delete goal \"{}\" ({})?", title, short_id(id)), force)? {
                return Ok(());
            }

            let removed = goals.delete(id)?;
            println!("  Deleted: {}", removed.title);
        }
        GoalCommand::Stats => {
            let stats = goals.stats();
            println!("  {:<14}{}", "Total".dimmed(), stats.total);
            println!("  {:<14}{}", "Completed".dimmed(), stats.completed);
            println!("  {:<14}{}", "Active".dimmed(), stats.active);
            println!("  {:<14}{}%", "Success rate".dimmed(), stats.success_rate);

            let by_category = goals.by_category();
            if !by_category.is_empty() {
                println!();
                println!("{}", "By category".bold());
                for (category, count) in by_category {
                    println!("  {:<14}{}", category.as_str(), count);
                }
            }

            println!();
            println!("{}", "Completed per month".bold());
            for (month, count) in goals.monthly_completions(today()) {
                println!(
                    "  {:<14}{} {}",
                    month.format("%b %Y").to_string(),
                    "■".repeat(count).green(),
                    count
                );
            }
        }
    }

    Ok(())
}
