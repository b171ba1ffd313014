use anyhow::Result;
use clap::Subcommand;
use daybook_core::Daybook;
use daybook_core::date_range::today;
use daybook_core::task::{
    Priority, StatusFilter, Task, TaskCategory, TaskDraft, TaskFilter, TaskList, TaskPatch,
};
use owo_colors::OwoColorize;

use crate::commands::{clearable, confirm};
use crate::dates::parse_day;
use crate::render::{Render, short_id};

#[derive(Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        title: String,

        /// Due date, e.g. "friday" or "2025-03-20"
        #[arg(long)]
        due: Option<String>,

        #[arg(short, long, default_value = "medium")]
        priority: Priority,

        #[arg(short, long, default_value = "personal")]
        category: TaskCategory,

        #[arg(long)]
        description: Option<String>,

        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// List tasks
    List {
        /// all, pending or completed
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long)]
        category: Option<TaskCategory>,

        /// Match titles containing this text
        #[arg(long)]
        search: Option<String>,

        /// Show as kanban columns
        #[arg(long)]
        board: bool,
    },
    /// Toggle a task between completed and pending
    Done { id: String },
    /// Mark a task as in progress
    Start { id: String },
    /// Change fields of a task
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// Due date; pass "" to clear
        #[arg(long)]
        due: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long)]
        category: Option<TaskCategory>,

        /// Pass "" to clear
        #[arg(long)]
        description: Option<String>,
    },
    /// Set a task's priority
    Priority { id: String, priority: Priority },
    /// Delete a task
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },
    /// Delete every completed task
    Clear {
        #[arg(short, long)]
        force: bool,
    },
    /// Counts of pending, completed and overdue tasks
    Stats,
}

pub fn run(daybook: &Daybook, command: TaskCommand) -> Result<()> {
    let mut tasks = TaskList::load(&daybook.store()?)?;

    match command {
        TaskCommand::Add {
            title,
            due,
            priority,
            category,
            description,
            tags,
        } => {
            let due_date = due.as_deref().map(parse_day).transpose()?;
            let task = tasks.add(TaskDraft {
                title,
                description,
                due_date,
                priority,
                category,
                tags,
            })?;
            println!("{}", format!("  Added: {}", task.title).green());
        }
        TaskCommand::List {
            status,
            priority,
            category,
            search,
            board,
        } => {
            let filter = TaskFilter {
                status,
                priority,
                category,
                search,
            };

            if board {
                let board = tasks.board(&filter);
                print_column("To do", &board.todo);
                println!();
                print_column("In progress", &board.in_progress);
                println!();
                print_column("Done", &board.done);
                return Ok(());
            }

            let listed = tasks.filtered(&filter);
            if listed.is_empty() {
                println!("{}", "No tasks found".dimmed());
            }
            let today = today();
            for task in listed {
                let line = task.render();
                if task.is_overdue(today) {
                    println!("{} {}", line, "overdue".red());
                } else {
                    println!("{}", line);
                }
            }
        }
        TaskCommand::Done { id } => {
            let id = tasks.resolve(&id)?;
            let task = tasks.toggle(id)?;
            if task.is_completed() {
                println!("{}", format!("  Completed: {}", task.title).green());
            } else {
                println!("  Reopened: {}", task.title);
            }
        }
        TaskCommand::Start { id } => {
            let id = tasks.resolve(&id)?;
            let task = tasks.start(id)?;
            println!("  Started: {}", task.title);
        }
        TaskCommand::Edit {
            id,
            title,
            due,
            priority,
            category,
            description,
        } => {
            let id = tasks.resolve(&id)?;
            let due_date = match clearable(due) {
                Some(Some(input)) => Some(Some(parse_day(&input)?)),
                Some(None) => Some(None),
                None => None,
            };
            let task = tasks.update(
                id,
                TaskPatch {
                    title,
                    description: clearable(description),
                    due_date,
                    priority,
                    category,
                },
            )?;
            println!("{}", format!("  Updated: {}", task.title).green());
        }
        TaskCommand::Priority { id, priority } => {
            let id = tasks.resolve(&id)?;
            let task = tasks.set_priority(id, priority)?;
            println!("  {} is now {}", task.title, task.priority.render());
        }
        TaskCommand::Delete { id, force } => {
            let id = tasks.resolve(&id)?;
            let title = tasks.get(id).map(|t| t.title.clone()).unwrap_or_default();

            if !confirm(&format!("Delete task \"{}\" ({})?", title, short_id(id)), force)? {
                return Ok(());
            }

            let removed = tasks.delete(id)?;
            println!("  Deleted: {}", removed.title);
        }
        TaskCommand::Clear { force } => {
            let completed = tasks.stats(today()).completed;
            if completed == 0 {
                println!("{}", "No completed tasks".dimmed());
                return Ok(());
            }

            let prompt = format!(
                "Delete {} completed {}?",
                completed,
                if completed == 1 { "task" } else { "tasks" }
            );
            if !confirm(&prompt, force)? {
                return Ok(());
            }

            let removed = tasks.clear_completed()?;
            println!("  Cleared {} completed", removed);
        }
        TaskCommand::Stats => {
            let stats = tasks.stats(today());
            println!("  {:<10}{}", "Total".dimmed(), stats.total);
            println!("  {:<10}{}", "Pending".dimmed(), stats.pending);
            println!("  {:<10}{}", "Completed".dimmed(), stats.completed);
            println!("  {:<10}{}", "Overdue".dimmed(), stats.overdue.red());
        }
    }

    Ok(())
}

fn print_column(heading: &str, tasks: &[&Task]) {
    println!("{} {}", heading.bold(), format!("({})", tasks.len()).dimmed());
    for task in tasks {
        println!("  {}", task.render());
    }
}
