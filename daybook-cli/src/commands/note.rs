use anyhow::Result;
use clap::Subcommand;
use daybook_core::Daybook;
use daybook_core::date_range::today;
use daybook_core::note::{NoteCategory, NoteDraft, NoteFilter, NotePatch, NoteSort, Notebook};
use owo_colors::OwoColorize;

use crate::commands::confirm;
use crate::render::{Render, short_id};

#[derive(Subcommand)]
pub enum NoteCommand {
    /// Write a new note
    New {
        title: String,

        #[arg(long, default_value = "")]
        content: String,

        #[arg(short, long, default_value = "personal")]
        category: NoteCategory,

        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// List notes with a preview
    List {
        /// Match title or content
        #[arg(long)]
        search: Option<String>,

        #[arg(short, long)]
        category: Option<NoteCategory>,

        /// newest, oldest or title
        #[arg(long, default_value = "newest")]
        sort: NoteSort,
    },
    /// Print a note in full
    Show { id: String },
    /// Change a note
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        content: Option<String>,

        #[arg(short, long)]
        category: Option<NoteCategory>,
    },
    /// Add a tag to a note
    Tag { id: String, tag: String },
    /// Remove a tag from a note
    Untag { id: String, tag: String },
    /// Delete a note
    Delete {
        id: String,

        #[arg(short, long)]
        force: bool,
    },
    /// Note counts
    Stats,
}

pub fn run(daybook: &Daybook, command: NoteCommand) -> Result<()> {
    let mut notebook = Notebook::load(&daybook.store()?)?;

    match command {
        NoteCommand::New {
            title,
            content,
            category,
            tags,
        } => {
            let note = notebook.create(NoteDraft {
                title,
                content,
                category,
                tags,
            })?;
            println!("{}", format!("  Created: {}", note.title).green());
        }
        NoteCommand::List {
            search,
            category,
            sort,
        } => {
            let filter = NoteFilter {
                search,
                category,
                sort,
            };
            let notes = notebook.filtered(&filter);
            if notes.is_empty() {
                println!("{}", "No notes found".dimmed());
            }
            for (i, note) in notes.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("{}", note.render());
            }
        }
        NoteCommand::Show { id } => {
            let id = notebook.resolve(&id)?;
            if let Some(note) = notebook.get(id) {
                println!("{}", note.title.bold());
                println!(
                    "{}",
                    format!(
                        "{} · created {}",
                        note.category,
                        note.created_at.format("%b %-d %Y %H:%M")
                    )
                    .dimmed()
                );
                if !note.tags.is_empty() {
                    println!("{}", note.tags.join(", ").cyan());
                }
                println!();
                println!("{}", note.content);
            }
        }
        NoteCommand::Edit {
            id,
            title,
            content,
            category,
        } => {
            let id = notebook.resolve(&id)?;
            let note = notebook.update(
                id,
                NotePatch {
                    title,
                    content,
                    category,
                },
            )?;
            println!("{}", format!("  Updated: {}", note.title).green());
        }
        NoteCommand::Tag { id, tag } => {
            let id = notebook.resolve(&id)?;
            let note = notebook.add_tag(id, &tag)?;
            println!("  {} tags: {}", note.title, note.tags.join(", "));
        }
        NoteCommand::Untag { id, tag } => {
            let id = notebook.resolve(&id)?;
            let note = notebook.remove_tag(id, &tag)?;
            println!("  {} tags: {}", note.title, note.tags.join(", "));
        }
        NoteCommand::Delete { id, force } => {
            let id = notebook.resolve(&id)?;
            let title = notebook.get(id).map(|n| n.title.clone()).unwrap_or_default();

            if !confirm(&format!("Delete note \"{}\" ({})?", title, short_id(id)), force)? {
                return Ok(());
            }

            let removed = notebook.delete(id)?;
            println!("  Deleted: {}", removed.title);
        }
        NoteCommand::Stats => {
            let stats = notebook.stats(today());
            println!("  {:<12}{}", "Total".dimmed(), stats.total);
            println!("  {:<12}{}", "Categories".dimmed(), stats.categories);
            println!("  {:<12}{}", "Tags".dimmed(), stats.tags);
            println!("  {:<12}{}", "This month".dimmed(), stats.this_month);
        }
    }

    Ok(())
}
