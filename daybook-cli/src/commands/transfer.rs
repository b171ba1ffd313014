use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use daybook_core::Daybook;
use daybook_core::transfer::{Backup, CollectionKind};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::commands::confirm;

/// Write `content` to `output`, or to stdout when no path is given.
fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{}", format!("  Wrote {}", path.display()).green());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn export(daybook: &Daybook, collection: CollectionKind, output: Option<PathBuf>) -> Result<()> {
    let json = collection.export(&daybook.store()?)?;
    emit(&json, output.as_deref())
}

pub fn import(daybook: &Daybook, collection: CollectionKind, file: PathBuf) -> Result<()> {
    let json = read(&file)?;
    debug!(%collection, path = %file.display(), bytes = json.len(), "importing");
    let summary = collection
        .import(&daybook.store()?, &json)
        .with_context(|| format!("Failed to import {} from {}", collection, file.display()))?;

    println!(
        "  Imported {}: {} added, {} replaced",
        collection, summary.added, summary.replaced
    );
    Ok(())
}

pub fn backup(daybook: &Daybook, output: Option<PathBuf>) -> Result<()> {
    let backup = Backup::collect(&daybook.store()?)?;
    emit(&backup.to_json()?, output.as_deref())
}

pub fn restore(daybook: &Daybook, file: PathBuf, force: bool) -> Result<()> {
    let backup = Backup::from_json(&read(&file)?)
        .with_context(|| format!("{} is not a daybook backup", file.display()))?;

    let present: Vec<&str> = [
        backup.user.is_some().then_some("user"),
        backup.tasks.is_some().then_some("tasks"),
        backup.notes.is_some().then_some("notes"),
        backup.goals.is_some().then_some("goals"),
        backup.events.is_some().then_some("events"),
    ]
    .into_iter()
    .flatten()
    .collect();

    if present.is_empty() {
        println!("{}", "Nothing to restore".dimmed());
        return Ok(());
    }

    if !confirm(
        &format!("Overwrite {} with the backup?", present.join(", ")),
        force,
    )? {
        return Ok(());
    }

    let restored = backup.restore(&daybook.store()?)?;
    let keys: Vec<String> = restored.iter().map(|k| k.to_string()).collect();
    println!("{}", format!("  Restored {}", keys.join(", ")).green());
    Ok(())
}
