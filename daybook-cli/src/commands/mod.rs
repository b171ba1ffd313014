pub mod calendar;
pub mod config;
pub mod event;
pub mod goal;
pub mod note;
pub mod profile;
pub mod task;
pub mod transfer;

use anyhow::Result;
use dialoguer::Confirm;

/// Ask before a destructive change unless `--force` was given.
pub fn confirm(prompt: &str, force: bool) -> Result<bool> {
    if force {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;

    Ok(confirmed)
}

/// `Some(None)` for an empty string, so that `--description ""` clears a field.
pub fn clearable(value: Option<String>) -> Option<Option<String>> {
    value.map(|v| if v.trim().is_empty() { None } else { Some(v) })
}
