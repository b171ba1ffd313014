//! Core library for daybook, a local-first student planner.
//!
//! This crate holds everything except the terminal front end:
//! - `store` for the JSON document store and typed collections
//! - `event`, `task`, `note`, `goal`, `profile` for the entities and their managers
//! - `layout` for the month grid, week/day timelines and agenda view-models
//! - `transfer` for collection import/export and full backups

mod keyword;

pub mod dashboard;
pub mod date_range;
pub mod daybook;
pub mod daybook_config;
pub mod error;
pub mod event;
pub mod goal;
pub mod layout;
pub mod note;
pub mod profile;
pub mod store;
pub mod task;
pub mod transfer;

pub use daybook::Daybook;
pub use error::{DaybookError, DaybookResult};
