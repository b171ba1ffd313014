use anyhow::Result;
use clap::Subcommand;
use daybook_core::Daybook;
use daybook_core::dashboard::Summary;
use daybook_core::date_range::now;
use daybook_core::event::Calendar;
use daybook_core::goal::GoalBook;
use daybook_core::note::Notebook;
use daybook_core::profile::{Profile, ProfilePatch, Theme};
use daybook_core::task::TaskList;
use owo_colors::OwoColorize;

use crate::commands::{clearable, confirm};
use crate::render::Render;

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Profile, dashboard summary and achievements
    Show,
    /// Update personal info; pass "" to clear a field
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        bio: Option<String>,

        #[arg(long)]
        avatar: Option<String>,
    },
    /// Add an interest
    Interest { interest: String },
    /// Remove an interest
    Uninterest { interest: String },
    /// Show stored preferences
    Preferences,
    /// Store the preferred theme (light, dark or auto)
    Theme { theme: Theme },
    /// Restore default preferences
    Reset {
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(daybook: &Daybook, command: ProfileCommand) -> Result<()> {
    let store = daybook.store()?;
    let mut profile = Profile::load(&store)?;

    match command {
        ProfileCommand::Show => {
            let summary = Summary::collect(
                TaskList::load(&store)?.tasks(),
                Notebook::load(&store)?.notes(),
                GoalBook::load(&store)?.goals(),
                Calendar::load(&store)?.events(),
                now(),
            );

            println!("{}", profile.user().render());
            println!();
            println!("{}", "Summary".bold());
            println!("{}", summary.render());
            println!();
            println!("{}", "Achievements".bold());
            for achievement in summary.achievements() {
                println!("{}", achievement.render());
            }
        }
        ProfileCommand::Set {
            name,
            email,
            age,
            location,
            bio,
            avatar,
        } => {
            let user = profile.update_info(ProfilePatch {
                name,
                email: clearable(email),
                age: age.map(Some),
                location: clearable(location),
                bio: clearable(bio),
                avatar: clearable(avatar),
            })?;
            println!("{}", "  Profile saved".green());
            println!("{}", user.render());
        }
        ProfileCommand::Interest { interest } => {
            let user = profile.add_interest(&interest)?;
            println!("  Interests: {}", user.interests.join(", "));
        }
        ProfileCommand::Uninterest { interest } => {
            let user = profile.remove_interest(&interest)?;
            println!("  Interests: {}", user.interests.join(", "));
        }
        ProfileCommand::Preferences => {
            println!("{}", profile.preferences().render());
        }
        ProfileCommand::Theme { theme } => {
            profile.set_theme(theme)?;
            println!("  Theme set to {}", theme);
        }
        ProfileCommand::Reset { force } => {
            if !confirm("Reset all preferences?", force)? {
                return Ok(());
            }
            let preferences = profile.reset_preferences()?;
            println!("{}", "  Preferences reset".green());
            println!("{}", preferences.render());
        }
    }

    Ok(())
}
