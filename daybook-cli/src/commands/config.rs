use anyhow::Result;
use clap::Subcommand;
use daybook_core::Daybook;
use daybook_core::daybook_config::{ConfigKey, DaybookConfig};
use owo_colors::OwoColorize;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show file locations and the settings in effect
    Show,
    /// Change one setting in config.toml
    Set {
        /// data_dir, agenda_days, month_cell_limit or upcoming_limit
        key: ConfigKey,

        value: String,
    },
}

pub fn run(daybook: &Daybook, command: ConfigCommand) -> Result<()> {
    let config_path = DaybookConfig::config_path()?;

    match command {
        ConfigCommand::Show => {
            let config = daybook.config();

            println!("{}", "Paths".bold());
            println!("  Config:  {}", config_path.display());
            println!("  Data:    {}", daybook.data_path().display());
            println!();
            println!("{}", "Settings".bold());
            println!("  {:<18}{}", ConfigKey::AgendaDays, config.agenda_days);
            println!("  {:<18}{}", ConfigKey::MonthCellLimit, config.month_cell_limit);
            println!("  {:<18}{}", ConfigKey::UpcomingLimit, config.upcoming_limit);
        }
        ConfigCommand::Set { key, value } => {
            // Environment overrides stay out of the file.
            let mut config = DaybookConfig::read(&config_path)?;
            config.set(key, &value)?;
            config.save(&config_path)?;

            println!("{}", format!("  Set {} = {}", key, value.trim()).green());
        }
    }

    Ok(())
}
