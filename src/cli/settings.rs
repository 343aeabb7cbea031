//! Code related to the CLI commands for managing the settings file.
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result, bail};
use clap::Subcommand;
use std::fs;

/// The available subcommands for managing the settings file.
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Write the default settings to `settings.toml` in the working directory.
    Create {
        /// Whether to overwrite an existing settings file
        #[arg(long)]
        overwrite: bool,
    },
    /// Show the contents of the settings file, if present.
    Show,
    /// Show the default settings.
    ShowDefault,
    /// Print the path to the settings file.
    Path,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Create { overwrite } => handle_create_command(overwrite)?,
            Self::Show => handle_show_command()?,
            Self::ShowDefault => print!("{}", Settings::default_file_contents()),
            Self::Path => println!("{}", get_settings_file_path().display()),
        }

        Ok(())
    }
}

/// Handle the `settings create` command
fn handle_create_command(overwrite: bool) -> Result<()> {
    let file_path = get_settings_file_path();
    if file_path.is_file() && !overwrite {
        bail!(
            "Settings file already exists at {}. Pass --overwrite to replace it.",
            file_path.display()
        );
    }

    fs::write(&file_path, Settings::default_file_contents())
        .with_context(|| format!("Could not write {}", file_path.display()))?;
    println!("Settings file written to {}", file_path.display());

    Ok(())
}

/// Handle the `settings show` command
fn handle_show_command() -> Result<()> {
    let file_path = get_settings_file_path();
    if !file_path.is_file() {
        println!("No settings file found: default settings are in use.");
        return Ok(());
    }

    let contents = fs::read_to_string(&file_path)
        .with_context(|| format!("Could not read {}", file_path.display()))?;
    print!("{contents}");

    Ok(())
}
