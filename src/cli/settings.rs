//! The `settings` command, for managing the program settings file
use crate::settings::{Settings, get_settings_file_path};
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Subcommands for managing the settings file
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it first if needed
    Edit,
    /// Print the path the settings file is read from
    Path,
    /// Print the contents of a placeholder `settings.toml` with every setting documented
    DumpDefault,
    /// Check that the settings file can be loaded
    Check,
}

impl SettingsSubcommands {
    /// Execute the supplied settings subcommand
    pub fn execute(self) -> Result<()> {
        let file_path = get_settings_file_path();
        match self {
            Self::Edit => edit_settings_file(&file_path)?,
            Self::Path => println!("{}", file_path.display()),
            Self::DumpDefault => print!("{}", Settings::default_file_contents()),
            Self::Check => println!("{}", check_settings_file(&file_path)?),
        }

        Ok(())
    }
}

/// Write a placeholder settings file to `file_path`, unless one is already there.
///
/// # Returns
///
/// True if a new file was created.
fn ensure_settings_file_exists(file_path: &Path) -> Result<bool> {
    if file_path.is_file() {
        return Ok(false);
    }

    if let Some(dir_path) = file_path.parent() {
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;
    }
    fs::write(file_path, Settings::default_file_contents())
        .with_context(|| format!("Failed to write settings file: {}", file_path.display()))?;

    Ok(true)
}

/// Let the user edit the settings file in their preferred text editor
fn edit_settings_file(file_path: &Path) -> Result<()> {
    if ensure_settings_file_exists(file_path)? {
        println!("Created new settings file: {}", file_path.display());
    }

    println!("Opening settings file for editing: {}", file_path.display());
    edit::edit_file(file_path)?;

    Ok(())
}

/// Load the settings file at `file_path`, returning a description of the outcome
fn check_settings_file(file_path: &Path) -> Result<String> {
    if !file_path.is_file() {
        return Ok(format!(
            "No settings file found at {}: defaults will be used",
            file_path.display()
        ));
    }

    Settings::load_from_path(file_path)
        .with_context(|| format!("Invalid settings file: {}", file_path.display()))?;

    Ok(format!("Settings file is valid: {}", file_path.display()))
}
