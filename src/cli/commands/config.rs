//! Config command implementation.

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::{Config, Paths};
use crate::error::AlarmError;
use crate::output::to_json;

/// Execute config subcommands.
///
/// # Errors
///
/// Returns an error if the configuration cannot be serialized or written.
pub fn config(
    config: &Config,
    paths: &Paths,
    cmd: &ConfigCommands,
    format: OutputFormat,
) -> Result<String, AlarmError> {
    match cmd {
        ConfigCommands::Show => match format {
            OutputFormat::Json => to_json(config),
            OutputFormat::Pretty => Ok(serde_yaml::to_string(config)?),
        },

        ConfigCommands::Path => Ok(paths.config_file.display().to_string()),

        ConfigCommands::Init { force } => {
            if paths.config_file.exists() && !force {
                return Err(AlarmError::Config(format!(
                    "{} already exists; use --force to overwrite",
                    paths.config_file.display()
                )));
            }
            paths.ensure_dirs()?;
            Config::default().save_to_path(&paths.config_file)?;
            Ok(format!(
                "Wrote default configuration to {}",
                paths.config_file.display()
            ))
        }
    }
}
