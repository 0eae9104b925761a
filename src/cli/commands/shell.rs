//! Shell integration commands.

use clap_complete::Shell;

use crate::error::AlarmError;
use crate::features::shell::{completion_install_instructions, generate_completions};

/// Execute completions command.
///
/// # Errors
///
/// Returns an error if the script cannot be generated.
pub fn completions(shell: Shell, install: bool) -> Result<String, AlarmError> {
    if install {
        Ok(completion_install_instructions(shell))
    } else {
        generate_completions(shell)
    }
}
