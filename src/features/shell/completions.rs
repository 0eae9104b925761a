//! Shell completions generation.

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::args::Cli;
use crate::error::AlarmError;

const BIN_NAME: &str = "interval-alarm";

/// Generate the completion script for a shell.
///
/// # Errors
///
/// Returns an error if the generated script is not valid UTF-8.
pub fn generate_completions(shell: Shell) -> Result<String, AlarmError> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).map_err(|e| AlarmError::Parse(format!("UTF-8 error: {e}")))
}

/// Installation instructions for a shell's completion script.
#[must_use]
pub fn completion_install_instructions(shell: Shell) -> String {
    match shell {
        Shell::Bash => r"# Add to ~/.bashrc:
source <(interval-alarm completions bash)
"
        .to_string(),

        Shell::Zsh => r"# Save to your fpath:
interval-alarm completions zsh > ~/.zsh/completions/_interval-alarm
# Then add to ~/.zshrc (before compinit):
fpath=(~/.zsh/completions $fpath)
"
        .to_string(),

        Shell::Fish => r"# Save to fish completions directory:
interval-alarm completions fish > ~/.config/fish/completions/interval-alarm.fish
"
        .to_string(),

        Shell::PowerShell => r"# Add to your PowerShell profile ($PROFILE):
interval-alarm completions powershell | Out-String | Invoke-Expression
"
        .to_string(),

        _ => format!("# Write the script somewhere your shell loads it:\ninterval-alarm completions {shell}\n"),
    }
}
