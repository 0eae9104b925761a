use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;
use crate::core::{parse_duration, IntervalConfig};
use crate::error::AlarmError;
use crate::features::history::ReportPeriod;

#[derive(Parser)]
#[command(name = "interval-alarm")]
#[command(about = "A terminal interval timer with alternating alerts and music")]
#[command(long_about = "interval-alarm - an interval timer for the terminal

Runs a session of fixed-length intervals (10 x 3 minutes by default). Each
interval alternates between two alert sounds and two music tracks. The
countdown recovers from suspension: if the machine sleeps mid-session, the
skipped intervals are folded into one rollover when it wakes.

QUICK START:
  interval-alarm run                       Start a session in the terminal
  interval-alarm run --interval 90s -n 6   Six 90-second intervals
  interval-alarm status                    Show the session in progress
  interval-alarm report --period week      Summarize the last 7 days

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  interval-alarm <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Defaults to `general.default_output` from the config file.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run an interval session
    ///
    /// Opens a live countdown in the terminal. Keys: space pauses and
    /// resumes, `s` stops, `q` quits (the session is saved either way),
    /// `?` shows help.
    ///
    /// # Examples
    ///
    ///   interval-alarm run
    ///   interval-alarm run --interval 2m --intervals 5
    ///   interval-alarm run --headless       No UI, one line per interval
    #[command(alias = "r")]
    Run(RunArgs),

    /// Show the session in progress
    ///
    /// Reads the snapshot published by a running session and projects the
    /// countdown to the current time.
    #[command(alias = "s")]
    Status,

    /// List recent sessions
    History {
        /// Number of sessions to show
        #[arg(long, short = 'n', default_value = "10")]
        limit: usize,
    },

    /// Summarize sessions over a period
    Report {
        /// Period to report on
        #[arg(long, short = 'p', value_enum, default_value = "week")]
        period: ReportPeriod,
    },

    /// Preview the schedule of a session
    ///
    /// Prints each interval's start offset and its alert and music.
    Plan(TimingArgs),

    /// Show or initialize the configuration
    Config(ConfigArgs),

    /// Delete all session history
    Clear {
        /// Required; history cannot be recovered
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Generate shell completions
    ///
    /// Example: interval-alarm completions zsh > ~/.zsh/completions/_interval-alarm
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,

        /// Show installation instructions instead of the script
        #[arg(long, short = 'i')]
        install: bool,
    },
}

/// Arguments for `run`.
#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub timing: TimingArgs,

    /// Run without the terminal UI
    #[arg(long)]
    pub headless: bool,
}

/// Per-run overrides of the session timing.
#[derive(Args, Default)]
pub struct TimingArgs {
    /// Interval length (e.g. 3m, 90s, 1m30s; a bare number is seconds)
    #[arg(long, short = 'i')]
    pub interval: Option<String>,

    /// Number of intervals
    #[arg(
        long,
        short = 'n',
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_INTERVALS))
    )]
    pub intervals: Option<u32>,
}

/// Upper bound on intervals in one session.
pub const MAX_INTERVALS: u32 = 1000;

impl TimingArgs {
    /// Resolve the timing for this run, falling back to the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval length or count is invalid.
    pub fn resolve(&self, session: &SessionConfig) -> Result<IntervalConfig, AlarmError> {
        let interval_seconds = match self.interval.as_deref() {
            Some(text) => {
                let duration = parse_duration(text).ok_or_else(|| {
                    AlarmError::Parse(format!("Invalid interval '{text}' (try 3m or 90s)"))
                })?;
                u32::try_from(duration.num_seconds())
                    .map_err(|_| AlarmError::Parse(format!("Interval '{text}' is too long")))?
            }
            None => session.interval_seconds,
        };

        let total_intervals = self.intervals.unwrap_or(session.total_intervals);
        if !(1..=MAX_INTERVALS).contains(&total_intervals) {
            return Err(AlarmError::Parse(format!(
                "Interval count must be between 1 and {MAX_INTERVALS}, got {total_intervals}"
            )));
        }

        Ok(IntervalConfig::new(interval_seconds, total_intervals))
    }
}

/// Arguments for `config`.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_run_defaults() {
        let cli = Cli::try_parse_from(["interval-alarm", "run"]).unwrap();
        if let Commands::Run(args) = cli.command {
            assert!(args.timing.interval.is_none());
            assert!(args.timing.intervals.is_none());
            assert!(!args.headless);
        } else {
            panic!("Expected Run command");
        }
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_cli_run_with_timing() {
        let cli = Cli::try_parse_from([
            "interval-alarm",
            "run",
            "--interval",
            "90s",
            "-n",
            "4",
            "--headless",
        ])
        .unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.timing.interval.as_deref(), Some("90s"));
            assert_eq!(args.timing.intervals, Some(4));
            assert!(args.headless);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_global_output_flag() {
        let cli = Cli::try_parse_from(["interval-alarm", "history", "-o", "json"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::History { limit: 10 }));
    }

    #[test]
    fn test_cli_report_period() {
        let cli = Cli::try_parse_from(["interval-alarm", "report", "-p", "month"]).unwrap();
        if let Commands::Report { period } = cli.command {
            assert_eq!(period, ReportPeriod::Month);
        } else {
            panic!("Expected Report command");
        }

        let cli = Cli::try_parse_from(["interval-alarm", "report"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Report {
                period: ReportPeriod::Week
            }
        ));
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::try_parse_from(["interval-alarm", "config", "init", "--force"]).unwrap();
        if let Commands::Config(args) = cli.command {
            assert!(matches!(args.command, ConfigCommands::Init { force: true }));
        } else {
            panic!("Expected Config command");
        }
    }

    #[test]
    fn test_cli_completions_shell() {
        let cli = Cli::try_parse_from(["interval-alarm", "completions", "fish"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: Shell::Fish,
                install: false
            }
        ));
        assert!(Cli::try_parse_from(["interval-alarm", "completions", "tcsh"]).is_err());
    }

    #[test]
    fn test_timing_resolve_falls_back_to_config() {
        let session = SessionConfig::default();
        let config = TimingArgs::default().resolve(&session).unwrap();
        assert_eq!(config.interval_seconds(), 180);
        assert_eq!(config.total_intervals(), 10);
    }

    #[test]
    fn test_timing_resolve_overrides() {
        let timing = TimingArgs {
            interval: Some("1m30s".to_string()),
            intervals: Some(3),
        };
        let config = timing.resolve(&SessionConfig::default()).unwrap();
        assert_eq!(config.interval_seconds(), 90);
        assert_eq!(config.total_intervals(), 3);
    }

    #[test]
    fn test_timing_resolve_rejects_bad_input() {
        let session = SessionConfig::default();

        let timing = TimingArgs {
            interval: Some("soon".to_string()),
            intervals: None,
        };
        assert!(matches!(timing.resolve(&session), Err(AlarmError::Parse(_))));

        let timing = TimingArgs {
            interval: None,
            intervals: Some(0),
        };
        assert!(timing.resolve(&session).is_err());
    }

    #[test]
    fn test_timing_rejects_out_of_range() {
        let timing = TimingArgs {
            interval: Some("10000000000000000".to_string()),
            intervals: None,
        };
        assert!(matches!(
            timing.resolve(&SessionConfig::default()),
            Err(AlarmError::Parse(_))
        ));

        let huge = SessionConfig {
            total_intervals: 4_000_000_000,
            ..SessionConfig::default()
        };
        assert!(matches!(
            TimingArgs::default().resolve(&huge),
            Err(AlarmError::Parse(_))
        ));
    }

    #[test]
    fn test_cli_bounds_interval_count() {
        assert!(Cli::try_parse_from(["interval-alarm", "plan", "-n", "4000000000"]).is_err());
        assert!(Cli::try_parse_from(["interval-alarm", "plan", "-n", "0"]).is_err());
        assert!(Cli::try_parse_from(["interval-alarm", "plan", "-n", "1000"]).is_ok());
    }

    #[test]
    fn test_output_format_default() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Pretty));
    }
}
