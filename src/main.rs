use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use interval_alarm::cli::args::{Cli, Commands};
use interval_alarm::cli::commands;
use interval_alarm::config::{ColorSetting, Config, Paths};

fn main() {
    // Logs go to stderr so the terminal view and JSON output stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new().context("resolving data directory")?;
    let config = Config::load_from_path(&paths.config_file).context("loading configuration")?;

    match config.general.color {
        ColorSetting::Always => colored::control::set_override(true),
        ColorSetting::Never => colored::control::set_override(false),
        ColorSetting::Auto => {}
    }
    let format = cli.output.unwrap_or(config.general.default_output);

    let output = match &cli.command {
        Commands::Run(args) => commands::run(&config, &paths, args, format)?,
        Commands::Status => commands::status(&paths, format)?,
        Commands::History { limit } => commands::history(&paths, *limit, format)?,
        Commands::Report { period } => commands::report(&paths, *period, format)?,
        Commands::Plan(timing) => commands::plan(&config, timing, format)?,
        Commands::Config(args) => commands::config(&config, &paths, &args.command, format)?,
        Commands::Clear { force } => commands::clear(&paths, *force, format)?,
        Commands::Completions { shell, install } => commands::completions(*shell, *install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
