use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process::ExitCode;

use fittrack::config::AppConfig;
use fittrack::logging::{init_logging, LogLevel};
use fittrack::{
    demo_packages, process, process_all, render, FitTrackError, InfoMessage, MessageLocale,
    OutputFormat, PackageReader, SensorPackage,
};

/// fittrack - Workout calculator CLI
///
/// Turns raw tracker packages (steps or strokes, duration, weight and
/// activity specific readings) into distance, mean speed and calories.
#[derive(Parser)]
#[command(name = "fittrack")]
#[command(author = "fittrack Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Workout distance, speed and calorie calculator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format (text, json)
    #[arg(short = 'f', long, global = true)]
    format: Option<OutputFormat>,

    /// Message language (en, ru)
    #[arg(short, long, global = true)]
    locale: Option<MessageLocale>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the built-in reference packages
    Demo,

    /// Process a single package
    Calc {
        /// Workout code (RUN, WLK, SWM)
        #[arg(short = 't', long = "type")]
        workout_type: String,

        /// Readings in package order, e.g. "15000,1,75"
        #[arg(short = 'd', long, allow_hyphen_values = true)]
        values: String,
    },

    /// Process every package in a CSV file
    Batch {
        /// Input file path
        #[arg(short = 'i', long)]
        file: PathBuf,

        /// Stop at the first bad package
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show or initialise the configuration file
    Config {
        /// Print the effective configuration
        #[arg(short, long)]
        show: bool,

        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let (label, message) = match e.downcast_ref::<FitTrackError>() {
                Some(err) => (err.severity().label(), err.user_message()),
                None => ("Error:", format!("{:#}", e)),
            };
            eprintln!("{} {}", label.red().bold(), message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.logging.level = LogLevel::from_verbosity(cli.verbose, config.logging.level);
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(locale) = cli.locale {
        config.output.locale = locale;
    }

    init_logging(&config.logging)?;

    match cli.command {
        Commands::Demo => {
            let messages = demo_packages()
                .iter()
                .map(process)
                .collect::<fittrack::Result<Vec<_>>>()?;
            print_messages(&messages, &config)?;
        }

        Commands::Calc {
            workout_type,
            values,
        } => {
            let values = SensorPackage::parse_values(&values).map_err(FitTrackError::from)?;
            let message = process(&SensorPackage::new(workout_type, values))?;
            print_messages(&[message], &config)?;
        }

        Commands::Batch { file, fail_fast } => {
            let packages = PackageReader::new().read_file(&file)?;
            let outcome = process_all(&packages, fail_fast)?;
            print_messages(&outcome.messages, &config)?;

            if !outcome.is_clean() {
                for (row, err) in &outcome.failures {
                    eprintln!(
                        "{} package {}: {}",
                        "Skipped".yellow().bold(),
                        row + 1,
                        err.user_message()
                    );
                }
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Config { show, init } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(AppConfig::default_config_path);

            if init {
                AppConfig::default()
                    .save_to_file(&path)
                    .with_context(|| "Failed to initialise configuration")?;
                println!(
                    "{} {}",
                    "✓ Configuration written to".green(),
                    path.display()
                );
            }
            if show || !init {
                print!("{}", config.to_toml()?);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_messages(messages: &[InfoMessage], config: &AppConfig) -> Result<()> {
    let rendered = render(messages, config.output.format, config.output.locale)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}
