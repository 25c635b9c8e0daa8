//! lamco-aim-assist - Pointer correction controller
//!
//! Entry point for the command-line binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lamco_aim_assist::config::{Config, LogFormat, LoggingConfig};
use lamco_aim_assist::replay::Replayer;

/// Command-line arguments for lamco-aim-assist
#[derive(Parser, Debug)]
#[command(name = "lamco-aim-assist")]
#[command(version, about = "Debt-aware pointer correction controller", long_about = None)]
pub struct Args {
    /// Configuration file path (defaults are used when omitted)
    #[arg(short, long, env = "AIM_ASSIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long)]
    pub log_format: Option<LogFormat>,

    /// Write logs to file (in addition to stderr)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a JSON-lines input trace and print corrected positions
    Replay {
        /// Trace file ("-" for stdin)
        trace: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the resolved configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path),
        None => Ok(Config::default_config()),
    };
    let config = match config {
        Ok(config) => config.with_overrides(args.verbose, args.log_format),
        Err(e) => {
            eprintln!("{}", lamco_aim_assist::utils::format_user_error(&e));
            return Err(e);
        }
    };

    let mut logging = config.logging.clone();
    if let Some(path) = &args.log_file {
        logging.file = Some(path.clone());
    }
    init_logging(&logging)?;

    info!("lamco-aim-assist v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = run(&args.command, &config) {
        eprintln!("{}", lamco_aim_assist::utils::format_user_error(&e));
        return Err(e);
    }

    Ok(())
}

fn run(command: &Command, config: &Config) -> Result<()> {
    match command {
        Command::Replay { trace, output } => {
            let reader: Box<dyn io::BufRead> = if trace.as_os_str() == "-" {
                Box::new(io::stdin().lock())
            } else {
                let file = File::open(trace)
                    .with_context(|| format!("Failed to open trace: {}", trace.display()))?;
                Box::new(BufReader::new(file))
            };

            let writer: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(File::create(path).with_context(
                    || format!("Failed to create output: {}", path.display()),
                )?)),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };

            let mut replayer = Replayer::new(config.assist.clone())?;
            let summary = replayer.run(reader, writer)?;
            info!(
                "Corrected {} of {} ticks ({} retargets)",
                summary.stats.corrected_ticks, summary.stats.ticks, summary.stats.retargets
            );
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!(
            "lamco_aim_assist={level},lamco={level},warn",
            level = logging.level
        ))
    });

    // Logs go to stderr so replay output on stdout stays machine-readable
    if let Some(log_file_path) = &logging.file {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file: {}", log_file_path.display()))?;

        match logging.format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            LogFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path.display());
    } else {
        match logging.format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                    .init();
            }
            LogFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(io::stderr),
                    )
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(io::stderr),
                    )
                    .init();
            }
        }
    }

    Ok(())
}
