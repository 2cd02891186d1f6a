// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use readscan::app_config::{self, Config, InputConfig};
use readscan::timed::{read_timed_stream, TimedSummary};
use readscan::{Controller, TransformationChain};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recognize images and write configured outputs (default command)
    Run(RunArgs),

    /// Apply the configured transformations to a text file or stdin
    Render {
        /// Text file to transform; reads stdin when absent
        #[arg(value_name = "TEXT_FILE")]
        input: Option<PathBuf>,

        /// Use the transformations of output N (1-based) instead of the top-level ones
        #[arg(short, long)]
        output: Option<usize>,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Report word count and total duration of a timed stream
    TimedSummary {
        /// JSON-lines file written by a timed output
        #[arg(value_name = "STREAM")]
        path: PathBuf,
    },

    /// Generate shell completions for readscan
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Override the configured input directory
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// readscan - OCR for photographed pages with reading-aid transformations
#[derive(Parser, Debug)]
#[command(name = "readscan")]
#[command(version)]
#[command(about = "OCR of page images with reading-aid text transformations")]
#[command(long_about = "readscan recognizes text on page images and reshapes it for assisted reading.

EXAMPLES:
    readscan                                   # Run with conf.json
    readscan run -i scans/ -l debug            # Override input directory and log level
    readscan render chapter.txt                # Apply top-level transformations to a file
    readscan render -o 2 < chapter.txt         # Apply output 2's transformations to stdin
    readscan timed-summary out/words.jsonl     # Summarize a timed stream
    readscan completions bash > readscan.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file
    doesn't exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(LevelFilter::Trace)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is known
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "readscan", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::TimedSummary { path }) => {
            let pairs = read_timed_stream(&path)?;
            let summary = TimedSummary::from_pairs(&pairs);
            println!("{}: {}", path.display(), summary);
            Ok(())
        }
        Some(Commands::Render {
            input,
            output,
            config_path,
        }) => run_render(&config_path, input.as_deref(), output).await,
        Some(Commands::Run(args)) => run_pipeline(args).await,
        None => run_pipeline(cli.run).await,
    }
}

/// Load the config at `config_path`, writing a default one when it is missing
fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::load(config_path)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config
            .save(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        Ok(config)
    }
}

async fn run_pipeline(options: RunArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level((&level).into());
    }

    let mut config = load_or_create_config(&options.config_path)?;

    if let Some(input_dir) = options.input_dir {
        let InputConfig::Directory { input_directory, .. } = &mut config.input;
        *input_directory = input_dir;
    }
    if let Some(log_level) = options.log_level {
        config.log_level = log_level.into();
    } else {
        log::set_max_level((&config.log_level).into());
    }

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;

    let cancel = controller.cancellation_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current transformation stage");
            cancel.cancel();
        }
    });

    let results = controller.run().await?;
    info!("Done: {} result(s)", results.len());
    Ok(())
}

async fn run_render(config_path: &str, input: Option<&Path>, output: Option<usize>) -> Result<()> {
    let config = load_or_create_config(config_path)?;
    log::set_max_level((&config.log_level).into());

    let stages = match output {
        Some(index) => config
            .outputs
            .get(index.wrapping_sub(1))
            .with_context(|| format!("No output {} in {} (it has {})", index, config_path, config.outputs.len()))?
            .transformations(),
        None => config.transformations.as_slice(),
    };
    let chain = TransformationChain::from_configs(stages).context("Failed to build transformations")?;

    let text = match input {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    info!("Applying {} transformation(s): {}", chain.len(), chain.stage_names().join(", "));
    let rendered = chain.apply(&text).await?;
    let mut stdout = std::io::stdout();
    writeln!(stdout, "{}", rendered)?;
    Ok(())
}
