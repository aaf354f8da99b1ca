//! streamwatch CLI
//!
//! Rolling-window author, link and word reports over a message stream.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use streamwatch::{
    config::{Config, OutputFormat},
    core::{CycleController, StopReason, Ticker, SLOT_DURATION, WINDOW_SLOTS},
    feed::{open_input, FeedFilter, LineFeed, LineFeedConfig},
    sink::{ConsoleSink, JsonLinesSink, ReportSink},
    stats::create_shared_stats,
    VERSION,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "streamwatch")]
#[command(version = VERSION)]
#[command(about = "Rolling-window reports over a keyword-filtered message stream", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read records and print reports every minute
    Watch {
        /// Keyword by which to filter the records
        #[arg(long, short)]
        keyword: String,

        /// Read JSON lines from this file instead of stdin
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Stop after this many cycles (0 runs until interrupted)
        #[arg(long)]
        max_cycles: Option<u32>,

        /// Report output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Only keep records in this language
        #[arg(long, conflicts_with = "any_language")]
        lang: Option<String>,

        /// Keep records in every language
        #[arg(long)]
        any_language: bool,
    },

    /// Show configuration
    Config {
        /// Write the default configuration if no file exists yet
        #[arg(long)]
        init: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config, using defaults: {e}");
            Config::default()
        }
    };

    init_logging(&config.log_filter);

    match cli.command {
        Commands::Watch {
            keyword,
            input,
            max_cycles,
            format,
            lang,
            any_language,
        } => {
            let language = if any_language {
                None
            } else {
                lang.or_else(|| config.language.clone())
            };
            cmd_watch(
                &config,
                &keyword,
                input,
                max_cycles.unwrap_or(config.max_cycles),
                format.unwrap_or(config.output),
                language,
            )
        }
        Commands::Config { init } => cmd_config(&config, init),
    }
}

/// Logs go to stderr so reports on stdout stay clean.
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_watch(
    config: &Config,
    keyword: &str,
    input: Option<PathBuf>,
    max_cycles: u32,
    format: OutputFormat,
    language: Option<String>,
) -> anyhow::Result<()> {
    info!("streamwatch v{VERSION}");
    info!(
        keyword,
        language = language.as_deref().unwrap_or("any"),
        window_slots = WINDOW_SLOTS,
        slot_secs = SLOT_DURATION.as_secs(),
        max_cycles,
        "Starting"
    );

    let stats = create_shared_stats();

    let mut feed = LineFeed::new(
        LineFeedConfig {
            filter: FeedFilter::new(keyword, language.as_deref()),
            channel_capacity: config.channel_capacity,
        },
        stats.clone(),
    );
    let reader = open_input(input.as_deref())?;
    feed.start(reader).context("Failed to start feed")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;

    let sink: Box<dyn ReportSink> = match format {
        OutputFormat::Console => Box::new(ConsoleSink::stdout()),
        OutputFormat::Jsonl => Box::new(JsonLinesSink::stdout()),
    };

    info!("Generating reports... (first one in {}s)", SLOT_DURATION.as_secs());

    let mut controller = CycleController::new(sink, stats.clone(), max_cycles);
    let mut ticker = Ticker::new(SLOT_DURATION);
    let reason = controller.run(feed.receiver(), &mut ticker, &running);

    feed.stop();
    match reason {
        StopReason::MaxCycles => info!("Finished after {max_cycles} cycle(s)"),
        StopReason::Shutdown => warn!("Interrupted, stopping"),
    }

    eprintln!();
    eprintln!("{}", stats.summary());
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> anyhow::Result<()> {
    let path = Config::config_path();

    if init && !path.exists() {
        Config::default()
            .save()
            .with_context(|| format!("Could not write {}", path.display()))?;
        println!("Wrote default configuration to {path:?}");
    }

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {path:?}");
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
