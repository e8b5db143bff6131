//! Scribe CLI: structure whiteboard analyses and export them.
//!
//! Every operation is a subcommand; see `scribe --help`.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Scribe: turn whiteboard photos into structured meeting notes
#[derive(Parser, Debug)]
#[command(name = "scribe", version, about, long_about = None)]
struct Cli {
    /// Workspace directory
    #[arg(short, long, default_value = ".", global = true)]
    workspace: PathBuf,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Structure a raw vision analysis (JSON) into meeting content
    Structure {
        /// Raw analysis JSON file
        input: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract action items from free text
    Tasks {
        /// Text file (stdin when omitted or "-")
        input: Option<PathBuf>,
    },
    /// Extract key concepts from free text
    Concepts {
        /// Text file (stdin when omitted or "-")
        input: Option<PathBuf>,
    },
    /// Group the sections of a raw or structured document into topics
    Cluster {
        /// Raw analysis or structured content JSON file
        input: PathBuf,
    },
    /// Analyze a whiteboard photo with the vision model and structure it
    Analyze {
        /// Image file
        image: PathBuf,
        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        mime: Option<String>,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one or more documents
    Export {
        /// Format: markdown, pptx, mindmap, notion, confluence
        #[arg(short, long)]
        format: Option<String>,
        /// Project title
        #[arg(long)]
        title: Option<String>,
        /// Project description
        #[arg(long)]
        description: Option<String>,
        /// Format option as key=value (repeatable); values are parsed as JSON when possible
        #[arg(short = 'O', long = "option", value_parser = commands::parse_option)]
        options: Vec<(String, serde_json::Value)>,
        /// Raw analysis or structured content JSON files, one per whiteboard
        #[arg(required = true)]
        contents: Vec<PathBuf>,
        /// Output directory (defaults to the configured storage root)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List export formats and their options
    Formats,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "scribe", "scribe")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "scribe.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    commands::handle_command(cli.command, &workspace).await
}
