//! UICP - Command-line Surface for the UI Context Protocol
//!
//! Runs the agent-side tools against the component registry and renders
//! agent output containing UICP blocks as terminal cards.
//!
//! # Usage
//!
//! ```bash
//! # What can the agent embed?
//! uicp discover --type sports
//!
//! # Build a block the way the agent's tool call would
//! uicp construct --uid NBAGameScore \
//!     --data '{"homeTeam":"Lakers","awayTeam":"Celtics","homeScore":112,"awayScore":108}'
//!
//! # Render a saved response
//! uicp render response.md
//!
//! # Render a response as it streams in
//! ollama run llama3.2 "..." | uicp stream
//!
//! # Verbose logging (stderr)
//! RUST_LOG=uicp_core=debug uicp render response.md
//! ```
//!
//! # Environment Variables
//!
//! - `UICP_CONFIG`: Configuration file path
//! - `UICP_DEFINITIONS`: Component definitions document
//! - `UICP_MAX_BUFFER_BYTES`: Per-message buffer limit
//! - `UICP_LOG`: Default log filter
//! - `RUST_LOG`: Log filter, overrides everything else

mod output;
mod renderers;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, info};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use uicp_core::{
    load_config, load_config_from_path, ComponentResolver, Composer, ConfigOverrides,
    ContentSegment, DiscoverParams, StreamingMessage, ToolSet, UicpConfig, CONSTRUCT_TOOL_NAME,
    DEFAULT_LOG_FILTER, DISCOVER_TOOL_NAME,
};

use output::{format_segments, segments_json, segments_json_line};
use renderers::register_builtin_renderers;

/// UICP - discover, construct and render embedded UI components
#[derive(Parser, Debug)]
#[command(name = "uicp")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "UICP_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Component definitions document (overrides the configured one)
    #[arg(short = 'd', long, value_name = "FILE", global = true)]
    definitions: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Query available components (get_ui_components)
    Discover {
        /// Filter by category (sports, news, chart, ...)
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        component_type: Option<String>,

        /// Look up one component; wins over --type
        #[arg(short = 'u', long)]
        uid: Option<String>,
    },

    /// Validate data and print a UICP block (create_ui_component)
    Construct {
        /// Component identifier
        #[arg(short = 'u', long)]
        uid: String,

        /// Component data as a JSON object
        #[arg(long, value_name = "JSON")]
        data: String,
    },

    /// Compose a complete message read from a file or stdin
    Render {
        /// Message file; stdin when omitted
        file: Option<PathBuf>,

        /// Print segments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compose stdin line by line as it arrives
    Stream {
        /// Print one JSON array of segments per update
        #[arg(long)]
        json: bool,
    },

    /// Print the tool descriptors for an agent runtime
    Tools,
}

/// Log filter from `RUST_LOG`, falling back to `default_filter`
fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("Invalid log filter: {default_filter}"))
}

/// Formatting subscriber writing to `writer`
///
/// Logs go to stderr in the binary so stdout stays machine-readable.
fn log_subscriber<W>(filter: EnvFilter, writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(writer)
        .finish()
}

/// Load configuration with a start-up subscriber installed
///
/// The configured log filter is only known afterwards, so loader diagnostics
/// (such as ignored environment values) go through `startup` instead.
fn resolve_config_logged<S>(args: &Args, startup: S) -> Result<UicpConfig>
where
    S: tracing::Subscriber + Send + Sync + 'static,
{
    tracing::subscriber::with_default(startup, || resolve_config(args))
}

/// Load configuration and apply command-line overrides
fn resolve_config(args: &Args) -> Result<UicpConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from_path(Some(path.clone())),
        None => load_config(),
    }
    .context("Failed to load configuration")?;

    let mut overrides = ConfigOverrides::new();
    if let Some(ref path) = args.definitions {
        overrides = overrides.with_definitions_path(path.clone());
    }
    overrides.apply(&mut config)?;

    Ok(config)
}

fn payload_succeeded(payload: &Value) -> bool {
    payload["success"] == json!(true)
}

/// Print a tool payload; failure payloads exit non-zero
fn print_payload(payload: &Value) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(if payload_succeeded(payload) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read stdin")?;
            Ok(content)
        }
    }
}

fn print_segments(segments: &[ContentSegment], json: bool) -> Result<()> {
    if json {
        println!("{}", segments_json(segments)?);
    } else {
        println!("{}", format_segments(segments));
    }
    Ok(())
}

async fn render(message: &mut StreamingMessage, file: Option<&Path>, json: bool) -> Result<()> {
    let content = read_input(file).await?;
    message.push(&content)?;
    print_segments(&message.finish(), json)
}

async fn stream(message: &mut StreamingMessage, json: bool) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(stdin.lines());
    let mut last: Option<Vec<ContentSegment>> = None;
    let mut updates = 0usize;

    let mut emit = |segments: Vec<ContentSegment>| -> Result<()> {
        if last.as_ref() == Some(&segments) {
            return Ok(());
        }
        updates += 1;
        if json {
            println!("{}", segments_json_line(&segments)?);
        } else {
            println!("── update {updates} ──");
            println!("{}", format_segments(&segments));
        }
        last = Some(segments);
        Ok(())
    };

    while let Some(line) = lines.next().await {
        let line = line.context("Failed to read stdin")?;
        let segments = message.push(&format!("{line}\n"))?;
        emit(segments)?;
    }

    emit(message.finish())?;
    debug!(updates, "Stream finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let startup = log_subscriber(env_filter(DEFAULT_LOG_FILTER)?, std::io::stderr);
    let config = resolve_config_logged(&args, startup)?;
    tracing::subscriber::set_global_default(log_subscriber(
        env_filter(&config.log_filter)?,
        std::io::stderr,
    ))
    .context("Failed to install log subscriber")?;

    info!(source = %config.source(), "Configuration resolved");

    let registry = Arc::new(
        config
            .load_registry()
            .context("Failed to load component registry")?,
    );
    info!(
        version = registry.version(),
        components = registry.len(),
        "Component registry ready"
    );

    let tools = ToolSet::new(Arc::clone(&registry));

    match args.command {
        Command::Discover {
            component_type,
            uid,
        } => {
            let params = serde_json::to_value(DiscoverParams {
                component_type,
                uid,
            })?;
            print_payload(&tools.call(DISCOVER_TOOL_NAME, params)?)
        }
        Command::Construct { uid, data } => {
            let data: Value =
                serde_json::from_str(&data).context("--data is not valid JSON")?;
            let payload = tools.call(CONSTRUCT_TOOL_NAME, json!({ "uid": uid, "data": data }))?;
            print_payload(&payload)
        }
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&tools.descriptors())?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Render { file, json } => {
            let mut message = new_message(&registry, &config);
            render(&mut message, file.as_deref(), json).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Stream { json } => {
            let mut message = new_message(&registry, &config);
            stream(&mut message, json).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn new_message(registry: &Arc<uicp_core::Registry>, config: &UicpConfig) -> StreamingMessage {
    let resolver = ComponentResolver::new();
    register_builtin_renderers(&resolver);
    let composer = Composer::new(Arc::clone(registry), resolver);
    StreamingMessage::with_limit(composer, config.max_buffer_bytes)
}
