use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use recycle_guide::api::ApiServerBuilder;
use recycle_guide::{AudioMode, Config, RecyclePipeline, SummaryStrategyKind};

/// Recycle Guide - photo-to-recycling-guidance web backend
#[derive(Parser)]
#[command(name = "recycle-guide", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to ~/.config/recycle-guide/config.toml)
    #[arg(short, long, env = "RECYCLE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides PORT and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding index.html and static assets
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Voice summary strategy: "model" or "extract"
    #[arg(long)]
    summary: Option<SummaryStrategyKind>,

    /// Audio delivery: "inline" (with the analysis) or "split" (separate endpoint)
    #[arg(long)]
    audio_mode: Option<AudioMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the voice summary for a guidance report file
    Summarize {
        /// Report file; use "-" for stdin
        path: PathBuf,
    },
    /// List the speech service's voices and the one that would be used
    Voices,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,recycle_guide=info",
        1 => "info,recycle_guide=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(dir) = cli.static_dir {
        config.server.static_dir = dir;
    }
    if let Some(kind) = cli.summary {
        config.summary_strategy = kind;
    }
    if let Some(mode) = cli.audio_mode {
        config.audio_mode = mode;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::Summarize { path } => summarize(&config, &path).await,
        Command::Voices => list_voices(&config).await,
    }
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        port = config.server.port,
        summary = %config.summary_strategy,
        audio_mode = %config.audio_mode,
        "starting recycle guide"
    );

    if !config.server.static_dir.join("index.html").exists() {
        tracing::warn!(
            path = %config.server.static_dir.display(),
            "index.html not found, landing page will 404"
        );
    }

    ApiServerBuilder::from_config(config)?.build().run().await?;
    Ok(())
}

async fn summarize(config: &Config, path: &std::path::Path) -> anyhow::Result<()> {
    let report = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        tokio::fs::read_to_string(path).await?
    };

    let pipeline = RecyclePipeline::from_config(config)?;
    let summary = pipeline.voice_summary(&report).await?;
    println!("{summary}");
    Ok(())
}

async fn list_voices(config: &Config) -> anyhow::Result<()> {
    let pipeline = RecyclePipeline::from_config(config)?;
    let (catalog, selected) = pipeline.speech().resolve_voice().await?;

    for voice in &catalog {
        let marker = if voice.voice_id == selected { "*" } else { " " };
        println!("{marker} {:<24} {}", voice.name, voice.voice_id);
    }
    println!(
        "\npreferred: {}",
        pipeline.speech().preferred_voices().join(", ")
    );
    Ok(())
}
