use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use travelsynth::{
    AppState, BudgetLevel, CompanionType, GeminiClient, GuideComposer, TravelPreferences,
    TravelSeason, TravelSynthConfig, TravelSynthError, markdown, telemetry, web,
};

/// Synthesize one grounded travel guide from several travel links
#[derive(Debug, Parser)]
#[command(name = "travelsynth", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output of this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the browser front-end and its JSON API
    Serve {
        /// Port to listen on, overrides server.port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one guide and print it to the terminal
    Generate {
        /// Source URL, repeat up to five times
        #[arg(long = "url", required = true, num_args = 1)]
        urls: Vec<String>,
        /// Economy, Comfort or Luxury
        #[arg(long)]
        budget: Option<BudgetLevel>,
        /// Off-peak, Shoulder or Peak
        #[arg(long)]
        season: Option<TravelSeason>,
        /// Solo, Couple, Family or Friends
        #[arg(long)]
        companion: Option<CompanionType>,
        /// Free-text focus for the guide
        #[arg(long, default_value = "")]
        notes: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<TravelSynthError>() {
                Some(app_err) => eprintln!("Error: {}", app_err.user_message()),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = TravelSynthConfig::load_from_path(cli.config.clone())?;
    telemetry::init(&config.logging, cli.verbose)?;

    match cli.command {
        Command::Serve { port } => serve(config, port).await,
        Command::Generate {
            urls,
            budget,
            season,
            companion,
            notes,
        } => {
            let preferences = TravelPreferences {
                budget,
                season,
                companion,
                additional_notes: notes,
            };
            generate(&config, &urls, &preferences).await
        }
    }
}

fn composer(config: &TravelSynthConfig) -> Result<GuideComposer> {
    let api_key = config.require_api_key()?;
    let client = GeminiClient::new(&config.gemini, api_key)?;
    Ok(GuideComposer::new(Arc::new(client)))
}

async fn serve(mut config: TravelSynthConfig, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    let state = AppState::new(
        composer(&config)?,
        Duration::from_millis(config.server.synthesizing_delay_ms),
    );
    web::run(&config.server, state).await
}

async fn generate(
    config: &TravelSynthConfig,
    urls: &[String],
    preferences: &TravelPreferences,
) -> Result<()> {
    if urls.len() > travelsynth::session::MAX_URL_SLOTS {
        return Err(TravelSynthError::validation(format!(
            "At most {} URLs can be combined into one guide",
            travelsynth::session::MAX_URL_SLOTS
        ))
        .into());
    }

    let guide = composer(config)?
        .generate_guide(urls, preferences)
        .await
        .context("Guide generation failed")?;

    let blocks = markdown::parse(&guide.markdown_content);
    println!("{}", markdown::to_terminal(&blocks));

    if !guide.sources.is_empty() {
        println!("Sources");
        println!("-------");
        for source in &guide.sources {
            println!("  • {} <{}>", source.title, source.uri);
        }
    }
    Ok(())
}
