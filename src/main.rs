//! Matrix Hub prompt relay
//!
//! Serves `POST /api/gemini`, which forwards a prompt to a Gemini model and
//! returns the generated text, and ships a terminal card client that fills
//! the matrix documentation cards through that relay.

mod api;
mod client;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::client::card::CardContent;
use crate::client::console::{render_deck, run_console};
use crate::client::{CardDeck, RelayClient};
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::provider::{Provider, ProviderType};
use crate::core::providers::{GeminiProvider, VertexAIProvider};
use crate::core::topics::{HUB_TITLE, TOPICS};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};

/// What the binary was asked to do
enum Command {
    Serve,
    Cards { relay_url: Option<String> },
    Help,
}

fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<Command> {
    let mut args = args.peekable();
    let mut command = Command::Serve;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--cards" => {
                command = Command::Cards {
                    relay_url: args.next_if(|a| !a.starts_with("--")),
                }
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }
    Ok(command)
}

#[tokio::main]
async fn main() {
    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            print_help();
            std::process::exit(2);
        }
    };

    if let Command::Help = command {
        print_help();
        return;
    }

    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.log_level);

    let outcome = match command {
        Command::Cards { relay_url } => run_cards(&config, relay_url).await,
        Command::Serve => serve(config).await,
        Command::Help => unreachable!("help is handled before configuration loads"),
    };

    if let Err(e) = outcome {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Build the provider selected by the configuration
fn build_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    config.validate()?;

    let provider: Arc<dyn Provider> = match config.provider {
        ProviderType::Gemini => Arc::new(GeminiProvider::new(
            config.gemini_api_key.clone().unwrap_or_default(),
            config.gemini_base_url.clone(),
            config.model.clone(),
            config.request_timeout,
        )?),
        ProviderType::VertexAI => Arc::new(VertexAIProvider::new(
            config.vertexai_project_id.clone().unwrap_or_default(),
            config.vertexai_location.clone(),
            config.vertexai_access_token.clone().unwrap_or_default(),
            config.vertexai_base_url.clone(),
            config.model.clone(),
            config.request_timeout,
        )?),
    };
    Ok(provider)
}

/// Run the relay server until it fails
async fn serve(config: Config) -> Result<()> {
    print_startup_banner(&config);

    let provider = build_provider(&config)?;
    info!("Using provider: {}", provider.provider_name());

    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(AppState {
        config: Arc::new(config),
        provider,
    });

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")
}

/// Fill every documentation card through the relay, print them, then let
/// the user expand and collapse cards from stdin
async fn run_cards(config: &Config, relay_url: Option<String>) -> Result<()> {
    let relay_url = relay_url.unwrap_or_else(|| config.relay_url.clone());
    let client = RelayClient::new(relay_url, config.request_timeout)?;
    info!("Fetching {} cards from {}", TOPICS.len(), client.relay_url());

    let mut deck = CardDeck::mount(Arc::new(client), &TOPICS);
    deck.settle().await;

    let failed = deck
        .cards()
        .iter()
        .filter(|c| *c.content() == CardContent::Failed)
        .count();
    if failed > 0 {
        warn!("{} of {} cards failed to load", failed, TOPICS.len());
    }

    let mut stdout = std::io::stdout();
    println!("{}\n", HUB_TITLE);
    render_deck(&deck, &mut stdout)?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let toggles = run_console(&mut deck, stdin, &mut stdout).await?;
    info!("Card session ended after {} toggles", toggles);

    deck.unmount();
    Ok(())
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🚀 {} relay v{}", HUB_TITLE, env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!("   Provider: {:?}", config.provider);
    println!("   Model: {}", config.model);
    println!("   Request Timeout: {}s", config.request_timeout);
    match config.max_prompt_chars {
        Some(limit) => println!("   Prompt Limit: {} chars", limit),
        None => println!("   Prompt Limit: none"),
    }
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("{} relay v{}", HUB_TITLE, env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: matrix-hub [OPTIONS]");
    println!();
    println!("Options:");
    println!("  (none)               Run the relay server");
    println!("  --cards [RELAY_URL]  Load every documentation card through a running relay,");
    println!("                       then toggle cards by number (q to quit)");
    println!("  --help               Display this help message");
    println!();
    println!("Configuration file (CONFIG_PATH, default ./config.toml, optional):");
    println!("  provider = \"gemini\" | \"vertexai\"");
    println!("  [gemini]   api_key, base_url");
    println!("  [vertexai] project_id, location, access_token, base_url");
    println!("  [model]    name (default: gemini-2.5-flash)");
    println!("  [server]   host (0.0.0.0), port (3000), log_level (info)");
    println!("  [request]  request_timeout (60), max_prompt_chars (unlimited)");
    println!("  [client]   relay_url (default: http://127.0.0.1:<port>/api/gemini)");
    println!();
    println!("Environment variables:");
    println!("  GEMINI_API_KEY / GOOGLE_API_KEY - Gemini API key (overrides the file)");
    println!("  VERTEXAI_ACCESS_TOKEN - GCP access token (overrides the file)");
    println!("  VERTEXAI_PROJECT_ID - Google Cloud project ID (overrides the file)");
    println!("  CONFIG_PATH - Configuration file path");
    println!("  RUST_LOG - Log filter, takes precedence over log_level");
}
