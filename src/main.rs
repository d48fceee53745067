//! Sentiment Analysis Service
//!
//! HTTP service and command-line tools for text sentiment scoring.

use clap::{Parser, Subcommand};
use sentiment_service::{
    analyzer::Analyzer,
    config::{Settings, DEFAULT_CONFIG_PATH},
    preprocessing, server,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "sentiment-service")]
#[command(about = "Text sentiment analysis over HTTP", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve,
    /// Score a piece of text and print the result
    Analyze {
        /// Text to analyze
        text: String,
    },
    /// Print the normalized form of a piece of text
    Normalize {
        /// Text to normalize
        text: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::load(Some(cli.config.as_str()))?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => server::serve(settings).await,
        Commands::Analyze { text } => analyze_text(settings, text).await,
        Commands::Normalize { text } => {
            println!("{}", preprocessing::normalize(&text)?);
            Ok(())
        }
    }
}

async fn analyze_text(settings: Settings, text: String) -> anyhow::Result<()> {
    let config = settings.analyzer_config();
    let shape = settings.response_shape;

    let output = tokio::task::spawn_blocking(move || {
        let analyzer = Analyzer::select(&config);
        tracing::info!(model_type = analyzer.model_type(), "Analyzer ready");
        let result = analyzer.predict(&text);
        result.to_json(shape.resolve(analyzer.native_naming()))
    })
    .await??;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
