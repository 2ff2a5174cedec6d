use anyhow::Result;
use clap::Parser;
use ingreai_server::ai::GeminiGenerationClient;
use ingreai_server::models::Config;
use ingreai_server::retry::RetryPolicy;
use ingreai_server::server::{router, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ingreai-server")]
#[command(about = "Streaming generation proxy for ingredient scanning")]
struct CliArgs {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ingreai_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ingreai-server");

    let args = CliArgs::parse();
    let config = Config::from_env()?;

    let state = AppState {
        generation: Arc::new(GeminiGenerationClient::new(
            config.gemini_api_key,
            config.gemini_model.clone(),
        )),
        retry: RetryPolicy::default(),
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Listening on {} (model: {})",
        listener.local_addr()?,
        config.gemini_model
    );

    axum::serve(listener, router(state)).await?;

    Ok(())
}
