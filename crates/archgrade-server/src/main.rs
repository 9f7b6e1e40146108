mod error;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use archgrade_core::JudgeSettings;
use archgrade_judge::Validator;

#[derive(Debug, Parser)]
#[command(name = "archgrade-server", version, about = "Score system design diagrams over HTTP")]
struct Cli {
    /// Address to bind
    #[arg(long, env = "ARCHGRADE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "ARCHGRADE_PORT", default_value_t = 8000)]
    port: u16,

    /// Allowed CORS origin (repeat or comma-separate for several)
    #[arg(
        long = "cors-origin",
        env = "ARCHGRADE_CORS_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:3000", "http://localhost:3001"]
    )]
    cors_origins: Vec<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "ARCHGRADE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Model provider (openai, anthropic, google, ollama, groq, mistral, deepseek)
    #[arg(long, env = "ARCHGRADE_LLM_PROVIDER")]
    llm_provider: Option<String>,

    /// API key for the model provider; without one only the rule engine runs
    #[arg(long, env = "ARCHGRADE_LLM_API_KEY", hide_env_values = true)]
    llm_api_key: Option<String>,

    /// Model name passed to the provider
    #[arg(long, env = "ARCHGRADE_LLM_MODEL")]
    llm_model: Option<String>,

    /// Upper bound on a single model call, in seconds
    #[arg(long, env = "ARCHGRADE_LLM_TIMEOUT_SECS")]
    llm_timeout_secs: Option<u64>,
}

impl Cli {
    /// Settings file values, overridden by any flag or environment variable.
    fn judge_settings(&self, mut settings: JudgeSettings) -> JudgeSettings {
        if let Some(provider) = &self.llm_provider {
            settings.provider = provider.clone();
        }
        if let Some(key) = &self.llm_api_key {
            settings.api_key = key.clone();
        }
        if let Some(model) = &self.llm_model {
            settings.model = model.clone();
        }
        if let Some(secs) = self.llm_timeout_secs {
            settings.timeout_secs = secs;
        }
        settings
    }

    fn cors_header_values(&self) -> Result<Vec<HeaderValue>> {
        self.cors_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin: {o}")))
            .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let settings = cli.judge_settings(archgrade_core::read_settings());
    let state = routes::AppState {
        validator: Arc::new(Validator::from_settings(&settings)),
    };
    let app = routes::router(state, cli.cors_header_values()?);

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("bind {}:{}", cli.host, cli.port))?;
    tracing::info!(addr = %listener.local_addr()?, "archgrade server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("archgrade server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
