use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mindmap_core::llm::LlmConfig;
use mindmap_core::server::{AppState, ServerConfig, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .init();

    let llm = LlmConfig::from_env();
    let model = llm.model.clone();
    let state = AppState::from_llm_config(llm).context("building completion client")?;
    let app = create_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, %model, "mindmap server listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
