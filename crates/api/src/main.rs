use anyhow::Context;

use bastion_api::config::ApiConfig;
use bastion_infra::EngineConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bastion_observability::init();

    let engine = EngineConfig::from_env()?;
    let api = ApiConfig::from_env()?;

    let app = bastion_api::app::build_app(&engine).await?;

    let listener = tokio::net::TcpListener::bind(api.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", api.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        opening_balance = %engine.opening_balance,
        delay = ?engine.delay,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
