use anyhow::Context;
use labsimplifier::{api, config, inference::OpenAiResponsesClient, logging, processing};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::init_config().context("Failed to load configuration")?;
    logging::init_tracing();
    tracing::debug!(
        base_url = %config.openai_base_url,
        model = %config.openai_model,
        server_port = config.server_port,
        cors_allowed_origins = ?config.cors_allowed_origins,
        max_upload_bytes = config.max_upload_bytes,
        "Loaded configuration"
    );

    let client = OpenAiResponsesClient::from_config(config)
        .context("Failed to initialize inference client")?;
    let service = Arc::new(processing::SimplifyService::new(Arc::new(client)));
    let app = api::create_router(service, &api::ServerOptions::from(config))
        .context("Invalid CORS_ALLOWED_ORIGINS")?;

    let listener = bind_listener().await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn bind_listener() -> anyhow::Result<TcpListener> {
    let port = config::get_config().server_port;
    TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))
}
