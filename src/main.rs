use std::sync::Arc;

use ledgerscan::api::intake_router;
use ledgerscan::config::{ServiceConfig, APP_VERSION};
use ledgerscan::service::IntakeService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ledgerscan::init_tracing();
    tracing::info!("ledgerscan starting v{}", APP_VERSION);

    let config = ServiceConfig::from_env();
    let service = tokio::task::spawn_blocking({
        let config = config.clone();
        move || IntakeService::from_config(&config)
    })
    .await??;

    let router = intake_router(Arc::new(service));
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "Listening");
    axum::serve(listener, router).await?;
    Ok(())
}
