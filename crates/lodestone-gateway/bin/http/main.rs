mod cli;

use crate::cli::{StorageBackendArg, CLI};
use anyhow::Context;
use clap::Parser;
use lodestone_core::SkuAllocator;
use lodestone_gateway::{App, AppState};
use lodestone_inventory::InventoryService;
use lodestone_sku::{Odometer, OdometerSettings};
use lodestone_storage::{InMemoryRepository, MySqlRepository};
use lodestone_telemetry::TelemetrySettings;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();

    let _telemetry = lodestone_telemetry::init(
        TelemetrySettings::builder()
            .service_name("lodestone-gateway")
            .log_format(config.log_format)
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    let odometer = Odometer::new(
        OdometerSettings::builder()
            .last_rack(config.last_rack)
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        last_sku = %odometer.last(),
        "starting gateway server"
    );

    let allocator: Arc<dyn SkuAllocator> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(InventoryService::with_odometer(
            InMemoryRepository::new(),
            odometer,
        )),
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(&mysql_dsn)
                .await
                .context("failed to connect to MySQL")?;
            if config.init_schema {
                repository.ensure_schema().await?;
                info!("products schema is ready");
            }
            Arc::new(InventoryService::with_odometer(repository, odometer))
        }
    };

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(AppState::new(allocator)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received");
}
