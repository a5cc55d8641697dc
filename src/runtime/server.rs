//! Server mode
//!
//! Prepares the store, then serves the shortening and redirect endpoints.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api;
use crate::api::middleware::RequestTrace;
use crate::api::services::AppStartTime;
use crate::config::StaticConfig;
use crate::runtime::startup;

/// Run the HTTP server until it stops or a shutdown signal arrives.
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: StaticConfig) -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = startup::prepare_server_startup(&config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;
    let service = startup.service;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestTrace)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .configure(api::configure)
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    // actix 自带 SIGINT/SIGTERM 处理，收到信号后优雅退出
    server.bind(&bind_address)?.run().await?;

    warn!("Server stopped");
    Ok(())
}
