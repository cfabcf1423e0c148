use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tokio::net;

use crate::domain::device::ports::DeviceService;
use crate::inbound::http::handlers::{
    create_device::create_device, delete_device::delete_device, get_device::get_device,
    get_devices::get_devices, update_device::update_device,
};

mod handlers;
mod responses;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

#[derive(Debug, Clone)]
struct AppState<DS: DeviceService> {
    device_service: Arc<DS>,
}

pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    pub async fn new(
        device_service: impl DeviceService,
        config: HttpServerConfig<'_>,
    ) -> anyhow::Result<Self> {
        let router = router(device_service);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self
            .listener
            .local_addr()
            .context("failed to read listener address")?;
        tracing::info!("listening on {}", addr);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("received error from running server")?;

        Ok(())
    }
}

/// Builds the versioned device API around `device_service`, with request tracing applied.
pub fn router<DS: DeviceService>(device_service: DS) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    );

    let state = AppState {
        device_service: Arc::new(device_service),
    };

    axum::Router::new()
        .nest("/v1", api_routes::<DS>())
        .layer(trace_layer)
        .with_state(state)
}

fn api_routes<DS: DeviceService>() -> Router<AppState<DS>> {
    Router::new()
        .route(
            "/devices",
            get(get_devices::<DS>).post(create_device::<DS>),
        )
        .route(
            "/devices/{id}",
            get(get_device::<DS>)
                .put(update_device::<DS>)
                .delete(delete_device::<DS>),
        )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
