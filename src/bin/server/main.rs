use devicemanager::config::Config;
use devicemanager::domain::device::service::Service;
use devicemanager::inbound::http::{HttpServer, HttpServerConfig};
use devicemanager::outbound::sqlite::Sqlite;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let sqlite = Sqlite::new(&config.database_url).await?;
    let device_service = Service::new(sqlite);

    let server_config = HttpServerConfig {
        port: &config.server_port,
    };

    let http_server = HttpServer::new(device_service, server_config).await?;

    http_server.run().await
}
