use devloan::config::Config;
use devloan::domain::device::service::Service as DeviceService;
use devloan::domain::loan::service::Service as LoanService;
use devloan::inbound::http::{HttpServer, HttpServerConfig};
use devloan::outbound::sqlite::Sqlite;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let sqlite = Sqlite::new(&config.database_url).await?;
    let device_service = DeviceService::new(sqlite.clone());
    let loan_service = LoanService::new(sqlite.clone(), sqlite);

    let server_config = HttpServerConfig {
        port: &config.server_port,
    };

    let http_server = HttpServer::new(device_service, loan_service, server_config).await?;

    http_server.run().await
}
