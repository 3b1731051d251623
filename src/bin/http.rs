#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use result_dashboard::{Dashboard, DashboardConfig, SqliteStudentStore, http_api};

    result_dashboard::init_tracing();

    let config = DashboardConfig::load()?;
    let addr: SocketAddr = config.http_addr.parse()?;
    let db_path = config.database_path();
    let store = SqliteStudentStore::new(&db_path)?;
    tracing::info!(database = %db_path.display(), "opened student store");

    tracing::info!("result dashboard HTTP API listening on http://{addr}");
    let dashboard = Dashboard::from_config(store, &config);
    http_api::serve(addr, dashboard).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
