use std::io;

use dotenvy::dotenv;
use marketplace_orders::{build_server, create_pool, run_migrations, AppConfig, AppState};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(
        &config.database_url,
        config.db_pool_size,
        config.statement_timeout_ms,
    )
    .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    run_migrations(&pool).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(
        AppState::new(pool, config.request_timeout),
        &config.host,
        config.port,
    )?
    .await
}
