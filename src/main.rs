mod config;
mod db;
mod errors;
mod import;
mod logging;
mod models;
mod response;
mod routes;
mod schema;
mod security;
mod server;
mod store;
mod validator;

use std::sync::Arc;

use clap::Parser;

use config::Config;
use routes::create_router;
use store::{MemoryPersonStore, PgPersonStore, SharedStore};
use validator::Validator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = Config::parse();

    let store: SharedStore = match config.database_url() {
        Some(url) => Arc::new(PgPersonStore::new(db::establish_pool(url).await?)),
        None => {
            tracing::warn!("DATABASE_URL is not set; persons are kept in memory only");
            Arc::new(MemoryPersonStore::new())
        }
    };

    if let Some(path) = config.csv_path() {
        let mut v = Validator::new();
        import::load_from_csv(store.as_ref(), &mut v, path).await;
        for (key, message) in v.errors() {
            tracing::warn!("[{key}]: {message}");
        }
    }

    let router = create_router(store);
    server::run(router, config.listen_addr(), config.shutdown_grace()).await
}
