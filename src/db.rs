use std::time::Duration;

use anyhow::Context;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};

pub type PgPool = Pool<AsyncPgConnection>;

const MAX_POOL_SIZE: u32 = 16;
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_PERSONS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS persons (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        lastname TEXT NOT NULL,
        zipcode TEXT NOT NULL,
        city TEXT NOT NULL,
        color INTEGER NOT NULL
    )";

#[tracing::instrument(name = "database_pool_setup", skip(database_url))]
pub async fn establish_pool(database_url: &str) -> anyhow::Result<PgPool> {
    tracing::debug!("Initializing database connection pool");

    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);

    let pool = Pool::builder()
        .max_size(MAX_POOL_SIZE)
        .connection_timeout(CONNECTION_TIMEOUT)
        .idle_timeout(Some(Duration::from_secs(600)))
        .build(manager)
        .await
        .context("failed to create database connection pool")?;

    ensure_schema(&pool).await?;

    tracing::info!(
        max_size = MAX_POOL_SIZE,
        connection_timeout_secs = CONNECTION_TIMEOUT.as_secs(),
        "database connection established"
    );

    Ok(pool)
}

async fn ensure_schema(pool: &PgPool) -> anyhow::Result<()> {
    let mut conn = pool
        .get()
        .await
        .context("failed to check out a connection for schema setup")?;

    tokio::time::timeout(CONNECTION_TIMEOUT, conn.batch_execute(CREATE_PERSONS_TABLE))
        .await
        .context("schema setup timed out")?
        .context("failed to create persons table")?;

    Ok(())
}
