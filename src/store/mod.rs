use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Color, NewPerson, Person};

pub mod memory;
pub mod postgres;

pub use memory::MemoryPersonStore;
pub use postgres::PgPersonStore;

/// Upper bound for a single storage round trip.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    RecordNotFound,
    #[error("database error")]
    Database(#[source] diesel::result::Error),
    #[error("connection pool error: {0}")]
    Pool(String),
    #[error("storage call exceeded {0:?}")]
    Timeout(Duration),
}

impl From<diesel::result::Error> for StoreError {
    fn from(error: diesel::result::Error) -> Self {
        match error {
            diesel::result::Error::NotFound => StoreError::RecordNotFound,
            other => StoreError::Database(other),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence contract for person records.
///
/// `get_all` returns an empty list when nothing is stored, while
/// `get_all_by_color` reports [`StoreError::RecordNotFound`] for an empty match.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// Stores `person` and returns it with its newly assigned id.
    async fn insert(&self, person: NewPerson) -> StoreResult<Person>;

    async fn get(&self, id: i64) -> StoreResult<Person>;

    /// All persons ordered by ascending id.
    async fn get_all(&self) -> StoreResult<Vec<Person>>;

    /// Persons with the given colour ordered by ascending id.
    async fn get_all_by_color(&self, color: Color) -> StoreResult<Vec<Person>>;
}

pub type SharedStore = Arc<dyn PersonStore>;
