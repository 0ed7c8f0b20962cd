use std::future::Future;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::{PersonStore, QUERY_TIMEOUT, StoreError, StoreResult};
use crate::db::PgPool;
use crate::models::{Color, NewPerson, Person};
use crate::schema::persons;

#[derive(Clone)]
pub struct PgPersonStore {
    pool: PgPool,
}

impl PgPersonStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn bounded<T, F>(query: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::time::timeout(QUERY_TIMEOUT, query)
        .await
        .map_err(|_| StoreError::Timeout(QUERY_TIMEOUT))?
}

#[async_trait]
impl PersonStore for PgPersonStore {
    #[tracing::instrument(name = "persons_insert", skip_all)]
    async fn insert(&self, person: NewPerson) -> StoreResult<Person> {
        bounded(async {
            let mut conn = self
                .pool
                .get()
                .await
                .map_err(|err| StoreError::Pool(err.to_string()))?;

            let id: i64 = diesel::insert_into(persons::table)
                .values(&person)
                .returning(persons::id)
                .get_result(&mut conn)
                .await?;

            Ok::<_, StoreError>(person.into_person(id))
        })
        .await
    }

    #[tracing::instrument(name = "persons_get", skip(self))]
    async fn get(&self, id: i64) -> StoreResult<Person> {
        if id < 1 {
            return Err(StoreError::RecordNotFound);
        }

        bounded(async {
            let mut conn = self
                .pool
                .get()
                .await
                .map_err(|err| StoreError::Pool(err.to_string()))?;

            let person: Person = persons::table
                .find(id)
                .select(Person::as_select())
                .first(&mut conn)
                .await?;

            Ok::<_, StoreError>(person)
        })
        .await
    }

    #[tracing::instrument(name = "persons_get_all", skip(self))]
    async fn get_all(&self) -> StoreResult<Vec<Person>> {
        bounded(async {
            let mut conn = self
                .pool
                .get()
                .await
                .map_err(|err| StoreError::Pool(err.to_string()))?;

            let persons: Vec<Person> = persons::table
                .order(persons::id.asc())
                .select(Person::as_select())
                .load(&mut conn)
                .await?;

            Ok::<_, StoreError>(persons)
        })
        .await
    }

    #[tracing::instrument(name = "persons_get_all_by_color", skip(self))]
    async fn get_all_by_color(&self, color: Color) -> StoreResult<Vec<Person>> {
        let persons: Vec<Person> = bounded(async {
            let mut conn = self
                .pool
                .get()
                .await
                .map_err(|err| StoreError::Pool(err.to_string()))?;

            let persons: Vec<Person> = persons::table
                .filter(persons::color.eq(color.code()))
                .order(persons::id.asc())
                .select(Person::as_select())
                .load(&mut conn)
                .await?;

            Ok::<_, StoreError>(persons)
        })
        .await?;

        if persons.is_empty() {
            return Err(StoreError::RecordNotFound);
        }
        Ok(persons)
    }
}
