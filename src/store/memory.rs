use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{PersonStore, StoreError, StoreResult};
use crate::models::{Color, NewPerson, Person};

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, Person>,
}

/// Process-local store keyed by id. Ids start at 1 and never repeat.
#[derive(Debug, Default)]
pub struct MemoryPersonStore {
    inner: Mutex<Inner>,
}

impl MemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn insert(&self, person: NewPerson) -> StoreResult<Person> {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let stored = person.into_person(inner.last_id);
        inner.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> StoreResult<Person> {
        if id < 1 {
            return Err(StoreError::RecordNotFound);
        }
        let inner = self.inner.lock().await;
        inner
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::RecordNotFound)
    }

    async fn get_all(&self) -> StoreResult<Vec<Person>> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn get_all_by_color(&self, color: Color) -> StoreResult<Vec<Person>> {
        let inner = self.inner.lock().await;
        let persons: Vec<Person> = inner
            .rows
            .values()
            .filter(|person| person.color == color.code())
            .cloned()
            .collect();

        if persons.is_empty() {
            return Err(StoreError::RecordNotFound);
        }
        Ok(persons)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn new_person(name: &str, color: Color) -> NewPerson {
        NewPerson {
            name: name.to_string(),
            lastname: "Petersen".to_string(),
            zipcode: "18439".to_string(),
            city: "Stralsund".to_string(),
            color: color.code(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = MemoryPersonStore::new();
        let first = store.insert(new_person("a", Color::Blue)).await.unwrap();
        let second = store.insert(new_person("b", Color::Blue)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_get_round_trips_fields() {
        let store = MemoryPersonStore::new();
        let input = new_person("Peter", Color::Green);
        let stored = store.insert(input.clone()).await.unwrap();

        let fetched = store.get(stored.id).await.unwrap();
        assert_eq!(fetched, input.into_person(stored.id));
    }

    #[tokio::test]
    async fn test_get_rejects_missing_and_non_positive_ids() {
        let store = MemoryPersonStore::new();
        store.insert(new_person("a", Color::Blue)).await.unwrap();

        for id in [0, -1, 2] {
            assert!(matches!(
                store.get(id).await,
                Err(StoreError::RecordNotFound)
            ));
        }
    }

    #[tokio::test]
    async fn test_get_all_is_empty_not_error() {
        let store = MemoryPersonStore::new();
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_all_by_color_filters_in_id_order() {
        let store = MemoryPersonStore::new();
        for (name, color) in [
            ("a", Color::Blue),
            ("b", Color::Green),
            ("c", Color::Blue),
            ("d", Color::Yellow),
        ] {
            store.insert(new_person(name, color)).await.unwrap();
        }

        let blue: Vec<i64> = store
            .get_all_by_color(Color::Blue)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(blue, vec![1, 3]);

        assert!(matches!(
            store.get_all_by_color(Color::Red).await,
            Err(StoreError::RecordNotFound)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_get_unique_ids() {
        let store = Arc::new(MemoryPersonStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .insert(new_person(&format!("p{i}"), Color::Red))
                    .await
                    .unwrap()
                    .id
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, (1..=32).collect::<Vec<i64>>());
    }
}
