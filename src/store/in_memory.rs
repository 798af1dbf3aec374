//! In-memory implementation of the [`SequenceStore`] contract.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, RwLock};

use super::SequenceStore;
use crate::error::{Error, Result};
use crate::model::{Metadata, Sequence, MAX_SAFE_VALUE};
use crate::serde::{decode_record, encode_key, encode_record};

/// In-memory sequence store backed by a map of encoded records.
///
/// Useful for testing and single-process deployments. Records are stored in
/// the same encoded form a durable backend would persist
/// (see [`crate::serde`]).
///
/// # Atomicity
///
/// A map-level `RwLock` guards membership (create/remove/lookup); each
/// record carries its own mutex, held across the read-modify-write of an
/// increment so racing allocations on one name cannot produce overlapping
/// ranges, while increments on distinct names proceed in parallel.
pub struct InMemorySequenceStore {
    records: RwLock<HashMap<Bytes, Arc<Mutex<Bytes>>>>,
}

impl InMemorySequenceStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Looks up the lock for a record, if the record exists.
    async fn record(&self, name: &str) -> Option<Arc<Mutex<Bytes>>> {
        let records = self.records.read().await;
        records.get(&encode_key(name)).cloned()
    }
}

impl Default for InMemorySequenceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SequenceStore for InMemorySequenceStore {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn find(&self, name: &str) -> Result<Option<Sequence>> {
        let record = match self.record(name).await {
            Some(record) => record,
            None => return Ok(None),
        };

        let encoded = record.lock().await;
        let (value, metadata) = decode_record(&encoded)?;
        Ok(Some(Sequence {
            name: name.to_string(),
            value,
            metadata,
        }))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn create_if_absent(
        &self,
        name: &str,
        initial_value: u64,
        metadata: Option<Metadata>,
    ) -> Result<(Sequence, bool)> {
        let key = encode_key(name);
        let mut records = self.records.write().await;

        if let Some(existing) = records.get(&key) {
            let encoded = existing.lock().await;
            let (value, metadata) = decode_record(&encoded)?;
            return Ok((
                Sequence {
                    name: name.to_string(),
                    value,
                    metadata,
                },
                false,
            ));
        }

        let encoded = encode_record(initial_value, &metadata)?;
        records.insert(key, Arc::new(Mutex::new(encoded)));
        Ok((
            Sequence {
                name: name.to_string(),
                value: initial_value,
                metadata,
            },
            true,
        ))
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn increment_and_get(&self, name: &str, delta: u64) -> Result<u64> {
        let record = self
            .record(name)
            .await
            .ok_or_else(|| Error::Storage(format!("sequence not found: {}", name)))?;

        // The record lock is held across the whole read-modify-write so the
        // bound check and the increment form one atomic step.
        let mut encoded = record.lock().await;
        let (value, metadata) = decode_record(&encoded)?;

        let advanced = value
            .checked_add(delta)
            .filter(|advanced| *advanced <= MAX_SAFE_VALUE)
            .ok_or(Error::SequenceOverflow)?;

        *encoded = encode_record(advanced, &metadata)?;
        Ok(value)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn remove(&self, name: &str) -> Result<()> {
        let mut records = self.records.write().await;
        records.remove(&encode_key(name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata(key: &str, value: &str) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(key.to_string(), value.into());
        metadata
    }

    #[tokio::test]
    async fn should_return_none_for_missing_sequence() {
        // given
        let store = InMemorySequenceStore::new();

        // when
        let result = store.find("missing").await.unwrap();

        // then
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn should_create_sequence_when_absent() {
        // given
        let store = InMemorySequenceStore::new();

        // when
        let (sequence, created) = store
            .create_if_absent("orders", 10, Some(metadata("info", "additional info")))
            .await
            .unwrap();

        // then
        assert!(created);
        assert_eq!(sequence.name, "orders");
        assert_eq!(sequence.value, 10);
        assert_eq!(sequence.metadata, Some(metadata("info", "additional info")));
    }

    #[tokio::test]
    async fn should_return_existing_sequence_unchanged() {
        // given
        let store = InMemorySequenceStore::new();
        store.create_if_absent("orders", 10, None).await.unwrap();

        // when - second create with different value and metadata
        let (sequence, created) = store
            .create_if_absent("orders", 99, Some(metadata("info", "ignored")))
            .await
            .unwrap();

        // then - first writer wins
        assert!(!created);
        assert_eq!(sequence.value, 10);
        assert!(sequence.metadata.is_none());
    }

    #[tokio::test]
    async fn should_return_pre_increment_value_and_advance() {
        // given
        let store = InMemorySequenceStore::new();
        store.create_if_absent("orders", 0, None).await.unwrap();

        // when
        let first = store.increment_and_get("orders", 13).await.unwrap();
        let second = store.increment_and_get("orders", 14).await.unwrap();

        // then
        assert_eq!(first, 0);
        assert_eq!(second, 13);
        let sequence = store.find("orders").await.unwrap().unwrap();
        assert_eq!(sequence.value, 27);
    }

    #[tokio::test]
    async fn should_preserve_metadata_across_increments() {
        // given
        let store = InMemorySequenceStore::new();
        store
            .create_if_absent("orders", 0, Some(metadata("info", "additional info")))
            .await
            .unwrap();

        // when
        store.increment_and_get("orders", 5).await.unwrap();

        // then
        let sequence = store.find("orders").await.unwrap().unwrap();
        assert_eq!(sequence.metadata, Some(metadata("info", "additional info")));
    }

    #[tokio::test]
    async fn should_reject_increment_past_ceiling_without_mutation() {
        // given
        let store = InMemorySequenceStore::new();
        store.create_if_absent("orders", 10, None).await.unwrap();

        // when - 10 + (MAX_SAFE_VALUE - 9) is one past the ceiling
        let result = store
            .increment_and_get("orders", MAX_SAFE_VALUE - 9)
            .await;

        // then
        assert_eq!(result, Err(Error::SequenceOverflow));
        let sequence = store.find("orders").await.unwrap().unwrap();
        assert_eq!(sequence.value, 10);
    }

    #[tokio::test]
    async fn should_reject_increment_that_overflows_u64() {
        // given
        let store = InMemorySequenceStore::new();
        store.create_if_absent("orders", 1, None).await.unwrap();

        // when
        let result = store.increment_and_get("orders", u64::MAX).await;

        // then
        assert_eq!(result, Err(Error::SequenceOverflow));
    }

    #[tokio::test]
    async fn should_error_when_incrementing_missing_sequence() {
        // given
        let store = InMemorySequenceStore::new();

        // when
        let result = store.increment_and_get("missing", 1).await;

        // then
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn should_remove_sequence_idempotently() {
        // given
        let store = InMemorySequenceStore::new();
        store.create_if_absent("orders", 0, None).await.unwrap();

        // when
        store.remove("orders").await.unwrap();
        let again = store.remove("orders").await;

        // then
        assert!(again.is_ok());
        assert!(store.find("orders").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_keep_distinct_names_independent() {
        // given
        let store = InMemorySequenceStore::new();
        store.create_if_absent("orders", 0, None).await.unwrap();
        store.create_if_absent("invoices", 100, None).await.unwrap();

        // when
        store.increment_and_get("orders", 5).await.unwrap();

        // then
        assert_eq!(store.find("orders").await.unwrap().unwrap().value, 5);
        assert_eq!(store.find("invoices").await.unwrap().unwrap().value, 100);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_serialize_concurrent_increments_on_one_name() {
        // given
        let store = Arc::new(InMemorySequenceStore::new());
        store.create_if_absent("orders", 0, None).await.unwrap();

        // when - 100 concurrent increments of 7
        let tasks: Vec<_> = (0..100)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.increment_and_get("orders", 7).await.unwrap() })
            })
            .collect();
        let mut starts = Vec::new();
        for task in tasks {
            starts.push(task.await.unwrap());
        }

        // then - pre-increment values tile [0, 700) with no gaps or overlaps
        starts.sort_unstable();
        for (i, start) in starts.iter().enumerate() {
            assert_eq!(*start, i as u64 * 7);
        }
        assert_eq!(store.find("orders").await.unwrap().unwrap().value, 700);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn should_elect_single_winner_under_concurrent_creation() {
        // given
        let store = Arc::new(InMemorySequenceStore::new());

        // when - 100 concurrent racing creates
        let tasks: Vec<_> = (0..100)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.create_if_absent("orders", 100, None).await.unwrap()
                })
            })
            .collect();
        let mut created_count = 0;
        for task in tasks {
            let (sequence, created) = task.await.unwrap();
            assert_eq!(sequence.value, 100);
            if created {
                created_count += 1;
            }
        }

        // then - exactly one insert won
        assert_eq!(created_count, 1);
    }
}
