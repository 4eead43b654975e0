use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use super::{DocumentStore, RawDocument, StoreError};

/// In-memory store used by tests. Partitions keep insertion order and every
/// store call is counted so tests can assert on round-trips.
#[derive(Default)]
pub struct InMemoryStore {
    partitions: Vec<(String, Vec<RawDocument>)>,
    failing_partition: Option<String>,
    unreachable: bool,
    calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_partition(mut self, name: &str, docs: Vec<serde_json::Value>) -> Self {
        let docs = docs
            .into_iter()
            .map(|body| RawDocument {
                id: Uuid::new_v4(),
                body,
            })
            .collect();
        self.partitions.push((name.to_string(), docs));
        self
    }

    pub fn with_document(mut self, name: &str, id: Uuid, body: serde_json::Value) -> Self {
        match self.partitions.iter_mut().find(|(p, _)| p == name) {
            Some((_, docs)) => docs.push(RawDocument { id, body }),
            None => self
                .partitions
                .push((name.to_string(), vec![RawDocument { id, body }])),
        }
        self
    }

    /// Every call fails as if the database were down.
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    /// Reads of this one partition fail; the rest of the store works.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing_partition = Some(name.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self, partition: Option<&str>) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        if partition.is_some() && partition == self.failing_partition.as_deref() {
            return Err(StoreError::Unavailable(format!(
                "read of partition '{}' failed",
                partition.unwrap_or_default()
            )));
        }
        Ok(())
    }

    fn partition(&self, name: &str) -> &[RawDocument] {
        self.partitions
            .iter()
            .find(|(p, _)| p == name)
            .map(|(_, docs)| docs.as_slice())
            .unwrap_or(&[])
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_partitions(&self) -> Result<Vec<String>, StoreError> {
        self.enter(None)?;
        Ok(self.partitions.iter().map(|(p, _)| p.clone()).collect())
    }

    async fn fetch_all(&self, partition: &str) -> Result<Vec<RawDocument>, StoreError> {
        self.enter(Some(partition))?;
        Ok(self.partition(partition).to_vec())
    }

    async fn find_one(
        &self,
        partition: &str,
        id: Uuid,
    ) -> Result<Option<RawDocument>, StoreError> {
        self.enter(Some(partition))?;
        Ok(self.partition(partition).iter().find(|d| d.id == id).cloned())
    }
}
