//! Document store boundary.
//!
//! The backing store is an enumerable set of named partitions, each holding
//! schema-free JSON records keyed by a UUID. Nothing above this module knows
//! how partitions are physically laid out.

pub mod postgres;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use postgres::PgDocumentStore;

/// A single record as it sits in a partition, before normalization.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: Uuid,
    pub body: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read-only access to the partitioned job store.
///
/// Carried in `AppState` as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of every partition currently present, in enumeration order.
    async fn list_partitions(&self) -> Result<Vec<String>, StoreError>;

    /// Every record in `partition`, in the store's natural retrieval order.
    async fn fetch_all(&self, partition: &str) -> Result<Vec<RawDocument>, StoreError>;

    async fn find_one(&self, partition: &str, id: Uuid)
        -> Result<Option<RawDocument>, StoreError>;
}

/// Parses an externally supplied identifier. `None` means the id can never
/// exist in the store, so callers can skip the round-trip entirely.
pub fn parse_document_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}
