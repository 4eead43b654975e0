use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{DocumentStore, RawDocument, StoreError};

/// Postgres-backed store. Every base table in `schema` is one partition;
/// each table carries `id UUID PRIMARY KEY` and `doc JSONB`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
    schema: String,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        Self {
            pool,
            schema: schema.into(),
        }
    }

    fn qualified(&self, partition: &str) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(partition))
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list_partitions(&self) -> Result<Vec<String>, StoreError> {
        let partitions = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = $1 AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
        )
        .bind(&self.schema)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        debug!(schema = %self.schema, count = partitions.len(), "Enumerated partitions");
        Ok(partitions)
    }

    async fn fetch_all(&self, partition: &str) -> Result<Vec<RawDocument>, StoreError> {
        let sql = format!("SELECT id, doc FROM {}", self.qualified(partition));
        let rows = sqlx::query_as::<_, (Uuid, serde_json::Value)>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        Ok(rows
            .into_iter()
            .map(|(id, body)| RawDocument { id, body })
            .collect())
    }

    async fn find_one(
        &self,
        partition: &str,
        id: Uuid,
    ) -> Result<Option<RawDocument>, StoreError> {
        let sql = format!("SELECT id, doc FROM {} WHERE id = $1", self.qualified(partition));
        let row = sqlx::query_as::<_, (Uuid, serde_json::Value)>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;

        Ok(row.map(|(id, body)| RawDocument { id, body }))
    }
}

/// Connection-level failures mean the store is unreachable; anything else
/// is a query error.
fn classify(err: sqlx::Error) -> StoreError {
    let unreachable = matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    );
    if unreachable {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Database(err)
    }
}

/// Quotes a Postgres identifier; partition names come from the catalog and
/// may contain spaces or mixed case.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
