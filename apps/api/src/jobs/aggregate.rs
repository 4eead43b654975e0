//! Partition discovery, aggregation and cross-partition lookup.
//!
//! Every call reads the store fresh; there is no cache to invalidate.

use tracing::{debug, info};

use crate::jobs::model::CanonicalJob;
use crate::jobs::normalize::normalize;
use crate::store::{parse_document_id, DocumentStore, StoreError};

/// Reads every record of every partition and normalizes it.
///
/// Partitions are visited in enumeration order and records keep the store's
/// retrieval order. A failed read of any partition fails the whole call.
pub async fn aggregate_all(store: &dyn DocumentStore) -> Result<Vec<CanonicalJob>, StoreError> {
    let partitions = store.list_partitions().await?;
    let mut jobs = Vec::new();

    for partition in &partitions {
        let docs = store.fetch_all(partition).await?;
        debug!(partition = %partition, count = docs.len(), "Fetched partition");
        jobs.extend(docs.iter().map(|doc| normalize(partition, doc)));
    }

    info!(
        partitions = partitions.len(),
        jobs = jobs.len(),
        "Aggregated job listings"
    );
    Ok(jobs)
}

/// Resolves one record by id, probing partitions in enumeration order.
///
/// Returns `Ok(None)` without touching the store when `id` is not a valid
/// document id.
pub async fn find_by_id(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<CanonicalJob>, StoreError> {
    let Some(doc_id) = parse_document_id(id) else {
        debug!(id, "Rejected malformed job id");
        return Ok(None);
    };

    for partition in store.list_partitions().await? {
        if let Some(doc) = store.find_one(&partition, doc_id).await? {
            return Ok(Some(normalize(&partition, &doc)));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;
    use serde_json::json;
    use uuid::Uuid;

    fn sample_store() -> InMemoryStore {
        InMemoryStore::new()
            .with_partition(
                "Software Engineers",
                vec![
                    json!({"title": "Backend Engineer", "company_name": "Acme"}),
                    json!({"title": "Frontend Engineer", "company_name": "Globex"}),
                ],
            )
            .with_partition(
                "Data Science",
                vec![json!({"job_title": "ML Engineer", "company": "Initech"})],
            )
    }

    #[tokio::test]
    async fn test_aggregate_concatenates_partitions_in_order() {
        let store = sample_store();
        let jobs = aggregate_all(&store).await.unwrap();

        let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
        assert_eq!(titles, vec!["Backend Engineer", "Frontend Engineer", "ML Engineer"]);
        assert_eq!(jobs[0].collection, "Software Engineers");
        assert_eq!(jobs[2].collection, "Data Science");
    }

    #[tokio::test]
    async fn test_aggregate_twice_yields_same_ids() {
        let store = sample_store();
        let first = aggregate_all(&store).await.unwrap();
        let second = aggregate_all(&store).await.unwrap();

        let mut a: Vec<String> = first.into_iter().map(|j| j.id).collect();
        let mut b: Vec<String> = second.into_iter().map(|j| j.id).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_aggregate_empty_store_is_empty() {
        let jobs = aggregate_all(&InMemoryStore::new()).await.unwrap();
        assert!(jobs.is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_unreachable_store_fails() {
        let store = sample_store().unreachable();
        assert!(matches!(
            aggregate_all(&store).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_aggregate_single_partition_failure_fails_everything() {
        let store = sample_store().failing_on("Data Science");
        assert!(aggregate_all(&store).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_id_probes_until_found() {
        let target = Uuid::new_v4();
        let store = InMemoryStore::new()
            .with_partition("A", vec![json!({"title": "a"})])
            .with_partition("B", vec![json!({"title": "b"})])
            .with_document("C", target, json!({"title": "Found in C"}));

        let job = find_by_id(&store, &target.to_string())
            .await
            .unwrap()
            .expect("job in partition C");

        assert_eq!(job.title, "Found in C");
        assert_eq!(job.collection, "C");
        assert_eq!(job.id, target.to_string());
        // list + A miss + B miss + C hit
        assert_eq!(store.calls(), 4);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_none() {
        let store = sample_store();
        let result = find_by_id(&store, &Uuid::new_v4().to_string()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_malformed_id_skips_store() {
        let store = sample_store();
        let result = find_by_id(&store, "definitely-not-an-id").await.unwrap();
        assert!(result.is_none());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_find_by_id_matches_aggregate_record() {
        let store = sample_store();
        let all = aggregate_all(&store).await.unwrap();
        let found = find_by_id(&store, &all[1].id).await.unwrap().unwrap();
        assert_eq!(found, all[1]);
    }
}
