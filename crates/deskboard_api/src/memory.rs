use std::{
    cmp::Ordering,
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    time::Duration,
};

use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    ApiError, Collection, ListQuery, Page, Record, SortOrder, TableRecord,
};

/// A collection held in process memory. Searching, sorting and paging happen
/// "server side", the same way the content API does them.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    records: RwLock<Vec<Record>>,
    next_id: AtomicU64,
    latency: Option<Duration>,
}

impl MemoryCollection {
    #[must_use]
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: RwLock::new(records),
            next_id: AtomicU64::new(1),
            latency: None,
        }
    }

    /// Delay every call, to make loading states visible
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn allocate_id(&self) -> String {
        format!("mem-{}", self.next_id.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

/// Case-insensitive substring match against every field of the record
fn matches_search(record: &Record, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .iter()
        .filter_map(|(key, _)| record.field(key))
        .any(|text| text.to_lowercase().contains(needle))
}

/// Numbers compare numerically, everything else by its text; missing values
/// sort before present ones
fn compare_field(a: &Record, b: &Record, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), Some(_)) => a
            .field(field)
            .unwrap_or_default()
            .to_lowercase()
            .cmp(&b.field(field).unwrap_or_default().to_lowercase()),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait::async_trait]
impl Collection for MemoryCollection {
    async fn list(&self, query: &ListQuery) -> Result<Page, ApiError> {
        self.pause().await;
        let records = self.records.read().await;

        let needle = query.search.trim().to_lowercase();
        let mut matching = records
            .iter()
            .filter(|record| matches_search(record, &needle))
            .cloned()
            .collect::<Vec<_>>();

        matching.sort_by(|a, b| {
            let ordering = compare_field(a, b, &query.sort_field);
            match query.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        let total = matching.len();
        let limit = query.limit.get();
        let skip = query.page.saturating_sub(1).saturating_mul(limit);
        let records = matching.into_iter().skip(skip).take(limit).collect();

        Ok(Page { records, total })
    }

    async fn create(&self, record: &Record) -> Result<Option<Record>, ApiError> {
        self.pause().await;
        let mut stored = record.clone();
        if stored.row_id().is_none() {
            stored.insert("_id", self.allocate_id());
        }
        self.records.write().await.push(stored.clone());
        Ok(Some(stored))
    }

    async fn update(
        &self,
        id: &str,
        record: &Record,
    ) -> Result<Option<Record>, ApiError> {
        self.pause().await;
        let mut records = self.records.write().await;
        let existing = records
            .iter_mut()
            .find(|r| r.row_id().as_deref() == Some(id))
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;

        let id_field = existing.id_field();
        let mut patch = record.clone();
        if let Some(id_field) = id_field {
            patch.remove(id_field);
        }
        existing.merge(&patch);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.pause().await;
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| r.row_id().as_deref() == Some(id))
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        records.remove(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{PageLimit, QueryState};

    fn people() -> MemoryCollection {
        let names = ["Alice", "bob", "Charlie", "Diana", "Ethan", "Fiona", "George"];
        let records = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                Record::new()
                    .with("_id", format!("u{i}"))
                    .with("name", *name)
                    .with("email", format!("{}@example.com", name.to_lowercase()))
                    .with("createdAt", format!("2024-01-{:02}T00:00:00Z", i + 1))
            })
            .collect();
        MemoryCollection::new(records)
    }

    fn query(page: usize, limit: usize) -> QueryState {
        let mut query =
            QueryState::new(PageLimit::new(limit).expect("non-zero"));
        query.set_total(usize::MAX);
        query.set_page(page);
        query
    }

    #[tokio::test]
    async fn test_default_listing_is_newest_first_and_paged() {
        let collection = people();
        let page = collection.list(&query(1, 3).list_query()).await.expect("page");
        assert_eq!(page.total, 7);
        let names = page
            .records
            .iter()
            .filter_map(|r| r.field("name").map(|n| n.into_owned()))
            .collect::<Vec<_>>();
        assert_eq!(names, ["George", "Fiona", "Ethan"]);

        let last = collection.list(&query(3, 3).list_query()).await.expect("page");
        assert_eq!(last.records.len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_across_fields() {
        let collection = people();
        let mut q = query(1, 10);
        q.set_search("BOB@");
        let page = collection.list(&q.list_query()).await.expect("page");
        assert_eq!(page.total, 1);
        assert_eq!(page.records.first().and_then(Record::id).as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_sort_by_name_ascending_ignores_case() {
        let collection = people();
        let mut q = query(1, 2);
        q.set_sort_field("name");
        q.set_sort_order(SortOrder::Asc);
        let page = collection.list(&q.list_query()).await.expect("page");
        let ids = page.records.iter().filter_map(Record::id).collect::<Vec<_>>();
        assert_eq!(ids, ["u0", "u1"]);
    }

    #[tokio::test]
    async fn test_numeric_sort() {
        let collection = MemoryCollection::new(vec![
            Record::from_value(json!({ "_id": "a", "price": 10 })).expect("record"),
            Record::from_value(json!({ "_id": "b", "price": 9 })).expect("record"),
            Record::from_value(json!({ "_id": "c", "price": 100 })).expect("record"),
        ]);
        let mut q = query(1, 5);
        q.set_sort_field("price");
        q.set_sort_order(SortOrder::Asc);
        let page = collection.list(&q.list_query()).await.expect("page");
        let ids = page.records.iter().filter_map(Record::id).collect::<Vec<_>>();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_delete_removes() {
        let collection = people();
        let created = collection
            .create(&Record::new().with("name", "Hannah"))
            .await
            .expect("create")
            .expect("record");
        let id = created.id().expect("id");
        assert!(id.starts_with("mem-"));
        assert_eq!(collection.len().await, 8);

        collection.delete(&id).await.expect("delete");
        assert_eq!(collection.len().await, 7);
        assert!(matches!(
            collection.delete(&id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_identity() {
        let collection = people();
        let updated = collection
            .update("u2", &Record::new().with("_id", "hijack").with("name", "Chuck"))
            .await
            .expect("update")
            .expect("record");
        assert_eq!(updated.id().as_deref(), Some("u2"));
        assert_eq!(updated.field("name").as_deref(), Some("Chuck"));
        assert_eq!(
            updated.field("email").as_deref(),
            Some("charlie@example.com")
        );
    }
}
