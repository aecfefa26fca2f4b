//! In-memory storage implementation for the document store.
//!
//! Documents are held as BSON values in nested HashMaps behind an
//! async-aware read-write lock.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{Bson, Uuid};
use mea::rwlock::RwLock;

use rolodex_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    query::{Expr, Projection, Query, SortDirection},
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type CollectionMap = HashMap<String, Bson>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// Cloning is cheap and clones share the same underlying data, so the same
/// store can be handed to multiple tasks. Queries scan every document in a
/// collection; fine for development, testing, and small datasets.
///
/// # Example
///
/// ```ignore
/// use rolodex_memory::InMemoryStore;
/// use rolodex_core::backend::StoreBackend;
/// use bson::{Uuid, Bson, doc};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     let id = Uuid::new();
///     let doc = Bson::Document(doc! { "name": "Alice", "age": 30 });
///     store.insert_one(id, doc, "people").await?;
///
///     assert!(store.find_by_id(id, "people").await?.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    fn insert_into(
        collection_map: &mut CollectionMap,
        id: Uuid,
        document: Bson,
        collection: &str,
    ) -> StoreResult<()> {
        let key = id.to_string();

        if collection_map.contains_key(&key) {
            return Err(StoreError::DocumentAlreadyExists(key, collection.to_string()));
        }

        collection_map.insert(key, document);

        Ok(())
    }

    fn sort_documents(documents: &mut [Bson], field: &str, direction: &SortDirection) {
        documents.sort_by(|a, b| {
            let left = a
                .as_document()
                .and_then(|doc| doc.get(field))
                .map(Comparable::from)
                .unwrap_or(Comparable::Null);
            let right = b
                .as_document()
                .and_then(|doc| doc.get(field))
                .map(Comparable::from)
                .unwrap_or(Comparable::Null);

            match direction {
                SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
            }
        });
    }

    fn project_document(document: Bson, projection: &Projection) -> Bson {
        match document {
            Bson::Document(map) => Bson::Document(
                map.into_iter()
                    .filter(|(key, _)| projection.retains(key))
                    .collect(),
            ),
            other => other,
        }
    }

    fn merge_patch(document: &mut Bson, patch: &bson::Document) {
        if let Some(map) = document.as_document_mut() {
            for (key, value) in patch {
                map.insert(key.clone(), value.clone());
            }
        }
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_one(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        Self::insert_into(collection_map, id, document, collection)
    }

    async fn insert_many(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        // Sequential: a failure partway through leaves earlier inserts in
        // place. Callers get the failure as-is.
        for (id, document) in documents {
            Self::insert_into(collection_map, id, document, collection)?;
        }

        Ok(())
    }

    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = match &query.filter {
            Some(filter) => collection_map
                .values()
                .filter(|doc| DocumentEvaluator::matches(doc, filter))
                .cloned()
                .collect::<Vec<_>>(),
            None => collection_map
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        if let Some(sort) = &query.sort {
            Self::sort_documents(&mut documents, &sort.field, &sort.direction);
        }

        let mut documents = documents
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect::<Vec<_>>();

        if let Some(projection) = &query.projection {
            documents = documents
                .into_iter()
                .map(|doc| Self::project_document(doc, projection))
                .collect();
        }

        log::trace!("find on '{collection}' returned {} documents", documents.len());

        Ok(documents)
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(None),
        };

        Ok(collection_map
            .values()
            .find(|doc| DocumentEvaluator::matches(doc, &filter))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        let store = self.store.read().await;

        Ok(store
            .get(collection)
            .and_then(|col| col.get(&id.to_string()))
            .cloned())
    }

    async fn update_by_id(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(StoreError::CollectionNotFound(collection.to_string())),
        };

        let key = id.to_string();

        if !collection_map.contains_key(&key) {
            return Err(StoreError::DocumentNotFound(key, collection.to_string()));
        }

        collection_map.insert(key, document);

        Ok(())
    }

    async fn update_by_filter(
        &self,
        filter: Expr,
        patch: bson::Document,
        return_updated: bool,
        collection: &str,
    ) -> StoreResult<Option<Bson>> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(None),
        };

        // First matching document only; a non-matching filter is a
        // legitimate no-op.
        let matched = collection_map
            .values_mut()
            .find(|doc| DocumentEvaluator::matches(doc, &filter));

        Ok(match matched {
            Some(document) => {
                let previous = document.clone();
                Self::merge_patch(document, &patch);

                Some(if return_updated { document.clone() } else { previous })
            }
            None => None,
        })
    }

    async fn delete_by_id(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        let mut store = self.store.write().await;

        Ok(store
            .get_mut(collection)
            .and_then(|col| col.remove(&id.to_string())))
    }

    async fn delete_by_filter(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        let before = collection_map.len();
        collection_map.retain(|_, doc| !DocumentEvaluator::matches(doc, &filter));
        let removed = (before - collection_map.len()) as u64;

        log::trace!("delete on '{collection}' removed {removed} documents");

        Ok(removed)
    }

    async fn create_collection(&self, name: &str) -> StoreResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(HashMap::new);

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> StoreResult<()> {
        let mut store = self.store.write().await;

        if store.remove(name).is_none() {
            return Err(StoreError::CollectionNotFound(name.to_string()));
        }

        Ok(())
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .store
            .read()
            .await
            .keys()
            .cloned()
            .collect())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance. Always succeeds.
    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use bson::{Bson, Uuid, doc};

    use rolodex_core::query::{Field, Projection, Query, SortDirection};

    use super::*;

    fn person(name: &str, age: i32, foods: &[&str]) -> Bson {
        Bson::Document(doc! {
            "name": name,
            "age": age,
            "favorite_foods": foods.iter().map(|f| Bson::String(f.to_string())).collect::<Vec<_>>(),
        })
    }

    async fn seeded_store() -> (InMemoryStore, Uuid) {
        let store = InMemoryStore::new();
        let id = Uuid::new();

        store
            .insert_one(id, person("Alice", 30, &["Pizza", "burrito"]), "people")
            .await
            .unwrap();
        store
            .insert_one(Uuid::new(), person("Bob", 25, &["burrito"]), "people")
            .await
            .unwrap();
        store
            .insert_one(Uuid::new(), person("Charlie", 40, &["burrito"]), "people")
            .await
            .unwrap();

        (store, id)
    }

    #[tokio::test]
    async fn builder_yields_an_empty_store() {
        let store = InMemoryStore::builder().build().await.unwrap();

        assert!(store.list_collections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let (store, id) = seeded_store().await;

        let found = store.find_by_id(id, "people").await.unwrap();
        assert_eq!(found, Some(person("Alice", 30, &["Pizza", "burrito"])));
    }

    #[tokio::test]
    async fn duplicate_id_is_rejected() {
        let (store, id) = seeded_store().await;

        let err = store
            .insert_one(id, person("Alice II", 31, &[]), "people")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DocumentAlreadyExists(_, _)));
    }

    #[tokio::test]
    async fn find_applies_filter_sort_and_limit() {
        let (store, _) = seeded_store().await;

        let query = Query::builder()
            .filter(Field::new("favorite_foods").contains("burrito"))
            .sort("name", SortDirection::Asc)
            .limit(2)
            .build();

        let names = store
            .find(query, "people")
            .await
            .unwrap()
            .into_iter()
            .map(|doc| {
                doc.as_document()
                    .and_then(|d| d.get_str("name").ok())
                    .map(str::to_string)
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[tokio::test]
    async fn projection_drops_excluded_keys() {
        let (store, _) = seeded_store().await;

        let query = Query::builder()
            .filter(Field::new("name").eq("Alice"))
            .project(Projection::exclude(["age"]))
            .build();

        let documents = store.find(query, "people").await.unwrap();
        assert_eq!(documents.len(), 1);

        let map = documents[0].as_document().unwrap();
        assert!(!map.contains_key("age"));
        assert!(map.contains_key("name"));
        assert!(map.contains_key("favorite_foods"));
    }

    #[tokio::test]
    async fn find_on_missing_collection_is_empty() {
        let store = InMemoryStore::new();

        let documents = store.find(Query::new(), "nowhere").await.unwrap();
        assert!(documents.is_empty());
    }

    #[tokio::test]
    async fn update_by_filter_returns_pre_or_post_document() {
        let (store, _) = seeded_store().await;

        let updated = store
            .update_by_filter(Field::new("name").eq("Bob"), doc! { "age": 20 }, true, "people")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.as_document().unwrap().get_i32("age").unwrap(), 20);

        let previous = store
            .update_by_filter(Field::new("name").eq("Bob"), doc! { "age": 21 }, false, "people")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(previous.as_document().unwrap().get_i32("age").unwrap(), 20);
    }

    #[tokio::test]
    async fn update_by_filter_without_match_is_none() {
        let (store, _) = seeded_store().await;

        let outcome = store
            .update_by_filter(Field::new("name").eq("Nobody"), doc! { "age": 20 }, true, "people")
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn update_by_id_requires_existing_document() {
        let (store, _) = seeded_store().await;

        let err = store
            .update_by_id(Uuid::new(), person("Ghost", 0, &[]), "people")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound(_, _)));
    }

    #[tokio::test]
    async fn delete_by_id_returns_removed_document_once() {
        let (store, id) = seeded_store().await;

        let removed = store.delete_by_id(id, "people").await.unwrap();
        assert!(removed.is_some());

        assert!(store.delete_by_id(id, "people").await.unwrap().is_none());
        assert!(store.find_by_id(id, "people").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_by_filter_counts_removed_documents() {
        let (store, _) = seeded_store().await;

        let removed = store
            .delete_by_filter(Field::new("favorite_foods").contains("burrito"), "people")
            .await
            .unwrap();
        assert_eq!(removed, 3);

        let removed = store
            .delete_by_filter(Field::new("name").eq("Nobody"), "people")
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn collection_admin_round_trips() {
        let store = InMemoryStore::new();

        store.create_collection("people").await.unwrap();
        assert_eq!(store.list_collections().await.unwrap(), vec!["people".to_string()]);

        store.drop_collection("people").await.unwrap();
        assert!(store.list_collections().await.unwrap().is_empty());

        let err = store.drop_collection("people").await.unwrap_err();
        assert!(matches!(err, StoreError::CollectionNotFound(_)));
    }
}
