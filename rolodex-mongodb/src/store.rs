use async_trait::async_trait;
use bson::{Bson, Document, Uuid, doc};
use futures::TryStreamExt;
use mongodb::{
    Client, Collection as MongoCollection,
    options::{ClientOptions, FindOptions, ReturnDocument},
};

use rolodex_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{StoreError, StoreResult},
    query::{Expr, Projection, Query, QueryVisitor, SortDirection},
};

use crate::{query::MongoQueryTranslator, sanitizer};

#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&sanitizer::sanitize_key(collection_name))
    }

    fn document_body(&self, document: &Bson) -> StoreResult<Document> {
        sanitizer::sanitize_value(document)
            .as_document()
            .cloned()
            .ok_or_else(|| StoreError::InvalidDocument("Expected document".into()))
    }

    fn prepare_document(&self, id: &Uuid, document: &Bson) -> StoreResult<Document> {
        Ok(Document::from_iter(
            self.document_body(document)?
                .into_iter()
                .chain(vec![("_id".to_string(), Bson::from(*id))].into_iter()),
        ))
    }

    fn restore_document(&self, document: &Document) -> StoreResult<Bson> {
        Ok(sanitizer::restore_value(&Bson::Document(Document::from_iter(
            document
                .clone()
                .into_iter()
                .filter(|(k, _)| !["_id"].contains(&k.as_str())),
        ))))
    }

    fn translate_filter(&self, filter: &Expr) -> StoreResult<Document> {
        MongoQueryTranslator.visit_expr(filter)
    }

    fn find_options(&self, query: &Query) -> FindOptions {
        let mut options = FindOptions::default();

        if let Some(limit) = query.limit {
            options.limit = Some(limit as i64);
        }
        if let Some(skip) = query.offset {
            options.skip = Some(skip as u64);
        }
        if let Some(sort) = &query.sort {
            options.sort = Some(doc! {
                sort.field.clone(): match sort.direction {
                    SortDirection::Asc => 1,
                    SortDirection::Desc => -1,
                }
            });
        }
        if let Some(projection) = &query.projection {
            options.projection = Some(match projection {
                Projection::Include(fields) => Document::from_iter(
                    fields
                        .iter()
                        .map(|field| (field.clone(), Bson::Int32(1))),
                ),
                Projection::Exclude(fields) => Document::from_iter(
                    fields
                        .iter()
                        .map(|field| (field.clone(), Bson::Int32(0))),
                ),
            });
        }

        options
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert_one(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()> {
        self.get_collection(collection)
            .insert_one(self.prepare_document(&id, &document)?)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn insert_many(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> StoreResult<()> {
        self.get_collection(collection)
            .insert_many(
                documents
                    .iter()
                    .map(|(id, doc)| self.prepare_document(id, doc))
                    .collect::<StoreResult<Vec<Document>>>()?,
            )
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Bson>> {
        let filter = match &query.filter {
            Some(expr) => self.translate_filter(expr)?,
            None => doc! {},
        };
        let options = self.find_options(&query);

        self.get_collection(collection)
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .iter()
            .map(|doc| self.restore_document(doc))
            .collect::<StoreResult<Vec<Bson>>>()
    }

    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Bson>> {
        self.get_collection(collection)
            .find_one(self.translate_filter(&filter)?)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(|doc| self.restore_document(&doc))
            .transpose()
    }

    async fn find_by_id(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        self.get_collection(collection)
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(|doc| self.restore_document(&doc))
            .transpose()
    }

    async fn update_by_id(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()> {
        let outcome = self
            .get_collection(collection)
            .update_one(
                doc! { "_id": id },
                doc! { "$set": self.document_body(&document)? },
            )
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if outcome.matched_count == 0 {
            return Err(StoreError::DocumentNotFound(
                id.to_string(),
                collection.to_string(),
            ));
        }

        Ok(())
    }

    async fn update_by_filter(
        &self,
        filter: Expr,
        patch: bson::Document,
        return_updated: bool,
        collection: &str,
    ) -> StoreResult<Option<Bson>> {
        let patch = Document::from_iter(
            patch
                .into_iter()
                .map(|(k, v)| (sanitizer::sanitize_key(&k), sanitizer::sanitize_value(&v))),
        );

        self.get_collection(collection)
            .find_one_and_update(self.translate_filter(&filter)?, doc! { "$set": patch })
            .return_document(if return_updated {
                ReturnDocument::After
            } else {
                ReturnDocument::Before
            })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(|doc| self.restore_document(&doc))
            .transpose()
    }

    async fn delete_by_id(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>> {
        self.get_collection(collection)
            .find_one_and_delete(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .map(|doc| self.restore_document(&doc))
            .transpose()
    }

    async fn delete_by_filter(&self, filter: Expr, collection: &str) -> StoreResult<u64> {
        Ok(self
            .get_collection(collection)
            .delete_many(self.translate_filter(&filter)?)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .deleted_count)
    }

    async fn create_collection(&self, name: &str) -> StoreResult<()> {
        self.client
            .database(&self.database)
            .create_collection(&sanitizer::sanitize_key(name))
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> StoreResult<()> {
        self.get_collection(name)
            .drop()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        Ok(self
            .client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .iter()
            .map(|name| sanitizer::restore_key(name))
            .collect())
    }

    async fn shutdown(self) -> StoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> StoreResult<Self::Backend> {
        Ok(MongoDbStore::new(
            Client::with_options(
                ClientOptions::parse(&self.dsn)
                    .await
                    .map_err(|e| StoreError::Initialization(e.to_string()))?,
            )
            .map_err(|e| StoreError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
