//! Collection handles for document store operations.
//!
//! This module provides the per-collection API. [`Collection`] works with
//! explicit BSON documents; [`TypedCollection`] layers serde
//! (de)serialization and write-time schema validation on top of it for a
//! specific [`Document`] type.
//!
//! # Example
//!
//! ```ignore
//! # async fn example(store: &rolodex_core::store::DocumentStore<impl rolodex_core::backend::StoreBackend>) -> rolodex_core::error::StoreResult<()> {
//! let people = store.typed_collection::<Person>();
//! let person = Person { id: bson::Uuid::new(), name: "Alice".to_string() };
//! people.insert_one(person).await?;
//! # Ok(()) }
//! ```

use bson::{Bson, Uuid};
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::StoreResult,
    query::{Expr, Query},
};

/// An untyped collection handle with a reference to a storage backend.
///
/// All documents are represented as BSON values: maximum flexibility, no
/// compile-time type safety.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    /// Creates a new collection reference (internal use).
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a single new document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if the ID is
    /// already present or the operation fails.
    pub async fn insert_one(&self, id: Uuid, document: Bson) -> StoreResult<()> {
        self.backend
            .insert_one(id, document, self.name())
            .await
    }

    /// Inserts a batch of new documents.
    ///
    /// Partial-failure semantics are backend-defined and forwarded as-is.
    pub async fn insert_many(&self, documents: Vec<(Uuid, Bson)>) -> StoreResult<()> {
        self.backend
            .insert_many(documents, self.name())
            .await
    }

    /// Queries documents with filter, sort, offset/limit, and projection.
    pub async fn find(&self, query: Query) -> StoreResult<Vec<Bson>> {
        self.backend
            .find(query, self.name())
            .await
    }

    /// Returns one document matching the filter, or `None`.
    pub async fn find_one(&self, filter: Expr) -> StoreResult<Option<Bson>> {
        self.backend
            .find_one(filter, self.name())
            .await
    }

    /// Returns the document with the given ID, or `None`.
    pub async fn find_by_id(&self, id: impl Into<Uuid>) -> StoreResult<Option<Bson>> {
        self.backend
            .find_by_id(id.into(), self.name())
            .await
    }

    /// Replaces the document with the given ID in its entirety.
    pub async fn update_by_id(&self, id: Uuid, document: Bson) -> StoreResult<()> {
        self.backend
            .update_by_id(id, document, self.name())
            .await
    }

    /// Sets the patch's fields on one document matching the filter.
    ///
    /// Returns the pre- or post-update document depending on
    /// `return_updated`, or `None` when nothing matched.
    pub async fn update_by_filter(
        &self,
        filter: Expr,
        patch: bson::Document,
        return_updated: bool,
    ) -> StoreResult<Option<Bson>> {
        self.backend
            .update_by_filter(filter, patch, return_updated, self.name())
            .await
    }

    /// Deletes the document with the given ID, returning it, or `None` if
    /// absent.
    pub async fn delete_by_id(&self, id: impl Into<Uuid>) -> StoreResult<Option<Bson>> {
        self.backend
            .delete_by_id(id.into(), self.name())
            .await
    }

    /// Deletes every document matching the filter, returning how many were
    /// removed.
    pub async fn delete_by_filter(&self, filter: Expr) -> StoreResult<u64> {
        self.backend
            .delete_by_filter(filter, self.name())
            .await
    }
}

/// A typed collection handle for a specific document type.
///
/// Serializes on the way in, deserializes on the way out, and validates
/// writes against [`Document::schema`] so that schema violations surface as
/// write-time [`StoreError::Validation`](crate::error::StoreError) failures.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts this typed collection to a different document type.
    ///
    /// Useful for reading projected views of the same collection.
    pub fn with_type<T: Document>(&self) -> TypedCollection<'a, B, T> {
        TypedCollection {
            name: self.name.clone(),
            backend: self.backend,
            _marker: PhantomData,
        }
    }

    fn serialize_checked(&self, document: &D) -> StoreResult<Bson> {
        let body = document.to_bson()?;
        if let Err(err) = D::schema().validate(&body) {
            log::debug!("rejecting write to '{}': {err}", self.name);
            return Err(err);
        }

        Ok(body)
    }

    /// Inserts a single new document.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if serialization
    /// fails, the document violates its schema, or the insert fails.
    pub async fn insert_one(&self, document: D) -> StoreResult<()> {
        let body = self.serialize_checked(&document)?;

        self.backend
            .insert_one(document.id().clone(), body, self.name())
            .await
    }

    /// Inserts a batch of new documents.
    ///
    /// Every document is validated before any is handed to the backend;
    /// the backend's own partial-failure semantics are forwarded as-is.
    pub async fn insert_many(&self, documents: Vec<D>) -> StoreResult<()> {
        self.backend
            .insert_many(
                documents
                    .iter()
                    .map(|d| {
                        self.serialize_checked(d)
                            .map(|b| (d.id().clone(), b))
                    })
                    .collect::<StoreResult<Vec<(Uuid, Bson)>>>()?,
                self.name(),
            )
            .await
    }

    /// Queries documents with filter, sort, offset/limit, and projection.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if the query or
    /// deserialization fails.
    pub async fn find(&self, query: Query) -> StoreResult<Vec<D>> {
        self.backend
            .find(query, self.name())
            .await?
            .into_iter()
            .map(|doc| D::from_bson(doc))
            .collect::<StoreResult<Vec<D>>>()
    }

    /// Returns one document matching the filter, or `None`.
    pub async fn find_one(&self, filter: Expr) -> StoreResult<Option<D>> {
        self.backend
            .find_one(filter, self.name())
            .await?
            .map(D::from_bson)
            .transpose()
    }

    /// Returns the document with the given ID, or `None`.
    pub async fn get(&self, id: impl Into<Uuid>) -> StoreResult<Option<D>> {
        self.backend
            .find_by_id(id.into(), self.name())
            .await?
            .map(D::from_bson)
            .transpose()
    }

    /// Replaces the stored document with this one, matched by ID.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`](crate::error::StoreError) if the document
    /// violates its schema or no document with that ID exists.
    pub async fn update_one(&self, document: D) -> StoreResult<()> {
        let body = self.serialize_checked(&document)?;

        self.backend
            .update_by_id(document.id().clone(), body, self.name())
            .await
    }

    /// Sets the patch's fields on one document matching the filter.
    ///
    /// The patch is checked for kind conformance against the schema before
    /// it is applied. Returns the pre- or post-update document depending on
    /// `return_updated`, or `None` when nothing matched.
    pub async fn update_by_filter(
        &self,
        filter: Expr,
        patch: bson::Document,
        return_updated: bool,
    ) -> StoreResult<Option<D>> {
        D::schema().validate_patch(&patch)?;

        self.backend
            .update_by_filter(filter, patch, return_updated, self.name())
            .await?
            .map(D::from_bson)
            .transpose()
    }

    /// Deletes the document with the given ID, returning it, or `None` if
    /// absent.
    pub async fn delete_by_id(&self, id: impl Into<Uuid>) -> StoreResult<Option<D>> {
        self.backend
            .delete_by_id(id.into(), self.name())
            .await?
            .map(D::from_bson)
            .transpose()
    }

    /// Deletes every document matching the filter, returning how many were
    /// removed.
    pub async fn delete_by_filter(&self, filter: Expr) -> StoreResult<u64> {
        self.backend
            .delete_by_filter(filter, self.name())
            .await
    }
}
