//! Storage backend abstraction for the document store.
//!
//! This module defines the trait that abstracts over storage implementations,
//! allowing the same data-access code to run against an in-memory store, a
//! MongoDB deployment, or any other backend.
//!
//! # Overview
//!
//! [`StoreBackend`] provides a unified async interface for the store's
//! logical operations: single and batch insert, filtered and point reads,
//! replace and patch updates, and id- or filter-based deletion.
//! Implementations are required to be thread-safe (`Send + Sync`) and support
//! concurrent access; each method is a single request/response, and the
//! backend is responsible for whatever isolation it provides between
//! concurrently issued operations.
//!
//! A missing document is a legitimate outcome, not a failure: point lookups
//! return `Ok(None)`, filter-based updates return `Ok(None)` when nothing
//! matched, and filter-based deletes report how many documents were removed
//! (possibly zero).

use async_trait::async_trait;
use bson::{Bson, Uuid};
use std::fmt::Debug;

use crate::{
    error::StoreResult,
    query::{Expr, Query},
};

/// Abstract interface for document storage backends.
///
/// Implementers provide concrete storage strategies, from simple in-memory
/// maps to networked database servers. Operations return
/// [`StoreResult<T>`](crate::error::StoreResult); backend failures are
/// surfaced verbatim and never retried at this layer.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts a single new document into a collection.
    ///
    /// The collection is created automatically if it doesn't exist. Inserting
    /// an ID that is already present is a failure, not a replace.
    async fn insert_one(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()>;

    /// Inserts a batch of new documents into a collection.
    ///
    /// Whether a failing batch is applied partially or not at all is
    /// backend-defined; the outcome is reported as-is without reconciliation.
    async fn insert_many(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> StoreResult<()>;

    /// Queries documents in a collection.
    ///
    /// Applies the query's filter, then sort, then offset/limit, then field
    /// projection, and returns the matching documents (possibly none).
    async fn find(&self, query: Query, collection: &str) -> StoreResult<Vec<Bson>>;

    /// Returns one document matching the filter, or `None`.
    ///
    /// When several documents match, which one is returned is
    /// backend-defined.
    async fn find_one(&self, filter: Expr, collection: &str) -> StoreResult<Option<Bson>>;

    /// Returns the document with the given ID, or `None`.
    async fn find_by_id(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>>;

    /// Replaces the document with the given ID in its entirety.
    ///
    /// Replacing an ID that is not present is a failure.
    async fn update_by_id(&self, id: Uuid, document: Bson, collection: &str) -> StoreResult<()>;

    /// Sets the patch's fields on one document matching the filter.
    ///
    /// Returns the pre-update document, or the post-update document when
    /// `return_updated` is set. Returns `Ok(None)` when nothing matched;
    /// a non-matching filter is not a failure.
    async fn update_by_filter(
        &self,
        filter: Expr,
        patch: bson::Document,
        return_updated: bool,
        collection: &str,
    ) -> StoreResult<Option<Bson>>;

    /// Deletes the document with the given ID.
    ///
    /// Returns the removed document, or `Ok(None)` if no document had that
    /// ID.
    async fn delete_by_id(&self, id: Uuid, collection: &str) -> StoreResult<Option<Bson>>;

    /// Deletes every document matching the filter.
    ///
    /// Returns the number of documents removed; zero is a legitimate
    /// outcome.
    async fn delete_by_filter(&self, filter: Expr, collection: &str) -> StoreResult<u64>;

    /// Creates a new, empty collection with the specified name.
    async fn create_collection(&self, name: &str) -> StoreResult<()>;

    /// Drops a collection and all its documents.
    ///
    /// This operation is irreversible.
    async fn drop_collection(&self, name: &str) -> StoreResult<()>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op; backends holding connections
    /// or file handles should override it.
    async fn shutdown(self) -> StoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// Factory trait for creating backend instances.
#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> StoreResult<Self::Backend>;
}
