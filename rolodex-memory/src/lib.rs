//! In-memory document storage backend for rolodex.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `StoreBackend` trait. It uses async-aware read-write locks for concurrent
//! access and is the default substrate for development and tests.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using an async-aware RwLock
//! - **Type-erased storage** - Stores documents as BSON for flexibility
//! - **Full query support** - Filtering, sorting, limits, and field projection
//!
//! # Quick Start
//!
//! ```ignore
//! use rolodex_core::store::DocumentStore;
//! use rolodex_memory::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = DocumentStore::new(InMemoryStore::new());
//!     let people = store.typed_collection::<Person>();
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rolodex_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
