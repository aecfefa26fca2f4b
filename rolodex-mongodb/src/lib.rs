//! MongoDB backend implementation for rolodex.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend`
//! trait, with filtering, sorting, limits, and field projection executed by
//! the MongoDB query engine.
//!
//! To use this backend, enable the `mongodb` feature of the facade crate:
//!
//! ```toml
//! [dependencies]
//! rolodex = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Connection
//!
//! The builder takes a connection string and a database name; both are
//! supplied by the caller, and the built store is passed in wherever it is
//! needed.
//!
//! # Example
//!
//! ```ignore
//! use rolodex_core::backend::StoreBackendBuilder;
//! use rolodex_mongodb::MongoDbStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "rolodex")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rolodex_mongodb;

pub mod query;
pub mod sanitizer;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
