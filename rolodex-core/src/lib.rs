//! Core of the rolodex data-access layer: a unified interface over document
//! stores.
//!
//! This crate provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining and serializing stored record types
//! - **Schema declarations** ([`schema`]) - Field schemas enforced at write time
//! - **Store backend abstraction** ([`backend`]) - The trait storage backends implement
//! - **Query API** ([`query`]) - Type-safe filters, sorting, limits, and field projection
//! - **Collections interface** ([`collection`]) - Per-collection typed and untyped handles
//! - **Document store** ([`store`]) - The injected store handle with an explicit lifecycle
//! - **Error handling** ([`error`]) - Error taxonomy and result alias
//!
//! # Example
//!
//! ```ignore
//! use rolodex_core::{document::Document, schema::{Schema, FieldKind}};
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Person {
//!     pub id: Uuid,
//!     pub name: String,
//! }
//!
//! impl Document for Person {
//!     fn id(&self) -> &Uuid {
//!         &self.id
//!     }
//!
//!     fn collection_name() -> &'static str {
//!         "people"
//!     }
//!
//!     fn schema() -> Schema {
//!         Schema::builder()
//!             .required(FieldKind::Text, "name")
//!             .build()
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as rolodex_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod query;
pub mod schema;
pub mod store;
