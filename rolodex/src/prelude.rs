//! Convenient re-exports of commonly used types.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use rolodex::prelude::*;
//! ```

pub use rolodex_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::{Collection, TypedCollection},
    document::{Document, DocumentExt},
    error::{StoreError, StoreResult},
    query::{Expr, Field, FieldOp, Projection, Query, QueryBuilder, Sort, SortDirection},
    schema::{FieldKind, Schema},
    store::DocumentStore,
};

pub use crate::{
    person::{Person, PersonDraft, PersonSummary},
    repository::{PersonRepository, SHORTLIST_LIMIT},
};
