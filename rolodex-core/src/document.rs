//! Core traits and types for document representation and serialization.
//!
//! This module provides the fundamental trait that all stored record types
//! must implement, as well as utilities for converting documents between
//! different formats (BSON, JSON).

use bson::{Bson, Uuid, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::{error::StoreResult, schema::Schema};

/// Core trait that all documents stored in a document store must implement.
///
/// Every document has a unique identifier (UUID), names the collection it
/// belongs to, and may declare a [`Schema`] the store enforces at write time.
///
/// # Example
///
/// ```ignore
/// use rolodex_core::{document::Document, schema::{Schema, FieldKind}};
/// use bson::Uuid;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Person {
///     pub id: Uuid,
///     pub name: String,
/// }
///
/// impl Document for Person {
///     fn id(&self) -> &Uuid {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "people"
///     }
///
///     fn schema() -> Schema {
///         Schema::builder()
///             .required(FieldKind::Text, "name")
///             .build()
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's unique identifier.
    fn id(&self) -> &Uuid;

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g. "people").
    /// The collection is created automatically if it doesn't exist.
    fn collection_name() -> &'static str;

    /// Returns the schema enforced when documents of this type are written.
    ///
    /// The default is an empty schema, which validates nothing.
    fn schema() -> Schema {
        Schema::default()
    }
}

/// Extension trait providing serialization/deserialization utilities for
/// documents.
///
/// Automatically implemented for all [`Document`] types.
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> StoreResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> StoreResult<Self>;

    /// Converts this document to a JSON value for serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> StoreResult<Value>;

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> StoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> StoreResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> StoreResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> StoreResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> StoreResult<Self> {
        Ok(from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use bson::Uuid;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        body: String,
    }

    impl Document for Note {
        fn id(&self) -> &Uuid {
            &self.id
        }

        fn collection_name() -> &'static str {
            "notes"
        }
    }

    #[test]
    fn bson_round_trip_preserves_fields() {
        let note = Note { id: Uuid::new(), body: "hello".to_string() };

        let restored = Note::from_bson(note.to_bson().unwrap()).unwrap();
        assert_eq!(restored, note);
    }

    #[test]
    fn json_round_trip_preserves_fields() {
        let note = Note { id: Uuid::new(), body: "hello".to_string() };

        let restored = Note::from_json(note.to_json().unwrap()).unwrap();
        assert_eq!(restored, note);
    }
}
