//! Declarative field schemas enforced at write time.
//!
//! A [`Schema`] describes which fields a stored document carries and which of
//! them are required. Validation happens inside the store layer when a
//! document is inserted or replaced, so a schema violation surfaces to
//! callers as a [`StoreError::Validation`] from the write itself rather than
//! as a pre-check in calling code.

use bson::Bson;

use crate::error::{StoreError, StoreResult};

/// The value kinds a schema field can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 text. Required text fields must be non-empty.
    Text,
    /// 32- or 64-bit integer.
    Int,
    /// An ordered sequence of text values.
    TextArray,
}

impl FieldKind {
    fn matches(&self, value: &Bson) -> bool {
        match self {
            FieldKind::Text => matches!(value, Bson::String(_)),
            FieldKind::Int => matches!(value, Bson::Int32(_) | Bson::Int64(_)),
            FieldKind::TextArray => match value {
                Bson::Array(items) => items
                    .iter()
                    .all(|item| matches!(item, Bson::String(_))),
                _ => false,
            },
        }
    }

    fn name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Int => "int",
            FieldKind::TextArray => "text array",
        }
    }
}

/// A single declared field: its name, kind, and whether it must be present.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
}

/// A document schema: the set of declared fields.
///
/// An empty schema (the default) validates nothing, which is the behavior
/// document types get when they do not override
/// [`Document::schema`](crate::document::Document::schema).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Creates a new schema builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Returns the declared fields.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Validates a full document against this schema.
    ///
    /// Checks that every required field is present, non-null, and (for text)
    /// non-empty, and that every declared field present in the document has
    /// the declared kind. Undeclared fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] on the first violation, or
    /// [`StoreError::InvalidDocument`] if the value is not a document.
    pub fn validate(&self, document: &Bson) -> StoreResult<()> {
        let map = document
            .as_document()
            .ok_or_else(|| StoreError::InvalidDocument("Expected document".into()))?;

        for field in &self.fields {
            match map.get(&field.name) {
                None | Some(Bson::Null) => {
                    if field.required {
                        return Err(StoreError::Validation(format!(
                            "Required field '{}' is missing",
                            field.name
                        )));
                    }
                }
                Some(value) => {
                    self.check_kind(field, value)?;

                    if field.required
                        && field.kind == FieldKind::Text
                        && value.as_str().is_some_and(str::is_empty)
                    {
                        return Err(StoreError::Validation(format!(
                            "Required field '{}' must not be empty",
                            field.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Validates a partial update against this schema.
    ///
    /// Only kind conformance is checked for the fields the patch carries;
    /// required fields absent from the patch are untouched by the update and
    /// therefore not re-checked here.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] on the first kind mismatch.
    pub fn validate_patch(&self, patch: &bson::Document) -> StoreResult<()> {
        for field in &self.fields {
            if let Some(value) = patch.get(&field.name) {
                if !matches!(value, Bson::Null) {
                    self.check_kind(field, value)?;
                }
            }
        }

        Ok(())
    }

    fn check_kind(&self, field: &FieldSpec, value: &Bson) -> StoreResult<()> {
        if !field.kind.matches(value) {
            return Err(StoreError::Validation(format!(
                "Field '{}' must be of kind {}",
                field.name,
                field.kind.name()
            )));
        }

        Ok(())
    }
}

/// Builder for constructing [`Schema`] instances.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Declares a required field of the given kind.
    pub fn required(mut self, kind: FieldKind, name: impl Into<String>) -> Self {
        self.fields.push(FieldSpec { name: name.into(), kind, required: true });
        self
    }

    /// Declares an optional field of the given kind.
    pub fn optional(mut self, kind: FieldKind, name: impl Into<String>) -> Self {
        self.fields.push(FieldSpec { name: name.into(), kind, required: false });
        self
    }

    /// Builds and returns the final schema.
    pub fn build(self) -> Schema {
        Schema { fields: self.fields }
    }
}

#[cfg(test)]
mod tests {
    use bson::{Bson, doc};

    use super::*;
    use crate::error::StoreError;

    fn person_schema() -> Schema {
        Schema::builder()
            .required(FieldKind::Text, "name")
            .optional(FieldKind::Int, "age")
            .optional(FieldKind::TextArray, "favorite_foods")
            .build()
    }

    #[test]
    fn accepts_complete_document() {
        let document = Bson::Document(doc! {
            "name": "Alice",
            "age": 30,
            "favorite_foods": ["Pizza"],
        });

        assert!(person_schema().validate(&document).is_ok());
    }

    #[test]
    fn accepts_absent_optional_fields() {
        let document = Bson::Document(doc! { "name": "Alice" });

        assert!(person_schema().validate(&document).is_ok());
    }

    #[test]
    fn rejects_missing_required_field() {
        let document = Bson::Document(doc! { "age": 30 });

        let err = person_schema().validate(&document).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn rejects_empty_required_text() {
        let document = Bson::Document(doc! { "name": "" });

        let err = person_schema().validate(&document).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn rejects_kind_mismatch() {
        let document = Bson::Document(doc! { "name": "Alice", "age": "thirty" });

        let err = person_schema().validate(&document).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn patch_checks_kinds_only() {
        let schema = person_schema();

        assert!(schema.validate_patch(&doc! { "age": 20 }).is_ok());
        assert!(schema.validate_patch(&doc! { "age": "twenty" }).is_err());
        // A patch without the required field is fine; it leaves it untouched.
        assert!(schema.validate_patch(&doc! {}).is_ok());
    }

    #[test]
    fn empty_schema_validates_anything() {
        let document = Bson::Document(doc! { "whatever": 1 });

        assert!(Schema::default().validate(&document).is_ok());
    }
}
