//! The person record and its projected views.

use bson::Uuid;
use serde::{Deserialize, Serialize};

use rolodex_core::{
    document::Document,
    schema::{FieldKind, Schema},
};

/// A person on file: a name, an optional age, and an ordered list of
/// favorite foods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier, assigned once at creation; never changes.
    pub id: Uuid,
    /// Display name. Required non-empty, not unique.
    pub name: String,
    /// Age in years, if known.
    pub age: Option<i32>,
    /// Favorite foods in insertion order. Order is preserved as appended,
    /// but queries only test membership.
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl Document for Person {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "people"
    }

    fn schema() -> Schema {
        Schema::builder()
            .required(FieldKind::Text, "name")
            .optional(FieldKind::Int, "age")
            .optional(FieldKind::TextArray, "favorite_foods")
            .build()
    }
}

/// An unsaved person: everything but the identifier.
///
/// ```ignore
/// use rolodex::person::PersonDraft;
///
/// let draft = PersonDraft::new("John Doe")
///     .age(25)
///     .favorite_foods(["Pizza", "Burger"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PersonDraft {
    pub name: String,
    pub age: Option<i32>,
    pub favorite_foods: Vec<String>,
}

impl PersonDraft {
    /// Starts a draft with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        PersonDraft {
            name: name.into(),
            age: None,
            favorite_foods: Vec::new(),
        }
    }

    /// Sets the age.
    pub fn age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the favorite foods.
    pub fn favorite_foods<I, S>(mut self, foods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.favorite_foods = foods.into_iter().map(Into::into).collect();
        self
    }

    /// Promotes the draft to a [`Person`] by assigning a fresh identifier.
    pub(crate) fn assign_id(self) -> Person {
        Person {
            id: Uuid::new(),
            name: self.name,
            age: self.age,
            favorite_foods: self.favorite_foods,
        }
    }
}

/// A projected view of a person that carries no age field, as returned by
/// queries that exclude it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
}

impl Document for PersonSummary {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "people"
    }
}
