//! Data-access operations over the people collection.
//!
//! [`PersonRepository`] wraps an injected [`DocumentStore`] and translates
//! each named intent into one store call. Every operation is a single
//! request/response: it suspends once on the backend and resolves exactly
//! once, to a value or to the forwarded store failure. Missing records are
//! values (`None`, an empty vec, a zero count), never errors, so callers can
//! tell "nothing there" apart from a failing store.
//!
//! The repository imposes no locking and no ordering between concurrently
//! issued operations; whatever isolation exists comes from the backend.

use bson::{Uuid, doc};

use rolodex_core::{
    backend::StoreBackend,
    collection::TypedCollection,
    error::StoreResult,
    query::{Field, Projection, Query, SortDirection},
    store::DocumentStore,
};

use crate::person::{Person, PersonDraft, PersonSummary};

/// Maximum number of people returned by
/// [`shortlist_by_food`](PersonRepository::shortlist_by_food).
pub const SHORTLIST_LIMIT: usize = 2;

/// Repository over the people collection, bound to a concrete backend.
#[derive(Debug)]
pub struct PersonRepository<B: StoreBackend> {
    store: DocumentStore<B>,
}

impl<B: StoreBackend> PersonRepository<B> {
    /// Creates a repository over the given store handle.
    pub fn new(store: DocumentStore<B>) -> Self {
        Self { store }
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    fn people(&self) -> TypedCollection<'_, B, Person> {
        self.store.typed_collection::<Person>()
    }

    /// Persists a draft as a new person and returns it, identifier assigned.
    ///
    /// The submitted fields are echoed back unchanged. A draft that violates
    /// the schema (e.g. an empty name) is rejected by the write itself.
    pub async fn create(&self, draft: PersonDraft) -> StoreResult<Person> {
        let person = draft.assign_id();

        self.people().insert_one(person.clone()).await?;
        log::debug!("created person {}", person.id);

        Ok(person)
    }

    /// Persists a batch of drafts and returns the created people.
    ///
    /// Whether a failing batch is applied partially or not at all is decided
    /// by the backend and reported as-is.
    pub async fn create_many(&self, drafts: Vec<PersonDraft>) -> StoreResult<Vec<Person>> {
        let people = drafts
            .into_iter()
            .map(PersonDraft::assign_id)
            .collect::<Vec<_>>();

        self.people().insert_many(people.clone()).await?;
        log::debug!("created {} people", people.len());

        Ok(people)
    }

    /// Returns every person with the given name, possibly none.
    pub async fn find_by_name(&self, name: &str) -> StoreResult<Vec<Person>> {
        self.people()
            .find(
                Query::builder()
                    .filter(Field::new("name").eq(name))
                    .build(),
            )
            .await
    }

    /// Returns one person whose favorite foods include the given food, or
    /// `None`. When several match, which one is returned is backend-defined.
    pub async fn find_one_by_food(&self, food: &str) -> StoreResult<Option<Person>> {
        self.people()
            .find_one(Field::new("favorite_foods").contains(food))
            .await
    }

    /// Returns the person with the given identifier, or `None`.
    pub async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Person>> {
        self.people().get(id).await
    }

    /// Loads the person, appends the food to their favorites, and saves the
    /// whole record back. Returns the updated person, or `None` if the
    /// identifier is unknown.
    ///
    /// The append is unconditional, so repeating it duplicates the entry.
    ///
    /// This is a read-modify-write with no guard between the load and the
    /// save: a concurrent update to the same person inside that window is
    /// silently overwritten.
    pub async fn add_favorite_food(&self, id: Uuid, food: &str) -> StoreResult<Option<Person>> {
        let Some(mut person) = self.people().get(id).await? else {
            return Ok(None);
        };

        person.favorite_foods.push(food.to_string());
        self.people().update_one(person.clone()).await?;

        Ok(Some(person))
    }

    /// Sets the age of one person with the given name and returns the
    /// updated record, or `None` when no name matched (which is not an
    /// error).
    pub async fn update_age_by_name(&self, name: &str, age: i32) -> StoreResult<Option<Person>> {
        self.people()
            .update_by_filter(Field::new("name").eq(name), doc! { "age": age }, true)
            .await
    }

    /// Removes the person with the given identifier and returns them, or
    /// `None` if nobody had it.
    pub async fn delete_by_id(&self, id: Uuid) -> StoreResult<Option<Person>> {
        self.people().delete_by_id(id).await
    }

    /// Removes every person with the given name and returns how many were
    /// removed; zero is a legitimate outcome.
    pub async fn delete_by_name(&self, name: &str) -> StoreResult<u64> {
        let removed = self
            .people()
            .delete_by_filter(Field::new("name").eq(name))
            .await?;
        log::debug!("removed {removed} people named '{name}'");

        Ok(removed)
    }

    /// Returns up to [`SHORTLIST_LIMIT`] people whose favorite foods include
    /// the given food, sorted by name ascending, with the age field
    /// projected away.
    pub async fn shortlist_by_food(&self, food: &str) -> StoreResult<Vec<PersonSummary>> {
        self.people()
            .with_type::<PersonSummary>()
            .find(
                Query::builder()
                    .filter(Field::new("favorite_foods").contains(food))
                    .sort("name", SortDirection::Asc)
                    .limit(SHORTLIST_LIMIT)
                    .project(Projection::exclude(["age"]))
                    .build(),
            )
            .await
    }

    /// Shuts the underlying store down, releasing backend resources.
    pub async fn shutdown(self) -> StoreResult<()> {
        self.store.shutdown().await
    }
}
