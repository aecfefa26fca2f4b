//! End-to-end tests of the person repository against the in-memory backend.

use rolodex::{memory::InMemoryStore, prelude::*};

fn repository() -> PersonRepository<InMemoryStore> {
    PersonRepository::new(DocumentStore::new(InMemoryStore::new()))
}

#[tokio::test]
async fn create_assigns_an_id_and_echoes_the_fields() {
    let repo = repository();

    let john = repo
        .create(
            PersonDraft::new("John Doe")
                .age(25)
                .favorite_foods(["Pizza", "Burger"]),
        )
        .await
        .unwrap();

    assert_eq!(john.name, "John Doe");
    assert_eq!(john.age, Some(25));
    assert_eq!(john.favorite_foods, vec!["Pizza".to_string(), "Burger".to_string()]);

    let jane = repo.create(PersonDraft::new("Jane Doe")).await.unwrap();
    assert_ne!(john.id, jane.id);
}

#[tokio::test]
async fn create_with_empty_name_fails_validation() {
    let repo = repository();

    let err = repo.create(PersonDraft::new("")).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    // Nothing was persisted by the rejected write.
    assert!(repo.find_by_name("").await.unwrap().is_empty());
}

#[tokio::test]
async fn create_many_returns_every_created_person() {
    let repo = repository();

    let people = repo
        .create_many(vec![
            PersonDraft::new("Alice").age(28),
            PersonDraft::new("Bob"),
            PersonDraft::new("Mary"),
        ])
        .await
        .unwrap();

    assert_eq!(people.len(), 3);
    assert_eq!(people[0].name, "Alice");
    assert_eq!(people[0].age, Some(28));

    for person in &people {
        assert_eq!(repo.find_by_id(person.id).await.unwrap().as_ref(), Some(person));
    }
}

#[tokio::test]
async fn find_by_name_returns_matches_or_an_empty_list() {
    let repo = repository();

    repo.create(PersonDraft::new("Alice")).await.unwrap();
    repo.create(PersonDraft::new("Bob")).await.unwrap();

    let found = repo.find_by_name("Alice").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Alice");

    // An unknown name is an empty result, not an error.
    assert!(repo.find_by_name("NoSuchName").await.unwrap().is_empty());
}

#[tokio::test]
async fn find_one_by_food_tests_membership() {
    let repo = repository();

    repo.create(PersonDraft::new("Alice").favorite_foods(["Pizza", "Sushi"]))
        .await
        .unwrap();

    let found = repo.find_one_by_food("Pizza").await.unwrap().unwrap();
    assert!(found.favorite_foods.contains(&"Pizza".to_string()));

    assert!(repo.find_one_by_food("Haggis").await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_id_distinguishes_missing_from_found() {
    let repo = repository();

    let alice = repo.create(PersonDraft::new("Alice")).await.unwrap();

    assert_eq!(repo.find_by_id(alice.id).await.unwrap(), Some(alice));
    assert!(repo.find_by_id(bson::Uuid::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn add_favorite_food_appends_unconditionally() {
    let repo = repository();

    let alice = repo
        .create(PersonDraft::new("Alice").favorite_foods(["Pizza"]))
        .await
        .unwrap();

    let updated = repo
        .add_favorite_food(alice.id, "hamburger")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.favorite_foods, vec!["Pizza".to_string(), "hamburger".to_string()]);

    // The append is unconditional, so doing it again duplicates the entry.
    let updated = repo
        .add_favorite_food(alice.id, "hamburger")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        updated.favorite_foods,
        vec!["Pizza".to_string(), "hamburger".to_string(), "hamburger".to_string()]
    );

    // The save went through, not just the returned value.
    let persisted = repo.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(persisted.favorite_foods, updated.favorite_foods);

    assert!(repo
        .add_favorite_food(bson::Uuid::new(), "hamburger")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn update_age_by_name_returns_the_updated_person() {
    let repo = repository();

    repo.create(PersonDraft::new("Alice").age(30)).await.unwrap();

    let updated = repo.update_age_by_name("Alice", 20).await.unwrap().unwrap();
    assert_eq!(updated.age, Some(20));
    assert_eq!(updated.name, "Alice");

    // A non-matching name completes with None, not an error.
    assert!(repo.update_age_by_name("NoSuchName", 20).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_by_id_removes_and_returns_the_person() {
    let repo = repository();

    let alice = repo.create(PersonDraft::new("Alice")).await.unwrap();

    let removed = repo.delete_by_id(alice.id).await.unwrap();
    assert_eq!(removed, Some(alice.clone()));

    assert!(repo.find_by_id(alice.id).await.unwrap().is_none());
    assert!(repo.delete_by_id(alice.id).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_by_name_counts_removed_people() {
    let repo = repository();

    repo.create_many(vec![
        PersonDraft::new("Mary"),
        PersonDraft::new("Mary"),
        PersonDraft::new("Alice"),
    ])
    .await
    .unwrap();

    assert_eq!(repo.delete_by_name("Mary").await.unwrap(), 2);
    assert_eq!(repo.find_by_name("Alice").await.unwrap().len(), 1);

    // Deleting with a filter nothing matches removes zero records.
    assert_eq!(repo.delete_by_name("Mary").await.unwrap(), 0);
}

#[tokio::test]
async fn shortlist_by_food_sorts_limits_and_hides_ages() {
    let repo = repository();

    repo.create_many(vec![
        PersonDraft::new("Charlie").age(40).favorite_foods(["burrito"]),
        PersonDraft::new("Alice").age(30).favorite_foods(["burrito", "Pizza"]),
        PersonDraft::new("Bob").age(25).favorite_foods(["burrito"]),
        PersonDraft::new("Dora").age(35).favorite_foods(["Sushi"]),
    ])
    .await
    .unwrap();

    let shortlist = repo.shortlist_by_food("burrito").await.unwrap();

    let names = shortlist
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["Alice", "Bob"]);
    assert_eq!(shortlist.len(), SHORTLIST_LIMIT);

    // At the store level the age field really is projected away, not just
    // absent from the summary type.
    let raw = repo
        .store()
        .collection("people")
        .find(
            Query::builder()
                .filter(Field::new("favorite_foods").contains("burrito"))
                .sort("name", SortDirection::Asc)
                .limit(SHORTLIST_LIMIT)
                .project(Projection::exclude(["age"]))
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(raw.len(), 2);
    for document in &raw {
        let map = document.as_document().unwrap();
        assert!(!map.contains_key("age"));
        assert!(map.contains_key("name"));
    }
}

#[tokio::test]
async fn store_handle_administers_collections() {
    let store = DocumentStore::new(InMemoryStore::new());

    store.create_collection("people").await.unwrap();
    assert_eq!(store.list_collections().await.unwrap(), vec!["people".to_string()]);

    store.drop_collection("people").await.unwrap();
    assert!(store.list_collections().await.unwrap().is_empty());

    store.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_consumes_the_repository() {
    let repo = repository();

    repo.create(PersonDraft::new("Alice")).await.unwrap();
    repo.shutdown().await.unwrap();
}
