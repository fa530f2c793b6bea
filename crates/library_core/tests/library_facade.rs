use library_core::{
    BookFields, Library, LibraryConfig, LibraryError, LookupResponse, LookupTransport,
    RepoError, User,
};
use library_core::metadata::LookupError;
use std::sync::Arc;
use std::time::Duration;

struct CannedTransport {
    status: u16,
    body: &'static str,
}

impl LookupTransport for CannedTransport {
    fn get(&self, _url: &str) -> Result<LookupResponse, LookupError> {
        Ok(LookupResponse {
            status: self.status,
            body: self.body.to_string(),
        })
    }
}

struct DownTransport;

impl LookupTransport for DownTransport {
    fn get(&self, _url: &str) -> Result<LookupResponse, LookupError> {
        Err(LookupError::Transport("connection refused".to_string()))
    }
}

#[test]
fn end_to_end_scenario() {
    let library = Library::open_in_memory().unwrap();

    assert!(library.register("alice", "pw1").unwrap());
    assert!(!library.register("alice", "pw2").unwrap());

    let alice = library.login("alice", "pw1").unwrap().unwrap();
    assert_eq!(alice.username, "alice");
    assert!(library.login("alice", "pw2").unwrap().is_none());

    let dune = library.add_book(&BookFields::titled("Dune")).unwrap();
    let atlas = library.add_book(&BookFields::titled("Atlas")).unwrap();
    assert_eq!((dune, atlas), (1, 2));

    let titles: Vec<String> = library
        .list_books()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, ["Atlas", "Dune"]);
}

#[test]
fn ratings_and_delete_flow_through_the_facade() {
    let library = Library::open_in_memory().unwrap();
    library.register("alice", "a").unwrap();
    library.register("bob", "b").unwrap();
    let alice = library.login("alice", "a").unwrap().unwrap();
    let bob = library.login("bob", "b").unwrap().unwrap();

    let dune = library.add_book(&BookFields::titled("Dune")).unwrap();
    let atlas = library.add_book(&BookFields::titled("Atlas")).unwrap();

    library.set_rating(alice.id, dune, 4).unwrap();
    library.set_rating(bob.id, dune, 5).unwrap();
    library.set_rating(alice.id, atlas, 3).unwrap();
    library.set_rating(alice.id, atlas, 5).unwrap();

    let averages = library.get_average_ratings().unwrap();
    assert_eq!(averages[&dune], 4.5);
    assert_eq!(averages[&atlas], 5.0);
    assert_eq!(library.get_user_ratings(alice.id).unwrap().len(), 2);

    library.delete_book(dune).unwrap();
    assert!(library
        .list_books()
        .unwrap()
        .iter()
        .all(|book| book.id != dune));
    let averages = library.get_average_ratings().unwrap();
    assert!(!averages.contains_key(&dune));
    assert!(library.get_user_ratings(bob.id).unwrap().is_empty());

    assert!(matches!(
        library.delete_book(dune).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn rated_books_view_defaults_unrated_to_zero() {
    let library = Library::open_in_memory().unwrap();
    library.register("alice", "a").unwrap();
    let alice = library.login("alice", "a").unwrap().unwrap();
    let dune = library.add_book(&BookFields::titled("Dune")).unwrap();
    library.add_book(&BookFields::titled("Atlas")).unwrap();
    library.set_rating(alice.id, dune, 4).unwrap();

    let rated = library.list_rated_books(alice.id).unwrap();
    assert_eq!(rated[0].book.title, "Atlas");
    assert_eq!(rated[0].average, 0.0);
    assert_eq!(rated[0].user_score, None);
    assert_eq!(rated[1].book.title, "Dune");
    assert_eq!(rated[1].average, 4.0);
    assert_eq!(rated[1].user_score, Some(4));
}

#[test]
fn file_backed_library_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = LibraryConfig::for_database(dir.path().join("library.db"));

    {
        let mut library = Library::open(config.clone()).unwrap();
        library.ensure_schema().unwrap();
        library.register("alice", "pw").unwrap();
        library.add_book(&BookFields::titled("Dune")).unwrap();
    }

    let library = Library::open(config).unwrap();
    let alice: User = library.login("alice", "pw").unwrap().unwrap();
    assert_eq!(library.find_user(alice.id).unwrap(), Some(alice));
    assert_eq!(library.list_books().unwrap().len(), 1);
}

#[test]
fn file_backed_library_reopens_storage_for_each_operation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");
    let library = Library::open(LibraryConfig::for_database(&path)).unwrap();
    library.add_book(&BookFields::titled("Dune")).unwrap();
    assert_eq!(library.list_books().unwrap().len(), 1);

    // No handle outlives a call, so the next one starts from a fresh file.
    std::fs::remove_file(&path).unwrap();
    assert!(library.list_books().unwrap().is_empty());
    assert!(path.exists());

    let reopened = Library::open(LibraryConfig::for_database(&path)).unwrap();
    reopened.add_book(&BookFields::titled("Atlas")).unwrap();
    let titles: Vec<String> = library
        .list_books()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, ["Atlas"]);
}

#[test]
fn invalid_config_is_rejected_before_opening_storage() {
    let mut config = LibraryConfig::in_memory();
    config.metadata.read_timeout_ms = 0;
    assert!(matches!(
        Library::open(config),
        Err(LibraryError::Config(_))
    ));
}

#[test]
fn metadata_prefills_a_book_before_insert() {
    let library = Library::open_in_memory().unwrap().with_metadata_transport(Arc::new(
        CannedTransport {
            status: 200,
            body: r#"{"items": [{"volumeInfo": {"title": "Dune", "authors": ["Frank Herbert"], "description": "Arrakis."}}]}"#,
        },
    ));

    let metadata = library.fetch_by_identifier("9780441013593");
    let mut fields = BookFields {
        external_id: "9780441013593".to_string(),
        ..BookFields::default()
    };
    assert!(fields.apply_metadata(&metadata));

    let id = library.add_book(&fields).unwrap();
    let book = library.get_book(id).unwrap().unwrap();
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author, "Frank Herbert");
    assert_eq!(book.description, "Arrakis.");
}

#[test]
fn metadata_failures_are_empty_and_never_block_writes() {
    let library = Library::open_in_memory()
        .unwrap()
        .with_metadata_transport(Arc::new(DownTransport));

    assert!(library.fetch_by_identifier("123").is_empty());
    let pending = library.spawn_fetch("123").unwrap();
    assert!(pending.wait(Duration::from_secs(5)).is_empty());

    library.add_book(&BookFields::titled("Offline Book")).unwrap();
    assert_eq!(library.list_books().unwrap().len(), 1);

    let library = library.with_metadata_transport(Arc::new(CannedTransport {
        status: 200,
        body: r#"{"kind": "books#volumes", "totalItems": 0}"#,
    }));
    assert!(library.fetch_by_identifier("123").is_empty());
}
