use library_core::db::open_db_in_memory;
use library_core::repo::book_repo::{BookRepository, SqliteBookRepository};
use library_core::service::catalog_service::CatalogService;
use library_core::{BookFields, RepoError, ValidationError};

fn dune() -> BookFields {
    BookFields {
        title: "Dune".to_string(),
        author: "Frank Herbert".to_string(),
        genre: "Science Fiction".to_string(),
        external_id: "9780441013593".to_string(),
        description: "Desert planet.".to_string(),
    }
}

#[test]
fn add_assigns_increasing_ids_from_one() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteBookRepository::new(&conn));

    assert_eq!(catalog.add_book(&dune()).unwrap(), 1);
    assert_eq!(catalog.add_book(&BookFields::titled("Atlas")).unwrap(), 2);
    assert_eq!(catalog.add_book(&BookFields::titled("Emma")).unwrap(), 3);
}

#[test]
fn add_and_get_roundtrip_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteBookRepository::new(&conn));

    let id = catalog.add_book(&dune()).unwrap();
    let loaded = catalog.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.fields(), dune());
    assert!(catalog.get_book(id + 1).unwrap().is_none());
}

#[test]
fn list_is_sorted_by_title_bytewise() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteBookRepository::new(&conn));

    for title in ["dune", "Dune", "Atlas", "Zebra", "emma"] {
        catalog.add_book(&BookFields::titled(title)).unwrap();
    }

    let titles: Vec<String> = catalog
        .list_books()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, ["Atlas", "Dune", "Zebra", "dune", "emma"]);
}

#[test]
fn update_replaces_every_field() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteBookRepository::new(&conn));
    let id = catalog.add_book(&dune()).unwrap();

    let replacement = BookFields::titled("Dune Messiah");
    catalog.update_book(id, &replacement).unwrap();

    let loaded = catalog.get_book(id).unwrap().unwrap();
    assert_eq!(loaded.fields(), replacement);
    assert!(loaded.author.is_empty());
}

#[test]
fn update_and_delete_of_missing_book_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteBookRepository::new(&conn));

    let err = catalog.update_book(7, &dune()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "book", id: 7 }));

    let err = catalog.delete_book(7).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "book", id: 7 }));
}

#[test]
fn blank_title_is_rejected_on_add_and_update() {
    let conn = open_db_in_memory().unwrap();
    let catalog = CatalogService::new(SqliteBookRepository::new(&conn));

    let err = catalog.add_book(&BookFields::titled("   ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::BlankTitle)));
    assert!(catalog.list_books().unwrap().is_empty());

    let id = catalog.add_book(&dune()).unwrap();
    let err = catalog.update_book(id, &BookFields::default()).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::BlankTitle)));
    assert_eq!(catalog.get_book(id).unwrap().unwrap().title, "Dune");
}

#[test]
fn delete_cascades_to_ratings_and_ids_are_not_reused() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO users (username, secret) VALUES ('u', 's');", [])
        .unwrap();
    let repo = SqliteBookRepository::new(&conn);
    let first = repo.create_book(&dune()).unwrap();
    conn.execute(
        "INSERT INTO ratings (user_id, book_id, score) VALUES (1, ?1, 4);",
        [first],
    )
    .unwrap();

    let removed = repo.delete_book(first).unwrap();
    assert_eq!(removed, 1);
    assert!(repo.list_books().unwrap().is_empty());

    let dangling: i64 = conn
        .query_row("SELECT COUNT(*) FROM ratings;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(dangling, 0);

    let next = repo.create_book(&BookFields::titled("Atlas")).unwrap();
    assert!(next > first);
}
