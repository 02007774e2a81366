use formwright::catalog::FieldType;
use formwright::document::FormDocument;
use formwright::error::{SchemaError, StorageError};
use formwright::schema::{ColumnDefinition, ColumnType, Dialect, TableDefinition, compile};
use formwright::storage::{FormStorage, sqlite::SqliteStorage};

fn survey() -> FormDocument {
    let mut doc = FormDocument::new();
    doc.set_form_name("survey");
    doc.place(FieldType::Text);
    doc.place(FieldType::Number);
    doc.place(FieldType::Date);
    doc.place(FieldType::Radio);
    doc
}

#[tokio::test]
async fn create_table_from_document() {
    let storage = SqliteStorage::new("sqlite::memory:").await.expect("init");
    assert_eq!(storage.dialect(), Dialect::Sqlite);
    let table = compile(&survey()).unwrap();
    storage.create_table(&table).await.unwrap();
    assert!(storage.table_exists("survey").await.unwrap());
    assert_eq!(
        storage.table_columns("survey").await.unwrap(),
        vec!["id", "text_input", "number_input", "date_input", "radio_buttons"]
    );
}

#[tokio::test]
async fn choice_columns_accept_only_fixed_domain() {
    let storage = SqliteStorage::new("sqlite::memory:").await.expect("init");
    storage.create_table(&compile(&survey()).unwrap()).await.unwrap();
    let inserted = storage
        .execute("INSERT INTO survey (text_input, radio_buttons) VALUES ('x', 'option2')")
        .await
        .unwrap();
    assert_eq!(inserted, 1);
    let err = storage
        .execute("INSERT INTO survey (text_input, radio_buttons) VALUES ('x', 'option3')")
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Constraint(_)));
}

#[tokio::test]
async fn creating_existing_table_fails() {
    let storage = SqliteStorage::new("sqlite::memory:").await.expect("init");
    let table = compile(&survey()).unwrap();
    storage.create_table(&table).await.unwrap();
    match storage.create_table(&table).await {
        Err(StorageError::Constraint(msg)) => assert!(msg.contains("already exists"), "{msg}"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn missing_table_has_no_columns() {
    let storage = SqliteStorage::new("sqlite::memory:").await.expect("init");
    assert!(!storage.table_exists("nothing").await.unwrap());
    assert!(storage.table_columns("nothing").await.unwrap().is_empty());
}

#[tokio::test]
async fn open_rejects_unknown_backend() {
    assert!(formwright::storage::open("mysql://localhost/survey").await.is_err());
    assert!(formwright::storage::open("sqlite::memory:").await.is_ok());
}

#[tokio::test]
async fn hand_built_definition_with_separator_is_refused() {
    let storage = SqliteStorage::new("sqlite::memory:").await.expect("init");
    storage.create_table(&compile(&survey()).unwrap()).await.unwrap();
    let table = TableDefinition {
        name: "t (a TEXT); DROP TABLE survey; CREATE TABLE t2".into(),
        columns: vec![ColumnDefinition {
            name: "b".into(),
            column_type: ColumnType::VarChar(255),
        }],
    };
    let err = storage.create_table(&table).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::Rejected(SchemaError::InvalidIdentifier(_))
    ));
    assert!(storage.table_exists("survey").await.unwrap());
    assert!(!storage.table_exists("t2").await.unwrap());
}
