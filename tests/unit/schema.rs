use formwright::catalog::FieldType;
use formwright::document::{FieldUpdate, FormDocument};
use formwright::error::SchemaError;
use formwright::schema::{ColumnType, Dialect, compile};

fn document(name: &str, fields: &[(FieldType, &str)]) -> FormDocument {
    let mut doc = FormDocument::new();
    doc.set_form_name(name);
    for (t, column) in fields {
        let id = doc.place(*t).id.clone();
        doc.update(
            &id,
            FieldUpdate {
                name: Some((*column).to_string()),
                ..FieldUpdate::default()
            },
        );
    }
    doc
}

#[test]
fn empty_form_name_fails_regardless_of_fields() {
    for name in ["", "   "] {
        let doc = document(name, &[(FieldType::Text, "a"), (FieldType::Number, "b")]);
        assert!(matches!(compile(&doc), Err(SchemaError::InvalidDocument(_))));
    }
}

#[test]
fn form_without_fields_fails() {
    let doc = document("survey", &[]);
    assert!(matches!(compile(&doc), Err(SchemaError::InvalidDocument(_))));
}

#[test]
fn single_number_field() {
    let doc = document("people", &[(FieldType::Number, "age")]);
    let table = compile(&doc).unwrap();
    assert_eq!(table.name, "people");
    assert_eq!(table.columns.len(), 2);
    assert_eq!(table.columns[0].name, "id");
    assert_eq!(table.columns[0].column_type, ColumnType::Serial);
    assert_eq!(table.columns[1].name, "age");
    assert_eq!(table.columns[1].column_type, ColumnType::Integer);
}

#[test]
fn column_order_follows_field_order() {
    let doc = document(
        "s",
        &[
            (FieldType::Date, "when"),
            (FieldType::Text, "who"),
            (FieldType::Select, "what"),
        ],
    );
    let names: Vec<String> = compile(&doc)
        .unwrap()
        .columns
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["id", "when", "who", "what"]);
}

#[test]
fn radio_domain_ignores_configured_options() {
    let mut doc = document("s", &[(FieldType::Radio, "color")]);
    let id = doc.fields()[0].id.clone();
    doc.add_option(&id);
    doc.add_option(&id);
    let table = compile(&doc).unwrap();
    assert_eq!(
        table.column("color").unwrap().column_type,
        ColumnType::Enum(vec!["option1".into(), "option2".into()])
    );
}

#[test]
fn placed_defaults_compile_directly() {
    let mut doc = FormDocument::new();
    doc.set_form_name("contact");
    doc.place(FieldType::Text);
    doc.place(FieldType::Email);
    doc.place(FieldType::File);
    let sql = compile(&doc).unwrap().to_sql(Dialect::MySql);
    assert_eq!(
        sql,
        "CREATE TABLE contact (id INT AUTO_INCREMENT PRIMARY KEY, text_input VARCHAR(255), \
         email_input VARCHAR(255), file_upload VARCHAR(255))"
    );
}

#[test]
fn names_are_used_verbatim() {
    let doc = document("s", &[(FieldType::Text, "first name"), (FieldType::Text, "first name")]);
    let table = compile(&doc).unwrap();
    assert_eq!(table.columns[1].name, "first name");
    assert_eq!(table.columns[2].name, "first name");
}

#[test]
fn dialect_names_parse() {
    assert_eq!("MySQL".parse::<Dialect>().unwrap(), Dialect::MySql);
    assert_eq!("postgresql".parse::<Dialect>().unwrap(), Dialect::Postgres);
    assert!("oracle".parse::<Dialect>().is_err());
}
