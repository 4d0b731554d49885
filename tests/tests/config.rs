use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};
use tabula::driver::{Capability, Connection, Driver};
use tests::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Book {
    id: i32,
    title: String,
}

impl Record for Book {
    type Key = i32;

    fn define(table: &mut TableBuilder<Self>) {
        table.name("books").default_with(Book::default);
        table
            .column("id", |r| &r.id, |r| &mut r.id)
            .auto_increment();
        table.column("title", |r| &r.title, |r| &mut r.title);
    }
}

/// What a [`Recording`] connection was asked to run.
#[derive(Debug, Clone, PartialEq)]
enum Sent {
    Execute(String),
    Exec(String, Vec<stmt::Value>),
    Batch(String, usize),
    Query(String),
}

/// Driver that records statements instead of running them. Queries return
/// no rows.
#[derive(Debug, Default, Clone)]
struct Recording {
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl Recording {
    fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl Driver for Recording {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed("recording://")
    }

    fn capability(&self) -> &'static Capability {
        &Capability::MYSQL
    }

    fn connect(&self) -> tabula::Result<Box<dyn Connection>> {
        Ok(Box::new(self.clone()))
    }
}

impl Connection for Recording {
    fn execute(&mut self, sql: &str) -> tabula::Result<()> {
        self.sent.lock().unwrap().push(Sent::Execute(sql.to_string()));
        Ok(())
    }

    fn exec(&mut self, sql: &str, params: &[stmt::Value]) -> tabula::Result<u64> {
        let sent = Sent::Exec(sql.to_string(), params.to_vec());
        self.sent.lock().unwrap().push(sent);
        Ok(1)
    }

    fn exec_batch(&mut self, sql: &str, batch: &[Vec<stmt::Value>]) -> tabula::Result<u64> {
        let sent = Sent::Batch(sql.to_string(), batch.len());
        self.sent.lock().unwrap().push(sent);
        Ok(batch.len() as u64)
    }

    fn query(&mut self, sql: &str, _params: &[stmt::Value]) -> tabula::Result<Vec<stmt::Row>> {
        self.sent.lock().unwrap().push(Sent::Query(sql.to_string()));
        Ok(vec![])
    }
}

fn recording_db() -> (Db, Recording) {
    let driver = Recording::default();
    let db = Db::builder().build(driver.clone());
    (db, driver)
}

#[test]
fn unknown_scheme_is_rejected() {
    let err = assert_err!(Db::builder().connect("postgres://localhost/db"));
    assert!(err.is_invalid_connection_url());
    assert_eq!(
        err.to_string(),
        "invalid connection URL: unsupported database; \
         scheme=postgres; url=postgres://localhost/db"
    );
}

#[test]
fn malformed_url_is_rejected() {
    let err = assert_err!(Db::builder().connect("no scheme here"));
    assert!(err.is_invalid_connection_url());
}

#[test]
fn empty_sqlite_path_is_rejected() {
    let err = assert_err!(Db::builder().connect("sqlite:"));
    assert!(err.is_invalid_connection_url());
}

#[cfg(not(feature = "mysql"))]
#[test]
fn mysql_requires_its_feature() {
    let err = assert_err!(Db::builder().connect("mysql://localhost/db"));
    assert!(err.is_invalid_connection_url());
    assert_eq!(
        err.to_string(),
        "invalid connection URL: `mysql` feature not enabled"
    );
}

#[cfg(feature = "mysql")]
#[test]
fn mysql_url_parameters_are_validated() {
    let err = assert_err!(Db::builder().connect("mysql://localhost/db?pool=3"));
    assert!(err.is_invalid_connection_url());
}

#[test]
fn null_policy_defaults_to_coerce() {
    let (db, _) = recording_db();
    assert_eq!(db.null_policy(), NullPolicy::Coerce);

    let db = Db::builder()
        .strict_nulls(true)
        .build(Recording::default());
    assert_eq!(db.null_policy(), NullPolicy::Strict);
}

#[test]
fn capability_follows_driver() {
    let (db, _) = recording_db();
    assert!(db.capability().is_mysql());
    assert_eq!(db.driver().url(), "recording://");
}

#[test]
fn update_binds_values_then_key() {
    let (db, driver) = recording_db();

    let book = Book {
        id: 7,
        title: "Dune".to_string(),
    };
    assert_eq!(db.update(&book).unwrap(), 1);

    assert_eq!(
        driver.take(),
        [Sent::Exec(
            "UPDATE books SET title=? WHERE id=?".to_string(),
            vec!["Dune".into(), 7.into()],
        )]
    );
}

#[test]
fn batches_are_flushed_per_chunk() {
    let (db, driver) = recording_db();

    let books: Vec<_> = (1..=5)
        .map(|id| Book {
            id,
            title: format!("volume {id}"),
        })
        .collect();
    db.insert_batch(2, &books).unwrap();

    let sql = "INSERT INTO books (id,title) VALUES (?,?)".to_string();
    assert_eq!(
        driver.take(),
        [
            Sent::Batch(sql.clone(), 2),
            Sent::Batch(sql.clone(), 2),
            Sent::Batch(sql, 1),
        ]
    );
}

#[test]
fn truncate_uses_native_statement() {
    let (db, driver) = recording_db();

    assert_eq!(db.generate_key::<Book>().unwrap(), 1);
    db.truncate(&tables![Book]).unwrap();

    assert_eq!(
        driver.take(),
        [Sent::Exec("TRUNCATE TABLE books".to_string(), vec![])]
    );
    assert_eq!(db.generate_key::<Book>().unwrap(), 1);
}

#[test]
fn preload_without_rows_starts_at_one() {
    let (db, driver) = recording_db();

    db.preload(&tables![Book]).unwrap();

    assert_eq!(
        driver.take(),
        [Sent::Query("SELECT MAX(id) FROM books".to_string())]
    );
    assert_eq!(db.generate_key::<Book>().unwrap(), 1);
}

#[test]
fn statements_are_generated_once() {
    let (db, driver) = recording_db();

    let book = Book {
        id: 1,
        title: "Emma".to_string(),
    };
    db.insert(&book).unwrap();
    db.insert(&book).unwrap();

    let sent = driver.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
}

#[test]
fn create_tables_drops_existing_first() {
    let (db, driver) = recording_db();

    db.create_tables(&tables![Book]).unwrap();

    let sent = driver.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], Sent::Execute("DROP TABLE IF EXISTS books".to_string()));
    match &sent[1] {
        Sent::Execute(sql) => assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS books ("), "{sql}"),
        other => panic!("unexpected statement; {other:?}"),
    }
}
