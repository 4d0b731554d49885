use tabula::Registry;
use tests::prelude::*;

macro_rules! record {
    ($name:ident { $( $field:ident : $ty:ty ),* } => |$table:ident| $define:block) => {
        #[derive(Debug, Default)]
        #[allow(dead_code)]
        struct $name {
            $( $field: $ty, )*
        }

        impl Record for $name {
            type Key = i64;

            fn define($table: &mut TableBuilder<Self>) $define
        }
    };
}

record!(Unnamed { id: i64 } => |table| {
    table.default_with(Unnamed::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
});

record!(NoColumns {} => |table| {
    table.name("no_columns").default_with(NoColumns::default);
});

record!(DuplicateColumn { id: i64, a: i64 } => |table| {
    table.name("dup").default_with(DuplicateColumn::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
    table.column("id", |r| &r.a, |r| &mut r.a);
});

record!(TextAutoIncrement { id: String } => |table| {
    table.name("text_auto").default_with(TextAutoIncrement::default);
    table.column("id", |r| &r.id, |r| &mut r.id).auto_increment();
});

record!(KeyMismatch { id: i32 } => |table| {
    table.name("key_mismatch").default_with(KeyMismatch::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
});

record!(JsonInteger { id: i64, n: i32 } => |table| {
    table.name("json_int").default_with(JsonInteger::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
    table.column("n", |r| &r.n, |r| &mut r.n).json();
});

record!(DanglingAction { id: i64, parent: i64 } => |table| {
    table.name("dangling").default_with(DanglingAction::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
    table
        .column("parent", |r| &r.parent, |r| &mut r.parent)
        .on_delete(ReferenceOption::Cascade);
});

record!(NoStrategy { id: i64 } => |table| {
    table.name("no_strategy");
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
});

record!(UnknownParam { id: i64 } => |table| {
    table.name("unknown_param").builder(&["id", "nope"], |args| {
        Ok(UnknownParam { id: args.next()? })
    });
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
});

record!(TwoBuilders { id: i64 } => |table| {
    table.name("two_builders");
    table.builder(&["id"], |args| Ok(TwoBuilders { id: args.next()? }));
    table.builder(&["id"], |args| Ok(TwoBuilders { id: args.next()? }));
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
});

record!(BadReference { id: i64, parent: i64 } => |table| {
    table.name("bad_reference").default_with(BadReference::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
    table
        .column("parent", |r| &r.parent, |r| &mut r.parent)
        .references::<BadReference>()
        .referenced_column("missing");
});

record!(CycleA { id: i64, b: i64 } => |table| {
    table.name("cycle_a").default_with(CycleA::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
    table.column("b", |r| &r.b, |r| &mut r.b).references::<CycleB>();
});

record!(CycleB { id: i64, a: i64 } => |table| {
    table.name("cycle_b").default_with(CycleB::default);
    table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
    table.column("a", |r| &r.a, |r| &mut r.a).references::<CycleA>();
});

fn describe_err<T: Record>() -> String {
    let registry = Registry::new();
    let err = assert_err!(registry.describe::<T>());
    assert!(err.is_invalid_schema(), "{err}");
    assert!(registry.is_empty());
    err.to_string()
}

#[test]
fn missing_table_name() {
    assert!(describe_err::<Unnamed>().contains("does not declare a table name"));
}

#[test]
fn no_columns() {
    assert_eq!(
        describe_err::<NoColumns>(),
        "invalid schema: table `no_columns` has no columns"
    );
}

#[test]
fn duplicate_column() {
    assert_eq!(
        describe_err::<DuplicateColumn>(),
        "invalid schema: table `dup` has duplicate column `id`"
    );
}

#[test]
fn auto_increment_requires_integer() {
    assert_eq!(
        describe_err::<TextAutoIncrement>(),
        "invalid schema: table `text_auto` column `id` is auto_increment but has non-integer type String"
    );
}

#[test]
fn key_type_must_match_column() {
    assert!(describe_err::<KeyMismatch>().contains("declares a key of type I64"));
}

#[test]
fn json_requires_string() {
    assert!(describe_err::<JsonInteger>().contains("`json` is not valid for column `n` of type I32"));
}

#[test]
fn referential_action_requires_reference() {
    assert!(describe_err::<DanglingAction>()
        .contains("`on_delete` on column `parent` requires `references` first"));
}

#[test]
fn construction_path_required() {
    assert!(describe_err::<NoStrategy>().contains("neither a builder nor `default_with`"));
}

#[test]
fn builder_params_must_name_columns() {
    assert!(describe_err::<UnknownParam>()
        .contains("builder parameter `nope` does not match a column of table `unknown_param`"));
}

#[test]
fn single_builder() {
    assert!(describe_err::<TwoBuilders>().contains("declares 2 builders"));
}

#[test]
fn referenced_column_must_exist() {
    assert!(describe_err::<BadReference>()
        .contains("references missing column `bad_reference.missing`"));
}

#[test]
fn foreign_key_cycles_are_rejected() {
    assert!(describe_err::<CycleA>().contains("form a cycle"));
}

#[test]
fn describe_is_cached() {
    #[derive(Debug, Default)]
    struct Tag {
        id: i64,
    }

    impl Record for Tag {
        type Key = i64;

        fn define(table: &mut TableBuilder<Self>) {
            table.name("tags").default_with(Tag::default);
            table.column("id", |r| &r.id, |r| &mut r.id).auto_increment();
        }
    }

    let registry = Registry::new();
    let first = registry.describe::<Tag>().unwrap();
    let second = registry.describe::<Tag>().unwrap();

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
    assert_eq!(first.table().name, "tags");
    assert!(first.table().is_auto_increment());
    assert_eq!(registry.primary_key(&Tag { id: 9 }).unwrap(), 9);
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Account {
    id: i64,
    email: String,
    region: String,
}

impl Record for Account {
    type Key = i64;

    fn define(table: &mut TableBuilder<Self>) {
        table.name("accounts").default_with(Account::default);
        table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
        table
            .column("email", |r| &r.email, |r| &mut r.email)
            .unique_index("accounts_email");
        table
            .column("region", |r| &r.region, |r| &mut r.region)
            .length(8)
            .index("accounts_region");
    }
}

fn unique_index_is_enforced(test: &mut DbTest) {
    let db = test.setup_db(&tables![Account]);

    let account = Account {
        id: 1,
        email: "a@example.com".to_string(),
        region: "eu".to_string(),
    };
    db.insert(&account).unwrap();

    let err = assert_err!(db.insert(&Account { id: 2, ..account }));
    assert!(err.is_driver_operation_failed());
}

fn create_tables_replaces_existing(test: &mut DbTest) {
    let db = test.setup_db(&tables![Account]);
    db.insert(&Account {
        id: 1,
        email: "a@example.com".to_string(),
        region: "eu".to_string(),
    })
    .unwrap();

    db.create_tables(&tables![Account]).unwrap();
    assert!(db.get_all::<Account>().unwrap().is_empty());
}

fn drop_tables_removes_them(test: &mut DbTest) {
    let db = test.setup_db(&tables![Account]);
    db.drop_tables(&tables![Account]).unwrap();

    let err = assert_err!(db.get_all::<Account>());
    assert!(err.is_driver_operation_failed());
}

tests!(
    unique_index_is_enforced,
    create_tables_replaces_existing,
    drop_tables_removes_them,
);
