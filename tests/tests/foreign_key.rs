use tests::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Category {
    id: i64,
    name: String,
}

impl Record for Category {
    type Key = i64;

    fn define(table: &mut TableBuilder<Self>) {
        table.name("categories").default_with(Category::default);
        table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
        table.column("name", |r| &r.name, |r| &mut r.name);
    }
}

/// A child table whose `category` column references `categories.id` with
/// the given referential actions.
macro_rules! child {
    ($name:ident, $table:literal, $ty:ty, |$column:ident| $configure:expr) => {
        #[derive(Debug, Default, Clone, PartialEq)]
        struct $name {
            id: i64,
            category: $ty,
        }

        impl Record for $name {
            type Key = i64;

            fn define(table: &mut TableBuilder<Self>) {
                table.name($table).default_with($name::default);
                table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
                let $column = table
                    .column("category", |r| &r.category, |r| &mut r.category)
                    .references::<Category>();
                $configure;
            }
        }
    };
}

child!(SetNullChild, "set_null_children", Option<i64>, |c| c
    .on_delete(ReferenceOption::SetNull));
child!(CascadeChild, "cascade_children", i64, |c| c
    .on_delete(ReferenceOption::Cascade)
    .on_update(ReferenceOption::Cascade));
child!(RestrictChild, "restrict_children", i64, |c| c
    .on_delete(ReferenceOption::Restrict));
child!(NoActionChild, "no_action_children", i64, |c| c
    .on_delete(ReferenceOption::NoAction));
child!(PlainChild, "plain_children", i64, |c| c);
child!(UpdateSetNullChild, "update_set_null_children", Option<i64>, |c| c
    .on_update(ReferenceOption::SetNull));
child!(UpdateRestrictChild, "update_restrict_children", i64, |c| c
    .on_update(ReferenceOption::Restrict));
child!(UpdateNoActionChild, "update_no_action_children", i64, |c| c
    .on_update(ReferenceOption::NoAction));

#[derive(Debug, Default, Clone, PartialEq)]
struct Employee {
    id: i64,
    name: String,
    manager: Option<i64>,
}

impl Record for Employee {
    type Key = i64;

    fn define(table: &mut TableBuilder<Self>) {
        table.name("employees").default_with(Employee::default);
        table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
        table.column("name", |r| &r.name, |r| &mut r.name);
        table
            .column("manager", |r| &r.manager, |r| &mut r.manager)
            .references::<Employee>()
            .on_delete(ReferenceOption::SetNull);
    }
}

fn parent(db: &Db) -> Category {
    let category = Category {
        id: 1,
        name: "science".to_string(),
    };
    db.insert(&category).unwrap();
    category
}

fn set_null(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, SetNullChild]);
    let category = parent(&db);

    db.insert(&SetNullChild {
        id: 1,
        category: Some(1),
    })
    .unwrap();
    db.delete(&category).unwrap();

    let child = assert_some!(db.get::<SetNullChild>(1).unwrap());
    assert_none!(child.category);
}

fn cascade(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, CascadeChild]);
    parent(&db);

    db.insert(&CascadeChild { id: 1, category: 1 }).unwrap();

    let mut session = db.connect().unwrap();
    session
        .execute("UPDATE categories SET id = 100 WHERE id = 1")
        .unwrap();
    let child = assert_some!(session.get::<CascadeChild>(1).unwrap());
    assert_eq!(child.category, 100);

    session.delete_by_key::<Category>(100).unwrap();
    assert_none!(session.get::<CascadeChild>(1).unwrap());
}

fn restrict(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, RestrictChild]);
    let category = parent(&db);

    db.insert(&RestrictChild { id: 1, category: 1 }).unwrap();

    let err = assert_err!(db.delete(&category));
    assert!(err.is_driver_operation_failed());
    assert_some!(db.get::<Category>(1).unwrap());
}

fn no_action(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, NoActionChild]);
    let category = parent(&db);

    db.insert(&NoActionChild { id: 1, category: 1 }).unwrap();

    let err = assert_err!(db.delete(&category));
    assert!(err.is_driver_operation_failed());
}

fn update_set_null(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, UpdateSetNullChild]);
    parent(&db);

    db.insert(&UpdateSetNullChild {
        id: 1,
        category: Some(1),
    })
    .unwrap();

    let mut session = db.connect().unwrap();
    assert_ok!(session.execute("UPDATE categories SET id = 100 WHERE id = 1"));

    let child = assert_some!(session.get::<UpdateSetNullChild>(1).unwrap());
    assert_none!(child.category);
    assert_some!(session.get::<Category>(100).unwrap());
}

fn update_restrict(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, UpdateRestrictChild]);
    parent(&db);

    db.insert(&UpdateRestrictChild { id: 1, category: 1 }).unwrap();

    let mut session = db.connect().unwrap();
    let err = assert_err!(session.execute("UPDATE categories SET id = 100 WHERE id = 1"));
    assert!(err.is_driver_operation_failed());

    assert_some!(session.get::<Category>(1).unwrap());
    assert_none!(session.get::<Category>(100).unwrap());
    let child = assert_some!(session.get::<UpdateRestrictChild>(1).unwrap());
    assert_eq!(child.category, 1);
}

fn update_no_action(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, UpdateNoActionChild]);
    parent(&db);

    db.insert(&UpdateNoActionChild { id: 1, category: 1 }).unwrap();

    let mut session = db.connect().unwrap();
    let err = assert_err!(session.execute("UPDATE categories SET id = 100 WHERE id = 1"));
    assert!(err.is_driver_operation_failed());

    let child = assert_some!(session.get::<UpdateNoActionChild>(1).unwrap());
    assert_eq!(child.category, 1);
}

fn no_options(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, PlainChild]);
    let category = parent(&db);

    // The reference itself is still enforced
    let err = assert_err!(db.insert(&PlainChild { id: 1, category: 2 }));
    assert!(err.is_driver_operation_failed());

    db.insert(&PlainChild { id: 1, category: 1 }).unwrap();
    let err = assert_err!(db.delete(&category));
    assert!(err.is_driver_operation_failed());
}

fn self_reference(test: &mut DbTest) {
    let db = test.setup_db(&tables![Employee]);

    let table = db.registry().table::<Employee>().unwrap();
    let (_, foreign_key) = assert_some!(table.foreign_keys().next());
    assert_eq!(foreign_key.table, "employees");
    assert_eq!(foreign_key.column, "id");

    let boss = Employee {
        id: 1,
        name: "boss".to_string(),
        manager: None,
    };
    db.insert(&boss).unwrap();
    db.insert(&Employee {
        id: 2,
        name: "report".to_string(),
        manager: Some(1),
    })
    .unwrap();

    db.delete(&boss).unwrap();

    let report = assert_some!(db.get::<Employee>(2).unwrap());
    assert_none!(report.manager);
}

fn drop_tables_in_reverse(test: &mut DbTest) {
    let db = test.setup_db(&tables![Category, CascadeChild]);

    // Children are dropped before the table they reference
    db.drop_tables(&tables![Category, CascadeChild]).unwrap();
    assert_err!(db.get_all::<Category>());
}

tests!(
    set_null,
    cascade,
    restrict,
    no_action,
    update_set_null,
    update_restrict,
    update_no_action,
    no_options,
    self_reference,
    drop_tables_in_reverse,
);
