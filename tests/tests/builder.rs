use tests::prelude::*;

/// Immutable record built through its constructor.
#[derive(Debug, Clone, PartialEq)]
struct Point {
    id: i64,
    x: i32,
    y: i32,
    label: Option<String>,
}

impl Point {
    fn new(id: i64, x: i32, y: i32, label: Option<String>) -> Point {
        Point { id, x, y, label }
    }
}

impl Record for Point {
    type Key = i64;

    fn define(table: &mut TableBuilder<Self>) {
        table
            .name("points")
            .builder(&["id", "x", "y", "label"], |args| {
                Ok(Point::new(args.next()?, args.next()?, args.next()?, args.next()?))
            });
        table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
        table.column("x", |r| &r.x, |r| &mut r.x);
        table.column("y", |r| &r.y, |r| &mut r.y);
        table.column("label", |r| &r.label, |r| &mut r.label);
    }
}

/// Builder parameters listed in a different order from the columns.
#[derive(Debug, Clone, PartialEq)]
struct Swapped {
    id: i64,
    first: String,
    second: String,
}

impl Record for Swapped {
    type Key = i64;

    fn define(table: &mut TableBuilder<Self>) {
        table
            .name("swapped")
            .builder(&["second", "id", "first"], |args| {
                let second = args.next()?;
                let id = args.next()?;
                let first = args.next()?;
                Ok(Swapped { id, first, second })
            });
        table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
        table.column("first", |r| &r.first, |r| &mut r.first);
        table.column("second", |r| &r.second, |r| &mut r.second);
    }
}

/// Builder that reads a parameter with the wrong type.
#[derive(Debug)]
struct Mistyped {
    id: i64,
    name: String,
}

impl Record for Mistyped {
    type Key = i64;

    fn define(table: &mut TableBuilder<Self>) {
        table.name("mistyped").builder(&["id", "name"], |args| {
            let id: i64 = args.next()?;
            let name: i64 = args.next()?;
            Ok(Mistyped {
                id,
                name: name.to_string(),
            })
        });
        table.column("id", |r| &r.id, |r| &mut r.id).primary_key();
        table.column("name", |r| &r.name, |r| &mut r.name);
    }
}

fn builder_materializes_rows(test: &mut DbTest) {
    let db = test.setup_db(&tables![Point]);

    let points = [
        Point::new(1, 3, 4, None),
        Point::new(2, -1, 0, Some("origin-ish".to_string())),
    ];
    for point in &points {
        db.insert(point).unwrap();
    }

    assert_eq!(db.get::<Point>(2).unwrap(), Some(points[1].clone()));

    let mut all = db.get_all::<Point>().unwrap();
    all.sort_by_key(|point| point.id);
    assert_eq!(all, points);
}

fn builder_params_follow_declared_order(test: &mut DbTest) {
    let db = test.setup_db(&tables![Swapped]);

    let model = db.registry().describe::<Swapped>().unwrap();
    assert_eq!(
        model.builder_params().unwrap(),
        [
            ("second", stmt::Type::String),
            ("id", stmt::Type::I64),
            ("first", stmt::Type::String),
        ]
    );

    let record = Swapped {
        id: 1,
        first: "a".to_string(),
        second: "b".to_string(),
    };
    db.insert(&record).unwrap();
    assert_eq!(db.get::<Swapped>(1).unwrap(), Some(record));
}

fn builder_type_mismatch(test: &mut DbTest) {
    let db = test.setup_db(&tables![Mistyped]);
    db.insert(&Mistyped {
        id: 1,
        name: "n".to_string(),
    })
    .unwrap();

    let err = assert_err!(db.get::<Mistyped>(1));
    assert!(err.is_invalid_schema());
    assert_eq!(
        err.to_string(),
        "invalid schema: builder parameter `name` read as I64 but the column has type String"
    );
}

tests!(
    builder_materializes_rows,
    builder_params_follow_declared_order,
    builder_type_mismatch,
);
