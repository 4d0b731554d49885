pub mod db;
pub use db::{Db, Session, Statement};

pub mod driver;

mod keys;
pub use keys::KeyAllocator;

mod model;
pub use model::{Args, ColumnBuilder, Model, TableBuilder};

mod primitive;
pub use primitive::{NullPolicy, Primitive};

mod record;
pub use record::{Record, TableRef};

mod registry;
pub use registry::Registry;

pub use tabula_core::{
    schema::{self, ReferenceOption},
    stmt, Error, Result,
};
