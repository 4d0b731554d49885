//! Common imports for test files
//!
//! ```ignore
//! use tests::prelude::*;
//! ```

pub use crate::{assert_err, assert_none, assert_ok, assert_some, slice::SliceUtil};
pub use crate::{tests, DbTest};

pub use tabula::{
    stmt, tables, Db, NullPolicy, Primitive, Record, ReferenceOption, Session, TableBuilder,
    TableRef,
};
