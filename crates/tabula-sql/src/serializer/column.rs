use super::{Formatter, ToSql};

use tabula_core::schema::Column;

/// A column in a SELECT list. Binary UUIDs are converted to text and
/// aliased back to the column name so rows are addressed the same way
/// regardless of storage.
#[derive(Clone, Copy)]
pub(super) struct Selected<'a>(pub(super) &'a Column);

/// A column compared in a WHERE clause.
#[derive(Clone, Copy)]
pub(super) struct Projection<'a>(pub(super) &'a Column);

/// The bound parameter for a column value.
#[derive(Clone, Copy)]
pub(super) struct Placeholder<'a>(pub(super) &'a Column);

/// `column=placeholder` in an UPDATE's SET list.
#[derive(Clone, Copy)]
pub(super) struct Assignment<'a>(pub(super) &'a Column);

/// The bare column name.
#[derive(Clone, Copy)]
pub(super) struct Name<'a>(pub(super) &'a Column);

impl ToSql for Selected<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &self.0.name;

        if self.0.is_uuid_binary() {
            fmt!(f, "BIN_TO_UUID(" name ") AS " name);
        } else {
            fmt!(f, name);
        }
    }
}

impl ToSql for Projection<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &self.0.name;

        if self.0.is_uuid_binary() {
            fmt!(f, "BIN_TO_UUID(" name ")");
        } else {
            fmt!(f, name);
        }
    }
}

impl ToSql for Placeholder<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if self.0.is_uuid_binary() {
            fmt!(f, "UUID_TO_BIN(?)");
        } else {
            fmt!(f, "?");
        }
    }
}

impl ToSql for Assignment<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &self.0.name;
        let placeholder = Placeholder(self.0);
        fmt!(f, name "=" placeholder);
    }
}

impl ToSql for Name<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, (&self.0.name));
    }
}
