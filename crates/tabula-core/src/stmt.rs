mod row;
pub use row::{Columns, Row};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;
