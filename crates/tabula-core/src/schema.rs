mod column;
pub use column::Column;

mod foreign_key;
pub use foreign_key::{ForeignKey, ReferenceOption};

mod index;
pub use index::Index;

mod pk;
pub use pk::PrimaryKey;

mod table;
pub use table::{Table, TableId};

mod ty;
pub use ty::Type;

mod verify;
