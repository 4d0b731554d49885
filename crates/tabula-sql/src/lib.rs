mod generator;
pub use generator::{Generator, StatementKind};

pub mod serializer;
pub use serializer::Serializer;
