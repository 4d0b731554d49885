use super::Error;

/// Error when a table definition is invalid.
///
/// This occurs when:
/// - A table has no name, no columns, or duplicate column names
/// - More than one primary key or builder is declared
/// - A column configuration is invalid (auto_increment on non-integer type)
/// - An operation needs a primary key the table does not have
///
/// These errors are raised the first time a record type is described or a
/// statement for it is generated, never later at execution.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.chain()
            .any(|err| matches!(err.kind(), super::ErrorKind::InvalidSchema(_)))
    }
}
