//! Error types for rechunkrs.

use std::fmt;

/// Errors that can occur while re-chunking.
///
/// There is a single kind of failure: an argument that cannot be used. The
/// message tells which argument and which constraint failed. Validation
/// failures are permanent; an operation that reports one emits no further
/// chunks, while chunks emitted before it stay valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RechunkError {
    /// An argument, or an item pulled from a source, was rejected.
    InvalidArgument {
        /// Name of the offending argument (`input`, `chunk_size` or `item`).
        argument: &'static str,
        /// Description of the violated constraint.
        message: String,
    },
}

impl RechunkError {
    /// The single buffer handed to [`split_buffer`](crate::split_buffer) is not a
    /// recognized binary view.
    pub(crate) fn input_not_a_view() -> Self {
        RechunkError::InvalidArgument {
            argument: "input",
            message: "expected a recognized binary view".to_string(),
        }
    }

    /// The chunk size is not a positive safe integer.
    pub(crate) fn chunk_size(value: impl fmt::Display) -> Self {
        RechunkError::InvalidArgument {
            argument: "chunk_size",
            message: format!(
                "expected a positive integer no greater than {}, got {}",
                crate::config::MAX_SAFE_INTEGER,
                value
            ),
        }
    }

    /// Item number `index` (zero based) of a source sequence is not a
    /// recognized binary view.
    pub(crate) fn item_not_a_view(index: u64) -> Self {
        RechunkError::InvalidArgument {
            argument: "item",
            message: format!("item {} of the source is not a recognized binary view", index),
        }
    }

    /// Returns the name of the rejected argument.
    pub fn argument(&self) -> &'static str {
        match self {
            RechunkError::InvalidArgument { argument, .. } => argument,
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        match self {
            RechunkError::InvalidArgument { message, .. } => message,
        }
    }
}

impl fmt::Display for RechunkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RechunkError::InvalidArgument { argument, message } => {
                write!(f, "invalid argument `{}`: {}", argument, message)
            }
        }
    }
}

impl std::error::Error for RechunkError {}

impl From<RechunkError> for std::io::Error {
    fn from(e: RechunkError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_argument() {
        let err = RechunkError::chunk_size(0);
        let s = err.to_string();
        assert!(s.contains("`chunk_size`"));
        assert!(s.contains("got 0"));
    }

    #[test]
    fn test_accessors() {
        let err = RechunkError::item_not_a_view(3);
        assert_eq!(err.argument(), "item");
        assert!(err.message().contains("item 3"));

        let err = RechunkError::input_not_a_view();
        assert_eq!(err.argument(), "input");
    }

    #[test]
    fn test_io_error_conversion() {
        let err: std::io::Error = RechunkError::chunk_size(-1).into();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
