use core::fmt;

/// Result alias for `commune`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the detection engine and its companion utilities.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Invalid argument value.
    InvalidArgument {
        /// Argument name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A metadata key was absent from a vertex.
    MissingMetadata {
        /// The key that was looked up.
        key: String,
    },

    /// A metadata value had an unexpected type.
    MetadataType {
        /// The key that was looked up.
        key: String,
        /// Type established by the first vertex.
        expected: &'static str,
        /// Type actually found.
        found: &'static str,
    },

    /// Cooperative cancellation was observed; partial results are discarded.
    Cancelled,

    /// Internal invariant violation. Not recoverable.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::InvalidArgument { name, message } => {
                write!(f, "invalid argument '{name}': {message}")
            }
            Error::MissingMetadata { key } => {
                write!(f, "metadata key '{key}' absent from a vertex")
            }
            Error::MetadataType {
                key,
                expected,
                found,
            } => {
                write!(
                    f,
                    "metadata key '{key}': expected {expected} value, found {found}"
                )
            }
            Error::Cancelled => write!(f, "computation cancelled"),
            Error::Internal(msg) => write!(f, "internal invariant violated: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
