use std::fmt::{self, Display};
use std::io;

/// Provides `ContagionError` and maps other errors to
/// convert to a `ContagionError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum ContagionError {
    /// A simulation was configured with parameters it cannot run with. The caller must
    /// construct a new engine with valid parameters.
    InvalidConfiguration(String),
    /// A member index outside `[0, population_size)`. No state was changed.
    OutOfRange {
        index: usize,
        population_size: usize,
    },
    IoError(io::Error),
    JsonError(serde_json::Error),
    ContagionError(String),
}

impl From<io::Error> for ContagionError {
    fn from(error: io::Error) -> Self {
        ContagionError::IoError(error)
    }
}

impl From<serde_json::Error> for ContagionError {
    fn from(error: serde_json::Error) -> Self {
        ContagionError::JsonError(error)
    }
}

impl From<String> for ContagionError {
    fn from(error: String) -> Self {
        ContagionError::ContagionError(error)
    }
}

impl From<&str> for ContagionError {
    fn from(error: &str) -> Self {
        ContagionError::ContagionError(error.to_string())
    }
}

impl std::error::Error for ContagionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ContagionError::IoError(error) => Some(error),
            ContagionError::JsonError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for ContagionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContagionError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {message}")
            }
            ContagionError::OutOfRange {
                index,
                population_size,
            } => write!(
                f,
                "index {index} is out of range for a population of {population_size}"
            ),
            ContagionError::IoError(error) => write!(f, "i/o error: {error}"),
            ContagionError::JsonError(error) => write!(f, "json error: {error}"),
            ContagionError::ContagionError(message) => write!(f, "error: {message}"),
        }
    }
}
