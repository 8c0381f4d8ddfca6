//! Failure kinds of the optional value API.
//!
//! Absence is never an error. Only caller bugs (a required argument that is
//! null), ambiguous single-element lookups and explicit escapes out of an
//! absent option fail.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OptionError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// A required argument was null. Only reachable through the C ABI, since
    /// Rust references and closures cannot be null.
    #[error("invalid argument: `{0}` must not be null")]
    InvalidArgument(&'static str),

    #[error("sequence contains more than one matching element")]
    AmbiguousResult,

    #[error("{}", .0.as_deref().unwrap_or("option value is missing"))]
    OptionValueMissing(Option<String>),
}

impl OptionError {
    /// The message carried by an [`OptionError::OptionValueMissing`], if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            OptionError::OptionValueMissing(message) => message.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_value_renders_message() {
        let error = OptionError::OptionValueMissing(Some("user not found".to_owned()));
        assert_eq!(error.to_string(), "user not found");
        assert_eq!(error.message(), Some("user not found"));

        let error = OptionError::OptionValueMissing(None);
        assert_eq!(error.to_string(), "option value is missing");
        assert_eq!(error.message(), None);
    }

    #[test]
    fn invalid_argument_names_the_argument() {
        let error = OptionError::InvalidArgument("factory");
        assert_eq!(error.to_string(), "invalid argument: `factory` must not be null");
        assert_eq!(error.message(), None);
    }
}
