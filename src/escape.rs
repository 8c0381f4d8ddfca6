//! Escape hatches out of [`Option`]: conversions that give up the wrapper,
//! either by substituting a default or by failing.
//!
//! These live behind an extension trait so that call sites opt in with an
//! explicit `use optional_value::escape::EscapeExt`.

use tracing::debug;

use crate::error::{OptionError, Result};
use crate::option::Option;

pub trait EscapeExt<T> {
    /// Converts into a `std::option::Option` for plain `Copy` payloads.
    fn to_nullable(self) -> std::option::Option<T>
    where
        T: Copy;

    /// The payload, or `T::default()` when absent.
    fn value_or_default(self) -> T
    where
        T: Default;

    /// The payload.
    ///
    /// # Errors
    ///
    /// [`OptionError::OptionValueMissing`] without a message when absent.
    fn value_or_failure(self) -> Result<T>;

    /// The payload.
    ///
    /// # Errors
    ///
    /// [`OptionError::OptionValueMissing`] carrying `message` when absent.
    fn value_or_failure_msg(self, message: &str) -> Result<T>;

    /// The payload. `message_factory` runs once, only when absent.
    ///
    /// # Errors
    ///
    /// [`OptionError::OptionValueMissing`] carrying the produced message.
    ///
    /// ```
    /// use optional_value::{escape::EscapeExt, Option, OptionError};
    ///
    /// let id = 42;
    /// let user: Option<String> = Option::none();
    /// assert_eq!(
    ///     user.value_or_failure_with(|| format!("no user with id {id}")),
    ///     Err(OptionError::OptionValueMissing(Some("no user with id 42".to_owned())))
    /// );
    /// ```
    fn value_or_failure_with<F>(self, message_factory: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> EscapeExt<T> for Option<T> {
    #[inline]
    fn to_nullable(self) -> std::option::Option<T>
    where
        T: Copy,
    {
        self.into()
    }

    #[inline]
    fn value_or_default(self) -> T
    where
        T: Default,
    {
        self.value_or_else(T::default)
    }

    fn value_or_failure(self) -> Result<T> {
        missing_or(self, || None)
    }

    fn value_or_failure_msg(self, message: &str) -> Result<T> {
        missing_or(self, || Some(message.to_owned()))
    }

    fn value_or_failure_with<F>(self, message_factory: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        missing_or(self, || Some(message_factory()))
    }
}

fn missing_or<T, F>(option: Option<T>, message: F) -> Result<T>
where
    F: FnOnce() -> std::option::Option<String>,
{
    match std::option::Option::from(option) {
        Some(value) => Ok(value),
        None => {
            let message = message();
            debug!(reason = message.as_deref(), "option value is missing");
            Err(OptionError::OptionValueMissing(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn to_nullable() {
        assert_eq!(Option::some(3u8).to_nullable(), Some(3));
        assert_eq!(Option::some(0u8).to_nullable(), Some(0));
        assert_eq!(Option::<u8>::none().to_nullable(), None);
    }

    #[test]
    fn value_or_default() {
        assert_eq!(Option::some(5).value_or_default(), 5);
        assert_eq!(Option::<i32>::none().value_or_default(), 0);
        assert_eq!(Option::<String>::none().value_or_default(), "");
    }

    #[test]
    fn value_or_failure() {
        assert_eq!(Option::some(5).value_or_failure(), Ok(5));
        assert_eq!(
            Option::<i32>::none().value_or_failure(),
            Err(OptionError::OptionValueMissing(None))
        );
    }

    #[test]
    fn value_or_failure_msg() {
        assert_eq!(Option::some(5).value_or_failure_msg("unused"), Ok(5));
        let error = Option::<i32>::none()
            .value_or_failure_msg("port is not configured")
            .expect_err("absent option should fail");
        assert_eq!(error.message(), Some("port is not configured"));
        assert_eq!(error.to_string(), "port is not configured");
    }

    #[test]
    fn message_factory_runs_only_when_absent() {
        let calls = Cell::new(0);
        let factory = || {
            calls.set(calls.get() + 1);
            "missing".to_owned()
        };

        assert_eq!(Option::some(1).value_or_failure_with(factory), Ok(1));
        assert_eq!(calls.get(), 0);

        assert_eq!(
            Option::<i32>::none().value_or_failure_with(factory),
            Err(OptionError::OptionValueMissing(Some("missing".to_owned())))
        );
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failure_propagates_with_question_mark() {
        fn lookup(option: Option<&str>) -> Result<usize> {
            let name = option.value_or_failure_msg("name")?;
            Ok(name.len())
        }

        assert_eq!(lookup(Option::some("ada")), Ok(3));
        assert!(matches!(
            lookup(Option::none()),
            Err(OptionError::OptionValueMissing(_))
        ));
    }
}
