//! C ABI over concrete instantiations of [`Option`]. `build.rs` turns these
//! declarations into `optional_value.h`.
//!
//! Unlike the Rust API, arguments here can be null. A null factory, source
//! or out-pointer is reported as [`OptionStatus::InvalidArgument`] before
//! anything else is looked at.

use std::ffi::{c_char, CStr};
use std::slice;

use anyhow::{anyhow, Context};
use tracing::debug;

use crate::error::OptionError;
use crate::escape::EscapeExt;
use crate::option::Option;
use crate::parse;
use crate::sequence::{flatten, SequenceExt};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStatus {
    Ok = 0,
    InvalidArgument = 1,
    AmbiguousResult = 2,
    OptionValueMissing = 3,
}

impl From<&OptionError> for OptionStatus {
    fn from(error: &OptionError) -> Self {
        match error {
            OptionError::InvalidArgument(_) => OptionStatus::InvalidArgument,
            OptionError::AmbiguousResult => OptionStatus::AmbiguousResult,
            OptionError::OptionValueMissing(_) => OptionStatus::OptionValueMissing,
        }
    }
}

fn failed(error: OptionError) -> OptionStatus {
    debug!(%error, "optional_value call failed");
    OptionStatus::from(&error)
}

unsafe fn read_text<'a>(text: *const c_char) -> anyhow::Result<&'a str> {
    if text.is_null() {
        return Err(anyhow!("text is null"));
    }
    CStr::from_ptr(text)
        .to_str()
        .context("text is not valid UTF-8")
}

unsafe fn parse_text<T, F>(text: *const c_char, parser: F) -> Option<T>
where
    T: Default,
    F: FnOnce(&str) -> Option<T>,
{
    match read_text(text) {
        Ok(text) => parser(text),
        Err(err) => {
            debug!("{err:#}");
            Option::none()
        }
    }
}

/// # Safety
///
/// `text` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn optional_parse_i64(text: *const c_char) -> Option<i64> {
    parse_text(text, parse::to_i64)
}

/// # Safety
///
/// `text` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn optional_parse_f64(text: *const c_char) -> Option<f64> {
    parse_text(text, parse::to_f64)
}

/// # Safety
///
/// `text` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn optional_parse_bool(text: *const c_char) -> Option<bool> {
    parse_text(text, parse::to_bool)
}

/// # Safety
///
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_value_or_else(
    option: Option<i64>,
    factory: std::option::Option<extern "C" fn() -> i64>,
    out: *mut i64,
) -> OptionStatus {
    let Some(factory) = factory else {
        return failed(OptionError::InvalidArgument("factory"));
    };
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    *out = option.value_or_else(|| factory());
    OptionStatus::Ok
}

/// # Safety
///
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_value_or_failure(
    option: Option<i64>,
    out: *mut i64,
) -> OptionStatus {
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    match option.value_or_failure() {
        Ok(value) => {
            *out = value;
            OptionStatus::Ok
        }
        Err(error) => failed(error),
    }
}

/// # Safety
///
/// `out` must be null or valid for writes. A non-null message returned by
/// `message_factory` must point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_value_or_failure_with(
    option: Option<i64>,
    message_factory: std::option::Option<extern "C" fn() -> *const c_char>,
    out: *mut i64,
) -> OptionStatus {
    let Some(message_factory) = message_factory else {
        return failed(OptionError::InvalidArgument("message_factory"));
    };
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    let message = || match read_text(message_factory()) {
        Ok(message) => message.to_owned(),
        Err(err) => {
            debug!("{err:#}");
            String::new()
        }
    };
    match option.value_or_failure_with(message) {
        Ok(value) => {
            *out = value;
            OptionStatus::Ok
        }
        Err(error) => failed(error),
    }
}

/// # Safety
///
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_or_with(
    option: Option<i64>,
    factory: std::option::Option<extern "C" fn() -> i64>,
    out: *mut Option<i64>,
) -> OptionStatus {
    let Some(factory) = factory else {
        return failed(OptionError::InvalidArgument("factory"));
    };
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    *out = option.or_with(|| factory());
    OptionStatus::Ok
}

/// # Safety
///
/// `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_otherwise_with(
    option: Option<i64>,
    factory: std::option::Option<extern "C" fn() -> Option<i64>>,
    out: *mut Option<i64>,
) -> OptionStatus {
    let Some(factory) = factory else {
        return failed(OptionError::InvalidArgument("factory"));
    };
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    *out = option.otherwise_with(|| factory());
    OptionStatus::Ok
}

/// Writes the present values of `source[..len]` to `out` and their count to
/// `written`.
///
/// # Safety
///
/// `source` must be null or valid for `len` reads, `out` must be null or valid
/// for `len` writes, `written` must be null or valid for one write.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_flatten(
    source: *const Option<i64>,
    len: usize,
    out: *mut i64,
    written: *mut usize,
) -> OptionStatus {
    if source.is_null() {
        return failed(OptionError::InvalidArgument("source"));
    }
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    if written.is_null() {
        return failed(OptionError::InvalidArgument("written"));
    }
    let source = slice::from_raw_parts(source, len);
    let out = slice::from_raw_parts_mut(out, len);
    let mut count = 0;
    for (slot, value) in out.iter_mut().zip(flatten(source.iter().copied())) {
        *slot = value;
        count += 1;
    }
    *written = count;
    OptionStatus::Ok
}

/// # Safety
///
/// `source` must be null or valid for `len` reads, `out` must be null or valid
/// for one write.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_single_or_none(
    source: *const i64,
    len: usize,
    out: *mut Option<i64>,
) -> OptionStatus {
    if source.is_null() {
        return failed(OptionError::InvalidArgument("source"));
    }
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    match slice::from_raw_parts(source, len).iter().copied().single_or_none() {
        Ok(single) => {
            *out = single;
            OptionStatus::Ok
        }
        Err(error) => failed(error),
    }
}

/// # Safety
///
/// `source` must be null or valid for `len` reads, `out` must be null or valid
/// for one write.
#[no_mangle]
pub unsafe extern "C" fn optional_i64_element_at_or_none(
    source: *const i64,
    len: usize,
    index: isize,
    out: *mut Option<i64>,
) -> OptionStatus {
    if source.is_null() {
        return failed(OptionError::InvalidArgument("source"));
    }
    if out.is_null() {
        return failed(OptionError::InvalidArgument("out"));
    }
    *out = slice::from_raw_parts(source, len)
        .iter()
        .copied()
        .element_at_or_none(index);
    OptionStatus::Ok
}
