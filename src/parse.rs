//! Parsers that report malformed input as an absent [`Option`] instead of an
//! error.
//!
//! The plain `to_*` functions delegate to the type's own [`FromStr`]. The
//! `*_with` variants first apply [`NumberStyles`] or [`DateTimeStyles`] under
//! a [`NumberFormat`], then delegate. Failures are logged at `trace` level and
//! never escape.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, ensure};
use bitflags::bitflags;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, TimeZone};
use rust_decimal::Decimal;
use tracing::trace;

use crate::option::Option;

bitflags! {
    /// Which decorations a number may carry around its digits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NumberStyles: u32 {
        const ALLOW_LEADING_WHITE = 1;
        const ALLOW_TRAILING_WHITE = 1 << 1;
        const ALLOW_LEADING_SIGN = 1 << 2;
        const ALLOW_DECIMAL_POINT = 1 << 3;
        const ALLOW_THOUSANDS = 1 << 4;
        const ALLOW_EXPONENT = 1 << 5;
        /// Digits are hexadecimal, without a `0x` prefix or sign.
        const ALLOW_HEX_SPECIFIER = 1 << 6;

        const INTEGER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_LEADING_SIGN.bits();
        const HEX_NUMBER = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits()
            | Self::ALLOW_HEX_SPECIFIER.bits();
        const NUMBER = Self::INTEGER.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_THOUSANDS.bits();
        const FLOAT = Self::INTEGER.bits()
            | Self::ALLOW_DECIMAL_POINT.bits()
            | Self::ALLOW_EXPONENT.bits();
        const ANY = Self::NUMBER.bits() | Self::ALLOW_EXPONENT.bits();
    }
}

bitflags! {
    /// How date-time text is trimmed and which offset it is read in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DateTimeStyles: u32 {
        const ALLOW_LEADING_WHITE = 1;
        const ALLOW_TRAILING_WHITE = 1 << 1;
        const ALLOW_WHITE_SPACES = Self::ALLOW_LEADING_WHITE.bits()
            | Self::ALLOW_TRAILING_WHITE.bits();
        /// Offset-less text is read as local time.
        const ASSUME_LOCAL = 1 << 2;
        /// Offset-less text is read as UTC.
        const ASSUME_UNIVERSAL = 1 << 3;
        /// The result is converted to UTC.
        const ADJUST_TO_UNIVERSAL = 1 << 4;
    }
}

/// Culture-dependent characters used when reading numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub group_separator: char,
    pub positive_sign: char,
    pub negative_sign: char,
}

impl NumberFormat {
    /// `.` decimals, `,` groups.
    pub const INVARIANT: NumberFormat = NumberFormat {
        decimal_separator: '.',
        group_separator: ',',
        positive_sign: '+',
        negative_sign: '-',
    };

    pub const fn new(decimal_separator: char, group_separator: char) -> Self {
        NumberFormat {
            decimal_separator,
            group_separator,
            ..NumberFormat::INVARIANT
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::INVARIANT
    }
}

/// Formats tried, in order, when reading a date-time without an explicit
/// format.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y-%m-%d",
    "%Y/%m/%d",
];

fn attempt<T, E>(kind: &'static str, text: &str, result: Result<T, E>) -> Option<T>
where
    T: Default,
    E: Display,
{
    match result {
        Ok(value) => Option::some(value),
        Err(err) => {
            trace!(kind, text, error = %err, "parse failed");
            Option::none()
        }
    }
}

/// Parses any [`FromStr`] type.
pub fn from_str<T>(text: &str) -> Option<T>
where
    T: FromStr + Default,
    T::Err: Display,
{
    attempt(std::any::type_name::<T>(), text, text.parse::<T>())
}

/////////////////////////////////////////////////////////////////////////
// Numbers
/////////////////////////////////////////////////////////////////////////

fn trim_number(text: &str, styles: NumberStyles) -> &str {
    let mut text = text;
    if styles.contains(NumberStyles::ALLOW_LEADING_WHITE) {
        text = text.trim_start();
    }
    if styles.contains(NumberStyles::ALLOW_TRAILING_WHITE) {
        text = text.trim_end();
    }
    text
}

/// Rewrites `text` into the plain `[-]digits[.digits][e[-]digits]` shape that
/// `FromStr` accepts, rejecting decorations `styles` does not allow.
fn normalize_number(
    text: &str,
    format: &NumberFormat,
    styles: NumberStyles,
) -> anyhow::Result<String> {
    let text = trim_number(text, styles);

    let (negative, digits) = if let Some(rest) = text.strip_prefix(format.negative_sign) {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix(format.positive_sign) {
        (false, rest)
    } else {
        (false, text)
    };
    if digits.len() != text.len() {
        ensure!(
            styles.contains(NumberStyles::ALLOW_LEADING_SIGN),
            "leading sign is not allowed"
        );
    }
    ensure!(
        !digits.starts_with(['+', '-']),
        "more than one leading sign"
    );

    let mut normalized = String::with_capacity(text.len());
    if negative {
        normalized.push('-');
    }
    for c in digits.chars() {
        if c == format.group_separator {
            ensure!(
                styles.contains(NumberStyles::ALLOW_THOUSANDS),
                "group separator is not allowed"
            );
        } else if c == format.decimal_separator {
            ensure!(
                styles.contains(NumberStyles::ALLOW_DECIMAL_POINT),
                "decimal point is not allowed"
            );
            normalized.push('.');
        } else if c == 'e' || c == 'E' {
            ensure!(
                styles.contains(NumberStyles::ALLOW_EXPONENT),
                "exponent is not allowed"
            );
            normalized.push(c);
        } else if c == '.' {
            bail!("unexpected `.` for decimal separator `{}`", format.decimal_separator);
        } else {
            normalized.push(c);
        }
    }
    Ok(normalized)
}

fn hex_digits(text: &str, styles: NumberStyles) -> anyhow::Result<&str> {
    let digits = trim_number(text, styles);
    ensure!(
        digits.chars().all(|c| c.is_ascii_hexdigit()),
        "`{digits}` is not a hexadecimal number"
    );
    Ok(digits)
}

macro_rules! integer_parsers {
    ($($ty:ty, $bits:ty => $plain:ident, $styled:ident;)*) => {$(
        #[doc = concat!("Parses `text` as an `", stringify!($ty), "`.")]
        pub fn $plain(text: &str) -> Option<$ty> {
            attempt(stringify!($ty), text, text.parse::<$ty>())
        }

        #[doc = concat!(
            "Parses `text` as an `", stringify!($ty), "` under `format` and `styles`. ",
            "Hexadecimal text is read as the bits of an `", stringify!($bits), "`."
        )]
        pub fn $styled(text: &str, format: &NumberFormat, styles: NumberStyles) -> Option<$ty> {
            let result = if styles.contains(NumberStyles::ALLOW_HEX_SPECIFIER) {
                hex_digits(text, styles)
                    .and_then(|digits| Ok(<$bits>::from_str_radix(digits, 16)? as $ty))
            } else {
                normalize_number(text, format, styles).and_then(|normalized| {
                    ensure!(!normalized.contains(['.', 'e', 'E']), "not an integer");
                    Ok(normalized.parse::<$ty>()?)
                })
            };
            attempt(stringify!($ty), text, result)
        }
    )*};
}

integer_parsers! {
    i8, u8 => to_i8, to_i8_with;
    u8, u8 => to_u8, to_u8_with;
    i16, u16 => to_i16, to_i16_with;
    u16, u16 => to_u16, to_u16_with;
    i32, u32 => to_i32, to_i32_with;
    u32, u32 => to_u32, to_u32_with;
    i64, u64 => to_i64, to_i64_with;
    u64, u64 => to_u64, to_u64_with;
    i128, u128 => to_i128, to_i128_with;
    u128, u128 => to_u128, to_u128_with;
}

fn reject_hex(styles: NumberStyles) -> anyhow::Result<()> {
    ensure!(
        !styles.contains(NumberStyles::ALLOW_HEX_SPECIFIER),
        "hexadecimal is only supported for integers"
    );
    Ok(())
}

pub fn to_f32(text: &str) -> Option<f32> {
    attempt("f32", text, text.parse::<f32>())
}

pub fn to_f32_with(text: &str, format: &NumberFormat, styles: NumberStyles) -> Option<f32> {
    let result = reject_hex(styles)
        .and_then(|()| normalize_number(text, format, styles))
        .and_then(|normalized| Ok(normalized.parse::<f32>()?));
    attempt("f32", text, result)
}

pub fn to_f64(text: &str) -> Option<f64> {
    attempt("f64", text, text.parse::<f64>())
}

pub fn to_f64_with(text: &str, format: &NumberFormat, styles: NumberStyles) -> Option<f64> {
    let result = reject_hex(styles)
        .and_then(|()| normalize_number(text, format, styles))
        .and_then(|normalized| Ok(normalized.parse::<f64>()?));
    attempt("f64", text, result)
}

pub fn to_decimal(text: &str) -> Option<Decimal> {
    attempt("decimal", text, Decimal::from_str(text))
}

/// Scientific notation is accepted when `styles` allows an exponent.
pub fn to_decimal_with(text: &str, format: &NumberFormat, styles: NumberStyles) -> Option<Decimal> {
    let result = reject_hex(styles)
        .and_then(|()| normalize_number(text, format, styles))
        .and_then(|normalized| {
            let value = if normalized.contains(['e', 'E']) {
                Decimal::from_scientific(&normalized)?
            } else {
                Decimal::from_str(&normalized)?
            };
            Ok(value)
        });
    attempt("decimal", text, result)
}

/////////////////////////////////////////////////////////////////////////
// Scalars
/////////////////////////////////////////////////////////////////////////

/// Accepts exactly `true` or `false`.
pub fn to_bool(text: &str) -> Option<bool> {
    attempt("bool", text, text.parse::<bool>())
}

/// Accepts text of exactly one character.
pub fn to_char(text: &str) -> Option<char> {
    attempt("char", text, text.parse::<char>())
}

/// Reads a span written as `[d.]hh:mm[:ss[.fffffff]]`, as a bare day count,
/// or in human readable form such as `1h 30m` or `250ms`.
///
/// Negative spans have no [`Duration`] and are absent.
pub fn to_time_span(text: &str) -> Option<Duration> {
    let span = if text.contains(':') || is_digits(text) {
        clock_span(text)
    } else {
        humantime::parse_duration(text).map_err(anyhow::Error::from)
    };
    attempt("time span", text, span)
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn clock_field(field: &str, name: &str, limit: u64) -> anyhow::Result<u64> {
    ensure!(is_digits(field), "{name} `{field}` is not a number");
    let value: u64 = field.parse()?;
    ensure!(value < limit, "{name} {value} is out of range");
    Ok(value)
}

fn clock_span(text: &str) -> anyhow::Result<Duration> {
    const DAY: u64 = 24 * 60 * 60;

    if is_digits(text) {
        let days: u64 = text.parse()?;
        let secs = days
            .checked_mul(DAY)
            .ok_or_else(|| anyhow!("{days} days overflow a duration"))?;
        return Ok(Duration::from_secs(secs));
    }

    let (days, clock) = match text.split_once('.') {
        Some((days, clock)) if !days.contains(':') => {
            ensure!(is_digits(days), "day count `{days}` is not a number");
            (days.parse::<u64>()?, clock)
        }
        _ => (0, text),
    };

    let mut fields = clock.split(':');
    let hours = clock_field(fields.next().unwrap_or_default(), "hours", 24)?;
    let Some(minutes) = fields.next() else {
        bail!("`{clock}` has no minutes");
    };
    let minutes = clock_field(minutes, "minutes", 60)?;
    let (seconds, nanos) = match fields.next() {
        None => (0, 0),
        Some(seconds) => {
            let (whole, fraction) = seconds.split_once('.').unwrap_or((seconds, ""));
            let nanos = if fraction.is_empty() && !seconds.contains('.') {
                0
            } else {
                ensure!(
                    is_digits(fraction) && fraction.len() <= 7,
                    "fraction `{fraction}` is not 1 to 7 digits"
                );
                format!("{fraction:0<9}").parse::<u32>()?
            };
            (clock_field(whole, "seconds", 60)?, nanos)
        }
    };
    ensure!(fields.next().is_none(), "`{clock}` has too many fields");

    let secs = days
        .checked_mul(DAY)
        .and_then(|secs| secs.checked_add(hours * 3600 + minutes * 60 + seconds))
        .ok_or_else(|| anyhow!("{days} days overflow a duration"))?;
    Ok(Duration::new(secs, nanos))
}

/////////////////////////////////////////////////////////////////////////
// Date-times
/////////////////////////////////////////////////////////////////////////

fn trim_date_time(text: &str, styles: DateTimeStyles) -> &str {
    let mut text = text;
    if styles.contains(DateTimeStyles::ALLOW_LEADING_WHITE) {
        text = text.trim_start();
    }
    if styles.contains(DateTimeStyles::ALLOW_TRAILING_WHITE) {
        text = text.trim_end();
    }
    text
}

fn utc() -> anyhow::Result<FixedOffset> {
    FixedOffset::east_opt(0).ok_or_else(|| anyhow!("zero offset out of range"))
}

/// Date-only matches resolve to midnight.
fn naive_exact(text: &str, format: &str) -> anyhow::Result<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(text, format) {
        Ok(value) => Ok(value),
        Err(err) => NaiveDate::parse_from_str(text, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .ok_or_else(|| err.into()),
    }
}

fn naive_any(text: &str, formats: &[&str]) -> anyhow::Result<NaiveDateTime> {
    formats
        .iter()
        .find_map(|format| naive_exact(text, format).ok())
        .ok_or_else(|| anyhow!("no candidate format matched"))
}

/// Attaches an offset to offset-less text as `styles` directs.
fn assume_offset(
    naive: NaiveDateTime,
    styles: DateTimeStyles,
) -> anyhow::Result<DateTime<FixedOffset>> {
    if styles.contains(DateTimeStyles::ASSUME_UNIVERSAL) {
        Ok(utc()?.from_utc_datetime(&naive))
    } else if styles.contains(DateTimeStyles::ASSUME_LOCAL) {
        Local
            .from_local_datetime(&naive)
            .single()
            .map(|local| local.fixed_offset())
            .ok_or_else(|| anyhow!("`{naive}` is ambiguous or skipped in local time"))
    } else {
        bail!("text has no offset and no offset is assumed")
    }
}

fn adjust(
    value: DateTime<FixedOffset>,
    styles: DateTimeStyles,
) -> anyhow::Result<DateTime<FixedOffset>> {
    if styles.contains(DateTimeStyles::ADJUST_TO_UNIVERSAL) {
        Ok(value.with_timezone(&utc()?))
    } else {
        Ok(value)
    }
}

fn date_time_with(text: &str, styles: DateTimeStyles) -> anyhow::Result<NaiveDateTime> {
    let text = trim_date_time(text, styles);
    if let Ok(value) = DateTime::parse_from_rfc3339(text) {
        return if styles.contains(DateTimeStyles::ADJUST_TO_UNIVERSAL) {
            Ok(value.naive_utc())
        } else {
            Ok(value.naive_local())
        };
    }
    naive_any(text, DATE_TIME_FORMATS)
}

/// Reads ISO-8601 style date-times and dates. Text carrying an offset yields
/// its local wall-clock time.
pub fn to_date_time(text: &str) -> Option<NaiveDateTime> {
    to_date_time_with(text, DateTimeStyles::empty())
}

pub fn to_date_time_with(text: &str, styles: DateTimeStyles) -> Option<NaiveDateTime> {
    attempt("date-time", text, date_time_with(text, styles))
}

/// Reads `text` with a `chrono` strftime `format`.
pub fn to_date_time_exact(text: &str, format: &str, styles: DateTimeStyles) -> Option<NaiveDateTime> {
    let result = naive_exact(trim_date_time(text, styles), format);
    attempt("date-time", text, result)
}

/// Reads `text` with the first of `formats` that matches.
pub fn to_date_time_exact_any(
    text: &str,
    formats: &[&str],
    styles: DateTimeStyles,
) -> Option<NaiveDateTime> {
    let result = naive_any(trim_date_time(text, styles), formats);
    attempt("date-time", text, result)
}

/// Reads RFC 3339 style text that carries its own offset.
pub fn to_date_time_offset(text: &str) -> Option<DateTime<FixedOffset>> {
    attempt(
        "date-time offset",
        text,
        text.parse::<DateTime<FixedOffset>>(),
    )
}

pub fn to_date_time_offset_with(
    text: &str,
    styles: DateTimeStyles,
) -> Option<DateTime<FixedOffset>> {
    let trimmed = trim_date_time(text, styles);
    let result = match trimmed.parse::<DateTime<FixedOffset>>() {
        Ok(value) => Ok(value),
        Err(_) => naive_any(trimmed, DATE_TIME_FORMATS).and_then(|naive| assume_offset(naive, styles)),
    }
    .and_then(|value| adjust(value, styles));
    attempt("date-time offset", text, result)
}

fn offset_exact(
    text: &str,
    format: &str,
    styles: DateTimeStyles,
) -> anyhow::Result<DateTime<FixedOffset>> {
    let value = match DateTime::parse_from_str(text, format) {
        Ok(value) => value,
        Err(_) => assume_offset(naive_exact(text, format)?, styles)?,
    };
    adjust(value, styles)
}

/// Reads `text` with a `chrono` strftime `format`. Formats without `%z`
/// need `ASSUME_UNIVERSAL` or `ASSUME_LOCAL`.
pub fn to_date_time_offset_exact(
    text: &str,
    format: &str,
    styles: DateTimeStyles,
) -> Option<DateTime<FixedOffset>> {
    let result = offset_exact(trim_date_time(text, styles), format, styles);
    attempt("date-time offset", text, result)
}

pub fn to_date_time_offset_exact_any(
    text: &str,
    formats: &[&str],
    styles: DateTimeStyles,
) -> Option<DateTime<FixedOffset>> {
    let trimmed = trim_date_time(text, styles);
    let result = formats
        .iter()
        .find_map(|format| offset_exact(trimmed, format, styles).ok())
        .ok_or_else(|| anyhow!("no candidate format matched"));
    attempt("date-time offset", text, result)
}
