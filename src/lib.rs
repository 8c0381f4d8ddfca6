//! An explicit optional value with a two-field, `#[repr(C)]` layout.
//!
//! [`Option<T>`] keeps its presence flag next to its payload, so it can be
//! serialized structurally and passed across the C ABI in [`ffi`]. Sequence
//! lookups live in [`sequence`], conversions that give up the wrapper in
//! [`escape`], and absence-on-failure parsers in [`parse`].
//!
//! ```
//! use optional_value::{escape::EscapeExt, parse, sequence::SequenceExt, Option};
//!
//! let port = parse::to_u16("eighty").or(8080);
//! assert_eq!(port, Option::some(8080));
//!
//! let hosts = vec!["db", "cache"];
//! let cache = hosts.into_iter().first_or_none_by(|host| host.starts_with('c'));
//! assert_eq!(cache.value_or_failure(), Ok("cache"));
//! ```

pub mod error;
pub mod escape;
pub mod ffi;
pub mod option;
pub mod parse;
pub mod sequence;

pub use error::{OptionError, Result};
pub use option::Option;
