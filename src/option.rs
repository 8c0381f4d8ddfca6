use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// An optional value: either a present payload or its absence.
///
/// The presence flag and the payload are two independent fields, so a present
/// `T::default()` and an absent option are distinct states. When the flag is
/// false the payload slot is never handed out; accessors yield
/// `T::default()` instead.
#[repr(C)]
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Option<T> {
    has_value: bool,
    value: T,
}

impl<T: Default> From<std::option::Option<T>> for Option<T> {
    #[inline]
    fn from(value: std::option::Option<T>) -> Self {
        match value {
            None => Option::none(),
            Some(val) => Option::some(val),
        }
    }
}

impl<T> From<Option<T>> for std::option::Option<T> {
    #[inline]
    fn from(option: Option<T>) -> Self {
        if option.has_value {
            Some(option.value)
        } else {
            None
        }
    }
}

impl<T: Default> Default for Option<T> {
    /// Returns an absent option.
    #[inline]
    fn default() -> Self {
        Option::none()
    }
}

impl<T> Option<T> {
    /////////////////////////////////////////////////////////////////////////
    // Constructors
    /////////////////////////////////////////////////////////////////////////

    /// Wraps `value` in a present option, even when `value` is `T::default()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// let x = Option::some(0);
    /// assert!(x.is_present());
    /// assert_ne!(x, Option::none());
    /// ```
    #[inline]
    pub const fn some(value: T) -> Self {
        Option {
            has_value: true,
            value,
        }
    }

    /// Returns an absent option. The payload slot holds `T::default()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// let x: Option<u32> = Option::none();
    /// assert!(x.is_absent());
    /// ```
    #[inline]
    pub fn none() -> Self
    where
        T: Default,
    {
        Option {
            has_value: false,
            value: T::default(),
        }
    }

    /////////////////////////////////////////////////////////////////////////
    // Querying the contained values
    /////////////////////////////////////////////////////////////////////////

    /// Returns `true` if the option holds a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// let x = Option::some(2);
    /// assert_eq!(x.is_present(), true);
    ///
    /// let x: Option<u32> = Option::none();
    /// assert_eq!(x.is_present(), false);
    /// ```
    #[must_use = "if you intended to get the value, consider `.try_get()` instead"]
    #[inline]
    pub const fn is_present(&self) -> bool {
        self.has_value
    }

    /// Returns `true` if the option is absent.
    #[must_use]
    #[inline]
    pub const fn is_absent(&self) -> bool {
        !self.has_value
    }

    /// Returns the presence flag together with the payload. An absent option
    /// yields `(false, T::default())`.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// assert_eq!(Option::some(7).try_get(), (true, 7));
    /// assert_eq!(Option::<i32>::none().try_get(), (false, 0));
    /// ```
    #[inline]
    pub fn try_get(self) -> (bool, T)
    where
        T: Default,
    {
        if self.has_value {
            (true, self.value)
        } else {
            (false, T::default())
        }
    }

    /// Converts from `&Option<T>` to `std::option::Option<&T>`.
    #[inline]
    pub const fn as_ref(&self) -> std::option::Option<&T> {
        if self.has_value {
            Some(&self.value)
        } else {
            None
        }
    }

    /////////////////////////////////////////////////////////////////////////
    // Getting to contained values
    /////////////////////////////////////////////////////////////////////////

    /// Returns the contained value or `alternative`.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// assert_eq!(Option::some("car").value_or("bike"), "car");
    /// assert_eq!(Option::none().value_or("bike"), "bike");
    /// ```
    #[inline]
    pub fn value_or(self, alternative: T) -> T {
        if self.has_value {
            self.value
        } else {
            alternative
        }
    }

    /// Returns the contained value or computes it from `factory`.
    ///
    /// `factory` is only called when the option is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// let k = 10;
    /// assert_eq!(Option::some(4).value_or_else(|| 2 * k), 4);
    /// assert_eq!(Option::none().value_or_else(|| 2 * k), 20);
    /// ```
    #[inline]
    pub fn value_or_else<F>(self, factory: F) -> T
    where
        F: FnOnce() -> T,
    {
        if self.has_value {
            self.value
        } else {
            factory()
        }
    }

    /////////////////////////////////////////////////////////////////////////
    // Fallbacks that keep the wrapper
    /////////////////////////////////////////////////////////////////////////

    /// Returns the option itself if present, otherwise a present option
    /// holding `alternative`.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// assert_eq!(Option::some(2).or(100), Option::some(2));
    /// assert_eq!(Option::none().or(100), Option::some(100));
    /// ```
    #[inline]
    pub fn or(self, alternative: T) -> Option<T> {
        if self.has_value {
            self
        } else {
            Option::some(alternative)
        }
    }

    /// Returns the option itself if present, otherwise a present option
    /// holding the result of `factory`.
    #[inline]
    pub fn or_with<F>(self, factory: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        if self.has_value {
            self
        } else {
            Option::some(factory())
        }
    }

    /// Returns the option itself if present, otherwise `alternative`, which
    /// may be absent as well.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// let primary: Option<&str> = Option::none();
    /// let secondary = Option::some("mirror");
    /// assert_eq!(primary.otherwise(secondary), Option::some("mirror"));
    /// assert_eq!(primary.otherwise(Option::none()), Option::none());
    /// ```
    #[inline]
    pub fn otherwise(self, alternative: Option<T>) -> Option<T> {
        if self.has_value {
            self
        } else {
            alternative
        }
    }

    /// Returns the option itself if present, otherwise calls `factory` and
    /// returns its option.
    ///
    /// # Examples
    ///
    /// ```
    /// use optional_value::Option;
    ///
    /// fn nobody() -> Option<&'static str> { Option::none() }
    /// fn vikings() -> Option<&'static str> { Option::some("vikings") }
    ///
    /// assert_eq!(Option::some("barbarians").otherwise_with(vikings), Option::some("barbarians"));
    /// assert_eq!(Option::none().otherwise_with(vikings), Option::some("vikings"));
    /// assert_eq!(Option::none().otherwise_with(nobody), Option::none());
    /// ```
    #[inline]
    pub fn otherwise_with<F>(self, factory: F) -> Option<T>
    where
        F: FnOnce() -> Option<T>,
    {
        if self.has_value {
            self
        } else {
            factory()
        }
    }
}

impl<T: PartialEq> PartialEq for Option<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self.has_value, other.has_value) {
            (true, true) => self.value == other.value,
            (false, false) => true,
            _ => false,
        }
    }
}

impl<T: Eq> Eq for Option<T> {}

impl<T: PartialOrd> PartialOrd for Option<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> std::option::Option<Ordering> {
        match (self.has_value, other.has_value) {
            (true, true) => self.value.partial_cmp(&other.value),
            (true, false) => Some(Ordering::Greater),
            (false, true) => Some(Ordering::Less),
            (false, false) => Some(Ordering::Equal),
        }
    }
}

impl<T: Ord> Ord for Option<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.has_value, other.has_value) {
            (true, true) => self.value.cmp(&other.value),
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => Ordering::Equal,
        }
    }
}

impl<T: Hash> Hash for Option<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // The payload of an absent option is never fed to the hasher.
        if self.has_value {
            state.write_u8(1);
            self.value.hash(state);
        } else {
            state.write_u8(0);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Option<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_value {
            f.debug_tuple("Some").field(&self.value).finish()
        } else {
            f.write_str("None")
        }
    }
}

/// Renders `None`, `Some(<value>)`, or `Some(null)` when the payload equals
/// `T::default()`.
impl<T> fmt::Display for Option<T>
where
    T: fmt::Display + Default + PartialEq,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_value {
            f.write_str("None")
        } else if self.value == T::default() {
            f.write_str("Some(null)")
        } else {
            write!(f, "Some({})", self.value)
        }
    }
}
