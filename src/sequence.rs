//! Sequence helpers: flattening iterators of options and looking up single
//! elements without treating "nothing found" as an error.

use std::iter::FusedIterator;

use crate::error::{OptionError, Result};
use crate::option::Option;

/// Lazily yields the payloads of the present options of `source`, in order.
///
/// ```
/// use optional_value::{sequence::flatten, Option};
///
/// let options = vec![Option::some(1), Option::none(), Option::some(3)];
/// assert_eq!(flatten(options).collect::<Vec<_>>(), vec![1, 3]);
/// ```
pub fn flatten<I, T>(source: I) -> Flatten<I::IntoIter>
where
    I: IntoIterator<Item = Option<T>>,
{
    Flatten {
        iter: source.into_iter(),
    }
}

/// Iterator returned by [`flatten`] and [`OptionsExt::values`].
///
/// Cloning a `Flatten` restarts from the clone point of the source.
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Flatten<I> {
    iter: I,
}

impl<I, T> Iterator for Flatten<I>
where
    I: Iterator<Item = Option<T>>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> std::option::Option<T> {
        self.iter.find_map(std::option::Option::from)
    }

    fn size_hint(&self) -> (usize, std::option::Option<usize>) {
        let (_, upper) = self.iter.size_hint();
        (0, upper)
    }
}

impl<I, T> DoubleEndedIterator for Flatten<I>
where
    I: DoubleEndedIterator<Item = Option<T>>,
{
    #[inline]
    fn next_back(&mut self) -> std::option::Option<T> {
        self.iter.by_ref().rev().find_map(std::option::Option::from)
    }
}

impl<I, T> FusedIterator for Flatten<I> where I: FusedIterator<Item = Option<T>> {}

/// Adapters for iterators whose items are options.
pub trait OptionsExt<T>: Iterator<Item = Option<T>> + Sized {
    /// Same as [`flatten`].
    fn values(self) -> Flatten<Self> {
        Flatten { iter: self }
    }
}

impl<I, T> OptionsExt<T> for I where I: Iterator<Item = Option<T>> {}

/// Element lookups that report "no such element" as an absent [`Option`].
///
/// Items must be `Default`, which most borrowed items (`&i32`, `&String`) are
/// not. Iterate those with `.copied()` or `.cloned()` first:
///
/// ```
/// use optional_value::{sequence::SequenceExt, Option};
///
/// let ports = [80, 443];
/// assert_eq!(ports.iter().copied().last_or_none(), Option::some(443));
/// ```
pub trait SequenceExt: Iterator + Sized
where
    Self::Item: Default,
{
    /// The first element, or absent for an empty sequence.
    fn first_or_none(mut self) -> Option<Self::Item> {
        self.next().into()
    }

    /// The first element matching `predicate`.
    fn first_or_none_by<P>(mut self, predicate: P) -> Option<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.find(predicate).into()
    }

    /// The last element, or absent for an empty sequence.
    fn last_or_none(self) -> Option<Self::Item> {
        self.last().into()
    }

    /// The last element matching `predicate`.
    fn last_or_none_by<P>(self, predicate: P) -> Option<Self::Item>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        self.filter(predicate).last().into()
    }

    /// The only element of the sequence.
    ///
    /// # Errors
    ///
    /// [`OptionError::AmbiguousResult`] if the sequence has more than one
    /// element.
    fn single_or_none(self) -> Result<Option<Self::Item>> {
        self.single_or_none_by(|_| true)
    }

    /// The only element matching `predicate`. Consumption stops at the second
    /// match.
    ///
    /// # Errors
    ///
    /// [`OptionError::AmbiguousResult`] if more than one element matches.
    ///
    /// ```
    /// use optional_value::{sequence::SequenceExt, Option, OptionError};
    ///
    /// assert_eq!(vec![1, 2, 3].into_iter().single_or_none_by(|x| *x == 2), Ok(Option::some(2)));
    /// assert_eq!(
    ///     vec![1, 2, 3].into_iter().single_or_none_by(|x| *x > 1),
    ///     Err(OptionError::AmbiguousResult)
    /// );
    /// ```
    fn single_or_none_by<P>(self, predicate: P) -> Result<Option<Self::Item>>
    where
        P: FnMut(&Self::Item) -> bool,
    {
        let mut matches = self.filter(predicate);
        match (matches.next(), matches.next()) {
            (None, _) => Ok(Option::none()),
            (Some(item), None) => Ok(Option::some(item)),
            (Some(_), Some(_)) => Err(OptionError::AmbiguousResult),
        }
    }

    /// The element at `index`; absent when `index` is negative or past the
    /// end.
    fn element_at_or_none(mut self, index: isize) -> Option<Self::Item> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.nth(index))
            .into()
    }
}

impl<I> SequenceExt for I
where
    I: Iterator,
    I::Item: Default,
{
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn flatten_skips_absent() {
        let options = vec![
            Option::some(1),
            Option::none(),
            Option::some(2),
            Option::none(),
            Option::some(3),
        ];
        let values: Vec<i32> = flatten(options).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn flatten_keeps_present_defaults() {
        let options = [Option::some(0), Option::none(), Option::some(0)];
        assert_eq!(options.into_iter().values().collect::<Vec<_>>(), vec![0, 0]);
    }

    #[test]
    fn flatten_is_lazy() {
        let pulled = Cell::new(0);
        let source = (0..).map(|i| {
            pulled.set(pulled.get() + 1);
            if i % 2 == 0 {
                Option::some(i)
            } else {
                Option::none()
            }
        });
        let mut values = flatten(source);
        assert_eq!(pulled.get(), 0);
        assert_eq!(values.next(), Some(0));
        assert_eq!(values.next(), Some(2));
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn flatten_is_restartable() {
        let options = vec![Option::some('a'), Option::none(), Option::some('b')];
        let values = flatten(options.iter().copied());
        let first: String = values.clone().collect();
        let second: String = values.collect();
        assert_eq!(first, "ab");
        assert_eq!(first, second);
    }

    #[test]
    fn flatten_from_the_back() {
        let options = vec![Option::some(1), Option::none(), Option::some(2)];
        let values: Vec<i32> = flatten(options).rev().collect();
        assert_eq!(values, vec![2, 1]);
    }

    #[test]
    fn first_or_none() {
        assert_eq!(Vec::<i32>::new().into_iter().first_or_none(), Option::none());
        assert_eq!(vec![1, 2, 3].into_iter().first_or_none(), Option::some(1));
        assert_eq!(
            vec![1, 2, 3].into_iter().first_or_none_by(|x| *x > 5),
            Option::none()
        );
        assert_eq!(
            vec![1, 2, 3].into_iter().first_or_none_by(|x| *x > 1),
            Option::some(2)
        );
    }

    #[test]
    fn first_or_none_keeps_present_default() {
        assert_eq!(vec![0, 1].into_iter().first_or_none(), Option::some(0));
    }

    #[test]
    fn last_or_none() {
        assert_eq!(Vec::<i32>::new().into_iter().last_or_none(), Option::none());
        assert_eq!(vec![1, 2, 3].into_iter().last_or_none(), Option::some(3));
        assert_eq!(
            vec![1, 2, 3].into_iter().last_or_none_by(|x| *x < 3),
            Option::some(2)
        );
        assert_eq!(
            vec![1, 2, 3].into_iter().last_or_none_by(|x| *x > 3),
            Option::none()
        );
    }

    #[test]
    fn single_or_none() {
        assert_eq!(
            vec![1, 2, 3].into_iter().single_or_none_by(|x| *x == 2),
            Ok(Option::some(2))
        );
        assert_eq!(
            vec![1, 2, 3].into_iter().single_or_none_by(|x| *x > 1),
            Err(OptionError::AmbiguousResult)
        );
        assert_eq!(
            vec![1, 2, 3].into_iter().single_or_none_by(|x| *x > 3),
            Ok(Option::none())
        );
        assert_eq!(Vec::<i32>::new().into_iter().single_or_none(), Ok(Option::none()));
        assert_eq!(vec![9].into_iter().single_or_none(), Ok(Option::some(9)));
        assert_eq!(
            vec![9, 9].into_iter().single_or_none(),
            Err(OptionError::AmbiguousResult)
        );
    }

    #[test]
    fn single_or_none_stops_at_second_match() {
        let pulled = Cell::new(0);
        let source = (0..).inspect(|_| pulled.set(pulled.get() + 1));
        assert_eq!(source.single_or_none(), Err(OptionError::AmbiguousResult));
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn element_at_or_none() {
        assert_eq!(vec![1, 2, 3].into_iter().element_at_or_none(1), Option::some(2));
        assert_eq!(vec![1, 2, 3].into_iter().element_at_or_none(5), Option::none());
        assert_eq!(vec![1, 2, 3].into_iter().element_at_or_none(-1), Option::none());
        assert_eq!(Vec::<i32>::new().into_iter().element_at_or_none(0), Option::none());
    }

    #[test]
    fn borrowed_items_through_cloned() {
        let names = vec!["ada".to_owned(), "grace".to_owned()];
        assert_eq!(
            names.iter().cloned().first_or_none_by(|name| name.len() > 3),
            Option::some("grace".to_owned())
        );
        assert_eq!(
            [1u8, 2, 3].iter().copied().element_at_or_none(1),
            Option::some(2)
        );
    }

    #[test]
    fn works_with_owned_items() {
        let names = vec!["ada".to_owned(), "grace".to_owned()];
        assert_eq!(
            names.iter().cloned().first_or_none_by(|name| name.starts_with('g')),
            Option::some("grace".to_owned())
        );
    }
}
