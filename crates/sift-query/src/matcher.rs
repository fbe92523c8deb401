//! The matching capability a query tree is evaluated against.
//!
//! The tree never decides what "a field equals a term" means. It hands each
//! leaf condition to a [`QueryMatcher`] and combines the boolean answers.

use std::fmt;

use crate::ast::TextQuery;

/// Operator passed to [`QueryMatcher::match_field`] for bare text terms.
pub const EQUALS: &str = "=";

/// The field a condition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldTarget<'a> {
    /// Any field the matcher considers searchable.
    Any,
    /// One named field.
    Named(&'a str),
}

impl FieldTarget<'_> {
    /// Returns the field name, or `None` for [`FieldTarget::Any`].
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for FieldTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A boxed matcher narrowed to a single field.
pub type ScopedMatcher<'a, E> = Box<dyn QueryMatcher<Error = E> + 'a>;

/// Decides leaf conditions against some data source.
///
/// Answers are authoritative: the query tree only negates and combines them.
/// A matcher that cannot answer should return `Ok(false)` (or `Ok(None)` from
/// [`field_matcher`](Self::field_matcher)); returning `Err` aborts evaluation
/// and the error reaches the caller of [`Query::matches`](crate::Query::matches)
/// unchanged.
pub trait QueryMatcher {
    /// Error raised by this matcher.
    type Error;

    /// Tests `field <operator> value`.
    fn match_field(
        &self,
        field: FieldTarget<'_>,
        operator: &str,
        value: &TextQuery,
    ) -> Result<bool, Self::Error>;

    /// Tests whether the data falls between `start` and `end`.
    fn match_range(
        &self,
        start: &TextQuery,
        start_inclusive: bool,
        end: &TextQuery,
        end_inclusive: bool,
    ) -> Result<bool, Self::Error>;

    /// Returns a matcher scoped to `field`, or `None` if the field is unknown.
    fn field_matcher(
        &self,
        field: &str,
    ) -> Result<Option<ScopedMatcher<'_, Self::Error>>, Self::Error>;
}

impl<M: QueryMatcher + ?Sized> QueryMatcher for &M {
    type Error = M::Error;

    fn match_field(
        &self,
        field: FieldTarget<'_>,
        operator: &str,
        value: &TextQuery,
    ) -> Result<bool, Self::Error> {
        (**self).match_field(field, operator, value)
    }

    fn match_range(
        &self,
        start: &TextQuery,
        start_inclusive: bool,
        end: &TextQuery,
        end_inclusive: bool,
    ) -> Result<bool, Self::Error> {
        (**self).match_range(start, start_inclusive, end, end_inclusive)
    }

    fn field_matcher(
        &self,
        field: &str,
    ) -> Result<Option<ScopedMatcher<'_, Self::Error>>, Self::Error> {
        (**self).field_matcher(field)
    }
}

impl<M: QueryMatcher + ?Sized> QueryMatcher for Box<M> {
    type Error = M::Error;

    fn match_field(
        &self,
        field: FieldTarget<'_>,
        operator: &str,
        value: &TextQuery,
    ) -> Result<bool, Self::Error> {
        (**self).match_field(field, operator, value)
    }

    fn match_range(
        &self,
        start: &TextQuery,
        start_inclusive: bool,
        end: &TextQuery,
        end_inclusive: bool,
    ) -> Result<bool, Self::Error> {
        (**self).match_range(start, start_inclusive, end, end_inclusive)
    }

    fn field_matcher(
        &self,
        field: &str,
    ) -> Result<Option<ScopedMatcher<'_, Self::Error>>, Self::Error> {
        (**self).field_matcher(field)
    }
}
