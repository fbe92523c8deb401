//! Value comparison primitives used by the record matcher.

use std::{borrow::Cow, cmp::Ordering};

/// Suffix that turns a non-exact term into a prefix match.
pub const WILDCARD: char = '*';

/// A comparison operator understood by the record matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `=`: word or phrase match.
    Eq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl Operator {
    /// Parses an operator as written in a query.
    pub fn parse(operator: &str) -> Option<Self> {
        match operator {
            "=" => Some(Self::Eq),
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            _ => None,
        }
    }

    /// Whether `ordering` (value compared to operand) satisfies an ordering operator.
    ///
    /// `Eq` is not an ordering test and always returns false here.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => false,
            Self::Lt => ordering.is_lt(),
            Self::Gt => ordering.is_gt(),
            Self::Le => ordering.is_le(),
            Self::Ge => ordering.is_ge(),
        }
    }
}

/// Lowercases `text` unless matching is case sensitive.
pub fn fold_case(text: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.to_lowercase())
    }
}

/// Splits text into words on anything that is not alphanumeric or `_`.
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    split_words(text, false)
}

/// Like [`words`], but with `keep_wildcard` a `*` stays part of its word.
fn split_words(text: &str, keep_wildcard: bool) -> impl Iterator<Item = &str> {
    text.split(move |c: char| {
        !c.is_alphanumeric() && c != '_' && !(keep_wildcard && c == WILDCARD)
    })
    .filter(|word| !word.is_empty())
}

/// Compares two values, numerically when both parse as numbers.
pub fn compare_values(left: &str, right: &str) -> Ordering {
    match (left.trim().parse::<f64>(), right.trim().parse::<f64>()) {
        (Ok(l), Ok(r)) => l.partial_cmp(&r).unwrap_or_else(|| left.cmp(right)),
        _ => left.cmp(right),
    }
}

/// A word sequence to look for inside a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPattern {
    /// Words that must appear consecutively.
    words: Vec<String>,
    /// Whether the last word only needs to be a prefix.
    prefix: bool,
    /// Whether `*` is an ordinary character in both pattern and value.
    literal_wildcard: bool,
}

impl WordPattern {
    /// Builds a pattern from query text.
    ///
    /// A trailing `*` makes the last word a prefix unless `exact` is set,
    /// in which case the text is taken literally.
    pub fn new(text: &str, exact: bool) -> Self {
        let (body, prefix) = match text.strip_suffix(WILDCARD) {
            Some(body) if !exact => (body, true),
            _ => (text, false),
        };
        let literal_wildcard = exact && text.contains(WILDCARD);
        Self {
            words: split_words(body, literal_wildcard)
                .map(String::from)
                .collect(),
            prefix,
            literal_wildcard,
        }
    }

    /// Whether the value contains the pattern's words as a consecutive run.
    ///
    /// A bare `*` matches any value with at least one word. An empty pattern
    /// matches nothing.
    pub fn is_match(&self, value: &str) -> bool {
        let value_words: Vec<&str> = split_words(value, self.literal_wildcard).collect();
        if self.words.is_empty() {
            return self.prefix && !value_words.is_empty();
        }
        value_words
            .windows(self.words.len())
            .any(|window| self.matches_window(window))
    }

    /// Compares one window of value words against the pattern.
    fn matches_window(&self, window: &[&str]) -> bool {
        let last = self.words.len() - 1;
        self.words
            .iter()
            .zip(window)
            .enumerate()
            .all(|(i, (want, got))| {
                if self.prefix && i == last {
                    got.starts_with(want.as_str())
                } else {
                    *got == want.as_str()
                }
            })
    }
}

/// One end of a range. `*` leaves the end open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound<'a> {
    /// Bound value, `None` when open.
    value: Option<&'a str>,
    /// Whether a value equal to the bound is inside the range.
    inclusive: bool,
}

impl<'a> Bound<'a> {
    /// Creates a bound from range text.
    pub fn new(text: &'a str, inclusive: bool) -> Self {
        let value = (text != "*").then_some(text);
        Self { value, inclusive }
    }

    /// Whether `value` is on the inside of this bound when used as a lower bound.
    pub fn admits_above(&self, value: &str) -> bool {
        self.value.is_none_or(|bound| {
            let ordering = compare_values(value, bound);
            ordering.is_gt() || (self.inclusive && ordering.is_eq())
        })
    }

    /// Whether `value` is on the inside of this bound when used as an upper bound.
    pub fn admits_below(&self, value: &str) -> bool {
        self.value.is_none_or(|bound| {
            let ordering = compare_values(value, bound);
            ordering.is_lt() || (self.inclusive && ordering.is_eq())
        })
    }
}

/// Whether `value` lies within `start` and `end`.
pub fn in_range(value: &str, start: Bound<'_>, end: Bound<'_>) -> bool {
    start.admits_above(value) && end.admits_below(value)
}
