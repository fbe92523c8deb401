//! Query matcher over a single record.

use std::borrow::Cow;

use log::{debug, trace};
use sift_config::MatchSettings;
use sift_query::{FieldTarget, QueryMatcher, ScopedMatcher, TextQuery};

use crate::{
    MatchError, Record,
    compare::{Bound, Operator, WordPattern, compare_values, fold_case, in_range},
};

/// Evaluates query leaves against one record.
///
/// An unscoped matcher searches the configured default fields, or every
/// field when none are configured. `field:` scopes produce matchers bound to
/// a single field. Comparisons name their field, resolved against the scope
/// the same way nested `field:` prefixes are.
#[derive(Debug, Clone)]
pub struct RecordMatcher<'a> {
    /// The record being tested.
    record: &'a Record,
    /// Matching settings.
    settings: &'a MatchSettings,
    /// Field bare terms are restricted to.
    scope: Option<String>,
}

impl<'a> RecordMatcher<'a> {
    /// Creates an unscoped matcher for `record`.
    pub fn new(record: &'a Record, settings: &'a MatchSettings) -> Self {
        Self {
            record,
            settings,
            scope: None,
        }
    }

    /// The field this matcher is restricted to, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns a matcher restricted to `field`.
    fn scoped(&self, field: String) -> Self {
        Self {
            record: self.record,
            settings: self.settings,
            scope: Some(field),
        }
    }

    /// Resolves a `field:` name relative to the current scope.
    ///
    /// Inside `author:(...)`, `name:` refers to `author.name` when the record
    /// has it.
    fn resolve_field(&self, field: &str) -> String {
        if let Some(scope) = &self.scope {
            let nested = format!("{scope}.{field}");
            if self.record.has_field(&nested) {
                return nested;
            }
        }
        field.to_string()
    }

    /// Values a target refers to.
    fn values(&self, target: FieldTarget<'_>) -> Vec<&'a str> {
        let record = self.record;
        match (target, self.scope.as_deref()) {
            (FieldTarget::Named(field), _) => {
                record.values_under(&self.resolve_field(field)).collect()
            }
            (FieldTarget::Any, Some(field)) => record.values_under(field).collect(),
            (FieldTarget::Any, None) if !self.settings.default_fields.is_empty() => self
                .settings
                .default_fields
                .iter()
                .flat_map(|field| record.values_under(field))
                .collect(),
            (FieldTarget::Any, None) => record
                .fields()
                .flat_map(|(_, values)| values)
                .map(String::as_str)
                .collect(),
        }
    }

    /// Applies the configured case folding.
    fn fold<'t>(&self, text: &'t str) -> Cow<'t, str> {
        fold_case(text, self.settings.case_sensitive)
    }
}

impl QueryMatcher for RecordMatcher<'_> {
    type Error = MatchError;

    fn match_field(
        &self,
        field: FieldTarget<'_>,
        operator: &str,
        value: &TextQuery,
    ) -> Result<bool, MatchError> {
        let Some(op) = Operator::parse(operator) else {
            return Err(MatchError::UnsupportedOperator {
                field: field.to_string(),
                operator: operator.to_string(),
            });
        };

        let wanted = self.fold(value.text());
        let values = self.values(field);
        let matched = if op == Operator::Eq {
            let pattern = WordPattern::new(&wanted, value.is_exact_match());
            values.iter().any(|v| pattern.is_match(&self.fold(v)))
        } else {
            values
                .iter()
                .any(|v| op.accepts(compare_values(&self.fold(v), &wanted)))
        };

        trace!(
            "{field}{operator}{value} against {} value(s): {matched}",
            values.len()
        );
        Ok(matched)
    }

    fn match_range(
        &self,
        start: &TextQuery,
        start_inclusive: bool,
        end: &TextQuery,
        end_inclusive: bool,
    ) -> Result<bool, MatchError> {
        let start_text = self.fold(start.text());
        let end_text = self.fold(end.text());
        let lower = Bound::new(&start_text, start_inclusive);
        let upper = Bound::new(&end_text, end_inclusive);

        let matched = self
            .values(FieldTarget::Any)
            .iter()
            .any(|v| in_range(&self.fold(v), lower, upper));

        trace!("range {start} TO {end} in {:?}: {matched}", self.scope);
        Ok(matched)
    }

    fn field_matcher(
        &self,
        field: &str,
    ) -> Result<Option<ScopedMatcher<'_, MatchError>>, MatchError> {
        let resolved = self.resolve_field(field);
        let known = self.settings.known_fields.iter().any(|f| *f == resolved);

        if self.record.has_field(&resolved) || known {
            let scoped: ScopedMatcher<'_, MatchError> = Box::new(self.scoped(resolved));
            Ok(Some(scoped))
        } else {
            debug!("record has no field '{resolved}'");
            Ok(None)
        }
    }
}
