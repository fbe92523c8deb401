//! JSON records as a sift query target.
//!
//! [`RecordMatcher`] implements [`sift_query::QueryMatcher`] over a flat
//! [`Record`], giving queries a concrete meaning:
//!
//! - bare terms look for words in the default fields (or every field)
//! - `field:` scopes narrow the search to one field
//! - `field=value` matches words, `<`, `>`, `<=` and `>=` compare numbers or text
//! - ranges test whole values against their bounds
//!
//! # Example
//!
//! ```
//! use sift_config::MatchSettings;
//! use sift_query::parse;
//! use sift_record::{Record, RecordMatcher};
//!
//! let record = Record::new().with("title", "Error handling").with("year", "2021");
//! let settings = MatchSettings::default();
//! let query = parse("title:error year>=2020").unwrap().unwrap();
//!
//! assert!(query.matches(&RecordMatcher::new(&record, &settings)).unwrap());
//! ```

#![warn(missing_docs)]

mod compare;
mod error;
mod matcher;
mod record;

pub use compare::{Bound, Operator, WILDCARD, WordPattern, compare_values, in_range, words};
pub use error::{MatchError, RecordError};
pub use matcher::RecordMatcher;
pub use record::{Record, load_records, parse_records};
use sift_config::MatchSettings;
use sift_query::Query;

/// Returns the positions of the records that match `query`.
///
/// Stops at the first matcher error.
pub fn select(
    query: &Query,
    records: &[Record],
    settings: &MatchSettings,
) -> Result<Vec<usize>, MatchError> {
    let mut selected = Vec::new();
    for (index, record) in records.iter().enumerate() {
        if query.matches(&RecordMatcher::new(record, settings))? {
            selected.push(index);
        }
    }
    Ok(selected)
}
