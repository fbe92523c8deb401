//! Query tree and matching protocol for sift.
//!
//! A query is an immutable tree of [`Query`] nodes:
//!
//! - **Terms**: `rust`, or `"rust"` for an exact match
//! - **Phrases**: `"error handling"`
//! - **Fields**: `title:guide` - match within one field
//! - **Comparisons**: `year>=2001`
//! - **Ranges**: `[a TO b]`, with `]`/`[` flipped for exclusive bounds
//! - **Negation**: `-deprecated`
//! - **AND / OR**: `rust async`, `rust OR golang`
//! - **Grouping**: `(a b) OR (c d)`
//!
//! Every tree serializes back to query syntax and evaluates against any
//! [`QueryMatcher`], which decides what the leaf conditions mean for a
//! particular data source.
//!
//! # Example
//!
//! ```
//! use sift_query::parse;
//!
//! let query = parse("title:guide (rust OR golang) -deprecated").unwrap().unwrap();
//! assert_eq!(
//!     query.to_query_string(),
//!     "(title:guide (rust OR golang) -deprecated)"
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod matcher;
mod parser;

pub use ast::{FieldCompareQuery, FieldScope, PhraseQuery, Query, QueryTree, RangeQuery, TextQuery};
pub use error::{LexError, ParseError, QueryError, QueryErrorKind};
pub use lexer::{Token, tokenize};
pub use matcher::{EQUALS, FieldTarget, QueryMatcher, ScopedMatcher};
pub use parser::parse;
