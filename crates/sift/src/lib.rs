//! sift: search queries over JSON records.
//!
//! The `sift` binary parses queries written in a small search syntax, prints
//! them back in canonical or debug form, and filters JSON records with them.
//! Matching settings come from `.sift.toml` files discovered from the working
//! directory upward.

#![warn(missing_docs)]

pub mod cli;
