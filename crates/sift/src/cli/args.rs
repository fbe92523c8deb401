//! Clap argument definitions for the `sift` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "sift")]
#[command(about = "Parse search queries and filter JSON records with them")]
pub struct Cli {
    /// Increase log output (-v for debug, -vv for trace). RUST_LOG overrides this.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments for `sift parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    /// Query to parse
    pub query: String,

    /// Wrap every leaf in angle brackets to show how the query was split
    #[arg(long)]
    pub debug: bool,

    /// Print the query tree, one node per line
    #[arg(long, conflicts_with = "debug")]
    pub tree: bool,
}

/// Arguments for `sift match`.
#[derive(Args, Debug, Clone)]
pub struct MatchCommand {
    /// Query records must satisfy
    pub query: String,

    /// JSON files holding an object or an array of objects
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Print the number of matching records instead of their labels
    #[arg(short = 'c', long)]
    pub count: bool,
}

/// Supported `sift` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a query and print it back in canonical form
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term must appear (term* for a prefix)
  term1 term2       Both terms (implicit AND)
  \"phrase\"          Words in sequence, taken literally
  -term             Term must NOT appear
  term1 OR term2    Either term
  (expr)            Grouping
  field:expr        Match within one field
  field>=value      Compare a field (=, <, >, <=, >=)
  [a TO b]          Range; use ] or [ on either end for an exclusive bound

EXAMPLES:
  sift parse 'rust async'
  sift parse --debug 'title:guide (rust OR golang)'
  sift parse --tree 'year:[2000 TO *] -draft:true'")]
    Parse(ParseCommand),

    /// Print the records that match a query
    #[command(after_help = "\
Each match is printed as its id field, or as file#index when it has none.
Exit status is 0 when something matched, 1 when nothing did and 2 on error.

EXAMPLES:
  sift match 'tags:rust year>=2020' posts.json
  sift match --count '\"error handling\"' a.json b.json")]
    Match(MatchCommand),

    /// Show effective configuration settings
    Config,
}
