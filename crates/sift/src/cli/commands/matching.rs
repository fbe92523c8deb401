//! Implementation of `sift match`.

use std::{path::Path, process::ExitCode};

use log::{debug, info};
use sift_config::MatchSettings;
use sift_query::{Query, parse};
use sift_record::{Record, load_records, select};

use crate::cli::{args::MatchCommand, context::CommandContext};

/// Exit codes for `sift match`.
mod exit_codes {
    use std::process::ExitCode;

    /// At least one record matched.
    pub const MATCHED: ExitCode = ExitCode::SUCCESS;
    /// No record matched.
    pub const NO_MATCH: ExitCode = ExitCode::FAILURE;
    /// The query or a record file could not be used.
    pub fn error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Prints the label of every record that matches the query.
pub fn run(ctx: &CommandContext, cmd: &MatchCommand) -> ExitCode {
    let query = match parse(&cmd.query) {
        Ok(Some(query)) => query,
        // An empty query places no condition on records
        Ok(None) => Query::and(Vec::new()),
        Err(e) => {
            eprintln!("{}", e.to_string().trim_end());
            return exit_codes::error();
        }
    };
    debug!("evaluating {:#}", query);

    let settings = &ctx.config.matching;
    let mut total = 0;
    for file in &cmd.files {
        let labels = match matching_labels(ctx, &query, file, settings) {
            Ok(labels) => labels,
            Err(message) => {
                eprintln!("error: {message}");
                return exit_codes::error();
            }
        };
        total += labels.len();
        if !cmd.count {
            for label in labels {
                println!("{label}");
            }
        }
    }

    info!("{total} record(s) matched");
    if cmd.count {
        println!("{total}");
    }

    if total > 0 {
        exit_codes::MATCHED
    } else {
        exit_codes::NO_MATCH
    }
}

/// Loads one file and returns the labels of its matching records.
fn matching_labels(
    ctx: &CommandContext,
    query: &Query,
    file: &Path,
    settings: &MatchSettings,
) -> Result<Vec<String>, String> {
    let records = load_records(file).map_err(|e| e.to_string())?;
    let selected = select(query, &records, settings)
        .map_err(|e| format!("{}: {e}", ctx.display_path(file)))?;

    Ok(selected
        .into_iter()
        .map(|index| label(ctx, file, index, &records[index], settings))
        .collect())
}

/// The record's id field, or `file#index` when it has none.
fn label(
    ctx: &CommandContext,
    file: &Path,
    index: usize,
    record: &Record,
    settings: &MatchSettings,
) -> String {
    record.first(&settings.id_field).map_or_else(
        || format!("{}#{index}", ctx.display_path(file)),
        String::from,
    )
}
