//! Implementation of `sift parse`.

use std::process::ExitCode;

use log::debug;
use sift_query::parse;

use crate::cli::{args::ParseCommand, context::CommandContext};

/// Parses the query and prints its canonical form, debug form or tree.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let query = match parse(&cmd.query) {
        Ok(Some(query)) => query,
        Ok(None) => {
            debug!("query is empty, nothing to print");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{}", e.to_string().trim_end());
            return ExitCode::FAILURE;
        }
    };

    if cmd.tree {
        print!("{}", query.tree());
    } else {
        let debug = cmd.debug || ctx.config.output.debug;
        println!("{}", query.serialize(debug));
    }
    ExitCode::SUCCESS
}
