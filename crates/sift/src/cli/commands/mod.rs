//! Command implementations and dispatch.

pub mod config;
pub mod matching;
pub mod parse;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &CommandContext) -> ExitCode {
    match command {
        Commands::Parse(cmd) => parse::run(ctx, &cmd),
        Commands::Match(cmd) => matching::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
