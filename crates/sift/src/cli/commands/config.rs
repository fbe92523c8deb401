//! Implementation of `sift config`.

use std::process::ExitCode;

use sift_config::discover_config_files;

use crate::cli::context::CommandContext;

/// Shows effective configuration settings.
///
/// The files that contributed are listed as TOML comments, highest precedence first.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let toml = match ctx.config.settings_to_toml() {
        Ok(toml) => toml,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let files = discover_config_files(&ctx.cwd);
    if files.is_empty() {
        println!("# no configuration files found, showing defaults");
    }
    for path in &files {
        println!("# {}", path.display());
    }
    print!("{toml}");
    ExitCode::SUCCESS
}
