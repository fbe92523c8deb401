//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules.

use std::path::PathBuf;

use crate::{
    Config, MatchSettings, OutputSettings,
    parse::{RawConfig, RawMatchSettings, RawOutputSettings},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). For every setting the first
/// defined value wins; list settings are replaced, not concatenated.
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    let mut matching = MatchSettings::default();
    let mut output = OutputSettings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(raw) = &parsed.config.matching {
            apply_raw_match(&mut matching, raw);
        }
        if let Some(raw) = &parsed.config.output {
            apply_raw_output(&mut output, raw);
        }
    }

    let config_root = configs
        .first()
        .and_then(|c| c.path.parent())
        .map(PathBuf::from);

    Config {
        matching,
        output,
        config_root,
    }
}

/// Applies raw match settings to result, overwriting any present values.
fn apply_raw_match(result: &mut MatchSettings, raw: &RawMatchSettings) {
    if let Some(v) = raw.case_sensitive {
        result.case_sensitive = v;
    }
    if let Some(v) = &raw.default_fields {
        result.default_fields.clone_from(v);
    }
    if let Some(v) = &raw.known_fields {
        result.known_fields.clone_from(v);
    }
    if let Some(v) = &raw.id_field {
        result.id_field.clone_from(v);
    }
}

/// Applies raw output settings to result, overwriting any present values.
fn apply_raw_output(result: &mut OutputSettings, raw: &RawOutputSettings) {
    if let Some(v) = raw.debug {
        result.debug = v;
    }
}
