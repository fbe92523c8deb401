//! Configuration system for sift.
//!
//! sift uses TOML configuration files named `.sift.toml`. Configuration is resolved by walking
//! up the directory tree from the current working directory, collecting any `.sift.toml` files
//! found, then loading `~/.sift.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawMatchSettings, RawOutputSettings, is_root_config, parse_config_file,
    parse_config_str,
};
use serde::{Deserialize, Serialize};

/// Top-level merged configuration for sift.
///
/// This represents the fully resolved configuration after merging all discovered `.sift.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// How records are matched against queries.
    pub matching: MatchSettings,
    /// How results and queries are printed.
    pub output: OutputSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.sift.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.sift.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.sift.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Serializes the effective settings to TOML format.
    ///
    /// The output uses the same layout as a `.sift.toml` file, so it can be
    /// pasted into one directly.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            matching: &self.matching,
            output: &self.output,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Settings for matching records against queries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchSettings {
    /// Whether text comparisons respect case.
    pub case_sensitive: bool,
    /// Fields searched by bare terms. Empty means every field.
    pub default_fields: Vec<String>,
    /// Fields accepted in `field:` scopes even when a record lacks them.
    pub known_fields: Vec<String>,
    /// Field whose value labels a matching record.
    pub id_field: String,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            default_fields: Vec::new(),
            known_fields: Vec::new(),
            id_field: String::from("id"),
        }
    }
}

/// Settings for printed output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Print queries in debug form, with every leaf wrapped in angle brackets.
    pub debug: bool,
}

/// Borrowed view of the settings in `.sift.toml` layout.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// The `[match]` table.
    #[serde(rename = "match")]
    matching: &'a MatchSettings,
    /// The `[output]` table.
    output: &'a OutputSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn test_match_settings_defaults() {
        let settings = MatchSettings::default();
        assert!(!settings.case_sensitive);
        assert!(settings.default_fields.is_empty());
        assert!(settings.known_fields.is_empty());
        assert_eq!(settings.id_field, "id");
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.output.debug);
        assert!(config.config_root.is_none());
    }

    #[test]
    fn test_load_from_no_files() {
        let config = Config::load_from_files(&[]).unwrap();
        assert_eq!(config.matching, MatchSettings::default());
    }

    #[test]
    fn test_load_from_files_merges() {
        let fixture = Fixture::new();
        let outer = fixture.config(
            "",
            r#"
[match]
known_fields = ["year"]
default_fields = ["body"]
"#,
        );
        let inner = fixture.config(
            "project",
            r#"
[match]
default_fields = ["title"]

[output]
debug = true
"#,
        );

        let config = Config::load_from_files(&[inner, outer]).unwrap();

        assert_eq!(config.matching.default_fields, vec!["title"]);
        assert_eq!(config.matching.known_fields, vec!["year"]);
        assert!(config.output.debug);
        assert_eq!(config.config_root, Some(fixture.root().join("project")));
    }

    #[test]
    fn test_load_discovers_from_cwd() {
        let fixture = Fixture::new();
        fixture.config(
            "",
            r#"
root = true

[match]
case_sensitive = true
"#,
        );
        let cwd = fixture.dir("nested/deeper");

        let config = Config::load(&cwd).unwrap();

        assert!(config.matching.case_sensitive);
        assert_eq!(config.config_root.as_deref(), Some(fixture.root()));
    }

    #[test]
    fn test_load_reports_bad_file() {
        let fixture = Fixture::new();
        let bad = fixture.config("", "[match]\ncase_sensitive = 3\n");

        let err = Config::load_from_files(&[bad]).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_settings_to_toml() {
        let config = Config::default();
        let toml = config.settings_to_toml().unwrap();

        assert!(toml.contains("[match]"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("case_sensitive = false"));
        assert!(toml.contains("id_field = \"id\""));
        assert!(toml.contains("debug = false"));

        // The rendered settings read back as an equivalent config
        let raw = parse_config_str(&toml, Path::new("rendered.toml")).unwrap();
        let reparsed = merge_configs(&[ParsedConfig {
            path: PathBuf::from("/rendered/.sift.toml"),
            config: raw,
        }]);
        assert_eq!(reparsed.matching, config.matching);
        assert_eq!(reparsed.output, config.output);
    }
}
