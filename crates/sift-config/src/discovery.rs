//! Configuration file discovery.
//!
//! Discovers `.sift.toml` files by walking up the directory tree from a starting point,
//! then appending the global `~/.sift.toml` if present.

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use log::debug;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".sift.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths nearest first. The global `~/.sift.toml` comes last, unless a
/// local file sets `root = true`.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let ConfigWalk { mut files, rooted } = walk_up(cwd);

    if rooted {
        if let Some(stop) = files.last() {
            debug!("{} sets root = true, ignoring parent and global configs", stop.display());
        }
    } else if let Some(global) = global_config_path()
        && global.is_file()
        && !files.contains(&global)
    {
        files.push(global);
    }

    debug!("discovered {} config file(s) from {}", files.len(), cwd.display());
    files
}

/// Local config files found above a directory.
#[derive(Debug, Default, PartialEq, Eq)]
struct ConfigWalk {
    /// Existing `.sift.toml` files, nearest first.
    files: Vec<PathBuf>,
    /// Whether the last file ended the walk with `root = true`.
    rooted: bool,
}

/// Collects `.sift.toml` files from `cwd` through its ancestors.
fn walk_up(cwd: &Path) -> ConfigWalk {
    let mut walk = ConfigWalk::default();
    let candidates = cwd
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .filter(|path| path.is_file());

    for path in candidates {
        walk.rooted = is_root_config(&path);
        walk.files.push(path);
        if walk.rooted {
            break;
        }
    }
    walk
}

/// Returns the path to the global configuration file (`~/.sift.toml`).
///
/// Returns `None` if the home directory cannot be determined.
pub fn global_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::Fixture;

    /// Drops the global config, which depends on the machine running the tests.
    fn local(configs: &[PathBuf]) -> Vec<&PathBuf> {
        configs.iter().filter(|p| !is_global_config(p)).collect()
    }

    #[test]
    fn test_discover_no_configs() {
        let fixture = Fixture::new();
        let subdir = fixture.dir("a/b/c");

        assert!(local(&discover_config_files(&subdir)).is_empty());
    }

    #[test]
    fn test_discover_multiple_configs_precedence_order() {
        let fixture = Fixture::new();
        let root_config = fixture.empty_config("");
        let mid_config = fixture.empty_config("a/b");
        let leaf_config = fixture.empty_config("a/b/c/d");
        let working_dir = fixture.dir("a/b/c/d/e");

        let configs = discover_config_files(&working_dir);

        assert_eq!(
            local(&configs),
            vec![&leaf_config, &mid_config, &root_config]
        );
    }

    #[test]
    fn test_discover_skips_non_file_config() {
        let fixture = Fixture::new();
        fs::create_dir_all(fixture.root().join(CONFIG_FILENAME)).unwrap();
        let subdir = fixture.dir("subdir");

        assert!(local(&discover_config_files(&subdir)).is_empty());
    }

    #[test]
    fn test_root_config_stops_discovery() {
        let fixture = Fixture::new();
        let _parent_config = fixture.empty_config("");
        let root_config = fixture.root_config("project");
        let child_config = fixture.empty_config("project/sub");
        let working_dir = fixture.dir("project/sub/deep");

        let configs = discover_config_files(&working_dir);

        // Child and root only: no parent, no global
        assert_eq!(configs, vec![child_config, root_config]);
    }

    #[test]
    fn test_walk_up_reports_root_stop() {
        let fixture = Fixture::new();
        let outer = fixture.empty_config("");
        let inner = fixture.empty_config("a");
        let walk = walk_up(&fixture.dir("a/b"));
        assert!(!walk.rooted);
        assert_eq!(walk.files, vec![inner, outer]);

        let root = fixture.root_config("a/b");
        let walk = walk_up(&fixture.dir("a/b/c"));
        assert_eq!(
            walk,
            ConfigWalk {
                files: vec![root],
                rooted: true,
            }
        );
    }

    #[test]
    fn test_global_config_path_ends_with_filename() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with(CONFIG_FILENAME));
            assert!(is_global_config(&path));
        }
        assert!(!is_global_config(Path::new("/some/other/path/.sift.toml")));
    }
}
