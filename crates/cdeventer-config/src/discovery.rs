//! Config file discovery and layered merging.
//!
//! Two layers are read, later overriding earlier:
//! 1. user: `config.toml` in `--config-dir`, `$CDEVENTER_CONFIG_DIR` or
//!    `~/.config/cdeventer/`
//! 2. project: `cdeventer.toml` in the working directory
//!
//! `--sink` and `CDEVENTER_SINK_URL` are applied on top by the CLI.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{CdeventerConfig, ConfigError, Result};

/// File name of the project layer.
pub const PROJECT_CONFIG_FILE: &str = "cdeventer.toml";

/// File name of the user layer inside the user config directory.
pub const USER_CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the user config directory.
pub const CONFIG_DIR_ENV: &str = "CDEVENTER_CONFIG_DIR";

const APP_NAME: &str = "cdeventer";

/// Which layer a config file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    User,
    Project,
}

impl ConfigLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Project => "project",
        }
    }
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A config file that was looked for.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub layer: ConfigLayer,
    pub path: PathBuf,
    /// Whether the file existed and parsed.
    pub loaded: bool,
}

/// Merged configuration plus where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: CdeventerConfig,
    /// Every file looked for, lowest precedence first.
    pub sources: Vec<ConfigSource>,
    /// Layers that existed but could not be read or parsed.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Paths of the layers that contributed to the merged config.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }

    /// Merge the file at `path` over the current config.
    ///
    /// A missing file is recorded as not loaded. A broken one is also
    /// recorded as not loaded, with a warning, so one bad layer never stops
    /// the controller from starting.
    fn apply_layer(&mut self, layer: ConfigLayer, path: PathBuf) {
        let loaded = path.is_file()
            && match read_config_file(&path) {
                Ok(overlay) => {
                    self.config.merge(overlay);
                    true
                }
                Err(e) => {
                    self.warnings.push(format!("{layer} config skipped: {e}"));
                    false
                }
            };
        self.sources.push(ConfigSource {
            layer,
            path,
            loaded,
        });
    }
}

/// Discover and merge the user and project layers.
///
/// `user_dir` is the `--config-dir` override; without it the user layer is
/// located by [`user_config_dir`].
pub fn load_config(project_dir: &Path, user_dir: Option<&Path>) -> LoadedConfig {
    let mut loaded = LoadedConfig::default();
    if let Some(path) = user_config_path(user_dir) {
        loaded.apply_layer(ConfigLayer::User, path);
    }
    loaded.apply_layer(ConfigLayer::Project, project_dir.join(PROJECT_CONFIG_FILE));
    loaded
}

/// Read and parse one config file.
pub fn read_config_file(path: &Path) -> Result<CdeventerConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    CdeventerConfig::from_toml(&contents)
}

/// Write `config` to `path`, creating parent directories.
pub fn save_config(config: &CdeventerConfig, path: &Path) -> Result<()> {
    let write_err = |path: &Path, source| ConfigError::WriteFile {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| write_err(path, e))
}

/// The user layer's file path.
pub fn user_config_path(user_dir: Option<&Path>) -> Option<PathBuf> {
    user_config_dir(user_dir).map(|dir| dir.join(USER_CONFIG_FILE))
}

/// The user config directory: `user_dir` if given, then
/// `$CDEVENTER_CONFIG_DIR`, then the platform config directory.
pub fn user_config_dir(user_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = user_dir {
        return Some(dir.to_path_buf());
    }
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join(APP_NAME)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    use cdeventer_types::ContentMode;

    #[test]
    fn test_read_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(USER_CONFIG_FILE);
        fs::write(&path, "[sink]\nurl = \"http://localhost:9000/\"\n").unwrap();

        let config = read_config_file(&path).unwrap();
        assert_eq!(config.sink().url, "http://localhost:9000/");
    }

    #[test]
    fn test_read_config_file_not_found() {
        let err = read_config_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_read_config_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(USER_CONFIG_FILE);
        fs::write(&path, "this is not valid toml {{{{").unwrap();

        let err = read_config_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_no_files() {
        let project = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        let loaded = load_config(project.path(), Some(user.path()));
        assert!(loaded.config.sink.is_none());
        assert!(loaded.loaded_from().is_empty());

        let layers: Vec<_> = loaded.sources.iter().map(|s| s.layer).collect();
        assert_eq!(layers, [ConfigLayer::User, ConfigLayer::Project]);
        assert_eq!(loaded.sources[0].path, user.path().join(USER_CONFIG_FILE));
        assert_eq!(
            loaded.sources[1].path,
            project.path().join(PROJECT_CONFIG_FILE)
        );
    }

    #[test]
    fn test_load_config_layered_merge() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        fs::write(
            user.path().join(USER_CONFIG_FILE),
            r#"
[sink]
url = "http://user-sink/"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        fs::write(
            project.path().join(PROJECT_CONFIG_FILE),
            r#"
[sink]
url = "http://project-sink/"
mode = "structured"
"#,
        )
        .unwrap();

        let loaded = load_config(project.path(), Some(user.path()));
        let config = &loaded.config;

        // Project sink wins, user logging is kept
        assert_eq!(config.sink().url, "http://project-sink/");
        assert_eq!(config.sink().mode, ContentMode::Structured);
        assert_eq!(config.logging().level.as_deref(), Some("debug"));
        assert_eq!(loaded.loaded_from().len(), 2);
    }

    #[test]
    fn test_invalid_layer_is_a_warning() {
        let user = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(PROJECT_CONFIG_FILE), "[sink\n").unwrap();

        let loaded = load_config(project.path(), Some(user.path()));
        assert!(loaded.loaded_from().is_empty());
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].starts_with("project config skipped"));
    }

    #[test]
    fn test_user_dir_override_wins() {
        let user = TempDir::new().unwrap();
        assert_eq!(
            user_config_path(Some(user.path())),
            Some(user.path().join(USER_CONFIG_FILE))
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(USER_CONFIG_FILE);

        let mut config = CdeventerConfig::new();
        config.sink = Some(crate::SinkConfig {
            url: "http://saved/".to_string(),
            ..Default::default()
        });
        save_config(&config, &path).unwrap();

        let reloaded = read_config_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }
}
