//! Configuration system for the cdeventer controller.
//!
//! Provides TOML-based configuration with:
//! - The event sink (`[sink]`): target URL and CloudEvents content mode
//! - Log output (`[logging]`): console filter and optional JSON log directory
//! - Config file layering (XDG user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigLayer, ConfigSource, LoadedConfig, PROJECT_CONFIG_FILE,
    USER_CONFIG_FILE, load_config, read_config_file, save_config, user_config_dir,
    user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
