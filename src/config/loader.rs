//! ConfigLoader: layers defaults, an optional file, the environment and
//! command-line overrides, then deserializes into [`WatcherConfig`].

use super::WatcherConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::Path;

/// Environment prefix; nested keys use `__` (e.g. `CONFDRIFT_LOGGING__LEVEL`).
pub const ENV_PREFIX: &str = "CONFDRIFT";

/// Values supplied on the command line. `None` leaves lower layers in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<String>,
    pub endpoint: Option<String>,
    pub token: Option<String>,
    pub extensions: Option<Vec<String>>,
}

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    /// Precedence: file (lowest) -> environment -> overrides (highest).
    /// Missing keys fall back to the serde defaults on [`WatcherConfig`].
    pub fn load(
        file: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<WatcherConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let builder = add_environment(builder);
        let builder = apply_overrides(builder, overrides)?;

        builder.build()?.try_deserialize()
    }
}

fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("extensions")
            .try_parsing(true),
    )
}

fn apply_overrides(
    builder: ConfigBuilder<DefaultState>,
    overrides: &ConfigOverrides,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_override_option("root", overrides.root.clone())?
        .set_override_option("endpoint", overrides.endpoint.clone())?
        .set_override_option("token", overrides.token.clone())?
        .set_override_option("extensions", overrides.extensions.clone())
}
