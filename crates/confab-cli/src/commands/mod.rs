pub mod aggregate;
pub mod filter;

use std::path::Path;

use confab_core::{AppError, Config, ConfigError};

/// Load and validate the config, mapping validation failures into the
/// user-facing error taxonomy.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, AppError> {
    let (config, _warnings) = Config::load_validated(path)
        .map_err(|error| AppError::Config(ConfigError::Invalid(format!("{error:#}"))))?;
    Ok(config)
}
