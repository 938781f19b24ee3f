use super::{default_settings_path, ConfigError, Settings};
use std::path::Path;

pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings = match path {
        Some(path) => Settings::from_path(path)?,
        None => Settings::from_path(&default_settings_path()?)?,
    };
    settings.validate()?;
    Ok(settings)
}
