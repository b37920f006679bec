//! Model saving functionality

use super::format::{ModelFormat, SaveConfig};
use super::model::ModelState;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Save a model state to a file.
///
/// Parent directories are created as needed and an existing file is
/// overwritten.
pub fn save_model(state: &ModelState, path: impl AsRef<Path>, config: &SaveConfig) -> Result<()> {
    let path = path.as_ref();

    let data = match config.format {
        ModelFormat::Json if config.pretty => serde_json::to_string_pretty(state).map_err(Error::serialization)?,
        ModelFormat::Json => serde_json::to_string(state).map_err(Error::serialization)?,
        ModelFormat::Yaml => serde_yaml::to_string(state).map_err(Error::serialization)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| Error::io(format!("creating {}", parent.display()), e))?;
    }
    fs::write(path, data).map_err(|e| Error::io(format!("writing {}", path.display()), e))?;

    tracing::debug!(path = %path.display(), params = state.num_parameters(), "saved model state");
    Ok(())
}
