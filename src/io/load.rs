//! Model loading functionality

use super::format::ModelFormat;
use super::model::ModelState;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load a model state from a file.
///
/// The format is detected from the file extension.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelState> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ModelNotFound { path: path.to_path_buf() });
    }
    let format = ModelFormat::from_path(path)?;

    let content = fs::read_to_string(path).map_err(|e| Error::io(format!("reading {}", path.display()), e))?;

    let state: ModelState = match format {
        ModelFormat::Json => serde_json::from_str(&content).map_err(Error::serialization)?,
        ModelFormat::Yaml => serde_yaml::from_str(&content).map_err(Error::serialization)?,
    };

    tracing::debug!(
        path = %path.display(),
        name = %state.metadata.name,
        params = state.num_parameters(),
        "loaded model state"
    );
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{save_model, ModelMetadata, SaveConfig, TrainingInfo};
    use crate::optim::Param;
    use ndarray::array;
    use tempfile::TempDir;

    fn state() -> ModelState {
        let w = Param::new(array![[1.0, 2.0], [3.0, 4.0]]);
        let meta = ModelMetadata::new("reward", "mlp_reward")
            .with_hyperparameter("hidden_dim", 2)
            .with_training(TrainingInfo {
                epoch: 1,
                global_step: 10,
                monitor: Some("val_loss".into()),
                monitor_value: Some(0.25),
            });
        ModelState::from_params(meta, [("w".to_string(), &w)])
    }

    #[test]
    fn test_save_then_load_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        for name in ["m.ckpt", "m.yml"] {
            let path = dir.path().join(name);
            let saved = state();
            save_model(&saved, &path, &SaveConfig::for_path(&path).unwrap()).unwrap();
            let loaded = load_model(&path).unwrap();
            assert_eq!(loaded, saved, "{name}");
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = load_model(dir.path().join("absent.ckpt")).unwrap_err();
        assert!(matches!(err, Error::ModelNotFound { .. }));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.bin");
        fs::write(&path, "{}").unwrap();
        assert!(matches!(load_model(&path), Err(Error::UnsupportedFormat { .. })));
    }

    #[test]
    fn test_load_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(load_model(&path), Err(Error::Serialization { .. })));
    }
}
