//! Error types with actionable diagnostics (Andon principle).
//!
//! Every variant states what went wrong and, where there is one, the next
//! thing to check. Nothing in the crate recovers locally: errors travel up
//! to `main`, which prints them and exits non-zero.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for recompensa operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring, loading or training a reward model.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be parsed.
    #[error("Invalid configuration in {path}:\n  {message}\n  → Check YAML syntax and field names")]
    ConfigParsing { path: PathBuf, message: String },

    /// Split ratio outside `[0, 1]`.
    #[error("Invalid split ratio {ratio}\n  → Use a value between 0.0 and 1.0 (default 0.8)")]
    InvalidSplitRatio { ratio: f64 },

    /// Requested split lengths do not add up to the dataset length.
    #[error("Split lengths {lengths:?} do not sum to dataset length {len}")]
    InvalidSplitLengths { lengths: Vec<usize>, len: usize },

    /// Preference dataset file missing.
    #[error("Preference dataset not found: {path}\n  → Export the preference data before training")]
    DatasetNotFound { path: PathBuf },

    /// Sample index outside the dataset.
    #[error("Sample index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A loader produced no batches.
    #[error("The {split} data loader is empty (dataset too small to split)\n  → Collect more preference data or change split_ratio")]
    EmptyDataLoader { split: &'static str },

    /// Model checkpoint missing.
    #[error("Model checkpoint not found: {path}\n  → Train the pretrained model first or check the path")]
    ModelNotFound { path: PathBuf },

    /// Checkpoint was written for a different network.
    #[error("Checkpoint architecture mismatch: expected {expected}, found {actual}\n  → Pass the same dimensions the checkpoint was trained with")]
    ArchitectureMismatch { expected: String, actual: String },

    /// Invalid tensor shape.
    #[error("Tensor shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: Vec<usize>, actual: Vec<usize> },

    /// Unsupported checkpoint file extension.
    #[error("Unsupported model format: {format}\n  → Supported extensions: .ckpt, .json, .yaml, .yml")]
    UnsupportedFormat { format: String },

    /// Loss became NaN or infinite.
    #[error("Training diverged at epoch {epoch}, step {step}: loss is {loss}\n  → Lower the learning rate or enable gradient clipping")]
    Diverged { epoch: usize, step: usize, loss: f32 },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create a serialization error from any displayable cause.
    pub fn serialization(message: impl std::fmt::Display) -> Self {
        Self::Serialization { message: message.to_string() }
    }

    /// Check if this error is caused by user input rather than a training failure.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParsing { .. }
                | Self::InvalidSplitRatio { .. }
                | Self::InvalidSplitLengths { .. }
                | Self::DatasetNotFound { .. }
                | Self::EmptyDataLoader { .. }
                | Self::ModelNotFound { .. }
                | Self::ArchitectureMismatch { .. }
                | Self::UnsupportedFormat { .. }
        )
    }

    /// Get the error code for structured output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigParsing { .. } => "E002",
            Self::InvalidSplitRatio { .. } => "E003",
            Self::InvalidSplitLengths { .. } => "E004",
            Self::DatasetNotFound { .. } => "E005",
            Self::EmptyDataLoader { .. } => "E006",
            Self::IndexOutOfBounds { .. } => "E007",
            Self::ModelNotFound { .. } => "E010",
            Self::ArchitectureMismatch { .. } => "E012",
            Self::UnsupportedFormat { .. } => "E011",
            Self::ShapeMismatch { .. } => "E040",
            Self::Diverged { .. } => "E041",
            Self::Io { .. } => "E050",
            Self::Serialization { .. } => "E051",
        }
    }
}
