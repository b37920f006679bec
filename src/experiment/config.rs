//! Experiment configuration snapshot
//!
//! One `ExperimentConfig` is built at process start and passed by reference
//! to everything that needs it. `Default` holds the literal constants of the
//! current experiment; YAML loading exists for library users and tests.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// RL algorithm that produced the agent checkpoints and preference data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Soft Actor-Critic
    #[default]
    Sac,
    /// Proximal Policy Optimization
    Ppo,
}

impl Algorithm {
    /// Identifier used in file names.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sac => "sac",
            Self::Ppo => "ppo",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of human feedback the preference data was collected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackType {
    /// Scalar ratings of single trajectories
    Evaluative,
    /// Pairwise comparisons
    Comparative,
    /// Demonstrations by the annotator
    Demonstrative,
    /// Corrections of agent behavior
    #[default]
    Corrective,
    /// Free-form feature descriptions
    Descriptive,
}

impl FeedbackType {
    /// Identifier used in file names.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Evaluative => "evaluative",
            Self::Comparative => "comparative",
            Self::Demonstrative => "demonstrative",
            Self::Corrective => "corrective",
            Self::Descriptive => "descriptive",
        }
    }
}

impl fmt::Display for FeedbackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide experiment configuration.
///
/// Values are trusted literals: nothing is validated here. A bad value
/// surfaces where it is used (an invalid split ratio when splitting, a
/// missing checkpoint when loading).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Experiment number, first segment of every reward model name
    pub experiment_number: u32,
    /// Feedback type the preference data was collected with
    pub feedback_type: FeedbackType,
    /// RL algorithm
    pub algorithm: Algorithm,
    /// Gym environment identifier
    pub environment_name: String,
    /// Agent was trained with a learned reward model
    pub use_reward_model: bool,
    /// Agent used state-dependent exploration
    pub use_sde: bool,
    /// Reward model is trained on reward differences
    pub use_reward_difference: bool,
    /// Environment steps between RL agent checkpoints
    pub steps_per_checkpoint: u64,
    /// Directory every other path is resolved against
    pub base_dir: PathBuf,
    /// RL checkpoint folder, relative to the parent of `base_dir`
    pub checkpoints_dir: String,
    /// Reward model folder, relative to `base_dir`
    pub models_dir: String,
    /// Preference dataset file, relative to `base_dir`
    pub dataset_file: String,
    /// Sample fetching threads per data loader
    pub num_workers: usize,
    /// Seed for splits, shuffling and weight init (None = fresh entropy)
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            experiment_number: 9,
            feedback_type: FeedbackType::Corrective,
            algorithm: Algorithm::Sac,
            environment_name: "HalfCheetah-v3".to_string(),
            use_reward_model: false,
            use_sde: false,
            use_reward_difference: false,
            steps_per_checkpoint: 10_000,
            base_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
            checkpoints_dir: "rl_checkpoints".to_string(),
            models_dir: "models_final".to_string(),
            dataset_file: "preference_dataset.json".to_string(),
            num_workers: default_num_workers(),
            seed: None,
        }
    }
}

/// Host CPU count, 8 when it cannot be determined.
pub fn default_num_workers() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZero::get)
        .unwrap_or(8)
}

impl ExperimentConfig {
    /// Parse a YAML document. Missing fields keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::ConfigParsing {
            path: PathBuf::from("<inline>"),
            message: e.to_string(),
        })
    }

    /// Load a YAML configuration file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading config {}", path.display()), e))?;
        serde_yaml::from_str(&content).map_err(|e| Error::ConfigParsing {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// RL agent checkpoint directory (`<base>/../rl_checkpoints`).
    pub fn checkpoints_path(&self) -> PathBuf {
        self.base_dir.join("..").join(&self.checkpoints_dir)
    }

    /// Reward model output directory.
    pub fn models_path(&self) -> PathBuf {
        self.base_dir.join(&self.models_dir)
    }

    /// Preference dataset location.
    pub fn dataset_path(&self) -> PathBuf {
        self.base_dir.join(&self.dataset_file)
    }
}
