//! File-name identifiers derived from the experiment configuration
//!
//! All functions here are pure: the same configuration always yields the
//! same names, which is what makes checkpoint overwrite and resume safe.

use super::config::ExperimentConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Checkpoint file extension used for reward models.
pub const CHECKPOINT_EXTENSION: &str = "ckpt";

/// Name tag of a trained reward model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelName {
    /// MLP trained on single observations
    MlpSingle,
    /// MLP trained with the full-trajectory loss
    Mlp,
    /// Pretrained MLP fine-tuned with the full-trajectory loss
    MlpFinetuned,
    /// Recurrent network
    Rnn,
}

impl ModelName {
    /// Tag used in file names.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MlpSingle => "mlp_single",
            Self::Mlp => "mlp",
            Self::MlpFinetuned => "mlp_finetuned",
            Self::Rnn => "rnn",
        }
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExperimentConfig {
    /// `{algorithm}_{environment}[_sde]`
    pub fn feedback_id(&self) -> String {
        let mut parts = vec![self.algorithm.as_str(), self.environment_name.as_str()];
        if self.use_sde {
            parts.push("sde");
        }
        parts.join("_")
    }

    /// `#{experiment}_{feedback_id}`
    pub fn model_id(&self) -> String {
        format!("#{}_{}", self.experiment_number, self.feedback_id())
    }

    /// Identifier of the fine-tuning run: `{algorithm}_{environment}[_sde][_finetuned]`.
    pub fn finetune_model_id(&self) -> String {
        let mut id = format!("{}_{}", self.algorithm, self.environment_name);
        if self.use_sde {
            id.push_str("_sde");
        }
        if self.use_reward_model {
            id.push_str("_finetuned");
        }
        id
    }

    /// Name of a trained reward model: `{model_id}[_{feedback}][_diff]_{postfix}`.
    ///
    /// The feedback segment is omitted when `is_without_feedback` is set. The
    /// `diff` segment requires both the reward-difference toggle and the
    /// feedback segment.
    pub fn reward_model_name(&self, postfix: impl fmt::Display, is_without_feedback: bool) -> String {
        let mut parts = vec![self.model_id()];
        if !is_without_feedback {
            parts.push(self.feedback_type.to_string());
            if self.use_reward_difference {
                parts.push("diff".to_string());
            }
        }
        parts.push(postfix.to_string());
        parts.join("_")
    }

    /// Where the best checkpoint of a reward model training run is written.
    pub fn reward_checkpoint_path(&self, name: impl fmt::Display) -> PathBuf {
        self.models_path()
            .join(format!("{}_{name}.{CHECKPOINT_EXTENSION}", self.finetune_model_id()))
    }

    /// Checkpoint the fine-tuning run starts from.
    pub fn pretrained_model_path(&self) -> PathBuf {
        self.reward_checkpoint_path("pretrained")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::{Algorithm, FeedbackType};

    #[test]
    fn test_model_id_default() {
        let config = ExperimentConfig::default();
        assert_eq!(config.feedback_id(), "sac_HalfCheetah-v3");
        assert_eq!(config.model_id(), "#9_sac_HalfCheetah-v3");
    }

    #[test]
    fn test_feedback_id_with_sde() {
        let config = ExperimentConfig { use_sde: true, ..Default::default() };
        assert_eq!(config.feedback_id(), "sac_HalfCheetah-v3_sde");
        assert_eq!(config.model_id(), "#9_sac_HalfCheetah-v3_sde");
    }

    #[test]
    fn test_reward_model_name_with_feedback() {
        let config = ExperimentConfig::default();
        assert_eq!(config.reward_model_name(5, false), "#9_sac_HalfCheetah-v3_corrective_5");
    }

    #[test]
    fn test_reward_model_name_without_feedback() {
        let config = ExperimentConfig::default();
        assert_eq!(config.reward_model_name(5, true), "#9_sac_HalfCheetah-v3_5");
    }

    #[test]
    fn test_reward_model_name_diff_requires_feedback() {
        let config = ExperimentConfig { use_reward_difference: true, ..Default::default() };
        assert_eq!(config.reward_model_name(5, false), "#9_sac_HalfCheetah-v3_corrective_diff_5");
        assert_eq!(config.reward_model_name(5, true), "#9_sac_HalfCheetah-v3_5");
    }

    #[test]
    fn test_reward_model_name_string_postfix() {
        let config = ExperimentConfig {
            algorithm: Algorithm::Ppo,
            feedback_type: FeedbackType::Evaluative,
            experiment_number: 2,
            ..Default::default()
        };
        assert_eq!(
            config.reward_model_name("final", false),
            "#2_ppo_HalfCheetah-v3_evaluative_final"
        );
    }

    #[test]
    fn test_finetune_model_id() {
        let config = ExperimentConfig { use_sde: true, use_reward_model: true, ..Default::default() };
        assert_eq!(config.finetune_model_id(), "sac_HalfCheetah-v3_sde_finetuned");
        assert_eq!(ExperimentConfig::default().finetune_model_id(), "sac_HalfCheetah-v3");
    }

    #[test]
    fn test_checkpoint_paths() {
        let config = ExperimentConfig { base_dir: PathBuf::from("/exp"), ..Default::default() };
        assert_eq!(
            config.reward_checkpoint_path(ModelName::MlpFinetuned),
            PathBuf::from("/exp/models_final/sac_HalfCheetah-v3_mlp_finetuned.ckpt")
        );
        assert_eq!(
            config.pretrained_model_path(),
            PathBuf::from("/exp/models_final/sac_HalfCheetah-v3_pretrained.ckpt")
        );
    }

    #[test]
    fn test_model_name_tags() {
        assert_eq!(ModelName::MlpSingle.to_string(), "mlp_single");
        assert_eq!(ModelName::Mlp.to_string(), "mlp");
        assert_eq!(ModelName::MlpFinetuned.to_string(), "mlp_finetuned");
        assert_eq!(ModelName::Rnn.to_string(), "rnn");
    }
}
