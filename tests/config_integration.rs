//! Experiment configuration loading tests

use recompensa::experiment::{Algorithm, ExperimentConfig, FeedbackType};
use std::fs;
use tempfile::TempDir;

#[test]
fn yaml_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("experiment.yaml");
    fs::write(
        &path,
        "experiment_number: 12\nfeedback_type: comparative\nalgorithm: ppo\nenvironment_name: Walker2d-v3\nuse_reward_difference: true\n",
    )
    .unwrap();

    let config = ExperimentConfig::from_yaml_file(&path).unwrap();
    assert_eq!(config.experiment_number, 12);
    assert_eq!(config.feedback_type, FeedbackType::Comparative);
    assert_eq!(config.algorithm, Algorithm::Ppo);
    assert_eq!(config.steps_per_checkpoint, 10_000);
    assert_eq!(config.model_id(), "#12_ppo_Walker2d-v3");
    assert_eq!(config.reward_model_name(3, false), "#12_ppo_Walker2d-v3_comparative_diff_3");
    assert_eq!(config.reward_model_name(3, true), "#12_ppo_Walker2d-v3_3");
}

#[test]
fn empty_yaml_is_the_default_experiment() {
    let config = ExperimentConfig::from_yaml_str("{}").unwrap();
    let default = ExperimentConfig::default();
    assert_eq!(config.model_id(), default.model_id());
    assert_eq!(config.reward_model_name(5, false), "#9_sac_HalfCheetah-v3_corrective_5");
    assert_eq!(config.reward_model_name(5, true), "#9_sac_HalfCheetah-v3_5");
}

#[test]
fn malformed_yaml_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(&path, "algorithm: [unclosed").unwrap();
    let err = ExperimentConfig::from_yaml_file(&path).unwrap_err();
    assert!(matches!(err, recompensa::Error::ConfigParsing { .. }));
}

#[test]
fn paths_are_stable_across_instances() {
    let a = ExperimentConfig::default();
    let b = a.clone();
    assert_eq!(a.reward_checkpoint_path("mlp"), b.reward_checkpoint_path("mlp"));
    assert_eq!(a.pretrained_model_path(), b.pretrained_model_path());
    assert!(a.checkpoints_path().ends_with("rl_checkpoints"));
}
