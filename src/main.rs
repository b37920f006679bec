//! Recompensa fine-tuning entry point
//!
//! Fine-tunes the pretrained trajectory reward model on the multi-step
//! preference dataset found next to the crate manifest.
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug recompensa
//! ```

use recompensa::experiment::ExperimentConfig;
use recompensa::finetune::run_finetuning;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // The fine-tuning run uses the gSDE-trained SAC agent's data
    let config = ExperimentConfig { use_sde: true, ..ExperimentConfig::default() };

    match run_finetuning(&config) {
        Ok(model) => {
            tracing::info!(
                checkpoint = %config.reward_checkpoint_path(recompensa::experiment::ModelName::MlpFinetuned).display(),
                params = model.num_parameters(),
                "fine-tuning finished"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error [{}]: {e}", e.code());
            ExitCode::FAILURE
        }
    }
}
