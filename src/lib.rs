//! # Recompensa
//!
//! Reward model training for preference-based reinforcement learning.
//!
//! Pairs of agent trajectories labelled with a human preference are used to
//! fit a reward network under the Bradley-Terry model, which the RL agent can
//! later train against.
//!
//! ## Architecture
//!
//! - **experiment**: experiment constants, derived identifiers and paths
//! - **data**: preference datasets, random splits and batch loading
//! - **model**: reward networks
//! - **optim**: Adam and gradient clipping
//! - **train**: loss, fit loop and callbacks
//! - **io**: checkpoint save/load
//! - **finetune**: the end-to-end fine-tuning pipeline

pub mod data;
pub mod error;
pub mod experiment;
pub mod finetune;
pub mod io;
pub mod model;
pub mod optim;
pub mod train;

pub use error::{Error, Result};
