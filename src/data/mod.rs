//! Preference data: datasets, splitting and batching
//!
//! - [`PreferenceData`] - the capability a dataset offers (length + indexed access)
//! - [`PreferenceDataset`] / [`MultiStepPreferenceDataset`] - single-step and
//!   trajectory-segment datasets read from a JSON preference file
//! - [`random_split`] / [`train_val_split`] - disjoint random subsets
//! - [`DataLoader`] - per-epoch batching with optional reshuffling

mod dataset;
mod loader;
mod sample;
mod split;

pub use dataset::{load_records, MultiStepPreferenceDataset, PreferenceData, PreferenceDataset};
pub use loader::DataLoader;
pub use sample::{PreferenceBatch, PreferenceRecord, PreferenceSample};
pub use split::{random_split, split_sizes, train_val_split, Subset};
