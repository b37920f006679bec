//! Preference datasets
//!
//! Both datasets are built from the same file of [`PreferenceRecord`]s and
//! differ only in how a record is cut into samples.

use super::sample::{rows_to_matrix, PreferenceRecord, PreferenceSample};
use crate::error::{Error, Result};
use ndarray::s;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Capability every preference dataset offers to the training pipeline.
pub trait PreferenceData: Send + Sync {
    /// Number of samples.
    fn len(&self) -> usize;

    /// Fetch one sample.
    fn get(&self, index: usize) -> Option<PreferenceSample>;

    /// Whether the dataset holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read the records of a preference dataset file (JSON array).
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<PreferenceRecord>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::DatasetNotFound { path: path.to_path_buf() });
    }
    let content = fs::read_to_string(path)
        .map_err(|e| Error::io(format!("reading preference dataset {}", path.display()), e))?;
    let records: Vec<PreferenceRecord> = serde_json::from_str(&content)
        .map_err(|e| Error::serialization(format!("preference dataset {}: {e}", path.display())))?;
    debug!(path = %path.display(), records = records.len(), "loaded preference records");
    Ok(records)
}

/// Observation width shared by every record.
fn common_dim(records: &[PreferenceRecord]) -> Result<usize> {
    let dim = records.iter().find_map(PreferenceRecord::observation_dim).unwrap_or(0);
    for record in records {
        if let Some(d) = record.observation_dim() {
            if d != dim {
                return Err(Error::ShapeMismatch { expected: vec![dim], actual: vec![d] });
            }
        }
    }
    Ok(dim)
}

/// Single-step dataset: every aligned time step of a record is one sample.
#[derive(Debug, Clone, Default)]
pub struct PreferenceDataset {
    samples: Vec<PreferenceSample>,
}

impl PreferenceDataset {
    /// Load from a preference dataset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let dataset = Self::from_records(&load_records(path)?)?;
        info!(samples = dataset.len(), "single-step preference dataset ready");
        Ok(dataset)
    }

    /// Build from in-memory records.
    pub fn from_records(records: &[PreferenceRecord]) -> Result<Self> {
        let dim = common_dim(records)?;
        let mut samples = Vec::new();
        for record in records {
            let steps = record.aligned_len();
            let first = rows_to_matrix(&record.first[..steps], dim)?;
            let second = rows_to_matrix(&record.second[..steps], dim)?;
            for t in 0..steps {
                samples.push(PreferenceSample {
                    first: first.slice(s![t..t + 1, ..]).to_owned(),
                    second: second.slice(s![t..t + 1, ..]).to_owned(),
                    preference: record.preference,
                });
            }
        }
        Ok(Self { samples })
    }

    /// Borrow all samples.
    pub fn samples(&self) -> &[PreferenceSample] {
        &self.samples
    }
}

impl PreferenceData for PreferenceDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Option<PreferenceSample> {
        self.samples.get(index).cloned()
    }
}

/// Multi-step dataset: one fixed-length trajectory segment pair per record.
#[derive(Debug, Clone, Default)]
pub struct MultiStepPreferenceDataset {
    samples: Vec<PreferenceSample>,
    sequence_length: usize,
}

impl MultiStepPreferenceDataset {
    /// Load from a preference dataset file.
    pub fn load(path: impl AsRef<Path>, sequence_length: usize) -> Result<Self> {
        let dataset = Self::from_records(&load_records(path)?, sequence_length)?;
        info!(
            samples = dataset.len(),
            sequence_length, "multi-step preference dataset ready"
        );
        Ok(dataset)
    }

    /// Build from in-memory records. Records shorter than `sequence_length` are skipped.
    pub fn from_records(records: &[PreferenceRecord], sequence_length: usize) -> Result<Self> {
        let dim = common_dim(records)?;
        let mut samples = Vec::with_capacity(records.len());
        let mut skipped = 0usize;
        for record in records {
            if sequence_length == 0 || record.aligned_len() < sequence_length {
                skipped += 1;
                continue;
            }
            samples.push(PreferenceSample {
                first: rows_to_matrix(&record.first[..sequence_length], dim)?,
                second: rows_to_matrix(&record.second[..sequence_length], dim)?,
                preference: record.preference,
            });
        }
        if skipped > 0 {
            debug!(skipped, sequence_length, "records too short for the sequence length");
        }
        Ok(Self { samples, sequence_length })
    }

    /// Steps per segment.
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }
}

impl PreferenceData for MultiStepPreferenceDataset {
    fn len(&self) -> usize {
        self.samples.len()
    }

    fn get(&self, index: usize) -> Option<PreferenceSample> {
        self.samples.get(index).cloned()
    }
}
