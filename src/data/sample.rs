//! Preference samples, on-disk records and collated batches

use crate::error::{Error, Result};
use ndarray::{stack, Array1, Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

/// One labeled comparison as stored in a preference dataset file.
///
/// `first` and `second` are trajectories of observations (one row per
/// environment step). `preference` is the probability that `first` is the
/// preferred trajectory: 1.0, 0.0, or 0.5 for "equally good".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    /// Observations of the first trajectory
    pub first: Vec<Vec<f32>>,
    /// Observations of the second trajectory
    pub second: Vec<Vec<f32>>,
    /// Probability that `first` is preferred
    pub preference: f32,
}

impl PreferenceRecord {
    /// Steps available in both trajectories.
    pub fn aligned_len(&self) -> usize {
        self.first.len().min(self.second.len())
    }

    /// Observation width, taken from the first step of `first`.
    pub fn observation_dim(&self) -> Option<usize> {
        self.first.first().or_else(|| self.second.first()).map(Vec::len)
    }
}

/// A training sample: two observation sequences of equal length and a label.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceSample {
    /// `[T, D]` observations of the first segment
    pub first: Array2<f32>,
    /// `[T, D]` observations of the second segment
    pub second: Array2<f32>,
    /// Probability that `first` is preferred
    pub preference: f32,
}

impl PreferenceSample {
    /// Sequence length `T`.
    pub fn sequence_len(&self) -> usize {
        self.first.nrows()
    }

    /// Observation width `D`.
    pub fn observation_dim(&self) -> usize {
        self.first.ncols()
    }
}

/// Convert observation rows into a `[T, D]` matrix, checking every row has width `dim`.
pub(crate) fn rows_to_matrix(rows: &[Vec<f32>], dim: usize) -> Result<Array2<f32>> {
    let mut flat = Vec::with_capacity(rows.len() * dim);
    for row in rows {
        if row.len() != dim {
            return Err(Error::ShapeMismatch { expected: vec![dim], actual: vec![row.len()] });
        }
        flat.extend_from_slice(row);
    }
    Array2::from_shape_vec((rows.len(), dim), flat).map_err(|_| Error::ShapeMismatch {
        expected: vec![rows.len(), dim],
        actual: vec![rows.len() * dim],
    })
}

/// A collated batch of preference samples.
#[derive(Debug, Clone)]
pub struct PreferenceBatch {
    /// `[B, T, D]` first segments
    pub first: Array3<f32>,
    /// `[B, T, D]` second segments
    pub second: Array3<f32>,
    /// `[B]` labels
    pub preferences: Array1<f32>,
}

impl PreferenceBatch {
    /// Stack samples along a new batch axis. All samples must share `[T, D]`.
    pub fn collate(samples: &[PreferenceSample]) -> Result<Self> {
        let Some(head) = samples.first() else {
            return Err(Error::ShapeMismatch { expected: vec![1], actual: vec![0] });
        };
        let expected = vec![head.sequence_len(), head.observation_dim()];
        for sample in samples {
            for part in [&sample.first, &sample.second] {
                if part.shape() != expected.as_slice() {
                    return Err(Error::ShapeMismatch {
                        expected: expected.clone(),
                        actual: part.shape().to_vec(),
                    });
                }
            }
        }

        let firsts: Vec<_> = samples.iter().map(|s| s.first.view()).collect();
        let seconds: Vec<_> = samples.iter().map(|s| s.second.view()).collect();
        let shape_err = |e: ndarray::ShapeError| Error::serialization(format!("collate failed: {e}"));

        Ok(Self {
            first: stack(Axis(0), &firsts).map_err(shape_err)?,
            second: stack(Axis(0), &seconds).map_err(shape_err)?,
            preferences: samples.iter().map(|s| s.preference).collect(),
        })
    }

    /// Number of samples in the batch.
    pub fn size(&self) -> usize {
        self.preferences.len()
    }
}
