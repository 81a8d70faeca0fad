//! In-memory recording abstraction.
//!
//! Stands in for `mne.io.Raw`: continuous [C, T] voltages, a sampling rate,
//! channel names and the annotated markers laid down during acquisition.
//! File readers live outside this crate; callers construct a [`Recording`]
//! from whatever source they have.
use ndarray::Array2;

use crate::error::{DecodeError, Result};

/// A discrete annotated marker: where a stimulus block started and what the
/// acquisition software called it (e.g. `"bb/theta"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Onset expressed as a sample index into the recording.
    pub onset_sample: usize,
    /// Free-text description, resolved to an integer code through the
    /// caller's event mapping.
    pub description: String,
}

impl Annotation {
    pub fn new(onset_sample: usize, description: impl Into<String>) -> Self {
        Self { onset_sample, description: description.into() }
    }
}

/// Continuous multi-channel recording with annotations.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Voltages, shape [C, T].
    pub data: Array2<f64>,
    /// Sampling rate in Hz.
    pub sfreq: f64,
    /// Channel names, one per row of `data`.
    pub ch_names: Vec<String>,
    /// Annotated markers, in acquisition order.
    pub annotations: Vec<Annotation>,
}

impl Recording {
    /// Build a recording, validating that the channel list matches the data.
    pub fn new(
        data: Array2<f64>,
        sfreq: f64,
        ch_names: Vec<String>,
        annotations: Vec<Annotation>,
    ) -> Result<Self> {
        if data.nrows() != ch_names.len() {
            return Err(DecodeError::Shape(format!(
                "data has {} channels but {} channel names were given",
                data.nrows(),
                ch_names.len()
            )));
        }
        if data.ncols() == 0 {
            return Err(DecodeError::Configuration("recording has no samples".into()));
        }
        if !(sfreq > 0.0) {
            return Err(DecodeError::Configuration(format!(
                "sampling rate must be positive, got {sfreq}"
            )));
        }
        Ok(Self { data, sfreq, ch_names, annotations })
    }

    pub fn n_channels(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Index of the final sample; the last stimulus window ends here.
    pub fn last_sample(&self) -> usize {
        self.n_samples() - 1
    }
}
