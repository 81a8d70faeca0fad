//! Analysis configuration.
//!
//! [`DecodingConfig`] holds every tunable parameter of the standard
//! binaural-beat decoding run. All fields are `pub`, so construct one with
//! struct-update syntax or start from [`DecodingConfig::default()`].
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::crossval::SvmKernel;
use crate::tfr::WaveletCycles;

/// Configuration for the full decoding pipeline.
///
/// ```
/// use bbdecode::{DecodingConfig, SvmKernel};
///
/// let cfg = DecodingConfig {
///     epoch_dur: 2.0,                    // shorter epochs
///     kernel: SvmKernel::Linear,         // linear instead of RBF
///     ..DecodingConfig::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodingConfig {
    /// Duration of each fixed-length epoch in seconds.
    ///
    /// The epoch length in samples is `floor(epoch_dur × sfreq)`; trailing
    /// samples that do not fill a complete epoch are discarded.
    ///
    /// Default: `5.0` s.
    pub epoch_dur: f64,

    /// Annotation description → integer stimulus code.
    ///
    /// The mapping is strict: a recording annotation without an entry here
    /// aborts the run. Codes 0 and 12 are reserved for the synthetic
    /// baseline and end-sentinel markers.
    ///
    /// Default: empty (must be filled for annotated recordings).
    pub event_codes: HashMap<String, i32>,

    /// Wavelet centre frequencies in Hz.
    ///
    /// Default: 1–40 Hz in 1 Hz steps.
    pub freqs: Vec<f64>,

    /// Wavelet cycles, fixed or per frequency.
    ///
    /// Default: `Fixed(7.0)`.
    pub cycles: WaveletCycles,

    /// The two stimulus codes whose epochs are decoded against each other.
    /// The greater code is the positive class of the ROC.
    ///
    /// Default: `(1, 2)`.
    pub stim_pair: (i32, i32),

    /// Region of interest: channel names kept for decoding, in any order
    /// (the original channel order is preserved). Empty keeps every channel.
    ///
    /// Default: empty.
    pub roi: Vec<String>,

    /// Stratified cross-validation fold count.
    ///
    /// Each stimulus condition needs at least this many epochs.
    ///
    /// Default: `5`.
    pub n_splits: usize,

    /// SVM kernel used at every sweep step.
    ///
    /// Default: [`SvmKernel::Rbf`] with the width derived from the training
    /// features.
    pub kernel: SvmKernel,

    /// Seed for the shuffled fold assignment. The same seed is used at every
    /// sweep step, so fold structure never varies across frequencies or
    /// channels; only the label shuffle (driven by the caller's RNG) does.
    ///
    /// Default: `1`.
    pub cv_seed: u64,
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self {
            epoch_dur: 5.0,
            event_codes: HashMap::new(),
            freqs: (1..=40).map(f64::from).collect(),
            cycles: WaveletCycles::Fixed(7.0),
            stim_pair: (1, 2),
            roi: vec![],
            n_splits: 5,
            kernel: SvmKernel::default(),
            cv_seed: 1,
        }
    }
}
