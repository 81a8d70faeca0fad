//! # bbdecode — binaural-beat EEG decoding in pure Rust
//!
//! `bbdecode` is the analysis core of a binaural-beat entrainment
//! experiment: it segments a continuous EEG recording into labeled epochs,
//! computes Morlet wavelet power and tests — per frequency bin and per
//! channel — whether the stimulus condition can be decoded from spectral
//! power. The time-frequency and classification semantics are ported from
//! the MNE-Python / scikit-learn analysis
//! (`tfr_array_morlet`, `StratifiedKFold`, `SVC`, ROC-AUC scoring).
//!
//! ## Pipeline overview
//!
//! ```text
//! Recording ([C, T] + annotations)
//!   │
//!   ├─ epoch_and_label()          markers → stimulus windows → [E, C, L] + codes
//!   ├─ tfr_morlet()               Morlet power → [E, C, F, T]
//!   ├─ mean_over_axes()           collapse time → [E, C, F]
//!   ├─ select_conditions()        two stimulus codes × ROI channels
//!   ├─ decode_over_frequencies()  ROC-AUC per frequency bin (+ shuffled null)
//!   └─ decode_over_channels()     ROC-AUC per channel        (+ shuffled null)
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use bbdecode::{decode, Annotation, DecodingConfig, Recording, SvmKernel};
//! use ndarray::Array2;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! // 1. Build a recording (any reader can feed this — no file I/O here).
//! let data: Array2<f64> = Array2::zeros((2, 30_000));
//! let rec = Recording::new(
//!     data,
//!     500.0,
//!     vec!["Oz".into(), "Pz".into()],
//!     vec![Annotation::new(5_000, "bb/theta"), Annotation::new(15_000, "bb/alpha")],
//! ).unwrap();
//!
//! // 2. Configure the run.
//! let mut cfg = DecodingConfig::default();
//! cfg.event_codes.insert("bb/theta".into(), 1);
//! cfg.event_codes.insert("bb/alpha".into(), 2);
//! cfg.kernel = SvmKernel::Linear;
//!
//! // 3. Decode. The RNG drives the shuffled-label null; seed it for
//! //    reproducible chance levels.
//! let mut rng = StdRng::seed_from_u64(1);
//! let report = decode(&rec, &cfg, &mut rng).unwrap();
//! println!("peak decoding AUC {:?}", report.by_frequency.scores.iter().cloned().fold(0.0, f64::max));
//! ```
//!
//! Each pipeline stage is also exposed on its own, so partial runs (e.g.
//! keeping the time axis, or sweeping a custom feature tensor) compose from
//! the same pieces.

pub mod config;
pub mod crossval;
pub mod epoch;
pub mod error;
pub mod events;
pub mod recording;
pub mod select;
pub mod sweep;
pub mod tfr;

use ndarray::{Array1, Ix3};
use rand::Rng;

// ── Crate-root re-exports ─────────────────────────────────────────────────
//
// Everything a downstream analysis script is likely to need is available
// directly as `bbdecode::Foo` without knowing the internal module layout.

// config
pub use config::DecodingConfig;

// crossval
pub use crossval::{cross_val_auc, StratifiedKFold, SvmKernel};

// epoch
pub use epoch::{epoch_and_label, epoch_fixed_length, label_epochs, LabeledEpochs, UNLABELED_CODE};

// error
pub use error::{DecodeError, Result};

// events
pub use events::{
    markers_from_annotations, stimulus_windows, window_at, EventMarker, StimulusWindow,
    BASELINE_CODE, END_CODE,
};

// recording
pub use recording::{Annotation, Recording};

// select
pub use select::{roi_channel_indices, select_conditions};

// sweep
pub use sweep::{decode_over_channels, decode_over_frequencies, SweepScores};

// tfr
pub use tfr::{mean_over_axes, morlet_wavelet, tfr_morlet, WaveletCycles};

/// Everything one decoding run produces.
#[derive(Debug, Clone)]
pub struct DecodingReport {
    /// Labels of the epochs that survived condition selection, aligned with
    /// the epoch axis of the swept features.
    pub labels: Array1<i32>,
    /// Names of the ROI channels, in original recording order; aligned with
    /// `by_channel`.
    pub channels: Vec<String>,
    /// One real and one shuffled-label ROC-AUC per frequency bin.
    pub by_frequency: SweepScores,
    /// One real and one shuffled-label ROC-AUC per ROI channel.
    pub by_channel: SweepScores,
}

/// Run the **full decoding pipeline** on a single recording.
///
/// Chains epoch labeling, Morlet power (time-averaged), condition/ROI
/// selection and both classification sweeps; see the crate docs for the
/// stage diagram. The caller's RNG drives only the shuffled-label null —
/// everything else is deterministic given the configuration.
///
/// # Errors
///
/// Propagates the first error of any stage: `Configuration` for mapping or
/// frequency/cycle problems, `Shape` for mismatched arrays, `Classifier`
/// when the selected epochs cannot support stratified cross-validation.
pub fn decode<R: Rng + ?Sized>(
    recording: &Recording,
    cfg: &DecodingConfig,
    rng: &mut R,
) -> Result<DecodingReport> {
    let epochs = epoch_and_label(recording, cfg.epoch_dur, &cfg.event_codes)?;

    let power = tfr_morlet(&epochs.data, epochs.sfreq, &cfg.freqs, &cfg.cycles)?;
    let features = mean_over_axes(power, &[3])?
        .into_dimensionality::<Ix3>()
        .map_err(|e| DecodeError::Shape(format!("time-averaged power is not [E, C, F]: {e}")))?;

    let (features, labels) =
        select_conditions(&features, &epochs.labels, &epochs.ch_names, cfg.stim_pair, &cfg.roi)?;
    let channels: Vec<String> = roi_channel_indices(&epochs.ch_names, &cfg.roi)?
        .into_iter()
        .map(|i| epochs.ch_names[i].clone())
        .collect();

    let by_frequency = decode_over_frequencies(
        &features,
        &labels,
        &cfg.freqs,
        cfg.n_splits,
        &cfg.kernel,
        cfg.cv_seed,
        rng,
    )?;
    let by_channel = decode_over_channels(
        &features,
        &labels,
        &channels,
        cfg.n_splits,
        &cfg.kernel,
        cfg.cv_seed,
        rng,
    )?;

    Ok(DecodingReport { labels, channels, by_frequency, by_channel })
}
