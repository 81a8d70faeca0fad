//! Fixed-length epoching and stimulus-window labeling.
//!
//! Splits continuous [C, T] data into non-overlapping windows of
//! `epoch_samples` samples, dropping any trailing incomplete window
//! (matches `mne.make_fixed_length_epochs`), then assigns each epoch the
//! code of the stimulus window containing its start sample.
use std::collections::HashMap;

use ndarray::{s, Array1, Array2, Array3};

use crate::error::{DecodeError, Result};
use crate::events::{markers_from_annotations, stimulus_windows, window_at, StimulusWindow};
use crate::recording::Recording;

/// Label of an epoch whose start sample falls outside every stimulus window.
/// Such epochs are kept; the condition selector drops them naturally.
pub const UNLABELED_CODE: i32 = -1;

/// Fixed-length epochs with one stimulus code per epoch.
#[derive(Debug, Clone)]
pub struct LabeledEpochs {
    /// Epoch data, shape [E, C, L].
    pub data: Array3<f64>,
    /// One code per epoch, aligned with axis 0 of `data`.
    pub labels: Array1<i32>,
    /// Channel names, aligned with axis 1 of `data`.
    pub ch_names: Vec<String>,
    /// Sampling rate of the source recording in Hz.
    pub sfreq: f64,
}

impl LabeledEpochs {
    pub fn n_epochs(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn n_channels(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn epoch_samples(&self) -> usize {
        self.data.shape()[2]
    }
}

/// Epoch `data` ([C, T]) into a 3-D array [E, C, epoch_samples].
/// Trailing samples that don't fill a complete epoch are discarded.
pub fn epoch_fixed_length(data: &Array2<f64>, epoch_samples: usize) -> Result<Array3<f64>> {
    if epoch_samples == 0 {
        return Err(DecodeError::Configuration("epoch length must be at least one sample".into()));
    }
    let (n_ch, n_t) = data.dim();
    let n_epochs = n_t / epoch_samples;

    let mut out = Array3::<f64>::zeros((n_epochs, n_ch, epoch_samples));
    for e in 0..n_epochs {
        let start = e * epoch_samples;
        out.slice_mut(s![e, .., ..])
            .assign(&data.slice(s![.., start..start + epoch_samples]));
    }
    Ok(out)
}

/// Assign each of `n_epochs` consecutive epochs the code of the first
/// stimulus window containing its start sample (`e * epoch_samples`).
/// Epochs outside every window get [`UNLABELED_CODE`].
pub fn label_epochs(
    windows: &[StimulusWindow],
    n_epochs: usize,
    epoch_samples: usize,
) -> Array1<i32> {
    (0..n_epochs)
        .map(|e| match window_at(windows, e * epoch_samples) {
            Some(i) => windows[i].code,
            None => UNLABELED_CODE,
        })
        .collect()
}

/// Divide a recording into equal epochs and label them from its annotations.
///
/// `epoch_dur` is in seconds; the epoch length in samples is
/// `floor(epoch_dur × sfreq)`.
pub fn epoch_and_label(
    recording: &Recording,
    epoch_dur: f64,
    mapping: &HashMap<String, i32>,
) -> Result<LabeledEpochs> {
    let epoch_samples = (epoch_dur * recording.sfreq) as usize;
    if epoch_samples == 0 {
        return Err(DecodeError::Configuration(format!(
            "epoch duration {epoch_dur} s is shorter than one sample at {} Hz",
            recording.sfreq
        )));
    }
    if epoch_samples > recording.n_samples() {
        return Err(DecodeError::Configuration(format!(
            "epoch duration {epoch_dur} s exceeds the {}-sample recording",
            recording.n_samples()
        )));
    }

    let markers = markers_from_annotations(recording, mapping)?;
    let windows = stimulus_windows(&markers, recording.last_sample())?;

    let data = epoch_fixed_length(&recording.data, epoch_samples)?;
    let labels = label_epochs(&windows, data.shape()[0], epoch_samples);

    Ok(LabeledEpochs {
        data,
        labels,
        ch_names: recording.ch_names.clone(),
        sfreq: recording.sfreq,
    })
}
