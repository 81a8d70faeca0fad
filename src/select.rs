//! Condition and region-of-interest selection.
//!
//! Restricts a feature tensor and its label array to the two stimulus codes
//! under comparison and to a channel subset, keeping the two outputs
//! index-aligned along the epoch axis.
use ndarray::{Array, Array1, Axis, Dimension, RemoveAxis};

use crate::error::{DecodeError, Result};

/// Indices into `ch_names` of the channels belonging to `roi`, in their
/// original relative order. An empty `roi` selects every channel; ROI names
/// absent from `ch_names` are ignored, but an ROI matching nothing at all is
/// a configuration error.
pub fn roi_channel_indices(ch_names: &[String], roi: &[String]) -> Result<Vec<usize>> {
    if roi.is_empty() {
        return Ok((0..ch_names.len()).collect());
    }
    let idx: Vec<usize> = ch_names
        .iter()
        .enumerate()
        .filter(|(_, name)| roi.contains(name))
        .map(|(i, _)| i)
        .collect();
    if idx.is_empty() {
        return Err(DecodeError::Configuration(format!(
            "no ROI channel out of {roi:?} is present in the recording"
        )));
    }
    Ok(idx)
}

/// Keep only the epochs labeled `stim1` or `stim2` and the ROI channels.
///
/// The epoch mask is applied first (axis 0 of `features` and the label
/// array), then the channel mask (axis 1). Works on any feature tensor with
/// epochs on axis 0 and channels on axis 1 — [E, C, F], [E, C, F, T], or the
/// raw [E, C, L] epochs themselves.
pub fn select_conditions<D>(
    features: &Array<f64, D>,
    labels: &Array1<i32>,
    ch_names: &[String],
    stims: (i32, i32),
    roi: &[String],
) -> Result<(Array<f64, D>, Array1<i32>)>
where
    D: Dimension + RemoveAxis,
{
    if features.ndim() < 2 {
        return Err(DecodeError::Shape(format!(
            "feature tensor needs epoch and channel axes, got {} axis/axes",
            features.ndim()
        )));
    }
    let shape = features.shape();
    if shape[0] != labels.len() {
        return Err(DecodeError::Shape(format!(
            "feature tensor has {} epochs but label array has {}",
            shape[0],
            labels.len()
        )));
    }
    if shape[1] != ch_names.len() {
        return Err(DecodeError::Shape(format!(
            "feature tensor has {} channels but {} channel names were given",
            shape[1],
            ch_names.len()
        )));
    }

    let (stim1, stim2) = stims;
    let epoch_idx: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, &l)| l == stim1 || l == stim2)
        .map(|(i, _)| i)
        .collect();
    let chan_idx = roi_channel_indices(ch_names, roi)?;

    let selected = features
        .select(Axis(0), &epoch_idx)
        .select(Axis(1), &chan_idx);
    let selected_labels = labels.select(Axis(0), &epoch_idx);

    Ok((selected, selected_labels))
}
