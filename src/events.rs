//! Event markers and stimulus windows.
//!
//! Matches the `mne.events_from_annotations` + time-range bookkeeping used by
//! the binaural-beat paradigm: each annotated onset becomes an
//! (sample, code) marker, and consecutive markers bound a closed stimulus
//! window labeled with the earlier marker's code. A synthetic baseline
//! marker at sample 0 and an end sentinel at the final sample bound the
//! sequence, so the windows partition [0, last_sample] with no gaps.
use std::collections::HashMap;

use crate::error::{DecodeError, Result};
use crate::recording::Recording;

/// Code of the synthetic pre/post-stimulus baseline marker.
pub const BASELINE_CODE: i32 = 0;
/// Code of the synthetic end-of-recording sentinel. It terminates the last
/// real window and never labels a window of its own.
pub const END_CODE: i32 = 12;

/// (sample, code) pair extracted from an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMarker {
    pub sample: usize,
    pub code: i32,
}

/// Closed interval [start, end] during which one stimulus code was presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StimulusWindow {
    pub start: usize,
    pub end: usize,
    pub code: i32,
}

impl StimulusWindow {
    pub fn contains(&self, sample: usize) -> bool {
        self.start <= sample && sample <= self.end
    }
}

/// Resolve annotations to (sample, code) markers through `mapping`.
///
/// The mapping is strict: an annotation whose description has no entry, or
/// whose onset lies beyond the final sample, is a configuration error.
/// Markers are returned sorted by onset.
pub fn markers_from_annotations(
    recording: &Recording,
    mapping: &HashMap<String, i32>,
) -> Result<Vec<EventMarker>> {
    let mut markers = Vec::with_capacity(recording.annotations.len());
    for ann in &recording.annotations {
        let code = mapping.get(&ann.description).ok_or_else(|| {
            DecodeError::Configuration(format!(
                "annotation {:?} at sample {} has no event code in the mapping",
                ann.description, ann.onset_sample
            ))
        })?;
        if ann.onset_sample > recording.last_sample() {
            return Err(DecodeError::Configuration(format!(
                "annotation {:?} onset {} lies beyond the final sample {}",
                ann.description,
                ann.onset_sample,
                recording.last_sample()
            )));
        }
        markers.push(EventMarker { sample: ann.onset_sample, code: *code });
    }
    markers.sort_by_key(|m| m.sample);
    Ok(markers)
}

/// Build the stimulus windows for a marker sequence.
///
/// A synthetic `(0, BASELINE_CODE)` marker is prepended and a synthetic
/// `(last_sample, END_CODE)` sentinel appended; window i then spans
/// `[sample_i, sample_{i+1}]` and carries marker i's code. Consecutive
/// window boundaries touch, so the result partitions `[0, last_sample]`.
pub fn stimulus_windows(
    markers: &[EventMarker],
    last_sample: usize,
) -> Result<Vec<StimulusWindow>> {
    if let Some(m) = markers.iter().find(|m| m.sample > last_sample) {
        return Err(DecodeError::Configuration(format!(
            "marker (sample {}, code {}) lies beyond the final sample {last_sample}",
            m.sample, m.code
        )));
    }
    if markers.windows(2).any(|p| p[0].sample > p[1].sample) {
        return Err(DecodeError::Configuration(
            "event markers must be sorted by onset".into(),
        ));
    }

    let mut bounded = Vec::with_capacity(markers.len() + 2);
    bounded.push(EventMarker { sample: 0, code: BASELINE_CODE });
    bounded.extend_from_slice(markers);
    bounded.push(EventMarker { sample: last_sample, code: END_CODE });

    Ok(bounded
        .windows(2)
        .map(|pair| StimulusWindow {
            start: pair[0].sample,
            end: pair[1].sample,
            code: pair[0].code,
        })
        .collect())
}

/// Index of the first window (in time order) whose closed interval contains
/// `sample`, or `None` if the sample falls outside every window.
///
/// Windows touch at their boundaries, so this is a binary search for the
/// first window ending at or after `sample`; a sample sitting exactly on a
/// shared boundary belongs to the earlier window.
pub fn window_at(windows: &[StimulusWindow], sample: usize) -> Option<usize> {
    let i = windows.partition_point(|w| w.end < sample);
    (i < windows.len() && windows[i].start <= sample).then_some(i)
}
