mod common;

use std::collections::HashMap;

use bbdecode::{
    epoch_and_label, label_epochs, stimulus_windows, Annotation, DecodeError, EventMarker,
    Recording, BASELINE_CODE, UNLABELED_CODE,
};
use ndarray::Array2;

fn scenario_recording() -> (Recording, HashMap<String, i32>) {
    // 3000 samples at 500 Hz with markers (0, 1), (1000, 2), (2000, 0).
    let rec = Recording::new(
        Array2::from_shape_fn((1, 3000), |(_, t)| (t as f64 * 0.01).sin()),
        500.0,
        vec!["Cz".into()],
        vec![
            Annotation::new(0, "stim/one"),
            Annotation::new(1000, "stim/two"),
            Annotation::new(2000, "baseline"),
        ],
    )
    .unwrap();
    let mapping = HashMap::from([
        ("stim/one".to_string(), 1),
        ("stim/two".to_string(), 2),
        ("baseline".to_string(), 0),
    ]);
    (rec, mapping)
}

#[test]
fn scenario_labels_follow_stimulus_windows() {
    let (rec, mapping) = scenario_recording();
    let epochs = epoch_and_label(&rec, 1.0, &mapping).unwrap();

    assert_eq!(epochs.n_epochs(), 6);
    assert_eq!(epochs.epoch_samples(), 500);
    // Epoch starting at 500 → code 1; epoch starting at 2500 → code 0.
    // Starts on shared boundaries (1000, 2000) belong to the earlier window,
    // and the synthetic zero-width baseline window claims sample 0.
    assert_eq!(epochs.labels.to_vec(), vec![BASELINE_CODE, 1, 1, 2, 2, 0]);
}

#[test]
fn epoch_data_is_aligned_with_the_recording() {
    let (rec, mapping) = scenario_recording();
    let epochs = epoch_and_label(&rec, 1.0, &mapping).unwrap();
    for e in 0..epochs.n_epochs() {
        for t in 0..10 {
            assert_eq!(epochs.data[[e, 0, t]], rec.data[[0, e * 500 + t]]);
        }
    }
}

#[test]
fn block_recording_labels_and_counts() {
    let (rec, mapping) = common::entrainment_recording();
    let epochs = epoch_and_label(&rec, 1.0, &mapping).unwrap();

    assert_eq!(epochs.n_epochs(), 26);
    let count = |code: i32| epochs.labels.iter().filter(|&&l| l == code).count();
    assert_eq!(count(BASELINE_CODE), 2);
    assert_eq!(count(1), 12);
    assert_eq!(count(2), 12);
}

#[test]
fn unknown_annotation_is_a_configuration_error() {
    let (rec, mut mapping) = scenario_recording();
    mapping.remove("stim/two");
    let err = epoch_and_label(&rec, 1.0, &mapping).unwrap_err();
    assert!(matches!(err, DecodeError::Configuration(_)));
}

#[test]
fn epochs_outside_all_windows_keep_the_sentinel_label() {
    // Windows only cover [0, 999]; the epoch starting at 1000 matches none.
    let markers = [EventMarker { sample: 300, code: 3 }];
    let windows = stimulus_windows(&markers, 999).unwrap();
    let labels = label_epochs(&windows, 3, 500);
    assert_eq!(labels.to_vec(), vec![BASELINE_CODE, 3, UNLABELED_CODE]);
}

#[test]
fn trailing_remainder_is_dropped() {
    let (rec, mapping) = scenario_recording();
    // 0.8 s epochs → 400 samples → floor(3000/400) = 7 epochs.
    let epochs = epoch_and_label(&rec, 0.8, &mapping).unwrap();
    assert_eq!(epochs.n_epochs(), 7);
}
