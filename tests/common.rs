/// Shared synthetic-data helpers.
use std::collections::HashMap;
use std::f64::consts::PI;

use bbdecode::{Annotation, Recording};
use ndarray::Array2;

#[allow(unused)]
pub const SFREQ: f64 = 128.0;
/// Sample where the entrainment block starts (epoch 1 boundary).
#[allow(unused)]
pub const ENTRAIN_START: usize = 128;
/// Sample where the control block starts (epoch 13 boundary).
#[allow(unused)]
pub const CONTROL_START: usize = 13 * 128;

/// Two-channel, 26 s recording with a 16 Hz oscillation on Oz whose
/// amplitude is high during the "bb/entrain" block and low afterwards.
///
/// With 1 s epochs the labels come out as: epochs 0–1 baseline (0),
/// epochs 2–13 entrainment (1), epochs 14–25 control (2) — block starts
/// sitting on a window boundary belong to the earlier window, so the
/// amplitude switch lags the annotation by one epoch.
#[allow(unused)]
pub fn entrainment_recording() -> (Recording, HashMap<String, i32>) {
    let n_samples = 26 * 128;
    let amp_hi_end = CONTROL_START + 128;

    let data = Array2::from_shape_fn((2, n_samples), |(c, t)| {
        let time = t as f64 / SFREQ;
        let amp = if c == 0 && t >= ENTRAIN_START && t < amp_hi_end { 5.0 } else { 0.5 };
        // Deterministic jitter so no two epochs are exactly alike.
        let jitter = ((t * 37 + c * 11) % 97) as f64 / 97.0 - 0.5;
        amp * (2.0 * PI * 16.0 * time).sin() + 0.05 * jitter
    });

    let rec = Recording::new(
        data,
        SFREQ,
        vec!["Oz".into(), "Pz".into()],
        vec![
            Annotation::new(ENTRAIN_START, "bb/entrain"),
            Annotation::new(CONTROL_START, "ctrl/rest"),
        ],
    )
    .unwrap();

    let mapping = HashMap::from([
        ("bb/entrain".to_string(), 1),
        ("ctrl/rest".to_string(), 2),
    ]);
    (rec, mapping)
}
