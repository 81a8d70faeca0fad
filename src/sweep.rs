//! Frequency-wise and channel-wise decoding sweeps.
//!
//! Both sweeps share one routine: walk a tensor axis, flatten every other
//! non-epoch axis into the feature columns, and cross-validate an SVM at
//! each step — once with the true labels and once with a shuffled copy as
//! the chance-level null. The label shuffle draws from the caller's RNG, so
//! a seeded generator makes the null reproducible; fold assignment is always
//! seeded by `cv_seed` and identical across steps.
use ndarray::{Array, Array1, Axis, Dimension, RemoveAxis};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::crossval::{cross_val_auc, StratifiedKFold, SvmKernel};
use crate::error::{DecodeError, Result};

/// Decoding accuracies from one sweep: a real and a shuffled-label ROC-AUC
/// per swept index (frequency bin or channel).
#[derive(Debug, Clone)]
pub struct SweepScores {
    pub scores: Array1<f64>,
    pub null_scores: Array1<f64>,
}

impl SweepScores {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Classify at each frequency, using channels (× any remaining axis) as
/// features.
///
/// `features` is [E, C, F] or [E, C, F, T]; `freqs` must match the length of
/// axis 2 and only fixes the expected output length.
pub fn decode_over_frequencies<D, R>(
    features: &Array<f64, D>,
    labels: &Array1<i32>,
    freqs: &[f64],
    n_splits: usize,
    kernel: &SvmKernel,
    cv_seed: u64,
    rng: &mut R,
) -> Result<SweepScores>
where
    D: Dimension + RemoveAxis,
    R: Rng + ?Sized,
{
    check_tensor_layout(features)?;
    if features.shape()[2] != freqs.len() {
        return Err(DecodeError::Shape(format!(
            "feature tensor has {} frequency bins but the frequency list has {}",
            features.shape()[2],
            freqs.len()
        )));
    }
    sweep_axis(features, labels, Axis(2), n_splits, kernel, cv_seed, rng)
}

/// Classify at each channel, using frequencies (× any remaining axis) as
/// features.
///
/// `features` is [E, C, F] or [E, C, F, T]; `ch_names` must match the length
/// of axis 1.
pub fn decode_over_channels<D, R>(
    features: &Array<f64, D>,
    labels: &Array1<i32>,
    ch_names: &[String],
    n_splits: usize,
    kernel: &SvmKernel,
    cv_seed: u64,
    rng: &mut R,
) -> Result<SweepScores>
where
    D: Dimension + RemoveAxis,
    R: Rng + ?Sized,
{
    check_tensor_layout(features)?;
    if features.shape()[1] != ch_names.len() {
        return Err(DecodeError::Shape(format!(
            "feature tensor has {} channels but the channel list has {}",
            features.shape()[1],
            ch_names.len()
        )));
    }
    sweep_axis(features, labels, Axis(1), n_splits, kernel, cv_seed, rng)
}

fn check_tensor_layout<D: Dimension>(features: &Array<f64, D>) -> Result<()> {
    if features.ndim() != 3 && features.ndim() != 4 {
        return Err(DecodeError::Shape(format!(
            "sweeps expect an [epoch, channel, frequency] or \
             [epoch, channel, frequency, time] tensor, got {} axes",
            features.ndim()
        )));
    }
    Ok(())
}

/// Sweep over `axis`, flattening all other non-epoch axes into the feature
/// columns of each step's classification problem.
fn sweep_axis<D, R>(
    features: &Array<f64, D>,
    labels: &Array1<i32>,
    axis: Axis,
    n_splits: usize,
    kernel: &SvmKernel,
    cv_seed: u64,
    rng: &mut R,
) -> Result<SweepScores>
where
    D: Dimension + RemoveAxis,
    R: Rng + ?Sized,
{
    let n_epochs = features.shape()[0];
    if labels.len() != n_epochs {
        return Err(DecodeError::Shape(format!(
            "feature tensor has {n_epochs} epochs but label array has {}",
            labels.len()
        )));
    }

    let mut codes: Vec<i32> = labels.iter().copied().collect();
    codes.sort_unstable();
    codes.dedup();
    if codes.len() != 2 {
        return Err(DecodeError::Classifier(format!(
            "decoding requires exactly two stimulus codes, found {codes:?}"
        )));
    }
    // The greater stimulus code is the positive class for the ROC.
    let positive = codes[1];
    let y: Vec<bool> = labels.iter().map(|&l| l == positive).collect();

    let kfold = StratifiedKFold::new(n_splits, cv_seed)?;
    let n_steps = features.shape()[axis.0];
    debug!(axis = axis.0, n_steps, n_epochs, "running decoding sweep");

    let mut scores = Array1::<f64>::zeros(n_steps);
    let mut null_scores = Array1::<f64>::zeros(n_steps);

    for step in 0..n_steps {
        let slab = features.index_axis(axis, step);
        let n_features = slab.len() / n_epochs;
        let x = slab
            .to_owned()
            .into_shape((n_epochs, n_features))
            .map_err(|e| DecodeError::Shape(format!("cannot flatten sweep step {step}: {e}")))?;

        // Fresh shuffled copy per step; the splitter re-stratifies on it just
        // as it does on the true labels.
        let mut y_null = y.clone();
        y_null.shuffle(rng);

        let folds = kfold.split(&y)?;
        let fold_aucs = cross_val_auc(&x, &y, &folds, kernel)?;
        scores[step] = mean(&fold_aucs);

        let folds_null = kfold.split(&y_null)?;
        let fold_aucs_null = cross_val_auc(&x, &y_null, &folds_null, kernel)?;
        null_scores[step] = mean(&fold_aucs_null);
    }

    Ok(SweepScores { scores, null_scores })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
