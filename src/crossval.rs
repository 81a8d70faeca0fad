//! Stratified cross-validation with SVM classification and ROC-AUC scoring.
//!
//! Mirrors the `StratifiedKFold(shuffle=True)` + `SVC` + `cross_val_score`
//! stack: fold assignment is stratified per class and shuffled with a fixed
//! seed, the classifier is a kernel support-vector machine (`linfa-svm` with
//! Platt-scaled probability outputs) and each held-out fold is scored by
//! area under the ROC curve.
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use linfa::dataset::{Dataset, Pr};
use linfa::prelude::*;
use linfa_svm::Svm;

use crate::error::{DecodeError, Result};

/// Kernel of the support-vector classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SvmKernel {
    Linear,
    /// Gaussian RBF. `eps` is the squared-distance scale
    /// (`k = exp(-‖a-b‖² / eps)`); `None` derives it from the training
    /// features as `n_features × variance`, the usual 'scale' convention.
    Rbf { eps: Option<f64> },
    Polynomial { constant: f64, degree: f64 },
}

impl Default for SvmKernel {
    fn default() -> Self {
        SvmKernel::Rbf { eps: None }
    }
}

/// Stratified k-fold splitter with shuffled, seeded fold assignment.
///
/// Within each class the sample indices are shuffled (one `StdRng` seeded
/// from `seed` serves both classes, so the assignment is reproducible) and
/// dealt round-robin over the folds, keeping the class ratio of every fold
/// within one sample of the overall ratio.
#[derive(Debug, Clone, Copy)]
pub struct StratifiedKFold {
    n_splits: usize,
    seed: u64,
}

impl StratifiedKFold {
    pub fn new(n_splits: usize, seed: u64) -> Result<Self> {
        if n_splits < 2 {
            return Err(DecodeError::Configuration(format!(
                "cross-validation needs at least 2 folds, got {n_splits}"
            )));
        }
        Ok(Self { n_splits, seed })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Test-index sets of the folds, one `Vec` per fold.
    ///
    /// Fails with a classifier error when a class has fewer members than
    /// folds (which also covers label arrays with fewer than two classes).
    pub fn split(&self, labels: &[bool]) -> Result<Vec<Vec<usize>>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut folds = vec![Vec::new(); self.n_splits];

        for class in [false, true] {
            let mut idx: Vec<usize> = labels
                .iter()
                .enumerate()
                .filter(|(_, &l)| l == class)
                .map(|(i, _)| i)
                .collect();
            if idx.len() < self.n_splits {
                return Err(DecodeError::Classifier(format!(
                    "class {class} has {} sample(s), fewer than the {} folds",
                    idx.len(),
                    self.n_splits
                )));
            }
            idx.shuffle(&mut rng);
            for (j, i) in idx.into_iter().enumerate() {
                folds[j % self.n_splits].push(i);
            }
        }
        for fold in folds.iter_mut() {
            fold.sort_unstable();
        }
        Ok(folds)
    }
}

/// Per-fold ROC-AUC of an SVM trained on the remaining folds.
///
/// `x` is the [epochs, features] matrix, `y` the boolean class per epoch and
/// `folds` the test-index sets from [`StratifiedKFold::split`].
pub fn cross_val_auc(
    x: &Array2<f64>,
    y: &[bool],
    folds: &[Vec<usize>],
    kernel: &SvmKernel,
) -> Result<Vec<f64>> {
    if y.len() != x.nrows() {
        return Err(DecodeError::Shape(format!(
            "feature matrix has {} rows but label array has {}",
            x.nrows(),
            y.len()
        )));
    }

    let mut aucs = Vec::with_capacity(folds.len());
    for test_idx in folds {
        let in_test = {
            let mut mask = vec![false; x.nrows()];
            for &i in test_idx {
                mask[i] = true;
            }
            mask
        };
        let train_idx: Vec<usize> = (0..x.nrows()).filter(|&i| !in_test[i]).collect();

        let x_train = x.select(Axis(0), &train_idx);
        let y_train: Array1<bool> = train_idx.iter().map(|&i| y[i]).collect();
        let x_test = x.select(Axis(0), test_idx);
        let y_test: Vec<bool> = test_idx.iter().map(|&i| y[i]).collect();

        let model = fit_svm(x_train, y_train, kernel)?;
        let predicted: Array1<Pr> = model.predict(&x_test);
        let roc = predicted
            .to_vec()
            .as_slice()
            .roc(y_test.as_slice())
            .map_err(|e| DecodeError::Classifier(format!("ROC scoring failed: {e}")))?;
        aucs.push(f64::from(roc.area_under_curve()));
    }
    Ok(aucs)
}

fn fit_svm(x: Array2<f64>, y: Array1<bool>, kernel: &SvmKernel) -> Result<Svm<f64, Pr>> {
    let params = Svm::<f64, Pr>::params().pos_neg_weights(1.0, 1.0);
    let params = match kernel {
        SvmKernel::Linear => params.linear_kernel(),
        SvmKernel::Rbf { eps } => params.gaussian_kernel(eps.unwrap_or_else(|| scale_eps(&x))),
        SvmKernel::Polynomial { constant, degree } => {
            params.polynomial_kernel(*constant, *degree)
        }
    };
    let train = Dataset::new(x, y);
    params
        .fit(&train)
        .map_err(|e| DecodeError::Classifier(format!("SVM training failed: {e}")))
}

/// 'scale' kernel width: `n_features × Var(X)` over all matrix entries,
/// falling back to 1 for constant features.
fn scale_eps(x: &Array2<f64>) -> f64 {
    let n = x.len() as f64;
    if n == 0.0 {
        return 1.0;
    }
    let mean = x.sum() / n;
    let var = x.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let eps = x.ncols() as f64 * var;
    if eps > 0.0 {
        eps
    } else {
        1.0
    }
}
