//! Morlet wavelet time-frequency power.
//!
//! Matches `mne.time_frequency.tfr_array_morlet(..., zero_mean=False,
//! use_fft=True, decim=1, output='power')`: each epoch/channel series is
//! FFT-convolved with a bank of complex Morlet wavelets and the squared
//! magnitude is kept. No decimation, no baseline handling.
//!
//! The convolution fans out across epochs on the rayon pool; outputs are
//! written into disjoint epoch slices, so thread count never changes the
//! result and repeat calls are bit-identical.
use std::f64::consts::PI;

use ndarray::{Array3, Array4, ArrayD, Axis, Zip};
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DecodeError, Result};

/// Number of wavelet cycles: one value for every frequency, or one per
/// frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WaveletCycles {
    Fixed(f64),
    PerFrequency(Vec<f64>),
}

impl WaveletCycles {
    /// Expand to one cycle count per frequency.
    pub fn resolve(&self, n_freqs: usize) -> Result<Vec<f64>> {
        let cycles = match self {
            WaveletCycles::Fixed(c) => vec![*c; n_freqs],
            WaveletCycles::PerFrequency(per) => {
                if per.len() != n_freqs {
                    return Err(DecodeError::Configuration(format!(
                        "{} cycle counts given for {n_freqs} frequencies",
                        per.len()
                    )));
                }
                per.clone()
            }
        };
        if let Some(c) = cycles.iter().find(|&&c| !(c > 0.0)) {
            return Err(DecodeError::Configuration(format!(
                "wavelet cycle count must be positive, got {c}"
            )));
        }
        Ok(cycles)
    }
}

/// Complex Morlet wavelet at `freq` Hz, sampled at `sfreq`.
///
/// Construction matches `mne.time_frequency.morlet` with `zero_mean=False`:
/// `sigma_t = n_cycles / (2π·freq)`, support out to `±5·sigma_t`, Gaussian
/// envelope times a complex oscillation, normalised by `sqrt(0.5)·‖W‖₂`.
/// The returned length is always odd; the peak sits at the midpoint.
pub fn morlet_wavelet(sfreq: f64, freq: f64, n_cycles: f64) -> Vec<Complex<f64>> {
    let sigma_t = n_cycles / (2.0 * PI * freq);
    let dt = 1.0 / sfreq;
    let half_n = ((5.0 * sigma_t) / dt).ceil().max(1.0) as usize;

    // t = [-(half_n-1)·dt, …, -dt, 0, dt, …, (half_n-1)·dt]
    let mut wavelet = Vec::with_capacity(2 * half_n - 1);
    for i in 0..(2 * half_n - 1) {
        let t = (i as f64 - (half_n - 1) as f64) * dt;
        let oscillation = Complex::from_polar(1.0, 2.0 * PI * freq * t);
        let envelope = (-(t * t) / (2.0 * sigma_t * sigma_t)).exp();
        wavelet.push(oscillation * envelope);
    }

    let norm: f64 = wavelet.iter().map(|w| w.norm_sqr()).sum::<f64>().sqrt();
    let scale = 1.0 / (0.5_f64.sqrt() * norm);
    for w in wavelet.iter_mut() {
        *w *= scale;
    }
    wavelet
}

/// Per-epoch, per-channel, per-frequency Morlet power over the full epoch.
///
/// `epochs` is [E, C, T]; the result is [E, C, F, T] of spectral power.
///
/// Fails with a configuration error on an empty or non-positive frequency
/// list, a cycle list of the wrong length, or a wavelet longer than the
/// epoch (lower the cycle count or lengthen the epochs).
pub fn tfr_morlet(
    epochs: &Array3<f64>,
    sfreq: f64,
    freqs: &[f64],
    cycles: &WaveletCycles,
) -> Result<Array4<f64>> {
    let (n_epochs, n_ch, n_times) = epochs.dim();
    if freqs.is_empty() {
        return Err(DecodeError::Configuration("frequency list is empty".into()));
    }
    if let Some(f) = freqs.iter().find(|&&f| !(f > 0.0)) {
        return Err(DecodeError::Configuration(format!(
            "wavelet frequency must be positive, got {f}"
        )));
    }
    for &f in freqs.iter().filter(|&&f| f >= sfreq / 2.0) {
        warn!(freq = f, sfreq, "frequency at or above Nyquist");
    }
    let n_cycles = cycles.resolve(freqs.len())?;

    let wavelets: Vec<Vec<Complex<f64>>> = freqs
        .iter()
        .zip(&n_cycles)
        .map(|(&f, &c)| morlet_wavelet(sfreq, f, c))
        .collect();
    let max_len = wavelets.iter().map(Vec::len).max().unwrap_or(0);
    if max_len > n_times {
        return Err(DecodeError::Configuration(format!(
            "longest wavelet ({max_len} samples) exceeds the {n_times}-sample epoch; \
             fewer cycles or longer epochs needed"
        )));
    }

    // One FFT length serves every wavelet; linear convolution needs
    // n_times + max_len - 1 points.
    let n_fft = (n_times + max_len - 1).next_power_of_two();
    debug!(n_epochs, n_ch, n_freqs = freqs.len(), n_times, n_fft, "computing Morlet power");

    let mut planner: FftPlanner<f64> = FftPlanner::new();
    let fft_fwd = planner.plan_fft_forward(n_fft);
    let fft_inv = planner.plan_fft_inverse(n_fft);

    // Wavelet spectra, zero-padded to n_fft.
    let wavelet_ffts: Vec<Vec<Complex<f64>>> = wavelets
        .iter()
        .map(|w| {
            let mut buf: Vec<Complex<f64>> = w
                .iter()
                .copied()
                .chain(std::iter::repeat(Complex::default()))
                .take(n_fft)
                .collect();
            fft_fwd.process(&mut buf);
            buf
        })
        .collect();

    let inv_scale = 1.0 / n_fft as f64;
    let mut power = Array4::<f64>::zeros((n_epochs, n_ch, freqs.len(), n_times));

    Zip::from(power.axis_iter_mut(Axis(0)))
        .and(epochs.axis_iter(Axis(0)))
        .par_for_each(|mut power_e, epoch| {
            let mut spectrum = vec![Complex::default(); n_fft];
            let mut buf = vec![Complex::default(); n_fft];
            for c in 0..n_ch {
                for (s, &v) in spectrum.iter_mut().zip(epoch.row(c).iter()) {
                    *s = Complex { re: v, im: 0.0 };
                }
                for s in spectrum.iter_mut().skip(n_times) {
                    *s = Complex::default();
                }
                fft_fwd.process(&mut spectrum);

                for (fi, w_fft) in wavelet_ffts.iter().enumerate() {
                    for ((b, &x), &w) in buf.iter_mut().zip(&spectrum).zip(w_fft) {
                        *b = x * w;
                    }
                    fft_inv.process(&mut buf);

                    // 'same'-mode centering of the linear convolution.
                    let start = (wavelets[fi].len() - 1) / 2;
                    for t in 0..n_times {
                        let v = buf[start + t];
                        power_e[[c, fi, t]] = v.norm_sqr() * inv_scale * inv_scale;
                    }
                }
            }
        });

    Ok(power)
}

/// Collapse the given axes of a power tensor by arithmetic mean.
///
/// Axes index the [E, C, F, T] layout; the usual call averages axis 3 to get
/// the [E, C, F] feature tensor fed to the classification sweeps.
pub fn mean_over_axes(tfr: Array4<f64>, axes: &[usize]) -> Result<ArrayD<f64>> {
    let mut sorted: Vec<usize> = axes.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != axes.len() {
        return Err(DecodeError::Configuration(format!("duplicate averaging axes in {axes:?}")));
    }
    if let Some(&a) = sorted.iter().find(|&&a| a >= 4) {
        return Err(DecodeError::Configuration(format!(
            "averaging axis {a} out of range for an [epoch, channel, frequency, time] tensor"
        )));
    }

    let mut out = tfr.into_dyn();
    for &a in sorted.iter().rev() {
        out = out.mean_axis(Axis(a)).ok_or_else(|| {
            DecodeError::Configuration(format!("cannot average over empty axis {a}"))
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn wavelet_is_odd_length_and_peaks_at_center() {
        let w = morlet_wavelet(256.0, 10.0, 7.0);
        assert_eq!(w.len() % 2, 1);
        let center = w.len() / 2;
        let peak = w.iter().map(|c| c.norm()).fold(0.0_f64, f64::max);
        approx::assert_abs_diff_eq!(w[center].norm(), peak, epsilon = 1e-12);
    }

    #[test]
    fn wavelet_norm_matches_convention() {
        // After dividing by sqrt(0.5)·‖W‖, the ℓ² norm is sqrt(2).
        for freq in [4.0, 10.0, 25.0] {
            let w = morlet_wavelet(256.0, freq, 7.0);
            let norm: f64 = w.iter().map(|c| c.norm_sqr()).sum::<f64>().sqrt();
            approx::assert_abs_diff_eq!(norm, 2.0_f64.sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn sinusoid_power_peaks_at_matching_frequency() {
        let sfreq = 256.0;
        let epochs = Array3::from_shape_fn((1, 1, 512), |(_, _, t)| {
            (2.0 * PI * 10.0 * t as f64 / sfreq).sin()
        });
        let power =
            tfr_morlet(&epochs, sfreq, &[5.0, 10.0, 20.0], &WaveletCycles::Fixed(5.0)).unwrap();

        // Compare mean power over the central half, away from edge effects.
        let center_mean = |fi: usize| -> f64 {
            (128..384).map(|t| power[[0, 0, fi, t]]).sum::<f64>() / 256.0
        };
        assert!(center_mean(1) > 3.0 * center_mean(0));
        assert!(center_mean(1) > 3.0 * center_mean(2));
    }

    #[test]
    fn impulse_response_is_centered() {
        let mut epochs = Array3::zeros((1, 1, 512));
        epochs[[0, 0, 256]] = 1.0;
        let power = tfr_morlet(&epochs, 256.0, &[10.0], &WaveletCycles::Fixed(5.0)).unwrap();

        let (argmax, _) = (0..512)
            .map(|t| (t, power[[0, 0, 0, t]]))
            .fold((0, f64::MIN), |acc, cur| if cur.1 > acc.1 { cur } else { acc });
        assert_eq!(argmax, 256);
    }

    #[test]
    fn output_shape_is_epoch_channel_freq_time() {
        let epochs = Array3::from_elem((3, 2, 512), 0.25_f64);
        let power =
            tfr_morlet(&epochs, 256.0, &[8.0, 12.0, 16.0, 24.0], &WaveletCycles::Fixed(4.0))
                .unwrap();
        assert_eq!(power.shape(), &[3, 2, 4, 512]);
    }

    #[test]
    fn repeat_runs_are_bit_identical() {
        let sfreq = 128.0;
        let epochs = Array3::from_shape_fn((4, 2, 256), |(e, c, t)| {
            (e + 1) as f64 * 0.3 + c as f64 + (t as f64 * 0.21).sin()
        });
        let freqs = [8.0, 13.0, 21.0];
        let a = tfr_morlet(&epochs, sfreq, &freqs, &WaveletCycles::Fixed(3.0)).unwrap();
        let b = tfr_morlet(&epochs, sfreq, &freqs, &WaveletCycles::Fixed(3.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wavelet_longer_than_epoch_is_rejected() {
        let epochs = Array3::from_elem((1, 1, 128), 0.0_f64);
        // 2 Hz with 7 cycles at 128 Hz needs far more than 128 samples.
        let err = tfr_morlet(&epochs, 128.0, &[2.0], &WaveletCycles::Fixed(7.0)).unwrap_err();
        assert!(matches!(err, DecodeError::Configuration(_)));
    }

    #[test]
    fn malformed_frequency_and_cycle_arguments_are_rejected() {
        let epochs = Array3::from_elem((1, 1, 256), 0.0_f64);
        assert!(tfr_morlet(&epochs, 128.0, &[], &WaveletCycles::Fixed(3.0)).is_err());
        assert!(tfr_morlet(&epochs, 128.0, &[0.0], &WaveletCycles::Fixed(3.0)).is_err());
        assert!(tfr_morlet(
            &epochs,
            128.0,
            &[8.0, 16.0],
            &WaveletCycles::PerFrequency(vec![3.0])
        )
        .is_err());
        assert!(tfr_morlet(&epochs, 128.0, &[8.0], &WaveletCycles::Fixed(0.0)).is_err());
    }

    #[test]
    fn mean_over_time_collapses_last_axis() {
        let tfr = Array4::from_shape_fn((2, 3, 4, 5), |(e, c, f, t)| {
            (e * 1000 + c * 100 + f * 10 + t) as f64
        });
        let avg = mean_over_axes(tfr, &[3]).unwrap();
        assert_eq!(avg.shape(), &[2, 3, 4]);
        // Mean over t of (base + t), t in 0..5, is base + 2.
        approx::assert_abs_diff_eq!(avg[[0, 0, 0]], 2.0, epsilon = 1e-12);
        approx::assert_abs_diff_eq!(avg[[1, 2, 3]], 1232.0, epsilon = 1e-12);
    }

    #[test]
    fn mean_over_multiple_axes() {
        let tfr = Array4::from_elem((2, 3, 4, 5), 1.5_f64);
        let avg = mean_over_axes(tfr, &[1, 3]).unwrap();
        assert_eq!(avg.shape(), &[2, 4]);
        approx::assert_abs_diff_eq!(avg[[1, 2]], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn bad_averaging_axes_are_rejected() {
        let tfr = Array4::from_elem((2, 3, 4, 5), 0.0_f64);
        assert!(mean_over_axes(tfr.clone(), &[3, 3]).is_err());
        assert!(mean_over_axes(tfr, &[4]).is_err());
    }
}
