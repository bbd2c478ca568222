//! Spectra of two real sequences from a single complex DFT.
//!
//! With f3 = f1 + i f2, conjugate symmetry of real-input spectra gives
//! F1[k] = (F3[k] + conj(F3[N-k])) / 2 and F2[k] = (F3[k] - conj(F3[N-k])) / 2i,
//! with F1[0] = Re F3[0] and F2[0] = Im F3[0].

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::error::{FidelityError, Result};

/// DFTs of the two real inputs, recovered from one transform.
#[derive(Clone, Debug, PartialEq)]
pub struct SeparatedSpectra {
    pub first: Vec<Complex<f64>>,
    pub second: Vec<Complex<f64>>,
}

pub fn separate_real_spectra(f1: &[f64], f2: &[f64]) -> Result<SeparatedSpectra> {
    if f1.len() != f2.len() {
        return Err(FidelityError::shape_mismatch("signal pair", &[f1.len()], &[f2.len()]));
    }
    let n = f1.len();
    if n == 0 {
        return Err(FidelityError::DegenerateInput { axis: "signal", len: 0, min: 1 });
    }

    let mut f3: Vec<Complex<f64>> = f1
        .iter()
        .zip(f2)
        .map(|(&re, &im)| Complex::new(re, im))
        .collect();
    FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut f3);

    let two_i = Complex::new(0.0, 2.0);
    let mut first = Vec::with_capacity(n);
    let mut second = Vec::with_capacity(n);
    first.push(Complex::new(f3[0].re, 0.0));
    second.push(Complex::new(f3[0].im, 0.0));
    for k in 1..n {
        let mirrored = f3[n - k].conj();
        first.push((f3[k] + mirrored) / 2.0);
        second.push((f3[k] - mirrored) / two_i);
    }

    Ok(SeparatedSpectra { first, second })
}

/// Direct O(N^2) DFT of a real sequence, X[k] = sum x[n] e^{-2 pi i k n / N}.
pub fn dft_real(signal: &[f64]) -> Vec<Complex<f64>> {
    let n = signal.len();
    (0..n)
        .map(|k| {
            signal
                .iter()
                .enumerate()
                .map(|(t, &x)| {
                    let angle = -2.0 * std::f64::consts::PI * (k * t) as f64 / n as f64;
                    Complex::from_polar(x, angle)
                })
                .sum()
        })
        .collect()
}
