//! Reductions from time-sampled field series to scalar magnitudes.
//!
//! A power-frequency field at a point traces an ellipse: the horizontal and
//! vertical components are sinusoids with independent amplitudes and phases.
//! Three magnitudes of that ellipse matter for exposure assessment:
//!
//! - the per-axis amplitudes,
//! - their quadrature combination (the "product"), which bounds the ellipse,
//! - the true semi-major axis (the "maximum"), reached at some instant.
//!
//! The sampled reductions here work on any [`FieldSeries`]; the phasor
//! helpers recover the same maximum analytically from the fundamental.

use nalgebra::DMatrix;

use crate::math::{phasor, CScalar, Scalar};

use super::FieldSeries;

/// Per-sample scalar magnitudes reduced from one field series.
///
/// Each vector has one entry per lateral sample, in the units of the series
/// it came from (kV/m electric, mG magnetic).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldMagnitudes {
    /// Peak absolute horizontal component over the period.
    pub x_amplitude: Vec<Scalar>,
    /// Peak absolute vertical component over the period.
    pub y_amplitude: Vec<Scalar>,
    /// Quadrature sum of the two axis amplitudes.
    pub product: Vec<Scalar>,
    /// Largest instantaneous resultant over the period.
    pub maximum: Vec<Scalar>,
}

/// Instantaneous resultant magnitude at every time/sample pair.
#[must_use]
pub fn resultant_series(series: &FieldSeries) -> DMatrix<Scalar> {
    series.x.zip_map(&series.y, Scalar::hypot)
}

/// Reduces a field series to its per-sample magnitudes.
#[must_use]
pub fn phasors_to_magnitudes(series: &FieldSeries) -> FieldMagnitudes {
    let z = series.sample_count();
    let resultant = resultant_series(series);

    let mut x_amplitude = Vec::with_capacity(z);
    let mut y_amplitude = Vec::with_capacity(z);
    let mut product = Vec::with_capacity(z);
    let mut maximum = Vec::with_capacity(z);
    for a in 0..z {
        let x_amp = series.x.column(a).amax();
        let y_amp = series.y.column(a).amax();
        x_amplitude.push(x_amp);
        y_amplitude.push(y_amp);
        product.push(x_amp.hypot(y_amp));
        maximum.push(resultant.column(a).max());
    }
    FieldMagnitudes { x_amplitude, y_amplitude, product, maximum }
}

/// Extracts the fundamental phasor of a sampled sinusoid.
///
/// The samples must cover exactly one period with the endpoint duplicated,
/// as the field series produce. The duplicate is dropped so the remaining
/// points are uniform over the period.
///
/// # Panics
///
/// Panics when fewer than two samples are given.
#[must_use]
pub fn fundamental_phasor(samples: &[Scalar]) -> CScalar {
    assert!(
        samples.len() > 1,
        "fundamental phasor needs at least two samples, got {}",
        samples.len()
    );
    let n = samples.len() - 1;
    let step = 2.0 * std::f64::consts::PI / Scalar::from(n as u32);
    let mut sum = CScalar::new(0.0, 0.0);
    for (k, &s) in samples[..n].iter().enumerate() {
        sum += s * phasor(-step * Scalar::from(k as u32));
    }
    sum * 2.0 / Scalar::from(n as u32)
}

/// Semi-major axis of the field ellipse described by two axis phasors.
///
/// For components `x(t) = Re(X e^{jwt})` and `y(t) = Re(Y e^{jwt})` the
/// largest instantaneous resultant is
/// `sqrt((|X|^2 + |Y|^2 + |X^2 + Y^2|) / 2)`; circular polarization
/// collapses the last term to zero, linear polarization doubles it.
#[must_use]
pub fn ellipse_maximum(x: CScalar, y: CScalar) -> Scalar {
    let power = x.norm_sqr() + y.norm_sqr();
    ((power + (x * x + y * y).norm()) / 2.0).sqrt()
}
