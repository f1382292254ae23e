//! Baseline physical constants, unit conversions, and sampling conventions.
//!
//! ## Accuracy
//!
//! Conversion factors for the international foot and inch are exact by
//! definition. Measured constants (ε₀, μ₀) are provided with 11-12
//! significant figures, suitable for engineering applications. Values are
//! approximations; for higher precision or latest values, consult NIST
//! directly.
//!
//! ## References
//!
//! Physical constants are based on CODATA recommended values:
//! - NIST Reference on Constants, Units, and Uncertainty: <https://physics.nist.gov/cuu/Constants/>
//! - CODATA 2018 values published May 20, 2019 (following 2019 SI redefinition)
//! - Mohr, P. J., Newell, D. B., Taylor, B. N., & Tiesinga, E. (2019). CODATA Recommended Values of the Fundamental Physical Constants: 2018.
//! - Note: Latest CODATA 2022 values differ in final digits for ε₀ and μ₀

use std::f64::consts::PI;

/// Vacuum permittivity ε₀ in farads per meter (F/m).
/// Approximate value: 8.8541878128 × 10⁻¹² F/m (11 significant figures).
/// Note: CODATA 2022 value is 8.8541878188 × 10⁻¹² F/m with relative uncertainty ~10⁻¹⁰.
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12;
/// Vacuum permeability μ₀ in henries per meter (H/m).
/// Approximate value: 1.25663706212 × 10⁻⁶ H/m (12 significant figures).
/// Note: CODATA 2022 value is 1.25663706127 × 10⁻⁶ H/m with relative uncertainty ~10⁻¹⁰.
pub const VACUUM_PERMEABILITY: f64 = 1.256_637_062_12e-6;
/// One international foot in meters. Exact by definition (1959).
pub const FEET_TO_METERS: f64 = 0.3048;
/// One international inch in meters. Exact by definition (1959).
pub const INCHES_TO_METERS: f64 = 0.0254;
/// Conversion from tesla to milligauss: 1 T = 10⁴ G = 10⁷ mG.
pub const TESLA_TO_MILLIGAUSS: f64 = 1.0e7;
/// Number of time instants sampled over one electrical period, both period
/// endpoints included.
pub const TIME_SAMPLES_PER_PERIOD: usize = 1001;

/// Returns the angular frequency corresponding to a linear frequency `hz`.
#[inline]
#[must_use]
pub fn angular_frequency(hz: f64) -> f64 {
    2.0 * PI * hz
}
