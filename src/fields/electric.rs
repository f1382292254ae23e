//! Charge-simulation electric field above a conducting ground plane.
//!
//! Each conductor is an infinite horizontal line carrying an unknown charge,
//! mirrored by an image charge below the ground plane. The conductor surface
//! potentials determine the charges through the potential-coefficient
//! matrix; the ground-level field follows by superposing every charge/image
//! pair. One factorization serves all time instants of a geometry, since
//! only the voltage vector changes between solves.
//!
//! # References
//!
//! - EPRI (2005). "AC Transmission Line Reference Book: 200 kV and Above"
//!   (3rd ed), Chapter 7.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector};

use crate::constants::{
    angular_frequency, FEET_TO_METERS, INCHES_TO_METERS, TIME_SAMPLES_PER_PERIOD,
    VACUUM_PERMITTIVITY,
};
use crate::errors::Result;
use crate::geometry::{ConductorSet, SamplePoints};
use crate::linalg::CroutFactors;
use crate::math::{linspace, Scalar};

use super::FieldSeries;

/// Conductor geometry converted to meters, plus effective bundle diameters.
struct SiGeometry {
    x: Vec<Scalar>,
    y: Vec<Scalar>,
    effective_diameter: Vec<Scalar>,
}

impl SiGeometry {
    fn from_set(set: &ConductorSet) -> Self {
        let x = set.x().iter().map(|v| v * FEET_TO_METERS).collect();
        let y = set.y().iter().map(|v| v * FEET_TO_METERS).collect();
        let effective_diameter = (0..set.len())
            .map(|i| {
                effective_diameter(
                    set.subconductors()[i],
                    set.conductor_diameter()[i],
                    set.bundle_diameter()[i],
                ) * INCHES_TO_METERS
            })
            .collect();
        Self { x, y, effective_diameter }
    }
}

/// Effective single-line diameter of a symmetric bundle, in the units of
/// its inputs. A single subconductor degenerates to its own diameter.
fn effective_diameter(
    subconductors: u32,
    conductor_diameter: Scalar,
    bundle_diameter: Scalar,
) -> Scalar {
    let n = Scalar::from(subconductors);
    bundle_diameter * (n * conductor_diameter / bundle_diameter).powf(1.0 / n)
}

fn potential_matrix(geometry: &SiGeometry) -> DMatrix<Scalar> {
    let coefficient = 1.0 / (2.0 * PI * VACUUM_PERMITTIVITY);
    let n = geometry.x.len();
    let mut p = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in 0..n {
            if i == j {
                p[(i, j)] = coefficient
                    * (4.0 * geometry.y[i] / geometry.effective_diameter[i]).ln();
            } else {
                let dx = geometry.x[i] - geometry.x[j];
                let image = dx * dx + (geometry.y[i] + geometry.y[j]).powi(2);
                let direct = dx * dx + (geometry.y[i] - geometry.y[j]).powi(2);
                p[(i, j)] = coefficient * (image / direct).sqrt().ln();
            }
        }
    }
    p
}

/// Assembles the potential-coefficient matrix of a conductor set.
///
/// Diagonal entries carry the self term `ln(4 y / d_eff)`, off-diagonal
/// entries the image-charge mutual term `ln(sqrt(n/d))` with `n` and `d`
/// the squared distances to the image and to the conductor. All entries are
/// scaled by `1 / (2 pi eps0)`.
#[must_use]
pub fn potential_coefficients(set: &ConductorSet) -> DMatrix<Scalar> {
    potential_matrix(&SiGeometry::from_set(set))
}

/// Computes the time-sampled electric field at `samples`, in kV/m.
///
/// Voltages enter line-to-line and are scaled to line-to-ground amplitudes;
/// grounded conductors participate with zero voltage and acquire induced
/// charge. The series spans exactly one electrical period.
///
/// # Errors
///
/// Returns [`crate::errors::LineEmfError::SingularSystem`] when the
/// potential-coefficient matrix cannot be factored, which is how degenerate
/// geometry (a conductor at zero height, coincident conductors after a
/// raise) surfaces.
pub fn electric_field(set: &ConductorSet, samples: &SamplePoints) -> Result<FieldSeries> {
    let n = set.len();
    let z = samples.len();
    let coefficient = 1.0 / (2.0 * PI * VACUUM_PERMITTIVITY);

    let geometry = SiGeometry::from_set(set);
    let factors = CroutFactors::factorize(&potential_matrix(&geometry))?;

    // Line-to-ground amplitudes (kV) and phase angles (rad).
    let sqrt3 = 3.0_f64.sqrt();
    let voltage: Vec<Scalar> = set.voltage().iter().map(|v| v / sqrt3).collect();
    let phase: Vec<Scalar> = set.phase().iter().map(|p| p.to_radians()).collect();
    let omega = angular_frequency(set.frequency());
    let times = linspace(0.0, 1.0 / set.frequency(), TIME_SAMPLES_PER_PERIOD);

    let sx: Vec<Scalar> = samples.x().iter().map(|v| v * FEET_TO_METERS).collect();
    let sy: Vec<Scalar> = samples.y().iter().map(|v| v * FEET_TO_METERS).collect();

    let mut ex = DMatrix::zeros(times.len(), z);
    let mut ey = DMatrix::zeros(times.len(), z);
    let mut rhs = DVector::zeros(n);
    for (t_index, &t) in times.iter().enumerate() {
        for c in 0..n {
            rhs[c] = voltage[c] * (omega * t + phase[c]).cos();
        }
        let charge = factors.solve(&rhs);
        for a in 0..z {
            let mut ex_a = 0.0;
            let mut ey_a = 0.0;
            for c in 0..n {
                let dx = sx[a] - geometry.x[c];
                let dy_direct = sy[a] - geometry.y[c];
                let dy_image = sy[a] + geometry.y[c];
                let d_direct = dx * dx + dy_direct * dy_direct;
                let d_image = dx * dx + dy_image * dy_image;
                ex_a += coefficient * charge[c] * dx * (1.0 / d_direct - 1.0 / d_image);
                ey_a += coefficient * charge[c] * (dy_direct / d_direct - dy_image / d_image);
            }
            ex[(t_index, a)] = ex_a;
            ey[(t_index, a)] = ey_a;
        }
    }
    Ok(FieldSeries { x: ex, y: ey })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::geometry::Conductor;

    use super::*;

    fn set_with_voltages(voltage: Scalar) -> ConductorSet {
        let hot = vec![
            Conductor {
                tag: "a".into(),
                frequency: 60.0,
                x: -10.0,
                y: 30.0,
                subconductors: 1,
                conductor_diameter: 1.1,
                bundle_diameter: 1.1,
                voltage,
                current: 0.0,
                phase: 0.0,
            },
            Conductor {
                tag: "b".into(),
                frequency: 60.0,
                x: 10.0,
                y: 30.0,
                subconductors: 1,
                conductor_diameter: 1.1,
                bundle_diameter: 1.1,
                voltage,
                current: 0.0,
                phase: 180.0,
            },
        ];
        ConductorSet::new(hot, Vec::new()).unwrap()
    }

    #[test]
    fn single_subconductor_keeps_its_diameter() {
        assert_relative_eq!(effective_diameter(1, 1.1, 1.1), 1.1, epsilon = 1.0e-12);
    }

    #[test]
    fn two_bundle_effective_diameter_matches_hand_value() {
        // 18 in * sqrt(2 * 1 / 18) = 6 in.
        assert_relative_eq!(effective_diameter(2, 1.0, 18.0), 6.0, epsilon = 1.0e-12);
    }

    #[test]
    fn potential_matrix_is_symmetric_and_diagonally_dominant() {
        let set = set_with_voltages(345.0);
        let p = potential_coefficients(&set);
        assert_relative_eq!(p[(0, 1)], p[(1, 0)], max_relative = 1.0e-12);
        assert!(p[(0, 0)] > p[(0, 1)].abs());
        assert!(p[(0, 1)] > 0.0);
    }

    #[test]
    fn zero_voltage_set_produces_zero_field() {
        let set = set_with_voltages(0.0);
        let samples = SamplePoints::new([(-20.0, 3.0), (0.0, 3.0), (20.0, 3.0)]);
        let series = electric_field(&set, &samples).unwrap();
        assert_eq!(series.x.abs().max(), 0.0);
        assert_eq!(series.y.abs().max(), 0.0);
    }

    #[test]
    fn tangential_field_vanishes_on_the_ground_plane() {
        let set = set_with_voltages(345.0);
        let samples = SamplePoints::new([(5.0, 0.0)]);
        let series = electric_field(&set, &samples).unwrap();
        assert_eq!(series.x.abs().max(), 0.0);
        assert!(series.y.abs().max() > 0.0);
    }

    #[test]
    fn series_spans_one_period_of_samples() {
        let set = set_with_voltages(345.0);
        let samples = SamplePoints::new([(7.0, 3.0)]);
        let series = electric_field(&set, &samples).unwrap();
        assert_eq!(series.time_count(), TIME_SAMPLES_PER_PERIOD);
        assert_eq!(series.sample_count(), 1);
        // Both period endpoints are included, so the first and last instants
        // see the same voltages.
        assert_relative_eq!(series.y[(0, 0)], series.y[(1000, 0)], max_relative = 1.0e-9);
    }
}
