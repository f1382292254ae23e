//! Magnetic field of parallel line currents over one electrical period.
//!
//! Unlike the electric case there is no system to solve: each conductor
//! carries a known current, and the field at a sample point is the direct
//! Biot-Savart superposition of infinite straight wires. Earth-return
//! images are far enough away at power frequency that they are ignored.

use nalgebra::DMatrix;

use crate::constants::{
    angular_frequency, FEET_TO_METERS, TESLA_TO_MILLIGAUSS, TIME_SAMPLES_PER_PERIOD,
    VACUUM_PERMEABILITY,
};
use crate::geometry::{ConductorSet, SamplePoints};
use crate::math::{linspace, Scalar};

use super::FieldSeries;

/// Computes the time-sampled magnetic flux density at `samples`, in mG.
///
/// Amperes in, milligauss out. Grounded conductors carry no current and
/// contribute nothing. The series spans exactly one electrical period.
#[must_use]
pub fn magnetic_field(set: &ConductorSet, samples: &SamplePoints) -> FieldSeries {
    let n = set.len();
    let z = samples.len();
    let coefficient =
        TESLA_TO_MILLIGAUSS * VACUUM_PERMEABILITY / (2.0 * std::f64::consts::PI);

    let cx: Vec<Scalar> = set.x().iter().map(|v| v * FEET_TO_METERS).collect();
    let cy: Vec<Scalar> = set.y().iter().map(|v| v * FEET_TO_METERS).collect();
    let sx: Vec<Scalar> = samples.x().iter().map(|v| v * FEET_TO_METERS).collect();
    let sy: Vec<Scalar> = samples.y().iter().map(|v| v * FEET_TO_METERS).collect();

    let phase: Vec<Scalar> = set.phase().iter().map(|p| p.to_radians()).collect();
    let omega = angular_frequency(set.frequency());
    let times = linspace(0.0, 1.0 / set.frequency(), TIME_SAMPLES_PER_PERIOD);

    let mut bx = DMatrix::zeros(times.len(), z);
    let mut by = DMatrix::zeros(times.len(), z);
    for (t_index, &t) in times.iter().enumerate() {
        for a in 0..z {
            let mut bx_a = 0.0;
            let mut by_a = 0.0;
            for c in 0..n {
                let current = set.current()[c] * (omega * t + phase[c]).cos();
                let dx = sx[a] - cx[c];
                let dy = sy[a] - cy[c];
                let d = dx * dx + dy * dy;
                bx_a -= coefficient * current * dy / d;
                by_a += coefficient * current * dx / d;
            }
            bx[(t_index, a)] = bx_a;
            by[(t_index, a)] = by_a;
        }
    }
    FieldSeries { x: bx, y: by }
}
