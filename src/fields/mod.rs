//! Field computation engines and magnitude post-processing.

mod electric;
mod magnetic;
mod phasor;
mod profile;

pub use electric::{electric_field, potential_coefficients};
pub use magnetic::magnetic_field;
pub use phasor::{
    ellipse_maximum, fundamental_phasor, phasors_to_magnitudes, resultant_series, FieldMagnitudes,
};
pub use profile::{
    edge_fields, field_profile, write_profile_csv, EdgeMetric, EdgeTable, FieldProfile,
    FieldSample,
};

use nalgebra::DMatrix;

use crate::math::Scalar;

/// Time-sampled field components at a set of sample points.
///
/// Rows are the time instants of one electrical period, columns the sample
/// points, in the order of the `SamplePoints` the series was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSeries {
    /// Horizontal component per (time, sample).
    pub x: DMatrix<Scalar>,
    /// Vertical component per (time, sample).
    pub y: DMatrix<Scalar>,
}

impl FieldSeries {
    /// Number of sample points covered.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.x.ncols()
    }

    /// Number of time instants in the series.
    #[must_use]
    pub fn time_count(&self) -> usize {
        self.x.nrows()
    }
}
