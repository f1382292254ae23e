//! Convenience re-exports for building right-of-way field studies.

pub use crate::constants::*;
pub use crate::errors::LineEmfError;
pub use crate::fields::{
    edge_fields, electric_field, ellipse_maximum, field_profile, fundamental_phasor,
    magnetic_field, phasors_to_magnitudes, potential_coefficients, resultant_series,
    write_profile_csv, EdgeMetric, EdgeTable, FieldMagnitudes, FieldProfile, FieldSample,
    FieldSeries,
};
pub use crate::geometry::{Conductor, ConductorSet, CrossSection, SamplePoints};
pub use crate::linalg::CroutFactors;
pub use crate::math::{linspace, phasor, CScalar, Scalar};
pub use crate::optimize::{
    optimize_phasing, target_fields, write_adjustments_csv, write_phasing_csv, Arrangements,
    BisectionCriteria, CircuitGrouping, HeightAdjustment, PhasingOptimum, PhasingRow,
    SectionVariant,
};
