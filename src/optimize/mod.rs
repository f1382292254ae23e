//! Search procedures that rework a cross section against edge-field limits.

mod height;
mod phasing;

pub use height::{target_fields, write_adjustments_csv, BisectionCriteria, HeightAdjustment};
pub use phasing::{
    optimize_phasing, write_phasing_csv, Arrangements, CircuitGrouping, PhasingOptimum,
    PhasingRow,
};

use crate::errors::Result;
use crate::fields::{field_profile, FieldProfile};
use crate::geometry::{ConductorSet, CrossSection};

/// A reworked cross section together with its recomputed field profile.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionVariant {
    /// The derived cross section, renamed after the metric it serves.
    pub section: CrossSection,
    /// Full lateral profile of the derived section.
    pub profile: FieldProfile,
}

/// Clones `section` with replacement conductors and a metric suffix on the
/// name, then evaluates its profile.
pub(crate) fn derive_variant(
    section: &CrossSection,
    suffix: &str,
    conductors: ConductorSet,
) -> Result<SectionVariant> {
    let mut derived = section.clone();
    derived.name = format!("{}_{suffix}", section.name);
    derived.conductors = conductors;
    let profile = field_profile(&derived)?;
    Ok(SectionVariant {
        section: derived,
        profile,
    })
}
