//! Bisection on a uniform height increment to hit edge-field targets.
//!
//! Raising conductors is the other lever a corridor designer has once
//! phasing is fixed. Every targeted metric gets its own search: the chosen
//! subset is raised uniformly by a trial increment, the relevant field is
//! re-evaluated at the relevant snapped ROW edge, and the interval halves
//! until the edge value sits within tolerance of the target.

use std::io::{self, Write};

use crate::errors::{LineEmfError, Result};
use crate::fields::{
    electric_field, magnetic_field, phasors_to_magnitudes, EdgeMetric, EdgeTable,
};
use crate::geometry::{CrossSection, SamplePoints};
use crate::math::Scalar;

use super::{derive_variant, SectionVariant};

/// Stopping rules for the bisection search.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BisectionCriteria {
    /// Iterations before the search gives up.
    pub max_iterations: usize,
    /// Convergence threshold on the residual relative to the target.
    pub relative_tolerance: Scalar,
    /// Upper end of the increment interval, in feet.
    pub upper_bound: Scalar,
}

impl Default for BisectionCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            relative_tolerance: 1.0e-6,
            upper_bound: 1.0e6,
        }
    }
}

/// Height increments and derived sections satisfying the requested targets.
///
/// Slots mirror the request: a metric left untargeted stays `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightAdjustment {
    /// Found increment per targeted metric, in feet.
    pub increments: EdgeTable<Option<Scalar>>,
    /// Raised section per targeted metric, with its recomputed profile.
    pub variants: EdgeTable<Option<SectionVariant>>,
}

/// Bisects `f(h) = metric(h) - target` for `h` in `[0, upper_bound]`.
fn bisect(
    mut metric: impl FnMut(Scalar) -> Result<Scalar>,
    target: Scalar,
    criteria: &BisectionCriteria,
) -> Result<Scalar> {
    let mut lower = 0.0;
    let mut upper = criteria.upper_bound;
    let f_lower = metric(lower)? - target;
    let f_upper = metric(upper)? - target;
    if f_lower * f_upper > 0.0 {
        return Err(LineEmfError::UnbracketedTarget {
            target,
            lower,
            upper,
            f_lower,
            f_upper,
        });
    }
    // The sign of f at the moving lower end never changes, so the initial
    // residual serves as the sentinel for the whole search.
    let mut mid = 0.5 * (lower + upper);
    for iteration in 1..=criteria.max_iterations {
        mid = 0.5 * (lower + upper);
        let f_mid = metric(mid)? - target;
        if (f_mid / target).abs() <= criteria.relative_tolerance {
            tracing::debug!(requested = target, increment = mid, iteration, "bisection converged");
            return Ok(mid);
        }
        if f_mid * f_lower > 0.0 {
            lower = mid;
        } else {
            upper = mid;
        }
    }
    Err(LineEmfError::IterationCap {
        iterations: criteria.max_iterations,
        estimate: mid,
    })
}

/// Finds, per targeted metric, the uniform raise of the selected conductors
/// that brings the snapped ROW-edge field down to the target.
///
/// `hot` and `gnd` index into the energized and grounded groups separately;
/// the union is raised together. Each present target is solved
/// independently, and any failure aborts the whole call.
///
/// # Errors
///
/// [`LineEmfError::IndexOutOfBounds`] for a selection outside either group,
/// [`LineEmfError::UnbracketedTarget`] when a target lies outside what
/// raising can reach, [`LineEmfError::IterationCap`] when the interval fails
/// to converge, and [`LineEmfError::SingularSystem`] from the electric
/// solves.
pub fn target_fields(
    section: &CrossSection,
    hot: &[usize],
    gnd: &[usize],
    targets: &EdgeTable<Option<Scalar>>,
    criteria: &BisectionCriteria,
) -> Result<HeightAdjustment> {
    let set = &section.conductors;
    for &index in hot {
        if index >= set.hot_count() {
            return Err(LineEmfError::IndexOutOfBounds {
                index,
                count: set.hot_count(),
            });
        }
    }
    for &index in gnd {
        if index >= set.gnd_count() {
            return Err(LineEmfError::IndexOutOfBounds {
                index,
                count: set.gnd_count(),
            });
        }
    }
    let raised: Vec<usize> = hot
        .iter()
        .copied()
        .chain(gnd.iter().map(|&index| set.hot_count() + index))
        .collect();

    let edges = section.edge_samples();
    let metric_at = |metric: EdgeMetric, increment: Scalar| -> Result<Scalar> {
        let candidate = set.with_raised(&raised, increment);
        let side = usize::from(!metric.is_left());
        let point = SamplePoints::new([(edges.x()[side], edges.y()[side])]);
        let series = if metric.is_electric() {
            electric_field(&candidate, &point)?
        } else {
            magnetic_field(&candidate, &point)
        };
        Ok(phasors_to_magnitudes(&series).maximum[0])
    };

    let mut increments: EdgeTable<Option<Scalar>> = EdgeTable::from_fn(|_| None);
    let mut variants: EdgeTable<Option<SectionVariant>> = EdgeTable::from_fn(|_| None);
    for metric in EdgeMetric::ALL {
        let Some(target) = *targets.get(metric) else {
            continue;
        };
        let increment = bisect(|h| metric_at(metric, h), target, criteria)?;
        *increments.get_mut(metric) = Some(increment);
        *variants.get_mut(metric) = Some(derive_variant(
            section,
            &format!("adjusted_for_{}", metric.label()),
            set.with_raised(&raised, increment),
        )?);
    }
    Ok(HeightAdjustment {
        increments,
        variants,
    })
}

/// Writes the found increments as CSV, one targeted metric per row.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_adjustments_csv<W: Write>(
    mut writer: W,
    adjustment: &HeightAdjustment,
) -> io::Result<()> {
    writeln!(writer, "metric,increment")?;
    for metric in EdgeMetric::ALL {
        if let Some(increment) = adjustment.increments.get(metric) {
            writeln!(writer, "{},{}", metric.label(), increment)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::fields::edge_fields;
    use crate::geometry::{Conductor, ConductorSet};

    use super::*;

    fn shielded_section() -> CrossSection {
        let hot = vec![
            Conductor {
                tag: "west".into(),
                frequency: 60.0,
                x: -10.0,
                y: 30.0,
                subconductors: 1,
                conductor_diameter: 1.1,
                bundle_diameter: 1.1,
                voltage: 345.0,
                current: 400.0,
                phase: 0.0,
            },
            Conductor {
                tag: "east".into(),
                frequency: 60.0,
                x: 10.0,
                y: 30.0,
                subconductors: 1,
                conductor_diameter: 1.1,
                bundle_diameter: 1.1,
                voltage: 345.0,
                current: 400.0,
                phase: 180.0,
            },
        ];
        let gnd = vec![Conductor::grounded("shield", 60.0, 0.0, 40.0, 0.5)];
        CrossSection {
            name: "shielded".into(),
            conductors: ConductorSet::new(hot, gnd).unwrap(),
            max_distance: 25.0,
            step: 0.5,
            sample_height: 3.28,
            left_row: -20.0,
            right_row: 20.0,
        }
    }

    fn only(metric: EdgeMetric, target: Scalar) -> EdgeTable<Option<Scalar>> {
        let mut table = EdgeTable::from_fn(|_| None);
        *table.get_mut(metric) = Some(target);
        table
    }

    #[test]
    fn synthetic_linear_residual_converges() {
        let found = bisect(|h| Ok(75.0 - h), 37.5, &BisectionCriteria::default()).unwrap();
        assert_relative_eq!(found, 37.5, max_relative = 1.0e-5);
    }

    #[test]
    fn tight_tolerance_hits_the_iteration_cap() {
        let criteria = BisectionCriteria {
            max_iterations: 3,
            relative_tolerance: 1.0e-15,
            upper_bound: 1.0e6,
        };
        let err = bisect(|h| Ok(75.0 - h), 37.5, &criteria).unwrap_err();
        assert!(matches!(
            err,
            LineEmfError::IterationCap { iterations: 3, estimate } if estimate > 0.0
        ));
    }

    #[test]
    fn selection_outside_either_group_is_rejected() {
        let section = shielded_section();
        let targets = only(EdgeMetric::BmaxRight, 1.0);
        let err = target_fields(&section, &[5], &[], &targets, &BisectionCriteria::default())
            .unwrap_err();
        assert!(matches!(err, LineEmfError::IndexOutOfBounds { index: 5, count: 2 }));
        let err = target_fields(&section, &[], &[1], &targets, &BisectionCriteria::default())
            .unwrap_err();
        assert!(matches!(err, LineEmfError::IndexOutOfBounds { index: 1, count: 1 }));
    }

    #[test]
    fn unreachable_target_reports_the_bracket() {
        let section = shielded_section();
        let targets = only(EdgeMetric::BmaxRight, 1.0e-12);
        let err = target_fields(
            &section,
            &[0, 1],
            &[0],
            &targets,
            &BisectionCriteria::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LineEmfError::UnbracketedTarget { f_lower, f_upper, .. }
                if f_lower > 0.0 && f_upper > 0.0
        ));
    }

    #[test]
    fn target_already_met_needs_no_raise() {
        let section = shielded_section();
        let baseline = edge_fields(&section.conductors, &section.edge_samples()).unwrap();
        let targets = only(EdgeMetric::BmaxLeft, baseline.bmax_left);
        let adjustment = target_fields(
            &section,
            &[0, 1],
            &[0],
            &targets,
            &BisectionCriteria::default(),
        )
        .unwrap();
        assert!(adjustment.increments.bmax_left.unwrap() < 1.0e-2);
    }

    #[test]
    fn halving_the_right_edge_field_raises_the_line() {
        let section = shielded_section();
        let baseline = edge_fields(&section.conductors, &section.edge_samples()).unwrap();
        let target = baseline.bmax_right / 2.0;
        let adjustment = target_fields(
            &section,
            &[0, 1],
            &[0],
            &only(EdgeMetric::BmaxRight, target),
            &BisectionCriteria::default(),
        )
        .unwrap();

        let increment = adjustment.increments.bmax_right.unwrap();
        assert!(increment > 0.0);
        let variant = adjustment.variants.bmax_right.as_ref().unwrap();
        assert_eq!(variant.section.name, "shielded_adjusted_for_bmax_right");
        let reached = edge_fields(&variant.section.conductors, &section.edge_samples())
            .unwrap()
            .bmax_right;
        assert_relative_eq!(reached, target, max_relative = 1.0e-5);

        assert!(adjustment.increments.bmax_left.is_none());
        assert!(adjustment.variants.emax_left.is_none());
    }

    #[test]
    fn csv_skips_untargeted_metrics() {
        let adjustment = HeightAdjustment {
            increments: EdgeTable {
                bmax_left: None,
                bmax_right: Some(12.25),
                emax_left: None,
                emax_right: None,
            },
            variants: EdgeTable::from_fn(|_| None),
        };
        let mut buffer = Vec::new();
        write_adjustments_csv(&mut buffer, &adjustment).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "metric,increment\nbmax_right,12.25\n");
    }
}
