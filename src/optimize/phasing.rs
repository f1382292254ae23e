//! Exhaustive phase-arrangement search minimizing right-of-way edge fields.
//!
//! A three-phase circuit can land its three phase angles on its three
//! conductor positions in six ways, so a corridor with `G` circuits admits
//! `6^G` assignments. The counter below walks that space lazily while the
//! sweep tracks the best candidate for each edge metric independently.

use std::io::{self, Write};

use crate::errors::{LineEmfError, Result};
use crate::fields::{edge_fields, EdgeMetric, EdgeTable};
use crate::geometry::CrossSection;
use crate::math::Scalar;

use super::{derive_variant, SectionVariant};

/// The six orderings of a triple, identity first.
const TRIPLE_ORDERINGS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// How energized conductors group into three-phase circuits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitGrouping {
    /// Hot conductors form consecutive triples in listed order.
    ConsecutiveTriples,
    /// Explicit triples of hot-conductor indices. Groups may overlap; each
    /// must hold exactly three in-bounds indices.
    Explicit(Vec<Vec<usize>>),
}

impl CircuitGrouping {
    /// Resolves the grouping against `hot_count` energized conductors.
    fn resolve(&self, hot_count: usize) -> Result<Vec<Vec<usize>>> {
        match self {
            Self::ConsecutiveTriples => {
                if hot_count % 3 != 0 {
                    return Err(LineEmfError::UngroupableConductors { count: hot_count });
                }
                Ok((0..hot_count / 3)
                    .map(|g| (3 * g..3 * g + 3).collect())
                    .collect())
            }
            Self::Explicit(groups) => {
                for (g, group) in groups.iter().enumerate() {
                    if group.len() != 3 {
                        return Err(LineEmfError::MalformedCircuit {
                            group: g,
                            len: group.len(),
                        });
                    }
                    for &index in group {
                        if index >= hot_count {
                            return Err(LineEmfError::IndexOutOfBounds {
                                index,
                                count: hot_count,
                            });
                        }
                    }
                }
                Ok(groups.clone())
            }
        }
    }
}

/// Lazy mixed-radix counter over every per-circuit choice of ordering.
///
/// Each candidate is the flattened source-index arrangement: slot `3g + i`
/// of circuit `g` receives the phase of member `arrangement[3g + i]`. The
/// rightmost circuit advances fastest and the all-identity candidate comes
/// first. Zero circuits yield exactly one empty arrangement.
#[derive(Debug, Clone)]
pub struct Arrangements {
    digits: Vec<usize>,
    exhausted: bool,
}

impl Arrangements {
    /// A fresh counter over `circuits` independently permuted triples.
    #[must_use]
    pub fn new(circuits: usize) -> Self {
        Self {
            digits: vec![0; circuits],
            exhausted: false,
        }
    }

    /// Number of candidates, saturating on overflow.
    #[must_use]
    pub fn total(&self) -> usize {
        6_usize.saturating_pow(self.digits.len() as u32)
    }
}

impl Iterator for Arrangements {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let candidate = self
            .digits
            .iter()
            .enumerate()
            .flat_map(|(g, &d)| TRIPLE_ORDERINGS[d].map(|i| 3 * g + i))
            .collect();
        self.exhausted = true;
        for d in self.digits.iter_mut().rev() {
            *d += 1;
            if *d < TRIPLE_ORDERINGS.len() {
                self.exhausted = false;
                break;
            }
            *d = 0;
        }
        Some(candidate)
    }
}

/// One conductor's row of the phasing table: the phase angle it is assigned
/// under each metric's winning arrangement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhasingRow {
    /// Conductor tag.
    pub tag: String,
    /// Assigned phase angle in degrees, per metric.
    pub phases: EdgeTable<Scalar>,
}

/// Outcome of the exhaustive phasing sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasingOptimum {
    /// One row per conductor under consideration, in group order.
    pub rows: Vec<PhasingRow>,
    /// Best edge value found for each metric.
    pub minima: EdgeTable<Scalar>,
    /// Derived section per metric, phases overwritten with the winners.
    pub variants: EdgeTable<SectionVariant>,
}

/// Sweeps every phase arrangement of the grouped circuits and keeps, per
/// edge metric, the one with the lowest field at the snapped ROW edge.
///
/// The unpermuted assignment is always a candidate, so no metric ends up
/// worse than the section as given.
///
/// # Errors
///
/// Input-shape errors from the grouping
/// ([`LineEmfError::UngroupableConductors`], [`LineEmfError::MalformedCircuit`],
/// [`LineEmfError::IndexOutOfBounds`]) and any
/// [`LineEmfError::SingularSystem`] raised by the electric solves.
pub fn optimize_phasing(
    section: &CrossSection,
    grouping: &CircuitGrouping,
) -> Result<PhasingOptimum> {
    let set = &section.conductors;
    let groups = grouping.resolve(set.hot_count())?;
    let conds: Vec<usize> = groups.iter().flatten().copied().collect();
    let base_phase: Vec<Scalar> = conds.iter().map(|&slot| set.phase()[slot]).collect();
    let edges = section.edge_samples();

    let arrangements = Arrangements::new(groups.len());
    tracing::debug!(
        section = %section.name,
        circuits = groups.len(),
        candidates = arrangements.total(),
        "sweeping phase arrangements"
    );

    let mut scratch = set.phase().to_vec();
    let mut minima = EdgeTable::from_fn(|_| Scalar::INFINITY);
    let mut best: EdgeTable<Vec<usize>> = EdgeTable::from_fn(|_| Vec::new());
    for arrangement in arrangements {
        scratch.copy_from_slice(set.phase());
        for (i, &source) in arrangement.iter().enumerate() {
            scratch[conds[i]] = base_phase[source];
        }
        let table = edge_fields(&set.with_phases(&scratch), &edges)?;
        for metric in EdgeMetric::ALL {
            if table.get(metric) < minima.get(metric) {
                *minima.get_mut(metric) = *table.get(metric);
                best.get_mut(metric).clone_from(&arrangement);
            }
        }
    }
    tracing::debug!(
        bmax_left = minima.bmax_left,
        bmax_right = minima.bmax_right,
        emax_left = minima.emax_left,
        emax_right = minima.emax_right,
        "phase sweep minima"
    );

    let rows = conds
        .iter()
        .enumerate()
        .map(|(i, &slot)| PhasingRow {
            tag: set.tag(slot).to_owned(),
            phases: best.map(|arrangement| base_phase[arrangement[i]]),
        })
        .collect();

    let mut variant_for = |metric: EdgeMetric| -> Result<SectionVariant> {
        scratch.copy_from_slice(set.phase());
        for (i, &source) in best.get(metric).iter().enumerate() {
            scratch[conds[i]] = base_phase[source];
        }
        derive_variant(
            section,
            &format!("optimized_for_{}", metric.label()),
            set.with_phases(&scratch),
        )
    };
    let variants = EdgeTable {
        bmax_left: variant_for(EdgeMetric::BmaxLeft)?,
        bmax_right: variant_for(EdgeMetric::BmaxRight)?,
        emax_left: variant_for(EdgeMetric::EmaxLeft)?,
        emax_right: variant_for(EdgeMetric::EmaxRight)?,
    };

    Ok(PhasingOptimum {
        rows,
        minima,
        variants,
    })
}

/// Writes the phasing table as CSV, one conductor per row.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_phasing_csv<W: Write>(mut writer: W, optimum: &PhasingOptimum) -> io::Result<()> {
    writeln!(writer, "tag,bmax_left,bmax_right,emax_left,emax_right")?;
    for row in &optimum.rows {
        writeln!(
            writer,
            "{},{},{},{},{}",
            row.tag,
            row.phases.bmax_left,
            row.phases.bmax_right,
            row.phases.emax_left,
            row.phases.emax_right
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::fields::edge_fields;
    use crate::geometry::{Conductor, ConductorSet};

    use super::*;

    fn phase_wire(tag: &str, x: Scalar, phase: Scalar) -> Conductor {
        Conductor {
            tag: tag.into(),
            frequency: 60.0,
            x,
            y: 30.0,
            subconductors: 1,
            conductor_diameter: 1.1,
            bundle_diameter: 1.1,
            voltage: 345.0,
            current: 400.0,
            phase,
        }
    }

    fn flat_circuit_section() -> CrossSection {
        let hot = vec![
            phase_wire("a", -15.0, 0.0),
            phase_wire("b", 0.0, 120.0),
            phase_wire("c", 15.0, 240.0),
        ];
        let gnd = vec![Conductor::grounded("shield", 60.0, 0.0, 42.0, 0.5)];
        CrossSection {
            name: "flat".into(),
            conductors: ConductorSet::new(hot, gnd).unwrap(),
            max_distance: 30.0,
            step: 1.0,
            sample_height: 3.28,
            left_row: -25.0,
            right_row: 25.0,
        }
    }

    #[test]
    fn counter_walks_the_whole_space_identity_first() {
        let counter = Arrangements::new(2);
        assert_eq!(counter.total(), 36);
        let candidates: Vec<_> = counter.collect();
        assert_eq!(candidates.len(), 36);
        assert_eq!(candidates[0], vec![0, 1, 2, 3, 4, 5]);
        // Rightmost circuit advances first.
        assert_eq!(candidates[1], vec![0, 1, 2, 3, 5, 4]);
        assert_eq!(candidates[6], vec![0, 2, 1, 3, 4, 5]);
    }

    #[test]
    fn zero_circuits_yield_one_empty_candidate() {
        let candidates: Vec<_> = Arrangements::new(0).collect();
        assert_eq!(candidates, vec![Vec::new()]);
        assert_eq!(Arrangements::new(0).total(), 1);
    }

    #[test]
    fn five_hot_conductors_cannot_form_triples() {
        let hot = (0..5)
            .map(|i| phase_wire(&format!("c{i}"), 10.0 * f64::from(i), 0.0))
            .collect();
        let section = CrossSection {
            name: "odd".into(),
            conductors: ConductorSet::new(hot, Vec::new()).unwrap(),
            max_distance: 30.0,
            step: 1.0,
            sample_height: 3.28,
            left_row: -25.0,
            right_row: 25.0,
        };
        let err = optimize_phasing(&section, &CircuitGrouping::ConsecutiveTriples).unwrap_err();
        assert!(matches!(err, LineEmfError::UngroupableConductors { count: 5 }));
    }

    #[test]
    fn explicit_groups_are_shape_checked() {
        let section = flat_circuit_section();
        let short = CircuitGrouping::Explicit(vec![vec![0, 1]]);
        assert!(matches!(
            optimize_phasing(&section, &short).unwrap_err(),
            LineEmfError::MalformedCircuit { group: 0, len: 2 }
        ));
        let wild = CircuitGrouping::Explicit(vec![vec![0, 1, 7]]);
        assert!(matches!(
            optimize_phasing(&section, &wild).unwrap_err(),
            LineEmfError::IndexOutOfBounds { index: 7, count: 3 }
        ));
    }

    #[test]
    fn sweep_never_loses_to_the_given_assignment() {
        let section = flat_circuit_section();
        let baseline =
            edge_fields(&section.conductors, &section.edge_samples()).unwrap();
        let optimum =
            optimize_phasing(&section, &CircuitGrouping::ConsecutiveTriples).unwrap();
        for metric in EdgeMetric::ALL {
            assert!(optimum.minima.get(metric) <= baseline.get(metric));
        }
        assert_eq!(optimum.rows.len(), 3);
        assert_eq!(optimum.rows[0].tag, "a");
    }

    #[test]
    fn variants_reproduce_their_minima() {
        let section = flat_circuit_section();
        let edges = section.edge_samples();
        let optimum =
            optimize_phasing(&section, &CircuitGrouping::ConsecutiveTriples).unwrap();
        for metric in EdgeMetric::ALL {
            let variant = optimum.variants.get(metric);
            let table = edge_fields(&variant.section.conductors, &edges).unwrap();
            assert_relative_eq!(
                *table.get(metric),
                *optimum.minima.get(metric),
                max_relative = 1.0e-12
            );
            assert!(!variant.profile.samples.is_empty());
        }
        assert_eq!(
            optimum.variants.bmax_left.section.name,
            "flat_optimized_for_bmax_left"
        );
    }

    #[test]
    fn csv_lists_one_row_per_conductor() {
        let section = flat_circuit_section();
        let optimum =
            optimize_phasing(&section, &CircuitGrouping::ConsecutiveTriples).unwrap();
        let mut buffer = Vec::new();
        write_phasing_csv(&mut buffer, &optimum).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("tag,bmax_left,bmax_right,emax_left,emax_right"));
        assert_eq!(lines.count(), 3);
    }
}
