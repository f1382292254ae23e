//! Lateral field profiles and right-of-way edge reductions.

use std::io::{self, Write};

use crate::errors::Result;
use crate::geometry::{ConductorSet, CrossSection, SamplePoints};
use crate::math::Scalar;

use super::{electric_field, magnetic_field, phasors_to_magnitudes};

/// The four field magnitudes tracked at the right-of-way edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeMetric {
    /// Maximum magnetic field at the left edge.
    BmaxLeft,
    /// Maximum magnetic field at the right edge.
    BmaxRight,
    /// Maximum electric field at the left edge.
    EmaxLeft,
    /// Maximum electric field at the right edge.
    EmaxRight,
}

impl EdgeMetric {
    /// Every metric, in reporting order.
    pub const ALL: [Self; 4] = [
        Self::BmaxLeft,
        Self::BmaxRight,
        Self::EmaxLeft,
        Self::EmaxRight,
    ];

    /// Stable lowercase name, used in CSV columns and variant names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BmaxLeft => "bmax_left",
            Self::BmaxRight => "bmax_right",
            Self::EmaxLeft => "emax_left",
            Self::EmaxRight => "emax_right",
        }
    }

    /// Whether the metric reads the electric field (otherwise magnetic).
    #[must_use]
    pub const fn is_electric(self) -> bool {
        matches!(self, Self::EmaxLeft | Self::EmaxRight)
    }

    /// Whether the metric reads the left edge (otherwise right).
    #[must_use]
    pub const fn is_left(self) -> bool {
        matches!(self, Self::BmaxLeft | Self::EmaxLeft)
    }
}

/// One value per [`EdgeMetric`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeTable<T> {
    /// Value for [`EdgeMetric::BmaxLeft`].
    pub bmax_left: T,
    /// Value for [`EdgeMetric::BmaxRight`].
    pub bmax_right: T,
    /// Value for [`EdgeMetric::EmaxLeft`].
    pub emax_left: T,
    /// Value for [`EdgeMetric::EmaxRight`].
    pub emax_right: T,
}

impl<T> EdgeTable<T> {
    /// Builds a table by evaluating `f` once per metric.
    pub fn from_fn(mut f: impl FnMut(EdgeMetric) -> T) -> Self {
        Self {
            bmax_left: f(EdgeMetric::BmaxLeft),
            bmax_right: f(EdgeMetric::BmaxRight),
            emax_left: f(EdgeMetric::EmaxLeft),
            emax_right: f(EdgeMetric::EmaxRight),
        }
    }

    /// The entry for `metric`.
    #[must_use]
    pub const fn get(&self, metric: EdgeMetric) -> &T {
        match metric {
            EdgeMetric::BmaxLeft => &self.bmax_left,
            EdgeMetric::BmaxRight => &self.bmax_right,
            EdgeMetric::EmaxLeft => &self.emax_left,
            EdgeMetric::EmaxRight => &self.emax_right,
        }
    }

    /// Mutable access to the entry for `metric`.
    pub fn get_mut(&mut self, metric: EdgeMetric) -> &mut T {
        match metric {
            EdgeMetric::BmaxLeft => &mut self.bmax_left,
            EdgeMetric::BmaxRight => &mut self.bmax_right,
            EdgeMetric::EmaxLeft => &mut self.emax_left,
            EdgeMetric::EmaxRight => &mut self.emax_right,
        }
    }

    /// Applies `f` entrywise, keeping the metric layout.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> EdgeTable<U> {
        EdgeTable {
            bmax_left: f(&self.bmax_left),
            bmax_right: f(&self.bmax_right),
            emax_left: f(&self.emax_left),
            emax_right: f(&self.emax_right),
        }
    }
}

/// Field magnitudes at one lateral distance from the centerline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldSample {
    /// Lateral distance from the centerline (ft).
    pub distance: Scalar,
    /// Horizontal magnetic amplitude (mG).
    pub bx: Scalar,
    /// Vertical magnetic amplitude (mG).
    pub by: Scalar,
    /// Quadrature magnetic amplitude (mG).
    pub bprod: Scalar,
    /// Maximum instantaneous magnetic field (mG).
    pub bmax: Scalar,
    /// Horizontal electric amplitude (kV/m).
    pub ex: Scalar,
    /// Vertical electric amplitude (kV/m).
    pub ey: Scalar,
    /// Quadrature electric amplitude (kV/m).
    pub eprod: Scalar,
    /// Maximum instantaneous electric field (kV/m).
    pub emax: Scalar,
}

/// Both field profiles across the full lateral extent of a cross section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldProfile {
    /// One entry per lateral sample, left to right.
    pub samples: Vec<FieldSample>,
}

impl FieldProfile {
    /// Reads the four edge metrics at the given sample indices.
    ///
    /// # Panics
    ///
    /// Panics when either index is outside the profile.
    #[must_use]
    pub fn edge_table(&self, left: usize, right: usize) -> EdgeTable<Scalar> {
        EdgeTable {
            bmax_left: self.samples[left].bmax,
            bmax_right: self.samples[right].bmax,
            emax_left: self.samples[left].emax,
            emax_right: self.samples[right].emax,
        }
    }
}

/// Computes both field profiles across a cross section.
///
/// # Errors
///
/// Propagates [`crate::errors::LineEmfError::SingularSystem`] from the
/// electric solve.
pub fn field_profile(section: &CrossSection) -> Result<FieldProfile> {
    let samples = section.profile_samples();
    let magnetic = phasors_to_magnitudes(&magnetic_field(&section.conductors, &samples));
    let electric = phasors_to_magnitudes(&electric_field(&section.conductors, &samples)?);

    let rows = samples
        .x()
        .iter()
        .enumerate()
        .map(|(a, &distance)| FieldSample {
            distance,
            bx: magnetic.x_amplitude[a],
            by: magnetic.y_amplitude[a],
            bprod: magnetic.product[a],
            bmax: magnetic.maximum[a],
            ex: electric.x_amplitude[a],
            ey: electric.y_amplitude[a],
            eprod: electric.product[a],
            emax: electric.maximum[a],
        })
        .collect();
    Ok(FieldProfile { samples: rows })
}

/// Computes the four edge metrics at a pair of sample points.
///
/// The points are taken in left, right order, as
/// [`CrossSection::edge_samples`] produces them.
///
/// # Errors
///
/// Propagates [`crate::errors::LineEmfError::SingularSystem`] from the
/// electric solve.
///
/// # Panics
///
/// Panics when `edges` holds fewer than two points.
pub fn edge_fields(set: &ConductorSet, edges: &SamplePoints) -> Result<EdgeTable<Scalar>> {
    let magnetic = phasors_to_magnitudes(&magnetic_field(set, edges));
    let electric = phasors_to_magnitudes(&electric_field(set, edges)?);
    Ok(EdgeTable {
        bmax_left: magnetic.maximum[0],
        bmax_right: magnetic.maximum[1],
        emax_left: electric.maximum[0],
        emax_right: electric.maximum[1],
    })
}

/// Writes a profile as CSV with a `distance,Bx,By,...` header.
///
/// # Errors
///
/// Returns any error raised by the underlying writer.
pub fn write_profile_csv<W: Write>(mut writer: W, profile: &FieldProfile) -> io::Result<()> {
    writeln!(writer, "distance,Bx,By,Bprod,Bmax,Ex,Ey,Eprod,Emax")?;
    for s in &profile.samples {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{}",
            s.distance, s.bx, s.by, s.bprod, s.bmax, s.ex, s.ey, s.eprod, s.emax
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::geometry::Conductor;

    use super::*;

    fn balanced_section() -> CrossSection {
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
            name: "balanced".into(),
            conductors: ConductorSet::new(hot, gnd).unwrap(),
            max_distance: 20.0,
            step: 1.0,
            sample_height: 3.28,
            left_row: -15.0,
            right_row: 15.0,
        }
    }

    #[test]
    fn metric_labels_and_axes_are_stable() {
        assert_eq!(EdgeMetric::ALL.len(), 4);
        assert_eq!(EdgeMetric::BmaxLeft.label(), "bmax_left");
        assert_eq!(EdgeMetric::EmaxRight.label(), "emax_right");
        assert!(EdgeMetric::EmaxLeft.is_electric());
        assert!(!EdgeMetric::BmaxRight.is_electric());
        assert!(EdgeMetric::BmaxLeft.is_left());
        assert!(!EdgeMetric::EmaxRight.is_left());
    }

    #[test]
    fn edge_table_round_trips_through_from_fn_and_get() {
        let table = EdgeTable::from_fn(EdgeMetric::label);
        for metric in EdgeMetric::ALL {
            assert_eq!(*table.get(metric), metric.label());
        }
        let lengths = table.map(|label| label.len());
        assert_eq!(lengths.bmax_left, 9);
        assert_eq!(lengths.emax_right, 10);
    }

    #[test]
    fn mirrored_geometry_yields_a_symmetric_profile() {
        let profile = field_profile(&balanced_section()).unwrap();
        let n = profile.samples.len();
        assert_eq!(n, 41);
        for i in 0..n {
            let a = &profile.samples[i];
            let b = &profile.samples[n - 1 - i];
            assert_relative_eq!(a.distance, -b.distance, epsilon = 1.0e-12);
            assert_relative_eq!(a.bmax, b.bmax, max_relative = 1.0e-9);
            assert_relative_eq!(a.emax, b.emax, max_relative = 1.0e-9);
        }
    }

    #[test]
    fn mirrored_geometry_matches_at_symmetric_points() {
        let section = balanced_section();
        let samples = SamplePoints::new([(-20.0, 3.0), (20.0, 3.0)]);
        let table = edge_fields(&section.conductors, &samples).unwrap();
        assert_relative_eq!(table.bmax_left, table.bmax_right, max_relative = 1.0e-9);
        assert_relative_eq!(table.emax_left, table.emax_right, max_relative = 1.0e-9);
    }

    #[test]
    fn edge_fields_agree_with_the_profile_at_the_edges() {
        let section = balanced_section();
        let profile = field_profile(&section).unwrap();
        let (left, right) = section.edge_indices();
        let from_profile = profile.edge_table(left, right);
        let direct = edge_fields(&section.conductors, &section.edge_samples()).unwrap();
        for metric in EdgeMetric::ALL {
            assert_relative_eq!(
                *from_profile.get(metric),
                *direct.get(metric),
                max_relative = 1.0e-12
            );
        }
    }

    #[test]
    fn csv_output_carries_header_and_every_sample() {
        let profile = field_profile(&balanced_section()).unwrap();
        let mut buffer = Vec::new();
        write_profile_csv(&mut buffer, &profile).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("distance,Bx,By,Bprod,Bmax,Ex,Ey,Eprod,Emax")
        );
        assert_eq!(lines.count(), profile.samples.len());
    }
}
