//! Conductor, cross-section, and sample-point data model.
//!
//! Inputs follow utility drawing conventions: positions in feet, diameters
//! in inches, voltages in line-to-line kilovolts, currents in amperes, and
//! phase angles in degrees. The field engines convert to SI internally.

use crate::errors::{LineEmfError, Result};
use crate::math::{linspace, Scalar};

/// A single overhead conductor (or symmetric bundle) running parallel to
/// the ground.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Conductor {
    /// Identifier, unique within a set.
    pub tag: String,
    /// Power frequency in hertz.
    pub frequency: Scalar,
    /// Horizontal position in feet, negative left of the centerline.
    pub x: Scalar,
    /// Height above ground in feet. Must be positive for a solvable system.
    pub y: Scalar,
    /// Number of subconductors in the bundle.
    pub subconductors: u32,
    /// Diameter of a single subconductor in inches.
    pub conductor_diameter: Scalar,
    /// Bundle circumscribing diameter in inches.
    pub bundle_diameter: Scalar,
    /// Line-to-line voltage in kilovolts.
    pub voltage: Scalar,
    /// Current in amperes.
    pub current: Scalar,
    /// Phase angle in degrees.
    pub phase: Scalar,
}

impl Conductor {
    /// A grounded shield or neutral wire: a single bare subconductor with no
    /// voltage and no current.
    #[must_use]
    pub fn grounded(
        tag: impl Into<String>,
        frequency: Scalar,
        x: Scalar,
        y: Scalar,
        diameter: Scalar,
    ) -> Self {
        Self {
            tag: tag.into(),
            frequency,
            x,
            y,
            subconductors: 1,
            conductor_diameter: diameter,
            bundle_diameter: diameter,
            voltage: 0.0,
            current: 0.0,
            phase: 0.0,
        }
    }
}

/// Validated collection of the conductors sharing a right-of-way.
///
/// Energized conductors come first in flattened order, grounded wires after
/// them; index-based selections (circuit groups, raise subsets) use that
/// ordering. Construction checks tag uniqueness, position distinctness, and
/// frequency agreement across the whole set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConductorSet {
    hot: Vec<Conductor>,
    gnd: Vec<Conductor>,
    frequency: Scalar,
    tags: Vec<String>,
    x: Vec<Scalar>,
    y: Vec<Scalar>,
    subconductors: Vec<u32>,
    conductor_diameter: Vec<Scalar>,
    bundle_diameter: Vec<Scalar>,
    voltage: Vec<Scalar>,
    current: Vec<Scalar>,
    phase: Vec<Scalar>,
}

impl ConductorSet {
    /// Builds a validated set from energized and grounded conductors.
    ///
    /// # Errors
    ///
    /// [`LineEmfError::EmptySet`] when both groups are empty,
    /// [`LineEmfError::DuplicateTag`] and [`LineEmfError::DuplicatePosition`]
    /// for clashes anywhere in the set, and [`LineEmfError::MixedFrequency`]
    /// when any conductor disagrees with the first one.
    pub fn new(hot: Vec<Conductor>, gnd: Vec<Conductor>) -> Result<Self> {
        let Some(frequency) = hot.first().or_else(|| gnd.first()).map(|c| c.frequency) else {
            return Err(LineEmfError::EmptySet);
        };
        let all = || hot.iter().chain(gnd.iter());
        for c in all() {
            if c.frequency != frequency {
                return Err(LineEmfError::MixedFrequency {
                    tag: c.tag.clone(),
                    found: c.frequency,
                    expected: frequency,
                });
            }
        }
        for (i, second) in all().enumerate() {
            for first in all().take(i) {
                if first.tag == second.tag {
                    return Err(LineEmfError::DuplicateTag {
                        tag: second.tag.clone(),
                    });
                }
                if first.x == second.x && first.y == second.y {
                    return Err(LineEmfError::DuplicatePosition {
                        first: first.tag.clone(),
                        second: second.tag.clone(),
                        x: second.x,
                        y: second.y,
                    });
                }
            }
        }
        Ok(Self::assemble(hot, gnd, frequency))
    }

    fn assemble(hot: Vec<Conductor>, gnd: Vec<Conductor>, frequency: Scalar) -> Self {
        let n = hot.len() + gnd.len();
        let mut set = Self {
            hot,
            gnd,
            frequency,
            tags: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            subconductors: Vec::with_capacity(n),
            conductor_diameter: Vec::with_capacity(n),
            bundle_diameter: Vec::with_capacity(n),
            voltage: Vec::with_capacity(n),
            current: Vec::with_capacity(n),
            phase: Vec::with_capacity(n),
        };
        for c in set.hot.iter().chain(set.gnd.iter()) {
            set.tags.push(c.tag.clone());
            set.x.push(c.x);
            set.y.push(c.y);
            set.subconductors.push(c.subconductors);
            set.conductor_diameter.push(c.conductor_diameter);
            set.bundle_diameter.push(c.bundle_diameter);
            set.voltage.push(c.voltage);
            set.current.push(c.current);
            set.phase.push(c.phase);
        }
        set
    }

    /// Total number of conductors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hot.len() + self.gnd.len()
    }

    /// True when the set holds no conductors; never true for a validated set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of energized conductors.
    #[must_use]
    pub fn hot_count(&self) -> usize {
        self.hot.len()
    }

    /// Number of grounded wires.
    #[must_use]
    pub fn gnd_count(&self) -> usize {
        self.gnd.len()
    }

    /// The uniform power frequency in hertz.
    #[must_use]
    pub fn frequency(&self) -> Scalar {
        self.frequency
    }

    /// Energized conductors in listed order.
    #[must_use]
    pub fn hot(&self) -> &[Conductor] {
        &self.hot
    }

    /// Grounded wires in listed order.
    #[must_use]
    pub fn gnd(&self) -> &[Conductor] {
        &self.gnd
    }

    /// Tag of the conductor at a flattened index.
    #[must_use]
    pub fn tag(&self, index: usize) -> &str {
        &self.tags[index]
    }

    /// Flattened tags, hot first.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Flattened horizontal positions in feet.
    #[must_use]
    pub fn x(&self) -> &[Scalar] {
        &self.x
    }

    /// Flattened heights in feet.
    #[must_use]
    pub fn y(&self) -> &[Scalar] {
        &self.y
    }

    /// Flattened subconductor counts.
    #[must_use]
    pub fn subconductors(&self) -> &[u32] {
        &self.subconductors
    }

    /// Flattened subconductor diameters in inches.
    #[must_use]
    pub fn conductor_diameter(&self) -> &[Scalar] {
        &self.conductor_diameter
    }

    /// Flattened bundle diameters in inches.
    #[must_use]
    pub fn bundle_diameter(&self) -> &[Scalar] {
        &self.bundle_diameter
    }

    /// Flattened line-to-line voltages in kilovolts.
    #[must_use]
    pub fn voltage(&self) -> &[Scalar] {
        &self.voltage
    }

    /// Flattened currents in amperes.
    #[must_use]
    pub fn current(&self) -> &[Scalar] {
        &self.current
    }

    /// Flattened phase angles in degrees.
    #[must_use]
    pub fn phase(&self) -> &[Scalar] {
        &self.phase
    }

    /// Copy of the set with every phase angle replaced, in flattened order.
    ///
    /// `phase` must have one entry per conductor. No re-validation happens;
    /// phase changes cannot break the construction invariants.
    #[must_use]
    pub fn with_phases(&self, phase: &[Scalar]) -> Self {
        debug_assert_eq!(phase.len(), self.len());
        let mut hot = self.hot.clone();
        let mut gnd = self.gnd.clone();
        for (c, &p) in hot.iter_mut().chain(gnd.iter_mut()).zip(phase) {
            c.phase = p;
        }
        Self::assemble(hot, gnd, self.frequency)
    }

    /// Copy of the set with the conductors at the given flattened indices
    /// raised uniformly by `increment` feet.
    ///
    /// Indices must be in bounds. No re-validation happens; a raise that
    /// lands one conductor on another surfaces later as a singular system.
    #[must_use]
    pub fn with_raised(&self, indices: &[usize], increment: Scalar) -> Self {
        let mut hot = self.hot.clone();
        let mut gnd = self.gnd.clone();
        for &index in indices {
            if index < hot.len() {
                hot[index].y += increment;
            } else {
                gnd[index - hot.len()].y += increment;
            }
        }
        Self::assemble(hot, gnd, self.frequency)
    }
}

/// Ordered ground-level sample coordinates, in feet.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoints {
    x: Vec<Scalar>,
    y: Vec<Scalar>,
}

impl SamplePoints {
    /// Collects (x, y) pairs into a sample set.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = (Scalar, Scalar)>) -> Self {
        let (x, y) = points.into_iter().unzip();
        Self { x, y }
    }

    /// Symmetric lateral profile grid: `1 + floor(2 * max_distance / step)`
    /// points spanning `[-max_distance, +max_distance]` at a fixed height.
    ///
    /// # Panics
    ///
    /// Panics when `step` is not positive.
    #[must_use]
    pub fn lateral(max_distance: Scalar, step: Scalar, height: Scalar) -> Self {
        assert!(step > 0.0, "lateral sample step must be positive, got {step}");
        let n = (2.0 * max_distance / step).floor() as usize + 1;
        let x = linspace(-max_distance, max_distance, n);
        let y = vec![height; x.len()];
        Self { x, y }
    }

    /// Number of sample points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True when no points are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Horizontal coordinates in feet.
    #[must_use]
    pub fn x(&self) -> &[Scalar] {
        &self.x
    }

    /// Heights in feet.
    #[must_use]
    pub fn y(&self) -> &[Scalar] {
        &self.y
    }
}

/// A named right-of-way cross section: the conductor set plus the lateral
/// profile extent and the ROW edge locations.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossSection {
    /// Section name, carried into derived variants.
    pub name: String,
    /// Conductors in the section.
    pub conductors: ConductorSet,
    /// Lateral profile half-width in feet.
    pub max_distance: Scalar,
    /// Lateral sample spacing in feet.
    pub step: Scalar,
    /// Sampling height above ground in feet.
    pub sample_height: Scalar,
    /// Left ROW edge in feet, on the negative side of the centerline.
    pub left_row: Scalar,
    /// Right ROW edge in feet.
    pub right_row: Scalar,
}

impl CrossSection {
    /// The lateral profile sample grid of this section.
    #[must_use]
    pub fn profile_samples(&self) -> SamplePoints {
        SamplePoints::lateral(self.max_distance, self.step, self.sample_height)
    }

    /// Profile-grid indices nearest the left and right ROW edges.
    ///
    /// Equidistant ties resolve toward the centerline on both sides.
    #[must_use]
    pub fn edge_indices(&self) -> (usize, usize) {
        let grid = self.profile_samples();
        let left = nearest_index(grid.x(), self.left_row, true);
        let right = nearest_index(grid.x(), self.right_row, false);
        (left, right)
    }

    /// The two snapped ROW-edge sample points, left then right.
    #[must_use]
    pub fn edge_samples(&self) -> SamplePoints {
        let grid = self.profile_samples();
        let (left, right) = self.edge_indices();
        SamplePoints::new([
            (grid.x()[left], self.sample_height),
            (grid.x()[right], self.sample_height),
        ])
    }
}

/// Index of the grid point nearest `target`; `ties_later` picks the later
/// of two equidistant points.
fn nearest_index(xs: &[Scalar], target: Scalar, ties_later: bool) -> usize {
    let mut best = 0;
    let mut best_distance = Scalar::INFINITY;
    for (i, &x) in xs.iter().enumerate() {
        let distance = (x - target).abs();
        if distance < best_distance || (ties_later && distance == best_distance) {
            best = i;
            best_distance = distance;
        }
    }
    best
}
