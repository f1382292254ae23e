//! Shared error types used across submodules.

use thiserror::Error;

use crate::math::Scalar;

/// Convenience alias for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, LineEmfError>;

/// Top-level error type for the crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineEmfError {
    /// Two conductors in a set share a tag.
    #[error("duplicate conductor tag {tag:?}")]
    DuplicateTag {
        /// The repeated tag.
        tag: String,
    },
    /// Two conductors in a set occupy the same cross-section position.
    #[error("conductors {first:?} and {second:?} both sit at ({x} ft, {y} ft)")]
    DuplicatePosition {
        /// Tag of the conductor seen first.
        first: String,
        /// Tag of the conductor seen second.
        second: String,
        /// Shared horizontal position in feet.
        x: Scalar,
        /// Shared height in feet.
        y: Scalar,
    },
    /// Conductors in a set disagree on the power frequency.
    #[error("conductor {tag:?} runs at {found} Hz, the rest of the set at {expected} Hz")]
    MixedFrequency {
        /// Tag of the disagreeing conductor.
        tag: String,
        /// Its frequency in hertz.
        found: Scalar,
        /// The frequency of the first conductor in the set.
        expected: Scalar,
    },
    /// A conductor set holds no conductors at all.
    #[error("conductor set contains no conductors")]
    EmptySet,
    /// Hot conductors cannot be grouped into consecutive three-phase circuits.
    #[error("cannot group {count} hot conductors into three-phase circuits")]
    UngroupableConductors {
        /// Number of hot conductors, not a multiple of three.
        count: usize,
    },
    /// An explicit circuit group does not hold exactly three conductors.
    #[error("circuit group {group} lists {len} conductors, expected exactly 3")]
    MalformedCircuit {
        /// Zero-based position of the offending group.
        group: usize,
        /// Number of indices the group lists.
        len: usize,
    },
    /// A conductor index points outside the addressed group.
    #[error("conductor index {index} is out of bounds ({count} available)")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Size of the group it was checked against.
        count: usize,
    },
    /// A field target does not change sign over the bisection bracket.
    #[error(
        "target {target} is not bracketed on [{lower}, {upper}] ft: \
         f({lower}) = {f_lower:.6e}, f({upper}) = {f_upper:.6e}"
    )]
    UnbracketedTarget {
        /// The requested field value.
        target: Scalar,
        /// Lower bracket endpoint in feet.
        lower: Scalar,
        /// Upper bracket endpoint in feet.
        upper: Scalar,
        /// Residual at the lower endpoint.
        f_lower: Scalar,
        /// Residual at the upper endpoint.
        f_upper: Scalar,
    },
    /// Bisection hit its iteration cap before converging.
    #[error("bisection stopped after {iterations} iterations without converging (last estimate {estimate} ft)")]
    IterationCap {
        /// Number of iterations performed.
        iterations: usize,
        /// Height increment estimate at the final iteration.
        estimate: Scalar,
    },
    /// The potential-coefficient system cannot be factored.
    #[error("singular potential system: pivot {pivot:.6e} at row {row}")]
    SingularSystem {
        /// Row of the offending pivot.
        row: usize,
        /// Value of the offending pivot.
        pivot: Scalar,
    },
}
