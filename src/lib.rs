#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(clippy::all, clippy::cargo, clippy::nursery, missing_docs)]
#![doc = include_str!("../README.md")]

/// Fundamental physical constants and unit-conversion factors.
pub mod constants;
/// Shared mathematical utilities (scalar aliases, phasors, grids).
pub mod math;
/// Dense LU factorization for the charge-simulation system.
pub mod linalg;
/// Conductor, cross-section, and sample-point data model.
pub mod geometry;
/// Field engines and their reductions to reportable magnitudes.
pub mod fields;
/// Phase-arrangement and conductor-height search procedures.
pub mod optimize;
/// Error types shared across the library.
pub mod errors;

/// Common exports for downstream crates.
pub mod prelude;
