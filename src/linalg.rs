//! Dense Crout factorization for potential-coefficient systems.
//!
//! The charge-simulation matrices this crate assembles are small (one row
//! per conductor), dense, and strongly diagonally dominant, so an unpivoted
//! Crout factorization is adequate and cheap to reuse across the many
//! right-hand sides of a time sweep.
//!
//! # References
//!
//! - Press, Teukolsky, Vetterling & Flannery (2007). "Numerical Recipes"
//!   (3rd ed), Section 2.3. Cambridge University Press.
//! - Cheney & Kincaid (2008). "Numerical Mathematics and Computing"
//!   (6th ed), Section 8.1. Brooks/Cole.

use nalgebra::{DMatrix, DVector};

use crate::errors::{LineEmfError, Result};
use crate::math::Scalar;

/// Pivots smaller than this magnitude are treated as numerically singular.
const PIVOT_FLOOR: Scalar = 1.0e-12;

/// Combined LU factors of a square system, produced by Crout elimination
/// without pivoting.
///
/// Both factors live in a single owned matrix: the diagonal and the entries
/// below it belong to `L`, the entries above it to a unit-diagonal `U`. The
/// input matrix is left untouched. Factor once per geometry and call
/// [`CroutFactors::solve`] for every right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub struct CroutFactors {
    lu: DMatrix<Scalar>,
}

impl CroutFactors {
    /// Factors a square `matrix` into combined Crout form.
    ///
    /// # Errors
    ///
    /// Returns [`LineEmfError::SingularSystem`] when a pivot is non-finite
    /// or within a small absolute floor of zero. With no pivoting this also
    /// surfaces degenerate geometry, e.g. a conductor raised onto another.
    pub fn factorize(matrix: &DMatrix<Scalar>) -> Result<Self> {
        let n = matrix.nrows();
        debug_assert_eq!(n, matrix.ncols());
        let mut lu = DMatrix::zeros(n, n);
        for i in 0..n {
            // Column i on and below the diagonal; (i, i) is the pivot.
            for j in i..n {
                let mut sum = 0.0;
                for k in 0..i {
                    sum += lu[(j, k)] * lu[(k, i)];
                }
                lu[(j, i)] = matrix[(j, i)] - sum;
            }
            let pivot = lu[(i, i)];
            if !pivot.is_finite() || pivot.abs() < PIVOT_FLOOR {
                return Err(LineEmfError::SingularSystem { row: i, pivot });
            }
            // Row i right of the diagonal, scaled by the pivot.
            for j in (i + 1)..n {
                let mut sum = 0.0;
                for k in 0..i {
                    sum += lu[(i, k)] * lu[(k, j)];
                }
                lu[(i, j)] = (matrix[(i, j)] - sum) / pivot;
            }
        }
        Ok(Self { lu })
    }

    /// Dimension of the factored system.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.lu.nrows()
    }

    /// Solves `A x = b` for the factored `A`.
    ///
    /// Forward substitution divides by the stored diagonal pivots; backward
    /// substitution runs against the implicit unit diagonal of `U`. Only the
    /// returned vector is allocated.
    #[must_use]
    pub fn solve(&self, rhs: &DVector<Scalar>) -> DVector<Scalar> {
        let n = self.dim();
        debug_assert_eq!(n, rhs.len());
        let mut x = DVector::zeros(n);
        for i in 0..n {
            let mut sum = 0.0;
            for k in 0..i {
                sum += self.lu[(i, k)] * x[k];
            }
            x[i] = (rhs[i] - sum) / self.lu[(i, i)];
        }
        for i in (0..n).rev() {
            let mut sum = 0.0;
            for k in (i + 1)..n {
                sum += self.lu[(i, k)] * x[k];
            }
            x[i] -= sum;
        }
        x
    }
}
