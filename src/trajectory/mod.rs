//! Matrix-valued trajectory representations
//!
//! The concrete piecewise representation lives in [`piecewise`]; this
//! module holds the capability trait shared by matrix-valued trajectory
//! types.

use crate::error::TrajectoryError;

/// Shape and degree queries for a matrix-valued trajectory.
///
/// Implementors report the fixed shape of the value matrix and the stored
/// polynomial degree of any one segment entry, without exposing how
/// segments are represented.
pub trait MatrixTrajectory {
    /// Number of rows of the value matrix.
    fn rows(&self) -> usize;

    /// Number of columns of the value matrix.
    fn cols(&self) -> usize;

    /// Degree of the polynomial stored at entry `(row, col)` of segment
    /// `segment`.
    fn segment_polynomial_degree(
        &self,
        segment: usize,
        row: usize,
        col: usize,
    ) -> Result<usize, TrajectoryError>;
}

pub mod piecewise;

pub use piecewise::PiecewisePolynomial;
