//! Piecewise polynomial trajectories
//!
//! A trajectory is an ordered breakpoint sequence `t_0 < t_1 < ... < t_n`
//! together with one matrix of polynomials per interval. Matrix entries are
//! expressed in the local variable `tau = t - t_i` of their own segment, so
//! shifting the whole trajectory in time never touches a coefficient.

use std::ops::{Add, AddAssign, Mul, MulAssign};

use approx::AbsDiffEq;
use log::debug;
use nalgebra::DMatrix;

use super::MatrixTrajectory;
use crate::error::TrajectoryError;
use crate::polynomial::Polynomial;

/// A matrix-valued piecewise polynomial function of time.
///
/// Construction validates breakpoint ordering, the segment/breakpoint count
/// relation, and shape uniformity across segments, so every constructed
/// value is well formed for its whole lifetime. Evaluation outside
/// `[start_time, end_time]` reuses the nearest end segment (clamped
/// extrapolation) instead of failing; callers that need strict domain
/// checking must test bounds before evaluating.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomial {
    /// Strictly increasing, one more entry than segments
    breaks: Vec<f64>,
    /// One polynomial matrix per segment, all sharing one shape
    polynomials: Vec<DMatrix<Polynomial>>,
}

impl PiecewisePolynomial {
    /// Build a trajectory from one polynomial matrix per segment and the
    /// breakpoints delimiting them.
    ///
    /// `breakpoints` must hold exactly one more entry than `matrices` and
    /// be strictly increasing, and every matrix must share one shape.
    pub fn from_matrix_segments(
        matrices: Vec<DMatrix<Polynomial>>,
        breakpoints: Vec<f64>,
    ) -> Result<Self, TrajectoryError> {
        if matrices.is_empty() || breakpoints.len() != matrices.len() + 1 {
            return Err(TrajectoryError::InvalidSegmentCount {
                segments: matrices.len(),
                breakpoints: breakpoints.len(),
            });
        }
        validate_breakpoints(&breakpoints)?;
        let (rows, cols) = matrices[0].shape();
        for matrix in &matrices[1..] {
            if matrix.shape() != (rows, cols) {
                return Err(TrajectoryError::ShapeMismatch {
                    rows_a: rows,
                    cols_a: cols,
                    rows_b: matrix.nrows(),
                    cols_b: matrix.ncols(),
                });
            }
        }
        Ok(PiecewisePolynomial {
            breaks: breakpoints,
            polynomials: matrices,
        })
    }

    /// Build a single-entry trajectory from one scalar polynomial per
    /// segment; each polynomial becomes a 1x1 matrix.
    pub fn from_scalar_segments(
        polynomials: Vec<Polynomial>,
        breakpoints: Vec<f64>,
    ) -> Result<Self, TrajectoryError> {
        let matrices = polynomials
            .into_iter()
            .map(|p| DMatrix::from_vec(1, 1, vec![p]))
            .collect();
        Self::from_matrix_segments(matrices, breakpoints)
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.polynomials.len()
    }

    /// The breakpoint sequence.
    pub fn breakpoints(&self) -> &[f64] {
        &self.breaks
    }

    /// First breakpoint.
    pub fn start_time(&self) -> f64 {
        self.breaks[0]
    }

    /// Last breakpoint.
    pub fn end_time(&self) -> f64 {
        self.breaks[self.breaks.len() - 1]
    }

    /// Width of segment `segment`.
    pub fn segment_duration(&self, segment: usize) -> Result<f64, TrajectoryError> {
        self.check_segment(segment)?;
        Ok(self.breaks[segment + 1] - self.breaks[segment])
    }

    /// Index of the segment covering `t`: the largest `i` with `t_i <= t`,
    /// clamped into `0..segment_count`.
    ///
    /// Times outside the trajectory domain resolve to the nearest end
    /// segment; that clamping is the documented extrapolation behavior of
    /// every evaluation operation. Lookup is a binary search over the
    /// breakpoints.
    pub fn segment_index_for(&self, t: f64) -> usize {
        self.breaks
            .partition_point(|&b| b <= t)
            .saturating_sub(1)
            .min(self.polynomials.len() - 1)
    }

    /// Evaluate the whole value matrix at time `t`.
    ///
    /// `t` outside the domain evaluates the nearest end segment's
    /// polynomials at the corresponding local time (extrapolation).
    pub fn value_at(&self, t: f64) -> DMatrix<f64> {
        let segment = self.segment_index_for(t);
        let tau = t - self.breaks[segment];
        self.polynomials[segment].map(|p| p.evaluate(tau))
    }

    /// Evaluate one entry of the value matrix at time `t`.
    pub fn scalar_value_at(&self, t: f64, row: usize, col: usize) -> Result<f64, TrajectoryError> {
        let segment = self.segment_index_for(t);
        let tau = t - self.breaks[segment];
        Ok(self.get_polynomial(segment, row, col)?.evaluate(tau))
    }

    /// Read-only access to one segment's polynomial matrix.
    pub fn get_polynomial_matrix(
        &self,
        segment: usize,
    ) -> Result<&DMatrix<Polynomial>, TrajectoryError> {
        self.check_segment(segment)?;
        Ok(&self.polynomials[segment])
    }

    /// Read-only access to one entry of one segment.
    pub fn get_polynomial(
        &self,
        segment: usize,
        row: usize,
        col: usize,
    ) -> Result<&Polynomial, TrajectoryError> {
        let matrix = self.get_polynomial_matrix(segment)?;
        if row >= matrix.nrows() {
            return Err(TrajectoryError::IndexOutOfRange {
                what: "row",
                index: row,
                len: matrix.nrows(),
            });
        }
        if col >= matrix.ncols() {
            return Err(TrajectoryError::IndexOutOfRange {
                what: "column",
                index: col,
                len: matrix.ncols(),
            });
        }
        Ok(&matrix[(row, col)])
    }

    /// Differentiate every entry of every segment `order` times.
    ///
    /// Breakpoints are unchanged. Entries are stored in segment-local time,
    /// so within a segment d/dt equals d/dtau and no chain-rule correction
    /// applies. Entries of degree below `order` become the zero polynomial.
    pub fn derivative(&self, order: usize) -> Self {
        let polynomials = self
            .polynomials
            .iter()
            .map(|m| m.map(|p| p.derivative(order)))
            .collect();
        PiecewisePolynomial {
            breaks: self.breaks.clone(),
            polynomials,
        }
    }

    /// Antiderivative with one shared scalar start value.
    ///
    /// Shorthand for [`PiecewisePolynomial::integral_matrix`] with every
    /// entry of the start matrix equal to `value_at_start`.
    pub fn integral(&self, value_at_start: f64) -> Self {
        let start = DMatrix::from_element(self.rows(), self.cols(), value_at_start);
        self.integral_unchecked(&start)
    }

    /// Antiderivative taking one start value per matrix entry.
    ///
    /// Segment 0 integrates with the given constants; every later segment's
    /// constants are the previous segment's antiderivative evaluated at its
    /// own duration, so the result is continuous at every interior
    /// breakpoint even when `self` is not.
    pub fn integral_matrix(
        &self,
        value_at_start: &DMatrix<f64>,
    ) -> Result<Self, TrajectoryError> {
        if value_at_start.shape() != (self.rows(), self.cols()) {
            return Err(TrajectoryError::ShapeMismatch {
                rows_a: self.rows(),
                cols_a: self.cols(),
                rows_b: value_at_start.nrows(),
                cols_b: value_at_start.ncols(),
            });
        }
        Ok(self.integral_unchecked(value_at_start))
    }

    fn integral_unchecked(&self, value_at_start: &DMatrix<f64>) -> Self {
        let mut polynomials = Vec::with_capacity(self.polynomials.len());
        let mut constants = value_at_start.clone();
        for (segment, matrix) in self.polynomials.iter().enumerate() {
            let integrated = matrix.zip_map(&constants, |p, c| p.antiderivative(c));
            let width = self.breaks[segment + 1] - self.breaks[segment];
            constants = integrated.map(|p| p.evaluate(width));
            polynomials.push(integrated);
        }
        PiecewisePolynomial {
            breaks: self.breaks.clone(),
            polynomials,
        }
    }

    /// Sum of two trajectories over the overlap of their domains.
    ///
    /// Operands must share their matrix shape. The result's breakpoints are
    /// the union of both operands' breakpoints restricted to the domain
    /// overlap; each operand's covering polynomial is re-expressed relative
    /// to every new sub-interval origin before the entrywise sum.
    pub fn try_add(&self, other: &Self) -> Result<Self, TrajectoryError> {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            return Err(self.shape_mismatch(other));
        }
        self.combined_with(other, |a, b| a + b)
    }

    /// Product of two trajectories over the overlap of their domains.
    ///
    /// This is the matrix product per sub-interval: `self.cols()` must
    /// equal `other.rows()` and the result has shape
    /// `self.rows() x other.cols()`. Breakpoint alignment works as in
    /// [`PiecewisePolynomial::try_add`].
    pub fn try_mul(&self, other: &Self) -> Result<Self, TrajectoryError> {
        if self.cols() != other.rows() {
            return Err(self.shape_mismatch(other));
        }
        self.combined_with(other, |a, b| a * b)
    }

    /// Approximate equality within absolute tolerance `tol`.
    ///
    /// True iff both trajectories have the same segment count and matrix
    /// shape, breakpoints match elementwise within `tol`, and every entry
    /// polynomial matches coefficient-wise within `tol`. Trajectories
    /// partitioned differently are never re-segmented for comparison, even
    /// when they describe the same function.
    pub fn is_approx(&self, other: &Self, tol: f64) -> bool {
        if self.segment_count() != other.segment_count()
            || self.rows() != other.rows()
            || self.cols() != other.cols()
        {
            return false;
        }
        let breaks_match = self
            .breaks
            .iter()
            .zip(other.breaks.iter())
            .all(|(a, b)| (a - b).abs() <= tol);
        breaks_match
            && self
                .polynomials
                .iter()
                .zip(other.polynomials.iter())
                .all(|(a, b)| a.abs_diff_eq(b, tol))
    }

    /// Translate the whole trajectory later in time by `offset`, in place.
    ///
    /// Only breakpoints move; coefficients are stored relative to each
    /// segment's own start and stay untouched. A negative offset shifts
    /// left.
    pub fn shift_right(&mut self, offset: f64) {
        for b in &mut self.breaks {
            *b += offset;
        }
    }

    fn check_segment(&self, segment: usize) -> Result<(), TrajectoryError> {
        if segment >= self.polynomials.len() {
            return Err(TrajectoryError::IndexOutOfRange {
                what: "segment",
                index: segment,
                len: self.polynomials.len(),
            });
        }
        Ok(())
    }

    fn shape_mismatch(&self, other: &Self) -> TrajectoryError {
        TrajectoryError::ShapeMismatch {
            rows_a: self.rows(),
            cols_a: self.cols(),
            rows_b: other.rows(),
            cols_b: other.cols(),
        }
    }

    /// Shared alignment machinery behind `try_add` and `try_mul`.
    fn combined_with<F>(&self, other: &Self, combine: F) -> Result<Self, TrajectoryError>
    where
        F: Fn(&DMatrix<Polynomial>, &DMatrix<Polynomial>) -> DMatrix<Polynomial>,
    {
        let start = self.start_time().max(other.start_time());
        let end = self.end_time().min(other.end_time());
        // A single shared point is not enough to carry a segment.
        if !(start < end) {
            return Err(TrajectoryError::DisjointDomains {
                start_a: self.start_time(),
                end_a: self.end_time(),
                start_b: other.start_time(),
                end_b: other.end_time(),
            });
        }

        let mut breaks: Vec<f64> = Vec::with_capacity(self.breaks.len() + other.breaks.len());
        breaks.push(start);
        breaks.extend(
            self.breaks
                .iter()
                .chain(other.breaks.iter())
                .copied()
                .filter(|&b| b > start && b < end),
        );
        breaks.push(end);
        breaks.sort_unstable_by(f64::total_cmp);
        breaks.dedup();

        debug!(
            "aligning {} and {} segments over [{}, {}] into {}",
            self.segment_count(),
            other.segment_count(),
            start,
            end,
            breaks.len() - 1
        );

        // Each sub-interval is covered by exactly one segment of each
        // operand, found from the sub-interval's left endpoint.
        let polynomials = breaks[..breaks.len() - 1]
            .iter()
            .map(|&left| {
                let a = self.localized_matrix(left);
                let b = other.localized_matrix(left);
                combine(&a, &b)
            })
            .collect();

        Ok(PiecewisePolynomial {
            breaks,
            polynomials,
        })
    }

    /// The covering segment's matrix re-expressed with local origin `t`.
    fn localized_matrix(&self, t: f64) -> DMatrix<Polynomial> {
        let segment = self.segment_index_for(t);
        let delta = t - self.breaks[segment];
        self.polynomials[segment].map(|p| p.translated(delta))
    }
}

impl MatrixTrajectory for PiecewisePolynomial {
    fn rows(&self) -> usize {
        self.polynomials[0].nrows()
    }

    fn cols(&self) -> usize {
        self.polynomials[0].ncols()
    }

    fn segment_polynomial_degree(
        &self,
        segment: usize,
        row: usize,
        col: usize,
    ) -> Result<usize, TrajectoryError> {
        Ok(self.get_polynomial(segment, row, col)?.degree())
    }
}

impl Add for &PiecewisePolynomial {
    type Output = PiecewisePolynomial;

    /// # Panics
    ///
    /// Panics when the operands' shapes differ or their domains do not
    /// overlap; use [`PiecewisePolynomial::try_add`] to handle those cases
    /// as errors.
    fn add(self, rhs: &PiecewisePolynomial) -> PiecewisePolynomial {
        match self.try_add(rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("trajectory addition failed: {e}"),
        }
    }
}

impl Add for PiecewisePolynomial {
    type Output = PiecewisePolynomial;

    fn add(self, rhs: PiecewisePolynomial) -> PiecewisePolynomial {
        &self + &rhs
    }
}

impl AddAssign<&PiecewisePolynomial> for PiecewisePolynomial {
    fn add_assign(&mut self, rhs: &PiecewisePolynomial) {
        *self = &*self + rhs;
    }
}

impl AddAssign for PiecewisePolynomial {
    fn add_assign(&mut self, rhs: PiecewisePolynomial) {
        *self += &rhs;
    }
}

impl Mul for &PiecewisePolynomial {
    type Output = PiecewisePolynomial;

    /// # Panics
    ///
    /// Panics when the operands' inner dimensions disagree or their domains
    /// do not overlap; use [`PiecewisePolynomial::try_mul`] to handle those
    /// cases as errors.
    fn mul(self, rhs: &PiecewisePolynomial) -> PiecewisePolynomial {
        match self.try_mul(rhs) {
            Ok(product) => product,
            Err(e) => panic!("trajectory multiplication failed: {e}"),
        }
    }
}

impl Mul for PiecewisePolynomial {
    type Output = PiecewisePolynomial;

    fn mul(self, rhs: PiecewisePolynomial) -> PiecewisePolynomial {
        &self * &rhs
    }
}

impl MulAssign<&PiecewisePolynomial> for PiecewisePolynomial {
    fn mul_assign(&mut self, rhs: &PiecewisePolynomial) {
        *self = &*self * rhs;
    }
}

impl MulAssign for PiecewisePolynomial {
    fn mul_assign(&mut self, rhs: PiecewisePolynomial) {
        *self *= &rhs;
    }
}

fn validate_breakpoints(breakpoints: &[f64]) -> Result<(), TrajectoryError> {
    for i in 1..breakpoints.len() {
        // Written so that a NaN anywhere also fails the comparison.
        if !(breakpoints[i] > breakpoints[i - 1]) {
            return Err(TrajectoryError::InvalidBreakpointOrder {
                index: i,
                previous: breakpoints[i - 1],
                value: breakpoints[i],
            });
        }
    }
    Ok(())
}
