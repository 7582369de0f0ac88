//! Piecewise polynomial trajectories for motion planning and control
//!
//! A trajectory here is a matrix-valued function of time assembled from
//! polynomial segments: breakpoints `t_0 < t_1 < ... < t_n` partition the
//! domain, and on each interval the value is a matrix whose entries are
//! polynomials in the segment-local time `tau = t - t_i`. Local
//! coordinates keep low-order coefficients well conditioned on segments
//! far from the time origin and make time shifts free.
//!
//! Trajectories can be evaluated, differentiated, and integrated exactly,
//! and added or multiplied after their breakpoint sequences are aligned
//! over the overlap of their domains.
//!
//! ```
//! use polytraj::{PiecewisePolynomial, Polynomial};
//!
//! // f(t) = t on [0, 1], then 1 + (t - 1) on [1, 2].
//! let trajectory = PiecewisePolynomial::from_scalar_segments(
//!     vec![Polynomial::new(&[0.0, 1.0]), Polynomial::new(&[1.0, 1.0])],
//!     vec![0.0, 1.0, 2.0],
//! )?;
//!
//! assert_eq!(trajectory.scalar_value_at(1.5, 0, 0)?, 1.5);
//! assert_eq!(trajectory.derivative(1).scalar_value_at(0.5, 0, 0)?, 1.0);
//! # Ok::<(), polytraj::TrajectoryError>(())
//! ```

pub mod error;
pub mod polynomial;
pub mod trajectory;

pub use error::TrajectoryError;
pub use polynomial::Polynomial;
pub use trajectory::{MatrixTrajectory, PiecewisePolynomial};
