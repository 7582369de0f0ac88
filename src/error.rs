//! Error taxonomy for trajectory construction and algebra

use thiserror::Error;

/// Errors raised by trajectory construction, combination, and indexed
/// access.
///
/// Every error is raised synchronously at the offending call; nothing is
/// retried or recovered internally, and no partial object is produced.
/// Evaluating a trajectory outside its domain is deliberately NOT an error:
/// segment lookup clamps to the nearest end segment instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    /// Breakpoints must form a strictly increasing sequence.
    #[error("breakpoint {value} at position {index} does not exceed its predecessor {previous}")]
    InvalidBreakpointOrder {
        index: usize,
        previous: f64,
        value: f64,
    },

    /// A trajectory needs exactly one more breakpoint than segments, and at
    /// least one segment.
    #[error("{breakpoints} breakpoints cannot delimit {segments} polynomial segments")]
    InvalidSegmentCount { segments: usize, breakpoints: usize },

    /// Matrix shapes disagree across segments, or are incompatible between
    /// the operands of an arithmetic combination.
    #[error("matrix shape {rows_a}x{cols_a} is incompatible with {rows_b}x{cols_b}")]
    ShapeMismatch {
        rows_a: usize,
        cols_a: usize,
        rows_b: usize,
        cols_b: usize,
    },

    /// Arithmetic was requested between trajectories whose time ranges do
    /// not overlap on an interval of positive width.
    #[error("trajectory domains [{start_a}, {end_a}] and [{start_b}, {end_b}] do not overlap")]
    DisjointDomains {
        start_a: f64,
        end_a: f64,
        start_b: f64,
        end_b: f64,
    },

    /// Segment or entry index outside the valid range of a direct-access
    /// query.
    #[error("{what} index {index} out of range (valid: 0..{len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}
