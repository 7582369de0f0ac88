use anyhow::Result;
use nalgebra::DMatrix;
use polytraj::{MatrixTrajectory, PiecewisePolynomial, Polynomial};

fn main() -> Result<()> {
    println!("Building a two-segment scalar trajectory...");

    // f(t) = t on [0, 1], then 1 + (t - 1) on [1, 2]; continuous ramp.
    let trajectory = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::new(&[0.0, 1.0]), Polynomial::new(&[1.0, 1.0])],
        vec![0.0, 1.0, 2.0],
    )?;

    println!(
        "shape {}x{}, {} segments, domain [{}, {}]",
        trajectory.rows(),
        trajectory.cols(),
        trajectory.segment_count(),
        trajectory.start_time(),
        trajectory.end_time()
    );
    for segment in 0..trajectory.segment_count() {
        println!(
            "  segment {} (duration {}): {}",
            segment,
            trajectory.segment_duration(segment)?,
            trajectory.get_polynomial(segment, 0, 0)?
        );
    }

    // Sampling past the domain extrapolates the end segments.
    for t in [0.0, 0.5, 1.0, 1.5, 2.0, 2.5] {
        println!("  f({t}) = {}", trajectory.scalar_value_at(t, 0, 0)?);
    }

    println!("Differentiating and integrating back...");
    let velocity = trajectory.derivative(1);
    println!("  f'(0.5) = {}", velocity.scalar_value_at(0.5, 0, 0)?);

    let rebuilt = velocity.integral(trajectory.scalar_value_at(0.0, 0, 0)?);
    println!(
        "  integral of f' recovers f: {}",
        rebuilt.is_approx(&trajectory, 1e-12)
    );

    println!("Combining trajectories with mismatched breakpoints...");
    let gain = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::constant(2.0)],
        vec![0.0, 2.0],
    )?;
    let scaled = trajectory.try_mul(&gain)?;
    println!(
        "  (f * 2)(1.5) = {} over breakpoints {:?}",
        scaled.scalar_value_at(1.5, 0, 0)?,
        scaled.breakpoints()
    );

    println!("Evaluating a matrix-valued trajectory...");
    // A planar point tracing (t, 4t - t^2) as a 2x1 column.
    let arc = PiecewisePolynomial::from_matrix_segments(
        vec![DMatrix::from_vec(
            2,
            1,
            vec![
                Polynomial::new(&[0.0, 1.0]),
                Polynomial::new(&[0.0, 4.0, -1.0]),
            ],
        )],
        vec![0.0, 4.0],
    )?;
    for t in [0.0, 1.0, 2.0, 3.0, 4.0] {
        let p = arc.value_at(t);
        println!("  position({t}) = ({}, {})", p[(0, 0)], p[(1, 0)]);
    }

    Ok(())
}
