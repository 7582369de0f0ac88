use approx::assert_relative_eq;
use nalgebra::DMatrix;
use polytraj::{MatrixTrajectory, PiecewisePolynomial, Polynomial, TrajectoryError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Continuous ramp f(t) = t split over [0, 1] and [1, 2].
fn two_segment_ramp() -> PiecewisePolynomial {
    PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::new(&[0.0, 1.0]), Polynomial::new(&[1.0, 1.0])],
        vec![0.0, 1.0, 2.0],
    )
    .unwrap()
}

/// Random cubic segments stitched so the value is continuous at every
/// breakpoint.
fn random_continuous_trajectory(rng: &mut StdRng, segments: usize) -> PiecewisePolynomial {
    let mut breaks = vec![0.0];
    for _ in 0..segments {
        let last = *breaks.last().unwrap();
        breaks.push(last + rng.gen_range(0.3..1.5));
    }

    let mut polynomials = Vec::with_capacity(segments);
    let mut value = rng.gen_range(-1.0..1.0);
    for segment in 0..segments {
        let coefficients = [
            value,
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        let p = Polynomial::new(&coefficients);
        value = p.evaluate(breaks[segment + 1] - breaks[segment]);
        polynomials.push(p);
    }
    PiecewisePolynomial::from_scalar_segments(polynomials, breaks).unwrap()
}

#[test]
fn derivative_then_integral_recovers_continuous_trajectories() {
    let mut rng = StdRng::seed_from_u64(17);
    for round in 0..20 {
        let trajectory = random_continuous_trajectory(&mut rng, 6);
        let start = trajectory
            .scalar_value_at(trajectory.start_time(), 0, 0)
            .unwrap();
        let rebuilt = trajectory.derivative(1).integral(start);
        assert!(
            rebuilt.is_approx(&trajectory, 1e-9),
            "round trip diverged in round {round}"
        );

        // Values agree at every breakpoint and at interior samples too.
        let mut samples: Vec<f64> = trajectory.breakpoints().to_vec();
        samples.extend(
            trajectory
                .breakpoints()
                .windows(2)
                .map(|w| 0.5 * (w[0] + w[1])),
        );
        for t in samples {
            assert_relative_eq!(
                rebuilt.scalar_value_at(t, 0, 0).unwrap(),
                trajectory.scalar_value_at(t, 0, 0).unwrap(),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn integral_is_continuous_even_when_the_source_is_not() {
    // Unit step up to 3 at t = 1; the running area must not jump.
    let step = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::constant(1.0), Polynomial::constant(3.0)],
        vec![0.0, 1.0, 2.0],
    )
    .unwrap();
    let area = step.integral(0.0);
    assert_eq!(area.get_polynomial(0, 0, 0).unwrap().coefficients(), &[0.0, 1.0]);
    assert_eq!(area.get_polynomial(1, 0, 0).unwrap().coefficients(), &[1.0, 3.0]);

    let mut rng = StdRng::seed_from_u64(29);
    for _ in 0..10 {
        // No continuity stitching here: adjacent segments disagree at the
        // breakpoints, but their antiderivatives may not.
        let mut breaks = vec![0.0];
        let mut polynomials = Vec::new();
        for _ in 0..5 {
            let last = *breaks.last().unwrap();
            breaks.push(last + rng.gen_range(0.2..1.0));
            polynomials.push(Polynomial::new(&[
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
            ]));
        }
        let rough = PiecewisePolynomial::from_scalar_segments(polynomials, breaks).unwrap();
        let smooth = rough.integral(rng.gen_range(-1.0..1.0));
        for segment in 1..smooth.segment_count() {
            let width = smooth.segment_duration(segment - 1).unwrap();
            let left = smooth.get_polynomial(segment - 1, 0, 0).unwrap().evaluate(width);
            let right = smooth.get_polynomial(segment, 0, 0).unwrap().evaluate(0.0);
            assert_relative_eq!(left, right, epsilon = 1e-12);
        }
    }
}

#[test]
fn integral_matrix_threads_per_entry_start_values() {
    let trajectory = PiecewisePolynomial::from_matrix_segments(
        vec![DMatrix::from_vec(
            2,
            1,
            vec![Polynomial::constant(1.0), Polynomial::new(&[0.0, 2.0])],
        )],
        vec![0.0, 3.0],
    )
    .unwrap();
    let start = DMatrix::from_vec(2, 1, vec![10.0, -1.0]);
    let integrated = trajectory.integral_matrix(&start).unwrap();

    // d/dt(10 + t) = 1 and d/dt(-1 + t^2) = 2t.
    assert_eq!(
        integrated.get_polynomial(0, 0, 0).unwrap().coefficients(),
        &[10.0, 1.0]
    );
    assert_eq!(
        integrated.get_polynomial(0, 1, 0).unwrap().coefficients(),
        &[-1.0, 0.0, 1.0]
    );
    assert_eq!(integrated.value_at(0.0), start);
}

#[test]
fn out_of_domain_times_use_the_boundary_segments() {
    let trajectory = two_segment_ramp();
    // The boundary polynomials keep going in both directions.
    assert_eq!(trajectory.scalar_value_at(-1.0, 0, 0).unwrap(), -1.0);
    assert_eq!(trajectory.scalar_value_at(3.0, 0, 0).unwrap(), 3.0);

    // With a constant first segment, pre-domain times match f(t_0).
    let hold = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::constant(4.0), Polynomial::new(&[4.0, 1.0])],
        vec![0.0, 1.0, 2.0],
    )
    .unwrap();
    assert_eq!(
        hold.scalar_value_at(-5.0, 0, 0).unwrap(),
        hold.scalar_value_at(0.0, 0, 0).unwrap()
    );
}

#[test]
fn shift_right_moves_breakpoints_only_and_inverts_exactly() {
    let mut trajectory = two_segment_ramp();
    let original = trajectory.clone();

    trajectory.shift_right(0.75);
    assert_eq!(trajectory.breakpoints(), &[0.75, 1.75, 2.75]);
    assert_eq!(
        trajectory.get_polynomial_matrix(0).unwrap(),
        original.get_polynomial_matrix(0).unwrap()
    );
    assert_eq!(
        trajectory.scalar_value_at(1.25, 0, 0).unwrap(),
        original.scalar_value_at(0.5, 0, 0).unwrap()
    );

    trajectory.shift_right(-0.75);
    assert_eq!(trajectory, original);
}

#[test]
fn addition_aligns_mismatched_breakpoints() {
    // The same function partitioned two ways; the sum must be 2t.
    let coarse = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::new(&[0.0, 1.0])],
        vec![0.0, 2.0],
    )
    .unwrap();
    let fine = two_segment_ramp();

    let sum = coarse.try_add(&fine).unwrap();
    assert_eq!(sum.breakpoints(), &[0.0, 1.0, 2.0]);
    for t in [0.0, 0.25, 1.0, 1.6, 2.0] {
        assert_relative_eq!(
            sum.scalar_value_at(t, 0, 0).unwrap(),
            2.0 * t,
            epsilon = 1e-12
        );
    }
}

#[test]
fn combination_is_restricted_to_the_domain_overlap() {
    let early = two_segment_ramp(); // f(t) = t on [0, 2]
    let late = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::new(&[0.0, 1.0])],
        vec![1.0, 3.0],
    )
    .unwrap(); // g(t) = t - 1 on [1, 3]

    let sum = early.try_add(&late).unwrap();
    assert_eq!(sum.breakpoints(), &[1.0, 2.0]);
    assert_relative_eq!(
        sum.scalar_value_at(1.5, 0, 0).unwrap(),
        1.5 + 0.5,
        epsilon = 1e-12
    );
}

#[test]
fn union_of_interior_breakpoints_partitions_the_sum() {
    let a = two_segment_ramp();
    let b = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::constant(1.0), Polynomial::constant(2.0)],
        vec![0.0, 0.5, 2.0],
    )
    .unwrap();
    let sum = a.try_add(&b).unwrap();
    assert_eq!(sum.breakpoints(), &[0.0, 0.5, 1.0, 2.0]);
    assert_relative_eq!(sum.scalar_value_at(0.25, 0, 0).unwrap(), 1.25, epsilon = 1e-12);
    assert_relative_eq!(sum.scalar_value_at(0.75, 0, 0).unwrap(), 2.75, epsilon = 1e-12);
    assert_relative_eq!(sum.scalar_value_at(1.5, 0, 0).unwrap(), 3.5, epsilon = 1e-12);
}

#[test]
fn disjoint_and_touching_domains_refuse_to_combine() {
    let a = two_segment_ramp(); // [0, 2]
    let b = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::constant(1.0)],
        vec![5.0, 6.0],
    )
    .unwrap();
    assert!(matches!(
        a.try_add(&b),
        Err(TrajectoryError::DisjointDomains { .. })
    ));

    // Sharing only the endpoint t = 2 leaves no interval to carry a segment.
    let touching = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::constant(1.0)],
        vec![2.0, 4.0],
    )
    .unwrap();
    assert!(matches!(
        a.try_add(&touching),
        Err(TrajectoryError::DisjointDomains { .. })
    ));
}

#[test]
fn multiplication_is_the_matrix_product() {
    // [t  1] * [2  t]^T = 2t + t = 3t, a 1x1 result.
    let row = PiecewisePolynomial::from_matrix_segments(
        vec![DMatrix::from_vec(
            1,
            2,
            vec![Polynomial::new(&[0.0, 1.0]), Polynomial::constant(1.0)],
        )],
        vec![0.0, 2.0],
    )
    .unwrap();
    let col = PiecewisePolynomial::from_matrix_segments(
        vec![DMatrix::from_vec(
            2,
            1,
            vec![Polynomial::constant(2.0), Polynomial::new(&[0.0, 1.0])],
        )],
        vec![0.0, 2.0],
    )
    .unwrap();

    let product = row.try_mul(&col).unwrap();
    assert_eq!((product.rows(), product.cols()), (1, 1));
    assert_eq!(
        product.get_polynomial(0, 0, 0).unwrap().coefficients(),
        &[0.0, 3.0]
    );

    // Inner dimensions must agree; 1x2 times 1x2 does not.
    assert!(matches!(
        row.try_mul(&row),
        Err(TrajectoryError::ShapeMismatch { .. })
    ));
    // Addition instead requires identical shapes.
    assert!(matches!(
        row.try_add(&col),
        Err(TrajectoryError::ShapeMismatch { .. })
    ));
}

#[test]
fn scalar_product_scales_values_everywhere() {
    let trajectory = two_segment_ramp();
    let gain = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::constant(2.0)],
        vec![0.0, 2.0],
    )
    .unwrap();
    let scaled = trajectory.try_mul(&gain).unwrap();
    assert_eq!(scaled.breakpoints(), &[0.0, 1.0, 2.0]);
    for t in [0.0, 0.5, 1.0, 1.7, 2.0] {
        assert_relative_eq!(
            scaled.scalar_value_at(t, 0, 0).unwrap(),
            2.0 * t,
            epsilon = 1e-12
        );
    }
}

#[test]
fn approx_equality_tracks_the_tolerance() {
    let base = two_segment_ramp();
    let eps = 1e-6;

    let nudged_coefficient = PiecewisePolynomial::from_scalar_segments(
        vec![
            Polynomial::new(&[eps / 2.0, 1.0]),
            Polynomial::new(&[1.0, 1.0]),
        ],
        vec![0.0, 1.0, 2.0],
    )
    .unwrap();
    assert!(base.is_approx(&nudged_coefficient, eps));
    assert!(!base.is_approx(&nudged_coefficient, eps / 4.0));

    let nudged_breakpoint = PiecewisePolynomial::from_scalar_segments(
        vec![Polynomial::new(&[0.0, 1.0]), Polynomial::new(&[1.0, 1.0])],
        vec![0.0, 1.0 + eps / 2.0, 2.0],
    )
    .unwrap();
    assert!(base.is_approx(&nudged_breakpoint, eps));
    assert!(!base.is_approx(&nudged_breakpoint, eps / 4.0));
}

#[test]
fn shape_queries_work_through_the_trait() {
    fn describe(trajectory: &dyn MatrixTrajectory) -> (usize, usize) {
        (trajectory.rows(), trajectory.cols())
    }

    let arc = PiecewisePolynomial::from_matrix_segments(
        vec![DMatrix::from_element(2, 3, Polynomial::constant(0.0))],
        vec![0.0, 1.0],
    )
    .unwrap();
    assert_eq!(describe(&arc), (2, 3));
    assert_eq!(arc.segment_polynomial_degree(0, 1, 2).unwrap(), 0);
}
