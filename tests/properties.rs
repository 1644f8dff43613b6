use darboux::{compute_sums, insert_point, refine_equidistant, widest_subinterval, Function};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A sorted partition of `[a, a + len]` with the given interior fractions.
fn partition(a: f64, len: f64, mut fractions: Vec<f64>) -> Vec<f64> {
    fractions.sort_by(|x, y| x.partial_cmp(y).unwrap());
    fractions.dedup();
    let mut points = vec![a];
    points.extend(fractions.iter().map(|t| a + t * len));
    points.push(a + len);
    points
}

fn function() -> impl Strategy<Value = Function> {
    prop_oneof![
        Just(Function::Square),
        Just(Function::Sine),
        Just(Function::ExpSinPlusSquare),
        Just(Function::Cubic),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64, .. ProptestConfig::default()
    })]

    #[test]
    fn lower_never_exceeds_upper(
        f in function(),
        a in -3.0f64..3.0,
        len in 0.1f64..4.0,
        fractions in prop::collection::vec(0.01f64..0.99, 0..20)
    ) {
        let (_, d) = compute_sums(partition(a, len, fractions), &f);
        prop_assert!(d.lower_sum <= d.upper_sum, "lower={}, upper={}", d.lower_sum, d.upper_sum);
    }

    #[test]
    fn full_recomputation_is_deterministic(
        f in function(),
        fractions in prop::collection::vec(0.01f64..0.99, 0..20)
    ) {
        let (points, first) = compute_sums(partition(-1., 3., fractions), &f);
        let (_, second) = compute_sums(points, &f);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn incremental_matches_full(
        f in function(),
        a in -2.0f64..2.0,
        len in 0.1f64..3.0,
        fractions in prop::collection::vec(0.01f64..0.99, 0..10),
        seed in any::<u64>()
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let (points, details) = compute_sums(partition(a, len, fractions), &f);
        let n = points.len();
        let (points, incremental) = insert_point(points, &f, &details, &mut rng).unwrap();
        prop_assert_eq!(points.len(), n + 1);

        let (points, full) = compute_sums(points, &f);
        let scale = 1. + full.upper_sum.abs().max(full.lower_sum.abs());
        prop_assert!((incremental.lower_sum - full.lower_sum).abs() < 1e-10 * scale);
        prop_assert!((incremental.upper_sum - full.upper_sum).abs() < 1e-10 * scale);
        prop_assert_eq!(incremental.max_subinterval_index, widest_subinterval(&points));
    }

    #[test]
    fn equidistant_refinement_adds_one_point(
        a in -5.0f64..5.0,
        len in 0.1f64..5.0,
        fractions in prop::collection::vec(0.01f64..0.99, 0..10)
    ) {
        let points = partition(a, len, fractions);
        let refined = refine_equidistant(&points);
        prop_assert_eq!(refined.len(), points.len() + 1);
        prop_assert_eq!(refined[0], a);
        prop_assert!((refined[refined.len() - 1] - (a + len)).abs() < 1e-12);
        prop_assert!(refined.windows(2).all(|w| w[0] < w[1]));
    }
}
