//! Lower and upper Darboux sums over a partition of `[a, b]`, refined one point at a time.
//!
//! The extrema on every subinterval are *sampled*: each subinterval is evaluated at
//! [`SAMPLES_PER_SUBINTERVAL`] equally spaced points (endpoints included) and the smallest
//! and largest value are taken. For functions that are not monotone on a subinterval this
//! under- or overestimates the true infimum/supremum by an amount bounded by the sampling
//! density.

use rand::Rng;
#[cfg(any(feature = "use_serde", feature = "python_bindings"))]
use serde::{Deserialize, Serialize};

mod error;
mod functions;
pub mod session;

#[cfg(feature = "python_bindings")]
pub mod bindings;
#[cfg(feature = "plotting")]
pub mod plot;

pub use error::{DarbouxError, Result};
pub use functions::{BatchFunction, Function};
pub use session::{Config, PartitionMode, Report, Session};

/// Number of samples taken on every subinterval. This must stay the same for the whole
/// lifetime of a [`SumDetails`], since [`insert_point`] subtracts areas it re-samples.
pub const SAMPLES_PER_SUBINTERVAL: usize = 100;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(
    any(feature = "use_serde", feature = "python_bindings"),
    derive(Serialize, Deserialize)
)]
pub struct SumDetails {
    pub lower_sum: f64,
    pub upper_sum: f64,
    /// Index `i` of the widest subinterval `[points[i], points[i + 1]]`, first one on ties.
    pub max_subinterval_index: usize,
}

impl SumDetails {
    pub fn difference(&self) -> f64 {
        self.upper_sum - self.lower_sum
    }

    pub fn is_finite(&self) -> bool {
        self.lower_sum.is_finite() && self.upper_sum.is_finite()
    }
}

/// The sampled bounds of `f` on `[left, right]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    any(feature = "use_serde", feature = "python_bindings"),
    derive(Serialize, Deserialize)
)]
pub struct Subinterval {
    pub left: f64,
    pub right: f64,
    pub min: f64,
    pub max: f64,
}

impl Subinterval {
    #[inline]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn lower_area(&self) -> f64 {
        self.min * self.width()
    }

    #[inline]
    pub fn upper_area(&self) -> f64 {
        self.max * self.width()
    }
}

/// Reusable buffers for sampling one subinterval at a time.
struct Sampler {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Sampler {
    fn new() -> Sampler {
        Sampler {
            xs: Vec::with_capacity(SAMPLES_PER_SUBINTERVAL),
            ys: Vec::with_capacity(SAMPLES_PER_SUBINTERVAL),
        }
    }

    fn sample<F: BatchFunction + ?Sized>(&mut self, f: &F, left: f64, right: f64) -> Subinterval {
        linspace_into(left, right, SAMPLES_PER_SUBINTERVAL, &mut self.xs);
        f.evaluate(&self.xs, &mut self.ys);
        let (min, max) = extrema(&self.ys);

        Subinterval {
            left,
            right,
            min,
            max,
        }
    }
}

/// `n` equally spaced points from `a` to `b`, both included.
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(n);
    linspace_into(a, b, n, &mut out);
    out
}

fn linspace_into(a: f64, b: f64, n: usize, out: &mut Vec<f64>) {
    out.clear();
    match n {
        0 => {}
        1 => out.push(a),
        _ => {
            let step = (b - a) / (n - 1) as f64;
            out.extend((0..n - 1).map(|i| a + i as f64 * step));
            // the last sample is exactly the right endpoint
            out.push(b);
        }
    }
}

/// Minimum and maximum of the samples. A single NaN makes both NaN.
fn extrema(ys: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &y in ys {
        if y.is_nan() {
            return (f64::NAN, f64::NAN);
        }
        min = min.min(y);
        max = max.max(y);
    }
    (min, max)
}

/// `n + 1` equally spaced points over `[a, b]`.
pub fn equidistant(a: f64, b: f64, n: usize) -> Vec<f64> {
    (0..=n).map(|i| a + i as f64 * (b - a) / n as f64).collect()
}

/// Replace the partition by an equidistant one over the same range with one more point.
pub fn refine_equidistant(points: &[f64]) -> Vec<f64> {
    let a = points.iter().cloned().fold(f64::INFINITY, f64::min);
    let b = points.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    equidistant(a, b, points.len())
}

/// Index of the widest subinterval. Ties go to the first one.
pub fn widest_subinterval(points: &[f64]) -> usize {
    let mut max_width = 0.;
    let mut index = 0;
    for (i, w) in points.windows(2).enumerate() {
        let width = w[1] - w[0];
        if width > max_width {
            max_width = width;
            index = i;
        }
    }
    index
}

/// The sampled bounds on every subinterval of the partition.
pub fn subintervals<F: BatchFunction + ?Sized>(points: &[f64], f: &F) -> Vec<Subinterval> {
    let mut sampler = Sampler::new();
    points
        .windows(2)
        .map(|w| sampler.sample(f, w[0], w[1]))
        .collect()
}

/// Sample every subinterval of `points` and sum up the lower and upper areas.
///
/// Numeric faults in `f` (a pole, a NaN) are not caught and end up in the sums.
pub fn compute_sums<F: BatchFunction + ?Sized>(points: Vec<f64>, f: &F) -> (Vec<f64>, SumDetails) {
    let mut sampler = Sampler::new();
    let mut details = SumDetails::default();
    let mut max_width = 0.;

    for (i, w) in points.windows(2).enumerate() {
        let s = sampler.sample(f, w[0], w[1]);

        if s.width() > max_width {
            max_width = s.width();
            details.max_subinterval_index = i;
        }

        details.lower_sum += s.lower_area();
        details.upper_sum += s.upper_area();
    }

    (points, details)
}

/// Split the widest subinterval recorded in `details` at a uniformly drawn point and update
/// the sums by only re-sampling the affected subintervals.
///
/// `details` must be the result of [`compute_sums`] or [`insert_point`] on `points`.
pub fn insert_point<F, R>(
    mut points: Vec<f64>,
    f: &F,
    details: &SumDetails,
    rng: &mut R,
) -> Result<(Vec<f64>, SumDetails)>
where
    F: BatchFunction + ?Sized,
    R: Rng + ?Sized,
{
    if points.len() < 2 {
        return Err(DarbouxError::PartitionTooShort(points.len()));
    }

    let index = details.max_subinterval_index;
    if index >= points.len() - 1 {
        return Err(DarbouxError::SubintervalOutOfRange {
            index,
            subintervals: points.len() - 1,
        });
    }

    let mut sampler = Sampler::new();

    // remove the contribution of the subinterval that is going to be split
    let old = sampler.sample(f, points[index], points[index + 1]);
    let mut lower_sum = details.lower_sum - old.lower_area();
    let mut upper_sum = details.upper_sum - old.upper_area();

    let r: f64 = rng.gen();
    let new_point = points[index] + r * old.width();
    points.insert(index + 1, new_point);

    for i in index..index + 2 {
        let s = sampler.sample(f, points[i], points[i + 1]);
        lower_sum += s.lower_area();
        upper_sum += s.upper_area();
    }

    // the split may leave an untouched subinterval as the new widest one
    let max_subinterval_index = widest_subinterval(&points);

    Ok((
        points,
        SumDetails {
            lower_sum,
            upper_sum,
            max_subinterval_index,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn linspace_includes_endpoints() {
        let xs = linspace(0., 1., SAMPLES_PER_SUBINTERVAL);
        assert_eq!(xs.len(), SAMPLES_PER_SUBINTERVAL);
        assert_eq!(xs[0], 0.);
        assert_eq!(xs[99], 1.);
        assert_abs_diff_eq!(xs[1], 1. / 99., epsilon = 1e-15);
        assert_eq!(linspace(2., 3., 1), vec![2.]);
        assert!(linspace(2., 3., 0).is_empty());
    }

    #[test]
    fn square_on_unit_interval() {
        let (points, details) = compute_sums(vec![0., 1.], &Function::Square);
        assert_eq!(points, vec![0., 1.]);
        assert_eq!(details.lower_sum, 0.);
        assert_eq!(details.upper_sum, 1.);
        assert_eq!(details.difference(), 1.);
        assert_eq!(details.max_subinterval_index, 0);
    }

    #[test]
    fn widest_tie_goes_to_first() {
        let (_, details) = compute_sums(vec![0., 0.5, 1.], &Function::Square);
        assert_eq!(details.max_subinterval_index, 0);
        assert_eq!(widest_subinterval(&[0., 0.5, 1.]), 0);
        assert_eq!(widest_subinterval(&[0., 0.25, 1.]), 1);
        assert_eq!(widest_subinterval(&[0., 0.4, 0.6, 1.]), 0);
    }

    #[test]
    fn equidistant_growth() {
        assert_eq!(refine_equidistant(&[0., 1.]), vec![0., 0.5, 1.]);
        assert_eq!(refine_equidistant(&[0., 0.5, 1.]).len(), 4);
        assert_eq!(equidistant(-1., 1., 4), vec![-1., -0.5, 0., 0.5, 1.]);
    }

    #[test]
    fn compute_sums_is_idempotent() {
        let points = vec![-1., -0.3, 0.2, 0.9, 2.];
        let (points, first) = compute_sums(points, &Function::Cubic);
        let (_, second) = compute_sums(points, &Function::Cubic);
        assert_eq!(first, second);
    }

    #[test]
    fn too_short_partition_has_empty_sums() {
        let (_, details) = compute_sums(vec![1.], &Function::Sine);
        assert_eq!(details, SumDetails::default());
    }

    #[test]
    fn sampled_extrema_miss_interior_minimum() {
        // the 100 samples on [-1, 1] never hit x = 0
        let s = subintervals(&[-1., 1.], &Function::Square)[0];
        assert!(s.min > 0.);
        assert!(s.min < 1e-3);
        assert_eq!(s.max, 1.);
    }

    #[test]
    fn insertion_matches_full_recomputation() {
        let mut rng = StdRng::seed_from_u64(7);
        for f in &Function::ALL {
            let (mut points, mut details) = compute_sums(vec![0.5, 2.5], f);
            for _ in 0..20 {
                let (p, d) = insert_point(points, f, &details, &mut rng).unwrap();
                let (p, full) = compute_sums(p, f);
                assert_abs_diff_eq!(d.lower_sum, full.lower_sum, epsilon = 1e-9);
                assert_abs_diff_eq!(d.upper_sum, full.upper_sum, epsilon = 1e-9);
                assert_eq!(d.max_subinterval_index, full.max_subinterval_index);
                points = p;
                details = d;
            }
            assert_eq!(points.len(), 22);
            assert!(points.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn insertion_splits_widest_subinterval() {
        let mut rng = StdRng::seed_from_u64(1);
        let (points, details) = compute_sums(vec![0., 0.1, 1.], &Function::Sine);
        assert_eq!(details.max_subinterval_index, 1);
        let (points, _) = insert_point(points, &Function::Sine, &details, &mut rng).unwrap();
        assert_eq!(points.len(), 4);
        assert_eq!(points[..2], [0., 0.1]);
        assert!(points[2] >= 0.1 && points[2] < 1.);
        assert_eq!(points[3], 1.);
    }

    #[test]
    fn insertion_contract_violations() {
        let mut rng = StdRng::seed_from_u64(3);
        let details = SumDetails::default();
        assert_eq!(
            insert_point(vec![0.], &Function::Square, &details, &mut rng),
            Err(DarbouxError::PartitionTooShort(1))
        );

        let details = SumDetails {
            max_subinterval_index: 2,
            ..SumDetails::default()
        };
        assert_eq!(
            insert_point(vec![0., 0.5, 1.], &Function::Square, &details, &mut rng),
            Err(DarbouxError::SubintervalOutOfRange {
                index: 2,
                subintervals: 2
            })
        );

        let details = SumDetails {
            max_subinterval_index: usize::MAX,
            ..SumDetails::default()
        };
        assert_eq!(
            insert_point(vec![0., 1.], &Function::Square, &details, &mut rng),
            Err(DarbouxError::SubintervalOutOfRange {
                index: usize::MAX,
                subintervals: 1
            })
        );
    }

    #[test]
    fn reciprocal_pole_propagates() {
        let (_, details) = compute_sums(vec![0., 1.], &Function::Reciprocal);
        assert!(details.upper_sum.is_infinite());
        assert!(!details.is_finite());
    }

    #[test]
    fn nan_samples_propagate() {
        let f = |x: f64| if x > 0.5 { f64::NAN } else { x };
        let (_, details) = compute_sums(vec![0., 1.], &f);
        assert!(details.lower_sum.is_nan());
        assert!(details.upper_sum.is_nan());
    }
}
