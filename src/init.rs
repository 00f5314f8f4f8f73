//! Initial centroid placement.

use rand::seq::index;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::matrix::Matrix;

pub trait CentroidInitializer {
    /// Produces a `k x data.dim()` centroid matrix. Callers guarantee
    /// `1 <= k <= data.len()`.
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Result<Matrix>;
}

/// Draws every centroid coordinate uniformly from that feature's observed
/// `[min, max]` range.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomInRange;

impl CentroidInitializer for RandomInRange {
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Result<Matrix> {
        let bounds = data.bounds();
        let mut centroids = Matrix::zeros(k, data.dim());
        for (j, (min, max)) in bounds.into_iter().enumerate() {
            for c in 0..k {
                centroids.row_mut(c)[j] = lerp(min, max, rng.gen::<f64>());
            }
        }
        Ok(centroids)
    }
}

/// Point at fraction `u` of `[min, max]`. Never forms `max - min`, which
/// overflows once the bounds span more than `f64::MAX`.
fn lerp(min: f64, max: f64, u: f64) -> f64 {
    (min * (1.0 - u) + max * u).max(min).min(max)
}

/// Uses `k` distinct observations as the starting centroids.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSample;

impl CentroidInitializer for RandomSample {
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Result<Matrix> {
        let picks = index::sample(rng, data.len(), k);
        Matrix::from_rows(picks.into_iter().map(|i| data.row(i).to_vec()))
    }
}

/// Caller-supplied centroids.
#[derive(Clone, Debug)]
pub struct Fixed(pub Matrix);

impl CentroidInitializer for Fixed {
    fn initialize(&self, data: &Dataset, k: usize, _rng: &mut dyn RngCore) -> Result<Matrix> {
        if self.0.rows() != k {
            return Err(Error::InvalidConfig(format!(
                "fixed initializer has {} centroids, expected {k}",
                self.0.rows()
            )));
        }
        if self.0.cols() != data.dim() {
            return Err(Error::DimensionMismatch {
                expected: data.dim(),
                got: self.0.cols(),
            });
        }
        Ok(self.0.clone())
    }
}

/// Built-in initializers selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitKind {
    #[default]
    Range,
    Sample,
}

impl CentroidInitializer for InitKind {
    fn initialize(&self, data: &Dataset, k: usize, rng: &mut dyn RngCore) -> Result<Matrix> {
        match self {
            InitKind::Range => RandomInRange.initialize(data, k, rng),
            InitKind::Sample => RandomSample.initialize(data, k, rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{lerp, CentroidInitializer, Fixed, RandomInRange, RandomSample};
    use crate::dataset::{max_magnitude, Dataset};
    use crate::error::Error;
    use crate::matrix::Matrix;

    fn data() -> Dataset {
        Dataset::from_rows(vec![
            vec![1.0, -5.0],
            vec![4.0, 2.0],
            vec![2.0, 0.0],
            vec![3.0, 3.0],
        ])
        .unwrap()
    }

    #[test]
    fn range_init_stays_within_bounds() {
        let data = data();
        let mut rng = StdRng::seed_from_u64(7);
        let c = RandomInRange.initialize(&data, 3, &mut rng).unwrap();
        assert_eq!((c.rows(), c.cols()), (3, 2));
        for row in c.iter_rows() {
            assert!((1.0..=4.0).contains(&row[0]), "row={row:?}");
            assert!((-5.0..=3.0).contains(&row[1]), "row={row:?}");
        }
    }

    #[test]
    fn range_init_on_constant_feature_is_constant() {
        let data = Dataset::from_rows(vec![vec![2.0, 1.0], vec![2.0, 5.0]]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let c = RandomInRange.initialize(&data, 2, &mut rng).unwrap();
        assert_eq!(c.row(0)[0], 2.0);
        assert_eq!(c.row(1)[0], 2.0);
    }

    #[test]
    fn lerp_stays_finite_across_the_whole_f64_range() {
        for u in [0.0, 0.25, 0.5, 1.0 - f64::EPSILON] {
            let v = lerp(-1e308, 1e308, u);
            assert!(v.is_finite(), "u={u} v={v}");
            assert!((-1e308..=1e308).contains(&v), "u={u} v={v}");
        }
        assert_eq!(lerp(-1e308, 1e308, 0.0), -1e308);
        assert_eq!(lerp(-1e308, 1e308, 0.5), 0.0);
        assert_eq!(lerp(0.1, 0.1, 0.7), 0.1);
    }

    #[test]
    fn range_init_at_the_magnitude_limit_stays_finite() {
        let limit = max_magnitude(1);
        let data = Dataset::from_rows(vec![vec![-limit], vec![limit]]).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let c = RandomInRange.initialize(&data, 2, &mut rng).unwrap();
        for row in c.iter_rows() {
            assert!(row[0].is_finite(), "row={row:?}");
            assert!((-limit..=limit).contains(&row[0]), "row={row:?}");
        }
    }

    #[test]
    fn sample_init_picks_distinct_observations() {
        let data = data();
        let mut rng = StdRng::seed_from_u64(3);
        let c = RandomSample.initialize(&data, 4, &mut rng).unwrap();
        let mut picked = c.to_rows();
        let mut all = data.points().to_rows();
        picked.sort_by(|a, b| a[0].total_cmp(&b[0]));
        all.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(picked, all);
    }

    #[test]
    fn fixed_init_validates_shape() {
        let data = data();
        let mut rng = StdRng::seed_from_u64(0);
        let three_d = Matrix::from_rows(vec![vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0]]).unwrap();
        let err = Fixed(three_d).initialize(&data, 2, &mut rng).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, got: 3 }));

        let one = Matrix::from_rows(vec![vec![0.0, 0.0]]).unwrap();
        assert!(Fixed(one).initialize(&data, 2, &mut rng).is_err());
    }
}
