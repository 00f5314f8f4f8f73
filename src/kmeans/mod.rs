//! Lloyd's k-means.
//!
//! Each pass assigns every observation to its nearest centroid (ties go to
//! the lowest centroid index) and then moves each centroid to the mean of its
//! members. A run converges when a full pass changes no assignment; the first
//! pass always counts as a change.

mod options;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dataset::{check_values, Dataset};
use crate::error::{Error, Result};
use crate::init::{CentroidInitializer, InitKind};
use crate::linalg::{add_inplace, argmin, scale_inplace};
use crate::matrix::Matrix;
use crate::metric::{DistanceMetric, MetricKind};

pub use options::{EmptyClusterPolicy, KMeansOptions};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub cluster: usize,
    /// Square of the metric distance to `cluster`'s centroid.
    pub distance_sq: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct KMeansResult {
    pub centroids: Matrix,
    pub assignments: Vec<Assignment>,
    /// Centroid updates performed by the winning restart.
    pub iterations: usize,
    pub converged: bool,
    pub inertia: f64,
    pub cluster_sizes: Vec<usize>,
}

impl KMeansResult {
    pub fn labels(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.cluster).collect()
    }
}

/// State handed to an [`IterationObserver`] after every assignment pass.
#[derive(Debug)]
pub struct IterationEvent<'a> {
    pub restart: usize,
    /// 1-based pass number within the restart.
    pub pass: usize,
    /// Centroids the pass assigned against.
    pub centroids: &'a Matrix,
    pub changed: usize,
}

pub trait IterationObserver {
    fn on_pass(&mut self, event: &IterationEvent<'_>);
}

impl IterationObserver for () {
    fn on_pass(&mut self, _event: &IterationEvent<'_>) {}
}

#[derive(Clone, Debug)]
pub struct KMeans<M = MetricKind, I = InitKind> {
    options: KMeansOptions,
    metric: M,
    initializer: I,
}

impl KMeans {
    /// Engine using the metric and initializer named in `options`.
    pub fn new(options: KMeansOptions) -> Self {
        let metric = options.metric;
        let initializer = options.init;
        Self {
            options,
            metric,
            initializer,
        }
    }
}

impl<M, I> KMeans<M, I>
where
    M: DistanceMetric,
    I: CentroidInitializer,
{
    pub fn options(&self) -> &KMeansOptions {
        &self.options
    }

    pub fn with_metric<M2: DistanceMetric>(self, metric: M2) -> KMeans<M2, I> {
        KMeans {
            options: self.options,
            metric,
            initializer: self.initializer,
        }
    }

    pub fn with_initializer<I2: CentroidInitializer>(self, initializer: I2) -> KMeans<M, I2> {
        KMeans {
            options: self.options,
            metric: self.metric,
            initializer,
        }
    }

    pub fn fit(&self, data: &Dataset) -> Result<KMeansResult> {
        self.fit_with_observer(data, &mut ())
    }

    pub fn fit_with_observer(
        &self,
        data: &Dataset,
        observer: &mut dyn IterationObserver,
    ) -> Result<KMeansResult> {
        let mut rng = match self.options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.fit_with_rng(data, &mut rng, observer)
    }

    pub fn fit_with_rng(
        &self,
        data: &Dataset,
        rng: &mut dyn RngCore,
        observer: &mut dyn IterationObserver,
    ) -> Result<KMeansResult> {
        self.options.validate()?;
        let k = self.options.k;
        if k > data.len() {
            return Err(Error::InvalidClusterCount {
                k,
                observations: data.len(),
            });
        }

        let mut best: Option<KMeansResult> = None;
        for restart in 0..self.options.restarts {
            let result = self.run(data, restart, rng, observer)?;
            debug!(
                restart,
                inertia = result.inertia,
                iterations = result.iterations,
                "restart finished"
            );
            if best.as_ref().map_or(true, |b| result.inertia < b.inertia) {
                best = Some(result);
            }
        }

        best.ok_or_else(|| Error::InvalidConfig("restarts must be at least 1".to_string()))
    }

    fn run(
        &self,
        data: &Dataset,
        restart: usize,
        rng: &mut dyn RngCore,
        observer: &mut dyn IterationObserver,
    ) -> Result<KMeansResult> {
        let k = self.options.k;
        let mut centroids = self.initializer.initialize(data, k, rng)?;
        if centroids.rows() != k {
            return Err(Error::InvalidConfig(format!(
                "initializer produced {} centroids, expected {k}",
                centroids.rows()
            )));
        }
        if centroids.cols() != data.dim() {
            return Err(Error::DimensionMismatch {
                expected: data.dim(),
                got: centroids.cols(),
            });
        }
        check_values(&centroids)?;

        let mut assignments = vec![
            Assignment {
                cluster: 0,
                distance_sq: f64::INFINITY,
            };
            data.len()
        ];
        let mut iterations = 0usize;
        let mut pass = 0usize;
        let converged = loop {
            pass += 1;
            let mut changed = assign_pass(data, &centroids, &self.metric, &mut assignments);
            if pass == 1 {
                changed = data.len();
            }
            debug!(restart, pass, changed, "assignment pass");
            observer.on_pass(&IterationEvent {
                restart,
                pass,
                centroids: &centroids,
                changed,
            });

            if changed == 0 {
                break true;
            }
            if iterations >= self.options.max_iterations {
                break false;
            }
            update_centroids(
                data,
                &assignments,
                &mut centroids,
                self.options.empty_cluster,
                iterations + 1,
            )?;
            iterations += 1;
        };

        let inertia: f64 = assignments.iter().map(|a| a.distance_sq).sum();
        if converged {
            info!(restart, iterations, inertia, "k-means converged");
        } else {
            warn!(
                restart,
                max_iterations = self.options.max_iterations,
                inertia,
                "k-means stopped before convergence"
            );
        }

        let mut cluster_sizes = vec![0usize; k];
        for a in &assignments {
            cluster_sizes[a.cluster] += 1;
        }

        Ok(KMeansResult {
            centroids,
            assignments,
            iterations,
            converged,
            inertia,
            cluster_sizes,
        })
    }
}

/// Assigns every observation to its nearest centroid in `centroids`.
pub fn predict<M: DistanceMetric>(
    centroids: &Matrix,
    data: &Dataset,
    metric: &M,
) -> Result<Vec<Assignment>> {
    if centroids.is_empty() {
        return Err(Error::InvalidClusterCount {
            k: 0,
            observations: data.len(),
        });
    }
    if centroids.cols() != data.dim() {
        return Err(Error::DimensionMismatch {
            expected: data.dim(),
            got: centroids.cols(),
        });
    }
    check_values(centroids)?;
    let mut out = Vec::with_capacity(data.len());
    out.extend(data.iter().map(|row| nearest(row, centroids, metric)));
    Ok(out)
}

/// A metric that yields NaN for every centroid pins the observation to
/// cluster 0.
fn nearest<M: DistanceMetric>(row: &[f64], centroids: &Matrix, metric: &M) -> Assignment {
    let (cluster, distance) = argmin(centroids.iter_rows().map(|c| metric.distance(row, c)))
        .unwrap_or((0, f64::INFINITY));
    Assignment {
        cluster,
        distance_sq: distance * distance,
    }
}

/// Returns how many observations moved to a different cluster.
fn assign_pass<M: DistanceMetric>(
    data: &Dataset,
    centroids: &Matrix,
    metric: &M,
    assignments: &mut [Assignment],
) -> usize {
    let mut changed = 0usize;
    for (row, slot) in data.iter().zip(assignments.iter_mut()) {
        let next = nearest(row, centroids, metric);
        if next.cluster != slot.cluster {
            changed += 1;
        }
        *slot = next;
    }
    changed
}

fn update_centroids(
    data: &Dataset,
    assignments: &[Assignment],
    centroids: &mut Matrix,
    policy: EmptyClusterPolicy,
    iteration: usize,
) -> Result<()> {
    let k = centroids.rows();
    let mut sums = Matrix::zeros(k, data.dim());
    let mut counts = vec![0usize; k];
    for (row, a) in data.iter().zip(assignments) {
        add_inplace(sums.row_mut(a.cluster), row);
        counts[a.cluster] += 1;
    }

    for (cluster, &count) in counts.iter().enumerate() {
        if count == 0 {
            match policy {
                EmptyClusterPolicy::KeepPrevious => {
                    warn!(cluster, iteration, "empty cluster, keeping previous centroid");
                    continue;
                }
                EmptyClusterPolicy::Fail => {
                    return Err(Error::EmptyCluster { cluster, iteration });
                }
            }
        }
        let mean = sums.row_mut(cluster);
        scale_inplace(mean, 1.0 / count as f64);
        centroids.row_mut(cluster).copy_from_slice(mean);
    }
    Ok(())
}
