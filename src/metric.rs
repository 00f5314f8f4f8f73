//! Dissimilarity between two feature vectors.
//!
//! Implementations must be pure, symmetric and non-negative, returning zero
//! only for identical inputs. Both arguments always have the same length.

use serde::{Deserialize, Serialize};

use crate::linalg::{l1, squared_l2};

pub trait DistanceMetric {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        squared_l2(a, b).sqrt()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Manhattan;

impl DistanceMetric for Manhattan {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        l1(a, b)
    }
}

/// Built-in metrics selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    #[default]
    Euclidean,
    Manhattan,
}

impl DistanceMetric for MetricKind {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            MetricKind::Euclidean => Euclidean.distance(a, b),
            MetricKind::Manhattan => Manhattan.distance(a, b),
        }
    }
}
