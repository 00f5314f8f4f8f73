use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::init::InitKind;
use crate::metric::MetricKind;

/// What to do with a centroid that ends a pass with no observations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClusterPolicy {
    /// Leave the centroid where it was for the next pass.
    #[default]
    KeepPrevious,
    /// Abort the run with [`Error::EmptyCluster`].
    Fail,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansOptions {
    pub k: usize,
    /// Upper bound on centroid updates per restart.
    pub max_iterations: usize,
    /// Independent initializations; the lowest-inertia run wins.
    pub restarts: usize,
    /// Seeds the run's RNG. `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub empty_cluster: EmptyClusterPolicy,
    pub metric: MetricKind,
    pub init: InitKind,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            k: 2,
            max_iterations: 300,
            restarts: 1,
            seed: None,
            empty_cluster: EmptyClusterPolicy::KeepPrevious,
            metric: MetricKind::Euclidean,
            init: InitKind::Range,
        }
    }
}

impl KMeansOptions {
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be at least 1".to_string()));
        }
        if self.restarts == 0 {
            return Err(Error::InvalidConfig(
                "restarts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let options: Self =
            serde_json::from_slice(bytes).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::{EmptyClusterPolicy, KMeansOptions};
    use crate::init::InitKind;
    use crate::metric::MetricKind;

    #[test]
    fn partial_json_keeps_defaults() {
        let opts = KMeansOptions::from_json(br#"{"k": 4, "seed": 9, "metric": "manhattan"}"#)
            .unwrap();
        assert_eq!(opts.k, 4);
        assert_eq!(opts.seed, Some(9));
        assert_eq!(opts.metric, MetricKind::Manhattan);
        assert_eq!(opts.init, InitKind::Range);
        assert_eq!(opts.max_iterations, 300);
        assert_eq!(opts.empty_cluster, EmptyClusterPolicy::KeepPrevious);
    }

    #[test]
    fn zero_restarts_is_rejected() {
        assert!(KMeansOptions::from_json(br#"{"k": 2, "restarts": 0}"#).is_err());
        assert!(KMeansOptions::from_json(br#"{"k": 0}"#).is_err());
        assert!(KMeansOptions::from_json(b"not json").is_err());
    }
}
