use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matrix::Matrix;

/// Non-empty, rectangular set of observations. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    points: Matrix,
}

impl Dataset {
    pub fn new(points: Matrix) -> Result<Self> {
        if points.is_empty() || points.cols() == 0 {
            return Err(Error::EmptyDataset);
        }
        check_values(&points)?;
        Ok(Self { points })
    }

    pub fn from_rows<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<f64>>,
    {
        Self::new(Matrix::from_rows(rows)?)
    }

    /// Loads a tab-separated file, one observation per line.
    pub fn load_tsv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_tsv(BufReader::new(file))
    }

    /// Parses tab-separated rows. Blank lines are skipped; line and column
    /// numbers in errors are 1-based and refer to the physical input.
    pub fn parse_tsv<R: BufRead>(reader: R) -> Result<Self> {
        let mut data = Vec::new();
        let mut dim: Option<usize> = None;
        let mut rows = 0usize;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let start = data.len();
            for (col, field) in trimmed.split('\t').enumerate() {
                let field = field.trim();
                let value: f64 = field.parse().map_err(|_| Error::Parse {
                    line: idx + 1,
                    column: col + 1,
                    value: field.to_string(),
                })?;
                data.push(value);
            }
            let got = data.len() - start;
            let expected = *dim.get_or_insert(got);
            if got != expected {
                return Err(Error::Ragged {
                    line: idx + 1,
                    expected,
                    got,
                });
            }
            check_row(&data[start..], idx + 1, max_magnitude(expected))?;
            rows += 1;
        }
        Self::new(Matrix::from_flat(rows, dim.unwrap_or(0), data)?)
    }

    pub fn write_tsv<W: Write>(&self, mut out: W) -> Result<()> {
        for row in self.points.iter_rows() {
            let line: Vec<String> = row.iter().map(f64::to_string).collect();
            writeln!(out, "{}", line.join("\t"))?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.points.cols()
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        self.points.row(i)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.points.iter_rows()
    }

    pub fn bounds(&self) -> Vec<(f64, f64)> {
        self.points.column_bounds()
    }

    pub fn points(&self) -> &Matrix {
        &self.points
    }
}

/// Largest coordinate magnitude accepted for `dim`-dimensional data. Below
/// it the squared Euclidean and squared Manhattan distance between any two
/// admissible points stay finite.
pub fn max_magnitude(dim: usize) -> f64 {
    f64::MAX.sqrt() / 4.0 / dim.max(1) as f64
}

/// Rejects non-finite or oversized values; errors name the 1-based row.
pub(crate) fn check_values(points: &Matrix) -> Result<()> {
    let limit = max_magnitude(points.cols());
    for (i, row) in points.iter_rows().enumerate() {
        check_row(row, i + 1, limit)?;
    }
    Ok(())
}

fn check_row(row: &[f64], line: usize, limit: f64) -> Result<()> {
    for (col, &value) in row.iter().enumerate() {
        if !value.is_finite() {
            return Err(Error::NonFinite {
                line,
                column: col + 1,
            });
        }
        if value.abs() > limit {
            return Err(Error::OutOfRange {
                line,
                column: col + 1,
                value,
                limit,
            });
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub seed: u64,
    pub dim: usize,
    pub clusters: usize,
    pub points: usize,
    /// Half-width of the uniform noise added around each blob center.
    pub spread: f64,
    /// Blob centers are drawn from `[-extent, extent]` per feature.
    pub extent: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_1234_ABCD,
            dim: 2,
            clusters: 4,
            points: 80,
            spread: 1.0,
            extent: 10.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SyntheticDataset {
    pub data: Dataset,
    pub centers: Matrix,
    /// Blob each observation was drawn from.
    pub labels: Vec<usize>,
}

pub fn generate_synthetic(config: &SyntheticConfig) -> Result<SyntheticDataset> {
    if config.clusters == 0 || config.clusters > config.points {
        return Err(Error::InvalidClusterCount {
            k: config.clusters,
            observations: config.points,
        });
    }
    if config.dim == 0 {
        return Err(Error::EmptyDataset);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut centers = Matrix::zeros(config.clusters, config.dim);
    for c in 0..config.clusters {
        for v in centers.row_mut(c) {
            *v = rng.gen_range(-config.extent..=config.extent);
        }
    }

    let mut rows = Vec::with_capacity(config.points);
    let mut labels = Vec::with_capacity(config.points);
    for i in 0..config.points {
        let c = i % config.clusters;
        let row: Vec<f64> = centers
            .row(c)
            .iter()
            .map(|&x| x + rng.gen_range(-config.spread..=config.spread))
            .collect();
        rows.push(row);
        labels.push(c);
    }

    Ok(SyntheticDataset {
        data: Dataset::from_rows(rows)?,
        centers,
        labels,
    })
}
