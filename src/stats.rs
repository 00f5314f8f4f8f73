//! Single-pass count / mean / mean-of-squares, shaped for a streaming
//! map-then-combine job.

use std::fmt;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanStats {
    pub count: u64,
    pub sum: f64,
    pub sum_sq: f64,
}

impl MeanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        self.sum_sq += x * x;
    }

    /// Reads one number per line. Blank lines are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut stats = Self::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let field = line.trim();
            if field.is_empty() {
                continue;
            }
            let x: f64 = field.parse().map_err(|_| Error::Parse {
                line: idx + 1,
                column: 1,
                value: field.to_string(),
            })?;
            stats.push(x);
        }
        Ok(stats)
    }

    pub fn merge(&mut self, other: &MeanStats) {
        self.count += other.count;
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
    }

    /// Zero for an empty stream.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn mean_of_squares(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum_sq / self.count as f64
        }
    }

    /// Population variance, clamped at zero against rounding.
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        (self.mean_of_squares() - mean * mean).max(0.0)
    }

    pub fn record(&self) -> MapperRecord {
        MapperRecord {
            count: self.count,
            mean: self.mean(),
            mean_of_squares: self.mean_of_squares(),
        }
    }
}

impl FromIterator<f64> for MeanStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = Self::new();
        for x in iter {
            stats.push(x);
        }
        stats
    }
}

/// One mapper output line: `count<TAB>mean<TAB>mean_of_squares`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapperRecord {
    pub count: u64,
    pub mean: f64,
    pub mean_of_squares: f64,
}

impl MapperRecord {
    /// Accepts any whitespace between the three fields. `line_no` is only
    /// used for error reporting.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(Error::Ragged {
                line: line_no,
                expected: 3,
                got: fields.len(),
            });
        }
        let bad = |column: usize| Error::Parse {
            line: line_no,
            column,
            value: fields[column - 1].to_string(),
        };
        Ok(Self {
            count: fields[0].parse().map_err(|_| bad(1))?,
            mean: fields[1].parse().map_err(|_| bad(2))?,
            mean_of_squares: fields[2].parse().map_err(|_| bad(3))?,
        })
    }

    pub fn into_stats(self) -> MeanStats {
        let n = self.count as f64;
        MeanStats {
            count: self.count,
            sum: self.mean * n,
            sum_sq: self.mean_of_squares * n,
        }
    }
}

impl fmt::Display for MapperRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.count, self.mean, self.mean_of_squares)
    }
}

/// Combines mapper lines read from `reader`. Blank lines are skipped.
pub fn reduce_records<R: BufRead>(reader: R) -> Result<MeanStats> {
    let mut total = MeanStats::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        total.merge(&MapperRecord::parse(&line, idx + 1)?.into_stats());
    }
    Ok(total)
}
