//! Bounded-cost views over a trajectory matrix.
//!
//! Nothing here does I/O or touches the page: every function takes the
//! matrix by reference and returns a fresh value.

use crate::error::{DashboardError, Result};
use crate::matrix::TrajectoryMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Default number of individual trajectories drawn on a chart.
pub const DEFAULT_SAMPLE_CAP: usize = 20;

/// How display columns are picked. Both strategies are deterministic and
/// always include column 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingStrategy {
    /// Columns `0..k`. Not representative if the server orders simulations
    /// non-randomly.
    #[default]
    Leading,
    /// Column `i * M / k` for `i in 0..k`.
    Stride,
}

impl SamplingStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Leading => "leading",
            Self::Stride => "stride",
        }
    }

    fn indices(&self, simulations: usize, k: usize) -> Vec<usize> {
        match self {
            Self::Leading => (0..k).collect(),
            Self::Stride => (0..k).map(|i| i * simulations / k).collect(),
        }
    }
}

/// Columns selected for individual-line rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledTrajectorySet {
    pub columns: Vec<usize>,
    /// `series[i]` is the full trajectory of `columns[i]`, one value per day.
    pub series: Vec<Vec<f64>>,
}

impl SampledTrajectorySet {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Distribution of one day across all simulations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayCrossSection {
    pub day: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Day-by-day average across all simulations. Length always equals the
/// number of days.
pub fn mean_trajectory(matrix: &TrajectoryMatrix) -> Vec<f64> {
    let simulations = matrix.simulations() as f64;
    matrix
        .rows()
        .par_iter()
        .map(|row| row.iter().sum::<f64>() / simulations)
        .collect()
}

/// First `min(M, cap)` trajectories.
pub fn sample_columns(matrix: &TrajectoryMatrix, cap: usize) -> SampledTrajectorySet {
    sample_columns_with(matrix, cap, SamplingStrategy::Leading)
}

pub fn sample_columns_with(
    matrix: &TrajectoryMatrix,
    cap: usize,
    strategy: SamplingStrategy,
) -> SampledTrajectorySet {
    let k = matrix.simulations().min(cap);
    let columns = strategy.indices(matrix.simulations(), k);

    let mut series = vec![Vec::with_capacity(matrix.days()); columns.len()];
    for row in matrix.rows() {
        for (line, &col) in series.iter_mut().zip(&columns) {
            line.push(row[col]);
        }
    }

    SampledTrajectorySet { columns, series }
}

/// Mean, min and max of a single day in one pass over its values.
pub fn day_slice(matrix: &TrajectoryMatrix, day: usize) -> Result<DayCrossSection> {
    let row = matrix.day(day).ok_or(DashboardError::IndexOutOfRange {
        requested: day as i64,
        days: matrix.days(),
    })?;

    let (sum, min, max) = row.iter().fold(
        (0.0_f64, f64::INFINITY, f64::NEG_INFINITY),
        |(sum, min, max), &v| (sum + v, min.min(v), max.max(v)),
    );

    Ok(DayCrossSection {
        day,
        mean: sum / row.len() as f64,
        min,
        max,
    })
}

/// Parse a user-typed day index against the matrix's valid range.
///
/// Anything that is not an integer in `[0, N-1]` is `IndexOutOfRange`.
pub fn parse_day(input: &str, matrix: &TrajectoryMatrix) -> Result<usize> {
    let out_of_range = |requested| DashboardError::IndexOutOfRange {
        requested,
        days: matrix.days(),
    };

    let requested: i64 = input.trim().parse().map_err(|_| out_of_range(-1))?;
    if requested < 0 || requested as u64 >= matrix.days() as u64 {
        return Err(out_of_range(requested));
    }
    Ok(requested as usize)
}
