use crate::error::MatrixShapeError;

/// Simulated trajectories laid out day-major: `rows[day][simulation]`.
///
/// Row 0 holds the initial, pre-simulation value of every trajectory, so a
/// run over `num_days` steps has `num_days + 1` rows. Once constructed the
/// matrix is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryMatrix {
    rows: Vec<Vec<f64>>,
    simulations: usize,
}

impl TrajectoryMatrix {
    /// Validate and wrap raw server rows.
    ///
    /// Rejects an empty matrix, a day with zero simulations (the mean would
    /// be undefined) and rows of unequal length.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, MatrixShapeError> {
        let first = rows.first().ok_or(MatrixShapeError::NoDays)?;
        let simulations = first.len();

        for (day, row) in rows.iter().enumerate() {
            if row.is_empty() {
                return Err(MatrixShapeError::EmptyDay { day });
            }
            if row.len() != simulations {
                return Err(MatrixShapeError::RaggedRow {
                    day,
                    expected: simulations,
                    found: row.len(),
                });
            }
        }

        Ok(TrajectoryMatrix { rows, simulations })
    }

    /// Number of day rows (N).
    pub fn days(&self) -> usize {
        self.rows.len()
    }

    /// Number of simulations per day (M).
    pub fn simulations(&self) -> usize {
        self.simulations
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn day(&self, day: usize) -> Option<&[f64]> {
        self.rows.get(day).map(Vec::as_slice)
    }

    /// One trajectory, i.e. the values of a single simulation across all days.
    pub fn column(&self, simulation: usize) -> Option<Vec<f64>> {
        if simulation >= self.simulations {
            return None;
        }
        Some(self.rows.iter().map(|row| row[simulation]).collect())
    }

    /// Index of the last day, the upper bound of every valid day query.
    pub fn last_day(&self) -> usize {
        self.rows.len() - 1
    }
}

impl TryFrom<Vec<Vec<f64>>> for TrajectoryMatrix {
    type Error = MatrixShapeError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_matrix() {
        assert_eq!(TrajectoryMatrix::new(vec![]), Err(MatrixShapeError::NoDays));
    }

    #[test]
    fn test_rejects_day_without_simulations() {
        let err = TrajectoryMatrix::new(vec![vec![]]).unwrap_err();
        assert_eq!(err, MatrixShapeError::EmptyDay { day: 0 });
    }

    #[test]
    fn test_rejects_ragged_rows() {
        let err = TrajectoryMatrix::new(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            MatrixShapeError::RaggedRow {
                day: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_column_reads_across_days() {
        let m = TrajectoryMatrix::new(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!(m.days(), 3);
        assert_eq!(m.simulations(), 2);
        assert_eq!(m.last_day(), 2);
        assert_eq!(m.column(1), Some(vec![2.0, 4.0, 6.0]));
        assert_eq!(m.column(2), None);
    }
}
