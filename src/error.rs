//! Error taxonomy for the dashboard.
//!
//! `IndexOutOfRange` and `NoResultAvailable` come from user input against an
//! already rendered result and are turned into inline messages by the
//! presenter. Everything else aborts the operation that raised it.

use thiserror::Error;

/// Ways a trajectory matrix can violate its shape contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixShapeError {
    #[error("matrix has no days")]
    NoDays,

    #[error("day {day} has no simulations")]
    EmptyDay { day: usize },

    #[error("day {day} has {found} simulations, expected {expected}")]
    RaggedRow {
        day: usize,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("invalid trajectory matrix: {0}")]
    InvalidMatrixShape(#[from] MatrixShapeError),

    #[error("day {requested} is out of range; valid days are [0, {}]", .days.saturating_sub(1))]
    IndexOutOfRange { requested: i64, days: usize },

    #[error("no simulation has completed yet")]
    NoResultAvailable,

    #[error("a simulation is already running")]
    Busy,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("chart rendering failed: {0}")]
    Render(String),
}

impl DashboardError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// True for errors the presenter recovers inline.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. } | Self::NoResultAvailable)
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
