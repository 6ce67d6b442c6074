//! Server response contracts and the summary view derived from them.
//!
//! The server computes the distributional statistics; they are forwarded
//! untouched. Only the matrix is validated here.

use crate::error::Result;
use crate::matrix::TrajectoryMatrix;
use serde::{Deserialize, Serialize};

/// Which simulator a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    Price,
    Inventory,
    RealStock,
}

impl SimulationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Inventory => "inventory",
            Self::RealStock => "real_stock",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSimulationResponse {
    pub simulations: Vec<Vec<f64>>,
    pub avg_final_price: f64,
    pub best_case_price: f64,
    pub worst_case_price: f64,
    /// Probability of reaching the target, null when no target was given.
    #[serde(default)]
    pub probability: Option<f64>,
    pub prob_of_loss: f64,
    pub confidence_interval_90: Interval,
    pub value_at_risk_95: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySimulationResponse {
    pub inventory_simulations: Vec<Vec<f64>>,
    pub prob_of_stockout: f64,
    pub avg_final_inventory: f64,
    pub confidence_interval_90: Interval,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealStockResponse {
    pub current_price: f64,
    pub confidence_range: Interval,
    pub prob_of_loss: f64,
    #[serde(default)]
    pub risk_level: Option<String>,
    pub historical_data: Vec<f64>,
    pub simulations: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub enum SimulationResponse {
    Price(PriceSimulationResponse),
    Inventory(InventorySimulationResponse),
    RealStock(RealStockResponse),
}

impl SimulationResponse {
    /// Decode a JSON body according to the simulator that produced it.
    pub fn decode(kind: SimulationKind, body: &str) -> Result<Self> {
        Ok(match kind {
            SimulationKind::Price => Self::Price(serde_json::from_str(body)?),
            SimulationKind::Inventory => Self::Inventory(serde_json::from_str(body)?),
            SimulationKind::RealStock => Self::RealStock(serde_json::from_str(body)?),
        })
    }

    pub fn kind(&self) -> SimulationKind {
        match self {
            Self::Price(_) => SimulationKind::Price,
            Self::Inventory(_) => SimulationKind::Inventory,
            Self::RealStock(_) => SimulationKind::RealStock,
        }
    }
}

/// Server-supplied scalars, normalized across simulators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryStatistics {
    pub current_value: Option<f64>,
    pub average_final: Option<f64>,
    pub worst_case: Option<f64>,
    pub best_case: Option<f64>,
    pub goal_probability: Option<f64>,
    /// Probability of loss or of stockout, in percent.
    pub adverse_probability: f64,
    pub confidence_interval: Option<Interval>,
    pub value_at_risk: Option<f64>,
    pub risk_label: Option<String>,
}

impl From<&PriceSimulationResponse> for SummaryStatistics {
    fn from(r: &PriceSimulationResponse) -> Self {
        SummaryStatistics {
            average_final: Some(r.avg_final_price),
            worst_case: Some(r.worst_case_price),
            best_case: Some(r.best_case_price),
            goal_probability: r.probability,
            adverse_probability: r.prob_of_loss,
            confidence_interval: Some(r.confidence_interval_90),
            value_at_risk: Some(r.value_at_risk_95),
            ..Default::default()
        }
    }
}

impl From<&InventorySimulationResponse> for SummaryStatistics {
    fn from(r: &InventorySimulationResponse) -> Self {
        SummaryStatistics {
            average_final: Some(r.avg_final_inventory),
            adverse_probability: r.prob_of_stockout,
            confidence_interval: Some(r.confidence_interval_90),
            ..Default::default()
        }
    }
}

impl From<&RealStockResponse> for SummaryStatistics {
    fn from(r: &RealStockResponse) -> Self {
        SummaryStatistics {
            current_value: Some(r.current_price),
            adverse_probability: r.prob_of_loss,
            confidence_interval: Some(r.confidence_range),
            risk_label: r.risk_level.clone(),
            ..Default::default()
        }
    }
}

/// One completed run: everything the page shows until the next run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub kind: SimulationKind,
    pub matrix: TrajectoryMatrix,
    pub summary: SummaryStatistics,
    /// Observed prices preceding the simulation (real stock only).
    pub history: Option<Vec<f64>>,
}

impl TryFrom<SimulationResponse> for SimulationResult {
    type Error = crate::error::DashboardError;

    fn try_from(response: SimulationResponse) -> Result<Self> {
        let kind = response.kind();
        let (summary, rows, history) = match response {
            SimulationResponse::Price(r) => (SummaryStatistics::from(&r), r.simulations, None),
            SimulationResponse::Inventory(r) => {
                (SummaryStatistics::from(&r), r.inventory_simulations, None)
            }
            SimulationResponse::RealStock(r) => {
                let summary = SummaryStatistics::from(&r);
                (summary, r.simulations, Some(r.historical_data))
            }
        };

        Ok(SimulationResult {
            kind,
            matrix: TrajectoryMatrix::new(rows)?,
            summary,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DashboardError;

    #[test]
    fn test_price_target_probability_may_be_null() {
        let body = r#"{
            "simulations": [[100.0, 100.0], [101.0, 99.0]],
            "avg_final_price": 100.0,
            "best_case_price": 101.0,
            "worst_case_price": 99.0,
            "probability": null,
            "prob_of_loss": 50.0,
            "confidence_interval_90": {"lower": 99.1, "upper": 100.9},
            "value_at_risk_95": 0.9
        }"#;
        let response = SimulationResponse::decode(SimulationKind::Price, body).unwrap();
        let result = SimulationResult::try_from(response).unwrap();
        assert_eq!(result.summary.goal_probability, None);
        assert_eq!(result.summary.value_at_risk, Some(0.9));
        assert_eq!(result.matrix.days(), 2);
    }

    #[test]
    fn test_ragged_server_matrix_is_a_shape_error() {
        let response = SimulationResponse::Inventory(InventorySimulationResponse {
            inventory_simulations: vec![vec![10.0, 10.0], vec![9.0]],
            prob_of_stockout: 0.0,
            avg_final_inventory: 9.0,
            confidence_interval_90: Interval {
                lower: 9.0,
                upper: 9.0,
            },
        });
        let err = SimulationResult::try_from(response).unwrap_err();
        assert!(matches!(err, DashboardError::InvalidMatrixShape(_)));
    }

    #[test]
    fn test_real_stock_keeps_history() {
        let body = r#"{
            "current_price": 187.3,
            "confidence_range": {"lower": 170.0, "upper": 205.0},
            "prob_of_loss": 41.2,
            "risk_level": "Medium",
            "historical_data": [180.0, 183.5, 187.3],
            "simulations": [[187.3, 187.3, 187.3]]
        }"#;
        let response = SimulationResponse::decode(SimulationKind::RealStock, body).unwrap();
        let result = SimulationResult::try_from(response).unwrap();
        assert_eq!(result.kind, SimulationKind::RealStock);
        assert_eq!(result.history.as_deref(), Some(&[180.0, 183.5, 187.3][..]));
        assert_eq!(result.summary.risk_label.as_deref(), Some("Medium"));
    }
}
