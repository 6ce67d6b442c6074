//! Per-simulator page configuration.
//!
//! The three simulator pages share one controller; everything that differs
//! between them (labels, units, canvases, endpoint) lives in a `PageProfile`.

use crate::format::ValueFormat;
use crate::summary::SimulationKind;

/// Card titles, one per summary field.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLabels {
    pub current_value: &'static str,
    pub average_final: &'static str,
    pub worst_case: &'static str,
    pub best_case: &'static str,
    pub goal_probability: &'static str,
    pub adverse_probability: &'static str,
    pub confidence_interval: &'static str,
    pub value_at_risk: &'static str,
    pub risk_label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageProfile {
    pub kind: SimulationKind,
    pub page_title: &'static str,
    pub chart_title: &'static str,
    pub y_label: &'static str,
    pub mean_label: &'static str,
    /// Noun used in day details, e.g. "Price" in "Average Price".
    pub quantity_noun: &'static str,
    /// Format of trajectory values and value-like cards.
    pub value_format: ValueFormat,
    pub cards: CardLabels,
    pub chart_canvas: &'static str,
    /// Canvas and title of the historical chart, for pages that have one.
    pub history_chart: Option<(&'static str, &'static str)>,
    pub idle_caption: &'static str,
    pub busy_caption: &'static str,
}

impl PageProfile {
    pub fn price() -> Self {
        PageProfile {
            kind: SimulationKind::Price,
            page_title: "Stock Price Simulation",
            chart_title: "Monte Carlo Stock Price Simulation",
            y_label: "Price",
            mean_label: "Average Simulation",
            quantity_noun: "Price",
            value_format: ValueFormat::dollars(),
            cards: CardLabels {
                current_value: "Current Price",
                average_final: "Average Final Price",
                worst_case: "Worst-Case Price",
                best_case: "Best-Case Price",
                goal_probability: "Probability of Reaching Target",
                adverse_probability: "Probability of Loss",
                confidence_interval: "90% Confidence Interval",
                value_at_risk: "Value at Risk (95%)",
                risk_label: "Risk Level",
            },
            chart_canvas: "simulation-chart",
            history_chart: None,
            idle_caption: "Run Simulation",
            busy_caption: "Simulating...",
        }
    }

    pub fn inventory() -> Self {
        PageProfile {
            kind: SimulationKind::Inventory,
            page_title: "Inventory Simulation",
            chart_title: "Inventory Level Simulation",
            y_label: "Inventory Level",
            mean_label: "Average Inventory",
            quantity_noun: "Inventory",
            value_format: ValueFormat::units(),
            cards: CardLabels {
                current_value: "Current Inventory",
                average_final: "Average Final Inventory",
                worst_case: "Lowest Final Inventory",
                best_case: "Highest Final Inventory",
                goal_probability: "Probability of Reaching Goal",
                adverse_probability: "Probability of Stockout",
                confidence_interval: "90% Confidence Interval",
                value_at_risk: "Inventory at Risk (95%)",
                risk_label: "Risk Level",
            },
            chart_canvas: "inventory-chart",
            history_chart: None,
            idle_caption: "Run Inventory Simulation",
            busy_caption: "Simulating...",
        }
    }

    pub fn real_stock() -> Self {
        PageProfile {
            kind: SimulationKind::RealStock,
            page_title: "Real Stock Simulation",
            chart_title: "Monte Carlo Simulation (30 Days)",
            y_label: "Price",
            mean_label: "Average Simulation",
            quantity_noun: "Price",
            value_format: ValueFormat::dollars(),
            cards: CardLabels {
                current_value: "Current Price",
                average_final: "Average Final Price",
                worst_case: "Worst-Case Price",
                best_case: "Best-Case Price",
                goal_probability: "Probability of Reaching Target",
                adverse_probability: "Probability of Loss",
                confidence_interval: "Confidence Range",
                value_at_risk: "Value at Risk (95%)",
                risk_label: "Risk Level",
            },
            chart_canvas: "simulation-chart",
            history_chart: Some(("historical-chart", "Historical Performance (6 Months)")),
            idle_caption: "Simulate",
            busy_caption: "Simulating...",
        }
    }

    pub fn for_kind(kind: SimulationKind) -> Self {
        match kind {
            SimulationKind::Price => Self::price(),
            SimulationKind::Inventory => Self::inventory(),
            SimulationKind::RealStock => Self::real_stock(),
        }
    }
}
