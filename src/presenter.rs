//! Maps aggregator output and server scalars onto chart specs, summary
//! cards and day details.

use crate::aggregator::{self, DayCrossSection, SampledTrajectorySet};
use crate::error::{DashboardError, Result};
use crate::format::ValueFormat;
use crate::profile::PageProfile;
use crate::summary::{SimulationResult, SummaryStatistics};
use serde::Serialize;
use serde_json::json;

const MEAN_COLOR: &str = "#00FF00";
const SAMPLE_COLOR: &str = "rgba(255, 255, 255, 0.2)";
const HISTORY_COLOR: &str = "#007bff";
const AXIS_COLOR: &str = "white";
const GRID_COLOR: &str = "rgba(255, 255, 255, 0.1)";

// ═══════════════════════════════════════════════════════════════════════
// Chart specs
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub color: String,
    pub stroke_width: f64,
    pub point_radius: f64,
    pub tension: f64,
    /// Whether the series reacts to hover and tooltips.
    pub hit_testing: bool,
    /// Draw order; lower values are painted on top.
    pub order: i32,
}

impl SeriesStyle {
    pub fn emphasized(color: &str) -> Self {
        SeriesStyle {
            color: color.to_string(),
            stroke_width: 2.0,
            point_radius: 0.0,
            tension: 0.1,
            hit_testing: true,
            order: 0,
        }
    }

    pub fn background() -> Self {
        SeriesStyle {
            color: SAMPLE_COLOR.to_string(),
            stroke_width: 1.0,
            point_radius: 0.0,
            tension: 0.0,
            hit_testing: false,
            order: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub data: Vec<f64>,
    pub style: SeriesStyle,
}

/// A line chart over day indices, independent of any charting library.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<usize>,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// Inclusive x range `[0, N-1]`.
    pub fn x_domain(&self) -> Option<(usize, usize)> {
        Some((*self.labels.first()?, *self.labels.last()?))
    }

    /// The series drawn on top of all others.
    pub fn emphasized(&self) -> Option<&Series> {
        self.series.iter().min_by_key(|s| s.style.order)
    }

    pub fn background_count(&self) -> usize {
        self.series.iter().filter(|s| !s.style.hit_testing).count()
    }

    /// Chart.js line configuration.
    pub fn to_chartjs(&self) -> serde_json::Value {
        let datasets: Vec<serde_json::Value> = self
            .series
            .iter()
            .map(|s| {
                let mut ds = json!({
                    "label": s.label,
                    "data": s.data,
                    "borderColor": s.style.color,
                    "borderWidth": s.style.stroke_width,
                    "fill": false,
                    "pointRadius": s.style.point_radius,
                    "tension": s.style.tension,
                    "order": s.style.order,
                });
                if !s.style.hit_testing {
                    ds["pointHoverRadius"] = json!(0);
                    ds["pointHitRadius"] = json!(0);
                }
                ds
            })
            .collect();

        let axis = |text: &str| {
            json!({
                "title": {"display": true, "text": text, "color": AXIS_COLOR},
                "ticks": {"color": AXIS_COLOR},
                "grid": {"color": GRID_COLOR},
            })
        };

        json!({
            "type": "line",
            "data": {"labels": self.labels, "datasets": datasets},
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "animation": false,
                "interaction": {"intersect": false, "mode": "index"},
                "scales": {"x": axis(self.x_label.as_str()), "y": axis(self.y_label.as_str())},
                "plugins": {
                    "legend": {"display": false},
                    "title": {
                        "display": true,
                        "text": self.title,
                        "color": AXIS_COLOR,
                        "font": {"size": 18},
                    },
                    "tooltip": {"enabled": true},
                },
            },
        })
    }
}

/// Mean trajectory on top of the sampled trajectories.
pub fn build_chart_spec(
    mean: &[f64],
    sampled: &SampledTrajectorySet,
    profile: &PageProfile,
) -> ChartSpec {
    let mut series = Vec::with_capacity(sampled.len() + 1);
    series.push(Series {
        label: profile.mean_label.to_string(),
        data: mean.to_vec(),
        style: SeriesStyle::emphasized(MEAN_COLOR),
    });
    for (col, data) in sampled.columns.iter().zip(&sampled.series) {
        series.push(Series {
            label: format!("Simulation {}", col + 1),
            data: data.clone(),
            style: SeriesStyle::background(),
        });
    }

    ChartSpec {
        title: profile.chart_title.to_string(),
        x_label: "Days".to_string(),
        y_label: profile.y_label.to_string(),
        labels: (0..mean.len()).collect(),
        series,
    }
}

/// Observed price history as a single line.
pub fn build_history_chart(history: &[f64], title: &str, profile: &PageProfile) -> ChartSpec {
    let mut style = SeriesStyle::emphasized(HISTORY_COLOR);
    style.tension = 0.0;
    ChartSpec {
        title: title.to_string(),
        x_label: "Days".to_string(),
        y_label: profile.y_label.to_string(),
        labels: (0..history.len()).collect(),
        series: vec![Series {
            label: "Historical Price".to_string(),
            data: history.to_vec(),
            style,
        }],
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Chart lifecycle
// ═══════════════════════════════════════════════════════════════════════

/// The charting widget: draws a spec onto a named canvas.
///
/// A handle owns one drawn chart; passing it back to `dispose` releases it.
pub trait ChartRenderer {
    type Handle;

    fn draw(&mut self, canvas: &str, spec: &ChartSpec) -> Result<Self::Handle>;

    fn dispose(&mut self, handle: Self::Handle);
}

/// The chart currently bound to one canvas.
///
/// `replace` is the only way to draw into the slot and always disposes the
/// previous chart first, so a canvas never holds more than one chart.
#[derive(Debug)]
pub struct ChartSlot<H> {
    canvas: String,
    current: Option<H>,
}

impl<H> ChartSlot<H> {
    pub fn new(canvas: impl Into<String>) -> Self {
        ChartSlot {
            canvas: canvas.into(),
            current: None,
        }
    }

    pub fn canvas(&self) -> &str {
        &self.canvas
    }

    pub fn is_drawn(&self) -> bool {
        self.current.is_some()
    }

    pub fn replace<R>(&mut self, renderer: &mut R, spec: &ChartSpec) -> Result<()>
    where
        R: ChartRenderer<Handle = H>,
    {
        self.clear(renderer);
        self.current = Some(renderer.draw(&self.canvas, spec)?);
        Ok(())
    }

    pub fn clear<R>(&mut self, renderer: &mut R)
    where
        R: ChartRenderer<Handle = H>,
    {
        if let Some(old) = self.current.take() {
            tracing::debug!(canvas = %self.canvas, "disposing previous chart");
            renderer.dispose(old);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Summary cards
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub label: String,
    pub text: String,
}

impl SummaryCard {
    fn new(label: &str, text: String) -> Self {
        SummaryCard {
            label: label.to_string(),
            text,
        }
    }
}

/// Cards for every field the server supplied; absent optionals get none.
pub fn render_summary_cards(stats: &SummaryStatistics, profile: &PageProfile) -> Vec<SummaryCard> {
    let labels = &profile.cards;
    let value = &profile.value_format;
    let pct = ValueFormat::Percent;

    let mut cards = Vec::new();
    let mut push = |label: &str, field: Option<f64>, fmt: &ValueFormat| {
        if let Some(v) = field {
            cards.push(SummaryCard::new(label, fmt.format(v)));
        }
    };

    push(labels.current_value, stats.current_value, value);
    push(labels.average_final, stats.average_final, value);
    push(labels.worst_case, stats.worst_case, value);
    push(labels.best_case, stats.best_case, value);
    push(labels.goal_probability, stats.goal_probability, &pct);
    push(labels.adverse_probability, Some(stats.adverse_probability), &pct);

    if let Some(ci) = stats.confidence_interval {
        cards.push(SummaryCard::new(
            labels.confidence_interval,
            value.format_range(ci.lower, ci.upper),
        ));
    }
    if let Some(var) = stats.value_at_risk {
        cards.push(SummaryCard::new(labels.value_at_risk, value.format(var)));
    }
    if let Some(risk) = &stats.risk_label {
        cards.push(SummaryCard::new(labels.risk_label, risk.clone()));
    }

    cards
}

// ═══════════════════════════════════════════════════════════════════════
// Day details
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum DaySliceView {
    Details { heading: String, lines: Vec<String> },
    /// Inline validation message shown in place of the details.
    Invalid(String),
}

impl DaySliceView {
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn text(&self) -> String {
        match self {
            Self::Details { heading, lines } => {
                let mut out = heading.clone();
                for line in lines {
                    out.push('\n');
                    out.push_str(line);
                }
                out
            }
            Self::Invalid(msg) => msg.clone(),
        }
    }
}

pub fn render_day_slice(section: &DayCrossSection, profile: &PageProfile) -> DaySliceView {
    let fmt = &profile.value_format;
    let noun = profile.quantity_noun;
    DaySliceView::Details {
        heading: format!("Details for Day {}", section.day),
        lines: vec![
            format!("Average {}: {}", noun, fmt.format(section.mean)),
            format!("Minimum {}: {}", noun, fmt.format(section.min)),
            format!("Maximum {}: {}", noun, fmt.format(section.max)),
        ],
    }
}

/// User-facing text for errors that are recovered inline.
pub fn validation_message(err: &DashboardError) -> Option<String> {
    match err {
        DashboardError::NoResultAvailable => Some("Please run a simulation first.".to_string()),
        DashboardError::IndexOutOfRange { days, .. } => Some(format!(
            "Invalid day. Please enter a number between 0 and {}.",
            days.saturating_sub(1)
        )),
        _ => None,
    }
}

/// Answer a typed day query against the last result, if any.
pub fn day_slice_view(
    result: Option<&SimulationResult>,
    input: &str,
    profile: &PageProfile,
) -> DaySliceView {
    let lookup = || -> Result<DayCrossSection> {
        let result = result.ok_or(DashboardError::NoResultAvailable)?;
        let day = aggregator::parse_day(input, &result.matrix)?;
        aggregator::day_slice(&result.matrix, day)
    };

    match lookup() {
        Ok(section) => render_day_slice(&section, profile),
        Err(err) => DaySliceView::Invalid(validation_message(&err).unwrap_or_else(|| err.to_string())),
    }
}
