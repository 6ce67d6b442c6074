//! The page controller shared by all simulators.
//!
//! One controller owns one page: its trigger, its chart slots and the last
//! completed result. A run aggregates, presents and then swaps the result
//! in; nothing is read from ambient state.

use crate::aggregator::{self, SamplingStrategy, DEFAULT_SAMPLE_CAP};
use crate::client::{SimulationClient, SimulationRequest};
use crate::error::{DashboardError, Result};
use crate::presenter::{self, ChartRenderer, ChartSlot, ChartSpec, DaySliceView, SummaryCard};
use crate::profile::PageProfile;
use crate::summary::{SimulationResponse, SimulationResult};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// ═══════════════════════════════════════════════════════════════════════
// Trigger
// ═══════════════════════════════════════════════════════════════════════

/// The control that starts a run (the "Run Simulation" button).
#[derive(Debug, Clone)]
pub struct Trigger {
    enabled: Rc<Cell<bool>>,
    caption: Rc<RefCell<String>>,
    idle_caption: &'static str,
    busy_caption: &'static str,
}

impl Trigger {
    pub fn new(idle_caption: &'static str, busy_caption: &'static str) -> Self {
        Trigger {
            enabled: Rc::new(Cell::new(true)),
            caption: Rc::new(RefCell::new(idle_caption.to_string())),
            idle_caption,
            busy_caption,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn caption(&self) -> String {
        self.caption.borrow().clone()
    }

    /// Disable the control until the returned guard is dropped.
    pub fn engage(&self) -> Result<TriggerGuard> {
        if !self.enabled.get() {
            return Err(DashboardError::Busy);
        }
        self.enabled.set(false);
        *self.caption.borrow_mut() = self.busy_caption.to_string();
        Ok(TriggerGuard {
            trigger: self.clone(),
        })
    }
}

/// Re-enables the trigger on drop, on success and failure alike.
#[derive(Debug)]
pub struct TriggerGuard {
    trigger: Trigger,
}

impl Drop for TriggerGuard {
    fn drop(&mut self) {
        *self.trigger.caption.borrow_mut() = self.trigger.idle_caption.to_string();
        self.trigger.enabled.set(true);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Page state
// ═══════════════════════════════════════════════════════════════════════

/// Everything the page currently displays apart from the charts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageView {
    pub cards: Vec<SummaryCard>,
    pub day_details: Option<DaySliceView>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingOptions {
    pub cap: usize,
    pub strategy: SamplingStrategy,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        SamplingOptions {
            cap: DEFAULT_SAMPLE_CAP,
            strategy: SamplingStrategy::Leading,
        }
    }
}

pub struct Controller<C, R: ChartRenderer> {
    profile: PageProfile,
    sampling: SamplingOptions,
    client: C,
    renderer: R,
    trigger: Trigger,
    chart: ChartSlot<R::Handle>,
    history_chart: Option<ChartSlot<R::Handle>>,
    result: Option<SimulationResult>,
    page: PageView,
}

impl<C: SimulationClient, R: ChartRenderer> Controller<C, R> {
    pub fn new(profile: PageProfile, client: C, renderer: R) -> Self {
        let trigger = Trigger::new(profile.idle_caption, profile.busy_caption);
        Controller {
            chart: ChartSlot::new(profile.chart_canvas),
            history_chart: profile.history_chart.map(|(canvas, _)| ChartSlot::new(canvas)),
            profile,
            sampling: SamplingOptions::default(),
            client,
            renderer,
            trigger,
            result: None,
            page: PageView::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingOptions) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn profile(&self) -> &PageProfile {
        &self.profile
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn result(&self) -> Option<&SimulationResult> {
        self.result.as_ref()
    }

    pub fn page(&self) -> &PageView {
        &self.page
    }

    /// Fetch a new result from the server and present it.
    pub fn run(&mut self, request: &SimulationRequest) -> Result<Vec<SummaryCard>> {
        let _guard = self.trigger.engage()?;

        if request.kind() != self.profile.kind {
            let err = DashboardError::config(format!(
                "{} request sent to the {} page",
                request.kind().name(),
                self.profile.kind.name()
            ));
            return Err(self.fail("simulation request rejected", err));
        }

        let response = self
            .client
            .fetch(request)
            .map_err(|e| self.fail("simulation request failed", e))?;

        self.present_response(response)
    }

    /// Present a response obtained elsewhere, e.g. replayed from disk.
    pub fn present(&mut self, response: SimulationResponse) -> Result<Vec<SummaryCard>> {
        let _guard = self.trigger.engage()?;
        self.present_response(response)
    }

    /// Log `err` and show it on the page.
    fn fail(&mut self, context: &str, err: DashboardError) -> DashboardError {
        tracing::warn!(error = %err, "{}", context);
        self.page.error = Some(err.to_string());
        err
    }

    fn present_response(&mut self, response: SimulationResponse) -> Result<Vec<SummaryCard>> {
        if response.kind() != self.profile.kind {
            let err = DashboardError::config(format!(
                "{} response cannot be shown on the {} page",
                response.kind().name(),
                self.profile.kind.name()
            ));
            return Err(self.fail("simulation response rejected", err));
        }

        let result = SimulationResult::try_from(response)
            .map_err(|e| self.fail("rejecting simulation result", e))?;

        let matrix = &result.matrix;
        let mean = aggregator::mean_trajectory(matrix);
        let sampled = aggregator::sample_columns_with(matrix, self.sampling.cap, self.sampling.strategy);
        tracing::info!(
            days = matrix.days(),
            simulations = matrix.simulations(),
            sampled = sampled.len(),
            strategy = self.sampling.strategy.name(),
            "aggregated simulation result"
        );

        let spec = presenter::build_chart_spec(&mean, &sampled, &self.profile);
        let history_spec = match (self.profile.history_chart, &result.history) {
            (Some((_, title)), Some(history)) => {
                Some(presenter::build_history_chart(history, title, &self.profile))
            }
            _ => None,
        };
        let cards = presenter::render_summary_cards(&result.summary, &self.profile);

        // The old chart is gone once a draw fails; clear the rest of the page too.
        if let Err(err) = self.draw_charts(&spec, history_spec.as_ref()) {
            self.teardown();
            self.result = None;
            self.page = PageView::default();
            return Err(self.fail("chart rendering failed", err));
        }

        self.page = PageView {
            cards: cards.clone(),
            day_details: None,
            error: None,
        };
        self.result = Some(result);

        Ok(cards)
    }

    fn draw_charts(&mut self, spec: &ChartSpec, history: Option<&ChartSpec>) -> Result<()> {
        self.chart.replace(&mut self.renderer, spec)?;
        if let Some(slot) = self.history_chart.as_mut() {
            match history {
                Some(history) => slot.replace(&mut self.renderer, history)?,
                None => slot.clear(&mut self.renderer),
            }
        }
        Ok(())
    }

    /// Local day lookup on the last result; never fails.
    pub fn check_day(&mut self, input: &str) -> &DaySliceView {
        let view = presenter::day_slice_view(self.result.as_ref(), input, &self.profile);
        self.page.day_details.insert(view)
    }

    /// Release every chart this page has drawn.
    pub fn teardown(&mut self) {
        self.chart.clear(&mut self.renderer);
        if let Some(slot) = self.history_chart.as_mut() {
            slot.clear(&mut self.renderer);
        }
    }

    pub fn into_renderer(mut self) -> R {
        self.teardown();
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_restores_trigger() {
        let trigger = Trigger::new("Run Simulation", "Simulating...");
        {
            let _guard = trigger.engage().unwrap();
            assert!(!trigger.is_enabled());
            assert_eq!(trigger.caption(), "Simulating...");
            assert!(matches!(trigger.engage(), Err(DashboardError::Busy)));
        }
        assert!(trigger.is_enabled());
        assert_eq!(trigger.caption(), "Run Simulation");
    }
}
