use crate::aggregator::{self, SamplingStrategy};
use crate::controller::PageView;
use crate::error::Result;
use crate::presenter::SummaryCard;
use crate::profile::PageProfile;
use crate::report::{self, HtmlCanvasBoard};
use crate::summary::SimulationResult;
use std::path::Path;

/// Save the mean trajectory next to the sampled trajectories, one row per day.
pub fn save_trajectories_csv(
    result: &SimulationResult,
    cap: usize,
    strategy: SamplingStrategy,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mean = aggregator::mean_trajectory(&result.matrix);
    let sampled = aggregator::sample_columns_with(&result.matrix, cap, strategy);

    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["day".to_string(), "mean".to_string()];
    header.extend(sampled.columns.iter().map(|c| format!("sim_{}", c)));
    wtr.write_record(&header)?;

    for (day, avg) in mean.iter().enumerate() {
        let mut row = vec![day.to_string(), format!("{:.6}", avg)];
        row.extend(sampled.series.iter().map(|s| format!("{:.6}", s[day])));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Save the rendered summary cards as a JSON array.
pub fn save_cards_json(cards: &[SummaryCard], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(cards)?)?;
    Ok(())
}

/// Save all outputs for one page to a directory:
/// `trajectories.csv`, `summary.json` and `<kind>.html`.
pub fn save_all(
    profile: &PageProfile,
    result: &SimulationResult,
    board: &HtmlCanvasBoard,
    page: &PageView,
    cap: usize,
    strategy: SamplingStrategy,
    output_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    save_trajectories_csv(result, cap, strategy, &output_dir.join("trajectories.csv"))?;
    save_cards_json(&page.cards, &output_dir.join("summary.json"))?;

    let html = report::render_page(profile, board, page);
    report::save_report(&html, &output_dir.join(format!("{}.html", profile.kind.name())))?;

    Ok(())
}
