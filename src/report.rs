use crate::controller::PageView;
use crate::error::Result;
use crate::presenter::{ChartRenderer, ChartSpec, DaySliceView};
use crate::profile::PageProfile;
use std::collections::BTreeMap;
use std::path::Path;

// ═══════════════════════════════════════════════════════════════════════
// Canvas board
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct MountedChart {
    id: u64,
    config: serde_json::Value,
}

/// Owns one drawn chart on an `HtmlCanvasBoard`; not `Clone`, one handle per chart.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    canvas: String,
    id: u64,
}

impl ChartHandle {
    pub fn canvas(&self) -> &str {
        &self.canvas
    }
}

/// Chart.js canvases of one HTML page.
///
/// Drawing mounts a Chart.js config on a canvas; disposing unmounts it.
/// A canvas that is drawn twice without a dispose ends up with two charts,
/// which is what `live_charts` exposes.
#[derive(Debug, Default)]
pub struct HtmlCanvasBoard {
    next_id: u64,
    canvases: BTreeMap<String, Vec<MountedChart>>,
    disposed: u64,
}

impl HtmlCanvasBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_charts(&self, canvas: &str) -> usize {
        self.canvases.get(canvas).map_or(0, Vec::len)
    }

    pub fn total_live(&self) -> usize {
        self.canvases.values().map(Vec::len).sum()
    }

    pub fn disposed(&self) -> u64 {
        self.disposed
    }

    /// Config of the most recently drawn chart on `canvas`.
    pub fn config(&self, canvas: &str) -> Option<&serde_json::Value> {
        self.canvases.get(canvas)?.last().map(|c| &c.config)
    }

    fn mounted(&self) -> impl Iterator<Item = (&str, &MountedChart)> {
        self.canvases
            .iter()
            .flat_map(|(canvas, charts)| charts.iter().map(move |c| (canvas.as_str(), c)))
    }
}

impl ChartRenderer for HtmlCanvasBoard {
    type Handle = ChartHandle;

    fn draw(&mut self, canvas: &str, spec: &ChartSpec) -> Result<ChartHandle> {
        self.next_id += 1;
        let id = self.next_id;
        self.canvases
            .entry(canvas.to_string())
            .or_default()
            .push(MountedChart {
                id,
                config: spec.to_chartjs(),
            });
        Ok(ChartHandle {
            canvas: canvas.to_string(),
            id,
        })
    }

    fn dispose(&mut self, handle: ChartHandle) {
        if let Some(charts) = self.canvases.get_mut(&handle.canvas) {
            charts.retain(|c| c.id != handle.id);
            if charts.is_empty() {
                self.canvases.remove(&handle.canvas);
            }
        }
        self.disposed += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════
// HTML helpers
// ═══════════════════════════════════════════════════════════════════════

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON safe to inline in a `<script>` block.
fn script_json(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn cards_html(page: &PageView) -> String {
    let mut html = String::new();
    for card in &page.cards {
        html.push_str(&format!(
            " <div class=\"card\"><h3>{}</h3><p>{}</p></div>\n",
            escape_html(&card.label),
            escape_html(&card.text)
        ));
    }
    html
}

fn day_details_html(details: Option<&DaySliceView>) -> String {
    match details {
        None => String::new(),
        Some(DaySliceView::Invalid(msg)) => format!("<p class=\"error\">{}</p>", escape_html(msg)),
        Some(DaySliceView::Details { heading, lines }) => {
            let mut html = format!("<h4>{}</h4>\n", escape_html(heading));
            for line in lines {
                let (label, value) = line.split_once(": ").unwrap_or((line.as_str(), ""));
                html.push_str(&format!(
                    "<p><strong>{}:</strong> {}</p>\n",
                    escape_html(label),
                    escape_html(value)
                ));
            }
            html
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Page generation
// ═══════════════════════════════════════════════════════════════════════

pub fn render_page(profile: &PageProfile, board: &HtmlCanvasBoard, page: &PageView) -> String {
    let mut chart_boxes = String::new();
    let mut chart_scripts = String::new();
    for (canvas, chart) in board.mounted() {
        let dom_id = format!("{}-{}", canvas, chart.id);
        chart_boxes.push_str(&format!(
            " <div class=\"chart-box\"><canvas id=\"{}\"></canvas></div>\n",
            escape_html(&dom_id)
        ));
        chart_scripts.push_str(&format!(
            "new Chart(document.getElementById('{}'),{});\n",
            dom_id,
            script_json(&chart.config)
        ));
    }

    let error_banner = match &page.error {
        Some(msg) => format!("<div class=\"error-banner\">{}</div>", escape_html(msg)),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<script src="https://cdn.jsdelivr.net/npm/chart.js@4"></script>
<style>
*{{margin:0;padding:0;box-sizing:border-box}}
body{{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#0f0f1a;color:#eee}}
header{{background:#1a1a2e;padding:24px 32px}}
header h1{{font-size:1.4em;font-weight:500}}
main{{max-width:1400px;margin:0 auto;padding:24px}}
section{{background:#1a1a2e;border-radius:8px;padding:24px;margin-bottom:20px}}
section h3{{font-size:1.1em;margin-bottom:16px;border-bottom:2px solid #333;padding-bottom:8px}}
.summary-cards{{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:12px}}
.card{{background:#24243e;border-radius:6px;padding:12px;text-align:center}}
.card h3{{font-size:0.75em;color:#aaa;text-transform:uppercase;letter-spacing:0.5px;border:none;margin:0;padding:0}}
.card p{{font-size:1.3em;font-weight:600;margin-top:4px}}
.chart-box{{background:#1a1a2e;border-radius:8px;padding:16px;margin-bottom:20px;height:420px}}
.error{{color:#ea4335}}
.error-banner{{background:#ea4335;color:#fff;padding:12px 16px;border-radius:6px;margin-bottom:20px}}
#day-details p{{margin-top:6px}}
footer{{text-align:center;padding:16px;color:#777;font-size:0.8em}}
</style>
</head>
<body>
<header>
 <h1>{title}</h1>
</header>
<main>
{error_banner}
{chart_boxes}
<section>
<h3>Summary</h3>
<div class="summary-cards">
{cards}</div>
</section>

<section>
<h3>Day Details</h3>
<div id="day-details">
{day_details}
</div>
</section>

</main>
<footer>Generated by mc-dashboard at {generated}</footer>

<script>
{chart_scripts}</script>
</body>
</html>"#,
        title = escape_html(profile.page_title),
        error_banner = error_banner,
        chart_boxes = chart_boxes,
        cards = cards_html(page),
        day_details = day_details_html(page.day_details.as_ref()),
        generated = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        chart_scripts = chart_scripts,
    )
}

// ═══════════════════════════════════════════════════════════════════════
// File I/O
// ═══════════════════════════════════════════════════════════════════════

pub fn save_report(html: &str, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}
