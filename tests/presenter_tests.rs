use mc_dashboard::aggregator::{day_slice, mean_trajectory, sample_columns};
use mc_dashboard::matrix::TrajectoryMatrix;
use mc_dashboard::presenter::*;
use mc_dashboard::profile::PageProfile;
use mc_dashboard::summary::{Interval, SimulationKind, SimulationResult, SummaryStatistics};

fn scenario_matrix() -> TrajectoryMatrix {
    TrajectoryMatrix::new(vec![
        vec![10.0, 20.0, 30.0, 40.0],
        vec![12.0, 18.0, 28.0, 42.0],
        vec![15.0, 15.0, 25.0, 45.0],
    ])
    .unwrap()
}

fn price_stats(goal: Option<f64>) -> SummaryStatistics {
    SummaryStatistics {
        average_final: Some(1234.5),
        worst_case: Some(80.0),
        best_case: Some(140.25),
        goal_probability: goal,
        adverse_probability: 0.5,
        confidence_interval: Some(Interval {
            lower: 90.0,
            upper: 112.5,
        }),
        value_at_risk: Some(10.0),
        ..Default::default()
    }
}

fn card<'a>(cards: &'a [SummaryCard], label: &str) -> Option<&'a str> {
    cards.iter().find(|c| c.label == label).map(|c| c.text.as_str())
}

// ═══════════════════════════════════════════════════════════════════════
// Summary cards
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_price_cards_formatting() {
    let cards = render_summary_cards(&price_stats(Some(37.0)), &PageProfile::price());

    assert_eq!(card(&cards, "Average Final Price"), Some("$1234.50"));
    assert_eq!(card(&cards, "Probability of Loss"), Some("0.50%"));
    assert_eq!(card(&cards, "Probability of Reaching Target"), Some("37.00%"));
    assert_eq!(card(&cards, "90% Confidence Interval"), Some("$90.00 - $112.50"));
    assert_eq!(card(&cards, "Value at Risk (95%)"), Some("$10.00"));
    assert_eq!(cards.len(), 7);
}

#[test]
fn test_absent_goal_probability_has_no_card() {
    let cards = render_summary_cards(&price_stats(None), &PageProfile::price());
    assert_eq!(cards.len(), 6);
    assert!(card(&cards, "Probability of Reaching Target").is_none());
    assert!(cards.iter().all(|c| !c.text.is_empty()));
}

#[test]
fn test_inventory_cards_use_units() {
    let stats = SummaryStatistics {
        average_final: Some(117.8),
        adverse_probability: 12.345,
        confidence_interval: Some(Interval {
            lower: 79.6,
            upper: 150.2,
        }),
        ..Default::default()
    };
    let cards = render_summary_cards(&stats, &PageProfile::inventory());

    let labels: Vec<&str> = cards.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Average Final Inventory", "Probability of Stockout", "90% Confidence Interval"]
    );
    assert_eq!(cards[0].text, "118 units");
    assert_eq!(cards[1].text, "12.35%");
    assert_eq!(cards[2].text, "80 - 150 units");
}

#[test]
fn test_inventory_interval_halves_round_up() {
    let stats = SummaryStatistics {
        adverse_probability: 0.0,
        confidence_interval: Some(Interval {
            lower: 80.5,
            upper: 140.5,
        }),
        ..Default::default()
    };
    let cards = render_summary_cards(&stats, &PageProfile::inventory());
    assert_eq!(card(&cards, "90% Confidence Interval"), Some("81 - 141 units"));
}

#[test]
fn test_real_stock_risk_label_is_optional() {
    let mut stats = SummaryStatistics {
        current_value: Some(187.3),
        adverse_probability: 41.2,
        confidence_interval: Some(Interval {
            lower: 170.0,
            upper: 205.0,
        }),
        risk_label: Some("High".into()),
        ..Default::default()
    };
    let profile = PageProfile::real_stock();

    let cards = render_summary_cards(&stats, &profile);
    assert_eq!(card(&cards, "Current Price"), Some("$187.30"));
    assert_eq!(card(&cards, "Confidence Range"), Some("$170.00 - $205.00"));
    assert_eq!(card(&cards, "Risk Level"), Some("High"));

    stats.risk_label = None;
    let cards = render_summary_cards(&stats, &profile);
    assert!(card(&cards, "Risk Level").is_none());
}

// ═══════════════════════════════════════════════════════════════════════
// Chart spec
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_chart_spec_layers_mean_over_samples() {
    let matrix = scenario_matrix();
    let spec = build_chart_spec(
        &mean_trajectory(&matrix),
        &sample_columns(&matrix, 2),
        &PageProfile::price(),
    );

    assert_eq!(spec.series.len(), 3);
    assert_eq!(spec.x_domain(), Some((0, 2)));
    assert_eq!(spec.x_label, "Days");
    assert_eq!(spec.y_label, "Price");

    let top = spec.emphasized().unwrap();
    assert_eq!(top.label, "Average Simulation");
    assert_eq!(top.data, vec![25.0, 25.0, 25.0]);
    assert!(top.style.stroke_width > 1.0);

    assert_eq!(spec.background_count(), 2);
    for s in &spec.series[1..] {
        assert!(!s.style.hit_testing);
        assert!(s.style.order > top.style.order);
        assert_ne!(s.style.color, top.style.color);
    }
    assert_eq!(spec.series[1].label, "Simulation 1");
    assert_eq!(spec.series[2].label, "Simulation 2");
}

#[test]
fn test_chartjs_config_shape() {
    let matrix = scenario_matrix();
    let spec = build_chart_spec(
        &mean_trajectory(&matrix),
        &sample_columns(&matrix, 20),
        &PageProfile::inventory(),
    );
    let config = spec.to_chartjs();

    assert_eq!(config["type"], "line");
    assert_eq!(config["data"]["labels"], serde_json::json!([0, 1, 2]));
    let datasets = config["data"]["datasets"].as_array().unwrap();
    assert_eq!(datasets.len(), 5);
    assert_eq!(datasets[0]["label"], "Average Inventory");
    assert_eq!(datasets[0]["borderColor"], "#00FF00");
    assert_eq!(datasets[0]["order"], 0);
    assert_eq!(datasets[1]["pointHoverRadius"], 0);
    assert_eq!(datasets[1]["order"], 1);
    assert_eq!(
        config["options"]["scales"]["y"]["title"]["text"],
        "Inventory Level"
    );
    assert_eq!(
        config["options"]["plugins"]["title"]["text"],
        "Inventory Level Simulation"
    );
}

#[test]
fn test_history_chart_is_single_line() {
    let spec = build_history_chart(
        &[180.0, 183.5, 187.3, 186.0],
        "Historical Performance (6 Months)",
        &PageProfile::real_stock(),
    );
    assert_eq!(spec.series.len(), 1);
    assert_eq!(spec.x_domain(), Some((0, 3)));
    assert_eq!(spec.series[0].label, "Historical Price");
}

// ═══════════════════════════════════════════════════════════════════════
// Day details
// ═══════════════════════════════════════════════════════════════════════

fn scenario_result() -> SimulationResult {
    SimulationResult {
        kind: SimulationKind::Price,
        matrix: scenario_matrix(),
        summary: SummaryStatistics::default(),
        history: None,
    }
}

#[test]
fn test_render_day_slice_text() {
    let slice = day_slice(&scenario_matrix(), 0).unwrap();
    let view = render_day_slice(&slice, &PageProfile::price());
    assert_eq!(
        view.text(),
        "Details for Day 0\nAverage Price: $25.00\nMinimum Price: $10.00\nMaximum Price: $40.00"
    );
}

#[test]
fn test_day_slice_view_without_result() {
    let view = day_slice_view(None, "0", &PageProfile::price());
    assert_eq!(view, DaySliceView::Invalid("Please run a simulation first.".into()));
}

#[test]
fn test_day_slice_view_out_of_range_messages() {
    let result = scenario_result();
    for input in ["3", "-1", "abc", ""] {
        let view = day_slice_view(Some(&result), input, &PageProfile::price());
        assert_eq!(
            view,
            DaySliceView::Invalid("Invalid day. Please enter a number between 0 and 2.".into()),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_day_slice_view_inventory_units() {
    let result = scenario_result();
    let view = day_slice_view(Some(&result), "2", &PageProfile::inventory());
    assert!(!view.is_invalid());
    let text = view.text();
    assert!(text.starts_with("Details for Day 2"));
    assert!(text.contains("Average Inventory: 25 units"));
    assert!(text.contains("Minimum Inventory: 15 units"));
    assert!(text.contains("Maximum Inventory: 45 units"));
}
