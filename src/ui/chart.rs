// src/ui/chart.rs
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    widgets::{Axis, BarChart, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};
use crate::render::chart::{normal_curve, scatter_points};
use crate::render::ConceptChart;

const CURVE_SAMPLES: usize = 60;
const GROUP_HEIGHTS: [(&str, u64); 3] = [("A", 45), ("B", 70), ("C", 55)];

/// Draws the illustration for a test. `seed` keeps the scatter stable
/// between frames.
pub fn draw_concept_chart(frame: &mut Frame, chart: ConceptChart, seed: u64, area: Rect) {
    let block = Block::default().title("Concept").borders(Borders::ALL);

    match chart {
        ConceptChart::Scatter { rising } => {
            let points = scatter_points(rising, &mut StdRng::seed_from_u64(seed));
            let datasets = vec![Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Cyan))
                .data(&points)];
            let widget = Chart::new(datasets)
                .block(block)
                .x_axis(Axis::default().bounds([0.0, 100.0]))
                .y_axis(Axis::default().bounds([0.0, 100.0]));
            frame.render_widget(widget, area);
        }
        ConceptChart::GroupComparison { groups } => {
            let bars = &GROUP_HEIGHTS[..groups.min(GROUP_HEIGHTS.len())];
            let widget = BarChart::default()
                .block(block)
                .data(bars)
                .bar_width(5)
                .bar_gap(2)
                .max(100)
                .bar_style(Style::default().fg(Color::Cyan));
            frame.render_widget(widget, area);
        }
        ConceptChart::NormalCurve => {
            let points = normal_curve(CURVE_SAMPLES);
            let datasets = vec![Dataset::default()
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Magenta))
                .data(&points)];
            let widget = Chart::new(datasets)
                .block(block)
                .x_axis(Axis::default().bounds([0.0, 100.0]))
                .y_axis(Axis::default().bounds([0.0, 100.0]));
            frame.render_widget(widget, area);
        }
        ConceptChart::None => {
            let widget = Paragraph::new("No illustration for this test")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(widget, area);
        }
    }
}
