//! Visualization renderer: maps the backend's chart descriptor onto ratatui
//! bar/line charts, with a textual fallback for unsupported tags.

use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    text::Span,
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::api::{ChartKind, DataPoint, QueryResponse};
use crate::chat::ChatSession;
use crate::components::Component;

const SERIES_NAME: &str = "Data Visualization";
const X_TITLE: &str = "Name";
const Y_TITLE: &str = "Value";

/// The derived, render-ready form of a visualization descriptor. A pure
/// mapping: labels and values preserve data-point order and values pass
/// through unmodified.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Bar {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Line {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Unsupported {
        tag: String,
    },
}

impl ChartSpec {
    /// Derive a spec from the last structured response. Returns `None` when
    /// there is nothing to draw: no visualization, no chart type, or no data
    /// points.
    pub fn from_response(response: &QueryResponse) -> Option<ChartSpec> {
        let viz = response.visualization.as_ref()?;
        let tag = viz.chart_type.as_deref()?;
        let points = viz.data_points.as_deref()?;
        if points.is_empty() {
            return None;
        }
        let (labels, values) = split_points(points);
        Some(match ChartKind::from_tag(tag) {
            ChartKind::Bar => ChartSpec::Bar { labels, values },
            ChartKind::Line => ChartSpec::Line { labels, values },
            ChartKind::Unsupported(tag) => ChartSpec::Unsupported { tag },
        })
    }
}

/// Split data points into parallel label/value sequences, preserving order.
fn split_points(points: &[DataPoint]) -> (Vec<String>, Vec<f64>) {
    let labels = points.iter().map(|p| p.name.clone()).collect();
    let values = points.iter().map(|p| p.value).collect();
    (labels, values)
}

/// Trim a float for bar labels: no trailing ".0" on whole values.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

pub struct ChartPanel;

impl ChartPanel {
    pub fn new() -> Self {
        Self
    }

    fn draw_bar(frame: &mut Frame, area: Rect, labels: &[String], values: &[f64]) {
        let bars: Vec<Bar> = labels
            .iter()
            .zip(values.iter())
            .map(|(label, value)| {
                Bar::default()
                    .label(label.clone().into())
                    // BarChart is unsigned; clamp below zero rather than wrap.
                    .value(value.max(0.0).round() as u64)
                    .text_value(format_value(*value))
            })
            .collect();
        let width = ((area.width.saturating_sub(2)) / (labels.len().max(1) as u16))
            .saturating_sub(1)
            .max(3);
        let chart = BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(SERIES_NAME),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(width)
            .bar_gap(1)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
        frame.render_widget(chart, area);
    }

    fn draw_line(frame: &mut Frame, area: Rect, labels: &[String], values: &[f64]) {
        let points: Vec<(f64, f64)> = values
            .iter()
            .enumerate()
            .map(|(i, v)| (i as f64, *v))
            .collect();

        let y_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let y_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let (y_min, y_max) = if y_min == y_max {
            (y_min - 1.0, y_max + 1.0)
        } else {
            (y_min, y_max)
        };

        let x_labels: Vec<Span> = labels.iter().map(|l| Span::raw(l.clone())).collect();
        let dataset = Dataset::default()
            .name(SERIES_NAME)
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points);

        let chart = Chart::new(vec![dataset])
            .block(Block::default().borders(Borders::ALL).title(SERIES_NAME))
            .x_axis(
                Axis::default()
                    .title(X_TITLE)
                    .style(Style::default().fg(Color::Gray))
                    .bounds([0.0, (values.len().saturating_sub(1)).max(1) as f64])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Y_TITLE)
                    .style(Style::default().fg(Color::Gray))
                    .bounds([y_min, y_max])
                    .labels(vec![
                        Span::raw(format_value(y_min)),
                        Span::raw(format_value(y_max)),
                    ]),
            );
        frame.render_widget(chart, area);
    }

    fn draw_unsupported(frame: &mut Frame, area: Rect, tag: &str) {
        let paragraph = Paragraph::new(format!("Unsupported visualization type: {tag}"))
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(SERIES_NAME));
        frame.render_widget(paragraph, area);
    }
}

impl Default for ChartPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ChartPanel {
    fn draw(&mut self, frame: &mut Frame, area: Rect, session: &ChatSession) -> Result<()> {
        let Some(spec) = session.last_response().and_then(ChartSpec::from_response) else {
            return Ok(());
        };
        match spec {
            ChartSpec::Bar { labels, values } => Self::draw_bar(frame, area, &labels, &values),
            ChartSpec::Line { labels, values } => Self::draw_line(frame, area, &labels, &values),
            ChartSpec::Unsupported { tag } => Self::draw_unsupported(frame, area, &tag),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ChartPanel"
    }
}

/// Whether the panel would draw anything for this session state. Used by the
/// layout to collapse the chart area when idle.
pub fn has_chart(session: &ChatSession) -> bool {
    session
        .last_response()
        .and_then(ChartSpec::from_response)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Visualization;
    use pretty_assertions::assert_eq;

    fn response(viz: Option<Visualization>) -> QueryResponse {
        QueryResponse {
            query: None,
            result: serde_json::Value::Null,
            humanized_response: "ok".to_string(),
            visualization: viz,
        }
    }

    fn points() -> Vec<DataPoint> {
        vec![
            DataPoint {
                name: "A".to_string(),
                value: 1.0,
            },
            DataPoint {
                name: "B".to_string(),
                value: 2.0,
            },
        ]
    }

    #[test]
    fn bar_spec_preserves_order() {
        let resp = response(Some(Visualization {
            chart_type: Some("bar".to_string()),
            data_points: Some(points()),
        }));
        let spec = ChartSpec::from_response(&resp).unwrap();
        assert_eq!(
            spec,
            ChartSpec::Bar {
                labels: vec!["A".to_string(), "B".to_string()],
                values: vec![1.0, 2.0],
            }
        );
    }

    #[test]
    fn line_tag_maps_to_line_spec() {
        let resp = response(Some(Visualization {
            chart_type: Some("line".to_string()),
            data_points: Some(points()),
        }));
        assert!(matches!(
            ChartSpec::from_response(&resp),
            Some(ChartSpec::Line { .. })
        ));
    }

    #[test]
    fn unsupported_tag_degrades_to_notice() {
        let resp = response(Some(Visualization {
            chart_type: Some("pie".to_string()),
            data_points: Some(points()),
        }));
        assert_eq!(
            ChartSpec::from_response(&resp),
            Some(ChartSpec::Unsupported {
                tag: "pie".to_string()
            })
        );
    }

    #[test]
    fn nothing_to_draw_without_descriptor_or_points() {
        assert_eq!(ChartSpec::from_response(&response(None)), None);
        let no_points = response(Some(Visualization {
            chart_type: Some("bar".to_string()),
            data_points: None,
        }));
        assert_eq!(ChartSpec::from_response(&no_points), None);
        let empty_points = response(Some(Visualization {
            chart_type: Some("bar".to_string()),
            data_points: Some(vec![]),
        }));
        assert_eq!(ChartSpec::from_response(&empty_points), None);
        let no_type = response(Some(Visualization {
            chart_type: None,
            data_points: Some(points()),
        }));
        assert_eq!(ChartSpec::from_response(&no_type), None);
    }

    #[test]
    fn format_value_trims_whole_numbers() {
        assert_eq!(format_value(2.0), "2");
        assert_eq!(format_value(21.5), "21.50");
    }
}
