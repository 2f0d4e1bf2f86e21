// ============================================================================
// Chart - Graphique ligne des derniers prix
// ============================================================================
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X (heure) et Y (prix)
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::{format_usd, PriceSeries};

/// Couleur de la ligne de prix
const LINE_COLOR: Color = Color::Rgb(96, 165, 250);

/// Couleur des axes
const AXIS_COLOR: Color = Color::Rgb(156, 163, 175);

/// Dessine le graphique des prix
pub fn render_price_chart(frame: &mut Frame, series: &PriceSeries, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" BTC/USD - {} derniers points ", series.len()));

    let points = series.chart_points();
    let Some((min_price, max_price)) = series.price_range() else {
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from("Pas encore de données")])
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    };

    let (y_min, y_max) = y_bounds(min_price, max_price);

    // Un seul point : on élargit l'axe X pour éviter des bornes [0, 0]
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("BTC")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(LINE_COLOR))
        .data(&points)];

    // Labels X : heure du premier et du dernier point
    let first_label = series.first().map(|p| p.time_label()).unwrap_or_default();
    let last_label = series.last().map(|p| p.time_label()).unwrap_or_default();

    let x_axis = Axis::default()
        .style(Style::default().fg(AXIS_COLOR))
        .bounds([0.0, x_max])
        .labels(vec![Span::raw(first_label), Span::raw(last_label)]);

    let y_axis = Axis::default()
        .title("USD")
        .style(Style::default().fg(AXIS_COLOR))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_usd(y_min.round())),
            Span::raw(format_usd(((y_min + y_max) / 2.0).round())),
            Span::raw(format_usd(y_max.round())),
        ]);

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Bornes de l'axe Y : du min au max des données
///
/// Si tous les prix sont égaux, on ouvre une marge de 0.1% (au moins 1$)
/// pour que la ligne reste visible au milieu.
pub fn y_bounds(min_price: f64, max_price: f64) -> (f64, f64) {
    if max_price > min_price {
        (min_price, max_price)
    } else {
        let pad = (min_price.abs() * 0.001).max(1.0);
        (min_price - pad, max_price + pad)
    }
}
