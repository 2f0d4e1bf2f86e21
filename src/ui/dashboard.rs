// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Fonction pure de l'état : App -> widgets ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Widgets : Block, Paragraph, Chart
// 4. Style : couleurs selon le signe de la variation
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Screen};
use crate::models::Quote;
use crate::ui::chart;

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - app.screen() dérive l'écran de l'état du controller
/// - Loading et Error occupent tout l'écran
pub fn render(frame: &mut Frame, app: &App) {
    let size = frame.size();
    match app.screen() {
        Screen::Loading => render_fullscreen_message(frame, size, "Loading...", Color::White),
        Screen::Error(message) => render_fullscreen_message(frame, size, &message, Color::Red),
        Screen::Dashboard => render_dashboard(frame, app, size),
    }
}

/// Message centré plein écran (chargement ou erreur)
fn render_fullscreen_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    // Centre verticalement : une ligne au milieu de la zone
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, chunks[1]);
}

/// Dessine le dashboard : header, cartes, graphique, footer
fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(5), // Cartes
            Constraint::Min(8),    // Graphique
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_cards(frame, app.state.quote.as_ref(), chunks[1]);
    chart::render_price_chart(frame, &app.state.series, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Header : titre + badge de la fenêtre affichée
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = Line::from(vec![
        Span::styled(
            "Bitcoin Price Analytics",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("⏱ Last {} samples", app.state.series.capacity()),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Deux cartes côte à côte : prix actuel et variation 24h
fn render_cards(frame: &mut Frame, quote: Option<&Quote>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let label_style = Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD);

    // Carte prix
    let price_line = match quote {
        Some(q) => Line::from(vec![
            Span::styled("$ ", Style::default().fg(Color::Gray)),
            Span::styled(
                q.display_price(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" USD", Style::default().fg(Color::Gray)),
        ]),
        None => Line::from("-"),
    };
    let price_card = Paragraph::new(vec![
        Line::from(Span::styled("CURRENT PRICE", label_style)),
        Line::from(""),
        price_line,
    ])
    .block(card_block())
    .alignment(Alignment::Center);
    frame.render_widget(price_card, chunks[0]);

    // Carte variation : vert si >= 0, rouge sinon
    let change_line = match quote {
        Some(q) => {
            let color = if q.is_positive() { Color::Green } else { Color::Red };
            Line::from(Span::styled(
                q.display_change(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from("-"),
    };
    let change_card = Paragraph::new(vec![
        Line::from(Span::styled("24H CHANGE", label_style)),
        Line::from(""),
        change_line,
    ])
    .block(card_block())
    .alignment(Alignment::Center);
    frame.render_widget(change_card, chunks[1]);
}

fn card_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Footer : raccourcis + statut du rafraîchissement
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let status = if app.is_refreshing() {
        Span::styled("⟳ Refreshing...", Style::default().fg(Color::Yellow))
    } else {
        let updated = app
            .state
            .last_updated
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        Span::styled(
            format!("Last update {}", updated),
            Style::default().fg(Color::Gray),
        )
    };

    let line = Line::from(vec![
        Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Quit   "),
        status,
        Span::styled(
            format!("   every {}s", app.refresh_period.as_secs()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
// CONCEPT RATATUI : TestBackend
// - Terminal en mémoire, on lit le buffer après draw()
// ============================================================================
