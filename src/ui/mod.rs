// src/ui/mod.rs
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use crate::state::{AppState, CatalogStatus, View};
use crate::state::input_state::{EditField, InputMode};

pub mod home;
pub mod detail;
pub mod chart;

pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),    // Current view
            Constraint::Length(3),  // Status bar
        ])
        .split(frame.size());

    match state.view.clone() {
        View::Home => home::draw_home(frame, state, chunks[0]),
        View::Detail(_) => detail::draw_detail(frame, state, chunks[0]),
        View::Guided(key) => detail::draw_guided(frame, state, &key, chunks[0]),
        View::NotFound(title) => detail::draw_not_found(frame, &title, chunks[0]),
    }

    draw_status_bar(frame, state, chunks[1]);

    if let InputMode::Editing(field) = state.input.mode {
        if !matches!(field, EditField::Filter | EditField::PValue) {
            draw_edit_dialog(frame, state, field);
        }
    }
}

fn draw_status_bar(frame: &mut Frame, state: &AppState, area: Rect) {
    let catalog = match &state.catalog_status {
        CatalogStatus::Loading => Span::styled("catalog: loading", Style::default().fg(Color::Yellow)),
        CatalogStatus::Ready(count) => Span::styled(format!("catalog: {} tests", count), Style::default().fg(Color::Green)),
        CatalogStatus::Failed(_) => Span::styled("catalog: unavailable", Style::default().fg(Color::Red)),
    };

    let message = if let Some(error) = &state.ui.error_message {
        Span::styled(error.clone(), Style::default().fg(Color::Red))
    } else if let Some(status) = &state.ui.status_message {
        Span::styled(status.clone(), Style::default().fg(Color::Cyan))
    } else {
        Span::raw(view_hint(&state.view))
    };

    let line = Line::from(vec![
        catalog,
        Span::raw(" | "),
        Span::styled(format!("frame: {}", state.analysis.frame_name), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        message,
    ]);

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn view_hint(view: &View) -> &'static str {
    match view {
        View::Home => "Tab switch panel, / filter, Enter open, R reload, q quit",
        View::Detail(_) => "Tab focus, Enter edit, p pivot, v p-value, e export script, d data template, Esc home",
        View::Guided(_) => "Tab focus, Enter edit, 1-9 answer the question, e export script, Esc home",
        View::NotFound(_) => "Enter or Esc to go back",
    }
}

fn draw_edit_dialog(frame: &mut Frame, state: &AppState, field: EditField) {
    let area = centered_rect(50, 20, frame.size());

    let block = Block::default()
        .title(format!("Edit {}", field.label()))
        .borders(Borders::ALL);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),  // Text box
            Constraint::Min(1),     // Instructions
        ])
        .split(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let input = state.input.field(field);
    draw_text_box(frame, input, "Value", chunks[0]);

    let instructions = Line::from(vec![
        Span::raw("Changes apply as you type. "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" or "),
        Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" to close"),
    ]);
    frame.render_widget(Paragraph::new(instructions), chunks[1]);
}

/// Single-line text box with the terminal cursor placed after the text.
pub fn draw_text_box(frame: &mut Frame, input: &tui_input::Input, title: &str, area: Rect) {
    let width = area.width.saturating_sub(2) as usize;
    let scroll = input.visual_scroll(width);
    let widget = Paragraph::new(input.value())
        .scroll((0, scroll as u16))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(widget, area);
    frame.set_cursor(
        area.x + (input.visual_cursor().max(scroll) - scroll) as u16 + 1,
        area.y + 1,
    );
}

/// Border style for the panel that currently owns the cursor keys.
pub fn focus_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::sample_tests;
    use crate::config::Settings;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(state: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 48)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content.iter().map(|cell| cell.symbol.clone()).collect()
    }

    #[test]
    fn popup_stays_inside_area() {
        let outer = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(50, 20, outer);
        assert!(popup.x >= outer.x && popup.right() <= outer.right());
        assert!(popup.y >= outer.y && popup.bottom() <= outer.bottom());
    }

    #[test]
    fn every_view_draws() {
        let mut state = AppState::new(&Settings::default());
        assert!(screen_text(&mut state).contains("catalog: loading"));

        state.replace_catalog(Ok(sample_tests()));
        assert!(screen_text(&mut state).contains("Teste de Mann-Whitney U"));

        state.select_test("Teste de Mann-Whitney U").unwrap();
        assert!(screen_text(&mut state).contains("wilcox.test"));

        state.enter_workflow("guide_2_indep").unwrap();
        assert!(screen_text(&mut state).contains("shapiro.test"));

        let _ = state.select_test("ANOVA de Medidas Repetidas");
        assert!(screen_text(&mut state).contains("ANOVA de Medidas Repetidas"));
    }

    #[test]
    fn edit_dialog_shows_field_label() {
        let mut state = AppState::new(&Settings::default());
        state.replace_catalog(Ok(sample_tests()));
        state.select_test("Teste de Mann-Whitney U").unwrap();
        state.begin_edit(EditField::FrameName);
        assert!(screen_text(&mut state).contains("Edit Data frame name"));
    }
}
