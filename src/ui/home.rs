// src/ui/home.rs
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};
use crate::input::home::can_restart;
use crate::state::{AppState, FlowPanel};
use crate::state::input_state::{EditField, InputMode};
use crate::state::ui_state::HomeFocus;
use super::{draw_text_box, focus_block};

pub fn draw_home(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(70),
        ])
        .split(area);

    draw_sidebar(frame, state, chunks[0]);
    match state.flow_panel {
        FlowPanel::Question => draw_question(frame, state, chunks[1]),
        FlowPanel::Result { .. } => draw_result(frame, state, chunks[1]),
    }
}

fn draw_sidebar(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Filter
            Constraint::Min(3),     // Test list
        ])
        .split(area);

    if state.input.mode == InputMode::Editing(EditField::Filter) {
        draw_text_box(frame, &state.input.filter, "Filter", chunks[0]);
    } else {
        let filter = Paragraph::new(state.input.filter.value().to_string())
            .style(Style::default().fg(Color::DarkGray))
            .block(focus_block("Filter (/)".to_string(), false));
        frame.render_widget(filter, chunks[0]);
    }

    let items: Vec<ListItem> = state.visible_tests()
        .into_iter()
        .filter_map(|idx| state.catalog.test(idx))
        .map(|test| ListItem::new(test.title.clone()))
        .collect();

    let title = format!("Tests ({})", items.len());
    let list = List::new(items)
        .block(focus_block(title, state.ui.home_focus == HomeFocus::Sidebar))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[1], &mut state.ui.test_list_state);
}

fn draw_question(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let Some(node) = state.navigator.current(state.catalog.tree()) else {
        let message = format!(
            "Question '{}' is missing from the decision tree. Press r to restart.",
            state.navigator.current_id()
        );
        let missing = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .block(focus_block("Decision guide".to_string(), true));
        frame.render_widget(missing, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Question
            Constraint::Min(3),     // Options
            Constraint::Length(1),  // Instructions
        ])
        .split(area);

    let question = Paragraph::new(Line::from(Span::styled(
        node.question.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .wrap(Wrap { trim: true })
    .block(focus_block("Decision guide".to_string(), false));
    frame.render_widget(question, chunks[0]);

    let items: Vec<ListItem> = node.options
        .iter()
        .enumerate()
        .map(|(i, option)| ListItem::new(format!("{}. {}", i + 1, option.text)))
        .collect();

    let focused = state.ui.home_focus == HomeFocus::Flow;
    let list = List::new(items)
        .block(focus_block("Options".to_string(), focused))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[1], &mut state.ui.flow_list_state);

    let hints: &[(&str, &str)] = if can_restart(state) {
        &[("1-9", "answer"), ("Enter", "choose"), ("r", "restart")]
    } else {
        &[("1-9", "answer"), ("Enter", "choose")]
    };
    frame.render_widget(Paragraph::new(instructions(hints)), chunks[2]);
}

fn draw_result(frame: &mut Frame, state: &AppState, area: Rect) {
    let FlowPanel::Result { requested, found } = &state.flow_panel else {
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled("Recommended test", Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(requested.clone(), Style::default().add_modifier(Modifier::BOLD).fg(Color::Green))),
        Line::from(""),
    ];

    match (found, state.result_excerpt()) {
        (Some(_), Some(excerpt)) => {
            lines.push(Line::from(excerpt));
            lines.push(Line::from(""));
            lines.push(instructions(&[("Enter", "open the test"), ("r", "restart")]));
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "This test is still in construction.",
                Style::default().fg(Color::Yellow),
            )));
            lines.push(Line::from(""));
            lines.push(instructions(&[("Enter", "start over"), ("r", "restart")]));
        }
    }

    let focused = state.ui.home_focus == HomeFocus::Flow;
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(focus_block("Decision guide".to_string(), focused));
    frame.render_widget(panel, area);
}

/// "key action, key action" hint line with bold keys.
pub fn instructions(pairs: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(", "));
        }
        spans.push(Span::styled(key.to_string(), Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(" {}", action)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_keys_are_bold() {
        let line = instructions(&[("Enter", "open"), ("r", "restart")]);
        assert_eq!(line.spans.len(), 5);
        assert_eq!(line.spans[0].content, "Enter");
        assert!(line.spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[4].content, " restart");
    }
}
