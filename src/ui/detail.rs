// src/ui/detail.rs
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Row, Table, Wrap},
    Frame,
};
use crate::config::{Assumption, TestDefinition};
use crate::render::{read_p_value, ConceptChart, PValueReading, RenderedStep};
use crate::state::{AppState, SetupRow, VariableRole};
use crate::state::input_state::{EditField, InputMode};
use crate::state::ui_state::DetailFocus;
use super::chart::draw_concept_chart;
use super::home::instructions;
use super::{centered_rect, draw_text_box, focus_block};

pub fn draw_detail(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let Some(test) = state.current_test().cloned() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(area);

    draw_data_column(frame, state, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),  // Description and assumptions
            Constraint::Length(9),       // Concept chart and p-value
            Constraint::Min(6),          // R code
        ])
        .split(columns[1]);

    draw_info(frame, state, &test, right[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .split(right[1]);

    let seed = state.catalog.tests().iter()
        .position(|t| t.title == test.title)
        .unwrap_or(0) as u64;
    draw_concept_chart(frame, ConceptChart::for_title(&test.title), seed, middle[0]);
    draw_p_value(frame, state, middle[1]);

    draw_code(frame, state, &test.title, right[2]);
}

pub fn draw_guided(frame: &mut Frame, state: &mut AppState, key: &str, area: Rect) {
    let Some(workflow) = state.catalog.workflow(key).cloned() else {
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(60),
        ])
        .split(area);

    draw_data_column(frame, state, columns[0]);

    let branch_rows = workflow.branches.len() as u16 + 3;
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),            // Workflow description
            Constraint::Min(6),               // Diagnostic code
            Constraint::Length(branch_rows),  // Final question
        ])
        .split(columns[1]);

    let intro = Paragraph::new(workflow.description.clone())
        .wrap(Wrap { trim: true })
        .block(focus_block(workflow.title.clone(), state.ui.detail_focus == DetailFocus::Info));
    frame.render_widget(intro, right[0]);

    draw_code(frame, state, &workflow.title, right[1]);

    let mut lines = vec![Line::from(Span::styled(
        workflow.final_question.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(workflow.branches.iter().enumerate().map(|(i, branch)| {
        Line::from(vec![
            Span::styled(format!("{}. ", i + 1), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(branch.text.clone()),
            Span::styled(format!("  -> {}", branch.target_test_title), Style::default().fg(Color::DarkGray)),
        ])
    }));
    let question = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Next step").borders(Borders::ALL));
    frame.render_widget(question, right[2]);
}

pub fn draw_not_found(frame: &mut Frame, title: &str, area: Rect) {
    let popup = centered_rect(60, 30, area);
    let lines = vec![
        Line::from(Span::styled(title.to_string(), Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("This test is not in the catalog yet. It is still in construction."),
        Line::from(""),
        instructions(&[("Enter", "go back"), ("Esc", "go back")]),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Test not found").borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    frame.render_widget(widget, popup);
}

// Setup list, data preview and import guide, shared by tests and workflows.
fn draw_data_column(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let preview_height = state.preview_rows().len() as u16 + 3;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),                  // Setup list
            Constraint::Length(preview_height),  // Data preview
            Constraint::Length(10),              // Import guide
        ])
        .split(area);

    draw_setup(frame, state, chunks[0]);
    draw_preview(frame, state, chunks[1]);
    draw_import(frame, state, chunks[2]);
}

fn draw_setup(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let items: Vec<ListItem> = state.setup_rows()
        .into_iter()
        .map(|row| ListItem::new(setup_row_text(state, row)))
        .collect();

    let list = List::new(items)
        .block(focus_block("Your data".to_string(), state.ui.detail_focus == DetailFocus::Setup))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut state.ui.setup_list_state);
}

pub fn setup_row_text(state: &AppState, row: SetupRow) -> String {
    let analysis = &state.analysis;
    match row {
        SetupRow::FrameName if analysis.frame_name == analysis.default_frame_name() => {
            format!("Data frame: {} (default)", analysis.frame_name)
        }
        SetupRow::FrameName => format!("Data frame: {}", analysis.frame_name),
        SetupRow::Column(i) => format!(
            "Column {}: {}",
            i + 1,
            analysis.columns.get(i).map(String::as_str).unwrap_or("")
        ),
        SetupRow::PivotToggle => format!(
            "Wide format, convert to long: [{}]",
            if analysis.pivot_mode { "x" } else { " " }
        ),
        SetupRow::PivotColumn(i) => format!(
            "Wide column {}: {}",
            i + 1,
            analysis.pivot_columns.get(i).map(String::as_str).unwrap_or("")
        ),
        SetupRow::NamesTo => format!("Group column (names_to): {}", analysis.effective_names_to()),
        SetupRow::ValuesTo => format!("Value column (values_to): {}", analysis.effective_values_to()),
        SetupRow::Variable(role) => {
            let (dependent, independent) = state.variable_labels();
            let (label, value) = match role {
                VariableRole::Dependent => (dependent, &analysis.selected_dependent),
                VariableRole::Independent => (independent, &analysis.selected_independent),
            };
            format!("{}: {}", label, if value.is_empty() { "(choose)" } else { value.as_str() })
        }
        SetupRow::ImportFormat => format!("Import from: {}", state.import_format.label()),
    }
}

fn draw_preview(frame: &mut Frame, state: &AppState, area: Rect) {
    let header = state.analysis.preview_columns();
    let widths: Vec<Constraint> = header.iter()
        .map(|_| Constraint::Length(12))
        .collect();

    let rows: Vec<Row> = state.preview_rows()
        .iter()
        .map(|row| Row::new(row.clone()))
        .collect();

    let title = if state.analysis.pivot_mode { "Preview (wide, random values)" } else { "Preview" };
    let table = Table::new(rows)
        .header(Row::new(header).style(Style::default().add_modifier(Modifier::BOLD)))
        .widths(&widths)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn draw_import(frame: &mut Frame, state: &AppState, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(hint) = state.import_format.hint() {
        lines.push(Line::from(Span::styled(hint.to_string(), Style::default().fg(Color::DarkGray))));
    }
    lines.extend(state.import_snippet().lines().map(|line| Line::from(line.to_string())));

    let widget = Paragraph::new(lines)
        .block(Block::default()
            .title(format!("Import ({}) - i to switch", state.import_format.label()))
            .borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn draw_info(frame: &mut Frame, state: &AppState, test: &TestDefinition, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(test.title.clone(), bold.fg(Color::Green))),
        Line::from(test.description.clone()),
        Line::from(""),
    ];

    if !test.hypotheses.null.is_empty() || !test.hypotheses.alternative.is_empty() {
        lines.push(Line::from(vec![Span::styled("H0: ", bold), Span::raw(test.hypotheses.null.clone())]));
        lines.push(Line::from(vec![Span::styled("H1: ", bold), Span::raw(test.hypotheses.alternative.clone())]));
        lines.push(Line::from(""));
    }

    if !test.assumptions.is_empty() {
        lines.push(Line::from(Span::styled("Assumptions", bold)));
        for assumption in &test.assumptions {
            lines.extend(assumption_lines(assumption));
        }
        lines.push(Line::from(""));
    }

    if let Some(output) = &test.example_output {
        lines.push(Line::from(Span::styled("Example output", bold)));
        let terms: Vec<&str> = output.highlights.iter().map(|h| h.term.as_str()).collect();
        lines.extend(output.raw_text.lines().map(|line| highlight_line(line, &terms)));
        for highlight in &output.highlights {
            lines.push(Line::from(vec![
                Span::styled(highlight.term.clone(), Style::default().fg(Color::Yellow)),
                Span::raw(format!(": {}", highlight.meaning)),
            ]));
        }
        lines.push(Line::from(""));
    }

    if let Some(report) = &test.report {
        lines.push(Line::from(Span::styled("How to report", bold)));
        lines.push(Line::from(report.clone()));
    }

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((state.ui.info_scroll, 0))
        .block(focus_block("About this test".to_string(), state.ui.detail_focus == DetailFocus::Info));
    frame.render_widget(widget, area);
}

fn assumption_lines(assumption: &Assumption) -> Vec<Line<'static>> {
    match assumption {
        Assumption::Plain(text) => vec![Line::from(format!("  * {}", text))],
        Assumption::Detailed(detail) => {
            let icon = detail.icon.clone().unwrap_or_else(|| "*".to_string());
            let mut lines = vec![Line::from(vec![
                Span::raw(format!("  {} ", icon)),
                Span::styled(detail.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(if detail.description.is_empty() { String::new() } else { format!(": {}", detail.description) }),
            ])];
            if let Some(note) = &detail.violation_note {
                lines.push(Line::from(Span::styled(
                    format!("    If violated: {}", note),
                    Style::default().fg(Color::Red),
                )));
            }
            lines
        }
    }
}

/// Splits `line` so every occurrence of a highlight term gets its own
/// styled span.
pub fn highlight_line(line: &str, terms: &[&str]) -> Line<'static> {
    let style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut spans = Vec::new();
    let mut rest = line;

    loop {
        let next = terms.iter()
            .filter(|term| !term.is_empty())
            .filter_map(|term| rest.find(term).map(|pos| (pos, term.len())))
            .min_by_key(|(pos, len)| (*pos, std::cmp::Reverse(*len)));

        match next {
            Some((pos, len)) => {
                if pos > 0 {
                    spans.push(Span::raw(rest[..pos].to_string()));
                }
                spans.push(Span::styled(rest[pos..pos + len].to_string(), style));
                rest = &rest[pos + len..];
            }
            None => {
                if !rest.is_empty() {
                    spans.push(Span::raw(rest.to_string()));
                }
                break;
            }
        }
    }
    Line::from(spans)
}

fn draw_p_value(frame: &mut Frame, state: &AppState, area: Rect) {
    let block = Block::default().title("Read your p-value (v)").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Input
            Constraint::Length(1),  // Gauge
            Constraint::Min(1),     // Verdict
        ])
        .split(inner);

    if state.input.mode == InputMode::Editing(EditField::PValue) {
        draw_text_box(frame, &state.input.p_value, "p", chunks[0]);
    } else {
        let value = Paragraph::new(state.input.p_value.value().to_string())
            .block(Block::default().title("p").borders(Borders::ALL));
        frame.render_widget(value, chunks[0]);
    }

    let reading = read_p_value(state.input.p_value.value());
    let color = match reading {
        PValueReading::Waiting => Color::DarkGray,
        PValueReading::Significant { .. } => Color::Green,
        PValueReading::NotSignificant { .. } => Color::Red,
    };

    let percent = reading.gauge_percent().unwrap_or(0.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%  (0.05 at 5%)", percent));
    frame.render_widget(gauge, chunks[1]);

    let verdict = Paragraph::new(vec![
        Line::from(Span::styled(reading.headline(), Style::default().fg(color).add_modifier(Modifier::BOLD))),
        Line::from(reading.advice()),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(verdict, chunks[2]);
}

fn draw_code(frame: &mut Frame, state: &AppState, title: &str, area: Rect) {
    let steps = state.rendered_code();
    let widget = Paragraph::new(code_lines(&steps))
        .scroll((state.ui.code_scroll, 0))
        .block(focus_block(
            format!("R code: {} (e export)", title),
            state.ui.detail_focus == DetailFocus::Code,
        ));
    frame.render_widget(widget, area);
}

fn code_lines(steps: &[RenderedStep]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for step in steps {
        lines.push(Line::from(Span::styled(
            step.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.extend(step.code.lines().map(|line| Line::from(line.to_string())));
        lines.push(Line::from(""));
    }
    lines
}
