#![cfg(not(coverage))]

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::tui_actions::CHOICE_VIEWPORT_ROWS;
use crate::tui_state::TuiUiState;
use crate::LoadedScript;

const ELLIPSIS: &str = "…";

pub(crate) fn render_tui(
    frame: &mut Frame<'_>,
    ui: &TuiUiState,
    script: &LoadedScript,
    history_lines: &[String],
) {
    let terminal_width = frame.area().width as usize;
    let terminal_rows = frame.area().height as usize;
    let content_width = terminal_width.saturating_sub(2).max(16);
    let gray = Style::default().fg(Color::Gray);

    let mut lines_out: Vec<Line<'_>> = vec![
        Line::from(truncate_to_width(&script.title, content_width)),
        Line::from(Span::styled(
            truncate_to_width(
                &format!(
                    "status: {} | auto: {}",
                    ui.status,
                    if ui.auto.is_enabled() { "on" } else { "off" }
                ),
                content_width,
            ),
            gray,
        )),
    ];

    let reserved_rows = 2 + 2 + CHOICE_VIEWPORT_ROWS + 3;
    let body_rows = terminal_rows.saturating_sub(reserved_rows).max(1);

    if ui.history_visible {
        lines_out.push(Line::from(Span::styled(
            "history (h to close)".to_string(),
            Style::default().fg(Color::Magenta),
        )));
        let wrapped = history_lines
            .iter()
            .flat_map(|line| wrap_line_to_width(line, content_width))
            .collect::<Vec<_>>();
        let start = wrapped.len().saturating_sub(body_rows);
        lines_out.extend(wrapped[start..].iter().cloned().map(Line::from));
    } else {
        let portrait_text = match (&ui.portrait, ui.avatar_visible) {
            (Some(asset), true) => format!("[{}]", asset),
            (Some(asset), false) => format!("({})", asset),
            (None, _) => " ".to_string(),
        };
        lines_out.push(Line::from(Span::styled(
            truncate_to_width(&portrait_text, content_width),
            gray,
        )));
        lines_out.push(Line::from(Span::styled(
            truncate_to_width(&ui.speaker_label, content_width),
            Style::default().fg(Color::Cyan),
        )));
        let wrapped = wrap_line_to_width(&ui.visible_text, content_width);
        let start = wrapped.len().saturating_sub(body_rows);
        lines_out.extend(wrapped[start..].iter().cloned().map(Line::from));
    }

    lines_out.push(Line::from(Span::styled("─".repeat(content_width), gray)));

    let choice_text_width = content_width.saturating_sub(2).max(8);
    let show_choices = !ui.revealing && !ui.choices.is_empty();
    for row_index in 0..CHOICE_VIEWPORT_ROWS {
        let absolute_index = ui.choice_scroll_offset + row_index;
        let choice = ui.choices.get(absolute_index).filter(|_| show_choices);
        let Some(choice) = choice else {
            lines_out.push(Line::from(" "));
            continue;
        };
        let selected = absolute_index == ui.selected_choice_index;
        let (prefix, style) = if selected {
            ("> ", Style::default().fg(Color::Green))
        } else {
            ("  ", Style::default())
        };
        lines_out.push(Line::from(Span::styled(
            format!(
                "{}{}",
                prefix,
                truncate_to_width(&choice.text, choice_text_width)
            ),
            style,
        )));
    }

    if ui.ended {
        lines_out.push(Line::from(Span::styled(
            "[end]".to_string(),
            Style::default().fg(Color::Green),
        )));
    }
    lines_out.push(Line::from(Span::styled(
        truncate_to_width(
            "keys: enter/space next | up/down choose | a auto | h history | r restart | ? help | q quit",
            content_width,
        ),
        Style::default().fg(Color::Yellow),
    )));
    if ui.help_visible {
        lines_out.push(Line::from(Span::styled(
            truncate_to_width(
                "enter while text is still appearing shows it in full. auto-play pauses at choices.",
                content_width,
            ),
            Style::default().fg(Color::Magenta),
        )));
    }

    let paragraph = Paragraph::new(lines_out).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, frame.area());
}

fn truncate_to_width(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return value.to_string();
    }
    if width <= 1 {
        return ELLIPSIS.chars().take(width).collect();
    }
    let mut out = value.chars().take(width - 1).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

fn wrap_line_to_width(value: &str, width: usize) -> Vec<String> {
    let chars = value.chars().collect::<Vec<_>>();
    if chars.is_empty() || width == 0 {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
