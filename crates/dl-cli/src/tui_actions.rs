use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dl_core::{DialogueError, ErrorKind};
use dl_runtime::DialogueEngine;

use crate::tui_state::TuiUiState;
use crate::HistoryLog;

pub(crate) const CHOICE_VIEWPORT_ROWS: usize = 5;

/// Returns whether the player should quit.
pub(crate) fn handle_key(
    key: KeyEvent,
    history: &HistoryLog,
    engine: &mut DialogueEngine,
    ui: &mut TuiUiState,
) -> Result<bool, DialogueError> {
    if key.code == KeyCode::Esc || matches!(key.code, KeyCode::Char('q')) {
        return Ok(true);
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match key.code {
        KeyCode::Char('h') => {
            ui.history_visible = !ui.history_visible;
        }
        KeyCode::Char('?') => {
            ui.help_visible = !ui.help_visible;
        }
        KeyCode::Char('a') => {
            let enabled = ui.auto.toggle();
            ui.status = if enabled { "auto on" } else { "auto off" }.to_string();
        }
        KeyCode::Char('r') => {
            engine.restart();
            history.clear();
            engine.advance()?;
            ui.status = "restarted".to_string();
        }
        KeyCode::Up => {
            if ui.choices.is_empty() {
                ui.status = "no pending choice".to_string();
                return Ok(false);
            }
            ui.selected_choice_index = ui.selected_choice_index.saturating_sub(1);
            if ui.selected_choice_index < ui.choice_scroll_offset {
                ui.choice_scroll_offset = ui.selected_choice_index;
            }
        }
        KeyCode::Down => {
            if ui.choices.is_empty() {
                ui.status = "no pending choice".to_string();
                return Ok(false);
            }
            let last = ui.choices.len().saturating_sub(1);
            ui.selected_choice_index = (ui.selected_choice_index + 1).min(last);
            if ui.selected_choice_index >= ui.choice_scroll_offset + CHOICE_VIEWPORT_ROWS {
                ui.choice_scroll_offset = ui.selected_choice_index + 1 - CHOICE_VIEWPORT_ROWS;
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            if !ui.choices.is_empty() {
                let selected = ui.choices.get(ui.selected_choice_index).ok_or_else(|| {
                    DialogueError::new(ErrorKind::State, "TUI_CHOICE_PARSE", "No choices available")
                })?;
                let index = selected.index;
                engine.choose(index)?;
                ui.status = format!("chose {}", index);
            } else if engine.skip_reveal() {
                ui.status = "skipped".to_string();
            } else if ui.ended {
                ui.status = "dialogue ended".to_string();
            } else {
                engine.advance()?;
            }
        }
        _ => return Ok(false),
    }

    ui.sync_from_engine(engine);
    Ok(false)
}
