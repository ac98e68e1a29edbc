use dl_core::DialogueError;
use dl_runtime::DialogueEngine;

use crate::{HistoryLog, LoadedScript};

#[cfg(coverage)]
pub(crate) fn run_tui_ratatui_mode(
    script: &LoadedScript,
    engine: &mut DialogueEngine,
    history: &HistoryLog,
    _auto: bool,
) -> Result<i32, DialogueError> {
    crate::run_play_line_mode(script, engine, history)
}

#[cfg(not(coverage))]
pub(crate) fn run_tui_ratatui_mode(
    script: &LoadedScript,
    engine: &mut DialogueEngine,
    history: &HistoryLog,
    auto: bool,
) -> Result<i32, DialogueError> {
    rich::run(script, engine, history, auto)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;
    use tracing::warn;

    use super::*;
    use crate::tui_actions::handle_key;
    use crate::tui_render::render_tui;
    use crate::tui_state::TuiUiState;
    use crate::{map_tui_io, AutoPlay};

    const FRAME_INTERVAL: Duration = Duration::from_millis(16);

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, DialogueError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    pub(super) fn run(
        script: &LoadedScript,
        engine: &mut DialogueEngine,
        history: &HistoryLog,
        auto: bool,
    ) -> Result<i32, DialogueError> {
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState {
            status: "ready".to_string(),
            auto: AutoPlay::new(auto),
            ..TuiUiState::default()
        };
        engine.advance()?;

        loop {
            ui.sync_from_engine(engine);
            let history_lines = if ui.history_visible {
                history.formatted(&script.config)
            } else {
                Vec::new()
            };
            terminal
                .terminal
                .draw(|frame| render_tui(frame, &ui, script, &history_lines))
                .map_err(map_tui_io)?;

            if ui
                .auto
                .poll(Instant::now(), ui.line_settled(), ui.reveal_units, &script.config)
            {
                if let Err(error) = engine.advance() {
                    warn!(%error, "auto-play advance failed");
                    ui.status = error.message;
                }
                continue;
            }

            if !event::poll(FRAME_INTERVAL).map_err(map_tui_io)? {
                continue;
            }
            if let Event::Key(key) = event::read().map_err(map_tui_io)? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, history, engine, &mut ui) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(error) => ui.status = error.message,
                }
            }
        }

        Ok(0)
    }
}
