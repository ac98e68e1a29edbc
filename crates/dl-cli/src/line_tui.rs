use std::io::{self, BufRead, Write};

use dl_core::{DialogueConfig, DialogueError};
use dl_runtime::{AdvanceOutcome, DialogueEngine};

use crate::{map_tui_io, HistoryLog, LoadedScript, TuiCommandAction};

const HELP_TEXT: &str = "commands: :help :history :restart :quit";

pub(crate) fn run_play_line_mode(
    script: &LoadedScript,
    engine: &mut DialogueEngine,
    history: &HistoryLog,
) -> Result<i32, DialogueError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_play_line_mode_with_io(script, engine, history, &mut reader, &mut writer)
}

pub(crate) fn run_play_line_mode_with_io(
    script: &LoadedScript,
    engine: &mut DialogueEngine,
    history: &HistoryLog,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, DialogueError> {
    writeln!(writer, "Dialogue: {}", script.title).map_err(map_tui_io)?;
    writeln!(writer, "{}", HELP_TEXT).map_err(map_tui_io)?;

    let mut pending: Option<AdvanceOutcome> = None;
    loop {
        let outcome = match pending.take() {
            Some(outcome) => outcome,
            None => engine.advance()?,
        };

        match outcome {
            AdvanceOutcome::Line { .. } => {
                engine.skip_reveal();
                let state = engine.state();
                writeln!(writer).map_err(map_tui_io)?;
                if !state.speaker_label.is_empty() {
                    writeln!(writer, "{}", state.speaker_label).map_err(map_tui_io)?;
                }
                writeln!(writer, "{}", state.body_text).map_err(map_tui_io)?;

                loop {
                    let Some(raw) = prompt_input_from("", reader, writer)? else {
                        return Ok(0);
                    };
                    let mut emit = |line: String| emit_to(writer, line);
                    match handle_line_cmd(&raw, &script.config, engine, history, &mut emit)? {
                        TuiCommandAction::Continue => continue,
                        TuiCommandAction::Quit => return Ok(0),
                        TuiCommandAction::NotHandled | TuiCommandAction::RefreshBoundary => break,
                    }
                }
            }
            AdvanceOutcome::Choices { options } => {
                writeln!(writer).map_err(map_tui_io)?;
                for option in &options {
                    writeln!(writer, "  [{}] {}", option.index, option.label).map_err(map_tui_io)?;
                }
                loop {
                    let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                        return Ok(0);
                    };
                    let mut emit = |line: String| emit_to(writer, line);
                    match handle_line_cmd(&raw, &script.config, engine, history, &mut emit)? {
                        TuiCommandAction::Continue => continue,
                        TuiCommandAction::RefreshBoundary => break,
                        TuiCommandAction::Quit => return Ok(0),
                        TuiCommandAction::NotHandled => {}
                    }
                    match raw.trim().parse::<usize>() {
                        Ok(index) if index < options.len() => {
                            pending = Some(engine.choose(index)?);
                            break;
                        }
                        _ => {
                            writeln!(writer, "invalid choice: {}", raw).map_err(map_tui_io)?;
                        }
                    }
                }
            }
            AdvanceOutcome::End => {
                writeln!(writer).map_err(map_tui_io)?;
                writeln!(writer, "[END]").map_err(map_tui_io)?;
                return Ok(0);
            }
        }
    }
}

pub(crate) fn emit_to(writer: &mut dyn Write, line: String) -> Result<(), DialogueError> {
    writeln!(writer, "{}", line).map_err(map_tui_io)
}

pub(crate) fn handle_line_cmd(
    raw: &str,
    config: &DialogueConfig,
    engine: &mut DialogueEngine,
    history: &HistoryLog,
    emit: &mut dyn FnMut(String) -> Result<(), DialogueError>,
) -> Result<TuiCommandAction, DialogueError> {
    match raw.trim() {
        ":help" => {
            emit(HELP_TEXT.to_string())?;
            Ok(TuiCommandAction::Continue)
        }
        ":history" => {
            for line in history.formatted(config) {
                emit(line)?;
            }
            Ok(TuiCommandAction::Continue)
        }
        ":restart" => {
            engine.restart();
            history.clear();
            emit("restarted".to_string())?;
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":quit" => {
            emit("bye".to_string())?;
            Ok(TuiCommandAction::Quit)
        }
        _ => Ok(TuiCommandAction::NotHandled),
    }
}

/// `None` on end of input.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, DialogueError> {
    write!(writer, "{}", prefix).map_err(map_tui_io)?;
    writer.flush().map_err(map_tui_io)?;
    let mut input = String::new();
    let read = reader.read_line(&mut input).map_err(map_tui_io)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
