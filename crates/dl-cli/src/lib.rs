use std::ffi::OsString;

use clap::Parser;
use dl_core::DialogueError;
use dl_runtime::RevealMode;

mod agent;
mod auto_play;
mod boundary_runner;
mod cast_dir;
mod cli_args;
mod error_map;
mod history;
mod line_tui;
mod logging;
mod models;
mod session;
mod source_loader;
mod tui;
mod tui_actions;
mod tui_render;
mod tui_state;

pub(crate) use auto_play::AutoPlay;
pub(crate) use boundary_runner::{
    choose_to_boundary, emit_chosen, emit_event, emit_line, run_to_boundary,
};
pub(crate) use cast_dir::{load_cast_dir, load_cast_file};
pub(crate) use cli_args::{CheckArgs, Cli, Mode, PlayArgs, RunArgs, ScriptArgs, TuiArgs};
pub(crate) use error_map::{
    emit_error, json_string, map_cli_cast_invalid, map_cli_cast_scan, map_cli_config_invalid,
    map_cli_source_path, map_cli_source_read, map_tui_io,
};
pub(crate) use history::HistoryLog;
#[cfg(test)]
pub(crate) use history::{format_entry, HistoryEntry};
pub(crate) use line_tui::run_play_line_mode;
#[cfg(test)]
pub(crate) use line_tui::{emit_to, handle_line_cmd, run_play_line_mode_with_io};
pub(crate) use logging::init_tracing;
pub(crate) use models::{BoundaryEvent, BoundaryResult, LoadedScript, RenderedLine, TuiCommandAction};
pub(crate) use session::create_engine_for_script;
pub(crate) use source_loader::{load_config, load_script_source, read_text, resolve_file};
#[cfg(test)]
pub(crate) use source_loader::resolve_dir;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    // The full-screen player owns the terminal; logs only when asked for.
    let fallback = match cli.command {
        Mode::Tui(_) => "off",
        _ => "warn",
    };
    init_tracing(fallback);
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, DialogueError> {
    match cli.command {
        Mode::Check(args) => agent::run_check(args),
        Mode::Run(args) => agent::run_script(args),
        Mode::Play(args) => run_play(args),
        Mode::Tui(args) => run_tui(args),
    }
}

fn run_play(args: PlayArgs) -> Result<i32, DialogueError> {
    let script = load_script_source(&args.source)?;
    let history = HistoryLog::default();
    let mut engine = create_engine_for_script(&script, &history, RevealMode::Manual)?;
    run_play_line_mode(&script, &mut engine, &history)
}

fn run_tui(args: TuiArgs) -> Result<i32, DialogueError> {
    let script = load_script_source(&args.source)?;
    let history = HistoryLog::default();
    let mut engine = create_engine_for_script(&script, &history, RevealMode::Threaded)?;
    tui::run_tui_ratatui_mode(&script, &mut engine, &history, args.auto)
}
