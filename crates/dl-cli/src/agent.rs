use dl_core::{DialogueError, ErrorKind};
use dl_parser::{parse_with_report, validate_format};
use dl_runtime::RevealMode;
use tracing::info;

use crate::{
    choose_to_boundary, create_engine_for_script, emit_chosen, emit_event, emit_line,
    json_string, load_config, load_script_source, read_text, resolve_file, run_to_boundary,
    BoundaryEvent, CheckArgs, HistoryLog, RenderedLine, RunArgs,
};

enum TranscriptEntry {
    Line(RenderedLine),
    Chose { index: usize, label: String },
}

pub(crate) fn run_check(args: CheckArgs) -> Result<i32, DialogueError> {
    let config = load_config(args.config.as_deref())?;
    let text = read_text(&resolve_file(&args.script)?)?;

    let verdict = validate_format(&text, &config);
    let reason = verdict.reason.clone();
    verdict.into_result()?;

    let report = parse_with_report(&text, &config);
    println!("RESULT:OK");
    println!("FORMAT_JSON:{}", json_string(&reason));
    println!("RECORDS:{}", report.graph.len());
    for issue in &report.issues {
        let error = issue.to_error();
        println!(
            "ISSUE:{}|{}|{}",
            issue.line_number,
            error.code,
            json_string(&error.message)
        );
    }
    for (from, to) in report.graph.dangling_jumps() {
        println!("DANGLING:{}|{}", from, to);
    }
    Ok(0)
}

pub(crate) fn run_script(args: RunArgs) -> Result<i32, DialogueError> {
    let script = load_script_source(&args.source)?;
    let history = HistoryLog::default();
    let mut engine = create_engine_for_script(&script, &history, RevealMode::Manual)?;

    let mut transcript = Vec::new();
    let mut boundary = run_to_boundary(&mut engine)?;

    for &index in &args.choices {
        transcript.extend(boundary.lines.drain(..).map(TranscriptEntry::Line));
        if boundary.event != BoundaryEvent::Choices {
            return Err(DialogueError::new(
                ErrorKind::State,
                "CLI_CHOICE_UNUSED",
                format!("--choice {} given but the dialogue already ended.", index),
            ));
        }
        let label = boundary
            .choices
            .iter()
            .find(|(option_index, _)| *option_index == index)
            .map(|(_, label)| label.clone())
            .unwrap_or_default();
        boundary = choose_to_boundary(&mut engine, index)?;
        transcript.push(TranscriptEntry::Chose { index, label });
    }
    transcript.extend(boundary.lines.drain(..).map(TranscriptEntry::Line));

    info!(
        script = %script.title,
        history = history.len(),
        "run finished at boundary"
    );

    println!("RESULT:OK");
    for entry in &transcript {
        match entry {
            TranscriptEntry::Line(line) => emit_line(line),
            TranscriptEntry::Chose { index, label } => emit_chosen(*index, label),
        }
    }
    emit_event(&boundary);
    Ok(0)
}
