use dl_core::{DialogueError, ErrorKind};
use dl_runtime::{AdvanceOutcome, DialogueEngine};

use crate::{json_string, BoundaryEvent, BoundaryResult, RenderedLine};

const STEP_LIMIT: usize = 10_000;

/// Advances until a choice or the end, collecting every rendered line.
pub(crate) fn run_to_boundary(engine: &mut DialogueEngine) -> Result<BoundaryResult, DialogueError> {
    drive(engine, None)
}

/// Applies a choice, then runs to the next boundary. The line the choice
/// jumps to is part of the result.
pub(crate) fn choose_to_boundary(
    engine: &mut DialogueEngine,
    index: usize,
) -> Result<BoundaryResult, DialogueError> {
    let outcome = engine.choose(index)?;
    drive(engine, Some(outcome))
}

pub(crate) fn rendered_line(engine: &DialogueEngine, address: i32) -> RenderedLine {
    let state = engine.state();
    RenderedLine {
        address,
        speaker_label: state.speaker_label.clone(),
        text: state.body_text.clone(),
    }
}

fn drive(
    engine: &mut DialogueEngine,
    mut pending: Option<AdvanceOutcome>,
) -> Result<BoundaryResult, DialogueError> {
    let mut lines = Vec::new();

    for _ in 0..STEP_LIMIT {
        let outcome = match pending.take() {
            Some(outcome) => outcome,
            None => engine.advance()?,
        };
        match outcome {
            AdvanceOutcome::Line { address, .. } => {
                engine.skip_reveal();
                lines.push(rendered_line(engine, address));
            }
            AdvanceOutcome::Choices { options } => {
                return Ok(BoundaryResult {
                    event: BoundaryEvent::Choices,
                    lines,
                    choices: options
                        .into_iter()
                        .map(|option| (option.index, option.label))
                        .collect(),
                })
            }
            AdvanceOutcome::End => {
                return Ok(BoundaryResult {
                    event: BoundaryEvent::End,
                    lines,
                    choices: Vec::new(),
                })
            }
        }
    }

    Err(DialogueError::new(
        ErrorKind::State,
        "CLI_STEP_LIMIT",
        format!(
            "No choice or end reached after {} lines; the script may loop.",
            STEP_LIMIT
        ),
    ))
}

pub(crate) fn emit_line(line: &RenderedLine) {
    println!("LINE:{}", line.address);
    println!("SPEAKER_JSON:{}", json_string(&line.speaker_label));
    println!("TEXT_JSON:{}", json_string(&line.text));
}

pub(crate) fn emit_chosen(index: usize, label: &str) {
    println!("CHOSE:{}|{}", index, json_string(label));
}

pub(crate) fn emit_event(boundary: &BoundaryResult) {
    match boundary.event {
        BoundaryEvent::Choices => println!("EVENT:CHOICES"),
        BoundaryEvent::End => println!("EVENT:END"),
    }
    for (index, label) in &boundary.choices {
        println!("CHOICE:{}|{}", index, json_string(label));
    }
}
