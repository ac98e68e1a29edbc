//! One handler per [`LineTag`]. Handlers check everything that can fail
//! before touching the projection, so an error leaves state as it was.

use dl_core::{
    normalize_tag, DialogueConfig, DialogueError, LineTag, ScriptGraph, ScriptRecord, TagTable,
};
use tracing::{debug, info, warn};

use super::{BranchOption, PlaybackState};
use crate::cast::CastRegistry;
use crate::host::EngineHooks;

pub(super) enum Transition {
    Present,
    AwaitChoice(Vec<BranchOption>),
    Terminate,
}

pub(super) struct DispatchContext<'a> {
    pub record: &'a ScriptRecord,
    pub graph: &'a ScriptGraph,
    pub config: &'a DialogueConfig,
    pub tags: &'a TagTable,
    pub cast: &'a dyn CastRegistry,
    pub state: &'a mut PlaybackState,
    pub hooks: &'a mut EngineHooks,
}

pub(super) type Handler = fn(DispatchContext<'_>) -> Result<Transition, DialogueError>;

pub(super) fn handler_for(tag: LineTag) -> Handler {
    match tag {
        LineTag::Speech => present_speech,
        LineTag::Narration => present_narration,
        LineTag::Branch => surface_branch,
        LineTag::Terminate => terminate,
    }
}

fn require_next(record: &ScriptRecord) -> Result<i32, DialogueError> {
    record.next_address.ok_or_else(|| {
        DialogueError::dispatch(
            "ENGINE_JUMP_MISSING",
            format!("Line {} has no jump target.", record.address),
            record.address,
        )
    })
}

fn present_speech(ctx: DispatchContext<'_>) -> Result<Transition, DialogueError> {
    let next = require_next(ctx.record)?;
    let record = ctx.record;

    match ctx.cast.find_speaker(&record.speaker) {
        Some(speaker) => {
            let portrait = ctx
                .cast
                .find_visual_variant(speaker, &record.visual_variant);
            if portrait.is_none() {
                warn!(
                    address = record.address,
                    speaker = %speaker.name,
                    variant = %record.visual_variant,
                    "no visual variant for speaker, hiding portrait"
                );
            }
            ctx.state.avatar_visible = speaker.has_portrait;
            ctx.state.portrait = portrait;
            ctx.state.speaker_label = ctx.config.speaker_label(&speaker.name);
        }
        None => {
            warn!(
                address = record.address,
                speaker = %record.speaker,
                "speaker not found in cast"
            );
            ctx.state.avatar_visible = false;
            ctx.state.portrait = None;
            ctx.state.speaker_label = ctx.config.speaker_label(&record.speaker);
        }
    }

    Ok(finish_line(ctx, next))
}

fn present_narration(ctx: DispatchContext<'_>) -> Result<Transition, DialogueError> {
    let next = require_next(ctx.record)?;
    ctx.state.avatar_visible = false;
    ctx.state.portrait = None;
    ctx.state.speaker_label = ctx.config.empty_field.clone();
    Ok(finish_line(ctx, next))
}

fn finish_line(ctx: DispatchContext<'_>, next: i32) -> Transition {
    let record = ctx.record;
    ctx.state.body_text = ctx.config.indented_body(&record.body);
    ctx.state.current_address = next;
    ctx.state.shown_address = Some(record.address);
    ctx.hooks.history.record_line(record);
    Transition::Present
}

// Branch rows of one choice point sit at consecutive addresses.
fn surface_branch(ctx: DispatchContext<'_>) -> Result<Transition, DialogueError> {
    let mut options = Vec::new();
    let mut cursor = Some(ctx.record.address);

    while let Some(address) = cursor {
        let Some(record) = ctx.graph.get(address) else {
            break;
        };
        if ctx.tags.resolve(&normalize_tag(&record.tag)) != Some(LineTag::Branch) {
            break;
        }
        let target = require_next(record)?;
        options.push(BranchOption {
            index: options.len(),
            address,
            label: record.body.clone(),
            target,
        });
        cursor = address.checked_add(1);
    }

    debug!(
        address = ctx.record.address,
        options = options.len(),
        "surfacing branch options"
    );
    Ok(Transition::AwaitChoice(options))
}

fn terminate(ctx: DispatchContext<'_>) -> Result<Transition, DialogueError> {
    info!(address = ctx.record.address, "dialogue terminated");
    ctx.hooks.termination.terminated(ctx.record);
    Ok(Transition::Terminate)
}
