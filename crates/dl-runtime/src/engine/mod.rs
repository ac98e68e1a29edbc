use std::sync::Arc;
use std::time::Duration;

use dl_core::{DialogueConfig, LineTag, ScriptGraph, TagTable, VisualVariantRef};

use crate::cast::CastRegistry;
use crate::host::EngineHooks;
use crate::reveal::{RevealMode, RevealProcess};

mod boundary;
mod handlers;
mod lifecycle;
mod step;

/// Unit count used for reveal pacing when the host supplies no measure.
pub fn char_units(text: &str) -> usize {
    text.chars().count()
}

/// Leading part of `text` covering its first `units` chars.
pub fn char_prefix(text: &str, units: usize) -> &str {
    match text.char_indices().nth(units) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// How body text is counted and cut for the reveal. Both functions must agree
/// on what one unit is.
#[derive(Clone, Copy)]
pub struct RevealUnits {
    pub measure: fn(&str) -> usize,
    pub prefix: fn(&str, usize) -> &str,
}

impl RevealUnits {
    pub const CHARS: Self = Self {
        measure: char_units,
        prefix: char_prefix,
    };
}

impl Default for RevealUnits {
    fn default() -> Self {
        Self::CHARS
    }
}

pub struct DialogueEngineOptions {
    pub graph: ScriptGraph,
    pub config: DialogueConfig,
    pub cast: Option<Arc<dyn CastRegistry>>,
    pub hooks: EngineHooks,
    /// Defaults to the lowest address in the graph.
    pub entry_address: Option<i32>,
    pub reveal_mode: RevealMode,
    /// Overrides `config.reveal_interval()` for this engine.
    pub reveal_interval: Option<Duration>,
    /// Reveal unit definition; defaults to [`RevealUnits::CHARS`].
    pub units: RevealUnits,
}

impl DialogueEngineOptions {
    pub fn new(graph: ScriptGraph) -> Self {
        Self {
            graph,
            config: DialogueConfig::default(),
            cast: None,
            hooks: EngineHooks::default(),
            entry_address: None,
            reveal_mode: RevealMode::Manual,
            reveal_interval: None,
            units: RevealUnits::CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Ready,
    Presenting,
    AwaitingChoice,
    Terminated,
}

/// Cursor plus the rendered projection of the last presented line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub current_address: i32,
    pub speaker_label: String,
    pub body_text: String,
    pub portrait: Option<VisualVariantRef>,
    pub avatar_visible: bool,
    /// Address of the line the projection belongs to.
    pub shown_address: Option<i32>,
}

impl PlaybackState {
    fn at(address: i32) -> Self {
        Self {
            current_address: address,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchOption {
    pub index: usize,
    /// Address of the branch record this option came from.
    pub address: i32,
    pub label: String,
    pub target: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Line { address: i32, tag: LineTag },
    Choices { options: Vec<BranchOption> },
    End,
}

pub struct DialogueEngine {
    config: DialogueConfig,
    graph: ScriptGraph,
    tags: TagTable,
    cast: Arc<dyn CastRegistry>,
    hooks: EngineHooks,
    entry_address: i32,
    reveal_mode: RevealMode,
    reveal_interval: Duration,
    units: RevealUnits,

    state: PlaybackState,
    phase: EnginePhase,
    pending_options: Vec<BranchOption>,
    reveal: Option<RevealProcess>,
}
