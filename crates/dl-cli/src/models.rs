use std::sync::Arc;

use dl_core::DialogueConfig;
use dl_runtime::CastRegistry;

/// Everything needed to (re)build an engine for one script file.
#[derive(Clone)]
pub(crate) struct LoadedScript {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) text: String,
    pub(crate) config: DialogueConfig,
    pub(crate) cast: Arc<dyn CastRegistry>,
    pub(crate) entry_address: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoundaryEvent {
    Choices,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RenderedLine {
    pub(crate) address: i32,
    pub(crate) speaker_label: String,
    pub(crate) text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct BoundaryResult {
    pub(crate) event: BoundaryEvent,
    pub(crate) lines: Vec<RenderedLine>,
    pub(crate) choices: Vec<(usize, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TuiCommandAction {
    NotHandled,
    Continue,
    RefreshBoundary,
    Quit,
}
