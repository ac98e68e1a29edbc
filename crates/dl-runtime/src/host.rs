//! Capabilities the engine calls out to. Every method has a no-op default so
//! hosts only implement what they render.

use dl_core::{DialogueError, ScriptRecord, VisualVariantRef};

use crate::engine::{BranchOption, PlaybackState};

pub trait RenderSink {
    fn set_speaker_label(&mut self, _label: &str) {}
    fn set_body_text(&mut self, _text: &str) {}
    fn set_portrait(&mut self, _portrait: Option<&VisualVariantRef>) {}
    fn set_avatar_visible(&mut self, _visible: bool) {}
}

pub trait OptionsSurface {
    fn present_options(&mut self, _options: &[BranchOption]) {}
    fn clear_options(&mut self) {}
}

/// Receives every dispatched speech/narration line and every chosen branch line.
pub trait HistorySink {
    fn record_line(&mut self, _record: &ScriptRecord) {}
}

pub trait TerminationSignal {
    fn terminated(&mut self, _record: &ScriptRecord) {}
}

/// Runs once per dispatched `advance()`, before the line is handled, so the
/// state it sees is still the previous line's.
pub trait AdvanceObserver {
    fn before_dispatch(&mut self, state: &PlaybackState) -> Result<(), DialogueError>;
}

impl<F> AdvanceObserver for F
where
    F: FnMut(&PlaybackState) -> Result<(), DialogueError>,
{
    fn before_dispatch(&mut self, state: &PlaybackState) -> Result<(), DialogueError> {
        self(state)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl RenderSink for NoopHost {}
impl OptionsSurface for NoopHost {}
impl HistorySink for NoopHost {}
impl TerminationSignal for NoopHost {}

pub struct EngineHooks {
    pub render: Box<dyn RenderSink>,
    pub options: Box<dyn OptionsSurface>,
    pub history: Box<dyn HistorySink>,
    pub termination: Box<dyn TerminationSignal>,
    pub observers: Vec<Box<dyn AdvanceObserver>>,
}

impl Default for EngineHooks {
    fn default() -> Self {
        Self {
            render: Box::new(NoopHost),
            options: Box::new(NoopHost),
            history: Box::new(NoopHost),
            termination: Box::new(NoopHost),
            observers: Vec::new(),
        }
    }
}

impl EngineHooks {
    pub fn with_render(mut self, render: impl RenderSink + 'static) -> Self {
        self.render = Box::new(render);
        self
    }

    pub fn with_options(mut self, options: impl OptionsSurface + 'static) -> Self {
        self.options = Box::new(options);
        self
    }

    pub fn with_history(mut self, history: impl HistorySink + 'static) -> Self {
        self.history = Box::new(history);
        self
    }

    pub fn with_termination(mut self, termination: impl TerminationSignal + 'static) -> Self {
        self.termination = Box::new(termination);
        self
    }

    pub fn with_observer(mut self, observer: impl AdvanceObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }
}
