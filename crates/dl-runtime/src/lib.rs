pub mod cast;
pub mod engine;
pub mod host;
pub mod reveal;

pub use cast::{resolve_variant, CastRegistry, EmptyCast, InMemoryCast};
pub use engine::{
    char_prefix, char_units, AdvanceOutcome, BranchOption, DialogueEngine, DialogueEngineOptions,
    EnginePhase, PlaybackState, RevealUnits,
};
pub use host::{
    AdvanceObserver, EngineHooks, HistorySink, NoopHost, OptionsSurface, RenderSink,
    TerminationSignal,
};
pub use reveal::{RevealMode, RevealProcess, RevealProgress, RevealSnapshot};
