use std::sync::Arc;
use std::time::Duration;

use dl_core::{DialogueConfig, DialogueError};
use dl_parser::{parse_with_report, validate_format, ParseReport};
use dl_runtime::{
    CastRegistry, DialogueEngine, DialogueEngineOptions, EngineHooks, RevealMode, RevealUnits,
};
use tracing::warn;

pub struct CreateEngineFromTextOptions {
    pub script_text: String,
    pub config: DialogueConfig,
    pub cast: Option<Arc<dyn CastRegistry>>,
    pub hooks: EngineHooks,
    pub entry_address: Option<i32>,
    pub reveal_mode: RevealMode,
    pub reveal_interval: Option<Duration>,
}

impl CreateEngineFromTextOptions {
    pub fn new(script_text: impl Into<String>) -> Self {
        Self {
            script_text: script_text.into(),
            config: DialogueConfig::default(),
            cast: None,
            hooks: EngineHooks::default(),
            entry_address: None,
            reveal_mode: RevealMode::Manual,
            reveal_interval: None,
        }
    }
}

/// Config check, format pre-check, then a best-effort parse. Fails when no
/// row survives parsing.
pub fn load_script(text: &str, config: &DialogueConfig) -> Result<ParseReport, DialogueError> {
    config.validate()?;
    validate_format(text, config).into_result()?;

    let report = parse_with_report(text, config);
    if report.graph.is_empty() {
        return Err(DialogueError::format(
            "API_SCRIPT_EMPTY",
            format!(
                "No playable rows were parsed ({} rows skipped).",
                report.skipped().count()
            ),
        ));
    }
    Ok(report)
}

pub fn create_engine_from_text(
    options: CreateEngineFromTextOptions,
) -> Result<DialogueEngine, DialogueError> {
    let report = load_script(&options.script_text, &options.config)?;
    let skipped = report.skipped().count();
    if skipped > 0 {
        warn!(skipped, "script loaded with skipped rows");
    }

    DialogueEngine::new(DialogueEngineOptions {
        graph: report.graph,
        config: options.config,
        cast: options.cast,
        hooks: options.hooks,
        entry_address: options.entry_address,
        reveal_mode: options.reveal_mode,
        reveal_interval: options.reveal_interval,
        units: RevealUnits::CHARS,
    })
}
