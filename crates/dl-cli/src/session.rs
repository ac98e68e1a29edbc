use std::sync::Arc;

use dl_api::{create_engine_from_text, CreateEngineFromTextOptions};
use dl_core::DialogueError;
use dl_runtime::{DialogueEngine, EngineHooks, PlaybackState, RevealMode};
use tracing::debug;

use crate::{HistoryLog, LoadedScript};

pub(crate) fn create_engine_for_script(
    script: &LoadedScript,
    history: &HistoryLog,
    reveal_mode: RevealMode,
) -> Result<DialogueEngine, DialogueError> {
    let hooks = EngineHooks::default()
        .with_history(history.clone())
        .with_observer(|state: &PlaybackState| -> Result<(), DialogueError> {
            debug!(
                cursor = state.current_address,
                shown = ?state.shown_address,
                "advancing"
            );
            Ok(())
        });

    debug!(script = %script.id, mode = ?reveal_mode, "creating engine");
    let mut options = CreateEngineFromTextOptions::new(script.text.clone());
    options.config = script.config.clone();
    options.cast = Some(Arc::clone(&script.cast));
    options.hooks = hooks;
    options.entry_address = script.entry_address;
    options.reveal_mode = reveal_mode;
    create_engine_from_text(options)
}
