use dl_core::DialogueError;
use tracing::debug;

use super::{AdvanceOutcome, DialogueEngine, EnginePhase};

impl DialogueEngine {
    /// Picks one of the pending branch options, moves the cursor to its
    /// target and advances from there.
    pub fn choose(&mut self, index: usize) -> Result<AdvanceOutcome, DialogueError> {
        if self.phase != EnginePhase::AwaitingChoice || self.pending_options.is_empty() {
            return Err(DialogueError::state(
                "ENGINE_NO_PENDING_CHOICE",
                "No pending choice is available.",
            ));
        }

        let Some(option) = self.pending_options.get(index).cloned() else {
            return Err(DialogueError::state(
                "ENGINE_CHOICE_INDEX",
                format!("Choice index \"{}\" is out of range.", index),
            ));
        };

        if let Some(record) = self.graph.get(option.address) {
            self.hooks.history.record_line(record);
        }
        self.pending_options.clear();
        self.hooks.options.clear_options();

        debug!(
            index,
            address = option.address,
            target = option.target,
            "branch option chosen"
        );
        self.state.current_address = option.target;
        self.phase = EnginePhase::Presenting;
        self.advance()
    }
}
