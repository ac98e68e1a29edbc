use std::sync::Arc;

use dl_core::{DialogueConfig, DialogueError, ErrorKind, ScriptGraph};
use tracing::{debug, warn};

use super::{BranchOption, DialogueEngine, DialogueEngineOptions, EnginePhase, PlaybackState};
use crate::cast::EmptyCast;

impl DialogueEngine {
    pub fn new(options: DialogueEngineOptions) -> Result<Self, DialogueError> {
        options.config.validate()?;

        let Some(first_address) = options.graph.first_address() else {
            return Err(DialogueError::new(
                ErrorKind::Format,
                "ENGINE_SCRIPT_EMPTY",
                "Script graph has no records.",
            ));
        };
        let entry_address = options.entry_address.unwrap_or(first_address);
        if !options.graph.contains(entry_address) {
            return Err(DialogueError::resolution(
                "ENGINE_ENTRY_NOT_FOUND",
                format!("Entry address {} is not in the script.", entry_address),
                entry_address,
            ));
        }

        for (from, to) in options.graph.dangling_jumps() {
            warn!(
                address = from,
                target = to,
                "jump target is not in the script, playback will stall there"
            );
        }

        let reveal_interval = options
            .reveal_interval
            .unwrap_or_else(|| options.config.reveal_interval());
        let tags = options.config.tag_table();

        debug!(
            records = options.graph.len(),
            entry_address,
            ?reveal_interval,
            "dialogue engine ready"
        );

        Ok(Self {
            tags,
            cast: options.cast.unwrap_or_else(|| Arc::new(EmptyCast)),
            hooks: options.hooks,
            entry_address,
            reveal_mode: options.reveal_mode,
            reveal_interval,
            units: options.units,
            state: PlaybackState::at(entry_address),
            phase: EnginePhase::Ready,
            pending_options: Vec::new(),
            reveal: None,
            config: options.config,
            graph: options.graph,
        })
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn cursor(&self) -> i32 {
        self.state.current_address
    }

    pub fn pending_options(&self) -> &[BranchOption] {
        &self.pending_options
    }

    pub fn graph(&self) -> &ScriptGraph {
        &self.graph
    }

    pub fn config(&self) -> &DialogueConfig {
        &self.config
    }

    pub fn entry_address(&self) -> i32 {
        self.entry_address
    }

    /// Back to the entry address in `Ready`, with an empty projection.
    pub fn restart(&mut self) {
        debug!(entry_address = self.entry_address, "restarting dialogue");
        self.cancel_reveal();
        if !self.pending_options.is_empty() {
            self.pending_options.clear();
            self.hooks.options.clear_options();
        }
        self.state = PlaybackState::at(self.entry_address);
        self.phase = EnginePhase::Ready;
    }

    /// Moves the cursor without dispatching. Clears a pending choice and
    /// leaves `Terminated`, so hosts can recover from a stalled cursor.
    pub fn jump_to(&mut self, address: i32) -> Result<(), DialogueError> {
        if !self.graph.contains(address) {
            return Err(DialogueError::resolution(
                "ENGINE_ADDRESS_NOT_FOUND",
                format!("Address {} is not in the script.", address),
                address,
            ));
        }
        if !self.pending_options.is_empty() {
            self.pending_options.clear();
            self.hooks.options.clear_options();
        }
        self.state.current_address = address;
        if matches!(
            self.phase,
            EnginePhase::AwaitingChoice | EnginePhase::Terminated
        ) {
            self.phase = EnginePhase::Presenting;
        }
        debug!(address, "cursor moved by host");
        Ok(())
    }
}
