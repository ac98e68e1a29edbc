use dl_core::{normalize_tag, DialogueError};
use tracing::{debug, error, warn};

use super::handlers::{handler_for, DispatchContext, Transition};
use super::{AdvanceOutcome, DialogueEngine, EnginePhase};
use crate::reveal::{RevealProcess, RevealSnapshot};

impl DialogueEngine {
    /// Renders the line at the cursor and moves the cursor past it.
    ///
    /// While a choice is pending the same options are returned again; after
    /// termination this is a no-op returning `End`. Errors leave the cursor,
    /// phase and projection untouched.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, DialogueError> {
        match self.phase {
            EnginePhase::Terminated => return Ok(AdvanceOutcome::End),
            EnginePhase::AwaitingChoice => {
                return Ok(AdvanceOutcome::Choices {
                    options: self.pending_options.clone(),
                })
            }
            EnginePhase::Ready | EnginePhase::Presenting => {}
        }

        let address = self.state.current_address;
        let Some(record) = self.graph.get(address) else {
            error!(address, "no script line at cursor");
            return Err(DialogueError::resolution(
                "ENGINE_ADDRESS_NOT_FOUND",
                format!("Address {} is not in the script.", address),
                address,
            ));
        };

        for (index, observer) in self.hooks.observers.iter_mut().enumerate() {
            if let Err(observer_error) = observer.before_dispatch(&self.state) {
                warn!(index, %observer_error, "advance observer failed");
            }
        }

        let Some(tag) = self.tags.resolve(&normalize_tag(&record.tag)) else {
            error!(address, tag = %record.tag, "no handler for line tag");
            return Err(DialogueError::dispatch(
                "ENGINE_UNKNOWN_TAG",
                format!("Line {} has unknown tag \"{}\".", address, record.tag),
                address,
            ));
        };

        debug!(address, %tag, "dispatching line");
        let transition = handler_for(tag)(DispatchContext {
            record,
            graph: &self.graph,
            config: &self.config,
            tags: &self.tags,
            cast: &*self.cast,
            state: &mut self.state,
            hooks: &mut self.hooks,
        })?;

        let outcome = match transition {
            Transition::Present => {
                self.phase = EnginePhase::Presenting;
                self.publish_projection();
                self.start_reveal();
                AdvanceOutcome::Line { address, tag }
            }
            Transition::AwaitChoice(options) => {
                self.phase = EnginePhase::AwaitingChoice;
                self.hooks.options.present_options(&options);
                self.pending_options = options.clone();
                AdvanceOutcome::Choices { options }
            }
            Transition::Terminate => {
                self.phase = EnginePhase::Terminated;
                AdvanceOutcome::End
            }
        };
        Ok(outcome)
    }

    fn publish_projection(&mut self) {
        let render = &mut self.hooks.render;
        render.set_speaker_label(&self.state.speaker_label);
        render.set_body_text(&self.state.body_text);
        render.set_portrait(self.state.portrait.as_ref());
        render.set_avatar_visible(self.state.avatar_visible);
    }

    fn start_reveal(&mut self) {
        self.cancel_reveal();
        let total = (self.units.measure)(&self.state.body_text);
        self.reveal = Some(RevealProcess::start(
            self.reveal_mode,
            total,
            self.reveal_interval,
        ));
    }

    pub(super) fn cancel_reveal(&mut self) {
        if let Some(mut reveal) = self.reveal.take() {
            reveal.cancel();
        }
    }

    /// Drives a manual reveal by one unit. Returns whether it is still running.
    pub fn tick_reveal(&mut self) -> bool {
        self.reveal.as_mut().is_some_and(RevealProcess::tick)
    }

    /// Shows the current line in full. Returns `false` if nothing was running.
    pub fn skip_reveal(&mut self) -> bool {
        match self.reveal.as_mut() {
            Some(reveal) if reveal.is_running() => {
                reveal.finish_now();
                true
            }
            _ => false,
        }
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.as_ref().is_some_and(RevealProcess::is_running)
    }

    pub fn reveal_progress(&self) -> Option<RevealSnapshot> {
        self.reveal.as_ref().map(RevealProcess::snapshot)
    }

    /// Blocks until a threaded reveal has finished or been cancelled.
    pub fn wait_reveal(&mut self) {
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.wait();
        }
    }

    /// The part of the body text the reveal has made visible so far.
    pub fn visible_text(&self) -> String {
        let body = &self.state.body_text;
        match self.reveal_progress() {
            Some(progress) if progress.visible < progress.total => {
                (self.units.prefix)(body, progress.visible).to_string()
            }
            _ => body.clone(),
        }
    }
}
