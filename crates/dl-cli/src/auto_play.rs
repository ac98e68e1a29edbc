use std::time::Instant;

use dl_core::DialogueConfig;

/// Auto-advance timer for interactive players. Holds a fully revealed line
/// for `config.auto_play_hold(units)` and never advances past a choice.
#[derive(Debug, Default)]
pub(crate) struct AutoPlay {
    enabled: bool,
    hold_until: Option<Instant>,
}

impl AutoPlay {
    pub(crate) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            hold_until: None,
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.hold_until = None;
        self.enabled
    }

    /// `line_settled` is true when the current line is fully shown and the
    /// engine is neither waiting on a choice nor terminated.
    pub(crate) fn poll(
        &mut self,
        now: Instant,
        line_settled: bool,
        units: usize,
        config: &DialogueConfig,
    ) -> bool {
        if !self.enabled || !line_settled {
            self.hold_until = None;
            return false;
        }
        match self.hold_until {
            None => {
                self.hold_until = Some(now + config.auto_play_hold(units));
                false
            }
            Some(deadline) if now >= deadline => {
                self.hold_until = None;
                true
            }
            Some(_) => false,
        }
    }
}
