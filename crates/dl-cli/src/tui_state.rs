use dl_runtime::{DialogueEngine, EnginePhase};

use crate::AutoPlay;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChoiceRow {
    pub(crate) index: usize,
    pub(crate) text: String,
}

/// Frame-to-frame view of the engine plus UI-only toggles.
#[derive(Debug, Default)]
pub(crate) struct TuiUiState {
    pub(crate) speaker_label: String,
    pub(crate) visible_text: String,
    pub(crate) portrait: Option<String>,
    pub(crate) avatar_visible: bool,
    pub(crate) revealing: bool,
    pub(crate) reveal_units: usize,
    pub(crate) choices: Vec<ChoiceRow>,
    pub(crate) selected_choice_index: usize,
    pub(crate) choice_scroll_offset: usize,
    pub(crate) ended: bool,
    pub(crate) history_visible: bool,
    pub(crate) help_visible: bool,
    pub(crate) status: String,
    pub(crate) auto: AutoPlay,
}

impl TuiUiState {
    pub(crate) fn sync_from_engine(&mut self, engine: &DialogueEngine) {
        let state = engine.state();
        self.speaker_label = state.speaker_label.clone();
        self.visible_text = engine.visible_text();
        self.portrait = state.portrait.as_ref().map(|portrait| portrait.asset.clone());
        self.avatar_visible = state.avatar_visible;
        self.revealing = engine.is_revealing();
        self.reveal_units = engine
            .reveal_progress()
            .map_or(0, |progress| progress.total);

        let had_choices = !self.choices.is_empty();
        self.choices = engine
            .pending_options()
            .iter()
            .map(|option| ChoiceRow {
                index: option.index,
                text: option.label.clone(),
            })
            .collect();
        if self.choices.is_empty() || !had_choices {
            self.selected_choice_index = 0;
            self.choice_scroll_offset = 0;
        }

        self.ended = engine.phase() == EnginePhase::Terminated;
    }

    /// Fully shown line with nothing else pending: the only moment auto-play may act.
    pub(crate) fn line_settled(&self) -> bool {
        !self.revealing && self.choices.is_empty() && !self.ended
    }
}
