use std::cell::RefCell;
use std::rc::Rc;

use dl_core::{normalize_tag, DialogueConfig, ScriptRecord};
use dl_runtime::HistorySink;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HistoryEntry {
    pub(crate) address: i32,
    pub(crate) tag: String,
    pub(crate) speaker: String,
    pub(crate) body: String,
}

/// Shared log of shown lines and picked options; one clone goes into the
/// engine hooks, the other stays with the UI.
#[derive(Debug, Clone, Default)]
pub(crate) struct HistoryLog {
    entries: Rc<RefCell<Vec<HistoryEntry>>>,
}

impl HistoryLog {
    #[cfg(test)]
    pub(crate) fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.borrow().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub(crate) fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub(crate) fn formatted(&self, config: &DialogueConfig) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .map(|entry| format_entry(entry, config))
            .collect()
    }
}

impl HistorySink for HistoryLog {
    fn record_line(&mut self, record: &ScriptRecord) {
        self.entries.borrow_mut().push(HistoryEntry {
            address: record.address,
            tag: record.tag.clone(),
            speaker: record.speaker.clone(),
            body: record.body.clone(),
        });
    }
}

pub(crate) fn format_entry(entry: &HistoryEntry, config: &DialogueConfig) -> String {
    if normalize_tag(&entry.tag) == normalize_tag(&config.tags.branch) {
        return format!("> {}", entry.body);
    }
    if entry.speaker.is_empty() || normalize_tag(&entry.tag) == normalize_tag(&config.tags.narration)
    {
        return entry.body.clone();
    }
    format!("{} {}", config.speaker_label(&entry.speaker), entry.body)
}
