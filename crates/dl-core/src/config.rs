use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DialogueError;
use crate::types::LineTag;

/// Column positions of each logical field within a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnLayout {
    pub address: usize,
    pub tag: usize,
    pub speaker: usize,
    pub body: usize,
    pub next_address: usize,
    pub visual_variant: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            address: 0,
            tag: 1,
            speaker: 2,
            body: 3,
            next_address: 4,
            visual_variant: 5,
        }
    }
}

impl ColumnLayout {
    /// Highest index among the mandatory columns (everything but the variant).
    pub fn highest_required(&self) -> usize {
        [
            self.address,
            self.tag,
            self.speaker,
            self.body,
            self.next_address,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Source strings recognized for each [`LineTag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecognizedTags {
    pub speech: String,
    pub narration: String,
    pub branch: String,
    pub terminate: String,
}

impl Default for RecognizedTags {
    fn default() -> Self {
        Self {
            speech: "W".to_string(),
            narration: "T".to_string(),
            branch: "O".to_string(),
            terminate: "END".to_string(),
        }
    }
}

impl RecognizedTags {
    pub fn source_for(&self, tag: LineTag) -> &str {
        match tag {
            LineTag::Speech => &self.speech,
            LineTag::Narration => &self.narration,
            LineTag::Branch => &self.branch,
            LineTag::Terminate => &self.terminate,
        }
    }
}

/// Trim + uppercase, the normalization applied to tag cells and configured tags alike.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Lookup from normalized tag text to [`LineTag`], built once per parser/engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTable {
    by_source: HashMap<String, LineTag>,
}

impl TagTable {
    pub fn from_tags(tags: &RecognizedTags) -> Self {
        let by_source = LineTag::ALL
            .into_iter()
            .map(|tag| (normalize_tag(tags.source_for(tag)), tag))
            .collect();
        Self { by_source }
    }

    /// Expects an already-normalized tag; matching is exact.
    pub fn resolve(&self, normalized: &str) -> Option<LineTag> {
        self.by_source.get(normalized).copied()
    }
}

// Negative, NaN and overflowing values collapse to zero.
fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value.max(0.0)).unwrap_or(Duration::ZERO)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DialogueConfig {
    pub columns: ColumnLayout,
    pub field_delimiter: char,
    pub line_delimiter: char,
    pub header_row_index: usize,
    pub min_required_columns: usize,
    pub tags: RecognizedTags,
    pub default_variant_name: String,
    pub empty_field: String,
    pub reveal_interval_secs: f32,
    pub auto_play_delay_after_audio_secs: f32,
    pub auto_play_text_speed_multiplier: f32,
    pub speaker_label_open: String,
    pub speaker_label_close: String,
    pub body_indent: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            columns: ColumnLayout::default(),
            field_delimiter: ',',
            line_delimiter: '\n',
            header_row_index: 0,
            min_required_columns: 5,
            tags: RecognizedTags::default(),
            default_variant_name: "default".to_string(),
            empty_field: String::new(),
            reveal_interval_secs: 0.025,
            auto_play_delay_after_audio_secs: 1.0,
            auto_play_text_speed_multiplier: 6.0,
            speaker_label_open: "【".to_string(),
            speaker_label_close: "】".to_string(),
            body_indent: "  ".to_string(),
        }
    }
}

impl DialogueConfig {
    pub fn reveal_interval(&self) -> Duration {
        secs(self.reveal_interval_secs)
    }

    /// Hold time an auto-play collaborator waits after a fully revealed line of
    /// `units` visible units before advancing.
    pub fn auto_play_hold(&self, units: usize) -> Duration {
        let per_unit = self.reveal_interval_secs * self.auto_play_text_speed_multiplier;
        secs(per_unit * units as f32)
    }

    pub fn tag_table(&self) -> TagTable {
        TagTable::from_tags(&self.tags)
    }

    pub fn speaker_label(&self, name: &str) -> String {
        format!(
            "{}{}{}",
            self.speaker_label_open, name, self.speaker_label_close
        )
    }

    pub fn indented_body(&self, body: &str) -> String {
        format!("{}{}", self.body_indent, body)
    }

    pub fn validate(&self) -> Result<(), DialogueError> {
        if self.field_delimiter == self.line_delimiter {
            return Err(DialogueError::config(
                "CONFIG_DELIMITER_CLASH",
                format!(
                    "Field and line delimiter must differ (both are {:?}).",
                    self.field_delimiter
                ),
            ));
        }
        if self.field_delimiter == '\r' {
            return Err(DialogueError::config(
                "CONFIG_DELIMITER_CLASH",
                "Field delimiter cannot be a carriage return.",
            ));
        }

        let mut seen: HashMap<String, LineTag> = HashMap::new();
        for tag in LineTag::ALL {
            let normalized = normalize_tag(self.tags.source_for(tag));
            if normalized.is_empty() {
                return Err(DialogueError::config(
                    "CONFIG_TAG_EMPTY",
                    format!("Tag for {} must not be empty.", tag),
                ));
            }
            if let Some(existing) = seen.insert(normalized.clone(), tag) {
                return Err(DialogueError::config(
                    "CONFIG_TAG_DUPLICATE",
                    format!(
                        "Tag \"{}\" is used for both {} and {}.",
                        normalized, existing, tag
                    ),
                ));
            }
        }

        let needed = self.columns.highest_required() + 1;
        if self.min_required_columns < needed {
            return Err(DialogueError::config(
                "CONFIG_MIN_COLUMNS",
                format!(
                    "minRequiredColumns is {} but the column layout needs at least {}.",
                    self.min_required_columns, needed
                ),
            ));
        }

        if self.reveal_interval_secs.is_nan() || self.reveal_interval_secs <= 0.0 {
            return Err(DialogueError::config(
                "CONFIG_REVEAL_INTERVAL",
                "revealIntervalSecs must be positive.",
            ));
        }

        Ok(())
    }
}
