use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of line kinds a script row can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LineTag {
    Speech,
    Narration,
    Branch,
    Terminate,
}

impl LineTag {
    pub const ALL: [LineTag; 4] = [
        LineTag::Speech,
        LineTag::Narration,
        LineTag::Branch,
        LineTag::Terminate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Speech => "speech",
            Self::Narration => "narration",
            Self::Branch => "branch",
            Self::Terminate => "terminate",
        }
    }
}

impl fmt::Display for LineTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One validated script row.
///
/// `tag` keeps the normalized (trimmed, uppercased) source text; it is mapped
/// onto a [`LineTag`] through the configured tag table at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRecord {
    pub address: i32,
    pub tag: String,
    pub speaker: String,
    pub body: String,
    /// `None` only for terminate rows, whose jump cell is never read.
    pub next_address: Option<i32>,
    pub visual_variant: String,
}

/// Address-keyed collection of records. Immutable once handed to an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptGraph {
    records: BTreeMap<i32, ScriptRecord>,
}

impl ScriptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, returning the one it displaced at the same address.
    pub fn insert(&mut self, record: ScriptRecord) -> Option<ScriptRecord> {
        self.records.insert(record.address, record)
    }

    pub fn get(&self, address: i32) -> Option<&ScriptRecord> {
        self.records.get(&address)
    }

    pub fn contains(&self, address: i32) -> bool {
        self.records.contains_key(&address)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_address(&self) -> Option<i32> {
        self.records.keys().next().copied()
    }

    pub fn addresses(&self) -> impl Iterator<Item = i32> + '_ {
        self.records.keys().copied()
    }

    pub fn records(&self) -> impl Iterator<Item = &ScriptRecord> {
        self.records.values()
    }

    /// Jump targets that do not resolve to any record, as `(from, to)` pairs.
    pub fn dangling_jumps(&self) -> Vec<(i32, i32)> {
        self.records
            .values()
            .filter_map(|record| record.next_address.map(|next| (record.address, next)))
            .filter(|(_, next)| !self.records.contains_key(next))
            .collect()
    }
}

impl FromIterator<ScriptRecord> for ScriptGraph {
    fn from_iter<T: IntoIterator<Item = ScriptRecord>>(iter: T) -> Self {
        let mut graph = ScriptGraph::new();
        for record in iter {
            graph.insert(record);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(address: i32, tag: &str, next: Option<i32>) -> ScriptRecord {
        ScriptRecord {
            address,
            tag: tag.to_string(),
            speaker: String::new(),
            body: format!("line {}", address),
            next_address: next,
            visual_variant: "default".to_string(),
        }
    }

    #[test]
    fn insert_reports_displaced_record() {
        let mut graph = ScriptGraph::new();
        assert!(graph.insert(record(1, "T", Some(2))).is_none());
        let displaced = graph
            .insert(record(1, "W", Some(3)))
            .expect("second insert should displace");
        assert_eq!(displaced.tag, "T");
        assert_eq!(graph.get(1).map(|r| r.tag.as_str()), Some("W"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn first_address_is_lowest_key_not_insertion_order() {
        let graph: ScriptGraph = vec![record(7, "T", Some(3)), record(3, "END", None)]
            .into_iter()
            .collect();
        assert_eq!(graph.first_address(), Some(3));
        assert_eq!(graph.addresses().collect::<Vec<_>>(), vec![3, 7]);
    }

    #[test]
    fn dangling_jumps_ignore_terminate_rows() {
        let graph: ScriptGraph = vec![
            record(0, "W", Some(1)),
            record(1, "T", Some(99)),
            record(2, "END", None),
        ]
        .into_iter()
        .collect();
        assert_eq!(graph.dangling_jumps(), vec![(1, 99)]);
    }

    #[test]
    fn record_serializes_camel_case() {
        let json = serde_json::to_value(record(4, "END", None)).expect("serialize");
        assert_eq!(json["nextAddress"], serde_json::Value::Null);
        assert_eq!(json["visualVariant"], "default");
        assert_eq!(LineTag::Branch.to_string(), "branch");
    }
}
