use dl_core::{
    normalize_tag, DialogueConfig, DialogueError, ErrorKind, LineTag, ScriptGraph, ScriptRecord,
    TagTable,
};
use tracing::{info, warn};

/// Outcome of the format pre-check. Always carries a readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatVerdict {
    pub passed: bool,
    pub reason: String,
}

impl FormatVerdict {
    fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
        }
    }

    pub fn into_result(self) -> Result<(), DialogueError> {
        if self.passed {
            Ok(())
        } else {
            Err(DialogueError::format("FORMAT_INVALID", self.reason))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssueKind {
    TooFewColumns { found: usize, required: usize },
    InvalidAddress { cell: String },
    UnknownTag { tag: String },
    InvalidJump { cell: String },
    /// The row was kept and replaced an earlier record at the same address.
    DuplicateAddress { address: i32 },
}

/// A row-local problem found during parsing. Only `DuplicateAddress` keeps the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    /// 1-based position among the non-empty rows.
    pub line_number: usize,
    pub row: String,
    pub kind: RowIssueKind,
}

impl RowIssue {
    pub fn skipped_row(&self) -> bool {
        !matches!(self.kind, RowIssueKind::DuplicateAddress { .. })
    }

    pub fn to_error(&self) -> DialogueError {
        let (code, message) = match &self.kind {
            RowIssueKind::TooFewColumns { found, required } => (
                "ROW_TOO_FEW_COLUMNS",
                format!(
                    "Row {} has {} columns, at least {} are required.",
                    self.line_number, found, required
                ),
            ),
            RowIssueKind::InvalidAddress { cell } => (
                "ROW_INVALID_ADDRESS",
                format!(
                    "Row {} address cell \"{}\" is not an integer.",
                    self.line_number, cell
                ),
            ),
            RowIssueKind::UnknownTag { tag } => (
                "ROW_UNKNOWN_TAG",
                format!("Row {} uses unrecognized tag \"{}\".", self.line_number, tag),
            ),
            RowIssueKind::InvalidJump { cell } => (
                "ROW_INVALID_JUMP",
                format!(
                    "Row {} jump cell \"{}\" is not an integer.",
                    self.line_number, cell
                ),
            ),
            RowIssueKind::DuplicateAddress { address } => (
                "ROW_DUPLICATE_ADDRESS",
                format!(
                    "Row {} redefines address {}; the earlier row is replaced.",
                    self.line_number, address
                ),
            ),
        };
        DialogueError::new(ErrorKind::RowParse, code, message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    pub graph: ScriptGraph,
    pub issues: Vec<RowIssue>,
}

impl ParseReport {
    pub fn skipped(&self) -> impl Iterator<Item = &RowIssue> {
        self.issues.iter().filter(|issue| issue.skipped_row())
    }
}

/// Splits on the configured line delimiter and `\r`, dropping empty pieces.
pub fn split_rows<'a>(text: &'a str, config: &DialogueConfig) -> Vec<&'a str> {
    let line_delimiter = config.line_delimiter;
    text.split(move |ch: char| ch == line_delimiter || ch == '\r')
        .filter(|row| !row.is_empty())
        .collect()
}

pub fn validate_format(text: &str, config: &DialogueConfig) -> FormatVerdict {
    if text.is_empty() {
        return FormatVerdict::fail("Script text is empty.");
    }

    let rows = split_rows(text, config);
    let data_rows = rows.len().saturating_sub(config.header_row_index.saturating_add(1));
    let Some(header) = rows.get(config.header_row_index).filter(|_| data_rows > 0) else {
        return FormatVerdict::fail(format!(
            "Script needs a header row and at least one data row ({} rows found).",
            rows.len()
        ));
    };

    let header_columns = header.split(config.field_delimiter).count();
    if header_columns < config.min_required_columns {
        return FormatVerdict::fail(format!(
            "Header has {} columns, at least {} are required.",
            header_columns, config.min_required_columns
        ));
    }

    FormatVerdict::pass(format!("Format check passed ({} data rows).", data_rows))
}

pub fn parse(text: &str, config: &DialogueConfig) -> ScriptGraph {
    parse_with_report(text, config).graph
}

/// Best-effort parse: bad rows are logged, recorded and skipped.
pub fn parse_with_report(text: &str, config: &DialogueConfig) -> ParseReport {
    let mut report = ParseReport::default();
    if text.is_empty() {
        warn!("script text is empty, nothing to parse");
        return report;
    }

    let tags = config.tag_table();
    let rows = split_rows(text, config);

    let first_data_row = config.header_row_index.saturating_add(1);
    for (index, raw) in rows.iter().enumerate().skip(first_data_row) {
        let row = raw.trim_matches(|c: char| c.is_whitespace() && c != config.field_delimiter);
        if row.is_empty() {
            continue;
        }
        let line_number = index + 1;

        match parse_row(row, config, &tags) {
            Ok(record) => {
                let address = record.address;
                if report.graph.insert(record).is_some() {
                    let issue = RowIssue {
                        line_number,
                        row: row.to_string(),
                        kind: RowIssueKind::DuplicateAddress { address },
                    };
                    warn!(line = line_number, address, "{}", issue.to_error().message);
                    report.issues.push(issue);
                }
            }
            Err(kind) => {
                let issue = RowIssue {
                    line_number,
                    row: row.to_string(),
                    kind,
                };
                warn!(line = line_number, row, "{}", issue.to_error().message);
                report.issues.push(issue);
            }
        }
    }

    info!(
        records = report.graph.len(),
        skipped = report.skipped().count(),
        "parsed dialogue script"
    );
    report
}

fn parse_row(
    row: &str,
    config: &DialogueConfig,
    tags: &TagTable,
) -> Result<ScriptRecord, RowIssueKind> {
    let cells = row
        .split(config.field_delimiter)
        .map(str::trim)
        .collect::<Vec<_>>();
    if cells.len() < config.min_required_columns {
        return Err(RowIssueKind::TooFewColumns {
            found: cells.len(),
            required: config.min_required_columns,
        });
    }
    let cell = |index: usize| cells.get(index).copied().unwrap_or_default();
    let columns = &config.columns;

    let address_cell = cell(columns.address);
    let address = address_cell
        .parse::<i32>()
        .map_err(|_| RowIssueKind::InvalidAddress {
            cell: address_cell.to_string(),
        })?;

    let tag = normalize_tag(cell(columns.tag));
    let Some(line_tag) = tags.resolve(&tag) else {
        return Err(RowIssueKind::UnknownTag { tag });
    };

    // The jump cell of a terminate row is never read.
    let next_address = if line_tag == LineTag::Terminate {
        None
    } else {
        let jump_cell = cell(columns.next_address);
        Some(
            jump_cell
                .parse::<i32>()
                .map_err(|_| RowIssueKind::InvalidJump {
                    cell: jump_cell.to_string(),
                })?,
        )
    };

    let visual_variant = match cells.get(columns.visual_variant) {
        Some(variant) if !variant.is_empty() => variant.to_string(),
        _ => config.default_variant_name.clone(),
    };

    Ok(ScriptRecord {
        address,
        tag,
        speaker: cell(columns.speaker).to_string(),
        body: cell(columns.body).to_string(),
        next_address,
        visual_variant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dl_core::RecognizedTags;

    const HEADER: &str = "id,tag,speaker,text,next,variant";

    fn script(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn parse_yields_one_record_per_well_formed_row() {
        let text = script(&[
            "0, w ,Aoi,  Good morning.  ,1,smile",
            "1,T,, The bell rings.,2",
            "2,o,,Go to class,10",
            "3,O,,Skip class,20",
            "4,end,,,",
        ]);
        let report = parse_with_report(&text, &DialogueConfig::default());
        assert!(report.issues.is_empty(), "issues: {:?}", report.issues);
        let graph = report.graph;
        assert_eq!(graph.len(), 5);

        let first = graph.get(0).expect("address 0");
        assert_eq!(first.tag, "W");
        assert_eq!(first.speaker, "Aoi");
        assert_eq!(first.body, "Good morning.");
        assert_eq!(first.next_address, Some(1));
        assert_eq!(first.visual_variant, "smile");

        let narration = graph.get(1).expect("address 1");
        assert_eq!(narration.tag, "T");
        assert_eq!(narration.speaker, "");
        assert_eq!(narration.body, "The bell rings.");
        assert_eq!(narration.visual_variant, "default");

        assert_eq!(graph.get(2).map(|r| r.tag.as_str()), Some("O"));
        assert_eq!(graph.get(3).and_then(|r| r.next_address), Some(20));
        assert_eq!(graph.get(4).map(|r| r.tag.as_str()), Some("END"));
    }

    #[test]
    fn later_duplicate_address_wins_and_is_reported() {
        let text = script(&["5,T,,first,6", "5,T,,second,7"]);
        let report = parse_with_report(&text, &DialogueConfig::default());
        assert_eq!(report.graph.len(), 1);
        let kept = report.graph.get(5).expect("address 5");
        assert_eq!(kept.body, "second");
        assert_eq!(kept.next_address, Some(7));
        assert_eq!(report.issues.len(), 1);
        assert_eq!(
            report.issues[0].kind,
            RowIssueKind::DuplicateAddress { address: 5 }
        );
        assert!(!report.issues[0].skipped_row());
        assert_eq!(report.skipped().count(), 0);
    }

    #[test]
    fn malformed_rows_are_skipped_without_aborting() {
        let text = script(&[
            "1,T,,too short",
            "x1,T,,bad address,2",
            "2,T,,kept,3",
            "3,Q,,unknown tag,4",
            "4,W,Aoi,bad jump,next",
            "5,END,,,",
        ]);
        let report = parse_with_report(&text, &DialogueConfig::default());
        assert_eq!(report.graph.addresses().collect::<Vec<_>>(), vec![2, 5]);

        let kinds = report
            .issues
            .iter()
            .map(|issue| (issue.line_number, issue.kind.clone()))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                (
                    2,
                    RowIssueKind::TooFewColumns {
                        found: 4,
                        required: 5
                    }
                ),
                (
                    3,
                    RowIssueKind::InvalidAddress {
                        cell: "x1".to_string()
                    }
                ),
                (
                    5,
                    RowIssueKind::UnknownTag {
                        tag: "Q".to_string()
                    }
                ),
                (
                    6,
                    RowIssueKind::InvalidJump {
                        cell: "next".to_string()
                    }
                ),
            ]
        );
        assert_eq!(report.issues[0].to_error().code, "ROW_TOO_FEW_COLUMNS");
        assert_eq!(report.issues[0].to_error().kind, ErrorKind::RowParse);
    }

    #[test]
    fn terminate_row_ignores_garbage_jump_cell() {
        let text = script(&["9,END,,The end,???", "10, end ,,,"]);
        let graph = parse(&text, &DialogueConfig::default());
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get(9).and_then(|r| r.next_address), None);
        assert_eq!(graph.get(10).map(|r| r.tag.as_str()), Some("END"));
    }

    #[test]
    fn carriage_returns_and_blank_rows_are_ignored() {
        let text = "id,tag,speaker,text,next\r\n\r\n1,T,,one,2\r\n   \r\n2,END,,,\r\n";
        let graph = parse(text, &DialogueConfig::default());
        assert_eq!(graph.addresses().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(graph.get(1).map(|r| r.body.as_str()), Some("one"));
    }

    #[test]
    fn custom_delimiters_header_index_and_tags_are_honored() {
        let config = DialogueConfig {
            field_delimiter: ';',
            line_delimiter: '|',
            header_row_index: 1,
            tags: RecognizedTags {
                speech: "say".to_string(),
                ..RecognizedTags::default()
            },
            ..DialogueConfig::default()
        };
        let text = "title row|id;tag;speaker;text;next|7;SAY;Aoi;hi, there;8|8;END;;;";
        let graph = parse(text, &config);
        assert_eq!(graph.len(), 2);
        let record = graph.get(7).expect("address 7");
        assert_eq!(record.tag, "SAY");
        assert_eq!(record.body, "hi, there");
    }

    #[test]
    fn tab_rows_keep_trailing_empty_cells() {
        let config = DialogueConfig {
            field_delimiter: '\t',
            ..DialogueConfig::default()
        };
        let text = "id\ttag\tspeaker\ttext\tnext\n1\tT\t\tquiet\t2\n2\tEND\t\t\t\n";
        let report = parse_with_report(text, &config);
        assert!(report.issues.is_empty(), "{:?}", report.issues);
        assert_eq!(report.graph.len(), 2);
        assert_eq!(report.graph.get(2).and_then(|r| r.next_address), None);
    }

    #[test]
    fn header_index_past_the_text_fails_without_panicking() {
        let config: DialogueConfig =
            serde_json::from_str(r#"{"headerRowIndex":18446744073709551615}"#)
                .expect("config json should parse");
        config.validate().expect("header index is not bounded by validate");
        let text = "id,tag,speaker,text,next\n1,T,,x,2";

        let verdict = validate_format(text, &config);
        assert!(!verdict.passed);
        assert!(verdict.reason.contains("2 rows found"));

        let report = parse_with_report(text, &config);
        assert!(report.graph.is_empty());
        assert!(report.issues.is_empty());

        let past_end = DialogueConfig {
            header_row_index: 1,
            ..DialogueConfig::default()
        };
        assert!(!validate_format(text, &past_end).passed);
    }

    #[test]
    fn empty_text_parses_to_empty_graph() {
        let report = parse_with_report("", &DialogueConfig::default());
        assert!(report.graph.is_empty());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn validate_format_reports_reasons() {
        let config = DialogueConfig::default();

        let empty = validate_format("", &config);
        assert!(!empty.passed);
        assert!(empty.reason.contains("empty"));

        let header_only = validate_format(HEADER, &config);
        assert!(!header_only.passed);
        assert!(header_only.reason.contains("1 rows found"));

        let narrow = validate_format("a,b,c\n1,T,,x,2", &config);
        assert!(!narrow.passed);
        assert!(narrow.reason.contains("3 columns"));
        assert_eq!(
            narrow.into_result().expect_err("narrow header").code,
            "FORMAT_INVALID"
        );

        let ok = validate_format(&script(&["1,T,,x,2", "2,END,,,"]), &config);
        assert!(ok.passed, "{}", ok.reason);
        assert!(ok.reason.contains("2 data rows"));
        ok.into_result().expect("passing verdict converts to Ok");
    }

    #[test]
    fn validate_format_does_not_inspect_data_rows() {
        let verdict = validate_format(&script(&["garbage"]), &DialogueConfig::default());
        assert!(verdict.passed);
    }
}
