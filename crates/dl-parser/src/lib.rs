mod table;

pub use table::{
    parse, parse_with_report, split_rows, validate_format, FormatVerdict, ParseReport, RowIssue,
    RowIssueKind,
};
