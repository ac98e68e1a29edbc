use std::fmt::Display;

use dl_core::{DialogueError, ErrorKind};

fn map_error(kind: ErrorKind, code: &'static str, error: impl Display) -> DialogueError {
    DialogueError::new(kind, code, error.to_string())
}

pub(crate) fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.escape_default()))
}

pub(crate) fn emit_error(error: DialogueError) -> i32 {
    println!("RESULT:ERROR");
    println!("ERROR_CODE:{}", error.code);
    println!("ERROR_MSG_JSON:{}", json_string(&error.message));
    1
}

pub(crate) fn map_tui_io(error: std::io::Error) -> DialogueError {
    map_error(ErrorKind::Io, "TUI_IO", error)
}

pub(crate) fn map_cli_source_path(error: std::io::Error) -> DialogueError {
    map_error(ErrorKind::Io, "CLI_SOURCE_PATH", error)
}

pub(crate) fn map_cli_source_read(error: std::io::Error) -> DialogueError {
    map_error(ErrorKind::Io, "CLI_SOURCE_READ", error)
}

pub(crate) fn map_cli_cast_scan(error: walkdir::Error) -> DialogueError {
    map_error(ErrorKind::Io, "CLI_CAST_SCAN", error)
}

pub(crate) fn map_cli_cast_invalid(error: serde_json::Error) -> DialogueError {
    map_error(ErrorKind::Config, "CLI_CAST_INVALID", error)
}

pub(crate) fn map_cli_config_invalid(error: serde_json::Error) -> DialogueError {
    map_error(ErrorKind::Config, "CLI_CONFIG_INVALID", error)
}

#[cfg(test)]
mod error_map_tests {
    use super::*;

    #[test]
    fn emit_error_returns_non_zero_exit_code() {
        let code = emit_error(DialogueError::state("ERR", "failed"));
        assert_eq!(code, 1);
    }

    #[test]
    fn json_string_escapes_quotes() {
        assert_eq!(json_string("say \"hi\""), r#""say \"hi\"""#);
    }

    #[test]
    fn mapping_helpers_keep_error_codes() {
        assert_eq!(map_tui_io(std::io::Error::other("io")).code, "TUI_IO");
        assert_eq!(
            map_cli_source_path(std::io::Error::other("path")).code,
            "CLI_SOURCE_PATH"
        );
        let read = map_cli_source_read(std::io::Error::other("read"));
        assert_eq!(read.code, "CLI_SOURCE_READ");
        assert_eq!(read.kind, ErrorKind::Io);

        let invalid = serde_json::from_str::<serde_json::Value>("{").expect_err("invalid json");
        let mapped = map_cli_config_invalid(invalid);
        assert_eq!(mapped.code, "CLI_CONFIG_INVALID");
        assert_eq!(mapped.kind, ErrorKind::Config);

        let invalid = serde_json::from_str::<serde_json::Value>("[").expect_err("invalid json");
        assert_eq!(map_cli_cast_invalid(invalid).code, "CLI_CAST_INVALID");
    }
}
