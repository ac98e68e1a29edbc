use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dl_core::{DialogueConfig, DialogueError, ErrorKind};
use dl_runtime::{CastRegistry, EmptyCast};
use tracing::debug;

use crate::{
    load_cast_dir, load_cast_file, map_cli_config_invalid, map_cli_source_path,
    map_cli_source_read, LoadedScript, ScriptArgs,
};

pub(crate) fn load_script_source(args: &ScriptArgs) -> Result<LoadedScript, DialogueError> {
    let script_path = resolve_file(&args.script)?;
    let text = read_text(&script_path)?;
    let config = load_config(args.config.as_deref())?;

    let cast: Arc<dyn CastRegistry> = match (&args.cast_dir, &args.cast_file) {
        (Some(dir), _) => Arc::new(load_cast_dir(&resolve_dir(dir)?)?),
        (None, Some(file)) => Arc::new(load_cast_file(&resolve_file(file)?)?),
        (None, None) => Arc::new(EmptyCast),
    };

    let title = script_path
        .file_stem()
        .and_then(|name| name.to_str())
        .unwrap_or("script")
        .to_string();
    debug!(path = %script_path.display(), "script source loaded");

    Ok(LoadedScript {
        id: format!("script:{}", script_path.display()),
        title,
        text,
        config,
        cast,
        entry_address: args.entry,
    })
}

pub(crate) fn load_config(path: Option<&str>) -> Result<DialogueConfig, DialogueError> {
    let Some(path) = path else {
        return Ok(DialogueConfig::default());
    };
    let raw = read_text(&resolve_file(path)?)?;
    let config: DialogueConfig = serde_json::from_str(&raw).map_err(map_cli_config_invalid)?;
    config.validate()?;
    Ok(config)
}

pub(crate) fn read_text(path: &Path) -> Result<String, DialogueError> {
    fs::read_to_string(path).map_err(map_cli_source_read)
}

fn absolute(raw: &str) -> Result<PathBuf, DialogueError> {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(std::env::current_dir()
        .map_err(map_cli_source_path)?
        .join(path))
}

pub(crate) fn resolve_file(raw: &str) -> Result<PathBuf, DialogueError> {
    let path = absolute(raw)?;
    if !path.exists() {
        return Err(DialogueError::new(
            ErrorKind::Io,
            "CLI_SOURCE_NOT_FOUND",
            format!("File does not exist: {}", path.display()),
        ));
    }
    if !path.is_file() {
        return Err(DialogueError::new(
            ErrorKind::Io,
            "CLI_SOURCE_NOT_FILE",
            format!("Path is not a file: {}", path.display()),
        ));
    }
    Ok(path)
}

pub(crate) fn resolve_dir(raw: &str) -> Result<PathBuf, DialogueError> {
    let path = absolute(raw)?;
    if !path.exists() {
        return Err(DialogueError::new(
            ErrorKind::Io,
            "CLI_SOURCE_NOT_FOUND",
            format!("Directory does not exist: {}", path.display()),
        ));
    }
    if !path.is_dir() {
        return Err(DialogueError::new(
            ErrorKind::Io,
            "CLI_SOURCE_NOT_DIR",
            format!("Path is not a directory: {}", path.display()),
        ));
    }
    Ok(path)
}
