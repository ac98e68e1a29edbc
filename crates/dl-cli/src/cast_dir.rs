use std::collections::BTreeMap;
use std::path::Path;

use dl_core::{DialogueError, ErrorKind, Speaker};
use dl_runtime::InMemoryCast;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{map_cli_cast_invalid, map_cli_cast_scan, read_text};

/// Builds a cast from `<root>/<Speaker>/<variant>.<ext>`. Each top-level
/// directory is a speaker; a speaker without variant files has no portrait.
/// Assets are paths relative to `root`.
pub(crate) fn load_cast_dir(root: &Path) -> Result<InMemoryCast, DialogueError> {
    let mut speakers: BTreeMap<String, Speaker> = BTreeMap::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(map_cli_cast_scan)?;
        let Some(name) = entry.file_name().to_str() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 cast entry");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }

        if entry.depth() == 1 {
            if entry.file_type().is_dir() {
                speakers.insert(name.to_string(), Speaker::new(name));
            }
            continue;
        }

        if !entry.file_type().is_file() {
            continue;
        }
        let Some(speaker_name) = entry
            .path()
            .parent()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
        else {
            continue;
        };
        let Some(variant) = entry.path().file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let asset = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");

        if let Some(speaker) = speakers.remove(speaker_name) {
            speakers.insert(speaker_name.to_string(), speaker.with_variant(variant, asset));
        }
    }

    let speakers = speakers
        .into_values()
        .map(|speaker| {
            if speaker.variants.is_empty() {
                speaker.without_portrait()
            } else {
                speaker
            }
        })
        .collect::<Vec<_>>();
    debug!(speakers = speakers.len(), root = %root.display(), "cast directory loaded");
    Ok(InMemoryCast::new(speakers))
}

/// JSON array of speakers, e.g. `[{"name":"Aoi","variants":[...]}]`.
pub(crate) fn load_cast_file(path: &Path) -> Result<InMemoryCast, DialogueError> {
    let raw = read_text(path)?;
    let speakers: Vec<Speaker> = serde_json::from_str(&raw).map_err(map_cli_cast_invalid)?;
    if let Some(unnamed) = speakers.iter().position(|speaker| speaker.name.is_empty()) {
        return Err(DialogueError::new(
            ErrorKind::Config,
            "CLI_CAST_INVALID",
            format!("Cast entry {} has an empty name.", unnamed),
        ));
    }
    Ok(InMemoryCast::new(speakers))
}
