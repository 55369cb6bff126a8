//! Schema validation for registry payloads.
//!
//! serde gives the payload its shape; the checks here enforce the rules the
//! shape alone cannot express. Unknown extra fields are tolerated so the
//! registry can grow metadata without breaking older clients.
use super::{ComponentDefinition, ComponentFile, IndexEntry, ManifestIndex};
use crate::error::{PdfxError, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;

static COMPONENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("component name regex"));

#[derive(Deserialize)]
struct RawIndex {
    items: Vec<RawIndexItem>,
}

#[derive(Deserialize)]
struct RawIndexItem {
    name: String,
    description: String,
}

#[derive(Deserialize)]
struct RawComponent {
    name: String,
    files: Vec<RawFile>,
    #[serde(default)]
    dependencies: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct RawFile {
    path: String,
    content: String,
    #[serde(rename = "type")]
    kind: String,
}

pub fn is_valid_component_name(name: &str) -> bool {
    COMPONENT_NAME.is_match(name)
}

/// Parse and validate the registry index served at `source`.
pub fn parse_index(text: &str, source: &str) -> Result<ManifestIndex> {
    let raw: RawIndex = serde_json::from_str(text)
        .map_err(|err| invalid_payload(source, format!("index does not match schema: {err}")))?;

    let mut seen = BTreeSet::new();
    let mut items = Vec::with_capacity(raw.items.len());
    for item in raw.items {
        if !is_valid_component_name(&item.name) {
            return Err(invalid_payload(
                source,
                format!("index lists invalid component name {:?}", item.name),
            ));
        }
        if !seen.insert(item.name.clone()) {
            return Err(invalid_payload(
                source,
                format!("index lists component {:?} more than once", item.name),
            ));
        }
        items.push(IndexEntry {
            name: item.name,
            description: item.description,
        });
    }
    Ok(ManifestIndex { items })
}

/// Parse and validate the definition of `requested` served at `source`.
pub fn parse_component(text: &str, requested: &str, source: &str) -> Result<ComponentDefinition> {
    let raw: RawComponent = serde_json::from_str(text).map_err(|err| {
        invalid_payload(
            source,
            format!("component {requested:?} does not match schema: {err}"),
        )
    })?;

    if raw.name != requested {
        return Err(invalid_payload(
            source,
            format!("asked for component {requested:?} but got {:?}", raw.name),
        ));
    }
    if raw.files.is_empty() {
        return Err(invalid_payload(
            source,
            format!("component {requested:?} has no files"),
        ));
    }

    let mut files = Vec::with_capacity(raw.files.len());
    for file in raw.files {
        if file.path.trim().is_empty() || file.kind.trim().is_empty() {
            return Err(invalid_payload(
                source,
                format!("component {requested:?} has a file with an empty path or type"),
            ));
        }
        files.push(ComponentFile {
            path: file.path,
            content: file.content,
            kind: file.kind,
        });
    }

    let mut dependencies: Vec<String> = Vec::new();
    for dep in raw.dependencies.unwrap_or_default() {
        if !is_valid_component_name(&dep) {
            return Err(invalid_payload(
                source,
                format!("component {requested:?} declares invalid dependency {dep:?}"),
            ));
        }
        if !dependencies.contains(&dep) {
            dependencies.push(dep);
        }
    }

    Ok(ComponentDefinition {
        name: raw.name,
        files,
        dependencies,
    })
}

fn invalid_payload(source: &str, detail: String) -> PdfxError {
    PdfxError::registry(format!("invalid registry response from {source}: {detail}"))
}
