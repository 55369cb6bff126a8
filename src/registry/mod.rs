//! Registry access: wire types, schema validation, and the HTTP client.
//!
//! Everything fetched from the network passes through [`schema`] before the
//! rest of the engine sees it; the types exported here are only ever built
//! from validated payloads.
mod client;
#[cfg(test)]
pub mod memory;
mod schema;

pub use client::{HttpRegistry, DEFAULT_TIMEOUT};

use crate::error::{PdfxError, Result};
use serde::Serialize;

/// Summary of one component as listed by the registry index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub name: String,
    pub description: String,
}

/// Snapshot of the registry index, fetched once per invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestIndex {
    pub items: Vec<IndexEntry>,
}

impl ManifestIndex {
    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }
}

/// One source artifact belonging to a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFile {
    pub path: String,
    pub content: String,
    pub kind: String,
}

/// A validated component definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDefinition {
    pub name: String,
    pub files: Vec<ComponentFile>,
    /// Other registry components this one needs, in declaration order.
    pub dependencies: Vec<String>,
}

/// Source of registry data. The engine only talks to the registry through this.
pub trait Registry {
    fn fetch_index(&self) -> Result<ManifestIndex>;
    fn fetch_component(&self, name: &str) -> Result<ComponentDefinition>;
}

impl<R: Registry + ?Sized> Registry for &R {
    fn fetch_index(&self) -> Result<ManifestIndex> {
        (**self).fetch_index()
    }

    fn fetch_component(&self, name: &str) -> Result<ComponentDefinition> {
        (**self).fetch_component(name)
    }
}

/// Reject user-supplied names before they are used in URLs or paths.
pub fn validate_component_name(name: &str) -> Result<()> {
    if schema::is_valid_component_name(name) {
        return Ok(());
    }
    Err(PdfxError::validation(format!("invalid component name {name:?}"))
        .with_suggestion("component names use lowercase letters, digits, and single hyphens"))
}
