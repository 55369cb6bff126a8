//! In-memory registry used by engine and resolver tests.
use super::{ComponentDefinition, ComponentFile, IndexEntry, ManifestIndex, Registry};
use crate::error::{PdfxError, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Default)]
pub struct MemoryRegistry {
    index: ManifestIndex,
    components: BTreeMap<String, ComponentDefinition>,
    fetches: RefCell<Vec<String>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single-file component listed in the index.
    pub fn with(self, name: &str, deps: &[&str], content: &str) -> Self {
        let file = ComponentFile {
            path: format!("components/pdfx/{name}/pdfx-{name}.tsx"),
            content: content.to_string(),
            kind: "registry:ui".to_string(),
        };
        self.with_files(name, deps, vec![file])
    }

    pub fn with_files(mut self, name: &str, deps: &[&str], files: Vec<ComponentFile>) -> Self {
        self.index.items.push(IndexEntry {
            name: name.to_string(),
            description: format!("{name} component"),
        });
        self.components.insert(
            name.to_string(),
            ComponentDefinition {
                name: name.to_string(),
                files,
                dependencies: deps.iter().map(|dep| dep.to_string()).collect(),
            },
        );
        self
    }

    /// Names passed to `fetch_component`, in call order.
    pub fn fetches(&self) -> Vec<String> {
        self.fetches.borrow().clone()
    }
}

impl Registry for MemoryRegistry {
    fn fetch_index(&self) -> Result<ManifestIndex> {
        Ok(self.index.clone())
    }

    fn fetch_component(&self, name: &str) -> Result<ComponentDefinition> {
        self.fetches.borrow_mut().push(name.to_string());
        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| PdfxError::registry(format!("registry returned HTTP 404 for {name}")))
    }
}
