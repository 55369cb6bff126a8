//! Registry resolution and installation engine.
//!
//! Wires the pieces together in a fixed order: fetch the index, resolve the
//! requested names (fetching each definition once), plan every file, and only
//! then write. Errors surface as [`PdfxError`]s; deciding what they mean for
//! the process is left to the command layer.
use crate::config::Config;
use crate::error::Result;
use crate::install::{self, InstallOptions, InstallPlan, InstallReport, InstallTarget};
use crate::paths::ProjectPaths;
use crate::registry::{validate_component_name, Registry};
use crate::resolve::{self, ResolutionPlan};
use serde::Serialize;
use std::path::Path;

/// One index entry annotated with its local install state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedComponent {
    pub name: String,
    pub description: String,
    pub installed: bool,
}

pub struct Engine<R> {
    registry: R,
    paths: ProjectPaths,
    config: Config,
}

impl<R: Registry> Engine<R> {
    pub fn new(registry: R, paths: ProjectPaths, config: Config) -> Self {
        Self {
            registry,
            paths,
            config,
        }
    }

    /// Expand `requested` into an ordered, deduplicated plan.
    pub fn resolve(&self, requested: &[String]) -> Result<ResolutionPlan> {
        for name in requested {
            validate_component_name(name)?;
        }
        let index = self.registry.fetch_index()?;
        tracing::info!(components = index.items.len(), "fetched registry index");

        resolve::resolve(requested, |name| {
            if !index.contains(name) {
                return Ok(None);
            }
            tracing::info!(component = name, "fetching component");
            self.registry.fetch_component(name).map(Some)
        })
    }

    /// Resolve and decide every file without writing.
    pub fn plan(&self, requested: &[String], options: InstallOptions) -> Result<InstallPlan> {
        let resolved = self.resolve(requested)?;
        install::plan_install(&resolved, &self.target(), options)
    }

    /// Resolve, plan, and write.
    pub fn install(&self, requested: &[String], options: InstallOptions) -> Result<InstallReport> {
        let plan = self.plan(requested, options)?;
        install::apply_install(&plan, options)
    }

    /// Registry index with local install state, in index order.
    pub fn list(&self) -> Result<Vec<ListedComponent>> {
        let index = self.registry.fetch_index()?;
        let component_dir = self.paths.component_dir(&self.config);
        index
            .items
            .into_iter()
            .map(|item| {
                let installed = install::is_installed(&component_dir, &item.name)?;
                Ok(ListedComponent {
                    name: item.name,
                    description: item.description,
                    installed,
                })
            })
            .collect()
    }

    fn target(&self) -> InstallTarget<'_> {
        InstallTarget {
            project_root: self.paths.root(),
            component_dir: Path::new(&self.config.component_dir),
            theme_file: Path::new(&self.config.theme),
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
