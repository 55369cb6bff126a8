//! Installation planning and execution.
//!
//! Planning reads the local tree and decides, per file, whether to write,
//! skip, or flag a conflict. Nothing is written until every component in the
//! resolution plan has been planned, so validation failures leave the project
//! untouched. Applying then writes component by component; a component with
//! any conflicting file is held back in full while the others proceed.
use crate::error::{PdfxError, Result};
use crate::paths::safe_resolve;
use crate::resolve::ResolutionPlan;
use crate::theme;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Per-file outcome. Decided once per run and never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileDecision {
    /// Destination does not exist yet.
    Write,
    /// Destination differs and the caller opted into replacing it.
    Overwrite,
    /// Destination already holds exactly this content.
    Skip,
    /// Destination differs and was left alone.
    Conflict,
}

impl FileDecision {
    fn writes(self) -> bool {
        matches!(self, Self::Write | Self::Overwrite)
    }
}

/// Per-component outcome: the worst of its file decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentStatus {
    Skipped,
    Installed,
    Conflicted,
}

impl ComponentStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Skipped => "up to date",
            Self::Installed => "installed",
            Self::Conflicted => "conflict",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Replace differing local files instead of reporting them as conflicts.
    pub overwrite: bool,
    /// Plan and report without touching disk.
    pub dry_run: bool,
}

/// Where a plan is written: the component directory and the theme module,
/// both relative to the project root.
#[derive(Debug, Clone)]
pub struct InstallTarget<'a> {
    pub project_root: &'a Path,
    pub component_dir: &'a Path,
    pub theme_file: &'a Path,
}

impl InstallTarget<'_> {
    fn component_dir_abs(&self) -> PathBuf {
        self.project_root.join(self.component_dir)
    }
}

#[derive(Debug, Clone)]
pub struct PlannedFile {
    /// Destination relative to the component directory.
    pub relative: String,
    pub destination: PathBuf,
    pub content: String,
    /// Current local content when it differs from `content`.
    pub local: Option<String>,
    pub decision: FileDecision,
}

#[derive(Debug, Clone)]
pub struct ComponentPlan {
    pub name: String,
    pub files: Vec<PlannedFile>,
}

impl ComponentPlan {
    pub fn status(&self) -> ComponentStatus {
        self.files
            .iter()
            .map(|file| match file.decision {
                FileDecision::Skip => ComponentStatus::Skipped,
                FileDecision::Write | FileDecision::Overwrite => ComponentStatus::Installed,
                FileDecision::Conflict => ComponentStatus::Conflicted,
            })
            .max()
            .unwrap_or(ComponentStatus::Skipped)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstallPlan {
    pub components: Vec<ComponentPlan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    pub decision: FileDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentReport {
    pub name: String,
    pub status: ComponentStatus,
    pub files: Vec<FileReport>,
}

/// Outcome of an install run, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub dry_run: bool,
    pub components: Vec<ComponentReport>,
    pub files_written: usize,
    pub bytes_written: u64,
}

impl InstallReport {
    pub fn status_map(&self) -> BTreeMap<String, ComponentStatus> {
        self.components
            .iter()
            .map(|component| (component.name.clone(), component.status))
            .collect()
    }

    pub fn count(&self, status: ComponentStatus) -> usize {
        self.components
            .iter()
            .filter(|component| component.status == status)
            .count()
    }
}

/// Decide what to do with every file in `resolved` without writing anything.
pub fn plan_install(
    resolved: &ResolutionPlan,
    target: &InstallTarget<'_>,
    options: InstallOptions,
) -> Result<InstallPlan> {
    let component_dir = target.component_dir_abs();
    let mut plan = InstallPlan::default();

    for component in &resolved.components {
        let dest_dir_rel = target.component_dir.join(&component.name);
        let theme_import = theme::theme_import_for(&dest_dir_rel, target.theme_file);
        let mut seen = HashSet::new();
        let mut files = Vec::with_capacity(component.files.len());

        for file in &component.files {
            let file_name = Path::new(&file.path)
                .file_name()
                .and_then(|name| name.to_str())
                .ok_or_else(|| {
                    PdfxError::validation(format!(
                        "component '{}' lists file {:?} without a usable file name",
                        component.name, file.path
                    ))
                })?;
            let relative = format!("{}/{file_name}", component.name);
            if !seen.insert(relative.clone()) {
                return Err(PdfxError::registry(format!(
                    "component '{}' lists {file_name} more than once",
                    component.name
                )));
            }

            let destination = safe_resolve(&component_dir, &relative)?;
            let content = theme::rewrite(&file.content, &theme_import);
            let (decision, local) = decide(&destination, &content, options)?;
            tracing::debug!(
                component = %component.name,
                path = %relative,
                kind = %file.kind,
                ?decision,
                "planned file"
            );
            files.push(PlannedFile {
                relative,
                destination,
                content,
                local,
                decision,
            });
        }

        plan.components.push(ComponentPlan {
            name: component.name.clone(),
            files,
        });
    }
    Ok(plan)
}

fn decide(
    destination: &Path,
    content: &str,
    options: InstallOptions,
) -> Result<(FileDecision, Option<String>)> {
    // A directory at the destination, or a file where a parent directory
    // should be, cannot be replaced by a write even with overwrite.
    if blocked_by_non_file(destination) {
        tracing::debug!(path = %destination.display(), "destination is not a regular file");
        return Ok((FileDecision::Conflict, None));
    }
    match fs::read(destination) {
        Ok(existing) if existing == content.as_bytes() => Ok((FileDecision::Skip, None)),
        Ok(existing) => {
            let local = String::from_utf8_lossy(&existing).into_owned();
            let decision = if options.overwrite {
                FileDecision::Overwrite
            } else {
                FileDecision::Conflict
            };
            Ok((decision, Some(local)))
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok((FileDecision::Write, None)),
        Err(err) => Err(PdfxError::io_at("read", destination, err)),
    }
}

fn blocked_by_non_file(destination: &Path) -> bool {
    if destination.exists() {
        return !destination.is_file();
    }
    destination
        .ancestors()
        .skip(1)
        .find(|dir| dir.exists())
        .is_some_and(|dir| !dir.is_dir())
}

/// Write every non-conflicted component of `plan`.
///
/// Files written before an I/O failure stay on disk; there is no rollback.
pub fn apply_install(plan: &InstallPlan, options: InstallOptions) -> Result<InstallReport> {
    let mut report = InstallReport {
        dry_run: options.dry_run,
        ..InstallReport::default()
    };

    for component in &plan.components {
        let status = component.status();
        if status == ComponentStatus::Conflicted {
            tracing::warn!(
                component = %component.name,
                "conflicting local files; component held back"
            );
        } else if !options.dry_run {
            for file in component.files.iter().filter(|file| file.decision.writes()) {
                write_file(&file.destination, &file.content)?;
                report.files_written += 1;
                report.bytes_written += file.content.len() as u64;
                tracing::info!(path = %file.destination.display(), "wrote file");
            }
        }

        report.components.push(ComponentReport {
            name: component.name.clone(),
            status,
            files: component
                .files
                .iter()
                .map(|file| FileReport {
                    path: file.relative.clone(),
                    decision: file.decision,
                })
                .collect(),
        });
    }
    Ok(report)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| PdfxError::io_at("create", parent, err))?;
    }
    fs::write(path, content.as_bytes()).map_err(|err| PdfxError::io_at("write", path, err))
}

/// Whether `name` is installed under `component_dir`, judged by the presence of
/// its primary file `{name}/pdfx-{name}.<ext>`.
pub fn is_installed(component_dir: &Path, name: &str) -> Result<bool> {
    let dir = safe_resolve(component_dir, name)?;
    if !dir.is_dir() {
        return Ok(false);
    }
    let entries = fs::read_dir(&dir).map_err(|err| PdfxError::io_at("read", &dir, err))?;
    let prefix = format!("pdfx-{name}.");
    for entry in entries {
        let entry = entry.map_err(|err| PdfxError::io_at("read", &dir, err))?;
        let file_name = entry.file_name();
        let matches_name = file_name.to_str().is_some_and(|file_name| {
            file_name.len() > prefix.len() && file_name.starts_with(&prefix)
        });
        if matches_name && entry.path().is_file() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Line-level difference between a local file and the registry version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineDelta {
    pub only_local: usize,
    pub only_registry: usize,
}

/// Count lines present on one side but not the other, treating each side as a
/// multiset of lines.
pub fn line_delta(local: &str, registry: &str) -> LineDelta {
    let mut counts: BTreeMap<&str, isize> = BTreeMap::new();
    for line in local.lines() {
        *counts.entry(line).or_default() += 1;
    }
    for line in registry.lines() {
        *counts.entry(line).or_default() -= 1;
    }
    let mut delta = LineDelta {
        only_local: 0,
        only_registry: 0,
    };
    for count in counts.values() {
        if *count > 0 {
            delta.only_local += count.unsigned_abs();
        } else {
            delta.only_registry += count.unsigned_abs();
        }
    }
    delta
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
