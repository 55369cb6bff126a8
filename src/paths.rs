//! Typed paths into a consumer project and the write confinement guard.
//!
//! Every destination the installer touches, whether for writing or for an
//! existence probe, is produced by [`safe_resolve`] so nothing reaches disk
//! outside the configured component directory.
use crate::config::Config;
use crate::error::{PdfxError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// File name of the persisted project config.
pub const CONFIG_FILE_NAME: &str = "pdfx.json";

/// Convenience wrapper for locating project artifacts.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `pdfx.json` path.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    /// Return the directory components are installed under.
    pub fn component_dir(&self, config: &Config) -> PathBuf {
        self.root.join(&config.component_dir)
    }
}

/// Resolve `relative` against `target_dir`, failing if the result would land
/// outside of it.
///
/// `..` segments are folded lexically and may not climb above `target_dir`.
/// Absolute paths and drive prefixes are rejected outright. Any existing
/// symlink along the way must point back inside `target_dir`.
pub fn safe_resolve(target_dir: &Path, relative: &str) -> Result<PathBuf> {
    let normalized = normalize_relative(relative)?;
    check_symlinks(target_dir, &normalized, relative)?;
    Ok(target_dir.join(normalized))
}

fn normalize_relative(relative: &str) -> Result<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err(escape_error(relative, "absolute paths are not allowed"));
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.pop().is_none() {
                    return Err(escape_error(relative, "path climbs above the target directory"));
                }
            }
            Component::Normal(part) => parts.push(part),
        }
    }
    Ok(parts.iter().collect())
}

fn check_symlinks(target_dir: &Path, normalized: &Path, relative: &str) -> Result<()> {
    // Nothing below a missing target directory can be a symlink.
    let Ok(canonical_root) = target_dir.canonicalize() else {
        return Ok(());
    };
    let mut current = target_dir.to_path_buf();
    for part in normalized.components() {
        current.push(part);
        let meta = match fs::symlink_metadata(&current) {
            Ok(meta) => meta,
            Err(_) => break,
        };
        if !meta.file_type().is_symlink() {
            continue;
        }
        let real = current
            .canonicalize()
            .map_err(|_| escape_error(relative, "path goes through a dangling symlink"))?;
        if !real.starts_with(&canonical_root) {
            return Err(escape_error(
                relative,
                "path goes through a symlink that leaves the target directory",
            ));
        }
    }
    Ok(())
}

fn escape_error(relative: &str, reason: &str) -> PdfxError {
    PdfxError::validation(format!("refusing to use path {relative:?}: {reason}"))
}

/// Reject config-owned paths that are absolute or contain `..`.
pub fn validate_relative_path(rel: &str, label: &str) -> Result<()> {
    let path = Path::new(rel);
    if rel.trim().is_empty() {
        return Err(PdfxError::config(format!("{label} must be non-empty")));
    }
    if path.is_absolute() || has_parent_components(path) {
        return Err(PdfxError::config(format!(
            "{label} must be a relative path without '..' (got {rel:?})"
        )));
    }
    Ok(())
}

fn has_parent_components(path: &Path) -> bool {
    path.components()
        .any(|component| matches!(component, Component::ParentDir))
}

/// Relative module specifier from `from_dir` to `target`, both relative to the
/// same root, with forward slashes and a leading `./` or `../`.
pub fn relative_module_path(from_dir: &Path, target: &Path) -> String {
    let from = lexical_parts(from_dir);
    let to = lexical_parts(target);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = vec!["..".to_string(); from.len() - common];
    segments.extend(to[common..].iter().cloned());

    let joined = segments.join("/");
    if joined.starts_with("../") || joined == ".." {
        joined
    } else {
        format!("./{joined}")
    }
}

fn lexical_parts(path: &Path) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::ParentDir => {
                parts.pop();
            }
            Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
        }
    }
    parts
}
