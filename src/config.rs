//! Project configuration helpers.
//!
//! `pdfx.json` is created by the scaffolding flow and owned by the user. This
//! module only reads and validates it, substituting defaults where a query
//! command can run without one.
use crate::error::{PdfxError, Result};
use crate::paths::{validate_relative_path, ProjectPaths, CONFIG_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Registry used when neither the config nor `--registry` names one.
pub const DEFAULT_REGISTRY_URL: &str = "https://pdfx.akashpise.dev/r";
/// Component directory used when no config exists.
pub const DEFAULT_COMPONENT_DIR: &str = "src/components/pdfx";
/// Theme module used when the config omits `theme`.
pub const DEFAULT_THEME_PATH: &str = "src/lib/pdfx-theme.ts";

const INIT_HINT: &str = "run the pdfx init flow in your project root to create pdfx.json";

/// Persisted project settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    pub component_dir: String,
    pub registry: String,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    DEFAULT_THEME_PATH.to_string()
}

/// Build the config used by query commands when `pdfx.json` is absent.
pub fn default_config() -> Config {
    Config {
        schema: None,
        component_dir: DEFAULT_COMPONENT_DIR.to_string(),
        registry: DEFAULT_REGISTRY_URL.to_string(),
        theme: default_theme(),
    }
}

/// Load `pdfx.json` from the project root, or `None` when it does not exist.
pub fn load_config(project_root: &Path) -> Result<Option<Config>> {
    let path = ProjectPaths::new(project_root.to_path_buf()).config_path();
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(PdfxError::io_at("read config", &path, err)),
    };
    let mut config: Config = serde_json::from_slice(&bytes).map_err(|err| {
        PdfxError::config(format!("invalid {CONFIG_FILE_NAME}: {err}"))
            .with_suggestion(format!("fix or regenerate {}", path.display()))
    })?;
    config.registry = config.registry.trim().to_string();
    validate_config(&config)?;
    Ok(Some(config))
}

/// Load the config for commands that write into the project.
pub fn require_config(project_root: &Path) -> Result<Config> {
    load_config(project_root)?.ok_or_else(|| {
        PdfxError::config(format!(
            "no {CONFIG_FILE_NAME} found in {}",
            project_root.display()
        ))
        .with_suggestion(INIT_HINT)
    })
}

/// Load the config if present, falling back to defaults for read-only commands.
pub fn config_or_default(project_root: &Path) -> Result<Config> {
    match load_config(project_root)? {
        Some(config) => Ok(config),
        None => {
            tracing::debug!("no config found; using defaults");
            Ok(default_config())
        }
    }
}

/// Validate the user-owned fields of a config.
pub fn validate_config(config: &Config) -> Result<()> {
    let registry = config.registry.as_str();
    if !(registry.starts_with("http://") || registry.starts_with("https://"))
        || registry.contains(char::is_whitespace)
    {
        return Err(PdfxError::config(format!(
            "registry must be an http(s) URL (got {:?})",
            config.registry
        ))
        .with_suggestion(format!("set \"registry\" in {CONFIG_FILE_NAME} to a full URL")));
    }
    validate_relative_path(&config.component_dir, "componentDir")?;
    validate_relative_path(&config.theme, "theme")?;
    Ok(())
}

/// Apply a one-off registry override from the command line.
pub fn with_registry_override(mut config: Config, registry: Option<&str>) -> Result<Config> {
    if let Some(registry) = registry {
        config.registry = registry.trim().to_string();
        validate_config(&config)?;
    }
    Ok(config)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
