//! Command workflows: load config, build the engine, print results.
use crate::cli::{AddArgs, DiffArgs, GlobalArgs, ListArgs};
use crate::config::{self, Config};
use crate::engine::Engine;
use crate::install::{line_delta, ComponentStatus, FileDecision, InstallOptions, InstallReport};
use crate::paths::ProjectPaths;
use crate::registry::HttpRegistry;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// JSON shape of `add --json`: the full report plus a name to status map.
#[derive(Serialize)]
struct AddOutput<'a> {
    #[serde(flatten)]
    report: &'a InstallReport,
    status: BTreeMap<String, ComponentStatus>,
}

fn project_paths(global: &GlobalArgs) -> Result<ProjectPaths> {
    let root = match &global.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("resolve current directory")?,
    };
    let root = root
        .canonicalize()
        .with_context(|| format!("resolve project root {}", root.display()))?;
    Ok(ProjectPaths::new(root))
}

fn build_engine(
    global: &GlobalArgs,
    paths: ProjectPaths,
    config: Config,
) -> Result<Engine<HttpRegistry>> {
    let config = config::with_registry_override(config, global.registry.as_deref())?;
    tracing::debug!(
        registry = %config.registry,
        component_dir = %config.component_dir,
        "using config"
    );
    let registry = HttpRegistry::new(&config.registry, Duration::from_secs(global.timeout));
    Ok(Engine::new(registry, paths, config))
}

pub fn run_list(global: &GlobalArgs, args: &ListArgs) -> Result<()> {
    let paths = project_paths(global)?;
    let config = config::config_or_default(paths.root())?;
    let engine = build_engine(global, paths, config)?;
    let listed = engine.list()?;

    if args.json {
        let text = serde_json::to_string_pretty(&listed).context("serialize component list")?;
        println!("{text}");
        return Ok(());
    }

    let width = listed.iter().map(|item| item.name.len()).max().unwrap_or(0);
    for item in &listed {
        let marker = if item.installed { "installed" } else { "" };
        println!(
            "{:<width$}  {:<9}  {}",
            item.name, marker, item.description
        );
    }
    println!(
        "\n{} components, {} installed",
        listed.len(),
        listed.iter().filter(|item| item.installed).count()
    );
    Ok(())
}

pub fn run_add(global: &GlobalArgs, args: &AddArgs) -> Result<()> {
    let paths = project_paths(global)?;
    let config = config::require_config(paths.root())?;
    let component_dir = paths.component_dir(&config);
    let engine = build_engine(global, paths, config)?;
    let options = InstallOptions {
        overwrite: args.overwrite,
        dry_run: args.dry_run,
    };
    let report = engine.install(&args.components, options)?;

    if args.json {
        let output = AddOutput {
            report: &report,
            status: report.status_map(),
        };
        let text = serde_json::to_string_pretty(&output).context("serialize install report")?;
        println!("{text}");
    } else {
        print_report(&report, &component_dir);
    }
    Ok(())
}

pub fn run_diff(global: &GlobalArgs, args: &DiffArgs) -> Result<()> {
    let paths = project_paths(global)?;
    let config = config::require_config(paths.root())?;
    let engine = build_engine(global, paths, config)?;
    let plan = engine.plan(
        &args.components,
        InstallOptions {
            overwrite: false,
            dry_run: true,
        },
    )?;

    let mut differing = 0;
    for component in &plan.components {
        for file in &component.files {
            let Some(local) = file.local.as_deref() else {
                if file.decision == FileDecision::Conflict {
                    differing += 1;
                    println!("{}: blocked by a local path that is not a file", file.relative);
                }
                continue;
            };
            differing += 1;
            let delta = line_delta(local, &file.content);
            println!(
                "{}: {} line(s) only local, {} line(s) only in registry",
                file.relative, delta.only_local, delta.only_registry
            );
        }
    }
    if differing == 0 {
        println!("No local differences.");
    } else {
        println!("\nRe-run `pdfx add` with --overwrite to replace these files.");
    }
    Ok(())
}

fn print_report(report: &InstallReport, component_dir: &Path) {
    if report.dry_run {
        println!("Dry run: nothing was written.");
    }
    for component in &report.components {
        println!("{:<12} {}", component.status.label(), component.name);
        for file in &component.files {
            let verb = match file.decision {
                FileDecision::Write => "write",
                FileDecision::Overwrite => "overwrite",
                FileDecision::Skip => "unchanged",
                FileDecision::Conflict => "conflict",
            };
            println!("  {verb:<10} {}", file.path);
        }
    }
    println!(
        "\n{} installed, {} up to date, {} conflicted ({})",
        report.count(ComponentStatus::Installed),
        report.count(ComponentStatus::Skipped),
        report.count(ComponentStatus::Conflicted),
        component_dir.display()
    );
    if report.count(ComponentStatus::Conflicted) > 0 {
        println!("Conflicting components were left untouched; see `pdfx diff` or pass --overwrite.");
    }
}
