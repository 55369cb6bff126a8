//! Dependency resolution over registry components.
//!
//! Expansion is depth-first: a component is placed only after everything it
//! depends on. Traversal uses an explicit stack so deep chains cannot exhaust
//! the call stack, and the active path doubles as the cycle detector.
use crate::error::{PdfxError, Result};
use crate::registry::ComponentDefinition;
use std::collections::{HashMap, HashSet};

/// Components to install, dependencies first, each name exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    pub components: Vec<ComponentDefinition>,
}

impl ResolutionPlan {
    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name.as_str()).collect()
    }
}

struct Frame {
    name: String,
    next_dependency: usize,
}

/// Expand `requested` into its transitive closure.
///
/// `lookup` returns the definition of a name, or `None` if the registry does not
/// know it. It is called at most once per name. Order is deterministic: roots in
/// request order, dependencies in declaration order.
pub fn resolve<F>(requested: &[String], mut lookup: F) -> Result<ResolutionPlan>
where
    F: FnMut(&str) -> Result<Option<ComponentDefinition>>,
{
    let mut definitions: HashMap<String, ComponentDefinition> = HashMap::new();
    let mut placed: HashSet<String> = HashSet::new();
    let mut active: HashSet<String> = HashSet::new();
    let mut plan = ResolutionPlan::default();

    for root in requested {
        if placed.contains(root) {
            continue;
        }
        load(&mut definitions, &mut lookup, root, None)?;
        active.insert(root.clone());
        let mut stack = vec![Frame {
            name: root.clone(),
            next_dependency: 0,
        }];

        while let Some(top) = stack.last_mut() {
            let dependencies = &definitions[&top.name].dependencies;
            if top.next_dependency >= dependencies.len() {
                let Some(frame) = stack.pop() else {
                    break;
                };
                let definition = definitions[&frame.name].clone();
                active.remove(&frame.name);
                placed.insert(frame.name);
                plan.components.push(definition);
                continue;
            }

            let dependency = dependencies[top.next_dependency].clone();
            top.next_dependency += 1;
            let parent = top.name.clone();

            if placed.contains(&dependency) {
                continue;
            }
            if active.contains(&dependency) {
                let start = stack
                    .iter()
                    .position(|frame| frame.name == dependency)
                    .unwrap_or(0);
                return Err(cycle_error(&stack[start..], &dependency));
            }
            load(&mut definitions, &mut lookup, &dependency, Some(&parent))?;
            active.insert(dependency.clone());
            stack.push(Frame {
                name: dependency,
                next_dependency: 0,
            });
        }
    }

    tracing::debug!(order = ?plan.names(), "resolved components");
    Ok(plan)
}

fn load<F>(
    definitions: &mut HashMap<String, ComponentDefinition>,
    lookup: &mut F,
    name: &str,
    required_by: Option<&str>,
) -> Result<()>
where
    F: FnMut(&str) -> Result<Option<ComponentDefinition>>,
{
    if definitions.contains_key(name) {
        return Ok(());
    }
    match lookup(name)? {
        Some(definition) => {
            definitions.insert(name.to_string(), definition);
            Ok(())
        }
        None => Err(missing_error(name, required_by)),
    }
}

fn missing_error(name: &str, required_by: Option<&str>) -> PdfxError {
    match required_by {
        Some(parent) => PdfxError::registry(format!(
            "component '{parent}' depends on '{name}', which is not in the registry"
        )),
        None => PdfxError::registry(format!("component '{name}' was not found in the registry"))
            .with_suggestion("run `pdfx list` to see available components"),
    }
}

fn cycle_error(path: &[Frame], repeated: &str) -> PdfxError {
    let mut names: Vec<&str> = path.iter().map(|frame| frame.name.as_str()).collect();
    names.push(repeated);
    PdfxError::registry(format!("dependency cycle: {}", names.join(" -> ")))
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
