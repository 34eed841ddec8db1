//! Workflow document rendering.
//!
//! Produces the `name` / `on` / `jobs.build.steps` document accepted by the
//! hosted CI system. Rendering is deterministic: the same graph and trigger
//! state always yields byte-identical text.

use riveter_types::{Connection, ConfigValue, StepNode, Triggers};

use crate::escape::{block_scalar, escape_scalar, render_value};
use crate::order::topological_order;

pub const WORKFLOW_NAME: &str = "CI/CD Pipeline";

/// Config keys with dedicated step fields; everything else goes under `with:`.
const RESERVED_KEYS: [&str; 3] = ["repository", "run", "env"];

/// Render one step record.
pub fn render_step(node: &StepNode) -> String {
    let mut lines = Vec::new();

    let name = if node.name.trim().is_empty() {
        "Unnamed Step"
    } else {
        node.name.as_str()
    };
    lines.push(format!("    - name: {}", escape_scalar(name)));

    if let Some(ConfigValue::String(repo)) = node.config.get("repository") {
        if !repo.trim().is_empty() {
            lines.push(format!("      uses: {}", escape_scalar(repo)));
        }
    }

    // Exactly-empty values are omitted; whitespace-only values survive and
    // render as an explicit "".
    let with_entries: Vec<_> = node
        .config
        .iter()
        .filter(|(key, value)| {
            !RESERVED_KEYS.contains(&key.as_str())
                && !key.trim().is_empty()
                && !matches!(value, ConfigValue::String(s) if s.is_empty())
        })
        .collect();
    if !with_entries.is_empty() {
        lines.push("      with:".to_string());
        for (key, value) in with_entries {
            lines.push(format!(
                "        {}: {}",
                escape_scalar(key),
                render_value(value)
            ));
        }
    }

    if let Some(env) = node.config.get("env").and_then(|v| v.as_map()) {
        if !env.is_empty() {
            lines.push("      env:".to_string());
            for (key, value) in env {
                if key.trim().is_empty() {
                    continue;
                }
                lines.push(format!(
                    "        {}: {}",
                    escape_scalar(key),
                    render_value(value)
                ));
            }
        }
    }

    if let Some(ConfigValue::String(run)) = node.config.get("run") {
        if !run.trim().is_empty() {
            lines.push(format!("      run: {}", block_scalar(run)));
        }
    }

    lines.join("\n")
}

/// Render the `on:` block body for the enabled trigger kinds.
///
/// When nothing is enabled at all a default push trigger on `main` is
/// emitted; the store enforces the at-least-one invariant, this fallback
/// covers documents that bypassed it.
pub fn render_triggers(triggers: &Triggers) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(push) = &triggers.push {
        lines.push("  push:".to_string());
        if !push.branches.is_empty() {
            lines.push(format!("    branches: [ {} ]", push.branches.join(", ")));
        }
        if !push.paths.is_empty() {
            lines.push(format!("    paths: [ {} ]", push.paths.join(", ")));
        }
        if !push.paths_ignore.is_empty() {
            lines.push(format!(
                "    paths-ignore: [ {} ]",
                push.paths_ignore.join(", ")
            ));
        }
    }

    if let Some(pr) = &triggers.pull_request {
        lines.push("  pull_request:".to_string());
        if !pr.branches.is_empty() {
            lines.push(format!("    branches: [ {} ]", pr.branches.join(", ")));
        }
        if !pr.types.is_empty() {
            lines.push(format!("    types: [ {} ]", pr.types.join(", ")));
        }
    }

    if let Some(schedule) = &triggers.schedule {
        lines.push("  schedule:".to_string());
        let cron = if schedule.cron.is_empty() {
            "0 0 * * *"
        } else {
            schedule.cron.as_str()
        };
        lines.push(format!("    - cron: '{cron}'"));
    }

    if let Some(manual) = &triggers.workflow_dispatch {
        lines.push("  workflow_dispatch:".to_string());
        if let Some(inputs) = manual.inputs.as_object() {
            if !inputs.is_empty() {
                lines.push("    inputs:".to_string());
                for (key, value) in inputs {
                    let description = value
                        .get("description")
                        .and_then(|v| v.as_str())
                        .unwrap_or("Input parameter");
                    let required = value
                        .get("required")
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    let input_type = value
                        .get("type")
                        .and_then(|v| v.as_str())
                        .unwrap_or("string");
                    lines.push(format!("      {key}:"));
                    lines.push(format!("        description: {description}"));
                    lines.push(format!("        required: {required}"));
                    lines.push(format!("        type: {input_type}"));
                }
            }
        }
    }

    if lines.is_empty() {
        lines.push("  push:".to_string());
        lines.push("    branches: [ main ]".to_string());
    }

    lines.join("\n")
}

/// Render the full workflow document.
pub fn render_workflow(
    nodes: &[StepNode],
    connections: &[Connection],
    triggers: &Triggers,
) -> String {
    let on_block = render_triggers(triggers);

    if nodes.is_empty() {
        return format!(
            "# No pipeline steps defined yet\n\
             # Drag actions from the toolbox to get started\n\
             \n\
             name: {WORKFLOW_NAME}\n\
             on:\n\
             {on_block}\n\
             \n\
             jobs:\n\
             \x20 build:\n\
             \x20   runs-on: ubuntu-latest\n\
             \x20   steps:\n\
             \x20     # Add your pipeline steps here\n"
        );
    }

    let steps = topological_order(nodes, connections)
        .into_iter()
        .map(|i| render_step(&nodes[i]))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "name: {WORKFLOW_NAME}\n\
         on:\n\
         {on_block}\n\
         \n\
         jobs:\n\
         \x20 build:\n\
         \x20   runs-on: ubuntu-latest\n\
         \n\
         \x20   steps:\n\
         {steps}\n"
    )
}

/// The simplified export path: vertical ordering only, `uses:` defaulting to
/// the official action for the node's kind, one flat `with:` block.
pub fn render_positional(nodes: &[StepNode]) -> String {
    let mut ordered: Vec<&StepNode> = nodes.iter().collect();
    ordered.sort_by(|a, b| {
        a.position
            .y
            .partial_cmp(&b.position.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut yaml = format!(
        "name: {WORKFLOW_NAME}\n\
         on:\n\
         \x20 push:\n\
         \x20   branches: [ main ]\n\
         \x20 pull_request:\n\
         \x20   branches: [ main ]\n\
         \n\
         jobs:\n\
         \x20 build:\n\
         \x20   runs-on: ubuntu-latest\n\
         \x20   steps:\n"
    );

    for node in ordered {
        let uses = match node.config.get("repository") {
            Some(ConfigValue::String(repo)) if !repo.trim().is_empty() => repo.clone(),
            _ => format!("actions/{}@v4", node.kind),
        };
        yaml.push_str(&format!(
            "    - name: {}\n      uses: {}\n",
            escape_scalar(&node.name),
            escape_scalar(&uses)
        ));
        if node.config.len() > 1 {
            yaml.push_str("      with:\n");
            for (key, value) in &node.config {
                if key == "repository" {
                    continue;
                }
                yaml.push_str(&format!(
                    "        {}: {}\n",
                    escape_scalar(key),
                    render_value(value)
                ));
            }
        }
    }

    yaml
}
