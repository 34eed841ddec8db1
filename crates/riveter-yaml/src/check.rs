//! Advisory structural checks.
//!
//! [`check_document`] verifies the rendered text carries the mandatory
//! top-level keys and even-width indentation; [`lint_graph`] checks the graph
//! itself for dangling endpoints, self-loops, duplicates, and disabled
//! triggers. Neither is enforced in the render path: findings are logged in
//! debug builds and surfaced by the CLI's `validate` command, nothing more.

use std::collections::HashSet;

use riveter_types::{Connection, StepNode, Triggers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub rule: &'static str,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    fn error(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    fn warning(rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

const REQUIRED_KEYS: [(&str, &str); 5] = [
    ("name:", "workflow name"),
    ("on:", "triggers (on block)"),
    ("jobs:", "jobs"),
    ("runs-on:", "runs-on in jobs"),
    ("steps:", "steps in jobs"),
];

/// Structural self-check over a rendered document.
pub fn check_document(yaml: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (key, label) in REQUIRED_KEYS {
        if !yaml.contains(key) {
            findings.push(Finding::error("required_keys", format!("Missing {label}")));
        }
    }

    for line in yaml.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start_matches(' ').len();
        if indent % 2 != 0 {
            findings.push(Finding::error(
                "indentation",
                format!("Odd indentation at line: {}", line.trim()),
            ));
        }
    }

    findings
}

/// Graph-level diagnostics used by the CLI's `validate` command.
pub fn lint_graph(
    nodes: &[StepNode],
    connections: &[Connection],
    triggers: &Triggers,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    for conn in connections {
        for endpoint in [&conn.source, &conn.target] {
            if !ids.contains(endpoint.as_str()) {
                findings.push(Finding::error(
                    "dangling_connection",
                    format!("Connection {} references missing node '{endpoint}'", conn.id),
                ));
            }
        }
        if conn.source == conn.target {
            findings.push(Finding::warning(
                "self_loop",
                format!("Connection {} loops node '{}' onto itself", conn.id, conn.source),
            ));
        }
    }

    let mut seen_pairs = HashSet::new();
    for conn in connections {
        if !seen_pairs.insert((conn.source.as_str(), conn.target.as_str())) {
            findings.push(Finding::warning(
                "duplicate_connection",
                format!("Duplicate connection {} -> {}", conn.source, conn.target),
            ));
        }
    }

    if triggers.enabled_count() == 0 {
        findings.push(Finding::warning(
            "no_triggers",
            "No trigger enabled; the generated workflow falls back to push on main",
        ));
    }

    findings
}

/// Log document findings in debug builds. Release builds skip the scan.
pub fn debug_check(yaml: &str) {
    if cfg!(debug_assertions) {
        for finding in check_document(yaml) {
            tracing::warn!(rule = finding.rule, "{}", finding.message);
        }
    }
}
