//! Topological ordering and workflow rendering.
//!
//! Pure functions from the pipeline graph to a GitHub-Actions-shaped YAML
//! document: deterministic node ordering, step and trigger rendering with
//! escaping, and an advisory structural self-check.

pub mod check;
pub mod escape;
pub mod order;
pub mod workflow;

pub use check::{check_document, debug_check, lint_graph, Finding, Severity};
pub use escape::{block_scalar, escape_scalar, render_value};
pub use order::topological_order;
pub use workflow::{render_positional, render_step, render_triggers, render_workflow};
