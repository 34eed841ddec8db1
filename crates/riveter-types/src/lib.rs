//! Shared types and errors for the Riveter workflow builder.
//!
//! This crate provides the foundational types used across all other Riveter crates:
//! - `RiveterError` — unified error taxonomy
//! - `StepNode` / `Connection` — the pipeline graph entities
//! - `Triggers` — workflow trigger configuration
//! - `Snapshot` — immutable history entry for undo/redo
//! - `PipelineDocument` — the on-disk pipeline description

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unified error type for all Riveter subsystems.
#[derive(Debug, thiserror::Error)]
pub enum RiveterError {
    #[error("Unknown action template '{kind}'")]
    UnknownTemplate { kind: String },

    #[error("At least one workflow trigger must remain enabled")]
    LastTrigger,

    #[error("Workflow structure check failed: {0}")]
    StructureError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl RiveterError {
    /// Returns `true` when the editor swallows this error as a silent no-op
    /// (malformed payloads, unknown templates) rather than surfacing it.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            RiveterError::Json(_) | RiveterError::UnknownTemplate { .. }
        )
    }
}

/// A convenience alias for `Result<T, RiveterError>`.
pub type Result<T> = std::result::Result<T, RiveterError>;

// ---------------------------------------------------------------------------
// ConfigValue — a single step-configuration value
// ---------------------------------------------------------------------------

/// A configuration value attached to a step under an arbitrary option key.
///
/// The `Map` variant carries nested maps such as the `env` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    String(String),
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// A value is blank when it is a string that is empty or pure whitespace,
    /// or an empty map. Numbers and booleans are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            ConfigValue::String(s) => s.trim().is_empty(),
            ConfigValue::Map(m) => m.is_empty(),
            _ => false,
        }
    }

    /// Parse a free-form JSON config field. Malformed text yields `None`;
    /// callers skip the update and prior state stands.
    pub fn from_json_text(text: &str) -> Option<ConfigValue> {
        serde_json::from_str(text).ok()
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Number(n)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Number(n as f64)
    }
}

/// A step's full configuration mapping.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

// ---------------------------------------------------------------------------
// Graph entities
// ---------------------------------------------------------------------------

/// 2D canvas position of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single pipeline step placed on the canvas.
///
/// `inputs`/`outputs` are declared slot lists; they stay empty in practice
/// because slots are inferred from connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub config: ConfigMap,
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

/// A directed connection between two steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(
        rename = "sourceHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub source_slot: Option<String>,
    #[serde(
        rename = "targetHandle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub target_slot: Option<String>,
}

// ---------------------------------------------------------------------------
// Triggers — workflow trigger configuration
// ---------------------------------------------------------------------------

/// The fixed set of supported trigger kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Push,
    PullRequest,
    Schedule,
    WorkflowDispatch,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 4] = [
        TriggerKind::Push,
        TriggerKind::PullRequest,
        TriggerKind::Schedule,
        TriggerKind::WorkflowDispatch,
    ];

    /// The key this kind uses in the workflow `on:` block.
    pub fn as_key(&self) -> &'static str {
        match self {
            TriggerKind::Push => "push",
            TriggerKind::PullRequest => "pull_request",
            TriggerKind::Schedule => "schedule",
            TriggerKind::WorkflowDispatch => "workflow_dispatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushTrigger {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default)]
    pub paths_ignore: Vec<String>,
}

impl Default for PushTrigger {
    fn default() -> Self {
        Self {
            branches: vec!["main".to_string()],
            paths: Vec::new(),
            paths_ignore: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestTrigger {
    #[serde(default)]
    pub branches: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

impl Default for PullRequestTrigger {
    fn default() -> Self {
        Self {
            branches: vec!["main".to_string()],
            types: vec![
                "opened".to_string(),
                "synchronize".to_string(),
                "reopened".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleTrigger {
    #[serde(default)]
    pub cron: String,
}

/// Manual (`workflow_dispatch`) trigger. `inputs` is free-form: either a raw
/// string the user typed in the inputs editor or a parsed object of input
/// descriptors (`description`, `required`, `type` per input name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualTrigger {
    #[serde(default)]
    pub inputs: serde_json::Value,
}

impl Default for ManualTrigger {
    fn default() -> Self {
        Self {
            inputs: serde_json::Value::Null,
        }
    }
}

impl ManualTrigger {
    /// Build from the raw inputs editor text: valid JSON is stored parsed,
    /// anything else is kept verbatim as a string, blank text clears the
    /// inputs. Parse failures are never surfaced.
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        let inputs = serde_json::from_str(trimmed)
            .unwrap_or_else(|_| serde_json::Value::String(trimmed.to_string()));
        Self { inputs }
    }
}

/// Workflow trigger configuration: one optional record per trigger kind.
/// An absent record means the kind is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triggers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push: Option<PushTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<ScheduleTrigger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_dispatch: Option<ManualTrigger>,
}

impl Default for Triggers {
    /// A fresh workflow starts with a push trigger on `main`.
    fn default() -> Self {
        Self {
            push: Some(PushTrigger::default()),
            pull_request: None,
            schedule: None,
            workflow_dispatch: None,
        }
    }
}

impl Triggers {
    /// A configuration with every kind disabled. Rejected by the store but
    /// useful as a building block.
    pub fn none() -> Self {
        Self {
            push: None,
            pull_request: None,
            schedule: None,
            workflow_dispatch: None,
        }
    }

    pub fn is_enabled(&self, kind: TriggerKind) -> bool {
        match kind {
            TriggerKind::Push => self.push.is_some(),
            TriggerKind::PullRequest => self.pull_request.is_some(),
            TriggerKind::Schedule => self.schedule.is_some(),
            TriggerKind::WorkflowDispatch => self.workflow_dispatch.is_some(),
        }
    }

    pub fn enabled_count(&self) -> usize {
        TriggerKind::ALL
            .iter()
            .filter(|k| self.is_enabled(**k))
            .count()
    }

    /// Enable a kind, installing its default record if it was disabled.
    pub fn enable(&mut self, kind: TriggerKind) {
        match kind {
            TriggerKind::Push => {
                self.push.get_or_insert_with(PushTrigger::default);
            }
            TriggerKind::PullRequest => {
                self.pull_request.get_or_insert_with(PullRequestTrigger::default);
            }
            TriggerKind::Schedule => {
                self.schedule.get_or_insert_with(ScheduleTrigger::default);
            }
            TriggerKind::WorkflowDispatch => {
                self.workflow_dispatch.get_or_insert_with(ManualTrigger::default);
            }
        }
    }

    pub fn disable(&mut self, kind: TriggerKind) {
        match kind {
            TriggerKind::Push => self.push = None,
            TriggerKind::PullRequest => self.pull_request = None,
            TriggerKind::Schedule => self.schedule = None,
            TriggerKind::WorkflowDispatch => self.workflow_dispatch = None,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot — immutable history entry for undo/redo
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<StepNode>,
    pub connections: Vec<Connection>,
    pub triggers: Triggers,
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn capture(nodes: &[StepNode], connections: &[Connection], triggers: &Triggers) -> Self {
        Self {
            nodes: nodes.to_vec(),
            connections: connections.to_vec(),
            triggers: triggers.clone(),
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// PipelineDocument — the on-disk pipeline description
// ---------------------------------------------------------------------------

/// The serialized form of a pipeline: what the store imports/exports and the
/// CLI reads from disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineDocument {
    #[serde(default)]
    pub nodes: Vec<StepNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default = "Triggers::default")]
    pub triggers: Triggers,
}

impl PipelineDocument {
    /// Read a document from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let doc: Self = serde_json::from_str(&data)?;
        Ok(doc)
    }

    /// Serialize this document to JSON and write it to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_template() {
        let err = RiveterError::UnknownTemplate {
            kind: "mystery".into(),
        };
        assert_eq!(err.to_string(), "Unknown action template 'mystery'");
    }

    #[test]
    fn error_display_last_trigger() {
        assert_eq!(
            RiveterError::LastTrigger.to_string(),
            "At least one workflow trigger must remain enabled"
        );
    }

    #[test]
    fn json_errors_are_silent() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: RiveterError = json_err.into();
        assert!(err.is_silent());
    }

    #[test]
    fn last_trigger_is_not_silent() {
        assert!(!RiveterError::LastTrigger.is_silent());
    }

    // --- ConfigValue ---

    #[test]
    fn config_value_untagged_round_trip() {
        let cases = [
            (r#""hello""#, ConfigValue::String("hello".into())),
            ("true", ConfigValue::Bool(true)),
            ("30", ConfigValue::Number(30.0)),
        ];
        for (json, expected) in cases {
            let parsed: ConfigValue = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected);
            let back = serde_json::to_string(&parsed).unwrap();
            let reparsed: ConfigValue = serde_json::from_str(&back).unwrap();
            assert_eq!(reparsed, expected);
        }
    }

    #[test]
    fn config_value_map_round_trip() {
        let json = r#"{"NODE_ENV": "production", "CI": true}"#;
        let parsed: ConfigValue = serde_json::from_str(json).unwrap();
        let map = parsed.as_map().expect("should parse as map");
        assert_eq!(map.get("NODE_ENV").and_then(|v| v.as_str()), Some("production"));
        assert_eq!(map.get("CI"), Some(&ConfigValue::Bool(true)));
    }

    #[test]
    fn malformed_json_config_text_is_swallowed() {
        assert!(ConfigValue::from_json_text("{broken").is_none());
        assert_eq!(
            ConfigValue::from_json_text(r#"{"CI": true}"#)
                .unwrap()
                .as_map()
                .unwrap()
                .get("CI"),
            Some(&ConfigValue::Bool(true))
        );
    }

    #[test]
    fn manual_trigger_keeps_unparseable_inputs_verbatim() {
        let parsed = ManualTrigger::from_text(r#"{"environment": {"required": true}}"#);
        assert!(parsed.inputs.is_object());

        let raw = ManualTrigger::from_text("not json yet");
        assert_eq!(raw.inputs, serde_json::Value::String("not json yet".into()));

        let blank = ManualTrigger::from_text("   ");
        assert_eq!(blank.inputs, serde_json::Value::Null);
    }

    #[test]
    fn blankness() {
        assert!(ConfigValue::String("   ".into()).is_blank());
        assert!(ConfigValue::String(String::new()).is_blank());
        assert!(!ConfigValue::String("x".into()).is_blank());
        assert!(!ConfigValue::Bool(false).is_blank());
        assert!(!ConfigValue::Number(0.0).is_blank());
    }

    // --- Triggers ---

    #[test]
    fn default_triggers_enable_push_on_main() {
        let t = Triggers::default();
        assert!(t.is_enabled(TriggerKind::Push));
        assert_eq!(t.enabled_count(), 1);
        assert_eq!(t.push.unwrap().branches, vec!["main".to_string()]);
    }

    #[test]
    fn enable_installs_kind_defaults() {
        let mut t = Triggers::none();
        t.enable(TriggerKind::PullRequest);
        let pr = t.pull_request.as_ref().unwrap();
        assert_eq!(pr.branches, vec!["main".to_string()]);
        assert_eq!(pr.types, vec!["opened", "synchronize", "reopened"]);
    }

    #[test]
    fn enable_preserves_existing_record() {
        let mut t = Triggers::default();
        t.push.as_mut().unwrap().branches = vec!["develop".into()];
        t.enable(TriggerKind::Push);
        assert_eq!(t.push.unwrap().branches, vec!["develop".to_string()]);
    }

    #[test]
    fn disable_then_count() {
        let mut t = Triggers::default();
        t.enable(TriggerKind::Schedule);
        assert_eq!(t.enabled_count(), 2);
        t.disable(TriggerKind::Push);
        assert_eq!(t.enabled_count(), 1);
        assert!(!t.is_enabled(TriggerKind::Push));
    }

    #[test]
    fn triggers_serde_skips_disabled_kinds() {
        let json = serde_json::to_string(&Triggers::default()).unwrap();
        assert!(json.contains("push"));
        assert!(!json.contains("pull_request"));
        assert!(!json.contains("schedule"));
    }

    // --- PipelineDocument ---

    fn sample_node(id: &str, y: f64) -> StepNode {
        StepNode {
            id: id.to_string(),
            kind: "run".to_string(),
            name: "Run Tests".to_string(),
            position: Position::new(0.0, y),
            config: ConfigMap::from([("run".to_string(), ConfigValue::from("npm test"))]),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    #[test]
    fn document_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");

        let doc = PipelineDocument {
            nodes: vec![sample_node("node-1", 10.0)],
            connections: vec![Connection {
                id: "conn-1".into(),
                source: "node-1".into(),
                target: "node-2".into(),
                source_slot: None,
                target_slot: None,
            }],
            triggers: Triggers::default(),
        };

        doc.save(&path).unwrap();
        let loaded = PipelineDocument::load(&path).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn document_defaults_missing_sections() {
        let doc: PipelineDocument = serde_json::from_str("{}").unwrap();
        assert!(doc.nodes.is_empty());
        assert!(doc.connections.is_empty());
        assert!(doc.triggers.is_enabled(TriggerKind::Push));
    }

    #[test]
    fn node_kind_serializes_as_type() {
        let json = serde_json::to_string(&sample_node("node-1", 0.0)).unwrap();
        assert!(json.contains(r#""type":"run""#));
    }
}
