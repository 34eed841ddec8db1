//! The pipeline store.
//!
//! Owns the node and connection collections, the trigger configuration, the
//! selection cursor, the pending wiring gesture, and the undo/redo history.
//! All mutations come through here; views hold only transient references.
//!
//! History checkpointing runs on two debounce tiers: a quick tier for
//! discrete structural actions and a slow tier for continuous edits, both
//! coalescing bursts into a single snapshot. The host loop drives the timers
//! through [`PipelineStore::flush_checkpoints`].

use std::time::{Duration, Instant};

use riveter_catalog::DragPayload;
use riveter_types::{
    ConfigMap, Connection, PipelineDocument, Position, Result, RiveterError, Snapshot, StepNode,
    Triggers,
};

use crate::history::History;
use crate::timing::Debouncer;

/// Quick tier: add/delete node or connection, clear.
const QUICK_CHECKPOINT: Duration = Duration::from_millis(500);
/// Slow tier: field typing, dragging, trigger edits.
const SLOW_CHECKPOINT: Duration = Duration::from_secs(2);

/// The id-less node description handed to [`PipelineStore::add_node`].
#[derive(Debug, Clone)]
pub struct NodeSeed {
    pub kind: String,
    pub name: String,
    pub position: Position,
    pub config: ConfigMap,
}

impl NodeSeed {
    /// Build a seed from a decoded drag payload and the drop position.
    pub fn from_payload(payload: &DragPayload, position: Position) -> Self {
        Self {
            kind: payload.kind.clone(),
            name: payload.name.clone(),
            position,
            config: payload.config.clone(),
        }
    }
}

/// Partial node update; absent fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct NodeUpdate {
    pub name: Option<String>,
    pub position: Option<Position>,
    pub config: Option<ConfigMap>,
}

/// What `end_connection` did with the wiring gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireOutcome {
    /// A new connection was created.
    Connected(String),
    /// The ordered pair already exists; nothing was created. Callers that
    /// want toggle semantics delete the returned connection.
    Existing(String),
    /// No source was pending, or source and target were the same node.
    Ignored,
}

#[derive(Debug)]
pub struct PipelineStore {
    nodes: Vec<StepNode>,
    connections: Vec<Connection>,
    triggers: Triggers,
    selected: Option<String>,
    connecting_from: Option<String>,
    history: History,
    restoring: bool,
    quick: Debouncer,
    slow: Debouncer,
}

impl Default for PipelineStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStore {
    pub fn new() -> Self {
        let triggers = Triggers::default();
        let initial = Snapshot::capture(&[], &[], &triggers);
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            triggers,
            selected: None,
            connecting_from: None,
            history: History::new(initial),
            restoring: false,
            quick: Debouncer::new(QUICK_CHECKPOINT),
            slow: Debouncer::new(SLOW_CHECKPOINT),
        }
    }

    // --- read access -------------------------------------------------------

    pub fn nodes(&self) -> &[StepNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn triggers(&self) -> &Triggers {
        &self.triggers
    }

    pub fn node(&self, id: &str) -> Option<&StepNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn selected_node(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn connecting_from(&self) -> Option<&str> {
        self.connecting_from.as_deref()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- node mutations ----------------------------------------------------

    /// Insert a node from a template seed and return its fresh id.
    pub fn add_node(&mut self, seed: NodeSeed) -> String {
        let id = format!("node-{}", uuid::Uuid::new_v4());
        self.nodes.push(StepNode {
            id: id.clone(),
            kind: seed.kind,
            name: seed.name,
            position: seed.position,
            config: seed.config,
            inputs: Vec::new(),
            outputs: Vec::new(),
        });
        self.checkpoint_quick();
        id
    }

    /// Merge a partial update into the matching node. Unknown ids are a
    /// silent no-op.
    pub fn update_node(&mut self, id: &str, update: NodeUpdate) {
        let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) else {
            return;
        };
        if let Some(name) = update.name {
            node.name = name;
        }
        if let Some(position) = update.position {
            node.position = position;
        }
        if let Some(config) = update.config {
            node.config = config;
        }
        self.checkpoint_slow();
    }

    /// Remove a node and every connection touching it; clears the selection
    /// if it pointed at the node.
    pub fn delete_node(&mut self, id: &str) {
        self.nodes.retain(|n| n.id != id);
        self.connections
            .retain(|c| c.source != id && c.target != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        self.checkpoint_quick();
    }

    pub fn select_node(&mut self, id: Option<&str>) {
        self.selected = id.map(String::from);
    }

    // --- connection mutations ----------------------------------------------

    /// Append a connection and return its fresh id. Self-loops and duplicate
    /// pairs are not rejected here; that policy belongs to the wiring
    /// gesture's caller.
    pub fn add_connection(
        &mut self,
        source: &str,
        target: &str,
        slots: (Option<String>, Option<String>),
    ) -> String {
        let id = format!("conn-{}", uuid::Uuid::new_v4());
        self.connections.push(Connection {
            id: id.clone(),
            source: source.to_string(),
            target: target.to_string(),
            source_slot: slots.0,
            target_slot: slots.1,
        });
        self.checkpoint_quick();
        id
    }

    pub fn delete_connection(&mut self, id: &str) {
        self.connections.retain(|c| c.id != id);
        self.checkpoint_quick();
    }

    /// Empty nodes and connections and clear the selection. Triggers are
    /// kept; a new workflow still needs them.
    pub fn clear_all(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.selected = None;
        self.checkpoint_quick();
    }

    // --- wiring gesture -----------------------------------------------------

    pub fn start_connection(&mut self, node_id: &str) {
        self.connecting_from = Some(node_id.to_string());
    }

    pub fn cancel_connection(&mut self) {
        self.connecting_from = None;
    }

    /// Complete the pending wiring gesture at `target`.
    ///
    /// No-op when nothing is pending or the gesture would form a self-loop.
    /// When the ordered pair already exists the existing connection id is
    /// returned instead of creating a duplicate. The pending source is
    /// cleared in every case.
    pub fn end_connection(&mut self, target: &str) -> WireOutcome {
        let Some(source) = self.connecting_from.take() else {
            return WireOutcome::Ignored;
        };
        if source == target {
            return WireOutcome::Ignored;
        }
        if let Some(existing) = self
            .connections
            .iter()
            .find(|c| c.source == source && c.target == target)
        {
            return WireOutcome::Existing(existing.id.clone());
        }
        WireOutcome::Connected(self.add_connection(&source, target, (None, None)))
    }

    // --- triggers -----------------------------------------------------------

    /// Replace the trigger configuration wholesale.
    ///
    /// A configuration with every kind disabled violates the at-least-one
    /// invariant and is rejected with the state unchanged; the confirmation
    /// dialog in front of this call decides what to re-enable.
    pub fn update_triggers(&mut self, triggers: Triggers) -> Result<()> {
        if triggers.enabled_count() == 0 {
            return Err(RiveterError::LastTrigger);
        }
        self.triggers = triggers;
        self.checkpoint_slow();
        Ok(())
    }

    // --- history ------------------------------------------------------------

    pub fn undo(&mut self) {
        self.restoring = true;
        if let Some(snapshot) = self.history.undo() {
            let snapshot = snapshot.clone();
            self.restore(snapshot);
        }
        self.restoring = false;
    }

    pub fn redo(&mut self) {
        self.restoring = true;
        if let Some(snapshot) = self.history.redo() {
            let snapshot = snapshot.clone();
            self.restore(snapshot);
        }
        self.restoring = false;
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.nodes = snapshot.nodes;
        self.connections = snapshot.connections;
        self.triggers = snapshot.triggers;
        // A checkpoint armed before the restore would clobber the redo tail
        // with the restored state; drop it.
        self.quick.cancel();
        self.slow.cancel();
    }

    /// Commit a due checkpoint, if any. The host loop calls this on its tick;
    /// tests pass a synthetic `now` to drive the timers.
    pub fn flush_checkpoints(&mut self, now: Instant) -> bool {
        if !(self.quick.fire(now) || self.slow.fire(now)) {
            return false;
        }
        self.history.push(Snapshot::capture(
            &self.nodes,
            &self.connections,
            &self.triggers,
        ));
        tracing::debug!(
            nodes = self.nodes.len(),
            connections = self.connections.len(),
            history = self.history.len(),
            "history checkpoint committed"
        );
        true
    }

    /// True when a checkpoint is pending on either tier.
    pub fn checkpoint_pending(&self) -> bool {
        self.quick.is_armed() || self.slow.is_armed()
    }

    fn checkpoint_quick(&mut self) {
        if self.restoring {
            return;
        }
        // A single checkpoint is pending at a time; the tiers share it.
        self.slow.cancel();
        self.quick.arm(Instant::now());
    }

    fn checkpoint_slow(&mut self) {
        if self.restoring {
            return;
        }
        self.quick.cancel();
        self.slow.arm(Instant::now());
    }

    // --- document bridge ----------------------------------------------------

    /// Snapshot the current state as a serializable document.
    pub fn export_document(&self) -> PipelineDocument {
        PipelineDocument {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
            triggers: self.triggers.clone(),
        }
    }

    /// Replace the current state with a loaded document and checkpoint
    /// immediately so the import itself is undoable.
    pub fn import_document(&mut self, doc: PipelineDocument) {
        self.nodes = doc.nodes;
        self.connections = doc.connections;
        self.triggers = doc.triggers;
        self.selected = None;
        self.connecting_from = None;
        self.quick.cancel();
        self.slow.cancel();
        self.history.push(Snapshot::capture(
            &self.nodes,
            &self.connections,
            &self.triggers,
        ));
    }
}
