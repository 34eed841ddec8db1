//! The pipeline store: single source of truth for the workflow graph.
//!
//! This crate implements the editor's state layer: node/connection/trigger
//! mutations, the pending-connection wiring gesture, two-tier debounced
//! history checkpointing with undo/redo, the input-sanitization defense
//! layer, and the canvas view controller.

pub mod history;
pub mod sanitize;
pub mod store;
pub mod timing;
pub mod viewport;

pub use history::History;
pub use sanitize::{normalize_config_value, sanitize_step_name, screen, Screened};
pub use store::{NodeSeed, NodeUpdate, PipelineStore, WireOutcome};
pub use timing::{Debouncer, Throttler};
pub use viewport::Viewport;
