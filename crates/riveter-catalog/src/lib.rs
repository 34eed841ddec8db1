//! Static action-template catalog and the drag-payload wire format.
//!
//! The catalog is a read-only dataset of step templates grouped into
//! categories, embedded at build time. The palette renders it; the canvas
//! receives templates back as [`DragPayload`]s attached to drop events.

pub mod catalog;
pub mod payload;

pub use catalog::{ActionTemplate, Catalog, Category};
pub use payload::{DragPayload, MIME_KEYS};
