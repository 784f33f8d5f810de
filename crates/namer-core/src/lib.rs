pub mod classify;
pub mod emitter;
pub mod id;
pub mod model;
pub mod outline;
pub mod rename;
pub mod session;
pub mod snapshot;
pub mod tree;

pub use classify::{LayerName, classify, has_only_stroke, is_mask};
pub use emitter::emit_outline;
pub use id::NodeId;
pub use model::*;
pub use outline::parse_outline;
pub use rename::{CountMode, RenameConfig, RenameEntry, rename_node};
pub use session::{
    MemoryHost, Messages, PluginConfig, PluginHost, RunOutcome, rename_selection,
    rename_selection_with_report, run_plugin, run_plugin_with_report,
};
pub use snapshot::{Snapshot, SnapshotNode};
pub use tree::LayerTree;

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
