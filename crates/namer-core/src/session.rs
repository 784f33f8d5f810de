//! One plugin session: read the selection, rename, notify, close.
//!
//! The host (the design tool) is injected through [`PluginHost`], so the
//! whole flow runs against [`MemoryHost`] in tests and the CLI.

use crate::model::Document;
use crate::rename::{RenameConfig, RenameEntry, Renamer};
use crate::tree::LayerTree;
use serde::{Deserialize, Serialize};

// ─── Outcome ──────────────────────────────────────────────────────────────

/// Result of renaming one selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// The selection was empty; nothing was traversed.
    NothingSelected,
    /// Total rename count over every selected root.
    Renamed { count: usize },
}

impl RunOutcome {
    pub fn count(self) -> Option<usize> {
        match self {
            RunOutcome::NothingSelected => None,
            RunOutcome::Renamed { count } => Some(count),
        }
    }

    /// The notification text for this outcome.
    pub fn message(self, messages: &Messages) -> String {
        match self {
            RunOutcome::NothingSelected => messages.nothing_selected.clone(),
            RunOutcome::Renamed { count } => messages.done(count),
        }
    }
}

// ─── Messages ─────────────────────────────────────────────────────────────

/// User-facing notification strings.
///
/// `done_one` is used for a count of exactly 1, `done_many` otherwise;
/// `{count}` in either is replaced by the number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub done_one: String,
    pub done_many: String,
    pub nothing_selected: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            done_one: "✨ Done, {count} Layer Renamed ✨".into(),
            done_many: "✨ Done, {count} Layers Renamed ✨".into(),
            nothing_selected: "🙈 Oops! Please select at least one frame to get started 🎨".into(),
        }
    }
}

impl Messages {
    pub fn done(&self, count: usize) -> String {
        let template = if count == 1 {
            &self.done_one
        } else {
            &self.done_many
        };
        template.replace("{count}", &count.to_string())
    }
}

/// Everything a session needs: rename rules plus notification text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    pub rename: RenameConfig,
    pub messages: Messages,
}

// ─── Selection ────────────────────────────────────────────────────────────

/// Rename every root in `roots`, in order, and sum the counts.
///
/// An empty selection never reaches the traversal.
pub fn rename_selection<T: LayerTree>(
    tree: &mut T,
    roots: &[T::Handle],
    config: &RenameConfig,
) -> RunOutcome {
    rename_selection_with_report(tree, roots, config).0
}

/// Like [`rename_selection`], also returning every effective rename.
pub fn rename_selection_with_report<T: LayerTree>(
    tree: &mut T,
    roots: &[T::Handle],
    config: &RenameConfig,
) -> (RunOutcome, Vec<RenameEntry<T::Handle>>) {
    if roots.is_empty() {
        log::info!("nothing selected");
        return (RunOutcome::NothingSelected, Vec::new());
    }

    let mut renamer = Renamer::new(config);
    let count: usize = roots
        .iter()
        .map(|&root| renamer.visit(tree, root, false, true))
        .sum();
    log::info!("renamed {count} layer(s) across {} root(s)", roots.len());

    (RunOutcome::Renamed { count }, renamer.into_report())
}

// ─── Host ─────────────────────────────────────────────────────────────────

/// The design tool as seen by one session.
pub trait PluginHost {
    type Tree: LayerTree;

    fn tree_mut(&mut self) -> &mut Self::Tree;

    /// Current selection, in selection order.
    fn selection(&self) -> Vec<<Self::Tree as LayerTree>::Handle>;

    fn notify(&mut self, message: &str);

    /// End the session. Called exactly once, last.
    fn close(&mut self);
}

/// Run a whole session against `host`.
pub fn run_plugin<H: PluginHost>(host: &mut H, config: &PluginConfig) -> RunOutcome {
    run_plugin_with_report(host, config).0
}

/// Like [`run_plugin`], also returning every effective rename.
pub fn run_plugin_with_report<H: PluginHost>(
    host: &mut H,
    config: &PluginConfig,
) -> (RunOutcome, Vec<RenameEntry<<H::Tree as LayerTree>::Handle>>) {
    let selection = host.selection();
    let (outcome, report) = rename_selection_with_report(host.tree_mut(), &selection, &config.rename);
    host.notify(&outcome.message(&config.messages));
    host.close();
    (outcome, report)
}

/// In-memory host over a [`Document`]. Records notifications.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    pub document: Document,
    pub notifications: Vec<String>,
    pub closed: bool,
}

impl MemoryHost {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            notifications: Vec::new(),
            closed: false,
        }
    }
}

impl PluginHost for MemoryHost {
    type Tree = Document;

    fn tree_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn selection(&self) -> Vec<petgraph::graph::NodeIndex> {
        self.document.selection.clone()
    }

    fn notify(&mut self, message: &str) {
        log::info!("notify: {message}");
        self.notifications.push(message.to_string());
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
