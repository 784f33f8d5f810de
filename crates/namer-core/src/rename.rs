//! The rename traversal.
//!
//! Walks a layer subtree depth-first in pre-order, classifies each layer
//! and writes the standard name back through [`LayerTree::set_name`].
//! Components and instances freeze everything beneath them. A mask also
//! renames its parent group to `Mask Group`.

use crate::classify::{LayerName, classify};
use crate::model::NodeType;
use crate::tree::LayerTree;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;

// ─── Config ───────────────────────────────────────────────────────────────

/// How renames are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMode {
    /// Count only writes that changed a name. A second run over an already
    /// named tree counts zero.
    #[default]
    Changed,
    /// Count every matched rule and every mask-parent rename, even when the
    /// name was already correct. Re-runs report nonzero counts.
    Matched,
}

/// Configuration for [`rename_node`].
///
/// The defaults match the most common deployment: no preserved names, the
/// 1680px screen rule, the 1px divider rule, no text naming, and counting
/// only effective renames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Layers whose current name is in this set are not reclassified.
    /// Their children still are.
    pub preserve_names: BTreeSet<String>,

    /// Width of a selected root frame that makes it a `Screen`. Default: **1680**.
    pub screen_width: f64,

    /// Height of a frame that makes it a `Divider`. `None` disables the rule.
    /// Default: **Some(1.0)**.
    pub divider_height: Option<f64>,

    /// Name text layers after their content, cut to this many characters.
    /// `None` leaves text layers alone. Default: **None**.
    pub text_names: Option<usize>,

    /// Default: [`CountMode::Changed`].
    pub count_mode: CountMode,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            preserve_names: BTreeSet::new(),
            screen_width: 1680.0,
            divider_height: Some(1.0),
            text_names: None,
            count_mode: CountMode::Changed,
        }
    }
}

impl RenameConfig {
    /// Names kept by the text-naming deployment.
    pub const CURATED_NAMES: [&'static str; 6] =
        ["Headline", "Head", "Top", "Bottom", "Label", "Paragraph"];

    /// Count every matched rule, even when the name was already current.
    pub fn legacy() -> Self {
        Self {
            count_mode: CountMode::Matched,
            ..Self::default()
        }
    }

    /// Text layers named after their first 50 characters, curated
    /// structural names preserved.
    pub fn text_variant() -> Self {
        Self {
            preserve_names: Self::CURATED_NAMES.iter().map(|s| s.to_string()).collect(),
            text_names: Some(50),
            ..Self::default()
        }
    }

    pub fn preserves(&self, name: &str) -> bool {
        self.preserve_names.contains(name)
    }
}

// ─── Report ───────────────────────────────────────────────────────────────

/// One effective rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry<H> {
    pub node: H,
    pub from: String,
    pub to: String,
}

// ─── Traversal ────────────────────────────────────────────────────────────

/// Rename `node` and its subtree as a selected root. Returns the rename count.
pub fn rename_node<T: LayerTree>(tree: &mut T, node: T::Handle, config: &RenameConfig) -> usize {
    rename_subtree(tree, node, false, true, config)
}

/// Rename `node` and its subtree with explicit traversal state.
///
/// `inside_boundary` marks a subtree below a component or instance;
/// `is_root` enables the `Screen` rule.
pub fn rename_subtree<T: LayerTree>(
    tree: &mut T,
    node: T::Handle,
    inside_boundary: bool,
    is_root: bool,
    config: &RenameConfig,
) -> usize {
    let mut renamer = Renamer::new(config);
    renamer.visit(tree, node, inside_boundary, is_root)
}

/// Traversal state: the config plus the running rename report.
pub struct Renamer<'a, H> {
    config: &'a RenameConfig,
    report: Vec<RenameEntry<H>>,
}

impl<'a, H: Copy + Debug> Renamer<'a, H> {
    pub fn new(config: &'a RenameConfig) -> Self {
        Self {
            config,
            report: Vec::new(),
        }
    }

    /// Renames applied so far, in application order.
    pub fn into_report(self) -> Vec<RenameEntry<H>> {
        self.report
    }

    /// Visit one layer and its subtree. Returns the rename count.
    pub fn visit<T>(&mut self, tree: &mut T, node: H, inside_boundary: bool, is_root: bool) -> usize
    where
        T: LayerTree<Handle = H>,
    {
        if tree.node_type(node).is_component_boundary() {
            log::trace!("boundary {:?} `{}`: descendants frozen", node, tree.name(node));
            return self.visit_children(tree, node, true);
        }

        let mut count = 0;
        if inside_boundary {
            log::trace!("skip {:?} `{}`: inside component", node, tree.name(node));
        } else if self.config.preserves(tree.name(node)) {
            log::trace!("skip {:?} `{}`: preserved name", node, tree.name(node));
        } else {
            count += self.rename_one(tree, node, is_root);
        }

        count + self.visit_children(tree, node, inside_boundary)
    }

    fn visit_children<T>(&mut self, tree: &mut T, node: H, inside_boundary: bool) -> usize
    where
        T: LayerTree<Handle = H>,
    {
        let Some(children) = tree.children(node) else {
            return 0;
        };
        children
            .into_iter()
            .map(|child| self.visit(tree, child, inside_boundary, false))
            .sum()
    }

    fn rename_one<T>(&mut self, tree: &mut T, node: H, is_root: bool) -> usize
    where
        T: LayerTree<Handle = H>,
    {
        let Some(name) = classify(tree, node, is_root, self.config) else {
            log::trace!("skip {:?} `{}`: no rule", node, tree.name(node));
            return 0;
        };

        let mut count = self.apply(tree, node, name.as_str());

        if name == LayerName::Mask
            && let Some(parent) = tree.parent(node)
            && tree.node_type(parent) == NodeType::Group
        {
            count += self.apply(tree, parent, LayerName::MaskGroup.as_str());
        }

        count
    }

    /// Write `name` unless it is empty or already current.
    fn apply<T>(&mut self, tree: &mut T, node: H, name: &str) -> usize
    where
        T: LayerTree<Handle = H>,
    {
        if name.is_empty() {
            return 0;
        }

        let changed = tree.name(node) != name;
        if changed {
            let from = tree.name(node).to_string();
            log::debug!("rename {:?}: `{}` → `{}`", node, from, name);
            tree.set_name(node, name);
            self.report.push(RenameEntry {
                node,
                from,
                to: name.to_string(),
            });
        }

        match self.config.count_mode {
            CountMode::Changed => usize::from(changed),
            CountMode::Matched => 1,
        }
    }
}
