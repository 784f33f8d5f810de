//! Read/write access to a host layer tree.
//!
//! The namer never owns the document it renames. It talks to the tree
//! through [`LayerTree`], addressing layers by a copyable, non-owning
//! handle. [`Document`] is the in-memory implementation; a host bridge can
//! provide its own.

use crate::model::{Document, LayoutMode, NodeType, Paints};
use petgraph::graph::NodeIndex;
use std::fmt::Debug;

/// Accessors the namer needs over a layer tree.
///
/// Optional attributes return `None` when the layer does not carry them.
/// `children` returns `None` for layer types without a children list.
pub trait LayerTree {
    type Handle: Copy + Eq + Debug;

    fn node_type(&self, node: Self::Handle) -> NodeType;
    fn name(&self, node: Self::Handle) -> &str;
    fn set_name(&mut self, node: Self::Handle, name: &str);

    fn width(&self, node: Self::Handle) -> Option<f64>;
    fn height(&self, node: Self::Handle) -> Option<f64>;
    fn fills(&self, node: Self::Handle) -> Option<&Paints>;
    fn strokes(&self, node: Self::Handle) -> Option<&Paints>;
    fn layout_mode(&self, node: Self::Handle) -> Option<LayoutMode>;
    fn is_mask(&self, node: Self::Handle) -> Option<bool>;
    fn characters(&self, node: Self::Handle) -> Option<&str>;

    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;
    fn children(&self, node: Self::Handle) -> Option<Vec<Self::Handle>>;
}

impl LayerTree for Document {
    type Handle = NodeIndex;

    fn node_type(&self, node: NodeIndex) -> NodeType {
        self.layer(node).node_type
    }

    fn name(&self, node: NodeIndex) -> &str {
        &self.layer(node).name
    }

    fn set_name(&mut self, node: NodeIndex, name: &str) {
        let layer = self.layer_mut(node);
        layer.name.clear();
        layer.name.push_str(name);
    }

    fn width(&self, node: NodeIndex) -> Option<f64> {
        self.layer(node).width
    }

    fn height(&self, node: NodeIndex) -> Option<f64> {
        self.layer(node).height
    }

    fn fills(&self, node: NodeIndex) -> Option<&Paints> {
        self.layer(node).fills.as_ref()
    }

    fn strokes(&self, node: NodeIndex) -> Option<&Paints> {
        self.layer(node).strokes.as_ref()
    }

    fn layout_mode(&self, node: NodeIndex) -> Option<LayoutMode> {
        self.layer(node).layout_mode
    }

    fn is_mask(&self, node: NodeIndex) -> Option<bool> {
        self.layer(node).is_mask
    }

    fn characters(&self, node: NodeIndex) -> Option<&str> {
        self.layer(node).characters.as_deref()
    }

    fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        Document::parent(self, node)
    }

    fn children(&self, node: NodeIndex) -> Option<Vec<NodeIndex>> {
        self.node_type(node)
            .is_container()
            .then(|| Document::children(self, node))
    }
}
