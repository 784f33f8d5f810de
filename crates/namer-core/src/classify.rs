//! Layer classification: which standard name a layer should carry.
//!
//! Rules are evaluated in a fixed order and the first match wins:
//!
//! 1. a selected root frame exactly `screen_width` wide → `Screen`
//! 2. a mask → `Mask`
//! 3. text, when text naming is on → its (truncated) content
//! 4. basic shapes → `Line`, `Image`, `Gradient` or `Shape` by paint
//! 5. lines → `Line`
//! 6. frames → `Divider`, `Inner-column`, `Inner-row`, `Wrapper` or `Contain`
//! 7. groups → `Mask Group` or `Group`
//!
//! Anything else (boolean operations that are not masks, sections, text
//! without text naming, ...) gets no name.

use crate::model::{LayoutMode, NodeType, PaintType, Paints};
use crate::rename::RenameConfig;
use crate::tree::LayerTree;
use std::borrow::Cow;

/// A standard layer name produced by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerName {
    Screen,
    Mask,
    Text(String),
    Line,
    Image,
    Gradient,
    Shape,
    Divider,
    Wrapper,
    InnerColumn,
    InnerRow,
    Contain,
    MaskGroup,
    Group,
}

impl LayerName {
    pub fn as_str(&self) -> &str {
        match self {
            LayerName::Screen => "Screen",
            LayerName::Mask => "Mask",
            LayerName::Text(text) => text,
            LayerName::Line => "Line",
            LayerName::Image => "Image",
            LayerName::Gradient => "Gradient",
            LayerName::Shape => "Shape",
            LayerName::Divider => "Divider",
            LayerName::Wrapper => "Wrapper",
            LayerName::InnerColumn => "Inner-column",
            LayerName::InnerRow => "Inner-row",
            LayerName::Contain => "Contain",
            LayerName::MaskGroup => "Mask Group",
            LayerName::Group => "Group",
        }
    }
}

// ─── Predicates ──────────────────────────────────────────────────────────

/// A boolean operation or basic shape flagged as a mask.
pub fn is_mask<T: LayerTree>(tree: &T, node: T::Handle) -> bool {
    let node_type = tree.node_type(node);
    (node_type == NodeType::BooleanOperation || node_type.is_shape())
        && tree.is_mask(node) == Some(true)
}

/// Concrete empty fills together with concrete non-empty strokes.
pub fn has_only_stroke<T: LayerTree>(tree: &T, node: T::Handle) -> bool {
    paints_only_stroke(tree.fills(node), tree.strokes(node))
}

fn paints_only_stroke(fills: Option<&Paints>, strokes: Option<&Paints>) -> bool {
    let fills = fills.and_then(Paints::list);
    let strokes = strokes.and_then(Paints::list);
    matches!((fills, strokes), (Some(f), Some(s)) if f.is_empty() && !s.is_empty())
}

// ─── Classification ──────────────────────────────────────────────────────

/// Compute the standard name for `node`, or `None` when no rule applies.
///
/// Pure: reads the tree, never writes it. The mask-group side effect on
/// the parent is applied by the rename traversal.
pub fn classify<T: LayerTree>(
    tree: &T,
    node: T::Handle,
    is_root: bool,
    config: &RenameConfig,
) -> Option<LayerName> {
    let node_type = tree.node_type(node);

    if is_root && node_type == NodeType::Frame && tree.width(node) == Some(config.screen_width) {
        return Some(LayerName::Screen);
    }
    if is_mask(tree, node) {
        return Some(LayerName::Mask);
    }

    match node_type {
        NodeType::Text => {
            let max_len = config.text_names?;
            tree.characters(node)
                .map(|text| LayerName::Text(text_name(text, max_len).into_owned()))
        }
        t if t.is_shape() => Some(shape_name(tree, node)),
        NodeType::Line => Some(LayerName::Line),
        NodeType::Frame => Some(frame_name(tree, node, config)),
        NodeType::Group => Some(group_name(tree, node)),
        _ => None,
    }
}

fn shape_name<T: LayerTree>(tree: &T, node: T::Handle) -> LayerName {
    let (Some(fills), Some(strokes)) = (tree.fills(node), tree.strokes(node)) else {
        return LayerName::Shape;
    };
    if paints_only_stroke(Some(fills), Some(strokes)) {
        return LayerName::Line;
    }
    match fills.list() {
        Some(paints) if paints.iter().any(|p| p.kind == PaintType::Image) => {
            LayerName::Image
        }
        Some(paints) if paints.iter().any(|p| p.kind.is_gradient()) => LayerName::Gradient,
        _ => LayerName::Shape,
    }
}

fn frame_name<T: LayerTree>(tree: &T, node: T::Handle, config: &RenameConfig) -> LayerName {
    if config.divider_height.is_some() && tree.height(node) == config.divider_height {
        return LayerName::Divider;
    }

    let Some(mode) = tree.layout_mode(node).filter(|m| m.is_auto()) else {
        return LayerName::Contain;
    };

    let nested_in_auto_layout = tree.parent(node).is_some_and(|parent| {
        matches!(
            tree.node_type(parent),
            NodeType::Frame | NodeType::Component | NodeType::Instance
        ) && tree.layout_mode(parent).is_some_and(|m| m.is_auto())
    });

    if !nested_in_auto_layout {
        LayerName::Wrapper
    } else if mode == LayoutMode::Vertical {
        LayerName::InnerColumn
    } else {
        LayerName::InnerRow
    }
}

fn group_name<T: LayerTree>(tree: &T, node: T::Handle) -> LayerName {
    let has_mask = tree
        .children(node)
        .unwrap_or_default()
        .into_iter()
        .any(|child| is_mask(tree, child));
    if has_mask {
        LayerName::MaskGroup
    } else {
        LayerName::Group
    }
}

/// Name a text layer after its content: the first `max_len` characters,
/// with `...` appended when the content was cut.
pub fn text_name(text: &str, max_len: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_len) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
    }
}
