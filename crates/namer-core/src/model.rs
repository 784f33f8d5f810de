//! Layer document data model.
//!
//! A document is a tree of layers rooted at a page. Layers live in a
//! `StableDiGraph` with parent→child edges, so the parent relation is a
//! plain `NodeIndex` lookup and never an owning pointer. Only the attributes
//! the namer reads are modeled: type, name, size, paints, auto-layout mode,
//! the mask flag and text content.

use crate::id::NodeId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Node types ──────────────────────────────────────────────────────────

/// Layer types, spelled the way the host spells them (`"FRAME"`,
/// `"BOOLEAN_OPERATION"`, ...). Types the namer does not know decode as
/// [`NodeType::Other`]: never renamed, children still visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Page,
    Frame,
    Group,
    Section,
    ComponentSet,
    Component,
    Instance,
    BooleanOperation,
    Vector,
    Star,
    Line,
    Ellipse,
    Polygon,
    Rectangle,
    Text,
    Slice,
    #[serde(other)]
    Other,
}

impl NodeType {
    pub const ALL: [NodeType; 17] = [
        NodeType::Page,
        NodeType::Frame,
        NodeType::Group,
        NodeType::Section,
        NodeType::ComponentSet,
        NodeType::Component,
        NodeType::Instance,
        NodeType::BooleanOperation,
        NodeType::Vector,
        NodeType::Star,
        NodeType::Line,
        NodeType::Ellipse,
        NodeType::Polygon,
        NodeType::Rectangle,
        NodeType::Text,
        NodeType::Slice,
        NodeType::Other,
    ];

    /// Basic shapes that carry their own fills and strokes.
    pub fn is_shape(self) -> bool {
        matches!(
            self,
            NodeType::Rectangle
                | NodeType::Ellipse
                | NodeType::Polygon
                | NodeType::Star
                | NodeType::Vector
        )
    }

    /// Components and instances are locked templates: the namer never
    /// renames them or anything inside them.
    pub fn is_component_boundary(self) -> bool {
        matches!(self, NodeType::Component | NodeType::Instance)
    }

    /// Types that carry a `children` list. Unknown types may, so they count.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeType::Page
                | NodeType::Frame
                | NodeType::Group
                | NodeType::Section
                | NodeType::ComponentSet
                | NodeType::Component
                | NodeType::Instance
                | NodeType::BooleanOperation
                | NodeType::Other
        )
    }

    /// Lowercase keyword used by the outline format.
    pub fn keyword(self) -> &'static str {
        match self {
            NodeType::Page => "page",
            NodeType::Frame => "frame",
            NodeType::Group => "group",
            NodeType::Section => "section",
            NodeType::ComponentSet => "component_set",
            NodeType::Component => "component",
            NodeType::Instance => "instance",
            NodeType::BooleanOperation => "boolean_operation",
            NodeType::Vector => "vector",
            NodeType::Star => "star",
            NodeType::Line => "line",
            NodeType::Ellipse => "ellipse",
            NodeType::Polygon => "polygon",
            NodeType::Rectangle => "rectangle",
            NodeType::Text => "text",
            NodeType::Slice => "slice",
            NodeType::Other => "other",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.keyword() == keyword)
    }
}

// ─── Paint ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Video,
    Pattern,
}

impl PaintType {
    pub const ALL: [PaintType; 8] = [
        PaintType::Solid,
        PaintType::GradientLinear,
        PaintType::GradientRadial,
        PaintType::GradientAngular,
        PaintType::GradientDiamond,
        PaintType::Image,
        PaintType::Video,
        PaintType::Pattern,
    ];

    pub fn is_gradient(self) -> bool {
        matches!(
            self,
            PaintType::GradientLinear
                | PaintType::GradientRadial
                | PaintType::GradientAngular
                | PaintType::GradientDiamond
        )
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PaintType::Solid => "solid",
            PaintType::GradientLinear => "gradient_linear",
            PaintType::GradientRadial => "gradient_radial",
            PaintType::GradientAngular => "gradient_angular",
            PaintType::GradientDiamond => "gradient_diamond",
            PaintType::Image => "image",
            PaintType::Video => "video",
            PaintType::Pattern => "pattern",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.keyword() == keyword)
    }
}

/// A single fill or stroke. Only the paint type matters for naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: PaintType,
}

impl Paint {
    pub const fn new(kind: PaintType) -> Self {
        Self { kind }
    }
}

/// Spelling of the "mixed" sentinel in snapshots and outlines.
pub const MIXED: &str = "mixed";

/// A fills or strokes attribute: either a concrete ordered list, or the
/// host's "mixed" sentinel when the value is not uniformly determinable
/// (e.g. text with per-character fills).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Paints {
    Mixed,
    List(SmallVec<[Paint; 2]>),
}

impl Paints {
    pub fn empty() -> Self {
        Paints::List(SmallVec::new())
    }

    pub fn of(kinds: &[PaintType]) -> Self {
        Paints::List(kinds.iter().copied().map(Paint::new).collect())
    }

    /// The concrete list, or `None` for the mixed sentinel.
    pub fn list(&self) -> Option<&[Paint]> {
        match self {
            Paints::Mixed => None,
            Paints::List(paints) => Some(paints),
        }
    }
}

impl Serialize for Paints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Paints::Mixed => serializer.serialize_str(MIXED),
            Paints::List(paints) => paints.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Paints {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            List(SmallVec<[Paint; 2]>),
            Marker(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::List(paints) => Ok(Paints::List(paints)),
            Repr::Marker(marker) if marker == MIXED => Ok(Paints::Mixed),
            Repr::Marker(marker) => Err(serde::de::Error::custom(format!(
                "unknown paint marker `{marker}`, expected a list or `{MIXED}`"
            ))),
        }
    }
}

// ─── Auto layout ─────────────────────────────────────────────────────────

/// Auto-layout direction of a frame-like layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

impl LayoutMode {
    /// True for `Horizontal` and `Vertical`.
    pub fn is_auto(self) -> bool {
        self != LayoutMode::None
    }

    pub fn keyword(self) -> &'static str {
        match self {
            LayoutMode::None => "none",
            LayoutMode::Horizontal => "horizontal",
            LayoutMode::Vertical => "vertical",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "none" => Some(LayoutMode::None),
            "horizontal" => Some(LayoutMode::Horizontal),
            "vertical" => Some(LayoutMode::Vertical),
            _ => None,
        }
    }
}

// ─── Layers ──────────────────────────────────────────────────────────────

/// A single layer. Every optional attribute is `None` when the host layer
/// does not carry it at all, which is distinct from carrying an empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: NodeId,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<Paints>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<Paints>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mask: Option<bool>,

    /// Text content (TEXT layers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
}

impl Layer {
    pub fn new(id: NodeId, node_type: NodeType, name: impl Into<String>) -> Self {
        Self {
            id,
            node_type,
            name: name.into(),
            width: None,
            height: None,
            fills: None,
            strokes: None,
            layout_mode: None,
            is_mask: None,
            characters: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_paints(mut self, fills: Paints, strokes: Paints) -> Self {
        self.fills = Some(fills);
        self.strokes = Some(strokes);
        self
    }

    pub fn with_layout(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = Some(mode);
        self
    }

    pub fn masked(mut self) -> Self {
        self.is_mask = Some(true);
        self
    }

    pub fn with_characters(mut self, text: impl Into<String>) -> Self {
        self.characters = Some(text.into());
        self
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// A page of layers plus the host's current selection.
#[derive(Debug, Clone)]
pub struct Document {
    /// Parent → child containment edges.
    pub graph: StableDiGraph<Layer, ()>,

    /// The page layer every top-level layer hangs off.
    pub page: NodeIndex,

    /// Index from NodeId → NodeIndex for fast lookup.
    pub id_index: HashMap<NodeId, NodeIndex>,

    /// Selected layers in selection order.
    pub selection: Vec<NodeIndex>,
}

impl Document {
    /// Create an empty document with a single page.
    #[must_use]
    pub fn new() -> Self {
        Self::with_page(Layer::new(NodeId::intern("0:1"), NodeType::Page, "Page 1"))
    }

    /// Create an empty document rooted at the given page layer.
    #[must_use]
    pub fn with_page(page: Layer) -> Self {
        let mut graph = StableDiGraph::new();
        let id = page.id;
        let page = graph.add_node(page);

        let mut id_index = HashMap::new();
        id_index.insert(id, page);

        Self {
            graph,
            page,
            id_index,
            selection: Vec::new(),
        }
    }

    /// Add a layer as the last child of `parent`. Returns the new index.
    pub fn add_layer(&mut self, parent: NodeIndex, layer: Layer) -> NodeIndex {
        let id = layer.id;
        let idx = self.graph.add_node(layer);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    pub fn layer(&self, idx: NodeIndex) -> &Layer {
        &self.graph[idx]
    }

    pub fn layer_mut(&mut self, idx: NodeIndex) -> &mut Layer {
        &mut self.graph[idx]
    }

    /// Look up a layer by its id.
    pub fn get_by_id(&self, id: NodeId) -> Option<&Layer> {
        self.id_index.get(&id).map(|idx| &self.graph[*idx])
    }

    pub fn index_of(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Convenience for tests and tools: the name of the layer with `id`.
    pub fn name_of(&self, id: &str) -> Option<&str> {
        NodeId::get(id)
            .and_then(|id| self.get_by_id(id))
            .map(|layer| layer.name.as_str())
    }

    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Children in document (insertion) order.
    ///
    /// Layers are never removed, so sorting by `NodeIndex` reproduces the
    /// insertion order regardless of how `petgraph` walks its adjacency list.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    /// Layers directly under the page.
    pub fn top_level(&self) -> Vec<NodeIndex> {
        self.children(self.page)
    }

    /// Replace the selection with the layers named by `ids`.
    ///
    /// # Errors
    /// Returns the first id that does not exist in the document.
    pub fn select(&mut self, ids: &[NodeId]) -> Result<(), String> {
        let mut selection = Vec::with_capacity(ids.len());
        for id in ids {
            let idx = self
                .index_of(*id)
                .ok_or_else(|| format!("cannot select unknown layer {id}"))?;
            selection.push(idx);
        }
        self.selection = selection;
        Ok(())
    }

    /// Select every top-level layer of the page.
    pub fn select_all(&mut self) {
        self.selection = self.top_level();
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.selection.iter().map(|idx| self.graph[*idx].id).collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_basics() {
        let mut doc = Document::new();
        let frame = doc.add_layer(
            doc.page,
            Layer::new(NodeId::intern("1:1"), NodeType::Frame, "Frame 1"),
        );
        let rect = doc.add_layer(
            frame,
            Layer::new(NodeId::intern("1:2"), NodeType::Rectangle, "Rectangle 4"),
        );

        assert_eq!(doc.top_level(), vec![frame]);
        assert_eq!(doc.children(frame), vec![rect]);
        assert_eq!(doc.parent(rect), Some(frame));
        assert_eq!(doc.parent(doc.page), None);
        assert_eq!(doc.name_of("1:2"), Some("Rectangle 4"));
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut doc = Document::new();
        let group = doc.add_layer(
            doc.page,
            Layer::new(NodeId::intern("order:g"), NodeType::Group, "g"),
        );
        let ids = ["order:a", "order:b", "order:c"];
        for id in ids {
            doc.add_layer(group, Layer::new(NodeId::intern(id), NodeType::Vector, id));
        }
        let names: Vec<&str> = doc
            .children(group)
            .into_iter()
            .map(|idx| doc.layer(idx).name.as_str())
            .collect();
        assert_eq!(names, ids);
    }

    #[test]
    fn select_rejects_unknown_ids() {
        let mut doc = Document::new();
        let err = doc.select(&[NodeId::intern("missing:1")]).unwrap_err();
        assert!(err.contains("missing:1"));
        assert!(doc.selection.is_empty());
    }

    #[test]
    fn paints_json_accepts_list_and_mixed() {
        let list: Paints = serde_json::from_str(r#"[{"type":"IMAGE"},{"type":"SOLID"}]"#).unwrap();
        assert_eq!(list, Paints::of(&[PaintType::Image, PaintType::Solid]));

        let mixed: Paints = serde_json::from_str(r#""mixed""#).unwrap();
        assert_eq!(mixed, Paints::Mixed);
        assert_eq!(serde_json::to_string(&mixed).unwrap(), r#""mixed""#);

        assert!(serde_json::from_str::<Paints>(r#""figma.mixed""#).is_err());
    }

    #[test]
    fn keywords_roundtrip() {
        for t in NodeType::ALL {
            assert_eq!(NodeType::from_keyword(t.keyword()), Some(t));
        }
        for p in PaintType::ALL {
            assert_eq!(PaintType::from_keyword(p.keyword()), Some(p));
        }
    }
}
