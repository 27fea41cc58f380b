//! Core data types for design documents.
//!
//! A [`Document`] owns a tree of [`Node`]s. Each node's [`NodeKind`] decides which
//! capability groups it carries: frame-like containers are paddable, spacable
//! and have children; groups only have children; text nodes carry font size,
//! line height and styled font ranges; shapes carry nothing the rescaler
//! touches. Property names serialize in the host's camelCase spelling.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for document nodes.
pub type NodeId = Uuid;

/// The six numeric properties remapped through the spacing lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalableProperty {
    /// Left padding of a container
    PaddingLeft,
    /// Right padding of a container
    PaddingRight,
    /// Top padding of a container
    PaddingTop,
    /// Bottom padding of a container
    PaddingBottom,
    /// Gap between auto-layout children
    ItemSpacing,
    /// Layout grid value
    GridStyleId,
}

impl ScalableProperty {
    /// Every scalable property, padding first.
    pub const ALL: [ScalableProperty; 6] = [
        ScalableProperty::PaddingLeft,
        ScalableProperty::PaddingRight,
        ScalableProperty::PaddingTop,
        ScalableProperty::PaddingBottom,
        ScalableProperty::ItemSpacing,
        ScalableProperty::GridStyleId,
    ];

    /// Host-side property name.
    pub fn name(self) -> &'static str {
        match self {
            ScalableProperty::PaddingLeft => "paddingLeft",
            ScalableProperty::PaddingRight => "paddingRight",
            ScalableProperty::PaddingTop => "paddingTop",
            ScalableProperty::PaddingBottom => "paddingBottom",
            ScalableProperty::ItemSpacing => "itemSpacing",
            ScalableProperty::GridStyleId => "gridStyleId",
        }
    }
}

/// Paddable capability: the four padding sides, each optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Padding {
    /// Left padding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    /// Right padding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    /// Top padding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    /// Bottom padding
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
}

impl Padding {
    /// Padding with every side set.
    pub fn uniform(value: f64) -> Self {
        Self::sides(value, value, value, value)
    }

    /// Padding with explicit left, right, top and bottom values.
    pub fn sides(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            padding_left: Some(left),
            padding_right: Some(right),
            padding_top: Some(top),
            padding_bottom: Some(bottom),
        }
    }

    fn slot(&self, property: ScalableProperty) -> Option<f64> {
        match property {
            ScalableProperty::PaddingLeft => self.padding_left,
            ScalableProperty::PaddingRight => self.padding_right,
            ScalableProperty::PaddingTop => self.padding_top,
            ScalableProperty::PaddingBottom => self.padding_bottom,
            _ => None,
        }
    }

    fn slot_mut(&mut self, property: ScalableProperty) -> Option<&mut f64> {
        match property {
            ScalableProperty::PaddingLeft => self.padding_left.as_mut(),
            ScalableProperty::PaddingRight => self.padding_right.as_mut(),
            ScalableProperty::PaddingTop => self.padding_top.as_mut(),
            ScalableProperty::PaddingBottom => self.padding_bottom.as_mut(),
            _ => None,
        }
    }
}

/// Spacable capability: item spacing and grid value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    /// Gap between auto-layout children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_spacing: Option<f64>,
    /// Layout grid value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_style_id: Option<f64>,
}

impl Spacing {
    fn slot(&self, property: ScalableProperty) -> Option<f64> {
        match property {
            ScalableProperty::ItemSpacing => self.item_spacing,
            ScalableProperty::GridStyleId => self.grid_style_id,
            _ => None,
        }
    }

    fn slot_mut(&mut self, property: ScalableProperty) -> Option<&mut f64> {
        match property {
            ScalableProperty::ItemSpacing => self.item_spacing.as_mut(),
            ScalableProperty::GridStyleId => self.grid_style_id.as_mut(),
            _ => None,
        }
    }
}

/// Frame-like container: paddable, spacable, and a parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Padding sides
    #[serde(flatten)]
    pub padding: Padding,
    /// Item spacing and grid
    #[serde(flatten)]
    pub spacing: Spacing,
    /// Ordered child nodes
    #[serde(default)]
    pub children: Vec<Node>,
}

impl Container {
    /// Creates an empty container with no layout properties.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the padding sides.
    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the item spacing.
    pub fn with_item_spacing(mut self, value: f64) -> Self {
        self.spacing.item_spacing = Some(value);
        self
    }

    /// Sets the grid value.
    pub fn with_grid(mut self, value: f64) -> Self {
        self.spacing.grid_style_id = Some(value);
        self
    }

    /// Appends a child node.
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

/// Plain grouping of nodes without layout properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Ordered child nodes
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A font identifier as the host names it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontName {
    /// Font family, e.g. "Inter"
    pub family: String,
    /// Style within the family, e.g. "Semi Bold Italic"
    pub style: String,
}

impl FontName {
    /// Creates a font name from family and style.
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl Default for FontName {
    fn default() -> Self {
        Self::new("Inter", "Regular")
    }
}

impl std::fmt::Display for FontName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// A half-open character range `[start, end)` rendered with one font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleRange {
    /// First character index
    pub start: usize,
    /// One past the last character index
    pub end: usize,
    /// Font used for the range
    pub font_name: FontName,
}

/// Line height of a text node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineHeight {
    /// Absolute height in pixels
    Pixels {
        /// Height in pixels
        value: f64,
    },
    /// Height relative to the font size
    Percent {
        /// Percentage of the font size
        value: f64,
    },
    /// Height chosen by the font metrics
    #[default]
    Auto,
}

/// Text capability: content, size, line height and fonts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    /// Text content
    #[serde(default)]
    pub characters: String,
    /// Font size in pixels
    pub font_size: f64,
    /// Line height
    #[serde(default)]
    pub line_height: LineHeight,
    /// Font for characters no style range covers
    #[serde(default)]
    pub font_name: FontName,
    /// Per-range font overrides
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<StyleRange>,
}

impl TextNode {
    /// Creates a single-font text node.
    pub fn new(characters: impl Into<String>, font_size: f64, line_height: LineHeight) -> Self {
        Self {
            characters: characters.into(),
            font_size,
            line_height,
            font_name: FontName::default(),
            styles: Vec::new(),
        }
    }

    /// Sets the base font.
    pub fn with_font(mut self, font_name: FontName) -> Self {
        self.font_name = font_name;
        self
    }

    /// Adds a font override for `[start, end)`.
    pub fn with_style(mut self, start: usize, end: usize, font_name: FontName) -> Self {
        self.styles.push(StyleRange {
            start,
            end,
            font_name,
        });
        self
    }

    /// Number of characters in the content.
    pub fn len(&self) -> usize {
        self.characters.chars().count()
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Distinct fonts used anywhere in `[start, end)`, in order of first use.
    pub fn fonts_in_range(&self, start: usize, end: usize) -> Vec<FontName> {
        let mut spans: Vec<&StyleRange> = self
            .styles
            .iter()
            .filter(|range| range.start < range.end && range.start < end && range.end > start)
            .collect();
        spans.sort_by_key(|range| range.start);

        let mut fonts: Vec<FontName> = Vec::new();
        let mut push = |font: &FontName| {
            if !fonts.contains(font) {
                fonts.push(font.clone());
            }
        };

        // Gaps between overrides fall back to the base font
        let mut cursor = start;
        for span in spans {
            if span.start > cursor {
                push(&self.font_name);
            }
            push(&span.font_name);
            cursor = cursor.max(span.end);
        }
        if cursor < end {
            push(&self.font_name);
        }
        fonts
    }

    /// Every font that must be loaded before this node's size can change.
    ///
    /// Empty text still needs its base font.
    pub fn fonts(&self) -> Vec<FontName> {
        if self.is_empty() {
            return vec![self.font_name.clone()];
        }
        self.fonts_in_range(0, self.len())
    }
}

/// Defines the different kinds of nodes and the capabilities they carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// A frame
    Frame(Container),
    /// A reusable component definition
    Component(Container),
    /// A placed component instance
    Instance(Container),
    /// A plain group
    Group(Group),
    /// A text layer
    Text(TextNode),
    /// Any leaf shape (rectangle, vector, ellipse...)
    Shape,
}

/// Represents a single node in the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier for this node
    #[serde(default = "Uuid::new_v4")]
    pub id: NodeId,
    /// User-displayable name of the node
    #[serde(default)]
    pub name: String,
    /// The kind and capabilities of this node
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    /// Creates a new node with a fresh ID.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a frame node.
    pub fn frame(name: impl Into<String>, container: Container) -> Self {
        Self::new(name, NodeKind::Frame(container))
    }

    /// Shorthand for a text node.
    pub fn text(name: impl Into<String>, text: TextNode) -> Self {
        Self::new(name, NodeKind::Text(text))
    }

    /// Whether this node can be the root of a rescale.
    pub fn is_frame_like(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Frame(_) | NodeKind::Component(_) | NodeKind::Instance(_)
        )
    }

    fn container(&self) -> Option<&Container> {
        match &self.kind {
            NodeKind::Frame(c) | NodeKind::Component(c) | NodeKind::Instance(c) => Some(c),
            _ => None,
        }
    }

    fn container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            NodeKind::Frame(c) | NodeKind::Component(c) | NodeKind::Instance(c) => Some(c),
            _ => None,
        }
    }

    /// Paddable capability, if present.
    pub fn padding(&self) -> Option<&Padding> {
        self.container().map(|c| &c.padding)
    }

    /// Spacable capability, if present.
    pub fn spacing(&self) -> Option<&Spacing> {
        self.container().map(|c| &c.spacing)
    }

    /// Text capability, if present.
    pub fn as_text(&self) -> Option<&TextNode> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Mutable text capability, if present.
    pub fn as_text_mut(&mut self) -> Option<&mut TextNode> {
        match &mut self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Frame(c) | NodeKind::Component(c) | NodeKind::Instance(c) => &c.children,
            NodeKind::Group(g) => &g.children,
            NodeKind::Text(_) | NodeKind::Shape => &[],
        }
    }

    /// Mutable child nodes; empty for leaves.
    pub fn children_mut(&mut self) -> &mut [Node] {
        match &mut self.kind {
            NodeKind::Frame(c) | NodeKind::Component(c) | NodeKind::Instance(c) => {
                &mut c.children
            }
            NodeKind::Group(g) => &mut g.children,
            NodeKind::Text(_) | NodeKind::Shape => Default::default(),
        }
    }

    /// Reads a scalable property, `None` when this node doesn't carry it.
    pub fn scalable(&self, property: ScalableProperty) -> Option<f64> {
        let container = self.container()?;
        container
            .padding
            .slot(property)
            .or_else(|| container.spacing.slot(property))
    }

    /// Mutable slot for a scalable property, `None` when absent.
    pub fn scalable_mut(&mut self, property: ScalableProperty) -> Option<&mut f64> {
        let container = self.container_mut()?;
        match property {
            ScalableProperty::ItemSpacing | ScalableProperty::GridStyleId => {
                container.spacing.slot_mut(property)
            }
            _ => container.padding.slot_mut(property),
        }
    }

    /// Every scalable property present on this node with its value.
    pub fn scalable_values(&self) -> impl Iterator<Item = (ScalableProperty, f64)> + '_ {
        ScalableProperty::ALL
            .into_iter()
            .filter_map(move |property| self.scalable(property).map(|value| (property, value)))
    }

    /// Finds a node by ID in this subtree, including this node.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    /// Mutable variant of [`Node::find`].
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children_mut()
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }
}

/// A design document: top-level nodes plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document title
    #[serde(default)]
    pub name: String,
    /// Top-level nodes of the page
    #[serde(default)]
    pub children: Vec<Node>,
    /// Selected node IDs, in selection order
    #[serde(default)]
    pub selection: Vec<NodeId>,
}

impl Document {
    /// Creates an empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Serialize the document to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a document from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Adds a top-level node and returns its ID.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.children.push(node);
        id
    }

    /// Replaces the selection with a single node.
    pub fn select(&mut self, id: NodeId) {
        self.selection = vec![id];
    }

    /// Finds a node anywhere in the document.
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        self.children.iter().find_map(|node| node.find(id))
    }

    /// Mutable variant of [`Document::find`].
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.children.iter_mut().find_map(|node| node.find_mut(id))
    }

    /// The first selected node, provided it is frame-like.
    pub fn selected_frame_mut(&mut self) -> Option<&mut Node> {
        let id = *self.selection.first()?;
        self.find_mut(id).filter(|node| node.is_frame_like())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inter(style: &str) -> FontName {
        FontName::new("Inter", style)
    }

    #[test]
    fn test_node_creation() {
        let node = Node::frame("Card", Container::new());
        assert_eq!(node.name, "Card");
        assert!(node.is_frame_like());
        assert!(!node.id.is_nil());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_capabilities_by_kind() {
        let group = Node::new("Group", NodeKind::Group(Group::default()));
        assert!(group.padding().is_none());
        assert!(group.spacing().is_none());
        assert!(!group.is_frame_like());

        let text = Node::text("Label", TextNode::new("Hi", 12.0, LineHeight::Auto));
        assert!(text.as_text().is_some());
        assert!(text.padding().is_none());

        let shape = Node::new("Rect", NodeKind::Shape);
        assert_eq!(shape.scalable_values().count(), 0);
    }

    #[test]
    fn test_scalable_values_skip_absent_properties() {
        let node = Node::frame(
            "Row",
            Container {
                padding: Padding {
                    padding_left: Some(20.0),
                    ..Padding::default()
                },
                spacing: Spacing {
                    item_spacing: Some(8.0),
                    grid_style_id: None,
                },
                children: Vec::new(),
            },
        );

        let values: Vec<_> = node.scalable_values().collect();
        assert_eq!(
            values,
            vec![
                (ScalableProperty::PaddingLeft, 20.0),
                (ScalableProperty::ItemSpacing, 8.0),
            ]
        );
    }

    #[test]
    fn test_scalable_mut_writes_through() {
        let mut node = Node::frame("Box", Container::new().with_padding(Padding::uniform(32.0)));
        *node.scalable_mut(ScalableProperty::PaddingTop).unwrap() = 24.0;
        assert_eq!(node.scalable(ScalableProperty::PaddingTop), Some(24.0));
        assert!(node.scalable_mut(ScalableProperty::GridStyleId).is_none());
    }

    #[test]
    fn test_find_mut_reaches_nested_nodes() {
        let leaf = Node::text("Leaf", TextNode::new("x", 10.0, LineHeight::Auto));
        let leaf_id = leaf.id;
        let inner = Node::new("Inner", NodeKind::Group(Group { children: vec![leaf] }));
        let mut root = Node::frame("Root", Container::new().with_child(inner));

        let found = root.find_mut(leaf_id).unwrap();
        found.name = "Renamed".into();
        assert_eq!(root.find(leaf_id).unwrap().name, "Renamed");
    }

    #[test]
    fn test_selected_frame_requires_frame_like_node() {
        let mut doc = Document::new("Doc");
        let text_id = doc.add_node(Node::text("T", TextNode::new("a", 12.0, LineHeight::Auto)));
        let frame_id = doc.add_node(Node::frame("F", Container::new()));

        assert!(doc.selected_frame_mut().is_none());

        doc.select(text_id);
        assert!(doc.selected_frame_mut().is_none());

        doc.select(frame_id);
        assert_eq!(doc.selected_frame_mut().unwrap().id, frame_id);
    }

    #[test]
    fn test_fonts_in_range_includes_base_font_gaps() {
        let text = TextNode::new("Hello world", 16.0, LineHeight::Auto)
            .with_font(inter("Regular"))
            .with_style(0, 5, inter("Bold"));
        assert_eq!(text.fonts(), vec![inter("Bold"), inter("Regular")]);
    }

    #[test]
    fn test_fonts_in_range_fully_covered_skips_base_font() {
        let text = TextNode::new("abcd", 16.0, LineHeight::Auto)
            .with_font(inter("Regular"))
            .with_style(2, 4, inter("Italic"))
            .with_style(0, 2, inter("Bold"));
        assert_eq!(text.fonts(), vec![inter("Bold"), inter("Italic")]);
    }

    #[test]
    fn test_fonts_deduplicated() {
        let text = TextNode::new("abcdef", 16.0, LineHeight::Auto)
            .with_style(0, 2, inter("Bold"))
            .with_style(4, 6, inter("Bold"));
        assert_eq!(text.fonts(), vec![inter("Bold"), inter("Regular")]);
    }

    #[test]
    fn test_empty_text_needs_base_font() {
        let text = TextNode::new("", 16.0, LineHeight::Auto).with_font(inter("Medium"));
        assert_eq!(text.fonts(), vec![inter("Medium")]);
    }

    #[test]
    fn test_document_deserializes_host_property_names() {
        let value = json!({
            "name": "Landing",
            "children": [{
                "id": "5f0c6b5e-8a53-4f6e-9a53-0d2f8d7f1c11",
                "type": "FRAME",
                "name": "Hero",
                "paddingLeft": 24,
                "itemSpacing": 32,
                "children": [{
                    "type": "TEXT",
                    "name": "Title",
                    "characters": "Welcome",
                    "fontSize": 40,
                    "lineHeight": {"unit": "PIXELS", "value": 48},
                    "fontName": {"family": "Inter", "style": "Bold"}
                }, {
                    "type": "SHAPE",
                    "name": "Divider"
                }]
            }],
            "selection": ["5f0c6b5e-8a53-4f6e-9a53-0d2f8d7f1c11"]
        });

        let mut doc = Document::from_json(&value.to_string()).unwrap();
        let hero = doc.selected_frame_mut().unwrap();
        assert_eq!(hero.name, "Hero");
        assert_eq!(hero.scalable(ScalableProperty::PaddingLeft), Some(24.0));
        assert_eq!(hero.scalable(ScalableProperty::PaddingRight), None);
        assert_eq!(hero.scalable(ScalableProperty::ItemSpacing), Some(32.0));

        let title = hero.children()[0].as_text().unwrap();
        assert_eq!(title.font_size, 40.0);
        assert_eq!(title.line_height, LineHeight::Pixels { value: 48.0 });
        assert_eq!(title.font_name, inter("Bold"));
        assert!(matches!(hero.children()[1].kind, NodeKind::Shape));
    }

    #[test]
    fn test_document_serialization_keeps_absent_properties_absent() {
        let mut doc = Document::new("Doc");
        doc.add_node(Node::frame(
            "Frame",
            Container::new().with_item_spacing(12.0),
        ));

        let json = doc.to_json().unwrap();
        assert!(json.contains("\"itemSpacing\": 12.0"));
        assert!(json.contains("\"type\": \"FRAME\""));
        assert!(!json.contains("paddingLeft"));

        let restored = Document::from_json(&json).unwrap();
        assert_eq!(restored, doc);
    }
}
