//! Rich text component trees.
//!
//! A [`TextComponent`] stores its nodes in a flat arena. Children are referenced by
//! [`NodeId`] and always live at a higher index than their parent, so every traversal,
//! comparison and drop is iterative regardless of tree depth.

use super::style::{Decoration, ResolvedStyle, Style, TextColor};
use crate::key::ResourceKey;

/// Index of a node inside a [`TextComponent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node: its own content, its own (unresolved) style and its ordered children.
#[derive(Debug, Clone, Default)]
pub struct TextNode {
    content: String,
    style: Style,
    children: Vec<NodeId>,
}

impl TextNode {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A styled text tree.
#[derive(Debug, Clone)]
pub struct TextComponent {
    nodes: Vec<TextNode>,
}

impl Default for TextComponent {
    fn default() -> Self {
        Self::empty()
    }
}

impl TextComponent {
    /// A component with empty content and no style.
    pub fn empty() -> Self {
        Self::text("")
    }

    /// A single unstyled text node.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            nodes: vec![TextNode {
                content: content.into(),
                ..TextNode::default()
            }],
        }
    }

    /// An arena with no nodes; the first `push_node` call creates the root.
    pub(crate) fn unrooted() -> Self {
        Self { nodes: Vec::new() }
    }

    pub(crate) fn push_node(&mut self, parent: Option<NodeId>, content: String, style: Style) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(TextNode {
            content,
            style,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &TextNode {
        &self.nodes[id.0]
    }

    /// Every node id in arena order (parents before children).
    pub fn node_ids(&self) -> impl DoubleEndedIterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Number of nodes in the tree, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Root content.
    pub fn content(&self) -> &str {
        &self.nodes[0].content
    }

    /// Root style.
    pub fn style(&self) -> &Style {
        &self.nodes[0].style
    }

    pub fn set_style(&mut self, id: NodeId, style: Style) {
        self.nodes[id.0].style = style;
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.nodes[0].style = style;
        self
    }

    pub fn color(mut self, color: impl Into<TextColor>) -> Self {
        self.nodes[0].style.color = Some(color.into());
        self
    }

    pub fn decorate(mut self, decoration: Decoration, value: bool) -> Self {
        self.nodes[0].style.set_decoration(decoration, Some(value));
        self
    }

    pub fn bold(self, value: bool) -> Self {
        self.decorate(Decoration::Bold, value)
    }

    pub fn italic(self, value: bool) -> Self {
        self.decorate(Decoration::Italic, value)
    }

    pub fn underlined(self, value: bool) -> Self {
        self.decorate(Decoration::Underlined, value)
    }

    pub fn strikethrough(self, value: bool) -> Self {
        self.decorate(Decoration::Strikethrough, value)
    }

    pub fn obfuscated(self, value: bool) -> Self {
        self.decorate(Decoration::Obfuscated, value)
    }

    pub fn font(mut self, font: ResourceKey) -> Self {
        self.nodes[0].style.font = Some(font);
        self
    }

    /// Append `child` as the last child of the root.
    pub fn append(mut self, child: TextComponent) -> Self {
        let root = self.root();
        self.graft(root, child);
        self
    }

    /// Add a single node under `parent` and return its id.
    pub fn push_child(&mut self, parent: NodeId, content: impl Into<String>, style: Style) -> NodeId {
        self.push_node(Some(parent), content.into(), style)
    }

    /// Move every node of `child` into this arena under `parent`. Returns the new id of
    /// `child`'s root.
    pub fn graft(&mut self, parent: NodeId, child: TextComponent) -> NodeId {
        let offset = self.nodes.len();
        self.nodes.extend(child.nodes.into_iter().map(|mut node| {
            for id in &mut node.children {
                id.0 += offset;
            }
            node
        }));
        let grafted = NodeId(offset);
        self.nodes[parent.0].children.push(grafted);
        grafted
    }

    /// Nodes in depth-first pre-order, children in sequence order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            component: self,
            stack: vec![self.root()],
        }
    }

    /// Resolved style of every node, indexed by [`NodeId::index`].
    ///
    /// Computed top-down in one pass: parents precede children in the arena.
    pub fn resolved_styles(&self) -> Vec<ResolvedStyle> {
        let mut resolved: Vec<ResolvedStyle> = vec![ResolvedStyle::default(); self.nodes.len()];
        if let Some(root) = self.nodes.first() {
            resolved[0] = root.style.resolve(&ResolvedStyle::default());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            for child in &node.children {
                let style = self.nodes[child.0].style.resolve(&resolved[index]);
                resolved[child.0] = style;
            }
        }
        resolved
    }

    /// Concatenated content with all styling dropped.
    pub fn plain_text(&self) -> String {
        self.preorder().map(|(_, node)| node.content.as_str()).collect()
    }

    /// Content runs with their resolved style, adjacent equal styles merged and empty
    /// content skipped. Two trees with equal runs render identically.
    pub fn flatten(&self) -> Vec<(String, ResolvedStyle)> {
        let resolved = self.resolved_styles();
        let mut runs: Vec<(String, ResolvedStyle)> = Vec::new();
        for (id, node) in self.preorder() {
            if node.content.is_empty() {
                continue;
            }
            let style = &resolved[id.0];
            match runs.last_mut() {
                Some((text, last)) if last == style => text.push_str(&node.content),
                _ => runs.push((node.content.clone(), style.clone())),
            }
        }
        runs
    }

    /// Whether both trees render the same text with the same resolved styles.
    pub fn style_equivalent(&self, other: &TextComponent) -> bool {
        self.flatten() == other.flatten()
    }
}

impl PartialEq for TextComponent {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self.root(), other.root())];
        while let Some((a, b)) = pending.pop() {
            let (left, right) = (self.node(a), other.node(b));
            if left.content != right.content
                || left.style != right.style
                || left.children.len() != right.children.len()
            {
                return false;
            }
            pending.extend(left.children.iter().copied().zip(right.children.iter().copied()));
        }
        true
    }
}

impl Eq for TextComponent {}

impl From<&str> for TextComponent {
    fn from(content: &str) -> Self {
        Self::text(content)
    }
}

impl From<String> for TextComponent {
    fn from(content: String) -> Self {
        Self::text(content)
    }
}

/// Pre-order iterator over `(NodeId, &TextNode)`.
pub struct Preorder<'a> {
    component: &'a TextComponent,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = (NodeId, &'a TextNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.component.node(id);
        self.stack.extend(node.children.iter().rev().copied());
        Some((id, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::style::NamedColor;

    #[test]
    fn test_builder_and_plain_text() {
        let component = TextComponent::text("Hello, ")
            .color(NamedColor::Gold)
            .append(TextComponent::text("world").bold(true))
            .append(TextComponent::text("!"));

        assert_eq!(component.node_count(), 3);
        assert_eq!(component.plain_text(), "Hello, world!");
        assert_eq!(component.node(component.root()).children().len(), 2);
    }

    #[test]
    fn test_preorder_follows_sequence() {
        let component = TextComponent::text("a")
            .append(TextComponent::text("b").append(TextComponent::text("c")))
            .append(TextComponent::text("d"));
        let order: String = component.preorder().map(|(_, n)| n.content()).collect();
        assert_eq!(order, "abcd");
    }

    #[test]
    fn test_resolved_styles_inherit() {
        let component = TextComponent::text("parent")
            .color(NamedColor::Red)
            .append(TextComponent::text("child").italic(true));
        let resolved = component.resolved_styles();
        assert_eq!(resolved[1].color, Some(TextColor::Named(NamedColor::Red)));
        assert!(resolved[1].decoration(Decoration::Italic));
        assert!(!resolved[0].decoration(Decoration::Italic));
    }

    #[test]
    fn test_equality_is_structural() {
        let a = TextComponent::text("x").append(TextComponent::text("y"));
        let mut b = TextComponent::text("x");
        let root = b.root();
        b.push_child(root, "y", Style::new());
        assert_eq!(a, b);

        let c = TextComponent::text("x").append(TextComponent::text("y").bold(true));
        assert_ne!(a, c);
    }

    #[test]
    fn test_style_equivalence_ignores_nesting() {
        let nested = TextComponent::text("ab")
            .color(NamedColor::Red)
            .append(TextComponent::text("cd"));
        let flat = TextComponent::empty()
            .append(TextComponent::text("abcd").color(NamedColor::Red));
        assert_ne!(nested, flat);
        assert!(nested.style_equivalent(&flat));
    }

    #[test]
    fn test_deep_tree_is_iterative() {
        let mut component = TextComponent::text("0");
        let mut parent = component.root();
        for i in 1..200_000 {
            parent = component.push_child(parent, if i % 1000 == 0 { "x" } else { "" }, Style::new());
        }
        assert_eq!(component.node_count(), 200_000);
        assert_eq!(component.plain_text().len(), 1 + 199);
        let copy = component.clone();
        assert_eq!(copy, component);
        drop(copy);
    }
}
