//! Schema tree definitions.
//!
//! Nodes live in an arena owned by [`SchemaTree`] and refer to their children
//! by [`NodeId`]. A node may be the child of several parents, so subtrees can
//! be shared without being copied.

use crate::types::is_primitive_name;
use std::fmt;

/// Index of a node inside a [`SchemaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Returns the arena index of the node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An attribute of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Raw schema name.
    pub name: String,
    /// Primitive name or another node's name.
    pub type_name: String,
}

impl Attribute {
    /// Creates a new attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// Reference from a parent to one of its child elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildRef {
    /// The child node.
    pub node: NodeId,
    /// Whether the element repeats.
    pub list: bool,
}

/// One element definition of the schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaNode {
    /// Raw schema name.
    pub name: String,
    /// Primitive name or another node's name.
    pub type_name: String,
    /// Attributes, in document order.
    pub attribs: Vec<Attribute>,
    /// Child elements, in document order.
    pub children: Vec<ChildRef>,
    /// Whether the element carries character data.
    pub cdata: bool,
}

impl SchemaNode {
    /// Creates a node without attributes or children.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.attribs.push(Attribute::new(name, type_name));
        self
    }

    /// Sets the character data flag.
    #[must_use]
    pub fn with_cdata(mut self, cdata: bool) -> Self {
        self.cdata = cdata;
        self
    }

    /// Returns true if the node is inlined as a scalar field.
    ///
    /// Character data nodes are never primitive.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        !self.cdata && is_primitive_name(&self.type_name)
    }

    /// Returns the raw name used as the field type when the node is a child.
    ///
    /// A character data element points at its own declaration even when its
    /// type is primitive.
    #[must_use]
    pub fn field_type(&self) -> &str {
        if self.cdata {
            &self.name
        } else {
            &self.type_name
        }
    }
}

/// Arena of schema nodes plus the ordered list of roots.
#[derive(Debug, Clone, Default)]
pub struct SchemaTree {
    nodes: Vec<SchemaNode>,
    roots: Vec<NodeId>,
}

impl SchemaTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the arena and returns its id.
    pub fn add_node(&mut self, node: SchemaNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Adds a node and registers it as a root.
    pub fn add_root(&mut self, node: SchemaNode) -> NodeId {
        let id = self.add_node(node);
        self.roots.push(id);
        id
    }

    /// Registers an existing node as a root.
    pub fn push_root(&mut self, id: NodeId) {
        self.roots.push(id);
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// Returns false if `parent` is not part of this tree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId, list: bool) -> bool {
        match self.nodes.get_mut(parent.0) {
            Some(node) => {
                node.children.push(ChildRef { node: child, list });
                true
            }
            None => false,
        }
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id.0)
    }

    /// Looks up a node mutably.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SchemaNode> {
        self.nodes.get_mut(id.0)
    }

    /// Returns the roots in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SchemaNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}
