//! Struct declaration rendering.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::go::names::{normalize, normalize_title};
use xsdgo_schema::{Attribute, SchemaNode, SchemaTree};

/// One field of a generated struct.
#[derive(Debug, Clone, Copy)]
pub enum Field<'a> {
    /// Attribute of the element, serialized as `xml:"name,attr"`.
    Attribute(&'a Attribute),
    /// Child element, serialized as `xml:"name"`.
    Element {
        /// The child node.
        node: &'a SchemaNode,
        /// Whether the child repeats.
        list: bool,
    },
    /// Character data of the element itself, serialized as `xml:",chardata"`.
    CharData(&'a SchemaNode),
}

impl Field<'_> {
    /// Renders the field as one line of a struct body.
    ///
    /// # Errors
    /// Returns `CodegenError::Render` if a name cannot be turned into an
    /// identifier or embedded in a struct tag.
    pub fn render(&self, config: &GeneratorConfig) -> Result<String, CodegenError> {
        match self {
            Self::Attribute(attr) => {
                let name = field_name(&attr.name)?;
                let tag = tag_name(&attr.name)?;
                Ok(format!(
                    "\t{} {} `xml:\"{},attr\"`\n",
                    name,
                    config.type_name(&attr.type_name),
                    tag
                ))
            }
            Self::Element { node, list } => {
                let name = field_name(&node.name)?;
                let tag = tag_name(&node.name)?;
                let marker = if *list { "[]" } else { "" };
                Ok(format!(
                    "\t{} {}{} `xml:\"{}\"`\n",
                    name,
                    marker,
                    config.type_name(node.field_type()),
                    tag
                ))
            }
            Self::CharData(node) => {
                let name = field_name(&node.name)?;
                Ok(format!(
                    "\t{} {} `xml:\",chardata\"`\n",
                    name,
                    normalize(&node.type_name)
                ))
            }
        }
    }
}

/// Renders schema nodes as Go struct declarations.
pub struct RecordRenderer<'a> {
    tree: &'a SchemaTree,
    config: &'a GeneratorConfig,
}

impl<'a> RecordRenderer<'a> {
    /// Creates a new renderer.
    #[must_use]
    pub fn new(tree: &'a SchemaTree, config: &'a GeneratorConfig) -> Self {
        Self { tree, config }
    }

    /// Lists the fields of a node: attributes, then children, then character data.
    ///
    /// # Errors
    /// Returns `CodegenError::UnknownNode` if a child is missing from the tree.
    pub fn fields(&self, node: &'a SchemaNode) -> Result<Vec<Field<'a>>, CodegenError> {
        let mut fields = Vec::with_capacity(node.attribs.len() + node.children.len() + 1);

        fields.extend(node.attribs.iter().map(Field::Attribute));
        for child in &node.children {
            let child_node = self
                .tree
                .get(child.node)
                .ok_or(CodegenError::UnknownNode { id: child.node })?;
            fields.push(Field::Element {
                node: child_node,
                list: child.list,
            });
        }
        if node.cdata {
            fields.push(Field::CharData(node));
        }

        Ok(fields)
    }

    /// Renders the struct declaration for a node.
    ///
    /// # Errors
    /// Returns `CodegenError` if the node or one of its fields cannot be rendered.
    pub fn render(&self, node: &'a SchemaNode) -> Result<String, CodegenError> {
        let type_name = self.config.type_name(&node.name);
        if type_name.is_empty() {
            return Err(CodegenError::render(
                &node.name,
                "name normalizes to an empty type name",
            ));
        }

        let mut output = String::new();
        output.push_str(&format!(
            "// {} is generated from an XSD element\n",
            type_name
        ));
        output.push_str(&format!("type {} struct {{\n", type_name));

        for field in self.fields(node)? {
            output.push_str(&field.render(self.config)?);
        }

        output.push_str("}\n\n");
        Ok(output)
    }
}

fn field_name(raw: &str) -> Result<String, CodegenError> {
    let name = normalize_title(raw);
    if name.is_empty() {
        return Err(CodegenError::render(
            raw,
            "name normalizes to an empty field name",
        ));
    }
    Ok(name)
}

/// Struct tags are raw string literals holding a quoted name.
fn tag_name(raw: &str) -> Result<&str, CodegenError> {
    if raw.contains(['`', '"']) {
        return Err(CodegenError::render(
            raw,
            "name cannot be embedded in a struct tag",
        ));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_tree() -> (SchemaTree, xsdgo_schema::NodeId) {
        let mut tree = SchemaTree::new();
        let order = tree.add_root(SchemaNode::new("Order", "Order").with_attribute("id", "int"));
        let item = tree.add_node(SchemaNode::new("line-item", "LineItem"));
        let note = tree.add_node(SchemaNode::new("note", "string"));
        tree.add_child(order, item, true);
        tree.add_child(order, note, false);
        (tree, order)
    }

    #[test]
    fn test_render_order() {
        let (tree, order) = order_tree();
        let config = GeneratorConfig::new();
        let renderer = RecordRenderer::new(&tree, &config);
        let node = tree.get(order).expect("node missing");

        let output = renderer.render(node).expect("render failed");
        assert_eq!(
            output,
            "// Order is generated from an XSD element\n\
             type Order struct {\n\
             \tID int `xml:\"id,attr\"`\n\
             \tLineItem []LineItem `xml:\"line-item\"`\n\
             \tNote string `xml:\"note\"`\n\
             }\n\n"
        );
    }

    #[test]
    fn test_render_cdata_field_last() {
        let mut tree = SchemaTree::new();
        let title = tree.add_root(
            SchemaNode::new("title", "string")
                .with_attribute("lang", "string")
                .with_cdata(true),
        );
        let config = GeneratorConfig::new().exported(true);
        let renderer = RecordRenderer::new(&tree, &config);
        let node = tree.get(title).expect("node missing");

        let output = renderer.render(node).expect("render failed");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "type Title struct {");
        assert_eq!(lines[2], "\tLang string `xml:\"lang,attr\"`");
        assert_eq!(lines[3], "\tTitle string `xml:\",chardata\"`");
        assert_eq!(lines[4], "}");
    }

    #[test]
    fn test_cdata_child_points_at_own_declaration() {
        let mut tree = SchemaTree::new();
        let book = tree.add_root(SchemaNode::new("book", "book"));
        let title = tree.add_node(SchemaNode::new("title", "string").with_cdata(true));
        tree.add_child(book, title, false);

        let config = GeneratorConfig::new().exported(true);
        let renderer = RecordRenderer::new(&tree, &config);
        let output = renderer
            .render(tree.get(book).expect("node missing"))
            .expect("render failed");

        assert!(output.contains("\tTitle Title `xml:\"title\"`\n"));
    }

    #[test]
    fn test_list_and_singular_fields() {
        let mut tree = SchemaTree::new();
        let parent = tree.add_root(SchemaNode::new("Basket", "Basket"));
        let item = tree.add_node(SchemaNode::new("item", "Item"));
        tree.add_child(parent, item, true);
        tree.add_child(parent, item, false);

        let config = GeneratorConfig::new();
        let renderer = RecordRenderer::new(&tree, &config);
        let output = renderer
            .render(tree.get(parent).expect("node missing"))
            .expect("render failed");

        assert!(output.contains("\tItem []Item `xml:\"item\"`\n"));
        assert!(output.contains("\tItem Item `xml:\"item\"`\n"));
    }

    #[test]
    fn test_prefix_applies_to_types_not_fields() {
        let (tree, order) = order_tree();
        let config = GeneratorConfig::new().prefix("x");
        let renderer = RecordRenderer::new(&tree, &config);
        let output = renderer
            .render(tree.get(order).expect("node missing"))
            .expect("render failed");

        assert!(output.contains("type xOrder struct {"));
        assert!(output.contains("\tLineItem []xLineItem `xml:\"line-item\"`\n"));
        assert!(output.contains("\tID int `xml:\"id,attr\"`\n"));
    }

    #[test]
    fn test_fields_order() {
        let mut tree = SchemaTree::new();
        let node_id = tree.add_root(
            SchemaNode::new("n", "n")
                .with_attribute("a", "string")
                .with_cdata(true),
        );
        let child = tree.add_node(SchemaNode::new("c", "C"));
        tree.add_child(node_id, child, false);

        let config = GeneratorConfig::new();
        let renderer = RecordRenderer::new(&tree, &config);
        let node = tree.get(node_id).expect("node missing");
        let fields = renderer.fields(node).expect("fields failed");

        assert_eq!(fields.len(), 3);
        assert!(matches!(fields[0], Field::Attribute(_)));
        assert!(matches!(fields[1], Field::Element { list: false, .. }));
        assert!(matches!(fields[2], Field::CharData(_)));
    }

    #[test]
    fn test_render_empty_name_fails() {
        let mut tree = SchemaTree::new();
        let id = tree.add_root(SchemaNode::new("   ", "Blank"));
        let config = GeneratorConfig::new();
        let renderer = RecordRenderer::new(&tree, &config);

        let err = renderer
            .render(tree.get(id).expect("node missing"))
            .unwrap_err();
        assert!(matches!(err, CodegenError::Render { .. }));
    }

    #[test]
    fn test_render_unknown_child_fails() {
        let mut other = SchemaTree::new();
        other.add_node(SchemaNode::new("a", "A"));
        let dangling = other.add_node(SchemaNode::new("b", "B"));

        let mut tree = SchemaTree::new();
        let root = tree.add_root(SchemaNode::new("root", "root"));
        tree.add_child(root, dangling, false);

        let config = GeneratorConfig::new();
        let renderer = RecordRenderer::new(&tree, &config);
        let err = renderer
            .render(tree.get(root).expect("node missing"))
            .unwrap_err();
        assert!(matches!(err, CodegenError::UnknownNode { .. }));
    }

    #[test]
    fn test_render_rejects_quote_in_tag() {
        let mut tree = SchemaTree::new();
        let id = tree.add_root(SchemaNode::new("root", "root").with_attribute("a\"b", "string"));
        let config = GeneratorConfig::new();
        let renderer = RecordRenderer::new(&tree, &config);

        let err = renderer
            .render(tree.get(id).expect("node missing"))
            .unwrap_err();
        assert!(matches!(err, CodegenError::Render { .. }));
    }
}
