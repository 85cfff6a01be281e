//! XSD schema parser.
//!
//! Parsing happens in two passes. The XML is first read with `quick-xml` into
//! a small element tree, then the XSD declarations in that tree are resolved
//! into a [`SchemaTree`] of elements, attributes and character data.

use crate::error::ParseError;
use crate::tree::{Attribute, ChildRef, NodeId, SchemaNode, SchemaTree};
use crate::types::Primitive;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Namespace URI of XML Schema.
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Maximum nesting of type derivations followed while resolving a type.
const MAX_DERIVATION_DEPTH: usize = 64;

/// Parses an XSD document from a string.
///
/// # Arguments
/// * `xsd` - XSD schema content
///
/// # Returns
/// The resolved schema tree, with one root per top-level element.
///
/// # Errors
/// Returns `ParseError` if the XML is malformed or references undefined types.
pub fn parse_schema(xsd: &str) -> Result<SchemaTree, ParseError> {
    let document = read_document(xsd)?;
    if document.name != "schema" {
        return Err(ParseError::structure(format!(
            "expected 'schema' root element, found '{}'",
            document.name
        )));
    }

    let tree = Resolver::new(&document).resolve()?;
    tracing::debug!(
        "Parsed schema with {} roots and {} nodes",
        tree.roots().len(),
        tree.len()
    );
    Ok(tree)
}

/// Parses an XSD document from a file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn parse_schema_file(path: &std::path::Path) -> Result<SchemaTree, ParseError> {
    let xsd = std::fs::read_to_string(path)?;
    parse_schema(&xsd)
}

/// Element of the raw XML document.
#[derive(Debug, Default)]
struct XmlElement {
    /// Local name, namespace prefix stripped.
    name: String,
    /// Attributes with their qualified keys.
    attrs: Vec<(String, String)>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn from_start(e: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
        let mut attrs = Vec::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = std::str::from_utf8(&attr.value)?;
            attrs.push((key.to_string(), value.to_string()));
        }

        Ok(Self {
            name,
            attrs,
            children: Vec::new(),
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Reads the whole document into an element tree.
fn read_document(xml: &str) -> Result<XmlElement, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => stack.push(XmlElement::from_start(e)?),
            Ok(Event::Empty(ref e)) => {
                let element = XmlElement::from_start(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ParseError::structure("unbalanced end tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(ParseError::structure("unexpected end of document"));
    }
    root.ok_or_else(|| ParseError::structure("document has no root element"))
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(ParseError::structure("multiple root elements")),
    }
    Ok(())
}

/// Splits `prefix:local` into its parts.
fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// Result of resolving a `type` or `base` reference.
enum TypeRef<'d> {
    Primitive(Primitive),
    Simple(&'d XmlElement),
    Complex(&'d XmlElement),
}

/// Content gathered from a complex type before it is stored in its node.
#[derive(Default)]
struct Body {
    attribs: Vec<Attribute>,
    children: Vec<ChildRef>,
    cdata: Option<Primitive>,
}

/// Resolves XSD declarations into schema nodes.
struct Resolver<'d> {
    document: &'d XmlElement,
    xsd_prefix: Option<String>,
    default_is_xsd: bool,
    elements: HashMap<&'d str, &'d XmlElement>,
    attributes: HashMap<&'d str, &'d XmlElement>,
    complex_types: HashMap<&'d str, &'d XmlElement>,
    simple_types: HashMap<&'d str, &'d XmlElement>,
    /// Nodes already created for top-level elements and named complex types.
    memo: HashMap<String, NodeId>,
    tree: SchemaTree,
}

impl<'d> Resolver<'d> {
    fn new(document: &'d XmlElement) -> Self {
        let mut xsd_prefix = None;
        let mut default_is_xsd = false;
        for (key, value) in &document.attrs {
            if value != XSD_NAMESPACE {
                continue;
            }
            if key == "xmlns" {
                default_is_xsd = true;
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                xsd_prefix = Some(prefix.to_string());
            }
        }

        let mut elements: HashMap<&str, &XmlElement> = HashMap::new();
        let mut attributes: HashMap<&str, &XmlElement> = HashMap::new();
        let mut complex_types: HashMap<&str, &XmlElement> = HashMap::new();
        let mut simple_types: HashMap<&str, &XmlElement> = HashMap::new();

        for decl in &document.children {
            let Some(name) = decl.attr("name") else {
                continue;
            };
            let table = match decl.name.as_str() {
                "element" => &mut elements,
                "attribute" => &mut attributes,
                "complexType" => &mut complex_types,
                "simpleType" => &mut simple_types,
                _ => continue,
            };
            table.entry(name).or_insert(decl);
        }

        Self {
            document,
            xsd_prefix,
            default_is_xsd,
            elements,
            attributes,
            complex_types,
            simple_types,
            memo: HashMap::new(),
            tree: SchemaTree::new(),
        }
    }

    fn resolve(mut self) -> Result<SchemaTree, ParseError> {
        let document = self.document;
        for decl in document.children.iter().filter(|d| d.name == "element") {
            let name = decl
                .attr("name")
                .ok_or_else(|| ParseError::missing_attr("element", "name"))?;
            let id = self.top_level_element(name)?;
            self.tree.push_root(id);
        }
        Ok(self.tree)
    }

    fn is_xsd_prefix(&self, prefix: Option<&str>) -> bool {
        match (prefix, &self.xsd_prefix) {
            (Some(p), Some(xsd)) => p == xsd,
            (Some(p), None) => p == "xs" || p == "xsd",
            (None, _) => self.default_is_xsd,
        }
    }

    fn lookup_type(&self, qname: &str, referrer: &str) -> Result<TypeRef<'d>, ParseError> {
        let (prefix, local) = split_qname(qname);
        let builtin = Primitive::from_xsd_name(local);

        if self.is_xsd_prefix(prefix) {
            if let Some(prim) = builtin {
                return Ok(TypeRef::Primitive(prim));
            }
        }
        if let Some(def) = self.complex_types.get(local).copied() {
            return Ok(TypeRef::Complex(def));
        }
        if let Some(def) = self.simple_types.get(local).copied() {
            return Ok(TypeRef::Simple(def));
        }
        builtin
            .map(TypeRef::Primitive)
            .ok_or_else(|| ParseError::unknown_type(qname, referrer))
    }

    /// Resolves a simple type down to the primitive it restricts.
    fn simple_primitive(
        &self,
        def: &'d XmlElement,
        referrer: &str,
        depth: usize,
    ) -> Result<Primitive, ParseError> {
        if depth > MAX_DERIVATION_DEPTH {
            return Err(ParseError::structure(format!(
                "simple type derivation of '{referrer}' is too deep"
            )));
        }

        for part in &def.children {
            match part.name.as_str() {
                "restriction" => {
                    if let Some(base) = part.attr("base") {
                        return match self.lookup_type(base, referrer)? {
                            TypeRef::Primitive(prim) => Ok(prim),
                            TypeRef::Simple(inner) => {
                                self.simple_primitive(inner, referrer, depth + 1)
                            }
                            TypeRef::Complex(_) => {
                                Err(ParseError::invalid_attr("restriction", "base", base))
                            }
                        };
                    }
                    if let Some(inner) = part.child("simpleType") {
                        return self.simple_primitive(inner, referrer, depth + 1);
                    }
                }
                "list" | "union" => return Ok(Primitive::String),
                _ => {}
            }
        }
        Ok(Primitive::String)
    }

    fn top_level_element(&mut self, name: &str) -> Result<NodeId, ParseError> {
        let decl = self
            .elements
            .get(name)
            .copied()
            .ok_or_else(|| ParseError::UnknownElement {
                name: name.to_string(),
            })?;
        self.element_node(decl, Some(format!("element:{name}")))
    }

    /// Creates (or reuses) the node for an element declaration.
    ///
    /// Complex elements are registered under `memo_key` before their content
    /// is resolved, so a recursive reference resolves to the same node.
    fn element_node(
        &mut self,
        decl: &'d XmlElement,
        memo_key: Option<String>,
    ) -> Result<NodeId, ParseError> {
        let name = decl
            .attr("name")
            .ok_or_else(|| ParseError::missing_attr("element", "name"))?;

        if let Some(key) = &memo_key {
            if let Some(&id) = self.memo.get(key) {
                return Ok(id);
            }
        }

        let complex = match (decl.attr("type"), decl.child("complexType")) {
            (Some(type_ref), _) => match self.lookup_type(type_ref, name)? {
                TypeRef::Primitive(prim) => {
                    return Ok(self.tree.add_node(SchemaNode::new(name, prim.go_name())));
                }
                TypeRef::Simple(def) => {
                    let prim = self.simple_primitive(def, name, 0)?;
                    return Ok(self.tree.add_node(SchemaNode::new(name, prim.go_name())));
                }
                TypeRef::Complex(def) => def,
            },
            (None, Some(def)) => def,
            (None, None) => {
                let prim = match decl.child("simpleType") {
                    Some(def) => self.simple_primitive(def, name, 0)?,
                    None => Primitive::String,
                };
                return Ok(self.tree.add_node(SchemaNode::new(name, prim.go_name())));
            }
        };

        let key = memo_key.or_else(|| {
            decl.attr("type")
                .map(|type_ref| format!("{name}:{}", split_qname(type_ref).1))
        });
        if let Some(key) = &key {
            if let Some(&id) = self.memo.get(key) {
                return Ok(id);
            }
        }

        let id = self.tree.add_node(SchemaNode::new(name, name));
        if let Some(key) = key {
            self.memo.insert(key, id);
        }

        let mut body = Body::default();
        self.collect_complex(complex, name, &mut body, 0)?;

        if let Some(node) = self.tree.get_mut(id) {
            node.attribs = body.attribs;
            node.children = body.children;
            if let Some(prim) = body.cdata {
                node.cdata = true;
                node.type_name = prim.go_name().to_string();
            }
        }
        Ok(id)
    }

    /// Gathers attributes, child elements and character data of a complex type.
    fn collect_complex(
        &mut self,
        def: &'d XmlElement,
        owner: &str,
        body: &mut Body,
        depth: usize,
    ) -> Result<(), ParseError> {
        if depth > MAX_DERIVATION_DEPTH {
            return Err(ParseError::structure(format!(
                "complex type derivation of '{owner}' is too deep"
            )));
        }

        if def.attr("mixed") == Some("true") {
            body.cdata = Some(Primitive::String);
        }

        for part in &def.children {
            match part.name.as_str() {
                "sequence" | "all" | "choice" => self.collect_particles(part, body)?,
                "attribute" => body.attribs.push(self.attribute(part)?),
                "simpleContent" => {
                    for derivation in &part.children {
                        self.collect_simple_content(derivation, owner, body, depth)?;
                    }
                }
                "complexContent" => {
                    if part.attr("mixed") == Some("true") {
                        body.cdata = Some(Primitive::String);
                    }
                    for derivation in &part.children {
                        self.collect_complex_content(derivation, owner, body, depth)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn collect_simple_content(
        &mut self,
        derivation: &'d XmlElement,
        owner: &str,
        body: &mut Body,
        depth: usize,
    ) -> Result<(), ParseError> {
        if derivation.name != "extension" && derivation.name != "restriction" {
            return Ok(());
        }
        let base = derivation
            .attr("base")
            .ok_or_else(|| ParseError::missing_attr(derivation.name.as_str(), "base"))?;

        match self.lookup_type(base, owner)? {
            TypeRef::Primitive(prim) => body.cdata = Some(prim),
            TypeRef::Simple(def) => body.cdata = Some(self.simple_primitive(def, owner, 0)?),
            TypeRef::Complex(def) => {
                self.collect_complex(def, owner, body, depth + 1)?;
                if body.cdata.is_none() {
                    body.cdata = Some(Primitive::String);
                }
            }
        }

        for part in &derivation.children {
            if part.name == "attribute" {
                body.attribs.push(self.attribute(part)?);
            }
        }
        Ok(())
    }

    fn collect_complex_content(
        &mut self,
        derivation: &'d XmlElement,
        owner: &str,
        body: &mut Body,
        depth: usize,
    ) -> Result<(), ParseError> {
        match derivation.name.as_str() {
            "extension" => {
                let base = derivation
                    .attr("base")
                    .ok_or_else(|| ParseError::missing_attr("extension", "base"))?;
                if let TypeRef::Complex(def) = self.lookup_type(base, owner)? {
                    self.collect_complex(def, owner, body, depth + 1)?;
                }
                self.collect_complex(derivation, owner, body, depth + 1)
            }
            "restriction" => self.collect_complex(derivation, owner, body, depth + 1),
            _ => Ok(()),
        }
    }

    /// Collects child elements of a model group, flattening nested groups.
    fn collect_particles(
        &mut self,
        group: &'d XmlElement,
        body: &mut Body,
    ) -> Result<(), ParseError> {
        let group_list = is_list(group)?;

        for particle in &group.children {
            match particle.name.as_str() {
                "element" => {
                    let list = group_list || is_list(particle)?;
                    let node = match particle.attr("ref") {
                        Some(reference) => self.top_level_element(split_qname(reference).1)?,
                        None => self.element_node(particle, None)?,
                    };
                    body.children.push(ChildRef { node, list });
                }
                "sequence" | "all" | "choice" => self.collect_particles(particle, body)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn attribute(&self, decl: &'d XmlElement) -> Result<Attribute, ParseError> {
        if let Some(reference) = decl.attr("ref") {
            let (prefix, local) = split_qname(reference);
            let prim = match self.attributes.get(local).copied() {
                Some(def) => self.attribute_primitive(def, local)?,
                // Built-in attributes of the reserved `xml` namespace (xml:lang, ...).
                None if prefix == Some("xml") => Primitive::String,
                None => {
                    return Err(ParseError::UnknownAttribute {
                        name: reference.to_string(),
                    });
                }
            };
            return Ok(Attribute::new(local, prim.go_name()));
        }

        let name = decl
            .attr("name")
            .ok_or_else(|| ParseError::missing_attr("attribute", "name"))?;
        let prim = self.attribute_primitive(decl, name)?;
        Ok(Attribute::new(name, prim.go_name()))
    }

    fn attribute_primitive(
        &self,
        decl: &'d XmlElement,
        name: &str,
    ) -> Result<Primitive, ParseError> {
        if let Some(type_ref) = decl.attr("type") {
            return match self.lookup_type(type_ref, name)? {
                TypeRef::Primitive(prim) => Ok(prim),
                TypeRef::Simple(def) => self.simple_primitive(def, name, 0),
                TypeRef::Complex(_) => Err(ParseError::invalid_attr("attribute", "type", type_ref)),
            };
        }
        match decl.child("simpleType") {
            Some(def) => self.simple_primitive(def, name, 0),
            None => Ok(Primitive::String),
        }
    }
}

/// Returns true if the particle may occur more than once.
fn is_list(particle: &XmlElement) -> Result<bool, ParseError> {
    match particle.attr("maxOccurs") {
        None => Ok(false),
        Some("unbounded") => Ok(true),
        Some(value) => value
            .parse::<u64>()
            .map(|max| max > 1)
            .map_err(|_| ParseError::invalid_attr(particle.name.as_str(), "maxOccurs", value)),
    }
}
