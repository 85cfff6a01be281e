//! Schema tree walker and output assembly.
//!
//! The walker visits every root in order, emits one declaration per distinct
//! raw element name and recurses depth-first into non-primitive children.

use crate::config::{ConflictPolicy, GeneratorConfig};
use crate::error::CodegenError;
use crate::format::Formatter;
use crate::go::RecordRenderer;
use std::collections::HashMap;
use xsdgo_schema::{NodeId, SchemaNode, SchemaTree};

/// Header written before the package clause.
pub const GENERATED_HEADER: &str = "// Code generated by xsdgo. DO NOT EDIT.";

/// One rendered struct declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Raw schema name of the node.
    pub name: String,
    /// Declared Go type name.
    pub type_name: String,
    /// Rendered source text.
    pub source: String,
}

/// Go struct generator for a schema tree.
pub struct Generator<'a> {
    tree: &'a SchemaTree,
    config: &'a GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(tree: &'a SchemaTree, config: &'a GeneratorConfig) -> Self {
        Self { tree, config }
    }

    /// Renders the declarations for all roots, in walk order.
    ///
    /// # Errors
    /// Returns `CodegenError` on the first node that cannot be rendered, on a
    /// cycle in the schema graph, or on a rejected name conflict.
    pub fn declarations(&self) -> Result<Vec<Declaration>, CodegenError> {
        CycleCheck::new(self.tree).run()?;
        let mut walk = Walk::new(self.tree, self.config);

        for &root in self.tree.roots() {
            let node = walk.node(root)?;
            if node.is_primitive() {
                tracing::trace!("Skipping primitive root '{}'", node.name);
                continue;
            }
            walk.visit(root)?;
        }

        tracing::debug!("Generated {} declarations", walk.declarations.len());
        Ok(walk.declarations)
    }

    /// Generates the complete Go source, without post-processing.
    ///
    /// # Errors
    /// Returns `CodegenError` if any declaration fails to render.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let declarations = self.declarations()?;
        let mut output = String::new();

        if !self.config.package.is_empty() {
            output.push_str(GENERATED_HEADER);
            output.push_str(&format!("\n\npackage {}\n\n", self.config.package));
        }
        for declaration in &declarations {
            output.push_str(&declaration.source);
        }

        Ok(output)
    }

    /// Generates the complete Go source and passes it through `formatter`.
    ///
    /// # Errors
    /// Returns `CodegenError` if generation or formatting fails.
    pub fn generate_with(&self, formatter: &dyn Formatter) -> Result<String, CodegenError> {
        formatter.format(self.generate()?)
    }
}

/// State of one generation run.
struct Walk<'a> {
    tree: &'a SchemaTree,
    config: &'a GeneratorConfig,
    renderer: RecordRenderer<'a>,
    /// Raw names already declared, with the node that was rendered for them.
    visited: HashMap<&'a str, NodeId>,
    declarations: Vec<Declaration>,
}

impl<'a> Walk<'a> {
    fn new(tree: &'a SchemaTree, config: &'a GeneratorConfig) -> Self {
        Self {
            tree,
            config,
            renderer: RecordRenderer::new(tree, config),
            visited: HashMap::new(),
            declarations: Vec::new(),
        }
    }

    fn node(&self, id: NodeId) -> Result<&'a SchemaNode, CodegenError> {
        self.tree.get(id).ok_or(CodegenError::UnknownNode { id })
    }

    /// Expects a graph that passed `CycleCheck`.
    fn visit(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let node = self.node(id)?;

        if let Some(&first) = self.visited.get(node.name.as_str()) {
            if first != id && !self.same_shape(first, id) {
                match self.config.conflict_policy {
                    ConflictPolicy::KeepFirst => tracing::warn!(
                        "Element '{}' redefined with a different shape, keeping the first definition",
                        node.name
                    ),
                    ConflictPolicy::Reject => {
                        return Err(CodegenError::ConflictingDefinition {
                            name: node.name.clone(),
                        });
                    }
                }
            }
            tracing::trace!("Skipping already declared element '{}'", node.name);
            return Ok(());
        }

        let source = self.renderer.render(node)?;
        let type_name = self.config.type_name(&node.name);
        tracing::debug!("Declared {} for element '{}'", type_name, node.name);
        self.declarations.push(Declaration {
            name: node.name.clone(),
            type_name,
            source,
        });
        self.visited.insert(node.name.as_str(), id);

        for child in &node.children {
            if !self.node(child.node)?.is_primitive() {
                self.visit(child.node)?;
            }
        }

        Ok(())
    }

    /// Compares what two nodes would render as.
    fn same_shape(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(left), Some(right)) = (self.tree.get(a), self.tree.get(b)) else {
            return false;
        };
        if left.type_name != right.type_name
            || left.cdata != right.cdata
            || left.attribs != right.attribs
            || left.children.len() != right.children.len()
        {
            return false;
        }

        left.children
            .iter()
            .zip(&right.children)
            .all(|(l, r)| match (self.tree.get(l.node), self.tree.get(r.node)) {
                (Some(ln), Some(rn)) => {
                    l.list == r.list
                        && ln.name == rn.name
                        && ln.type_name == rn.type_name
                        && ln.cdata == rn.cdata
                }
                _ => false,
            })
    }
}

/// Depth-first search for back edges among the non-primitive nodes reachable
/// from the roots.
///
/// Runs by node id before any declaration is rendered, so a cycle is reported
/// no matter which raw names the walker would have deduplicated.
struct CycleCheck<'a> {
    tree: &'a SchemaTree,
    /// Nodes whose whole subgraph has been checked.
    done: Vec<bool>,
    /// Nodes on the current search path.
    path: Vec<NodeId>,
}

impl<'a> CycleCheck<'a> {
    fn new(tree: &'a SchemaTree) -> Self {
        Self {
            tree,
            done: vec![false; tree.len()],
            path: Vec::new(),
        }
    }

    fn run(mut self) -> Result<(), CodegenError> {
        for &root in self.tree.roots() {
            self.search(root)?;
        }
        Ok(())
    }

    fn search(&mut self, id: NodeId) -> Result<(), CodegenError> {
        let node = self.tree.get(id).ok_or(CodegenError::UnknownNode { id })?;
        if self.path.contains(&id) {
            return Err(CodegenError::CyclicSchema {
                path: self.cycle_path(id),
            });
        }
        if self.done[id.index()] || node.is_primitive() {
            return Ok(());
        }

        self.path.push(id);
        for child in &node.children {
            self.search(child.node)?;
        }
        self.path.pop();
        self.done[id.index()] = true;

        Ok(())
    }

    /// Joins the raw names from the first occurrence of `id` on the path back to `id`.
    fn cycle_path(&self, id: NodeId) -> String {
        let start = self.path.iter().position(|&n| n == id).unwrap_or(0);
        self.path[start..]
            .iter()
            .chain(std::iter::once(&id))
            .map(|&n| self.tree.get(n).map_or("?", |node| node.name.as_str()))
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
