//! Error types for code generation.

use thiserror::Error;
use xsdgo_schema::NodeId;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] xsdgo_schema::ParseError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A node could not be rendered as a declaration.
    #[error("cannot render '{node}': {message}")]
    Render {
        /// Raw name of the node being rendered.
        node: String,
        /// Error message.
        message: String,
    },

    /// A child reference points outside the schema tree.
    #[error("node {id} is not part of the schema tree")]
    UnknownNode {
        /// The dangling id.
        id: NodeId,
    },

    /// The schema graph loops back onto itself.
    #[error("cyclic schema: {path}")]
    CyclicSchema {
        /// Raw names along the cycle, joined by ` -> `.
        path: String,
    },

    /// Two differently shaped nodes share a raw name.
    #[error("conflicting definitions for '{name}'")]
    ConflictingDefinition {
        /// The shared raw name.
        name: String,
    },

    /// The post-processing formatter failed.
    #[error("format error: {message}")]
    Format {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a render error for the given node.
    pub fn render(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Creates a format error with the given message.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}
