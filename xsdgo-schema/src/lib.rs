//! # xsdgo Schema
//!
//! XSD parser and schema tree definitions.
//!
//! This crate provides:
//! - The arena-backed schema tree consumed by the code generator
//! - The closed set of primitive types inlined as scalar fields
//! - An XSD front end that resolves elements, attributes and character data

pub mod error;
pub mod parser;
pub mod tree;
pub mod types;

pub use error::ParseError;
pub use parser::{parse_schema, parse_schema_file};
pub use tree::{Attribute, ChildRef, NodeId, SchemaNode, SchemaTree};
pub use types::{Primitive, is_primitive_name};
