//! # xsdgo Codegen
//!
//! Go struct generation from XSD schemas.
//!
//! This crate provides:
//! - Identifier normalization for Go names and initialisms
//! - A tree walker emitting one declaration per distinct element
//! - Struct rendering with `encoding/xml` tags for attributes, children and
//!   character data
//! - A formatter seam for `gofmt`/`goimports` style post-processing

pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod go;

pub use config::{ConflictPolicy, GeneratorConfig};
pub use error::CodegenError;
pub use format::{CommandFormatter, Formatter, Passthrough};
pub use generator::{Declaration, Generator};

use xsdgo_schema::SchemaTree;

/// Generates Go source for a schema tree.
///
/// # Errors
/// Returns `CodegenError` if generation fails.
pub fn generate(tree: &SchemaTree, config: &GeneratorConfig) -> Result<String, CodegenError> {
    Generator::new(tree, config).generate()
}

/// Generates Go source from an XSD schema string.
///
/// # Arguments
/// * `xsd` - XSD schema content
/// * `config` - Generation options
///
/// # Returns
/// Generated Go code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xsd(xsd: &str, config: &GeneratorConfig) -> Result<String, CodegenError> {
    let tree = xsdgo_schema::parse_schema(xsd)?;
    generate(&tree, config)
}

/// Generates Go source from an XSD schema file.
///
/// # Arguments
/// * `path` - Path to the XSD schema file
/// * `config` - Generation options
///
/// # Returns
/// Generated Go code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    config: &GeneratorConfig,
) -> Result<String, CodegenError> {
    let xsd = std::fs::read_to_string(path)?;
    generate_from_xsd(&xsd, config)
}
