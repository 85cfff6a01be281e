//! Primitive type definitions.
//!
//! This module maps XSD built-in simple types onto the closed set of scalar
//! types the generated Go code uses natively.

/// Scalar types that are inlined as fields instead of getting a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Go `bool`.
    Bool,
    /// Go `string`.
    String,
    /// Go `int`.
    Int,
    /// Go `float64`.
    Float64,
    /// Go `time.Time`.
    DateTime,
}

impl Primitive {
    /// All primitives, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Bool,
        Self::String,
        Self::Int,
        Self::Float64,
        Self::DateTime,
    ];

    /// Returns the Go spelling of the primitive.
    #[must_use]
    pub const fn go_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Float64 => "float64",
            Self::DateTime => "time.Time",
        }
    }

    /// Parses a primitive from its Go spelling.
    #[must_use]
    pub fn from_go_name(name: &str) -> Option<Self> {
        match name {
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            "int" => Some(Self::Int),
            "float64" => Some(Self::Float64),
            "time.Time" => Some(Self::DateTime),
            _ => None,
        }
    }

    /// Maps an XSD built-in type (local name, without namespace prefix).
    ///
    /// Returns `None` for names that are not XSD built-ins.
    #[must_use]
    pub fn from_xsd_name(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Self::Bool),
            "decimal" | "float" | "double" => Some(Self::Float64),
            "integer" | "int" | "long" | "short" | "byte" | "nonNegativeInteger"
            | "positiveInteger" | "nonPositiveInteger" | "negativeInteger" | "unsignedLong"
            | "unsignedInt" | "unsignedShort" | "unsignedByte" => Some(Self::Int),
            "dateTime" | "date" | "time" => Some(Self::DateTime),
            "string" | "normalizedString" | "token" | "language" | "Name" | "NCName"
            | "NMTOKEN" | "NMTOKENS" | "ID" | "IDREF" | "IDREFS" | "ENTITY" | "ENTITIES"
            | "QName" | "NOTATION" | "anyURI" | "base64Binary" | "hexBinary" | "duration"
            | "gYear" | "gYearMonth" | "gMonth" | "gMonthDay" | "gDay" | "anySimpleType"
            | "anyType" => Some(Self::String),
            _ => None,
        }
    }
}

impl std::fmt::Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.go_name())
    }
}

/// Returns true if `name` is the Go spelling of a primitive.
#[must_use]
pub fn is_primitive_name(name: &str) -> bool {
    Primitive::from_go_name(name).is_some()
}
