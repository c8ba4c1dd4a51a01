// Typed Go type references produced by the synthesizer. Rendering to Go
// source happens only through `Display`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoType {
    Bool,
    Int,
    Float64,
    String,
    Interface,
    /// Pointer to a declared struct: `*Name`.
    Struct(String),
    /// Declared map or slice type, used by value: `Name`.
    Named(String),
    Slice(Box<GoType>),
    /// Always keyed by string: `map[string]T`.
    Map(Box<GoType>),
}

impl GoType {
    pub fn slice(item: GoType) -> Self {
        GoType::Slice(Box::new(item))
    }

    pub fn map(value: GoType) -> Self {
        GoType::Map(Box::new(value))
    }

    /// The declared name behind this reference, if it refers to a declaration.
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            GoType::Struct(name) | GoType::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoType::Bool => f.write_str("bool"),
            GoType::Int => f.write_str("int"),
            GoType::Float64 => f.write_str("float64"),
            GoType::String => f.write_str("string"),
            GoType::Interface => f.write_str("interface{}"),
            GoType::Struct(name) => write!(f, "*{name}"),
            GoType::Named(name) => f.write_str(name),
            GoType::Slice(item) => write!(f, "[]{item}"),
            GoType::Map(value) => write!(f, "map[string]{value}"),
        }
    }
}
