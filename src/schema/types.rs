//! Schema prototype definitions
//!
//! A collection's prototype is three ordered property lists:
//! - unsigned integers (with a byte width of 1, 2, 4 or 8)
//! - enumerations (signed integer codes)
//! - strings
//!
//! Declaration order within each list is preserved. The lists are always
//! concatenated in the order integers, enums, strings; that order decides
//! positional value binding for documents.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Byte width of an unsigned-integer property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum UintWidth {
    /// UINT8
    W1 = 1,
    /// UINT16
    W2 = 2,
    /// UINT32
    W4 = 4,
    /// UINT64
    W8 = 8,
}

impl UintWidth {
    /// Number of bytes a value of this width occupies
    pub fn bytes(self) -> u8 {
        self as u8
    }

    /// Largest value representable in this width
    pub fn max_value(self) -> u64 {
        match self {
            UintWidth::W1 => u8::MAX as u64,
            UintWidth::W2 => u16::MAX as u64,
            UintWidth::W4 => u32::MAX as u64,
            UintWidth::W8 => u64::MAX,
        }
    }

    /// Returns the CQL type keyword for this width
    pub fn type_name(self) -> &'static str {
        match self {
            UintWidth::W1 => "UINT8",
            UintWidth::W2 => "UINT16",
            UintWidth::W4 => "UINT32",
            UintWidth::W8 => "UINT64",
        }
    }
}

impl TryFrom<u8> for UintWidth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(UintWidth::W1),
            2 => Ok(UintWidth::W2),
            4 => Ok(UintWidth::W4),
            8 => Ok(UintWidth::W8),
            other => Err(format!("invalid uint width {}, want one of 1, 2, 4, 8", other)),
        }
    }
}

impl From<UintWidth> for u8 {
    fn from(width: UintWidth) -> Self {
        width.bytes()
    }
}

impl fmt::Display for UintWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Unsigned-integer property definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UintProperty {
    pub name: String,
    pub width: UintWidth,
}

impl UintProperty {
    pub fn new(name: impl Into<String>, width: UintWidth) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// Enumerated property definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumProperty {
    pub name: String,
}

impl EnumProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// String property definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrProperty {
    pub name: String,
}

impl StrProperty {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Kind of a property as resolved against a prototype
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Uint(UintWidth),
    Enum,
    Str,
}

impl PropertyKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            PropertyKind::Uint(_) => "uint",
            PropertyKind::Enum => "enum",
            PropertyKind::Str => "string",
        }
    }
}

/// Ordered property prototype of one collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPrototype {
    #[serde(default)]
    pub uint_props: Vec<UintProperty>,
    #[serde(default)]
    pub enum_props: Vec<EnumProperty>,
    #[serde(default)]
    pub str_props: Vec<StrProperty>,
}

impl SchemaPrototype {
    /// Creates an empty prototype
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an unsigned-integer property
    pub fn with_uint(mut self, name: impl Into<String>, width: UintWidth) -> Self {
        self.uint_props.push(UintProperty::new(name, width));
        self
    }

    /// Appends an enumerated property
    pub fn with_enum(mut self, name: impl Into<String>) -> Self {
        self.enum_props.push(EnumProperty::new(name));
        self
    }

    /// Appends a string property
    pub fn with_str(mut self, name: impl Into<String>) -> Self {
        self.str_props.push(StrProperty::new(name));
        self
    }

    /// Number of values a document of this collection carries
    pub fn arity(&self) -> usize {
        self.uint_props.len() + self.enum_props.len() + self.str_props.len()
    }

    /// Property names in binding order (integers, enums, strings)
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.uint_props
            .iter()
            .map(|p| p.name.as_str())
            .chain(self.enum_props.iter().map(|p| p.name.as_str()))
            .chain(self.str_props.iter().map(|p| p.name.as_str()))
    }

    /// Resolves the kind of a named property
    pub fn kind_of(&self, name: &str) -> Option<PropertyKind> {
        if let Some(p) = self.uint_props.iter().find(|p| p.name == name) {
            return Some(PropertyKind::Uint(p.width));
        }
        if self.enum_props.iter().any(|p| p.name == name) {
            return Some(PropertyKind::Enum);
        }
        if self.str_props.iter().any(|p| p.name == name) {
            return Some(PropertyKind::Str);
        }
        None
    }

    /// Returns the first property name declared more than once, if any
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.property_names().find(|name| !seen.insert(*name))
    }
}
