//! Schema catalog error types
//!
//! Error codes:
//! - AERO_SCHEMA_MALFORMED (FATAL when loading a catalog file)
//! - AERO_SCHEMA_EXISTS (REJECT)
//! - AERO_SCHEMA_DUPLICATE_PROPERTY (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, catalog unchanged
    Reject,
    /// Catalog could not be loaded
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Catalog file unreadable or not valid JSON
    AeroSchemaMalformed,
    /// Collection already registered
    AeroSchemaExists,
    /// Property name declared twice in one prototype
    AeroSchemaDuplicateProperty,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AeroSchemaMalformed => "AERO_SCHEMA_MALFORMED",
            SchemaErrorCode::AeroSchemaExists => "AERO_SCHEMA_EXISTS",
            SchemaErrorCode::AeroSchemaDuplicateProperty => "AERO_SCHEMA_DUPLICATE_PROPERTY",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::AeroSchemaMalformed => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema catalog error
#[derive(Debug, Clone)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    collection: Option<String>,
}

impl SchemaError {
    /// Catalog file could not be read or parsed
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroSchemaMalformed,
            message: format!("{}: {}", path.into(), reason.into()),
            collection: None,
        }
    }

    /// Collection is already registered
    pub fn exists(collection: impl Into<String>) -> Self {
        let c = collection.into();
        Self {
            code: SchemaErrorCode::AeroSchemaExists,
            message: format!("Collection '{}' is already defined", c),
            collection: Some(c),
        }
    }

    /// Prototype declares a property name twice
    pub fn duplicate_property(collection: impl Into<String>, property: &str) -> Self {
        let c = collection.into();
        Self {
            code: SchemaErrorCode::AeroSchemaDuplicateProperty,
            message: format!("Collection '{}' declares property '{}' more than once", c, property),
            collection: Some(c),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the collection involved, if any
    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema catalog operations
pub type SchemaResult<T> = Result<T, SchemaError>;
