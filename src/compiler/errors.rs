//! Compiler error types
//!
//! Every compile failure is REJECT: the statement is refused and no
//! command is produced. Error codes:
//! - AERO_CQL_SYNTAX_ERROR
//! - AERO_CQL_SCHEMA_NOT_FOUND
//! - AERO_CQL_ARITY_MISMATCH
//! - AERO_CQL_VALUE_PARSE_ERROR
//! - AERO_CQL_VALUE_OUT_OF_RANGE
//! - AERO_CQL_DUPLICATE_PROPERTY
//! - AERO_CQL_DUPLICATE_CONJUNCT_PREDICATE
//! - AERO_CQL_UNKNOWN_PROPERTY
//! - AERO_CQL_INVALID_ORDER_BY
//! - AERO_CQL_UNSUPPORTED_STATEMENT

use std::fmt;

use crate::cql::{Diagnostic, Diagnostics};

/// Severity levels for compile errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Statement rejected, nothing emitted
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Compiler error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorCode {
    /// Grammar rejected the statement
    AeroCqlSyntaxError,
    /// Collection has no registered schema
    AeroCqlSchemaNotFound,
    /// Value count differs from the schema's property count
    AeroCqlArityMismatch,
    /// Literal is not a valid number for its slot
    AeroCqlValueParseError,
    /// Number does not fit the declared byte width
    AeroCqlValueOutOfRange,
    /// CREATE declares a property name twice
    AeroCqlDuplicateProperty,
    /// Second IN or CONTAINS clause on one property
    AeroCqlDuplicateConjunctPredicate,
    /// Predicate names a property the schema lacks, or of another kind
    AeroCqlUnknownProperty,
    /// ORDER BY or LIMIT without a matching range predicate
    AeroCqlInvalidOrderBy,
    /// Statement kind not recognized
    AeroCqlUnsupportedStatement,
}

impl CompileErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CompileErrorCode::AeroCqlSyntaxError => "AERO_CQL_SYNTAX_ERROR",
            CompileErrorCode::AeroCqlSchemaNotFound => "AERO_CQL_SCHEMA_NOT_FOUND",
            CompileErrorCode::AeroCqlArityMismatch => "AERO_CQL_ARITY_MISMATCH",
            CompileErrorCode::AeroCqlValueParseError => "AERO_CQL_VALUE_PARSE_ERROR",
            CompileErrorCode::AeroCqlValueOutOfRange => "AERO_CQL_VALUE_OUT_OF_RANGE",
            CompileErrorCode::AeroCqlDuplicateProperty => "AERO_CQL_DUPLICATE_PROPERTY",
            CompileErrorCode::AeroCqlDuplicateConjunctPredicate => {
                "AERO_CQL_DUPLICATE_CONJUNCT_PREDICATE"
            }
            CompileErrorCode::AeroCqlUnknownProperty => "AERO_CQL_UNKNOWN_PROPERTY",
            CompileErrorCode::AeroCqlInvalidOrderBy => "AERO_CQL_INVALID_ORDER_BY",
            CompileErrorCode::AeroCqlUnsupportedStatement => "AERO_CQL_UNSUPPORTED_STATEMENT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for CompileErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compile error
#[derive(Debug, Clone)]
pub struct CompileError {
    code: CompileErrorCode,
    message: String,
    property: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    fn new(code: CompileErrorCode, message: String, property: Option<String>) -> Self {
        Self {
            code,
            message,
            property,
            diagnostics: Vec::new(),
        }
    }

    /// Grammar diagnostics were raised while parsing
    pub fn syntax(diagnostics: Diagnostics) -> Self {
        let message = diagnostics.to_string();
        Self {
            code: CompileErrorCode::AeroCqlSyntaxError,
            message,
            property: None,
            diagnostics: diagnostics.into_vec(),
        }
    }

    pub fn schema_not_found(collection: &str) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlSchemaNotFound,
            format!("Schema not found for collection '{}'", collection),
            None,
        )
    }

    pub fn arity_mismatch(collection: &str, expected: usize, actual: usize) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlArityMismatch,
            format!(
                "Collection '{}' expects {} values, got {}",
                collection, expected, actual
            ),
            None,
        )
    }

    /// Literal could not be parsed; `slot` names what it was parsed for
    pub fn value_parse(slot: &str, literal: &str) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlValueParseError,
            format!("Invalid value '{}' for {}", literal, slot),
            Some(slot.to_string()),
        )
    }

    pub fn value_out_of_range(property: &str, value: u64, max: u64) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlValueOutOfRange,
            format!(
                "Value {} for property '{}' exceeds maximum {}",
                value, property, max
            ),
            Some(property.to_string()),
        )
    }

    pub fn duplicate_property(collection: &str, property: &str) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlDuplicateProperty,
            format!(
                "Collection '{}' declares property '{}' more than once",
                collection, property
            ),
            Some(property.to_string()),
        )
    }

    pub fn duplicate_conjunct_predicate(property: &str) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlDuplicateConjunctPredicate,
            format!(
                "Property '{}' appears in more than one conjunct predicate",
                property
            ),
            Some(property.to_string()),
        )
    }

    /// Property missing from the schema, or declared with `expected` kind
    /// absent
    pub fn unknown_property(collection: &str, property: &str, expected: &str) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlUnknownProperty,
            format!(
                "Collection '{}' has no {} property '{}'",
                collection, expected, property
            ),
            Some(property.to_string()),
        )
    }

    pub fn invalid_order_by(reason: impl Into<String>, property: Option<&str>) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlInvalidOrderBy,
            reason.into(),
            property.map(str::to_string),
        )
    }

    pub fn unsupported_statement(kind: impl Into<String>) -> Self {
        Self::new(
            CompileErrorCode::AeroCqlUnsupportedStatement,
            format!("Unsupported statement: {}", kind.into()),
            None,
        )
    }

    /// Returns the error code
    pub fn code(&self) -> CompileErrorCode {
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

    /// Returns the offending property, if any
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Returns grammar diagnostics (empty unless a syntax error)
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for CompileError {
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

impl std::error::Error for CompileError {}

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;
