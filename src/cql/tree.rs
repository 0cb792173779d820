//! CQL parse tree
//!
//! Owned, grammar-shaped representation of one statement. Literals keep the
//! exact source text so that the compiler decides every coercion.

use std::fmt;

/// Top-level statement, exactly one per CQL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Create(CreateStatement),
    Destroy(DestroyStatement),
    Insert(DocumentStatement),
    Delete(DocumentStatement),
    Select(SelectStatement),
}

/// Raw literal text as written in the statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal(String);

impl Literal {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared property type keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeToken {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Enum,
    Str,
}

/// `name TYPE` pair inside CREATE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropDef {
    pub name: String,
    pub ty: TypeToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStatement {
    pub collection: String,
    /// Property definitions in textual order
    pub props: Vec<PropDef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestroyStatement {
    pub collection: String,
}

/// Shared shape of INSERT and DELETE
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStatement {
    pub collection: String,
    pub doc_id: Literal,
    pub values: Vec<Literal>,
}

/// Comparison operator of a uint clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
}

/// One WHERE conjunct
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `name <op> value`
    Compare {
        property: String,
        op: Comparator,
        value: Literal,
    },
    /// `name IN (v, ...)`
    In {
        property: String,
        values: Vec<Literal>,
    },
    /// `name CONTAINS "text"`
    Contains { property: String, pattern: Literal },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub collection: String,
    /// WHERE conjuncts in textual order
    pub clauses: Vec<Clause>,
    pub order_by: Option<String>,
    pub limit: Option<Literal>,
}
