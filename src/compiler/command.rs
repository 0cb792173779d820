//! Typed commands produced by the compiler
//!
//! A command is the only thing the compiler hands to the storage side.
//! Every command that exists has passed schema, arity and predicate
//! validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::predicate::{Interval, SetPredicate, SubstringPredicate};
use crate::schema::{SchemaPrototype, UintWidth};

/// Compiled CQL statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    DefineSchema {
        collection: String,
        schema: SchemaPrototype,
    },
    DropSchema {
        collection: String,
    },
    Insert(Document),
    Delete(Document),
    Select(SelectQuery),
}

impl Command {
    /// Returns the command kind name
    pub fn kind(&self) -> &'static str {
        match self {
            Command::DefineSchema { .. } => "define_schema",
            Command::DropSchema { .. } => "drop_schema",
            Command::Insert(_) => "insert",
            Command::Delete(_) => "delete",
            Command::Select(_) => "select",
        }
    }

    /// Returns the target collection
    pub fn collection(&self) -> &str {
        match self {
            Command::DefineSchema { collection, .. } | Command::DropSchema { collection } => {
                collection
            }
            Command::Insert(doc) | Command::Delete(doc) => &doc.collection,
            Command::Select(query) => &query.collection,
        }
    }

    /// True for commands that change engine state and must be logged
    /// before they are applied
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Select(_))
    }
}

/// Bound value of an unsigned-integer property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UintValue {
    pub name: String,
    pub width: UintWidth,
    pub value: u64,
}

/// Bound code of an enum property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
}

/// Bound value of a string property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrValue {
    pub name: String,
    pub value: String,
}

/// Document bound to a collection prototype
///
/// Value lists are parallel to the prototype's property lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub collection: String,
    pub id: u64,
    pub uint_values: Vec<UintValue>,
    pub enum_values: Vec<EnumValue>,
    pub str_values: Vec<StrValue>,
}

impl Document {
    pub fn uint(&self, name: &str) -> Option<u64> {
        self.uint_values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    pub fn enum_code(&self, name: &str) -> Option<i64> {
        self.enum_values.iter().find(|v| v.name == name).map(|v| v.value)
    }

    pub fn str_value(&self, name: &str) -> Option<&str> {
        self.str_values
            .iter()
            .find(|v| v.name == name)
            .map(|v| v.value.as_str())
    }
}

/// Compiled range query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectQuery {
    pub collection: String,
    pub uint_preds: BTreeMap<String, Interval>,
    pub enum_preds: BTreeMap<String, SetPredicate>,
    pub str_preds: BTreeMap<String, SubstringPredicate>,
    /// Always names a key of `uint_preds` when set
    pub order_by: Option<String>,
    pub limit: Option<usize>,
}
