//! Document binding
//!
//! Binds the positional literal list of an INSERT or DELETE to a
//! collection prototype. Literals are consumed in bucket order: uint
//! properties, then enums, then strings. Binding is all-or-nothing.

use super::command::{Document, EnumValue, StrValue, UintValue};
use super::errors::{CompileError, CompileResult};
use crate::cql::{DocumentStatement, Literal};
use crate::schema::SchemaRegistry;

/// Binds document literals against a schema registry
pub struct DocumentBinder<'a, R: SchemaRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: SchemaRegistry + ?Sized> DocumentBinder<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Bind a parsed document statement
    ///
    /// Checks, in order: schema exists, value count matches, id parses,
    /// each value parses for its slot.
    pub fn bind(&self, stmt: &DocumentStatement) -> CompileResult<Document> {
        let prototype = self
            .registry
            .prototype(&stmt.collection)
            .ok_or_else(|| CompileError::schema_not_found(&stmt.collection))?;

        let expected = prototype.arity();
        if stmt.values.len() != expected {
            return Err(CompileError::arity_mismatch(
                &stmt.collection,
                expected,
                stmt.values.len(),
            ));
        }

        let id = parse_u64(&stmt.doc_id).ok_or_else(|| {
            CompileError::value_parse("document id", stmt.doc_id.as_str())
        })?;

        let (uint_literals, rest) = stmt.values.split_at(prototype.uint_props.len());
        let (enum_literals, str_literals) = rest.split_at(prototype.enum_props.len());

        let mut uint_values = Vec::with_capacity(uint_literals.len());
        for (prop, literal) in prototype.uint_props.iter().zip(uint_literals) {
            let value = parse_u64(literal)
                .ok_or_else(|| CompileError::value_parse(&prop.name, literal.as_str()))?;
            let max = prop.width.max_value();
            if value > max {
                return Err(CompileError::value_out_of_range(&prop.name, value, max));
            }
            uint_values.push(UintValue {
                name: prop.name.clone(),
                width: prop.width,
                value,
            });
        }

        let mut enum_values = Vec::with_capacity(enum_literals.len());
        for (prop, literal) in prototype.enum_props.iter().zip(enum_literals) {
            let value = literal
                .as_str()
                .parse::<i64>()
                .map_err(|_| CompileError::value_parse(&prop.name, literal.as_str()))?;
            enum_values.push(EnumValue {
                name: prop.name.clone(),
                value,
            });
        }

        let str_values = prototype
            .str_props
            .iter()
            .zip(str_literals)
            .map(|(prop, literal)| StrValue {
                name: prop.name.clone(),
                value: literal.as_str().to_string(),
            })
            .collect();

        Ok(Document {
            collection: stmt.collection.clone(),
            id,
            uint_values,
            enum_values,
            str_values,
        })
    }
}

/// Unsigned decimal; rejects signs so that `-1` and `+1` both fail
pub(crate) fn parse_u64(literal: &Literal) -> Option<u64> {
    let text = literal.as_str();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
