//! Select compilation
//!
//! Folds WHERE conjuncts into per-property predicates and resolves
//! ORDER BY and LIMIT.
//!
//! Rules:
//! - repeated range clauses on one uint property intersect
//! - a second IN or CONTAINS on one property is rejected
//! - without ORDER BY, the first range-predicated property in textual
//!   order is the ordering key and the default limit applies
//! - ORDER BY and LIMIT require a range predicate to order on

use std::collections::btree_map::Entry;

use super::binder::parse_u64;
use super::command::SelectQuery;
use super::config::CompilerConfig;
use super::errors::{CompileError, CompileResult};
use super::predicate::{Interval, SetPredicate, SubstringPredicate};
use crate::cql::{Clause, SelectStatement};
use crate::schema::{PropertyKind, SchemaPrototype, SchemaRegistry};

/// Compiles SELECT statements
pub struct SelectCompiler<'a, R: SchemaRegistry + ?Sized> {
    registry: &'a R,
    config: &'a CompilerConfig,
}

impl<'a, R: SchemaRegistry + ?Sized> SelectCompiler<'a, R> {
    pub fn new(registry: &'a R, config: &'a CompilerConfig) -> Self {
        Self { registry, config }
    }

    pub fn compile(&self, stmt: &SelectStatement) -> CompileResult<SelectQuery> {
        let prototype = self
            .registry
            .prototype(&stmt.collection)
            .ok_or_else(|| CompileError::schema_not_found(&stmt.collection))?;

        let mut query = SelectQuery {
            collection: stmt.collection.clone(),
            ..SelectQuery::default()
        };
        let mut first_interval: Option<&str> = None;

        for clause in &stmt.clauses {
            match clause {
                Clause::Compare {
                    property,
                    op,
                    value,
                } => {
                    if !matches!(prototype.kind_of(property), Some(PropertyKind::Uint(_))) {
                        return Err(unknown(stmt, property, "uint"));
                    }
                    let v = parse_u64(value)
                        .ok_or_else(|| CompileError::value_parse(property, value.as_str()))?;

                    let interval = Interval::from_comparison(*op, v);
                    match query.uint_preds.entry(property.clone()) {
                        Entry::Occupied(mut slot) => {
                            let folded = slot.get().intersect(&interval);
                            slot.insert(folded);
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(interval);
                        }
                    }
                    first_interval.get_or_insert(property.as_str());
                }
                Clause::In { property, values } => {
                    expect_kind(prototype, stmt, property, PropertyKind::Enum)?;
                    let mut codes = Vec::with_capacity(values.len());
                    for literal in values {
                        let code = literal
                            .as_str()
                            .parse::<i64>()
                            .map_err(|_| CompileError::value_parse(property, literal.as_str()))?;
                        codes.push(code);
                    }
                    match query.enum_preds.entry(property.clone()) {
                        Entry::Occupied(_) => {
                            return Err(CompileError::duplicate_conjunct_predicate(property))
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(SetPredicate::new(codes));
                        }
                    }
                }
                Clause::Contains { property, pattern } => {
                    expect_kind(prototype, stmt, property, PropertyKind::Str)?;
                    match query.str_preds.entry(property.clone()) {
                        Entry::Occupied(_) => {
                            return Err(CompileError::duplicate_conjunct_predicate(property))
                        }
                        Entry::Vacant(slot) => {
                            slot.insert(SubstringPredicate::from_literal(pattern.as_str()));
                        }
                    }
                }
            }
        }

        let first_interval = first_interval.map(str::to_string);
        self.resolve_order(stmt, &mut query, first_interval)?;
        Ok(query)
    }

    fn resolve_order(
        &self,
        stmt: &SelectStatement,
        query: &mut SelectQuery,
        first_interval: Option<String>,
    ) -> CompileResult<()> {
        let limit = match &stmt.limit {
            Some(literal) => Some(
                literal
                    .as_str()
                    .parse::<usize>()
                    .map_err(|_| CompileError::value_parse("LIMIT", literal.as_str()))?,
            ),
            None => None,
        };

        let order_by = match (&stmt.order_by, first_interval) {
            (Some(explicit), _) => {
                if !query.uint_preds.contains_key(explicit) {
                    return Err(CompileError::invalid_order_by(
                        format!(
                            "ORDER BY '{}' requires a range predicate on that property",
                            explicit
                        ),
                        Some(explicit.as_str()),
                    ));
                }
                explicit.clone()
            }
            (None, Some(first)) => first,
            (None, None) => {
                if limit.is_some() {
                    return Err(CompileError::invalid_order_by(
                        "LIMIT requires a range predicate to order by",
                        None,
                    ));
                }
                return Ok(());
            }
        };

        query.order_by = Some(order_by);
        query.limit = Some(limit.unwrap_or(self.config.default_limit));
        Ok(())
    }
}

fn expect_kind(
    prototype: &SchemaPrototype,
    stmt: &SelectStatement,
    property: &str,
    kind: PropertyKind,
) -> CompileResult<()> {
    if prototype.kind_of(property) == Some(kind) {
        Ok(())
    } else {
        Err(unknown(stmt, property, kind.kind_name()))
    }
}

fn unknown(stmt: &SelectStatement, property: &str, expected: &str) -> CompileError {
    CompileError::unknown_property(&stmt.collection, property, expected)
}
