//! CQL parser using a pest grammar
//!
//! Converts CQL text into the owned parse tree. Grammar failures become
//! diagnostics; every other shape the grammar admits maps onto exactly one
//! tree node.

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::tree::{
    Clause, Comparator, CreateStatement, DestroyStatement, DocumentStatement, Literal, PropDef,
    SelectStatement, Statement, TypeToken,
};
use crate::compiler::{CompileError, CompileResult};

#[derive(Parser)]
#[grammar = "cql/cql.pest"]
struct CqlGrammar;

/// CQL statement parser
pub struct CqlParser;

impl CqlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses one statement
    pub fn parse(&self, input: &str) -> CompileResult<Statement> {
        let mut pairs = CqlGrammar::parse(Rule::cql, input).map_err(|e| {
            let mut diagnostics = Diagnostics::new();
            diagnostics.report(Diagnostic::from_pest(&e.renamed_rules(rule_name)));
            CompileError::syntax(diagnostics)
        })?;

        let cql = match pairs.next() {
            Some(pair) => pair,
            None => return Err(CompileError::unsupported_statement("empty input")),
        };

        for inner in cql.into_inner() {
            match inner.as_rule() {
                Rule::EOI | Rule::semicolon => continue,
                _ => return self.parse_statement(inner),
            }
        }
        Err(CompileError::unsupported_statement("no statement found"))
    }

    fn parse_statement(&self, pair: Pair<Rule>) -> CompileResult<Statement> {
        match pair.as_rule() {
            Rule::create => Ok(Statement::Create(self.parse_create(pair))),
            Rule::destroy => Ok(Statement::Destroy(DestroyStatement {
                collection: child_text(pair.into_inner(), Rule::collection),
            })),
            Rule::insert => Ok(Statement::Insert(self.parse_document(pair))),
            Rule::delete => Ok(Statement::Delete(self.parse_document(pair))),
            Rule::query => Ok(Statement::Select(self.parse_query(pair))),
            other => Err(CompileError::unsupported_statement(format!("{:?}", other))),
        }
    }

    fn parse_create(&self, pair: Pair<Rule>) -> CreateStatement {
        let mut collection = String::new();
        let mut props = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::collection => collection = inner.as_str().to_string(),
                Rule::prop_def => props.push(self.parse_prop_def(inner)),
                _ => {}
            }
        }

        CreateStatement { collection, props }
    }

    fn parse_prop_def(&self, pair: Pair<Rule>) -> PropDef {
        let mut name = String::new();
        let mut ty = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::property => name = inner.as_str().to_string(),
                Rule::prop_type => ty = Some(self.parse_type(inner)),
                _ => {}
            }
        }

        match ty {
            Some(ty) => PropDef { name, ty },
            None => unreachable!("prop_def without a type: {}", name),
        }
    }

    fn parse_type(&self, pair: Pair<Rule>) -> TypeToken {
        let text = pair.as_str().to_string();
        match pair.into_inner().next().map(|p| p.as_rule()) {
            Some(Rule::uint8_type) => TypeToken::Uint8,
            Some(Rule::uint16_type) => TypeToken::Uint16,
            Some(Rule::uint32_type) => TypeToken::Uint32,
            Some(Rule::uint64_type) => TypeToken::Uint64,
            Some(Rule::enum_type) => TypeToken::Enum,
            Some(Rule::str_type) => TypeToken::Str,
            _ => unreachable!("invalid property type: {}", text),
        }
    }

    fn parse_document(&self, pair: Pair<Rule>) -> DocumentStatement {
        let mut collection = String::new();
        let mut doc_id = Literal::new("");
        let mut values = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::collection => collection = inner.as_str().to_string(),
                Rule::doc_id => doc_id = Literal::new(inner.as_str()),
                Rule::value => values.push(Literal::new(inner.as_str())),
                _ => {}
            }
        }

        DocumentStatement {
            collection,
            doc_id,
            values,
        }
    }

    fn parse_query(&self, pair: Pair<Rule>) -> SelectStatement {
        let mut query = SelectStatement {
            collection: String::new(),
            clauses: Vec::new(),
            order_by: None,
            limit: None,
        };

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::collection => query.collection = inner.as_str().to_string(),
                Rule::compare_pred => query.clauses.push(self.parse_compare(inner)),
                Rule::in_pred => query.clauses.push(Clause::In {
                    property: child_text(inner.clone().into_inner(), Rule::property),
                    values: inner
                        .into_inner()
                        .filter(|p| p.as_rule() == Rule::value)
                        .map(|p| Literal::new(p.as_str()))
                        .collect(),
                }),
                Rule::contains_pred => query.clauses.push(Clause::Contains {
                    property: child_text(inner.clone().into_inner(), Rule::property),
                    pattern: Literal::new(child_text(inner.into_inner(), Rule::string)),
                }),
                Rule::order_by => {
                    query.order_by = Some(child_text(inner.into_inner(), Rule::property));
                }
                Rule::limit => {
                    query.limit = Some(Literal::new(child_text(inner.into_inner(), Rule::value)));
                }
                _ => {}
            }
        }

        query
    }

    fn parse_compare(&self, pair: Pair<Rule>) -> Clause {
        let mut property = String::new();
        let mut op = None;
        let mut value = Literal::new("");

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::property => property = inner.as_str().to_string(),
                Rule::comparator => op = Some(comparator(inner.as_str())),
                Rule::value => value = Literal::new(inner.as_str()),
                _ => {}
            }
        }

        match op {
            Some(op) => Clause::Compare { property, op, value },
            None => unreachable!("compare_pred without an operator on {}", property),
        }
    }
}

impl Default for CqlParser {
    fn default() -> Self {
        Self::new()
    }
}

fn comparator(token: &str) -> Comparator {
    match token {
        "<" => Comparator::Lt,
        ">" => Comparator::Gt,
        "<=" => Comparator::Le,
        ">=" => Comparator::Ge,
        "=" => Comparator::Eq,
        other => unreachable!("invalid compare: {}", other),
    }
}

/// Name used for `rule` in "expected ..." messages
fn rule_name(rule: &Rule) -> String {
    match rule {
        Rule::open_paren => "'('".to_string(),
        Rule::close_paren => "')'".to_string(),
        Rule::comma => "','".to_string(),
        Rule::semicolon => "';'".to_string(),
        other => format!("{:?}", other),
    }
}

/// Text of the first child with the given rule. The grammar guarantees the
/// child exists wherever this is called.
fn child_text(pairs: Pairs<Rule>, rule: Rule) -> String {
    pairs
        .into_iter()
        .find(|p| p.as_rule() == rule)
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| unreachable!("missing {:?} child", rule))
}
