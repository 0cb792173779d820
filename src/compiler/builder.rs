//! Command builder
//!
//! Single dispatch over the statement kind. Each statement kind has one
//! builder that returns its own typed result.

use std::collections::HashSet;

use super::binder::DocumentBinder;
use super::command::Command;
use super::config::CompilerConfig;
use super::errors::{CompileError, CompileResult};
use super::select::SelectCompiler;
use crate::cql::{CreateStatement, Statement, TypeToken};
use crate::schema::{SchemaPrototype, SchemaRegistry, UintWidth};

/// Turns a parsed statement into a command
pub struct CommandBuilder<'a, R: SchemaRegistry + ?Sized> {
    registry: &'a R,
    config: &'a CompilerConfig,
}

impl<'a, R: SchemaRegistry + ?Sized> CommandBuilder<'a, R> {
    pub fn new(registry: &'a R, config: &'a CompilerConfig) -> Self {
        Self { registry, config }
    }

    pub fn build(&self, stmt: &Statement) -> CompileResult<Command> {
        match stmt {
            Statement::Create(create) => define_schema(create),
            Statement::Destroy(destroy) => Ok(Command::DropSchema {
                collection: destroy.collection.clone(),
            }),
            Statement::Insert(doc) => Ok(Command::Insert(DocumentBinder::new(self.registry).bind(doc)?)),
            Statement::Delete(doc) => Ok(Command::Delete(DocumentBinder::new(self.registry).bind(doc)?)),
            Statement::Select(select) => Ok(Command::Select(
                SelectCompiler::new(self.registry, self.config).compile(select)?,
            )),
        }
    }
}

/// Splits property definitions into the three buckets, keeping textual
/// order inside each bucket
fn define_schema(create: &CreateStatement) -> CompileResult<Command> {
    let mut schema = SchemaPrototype::new();
    let mut seen = HashSet::new();

    for prop in &create.props {
        if !seen.insert(prop.name.as_str()) {
            return Err(CompileError::duplicate_property(&create.collection, &prop.name));
        }
        schema = match prop.ty {
            TypeToken::Enum => schema.with_enum(&prop.name),
            TypeToken::Str => schema.with_str(&prop.name),
            uint => schema.with_uint(&prop.name, uint_width(uint)),
        };
    }

    Ok(Command::DefineSchema {
        collection: create.collection.clone(),
        schema,
    })
}

fn uint_width(ty: TypeToken) -> UintWidth {
    match ty {
        TypeToken::Uint8 => UintWidth::W1,
        TypeToken::Uint16 => UintWidth::W2,
        TypeToken::Uint32 => UintWidth::W4,
        TypeToken::Uint64 => UintWidth::W8,
        other => unreachable!("invalid uint type {:?}", other),
    }
}
