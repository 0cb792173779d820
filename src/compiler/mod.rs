//! CQL compiler
//!
//! Turns one CQL statement into one typed [`Command`] or one
//! [`CompileError`], never both.
//!
//! # Pipeline
//!
//! 1. Parse text into a statement tree (grammar diagnostics abort here)
//! 2. Dispatch on the statement kind
//! 3. Bind documents or fold select predicates against the schema registry
//! 4. Resolve ORDER BY and LIMIT
//!
//! The compiler only reads the registry. Applying define and drop commands
//! to a catalog is the caller's job.
//!
//! # Usage
//!
//! ```ignore
//! use aerocql::compiler::{Compiler, CompilerConfig};
//! use aerocql::schema::SchemaCatalog;
//!
//! let catalog = SchemaCatalog::new();
//! let config = CompilerConfig::default();
//! let command = Compiler::new(&catalog, &config).compile("DROP orders")?;
//! ```

mod binder;
mod builder;
mod command;
mod config;
mod errors;
mod predicate;
mod select;

pub use binder::DocumentBinder;
pub use builder::CommandBuilder;
pub use command::{Command, Document, EnumValue, SelectQuery, StrValue, UintValue};
pub use config::{CompilerConfig, DEFAULT_LIMIT};
pub use errors::{CompileError, CompileErrorCode, CompileResult, Severity};
pub use predicate::{Interval, SetPredicate, SubstringPredicate};
pub use select::SelectCompiler;

use crate::cql::CqlParser;
use crate::observability::{log_event_with_fields, Event};
use crate::schema::SchemaRegistry;

/// Registry and configuration bundled for repeated compiles
pub struct Compiler<'a, R: SchemaRegistry + ?Sized> {
    registry: &'a R,
    config: &'a CompilerConfig,
    parser: CqlParser,
}

impl<'a, R: SchemaRegistry + ?Sized> Compiler<'a, R> {
    pub fn new(registry: &'a R, config: &'a CompilerConfig) -> Self {
        Self {
            registry,
            config,
            parser: CqlParser::new(),
        }
    }

    /// Compile one statement
    pub fn compile(&self, text: &str) -> CompileResult<Command> {
        let result = self
            .parser
            .parse(text)
            .and_then(|stmt| CommandBuilder::new(self.registry, self.config).build(&stmt));

        match &result {
            Ok(command) => log_event_with_fields(
                Event::StatementCompiled,
                &[("kind", command.kind()), ("collection", command.collection())],
            ),
            Err(e) => log_event_with_fields(
                Event::StatementRejected,
                &[("code", e.code().code()), ("message", e.message())],
            ),
        }

        result
    }
}

/// Compile one statement against `registry`
pub fn compile<R: SchemaRegistry + ?Sized>(
    text: &str,
    registry: &R,
    config: &CompilerConfig,
) -> CompileResult<Command> {
    Compiler::new(registry, config).compile(text)
}
