//! aerocql - CQL compiler for a multidimensional document index
//!
//! Compiles CQL statements into typed commands for a range index, and
//! frames mutation commands into a write-ahead log.

pub mod cli;
pub mod compiler;
pub mod cql;
pub mod observability;
pub mod schema;
pub mod wal;

pub use compiler::{compile, Command, CompileError, CompileResult, Compiler, CompilerConfig};
pub use schema::{SchemaCatalog, SchemaRegistry};
