//! CQL grammar layer
//!
//! Parses CQL text into an owned statement tree. This layer only checks
//! shape; names, arity and literal types are the compiler's concern.

mod diagnostics;
mod parser;
mod tree;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use parser::CqlParser;
pub use tree::{
    Clause, Comparator, CreateStatement, DestroyStatement, DocumentStatement, Literal, PropDef,
    SelectStatement, Statement, TypeToken,
};
