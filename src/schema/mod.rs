//! Schema subsystem for aerocql
//!
//! Collections are declared once with an ordered property prototype and are
//! referenced read-only by every later insert, delete and select.
//!
//! # Design Principles
//!
//! - Fixed bucket order: unsigned integers, then enums, then strings
//! - Declaration order preserved within each bucket
//! - Property names unique per collection
//! - The compiler reads the registry, it never mutates it

mod catalog;
mod errors;
mod types;

pub use catalog::{SchemaCatalog, SchemaRegistry};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use types::{EnumProperty, PropertyKind, SchemaPrototype, StrProperty, UintProperty, UintWidth};
