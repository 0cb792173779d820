//! In-memory schema catalog
//!
//! The catalog maps collection names to prototypes. The compiler only ever
//! reads it through [`SchemaRegistry`]; creating and dropping collections is
//! the caller's business.
//!
//! A catalog can be persisted as a single JSON object keyed by collection
//! name.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaPrototype;

/// Read-only view of registered prototypes
pub trait SchemaRegistry {
    /// Returns the prototype of a collection, if registered
    fn prototype(&self, collection: &str) -> Option<&SchemaPrototype>;
}

impl SchemaRegistry for HashMap<String, SchemaPrototype> {
    fn prototype(&self, collection: &str) -> Option<&SchemaPrototype> {
        self.get(collection)
    }
}

impl SchemaRegistry for BTreeMap<String, SchemaPrototype> {
    fn prototype(&self, collection: &str) -> Option<&SchemaPrototype> {
        self.get(collection)
    }
}

/// Collection name → prototype registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaCatalog {
    schemas: BTreeMap<String, SchemaPrototype>,
}

impl SchemaCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a JSON file.
    ///
    /// Every prototype is checked for duplicate property names.
    pub fn load(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let catalog: SchemaCatalog = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        for (collection, prototype) in &catalog.schemas {
            if let Some(dup) = prototype.first_duplicate() {
                return Err(SchemaError::duplicate_property(collection, dup));
            }
        }

        Ok(catalog)
    }

    /// Writes the catalog to a JSON file
    pub fn save(&self, path: &Path) -> SchemaResult<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to serialize: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to write file: {}", e))
        })
    }

    /// Registers a new collection.
    ///
    /// A collection is defined once; redefining it requires a drop first.
    pub fn define(&mut self, collection: impl Into<String>, prototype: SchemaPrototype) -> SchemaResult<()> {
        let collection = collection.into();
        if self.schemas.contains_key(&collection) {
            return Err(SchemaError::exists(collection));
        }
        if let Some(dup) = prototype.first_duplicate() {
            return Err(SchemaError::duplicate_property(collection, dup));
        }
        self.schemas.insert(collection, prototype);
        Ok(())
    }

    /// Removes a collection. Returns true if it was registered.
    pub fn drop_collection(&mut self, collection: &str) -> bool {
        self.schemas.remove(collection).is_some()
    }

    /// Checks if a collection is registered
    pub fn contains(&self, collection: &str) -> bool {
        self.schemas.contains_key(collection)
    }

    /// Returns the number of registered collections
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Returns true if no collection is registered
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Iterates collection names in sorted order
    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl SchemaRegistry for SchemaCatalog {
    fn prototype(&self, collection: &str) -> Option<&SchemaPrototype> {
        self.schemas.get(collection)
    }
}
