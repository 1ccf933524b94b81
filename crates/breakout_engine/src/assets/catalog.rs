//! Archetype catalog
//!
//! Loads every archetype document of a game once, at startup. Documents may
//! reference each other through named children, so all raw definitions are
//! collected before any of them is decoded.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use super::archetype::{Archetype, ArchetypeLoader};
use super::{single_entry, LoadError};
use crate::ecs::registry::ComponentRegistry;

/// File extension of archetype documents
pub const ARCHETYPE_EXTENSION: &str = "go";

/// Immutable set of loaded archetypes, keyed by name
#[derive(Debug)]
pub struct ArchetypeCatalog {
    registry: ComponentRegistry,
    archetypes: BTreeMap<String, Archetype>,
}

impl ArchetypeCatalog {
    /// Create an empty catalog decoding with `registry`
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            archetypes: BTreeMap::new(),
        }
    }

    /// Load every `.go` file in `dir`
    pub fn load_dir(dir: impl AsRef<Path>, registry: ComponentRegistry) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))? {
            let path = entry.map_err(|e| LoadError::io(dir, e))?.path();
            if path.extension().is_some_and(|ext| ext == ARCHETYPE_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in &paths {
            let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
            documents.push(serde_json::from_str::<Value>(&text)?);
        }

        let catalog = Self::from_documents(&documents, registry)?;
        log::info!(
            "Loaded {} archetypes from {}: {}",
            catalog.len(),
            dir.display(),
            catalog.names().collect::<Vec<_>>().join(", ")
        );
        Ok(catalog)
    }

    /// Build a catalog from parsed archetype documents
    pub fn from_documents(documents: &[Value], registry: ComponentRegistry) -> Result<Self, LoadError> {
        let mut definitions = BTreeMap::new();
        for document in documents {
            let (name, definition) = single_entry(document, "archetype document")?;
            if definitions.insert(name.to_string(), definition.clone()).is_some() {
                return Err(LoadError::DuplicateArchetype(name.to_string()));
            }
        }

        let mut archetypes = BTreeMap::new();
        {
            let mut loader = ArchetypeLoader::new(&registry);
            for (name, definition) in &definitions {
                loader.add_source(name.clone(), definition.clone());
            }
            for name in definitions.keys() {
                archetypes.insert(name.clone(), loader.load_named(name)?);
            }
        }

        Ok(Self {
            registry,
            archetypes,
        })
    }

    /// Add an archetype built in code
    pub fn insert(&mut self, archetype: Archetype) -> Result<(), LoadError> {
        if self.archetypes.contains_key(archetype.name()) {
            return Err(LoadError::DuplicateArchetype(archetype.name().to_string()));
        }
        self.archetypes.insert(archetype.name().to_string(), archetype);
        Ok(())
    }

    /// Archetype by name
    pub fn get(&self, name: &str) -> Option<&Archetype> {
        self.archetypes.get(name)
    }

    /// Archetype by name, or `UnknownArchetype`
    pub fn require(&self, name: &str) -> Result<&Archetype, LoadError> {
        self.get(name)
            .ok_or_else(|| LoadError::UnknownArchetype(name.to_string()))
    }

    /// Archetype names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.archetypes.keys().map(String::as_str)
    }

    /// Registry used to decode components and overrides
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Number of archetypes
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// True when the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
