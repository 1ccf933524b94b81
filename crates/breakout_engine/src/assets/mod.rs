//! Archetype and level documents
//!
//! Archetypes (`.go` files) are JSON templates loaded once at startup into an
//! [`ArchetypeCatalog`]. Levels (`.lvl` files) list which archetypes to spawn
//! and how each instance differs from its template.

pub mod archetype;
pub mod catalog;
pub mod level;
mod overrides;

use std::path::PathBuf;

use crate::ecs::registry::DecodeError;
use crate::ecs::world::StoreError;

pub use archetype::{Archetype, ArchetypeLoader};
pub use catalog::ArchetypeCatalog;
pub use level::{Level, LevelObject};

/// Archetype, catalog and level loading errors
///
/// All of these are fatal to the document being loaded; a game should refuse
/// to start with a broken catalog.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// File could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// File is not valid JSON
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON is valid but does not have the expected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A component entry failed to decode
    #[error("Archetype `{archetype}` component #{index}: {source}")]
    ComponentDecode {
        /// Archetype being loaded
        archetype: String,
        /// Position of the entry in its `components` list
        index: usize,
        /// Registry failure
        source: DecodeError,
    },

    /// Following child references re-entered an archetype still being loaded
    #[error("Cyclic child reference: {}", chain.join(" -> "))]
    CyclicChildReference {
        /// Open archetypes, outermost first, ending with the repeated name
        chain: Vec<String>,
    },

    /// A child reference or level entry names an archetype nobody defined
    #[error("Unknown archetype: {0}")]
    UnknownArchetype(String),

    /// Two documents define the same archetype name
    #[error("Duplicate archetype: {0}")]
    DuplicateArchetype(String),

    /// An override addresses a component or child that does not exist
    #[error("Override target not found: {0}")]
    OverrideTargetMissing(String),

    /// Spawning a loaded level failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LoadError {
    /// The registry failure behind a [`LoadError::ComponentDecode`]
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::ComponentDecode { source, .. } => Some(source),
            _ => None,
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Split a single-key JSON object into its key and value
pub(crate) fn single_entry<'a>(
    value: &'a serde_json::Value,
    what: &str,
) -> Result<(&'a str, &'a serde_json::Value), LoadError> {
    let object = value
        .as_object()
        .ok_or_else(|| LoadError::malformed(format!("{what} must be an object")))?;
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some((key, value)), None) => Ok((key.as_str(), value)),
        _ => Err(LoadError::malformed(format!(
            "{what} must have exactly one key, found {}",
            object.len()
        ))),
    }
}
