//! Entity identifiers and kinds.
//!
//! Entity identifiers are owned by the external model that feeds the
//! lexicon. The lexicon never interprets them: they are hashed, compared,
//! and written back to disk verbatim.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque identifier of an entity in an external model.
///
/// # Examples
///
/// ```
/// use mediator_lexicon::EntityId;
///
/// let id: EntityId = "42".parse().unwrap();
/// assert_eq!(id, EntityId::new(42));
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Wraps a raw identifier supplied by the owning model.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

impl From<i64> for EntityId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<i32> for EntityId {
    fn from(raw: i32) -> Self {
        Self(i64::from(raw))
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// The kind of entity a lexicon mediates.
///
/// A lexicon holds names for a single kind of entity; mixing kinds in one
/// lexicon would let a property label resolve to a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Ontology classes.
    #[default]
    Class,
    /// Named individuals.
    Individual,
    /// Data properties.
    DataProperty,
    /// Object properties.
    ObjectProperty,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Individual => write!(f, "individual"),
            Self::DataProperty => write!(f, "data_property"),
            Self::ObjectProperty => write!(f, "object_property"),
        }
    }
}
