//! Read-only query interface consumed by matchers.
//!
//! Matchers only need to look names up and score candidates; they take a
//! `NameResolver` rather than the concrete lexicon so they can be driven by
//! a shared, locked, or test double source.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entity::EntityId;
use crate::lexicon::{MediatorLexicon, Resolution};

/// Name lookup and scoring over normalized names.
pub trait NameResolver {
    /// Returns true if the name is known.
    fn contains(&self, name: &str) -> bool;

    /// Returns all entities associated with the name.
    fn entities_for(&self, name: &str) -> HashSet<EntityId>;

    /// Returns the weight of the pair, or 0.0 if it is absent.
    fn weight(&self, name: &str, entity: EntityId) -> f64;

    /// Returns the weight penalized by the entity's name count.
    fn corrected_weight(&self, name: &str, entity: EntityId) -> f64;

    /// Resolves the name to a single best entity.
    fn best_entity(&self, name: &str) -> Resolution;
}

impl NameResolver for MediatorLexicon {
    fn contains(&self, name: &str) -> bool {
        MediatorLexicon::contains(self, name)
    }

    fn entities_for(&self, name: &str) -> HashSet<EntityId> {
        MediatorLexicon::entities_for(self, name)
    }

    fn weight(&self, name: &str, entity: EntityId) -> f64 {
        MediatorLexicon::weight(self, name, entity)
    }

    fn corrected_weight(&self, name: &str, entity: EntityId) -> f64 {
        MediatorLexicon::corrected_weight(self, name, entity)
    }

    fn best_entity(&self, name: &str) -> Resolution {
        MediatorLexicon::best_entity(self, name)
    }
}

impl<T: NameResolver + ?Sized> NameResolver for &T {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }

    fn entities_for(&self, name: &str) -> HashSet<EntityId> {
        (**self).entities_for(name)
    }

    fn weight(&self, name: &str, entity: EntityId) -> f64 {
        (**self).weight(name, entity)
    }

    fn corrected_weight(&self, name: &str, entity: EntityId) -> f64 {
        (**self).corrected_weight(name, entity)
    }

    fn best_entity(&self, name: &str) -> Resolution {
        (**self).best_entity(name)
    }
}

impl<T: NameResolver + ?Sized> NameResolver for Arc<T> {
    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }

    fn entities_for(&self, name: &str) -> HashSet<EntityId> {
        (**self).entities_for(name)
    }

    fn weight(&self, name: &str, entity: EntityId) -> f64 {
        (**self).weight(name, entity)
    }

    fn corrected_weight(&self, name: &str, entity: EntityId) -> f64 {
        (**self).corrected_weight(name, entity)
    }

    fn best_entity(&self, name: &str) -> Resolution {
        (**self).best_entity(name)
    }
}
