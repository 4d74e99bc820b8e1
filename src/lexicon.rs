//! The mediator lexicon: a weighted, bidirectional name index.
//!
//! A lexicon maps normalized names to the entities they denote, each with a
//! confidence weight, and keeps the reverse mapping from entities to their
//! names in lockstep:
//!
//! - `(n, e)` is in the forward index with weight `w` iff `n` is in the
//!   reverse bucket of `e`
//! - weights are finite and non-negative
//! - re-inserting a pair only ever raises its weight
//!
//! Entries only grow. There is no removal.
//!
//! # Concurrency
//!
//! The lexicon does no internal locking. Any number of readers may share a
//! `&MediatorLexicon`; callers that interleave `add` with reads must wrap it
//! in their own lock (for example `RwLock<MediatorLexicon>`).

use std::collections::{HashMap, HashSet};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::{debug, info, trace};

use crate::entity::{EntityId, EntityKind};
use crate::error::LexiconResult;
use crate::name;
use crate::storage::{self, LoadConfig, LoadReport};

/// Outcome of resolving a name to a single entity.
///
/// `Ambiguous` covers both "no candidate" and "several equally good
/// candidates": in either case the lexicon refuses to decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Exactly one entity carries the highest weight for the name.
    Resolved(EntityId),
    /// No entity, or more than one, carries the highest weight.
    Ambiguous,
}

impl Resolution {
    /// Returns the resolved entity, if any.
    #[must_use]
    pub const fn entity(self) -> Option<EntityId> {
        match self {
            Self::Resolved(id) => Some(id),
            Self::Ambiguous => None,
        }
    }

    /// Returns true if no single entity could be chosen.
    #[must_use]
    pub const fn is_ambiguous(self) -> bool {
        matches!(self, Self::Ambiguous)
    }
}

impl From<Resolution> for Option<EntityId> {
    fn from(resolution: Resolution) -> Self {
        resolution.entity()
    }
}

/// Weighted name index mediating between two models.
///
/// # Examples
///
/// ```
/// use mediator_lexicon::{EntityId, MediatorLexicon, Resolution};
///
/// let mut lexicon = MediatorLexicon::new();
/// lexicon.add(EntityId::new(1), "Cell", 0.9);
/// lexicon.add(EntityId::new(2), "cell", 0.5);
///
/// assert_eq!(lexicon.best_entity("cell"), Resolution::Resolved(EntityId::new(1)));
/// assert!(lexicon.best_entity("giraffe").is_ambiguous());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediatorLexicon {
    kind: EntityKind,
    entity_names: HashMap<String, HashMap<EntityId, f64>>,
    name_entities: HashMap<EntityId, HashSet<String>>,
}

impl MediatorLexicon {
    /// Creates an empty lexicon for classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty lexicon for the given kind of entity.
    #[must_use]
    pub fn with_kind(kind: EntityKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Reads a lexicon file, aborting on the first malformed record.
    ///
    /// # Errors
    /// - `LexiconError::Io` if the file cannot be opened or read
    /// - `LexiconError::Parse` on the first malformed record
    pub fn open(path: impl AsRef<Path>) -> LexiconResult<Self> {
        Self::open_with(path, &LoadConfig::default()).map(|(lexicon, _)| lexicon)
    }

    /// Reads a lexicon file under the given load configuration.
    ///
    /// # Errors
    /// - `LexiconError::Config` if the configuration is invalid
    /// - `LexiconError::Io` if the file cannot be opened or read
    /// - `LexiconError::Parse` on a malformed record the policy does not tolerate
    pub fn open_with(
        path: impl AsRef<Path>,
        config: &LoadConfig,
    ) -> LexiconResult<(Self, LoadReport)> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let (lexicon, report) = storage::read_with(BufReader::new(file), config)?;
        info!(
            path = %path.display(),
            records = report.records,
            skipped = report.skipped.len(),
            names = lexicon.name_count(),
            "loaded lexicon"
        );
        Ok((lexicon, report))
    }

    /// Writes this lexicon to a file, replacing any existing content.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    /// - `LexiconError::Io` if the file cannot be created or written
    /// - `LexiconError::InvalidName` if a stored name cannot be persisted
    pub fn save(&self, path: impl AsRef<Path>) -> LexiconResult<usize> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        let records = storage::write(self, BufWriter::new(file))?;
        info!(path = %path.display(), records, "saved lexicon");
        Ok(records)
    }

    /// Returns the kind of entity this lexicon mediates.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Adds a name for an entity.
    ///
    /// The name is classified and normalized before it is stored. Blank
    /// names and weights that are negative or not finite are ignored. An
    /// existing pair is only updated when the new weight is strictly higher.
    ///
    /// Returns true if the lexicon changed.
    pub fn add(&mut self, entity: EntityId, name: &str, weight: f64) -> bool {
        if name.trim().is_empty() {
            debug!(%entity, "skipping blank name");
            return false;
        }
        if !weight.is_finite() || weight < 0.0 {
            debug!(%entity, label = name, weight, "skipping invalid weight");
            return false;
        }

        let key = name::normalize(name);
        if key.is_empty() {
            debug!(%entity, label = name, "name normalizes to nothing");
            return false;
        }

        let weights = self.entity_names.entry(key.clone()).or_default();
        if weights.get(&entity).is_some_and(|&current| current >= weight) {
            return false;
        }
        weights.insert(entity, weight);
        trace!(%entity, key = %key, weight, "lexicon entry raised");
        self.name_entities.entry(entity).or_default().insert(key);
        true
    }

    /// Returns true if the (already normalized) name is in the lexicon.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entity_names.contains_key(name)
    }

    /// Returns all entities associated with the name.
    #[must_use]
    pub fn entities_for(&self, name: &str) -> HashSet<EntityId> {
        self.entity_names
            .get(name)
            .map(|weights| weights.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Returns the stored weight of the pair, or 0.0 if it is absent.
    #[must_use]
    pub fn weight(&self, name: &str, entity: EntityId) -> f64 {
        self.entity_names
            .get(name)
            .and_then(|weights| weights.get(&entity))
            .copied()
            .unwrap_or(0.0)
    }

    /// Returns the weight of the pair penalized by the number of names the
    /// entity has, or 0.0 if the pair is absent or has zero weight.
    ///
    /// Entities with many alternate labels score lower than entities with
    /// few strong ones, so generic label-rich entities do not dominate.
    #[must_use]
    #[allow(clippy::float_cmp, clippy::cast_precision_loss)]
    pub fn corrected_weight(&self, name: &str, entity: EntityId) -> f64 {
        let weight = self.weight(name, entity);
        if weight == 0.0 {
            return 0.0;
        }
        weight - self.name_count_for(entity) as f64
    }

    /// Resolves a name to the single entity with the highest weight.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn best_entity(&self, name: &str) -> Resolution {
        let Some(weights) = self.entity_names.get(name) else {
            return Resolution::Ambiguous;
        };

        let mut best: Option<EntityId> = None;
        let mut max = f64::NEG_INFINITY;
        let mut ties = 0usize;
        for (&entity, &weight) in weights {
            if weight > max {
                max = weight;
                best = Some(entity);
                ties = 1;
            } else if weight == max {
                ties += 1;
            }
        }

        match best {
            Some(entity) if ties == 1 => Resolution::Resolved(entity),
            _ => Resolution::Ambiguous,
        }
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub fn name_count(&self) -> usize {
        self.entity_names.len()
    }

    /// Returns the number of names associated with the entity.
    #[must_use]
    pub fn name_count_for(&self, entity: EntityId) -> usize {
        self.name_entities.get(&entity).map_or(0, HashSet::len)
    }

    /// Returns the total number of `(name, entity)` pairs.
    #[must_use]
    pub fn association_count(&self) -> usize {
        self.name_entities.values().map(HashSet::len).sum()
    }

    /// Returns true if the lexicon holds no names.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_names.is_empty()
    }

    /// Iterates over all distinct names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entity_names.keys().map(String::as_str)
    }

    /// Iterates over the names of one entity, in no particular order.
    pub fn names_of(&self, entity: EntityId) -> impl Iterator<Item = &str> + '_ {
        self.name_entities
            .get(&entity)
            .into_iter()
            .flat_map(|names| names.iter().map(String::as_str))
    }

    /// Iterates over entities that have at least one name.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.name_entities.keys().copied()
    }
}

impl<S: AsRef<str>> Extend<(EntityId, S, f64)> for MediatorLexicon {
    fn extend<I: IntoIterator<Item = (EntityId, S, f64)>>(&mut self, iter: I) {
        for (entity, name, weight) in iter {
            self.add(entity, name.as_ref(), weight);
        }
    }
}

impl<S: AsRef<str>> FromIterator<(EntityId, S, f64)> for MediatorLexicon {
    fn from_iter<I: IntoIterator<Item = (EntityId, S, f64)>>(iter: I) -> Self {
        let mut lexicon = Self::new();
        lexicon.extend(iter);
        lexicon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i64) -> EntityId {
        EntityId::new(raw)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// Forward and reverse indices describe the same pairs.
    fn assert_indices_agree(lexicon: &MediatorLexicon) {
        for (name, weights) in &lexicon.entity_names {
            for entity in weights.keys() {
                assert!(lexicon.name_entities[entity].contains(name));
            }
        }
        for (entity, names) in &lexicon.name_entities {
            for name in names {
                assert!(lexicon.entity_names[name].contains_key(entity));
            }
        }
    }

    #[test]
    fn test_new_lexicon_is_empty() {
        let lexicon = MediatorLexicon::new();
        assert!(lexicon.is_empty());
        assert_eq!(lexicon.name_count(), 0);
        assert_eq!(lexicon.kind(), EntityKind::Class);
        assert_eq!(lexicon.names().count(), 0);
    }

    #[test]
    fn test_with_kind() {
        let lexicon = MediatorLexicon::with_kind(EntityKind::Individual);
        assert_eq!(lexicon.kind(), EntityKind::Individual);
    }

    #[test]
    fn test_add_normalizes_name() {
        let mut lexicon = MediatorLexicon::new();
        assert!(lexicon.add(id(1), "Cell_Membrane", 0.8));
        assert!(lexicon.contains("cell membrane"));
        assert!(!lexicon.contains("Cell_Membrane"));
        assert_close(lexicon.weight("cell membrane", id(1)), 0.8);
    }

    #[test]
    fn test_add_formula_keeps_case() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(3), "H2O", 1.0);
        assert!(lexicon.contains("H2O"));
        assert!(!lexicon.contains("h2o"));
    }

    #[test]
    fn test_add_blank_name_is_noop() {
        let mut lexicon = MediatorLexicon::new();
        assert!(!lexicon.add(id(1), "", 0.9));
        assert!(!lexicon.add(id(1), "   ", 0.9));
        assert!(!lexicon.add(id(1), "___", 0.9));
        assert_eq!(lexicon.name_count(), 0);
        assert_eq!(lexicon.name_count_for(id(1)), 0);
    }

    #[test]
    fn test_add_invalid_weight_is_noop() {
        let mut lexicon = MediatorLexicon::new();
        assert!(!lexicon.add(id(1), "cell", -0.1));
        assert!(!lexicon.add(id(1), "cell", f64::NAN));
        assert!(!lexicon.add(id(1), "cell", f64::INFINITY));
        assert!(lexicon.is_empty());
    }

    #[test]
    fn test_add_keeps_maximum_weight() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.5);
        assert!(lexicon.add(id(1), "cell", 0.7));
        assert_close(lexicon.weight("cell", id(1)), 0.7);

        assert!(!lexicon.add(id(1), "cell", 0.6));
        assert_close(lexicon.weight("cell", id(1)), 0.7);
        assert_eq!(lexicon.name_count_for(id(1)), 1);
        assert_indices_agree(&lexicon);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut once = MediatorLexicon::new();
        once.add(id(1), "cell", 0.5);

        let mut twice = MediatorLexicon::new();
        twice.add(id(1), "cell", 0.5);
        assert!(!twice.add(id(1), "cell", 0.5));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_zero_weight_pair_is_stored() {
        let mut lexicon = MediatorLexicon::new();
        assert!(lexicon.add(id(1), "cell", 0.0));
        assert!(lexicon.contains("cell"));
        assert_eq!(lexicon.corrected_weight("cell", id(1)), 0.0);
        assert_eq!(lexicon.best_entity("cell"), Resolution::Resolved(id(1)));
    }

    #[test]
    fn test_entities_for() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.9);
        lexicon.add(id(2), "cell", 0.5);
        lexicon.add(id(3), "zelle", 0.5);

        let hits = lexicon.entities_for("cell");
        assert_eq!(hits, HashSet::from([id(1), id(2)]));
        assert!(lexicon.entities_for("giraffe").is_empty());
    }

    #[test]
    fn test_weight_of_absent_pair_is_zero() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.9);
        assert_eq!(lexicon.weight("cell", id(2)), 0.0);
        assert_eq!(lexicon.weight("giraffe", id(1)), 0.0);
    }

    #[test]
    fn test_best_entity_unmatched() {
        let lexicon = MediatorLexicon::new();
        assert_eq!(lexicon.best_entity("giraffe"), Resolution::Ambiguous);
    }

    #[test]
    fn test_best_entity_unique_winner() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.9);
        lexicon.add(id(2), "cell", 0.5);
        assert_eq!(lexicon.best_entity("cell"), Resolution::Resolved(id(1)));
        assert_eq!(lexicon.best_entity("cell").entity(), Some(id(1)));
    }

    #[test]
    fn test_best_entity_tie_is_ambiguous() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.5);
        lexicon.add(id(2), "cell", 0.5);
        assert!(lexicon.best_entity("cell").is_ambiguous());
        assert_eq!(Option::<EntityId>::from(lexicon.best_entity("cell")), None);
    }

    #[test]
    fn test_best_entity_tie_below_maximum_is_ignored() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.4);
        lexicon.add(id(2), "cell", 0.4);
        lexicon.add(id(3), "cell", 0.8);
        assert_eq!(lexicon.best_entity("cell"), Resolution::Resolved(id(3)));
    }

    #[test]
    fn test_best_entity_accepts_zero_entity_id() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(0), "cell", 0.3);
        lexicon.add(id(-1), "cell", 0.2);
        assert_eq!(lexicon.best_entity("cell"), Resolution::Resolved(id(0)));
    }

    #[test]
    fn test_corrected_weight_penalizes_label_rich_entities() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.9);
        lexicon.add(id(2), "cell", 0.9);
        lexicon.add(id(2), "cellula", 0.9);
        lexicon.add(id(2), "zelle", 0.9);

        assert_close(lexicon.corrected_weight("cell", id(1)), -0.1);
        assert_close(lexicon.corrected_weight("cell", id(2)), -2.1);
        assert!(lexicon.corrected_weight("cell", id(1)) > lexicon.corrected_weight("cell", id(2)));
        assert_eq!(lexicon.corrected_weight("giraffe", id(1)), 0.0);
    }

    #[test]
    fn test_counts_and_iterators() {
        let mut lexicon = MediatorLexicon::new();
        lexicon.add(id(1), "cell", 0.9);
        lexicon.add(id(1), "Cellula", 0.6);
        lexicon.add(id(2), "cell", 0.5);

        assert_eq!(lexicon.name_count(), 2);
        assert_eq!(lexicon.name_count_for(id(1)), 2);
        assert_eq!(lexicon.name_count_for(id(2)), 1);
        assert_eq!(lexicon.name_count_for(id(9)), 0);
        assert_eq!(lexicon.association_count(), 3);

        let names: HashSet<&str> = lexicon.names().collect();
        assert_eq!(names, HashSet::from(["cell", "cellula"]));

        let of_one: HashSet<&str> = lexicon.names_of(id(1)).collect();
        assert_eq!(of_one, HashSet::from(["cell", "cellula"]));
        assert_eq!(lexicon.names_of(id(9)).count(), 0);

        let entities: HashSet<EntityId> = lexicon.entity_ids().collect();
        assert_eq!(entities, HashSet::from([id(1), id(2)]));
        assert_indices_agree(&lexicon);
    }

    #[test]
    fn test_from_iterator_applies_add_rules() {
        let lexicon: MediatorLexicon = vec![
            (id(1), "cell", 0.5),
            (id(1), "Cell", 0.9),
            (id(1), "", 1.0),
            (id(2), "zelle", 0.4),
        ]
        .into_iter()
        .collect();

        assert_eq!(lexicon.name_count(), 2);
        assert_close(lexicon.weight("cell", id(1)), 0.9);
        assert_indices_agree(&lexicon);
    }
}
