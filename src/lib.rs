//! # Mediator Lexicon
//!
//! A weighted, bidirectional name index that mediates between two models.
//! Loaders feed it `(entity, label, weight)` triples; matchers ask it which
//! single entity, if any, a label unambiguously denotes.
//!
//! ## Core Concepts
//!
//! - **EntityId**: An opaque identifier owned by an external model
//! - **Name**: A label after classification and normalization; the only form stored
//! - **Weight**: Non-negative confidence that a name denotes an entity
//! - **Resolution**: A single best entity, or `Ambiguous` when there is none or a tie
//!
//! ## Usage
//!
//! ```rust
//! use mediator_lexicon::{EntityId, MediatorLexicon, Resolution};
//!
//! let mut lexicon = MediatorLexicon::new();
//! lexicon.add(EntityId::new(1), "Cell", 0.9);
//! lexicon.add(EntityId::new(2), "cell", 0.9);
//! lexicon.add(EntityId::new(2), "Zelle", 0.9);
//!
//! // Equal raw weights tie...
//! assert_eq!(lexicon.best_entity("cell"), Resolution::Ambiguous);
//!
//! // ...but the corrected weight favours the entity with fewer labels.
//! let one = lexicon.corrected_weight("cell", EntityId::new(1));
//! let two = lexicon.corrected_weight("cell", EntityId::new(2));
//! assert!(one > two);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod entity;
pub mod error;
pub mod lexicon;
pub mod name;
pub mod resolver;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use entity::{EntityId, EntityKind};
pub use error::{LexiconError, LexiconResult, ParseError};
pub use lexicon::{MediatorLexicon, Resolution};
pub use name::{classify, normalize, Label};
pub use resolver::NameResolver;
pub use storage::{LoadConfig, LoadPolicy, LoadReport};
