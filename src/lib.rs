//! # Stable Pairing Engine
//!
//! Deterministic, gender-aware stable matching: a population is split at random into
//! proposers and receivers, each side ranks the other by compatibility score scaled
//! by a gender-preference multiplier, and deferred acceptance produces a one-to-one
//! pairing with no blocking pair.
//!
//! ## Entry point
//!
//! Use [`MatchEngine`] as the single entry point: create with [`MatchEngine::new`],
//! then [`MatchEngine::run_seeded`], [`MatchEngine::run`] or
//! [`MatchEngine::run_with_partition`].
//!
//! ## Example
//!
//! ```rust
//! use stable_pairing_engine::{
//!     parse_identities, parse_preferences, MatchConfig, MatchEngine, MatchInput,
//! };
//!
//! let input = MatchInput::new(
//!     vec![vec![1.0; 4]; 4],
//!     parse_identities(&["Male", "Female", "Male", "Female"]).unwrap(),
//!     parse_preferences(&["Women", "Men", "Women", "Men"]).unwrap(),
//! );
//! let engine = MatchEngine::new(MatchConfig::default()).unwrap();
//! let outcome = engine.run_seeded(&input, 42).unwrap();
//! assert_eq!(outcome.pairs.len(), 2);
//! ```
//!
//! ## Lower-level API
//!
//! The stages are public too: [`partition`], [`build_preferences`],
//! [`deferred_acceptance`] and [`assemble`]. [`blocking_pairs`] audits any
//! assignment for stability.

pub mod api;
pub mod assignment;
pub mod config;
pub mod engine;
pub mod error;
pub mod matching;
pub mod partition;
pub mod population_gen;
pub mod ranking;
pub mod types;

pub use assignment::{assemble, blocking_pairs};
pub use config::{MatchConfig, ServerConfig, DEFAULT_INCOMPATIBLE_PENALTY};
pub use engine::{run_matching, MatchEngine, MatchOutcome};
pub use error::{ErrorKind, MatchError};
pub use matching::{deferred_acceptance, MatchState};
pub use partition::{partition, Partition, Side};
pub use population_gen::{Generator, GeneratorConfig};
pub use ranking::{build_preferences, multiplier, Preferences};
pub use types::{
    parse_identities, parse_preferences, GenderIdentity, GenderPreference, MatchInput, Pair,
    ParticipantId,
};
