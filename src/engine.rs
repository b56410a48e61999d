//! Single-entry matching facade.
//!
//! Validates input and configuration, then runs partition, ranking, deferred
//! acceptance and assembly in order, so callers don't have to wire the stages
//! together themselves.

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assignment::assemble;
use crate::config::MatchConfig;
use crate::error::MatchError;
use crate::matching::deferred_acceptance;
use crate::partition::{partition, Partition};
use crate::ranking::build_preferences;
use crate::types::{MatchInput, Pair};

/// Result of one run: the split that was used and the assembled pairs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MatchOutcome {
    pub partition: Partition,
    /// `(proposer, receiver)` pairs in ascending receiver order.
    pub pairs: Vec<Pair>,
}

/// Stateless matching engine.
///
/// Use [`MatchEngine::run_seeded`] for reproducible runs, [`MatchEngine::run`] to
/// supply your own generator, or [`MatchEngine::run_with_partition`] to fix the split.
#[derive(Clone, Debug)]
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    /// Creates an engine. Fails if the configured penalty is negative or not finite.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Runs with a partition drawn from `rng`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        input: &MatchInput,
        rng: &mut R,
    ) -> Result<MatchOutcome, MatchError> {
        input.validate()?;
        let split = partition(input.len(), rng);
        self.match_on(input, split)
    }

    /// Runs with a partition drawn from `StdRng` seeded with `seed`.
    /// Same input and seed ⇒ same outcome.
    pub fn run_seeded(&self, input: &MatchInput, seed: u64) -> Result<MatchOutcome, MatchError> {
        self.run(input, &mut StdRng::seed_from_u64(seed))
    }

    /// Runs with a caller-chosen partition. Fails if it splits a population of a
    /// different size.
    pub fn run_with_partition(
        &self,
        input: &MatchInput,
        partition: Partition,
    ) -> Result<MatchOutcome, MatchError> {
        self.match_on(input, partition)
    }

    fn match_on(
        &self,
        input: &MatchInput,
        partition: Partition,
    ) -> Result<MatchOutcome, MatchError> {
        info!(
            "matching run started participants={} proposers={} receivers={} penalty={}",
            input.len(),
            partition.proposers().len(),
            partition.receivers().len(),
            self.config.incompatible_penalty
        );
        let preferences = build_preferences(input, &partition, self.config.incompatible_penalty)?;
        let state = deferred_acceptance(&partition, preferences)?;
        let pairs = assemble(&partition, &state)?;
        info!("matching run finished pairs={}", pairs.len());
        Ok(MatchOutcome { partition, pairs })
    }
}

/// Runs one seeded match with the default configuration and returns only the pairs.
pub fn run_matching(input: &MatchInput, seed: u64) -> Result<Vec<Pair>, MatchError> {
    let engine = MatchEngine::new(MatchConfig::default())?;
    Ok(engine.run_seeded(input, seed)?.pairs)
}
