//! Preference ranker.
//!
//! Folds the gender-compatibility multiplier into the raw scores and orders each
//! half's candidates. Ties on adjusted score are broken by participant id so the
//! orderings never depend on sort stability.

use std::cmp::Ordering;

use crate::error::MatchError;
use crate::partition::Partition;
use crate::types::{GenderIdentity, GenderPreference, MatchInput, ParticipantId};

/// 1.0 when `identity` satisfies `preference`, otherwise `penalty`.
pub fn multiplier(preference: GenderPreference, identity: GenderIdentity, penalty: f64) -> f64 {
    if preference.accepts(identity) {
        1.0
    } else {
        penalty
    }
}

/// `from`'s raw score for `to`, scaled by `from`'s preference against `to`'s identity.
///
/// Both ids must be in range of a validated input.
pub(crate) fn adjusted_score(
    input: &MatchInput,
    from: ParticipantId,
    to: ParticipantId,
    penalty: f64,
) -> f64 {
    // `+ 0.0` folds -0.0 into 0.0 so equal scores fall through to the id tie-break.
    input.scores[from.0][to.0]
        * multiplier(input.preferences[from.0], input.identities[to.0], penalty)
        + 0.0
}

/// Validates `input` and checks that `partition` splits the same population.
pub(crate) fn check_shape(input: &MatchInput, partition: &Partition) -> Result<(), MatchError> {
    input.validate()?;
    if partition.len() != input.len() {
        return Err(MatchError::invalid_partition(format!(
            "partition covers {} participants, input has {}",
            partition.len(),
            input.len()
        )));
    }
    Ok(())
}

/// Ranked preference structures for one run, indexed by slot within each half.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preferences {
    /// Per proposer: receiver slots from least to most preferred. The tail is the
    /// top remaining choice.
    pub proposer_lists: Vec<Vec<usize>>,
    /// Per receiver: proposer slots from most to least preferred.
    pub receiver_ranks: Vec<Vec<usize>>,
}

/// (adjusted score, id, slot) of one candidate.
type Scored = (f64, ParticipantId, usize);

fn ascending(a: &Scored, b: &Scored) -> Ordering {
    a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
}

fn score_candidates(
    input: &MatchInput,
    from: ParticipantId,
    candidates: &[ParticipantId],
    penalty: f64,
) -> Vec<Scored> {
    candidates
        .iter()
        .enumerate()
        .map(|(slot, &to)| (adjusted_score(input, from, to, penalty), to, slot))
        .collect()
}

/// Builds every proposer's preference list and every receiver's ranking.
///
/// Fails if `input` is malformed or `partition` covers a different population.
pub fn build_preferences(
    input: &MatchInput,
    partition: &Partition,
    penalty: f64,
) -> Result<Preferences, MatchError> {
    check_shape(input, partition)?;
    let proposer_lists = partition
        .proposers()
        .iter()
        .map(|&p| {
            let mut scored = score_candidates(input, p, partition.receivers(), penalty);
            scored.sort_by(ascending);
            scored.into_iter().map(|(_, _, slot)| slot).collect()
        })
        .collect();

    let receiver_ranks = partition
        .receivers()
        .iter()
        .map(|&r| {
            let mut scored = score_candidates(input, r, partition.proposers(), penalty);
            scored.sort_by(|a, b| ascending(b, a));
            scored.into_iter().map(|(_, _, slot)| slot).collect()
        })
        .collect();

    Ok(Preferences {
        proposer_lists,
        receiver_ranks,
    })
}
