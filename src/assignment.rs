//! Result assembly and stability audit.
//!
//! [`assemble`] turns the engine's final [`MatchState`] into caller-facing pairs
//! ordered by receiver id. [`blocking_pairs`] checks a finished assignment against
//! the adjusted scores.

use crate::error::MatchError;
use crate::matching::{held_ids, MatchState};
use crate::partition::{Partition, Side};
use crate::ranking::{adjusted_score, check_shape};
use crate::types::{MatchInput, Pair, ParticipantId};

/// Collects matched pairs in ascending receiver order.
///
/// Every proposer must be matched. With equal halves that also means every receiver
/// is matched; with an odd population exactly one receiver is left out.
pub fn assemble(partition: &Partition, state: &MatchState) -> Result<Vec<Pair>, MatchError> {
    let pairs: Vec<Pair> = held_ids(partition, state)
        .filter_map(|(receiver, proposer)| proposer.map(|proposer| Pair { proposer, receiver }))
        .collect();
    if pairs.len() != partition.proposers().len() {
        return Err(MatchError::IncompleteAssignment {
            expected: partition.proposers().len(),
            actual: pairs.len(),
        });
    }
    Ok(pairs)
}

/// Every proposer/receiver pair that would rather be together than with their
/// assigned partners, judged by adjusted score. Empty for a stable assignment.
///
/// An unmatched receiver blocks with any proposer who strictly prefers it to their
/// own match. Fails if `input` is malformed, `partition` covers a different
/// population, or a pair does not join a proposer to a receiver of `partition`.
pub fn blocking_pairs(
    input: &MatchInput,
    partition: &Partition,
    pairs: &[Pair],
    penalty: f64,
) -> Result<Vec<Pair>, MatchError> {
    check_shape(input, partition)?;
    let mut partner: Vec<Option<ParticipantId>> = vec![None; partition.len()];
    for pair in pairs {
        let sides = (partition.side(pair.proposer), partition.side(pair.receiver));
        if !matches!(sides, (Some(Side::Proposer(_)), Some(Side::Receiver(_)))) {
            return Err(MatchError::invalid_partition(format!(
                "pair {} -> {} does not join a proposer to a receiver",
                pair.proposer, pair.receiver
            )));
        }
        partner[pair.proposer.0] = Some(pair.receiver);
        partner[pair.receiver.0] = Some(pair.proposer);
    }
    let score = |from: ParticipantId, to: ParticipantId| adjusted_score(input, from, to, penalty);

    let mut blocking = Vec::new();
    for &p in partition.proposers() {
        let own = partner[p.0].map(|r| score(p, r));
        for &r in partition.receivers() {
            if partner[p.0] == Some(r) {
                continue;
            }
            let proposer_wants = own.map_or(true, |s| score(p, r) > s);
            let receiver_wants = partner[r.0].map_or(true, |q| score(r, p) > score(r, q));
            if proposer_wants && receiver_wants {
                blocking.push(Pair {
                    proposer: p,
                    receiver: r,
                });
            }
        }
    }
    Ok(blocking)
}
