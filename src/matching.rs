//! Deferred-acceptance matching.
//!
//! [`deferred_acceptance`] runs the proposal loop over ranked [`Preferences`]: free
//! proposers are kept on a LIFO stack, each proposes to its best remaining receiver,
//! and a receiver keeps whichever proposer it ranks higher.
//!
//! Each receiver's ranking is truncated on acceptance so that it only holds the
//! proposers ranked at or above the current match, with the match as the tail. A
//! position table answers "is this proposer above my match" in O(1).

use log::{debug, trace};

use crate::error::MatchError;
use crate::partition::Partition;
use crate::ranking::Preferences;
use crate::types::ParticipantId;

/// Receiver ranking with O(1) membership against the truncated list.
#[derive(Clone, Debug)]
struct ReceiverRank {
    /// Proposer slots, best first. Truncated behind the current match.
    order: Vec<usize>,
    /// Proposer slot -> index in the untruncated `order`.
    position: Vec<usize>,
}

impl ReceiverRank {
    fn new(order: Vec<usize>) -> Self {
        let mut position = vec![usize::MAX; order.len()];
        for (rank, &p) in order.iter().enumerate() {
            position[p] = rank;
        }
        Self { order, position }
    }

    /// True if `p` survives truncation and is not the tail (the current match).
    fn prefers_over_current(&self, p: usize) -> bool {
        self.position[p] + 1 < self.order.len()
    }

    /// Drops every entry ranked below `p`, leaving `p` as the tail.
    fn truncate_at(&mut self, p: usize) {
        let keep = self.position[p] + 1;
        debug_assert!(keep <= self.order.len());
        self.order.truncate(keep);
    }
}

/// Receiver slot -> proposer slot it currently holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchState {
    held: Vec<Option<usize>>,
}

impl MatchState {
    fn unmatched(receivers: usize) -> Self {
        Self {
            held: vec![None; receivers],
        }
    }

    /// Proposer slot held by receiver slot `r`.
    pub fn held_by(&self, r: usize) -> Option<usize> {
        self.held.get(r).copied().flatten()
    }

    /// Number of receivers currently holding a proposer.
    pub fn matched(&self) -> usize {
        self.held.iter().filter(|h| h.is_some()).count()
    }
}

/// Checks that every list indexes the partition's halves and every receiver ranks
/// each proposer exactly once.
fn check_preferences(partition: &Partition, preferences: &Preferences) -> Result<(), MatchError> {
    let proposers = partition.proposers().len();
    let receivers = partition.receivers().len();
    if preferences.proposer_lists.len() != proposers {
        return Err(MatchError::invalid_preferences(format!(
            "{} proposer lists for {} proposers",
            preferences.proposer_lists.len(),
            proposers
        )));
    }
    if preferences.receiver_ranks.len() != receivers {
        return Err(MatchError::invalid_preferences(format!(
            "{} receiver ranks for {} receivers",
            preferences.receiver_ranks.len(),
            receivers
        )));
    }
    for (p, list) in preferences.proposer_lists.iter().enumerate() {
        if let Some(r) = list.iter().find(|&&r| r >= receivers) {
            return Err(MatchError::invalid_preferences(format!(
                "proposer slot {} lists receiver slot {} of {}",
                p, r, receivers
            )));
        }
    }
    for (r, rank) in preferences.receiver_ranks.iter().enumerate() {
        let mut seen = vec![false; proposers];
        let complete = rank.len() == proposers
            && rank
                .iter()
                .all(|&p| p < proposers && !std::mem::replace(&mut seen[p], true));
        if !complete {
            return Err(MatchError::invalid_preferences(format!(
                "receiver slot {} does not rank each of {} proposers once",
                r, proposers
            )));
        }
    }
    Ok(())
}

/// Runs the proposal loop to completion.
///
/// Terminates after at most `|proposers| * |receivers|` proposals. A proposer that
/// runs out of receivers while free is an invariant violation and aborts the run.
/// Lists that do not fit `partition` are rejected before the loop starts.
pub fn deferred_acceptance(
    partition: &Partition,
    preferences: Preferences,
) -> Result<MatchState, MatchError> {
    check_preferences(partition, &preferences)?;
    let Preferences {
        mut proposer_lists,
        receiver_ranks,
    } = preferences;
    let mut ranks: Vec<ReceiverRank> =
        receiver_ranks.into_iter().map(ReceiverRank::new).collect();
    let mut state = MatchState::unmatched(ranks.len());
    let mut free: Vec<usize> = (0..proposer_lists.len()).collect();
    let proposer_id = |slot: usize| partition.proposers()[slot];
    let receiver_id = |slot: usize| partition.receivers()[slot];
    let mut proposals = 0usize;

    while let Some(p) = free.pop() {
        let Some(r) = proposer_lists[p].pop() else {
            return Err(MatchError::ProposerExhausted {
                proposer: proposer_id(p),
            });
        };
        proposals += 1;
        match state.held_by(r) {
            None => {
                trace!(
                    "proposal accepted proposer={} receiver={}",
                    proposer_id(p),
                    receiver_id(r)
                );
                hold(&mut state, &mut ranks[r], r, p);
            }
            Some(current) if ranks[r].prefers_over_current(p) => {
                trace!(
                    "proposal accepted proposer={} receiver={} evicted={}",
                    proposer_id(p),
                    receiver_id(r),
                    proposer_id(current)
                );
                free.push(current);
                hold(&mut state, &mut ranks[r], r, p);
            }
            Some(_) => {
                trace!(
                    "proposal rejected proposer={} receiver={}",
                    proposer_id(p),
                    receiver_id(r)
                );
                free.push(p);
            }
        }
    }

    debug!(
        "deferred acceptance finished proposals={} matched={}",
        proposals,
        state.matched()
    );
    Ok(state)
}

fn hold(state: &mut MatchState, rank: &mut ReceiverRank, r: usize, p: usize) {
    state.held[r] = Some(p);
    rank.truncate_at(p);
}

/// Proposer id held by each receiver, in receiver order.
pub(crate) fn held_ids<'a>(
    partition: &'a Partition,
    state: &'a MatchState,
) -> impl Iterator<Item = (ParticipantId, Option<ParticipantId>)> + 'a {
    partition
        .receivers()
        .iter()
        .enumerate()
        .map(move |(r, &id)| {
            let proposer = state
                .held_by(r)
                .and_then(|p| partition.proposers().get(p).copied());
            (id, proposer)
        })
}
