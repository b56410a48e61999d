//! Population partitioner: splits `N` ids into proposers and receivers.
//!
//! Proposers are a uniformly random sample of `⌊N/2⌋` ids drawn from a caller-supplied
//! generator, so a seeded generator reproduces the split. Receivers are the remaining
//! ids in ascending order.

use rand::Rng;

use crate::error::MatchError;
use crate::types::ParticipantId;

/// Which half an id belongs to, and its index ("slot") inside that half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Proposer(usize),
    Receiver(usize),
}

/// Disjoint split of `0..N` into proposers and receivers.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Partition {
    proposers: Vec<ParticipantId>,
    receivers: Vec<ParticipantId>,
    #[serde(skip)]
    sides: Vec<Side>,
}

/// Draws a random partition of `n` ids.
///
/// Proposers keep the order they were sampled in; that order seeds the engine's
/// free-proposer stack.
pub fn partition<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Partition {
    let sampled = rand::seq::index::sample(rng, n, n / 2).into_vec();
    let proposers = sampled.into_iter().map(ParticipantId).collect();
    Partition::build(n, proposers)
}

impl Partition {
    /// Builds a partition from an explicit proposer list.
    ///
    /// The list must hold exactly `⌊n/2⌋` distinct ids in `0..n`.
    pub fn from_proposers(n: usize, proposers: Vec<ParticipantId>) -> Result<Self, MatchError> {
        if proposers.len() != n / 2 {
            return Err(MatchError::invalid_partition(format!(
                "expected {} proposers for {} participants, got {}",
                n / 2,
                n,
                proposers.len()
            )));
        }
        let mut seen = vec![false; n];
        for id in &proposers {
            match seen.get_mut(id.0) {
                None => {
                    return Err(MatchError::invalid_partition(format!(
                        "proposer {} is out of range for {} participants",
                        id, n
                    )))
                }
                Some(true) => {
                    return Err(MatchError::invalid_partition(format!(
                        "proposer {} listed twice",
                        id
                    )))
                }
                Some(slot) => *slot = true,
            }
        }
        Ok(Self::build(n, proposers))
    }

    fn build(n: usize, proposers: Vec<ParticipantId>) -> Self {
        let mut sides = vec![Side::Receiver(0); n];
        for (slot, id) in proposers.iter().enumerate() {
            sides[id.0] = Side::Proposer(slot);
        }
        let mut receivers = Vec::with_capacity(n - proposers.len());
        for (i, side) in sides.iter_mut().enumerate() {
            if let Side::Receiver(slot) = side {
                *slot = receivers.len();
                receivers.push(ParticipantId(i));
            }
        }
        Self {
            proposers,
            receivers,
            sides,
        }
    }

    /// Population size.
    pub fn len(&self) -> usize {
        self.sides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sides.is_empty()
    }

    pub fn proposers(&self) -> &[ParticipantId] {
        &self.proposers
    }

    /// Receivers in ascending id order.
    pub fn receivers(&self) -> &[ParticipantId] {
        &self.receivers
    }

    /// Side and slot of `id`, or `None` if out of range.
    pub fn side(&self, id: ParticipantId) -> Option<Side> {
        self.sides.get(id.0).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_covers(p: &Partition, n: usize) {
        let mut all: Vec<usize> = p
            .proposers()
            .iter()
            .chain(p.receivers())
            .map(|id| id.0)
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn empty_population_gives_empty_halves() {
        let p = partition(0, &mut StdRng::seed_from_u64(1));
        assert!(p.proposers().is_empty());
        assert!(p.receivers().is_empty());
        assert!(p.is_empty());
    }

    #[test]
    fn odd_population_gives_receivers_the_extra_member() {
        let p = partition(7, &mut StdRng::seed_from_u64(3));
        assert_eq!(p.proposers().len(), 3);
        assert_eq!(p.receivers().len(), 4);
        assert_covers(&p, 7);
    }

    #[test]
    fn halves_are_disjoint_and_receivers_ascending() {
        for seed in 0..20 {
            let p = partition(10, &mut StdRng::seed_from_u64(seed));
            assert_covers(&p, 10);
            assert!(p.receivers().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn same_seed_same_partition() {
        let a = partition(50, &mut StdRng::seed_from_u64(42));
        let b = partition(50, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_vary_the_split() {
        let splits: std::collections::HashSet<Vec<ParticipantId>> = (0..10)
            .map(|seed| {
                let mut props = partition(20, &mut StdRng::seed_from_u64(seed))
                    .proposers()
                    .to_vec();
                props.sort();
                props
            })
            .collect();
        assert!(splits.len() > 1, "different seeds should produce different splits");
    }

    #[test]
    fn slots_index_into_each_half() {
        let p = Partition::from_proposers(5, vec![ParticipantId(4), ParticipantId(1)]).unwrap();
        assert_eq!(p.receivers(), &[ParticipantId(0), ParticipantId(2), ParticipantId(3)]);
        assert_eq!(p.side(ParticipantId(4)), Some(Side::Proposer(0)));
        assert_eq!(p.side(ParticipantId(1)), Some(Side::Proposer(1)));
        assert_eq!(p.side(ParticipantId(3)), Some(Side::Receiver(2)));
        assert_eq!(p.side(ParticipantId(5)), None);
    }

    #[test]
    fn from_proposers_rejects_bad_lists() {
        let wrong_size = Partition::from_proposers(4, vec![ParticipantId(0)]);
        assert!(matches!(wrong_size, Err(MatchError::InvalidPartition { .. })));
        let duplicate = Partition::from_proposers(4, vec![ParticipantId(1), ParticipantId(1)]);
        assert!(matches!(duplicate, Err(MatchError::InvalidPartition { .. })));
        let out_of_range = Partition::from_proposers(4, vec![ParticipantId(0), ParticipantId(9)]);
        assert!(matches!(out_of_range, Err(MatchError::InvalidPartition { .. })));
    }
}
