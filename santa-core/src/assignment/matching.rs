//! Perfect matchings between waiting givers and free receivers.
//!
//! The search keeps one [`Matching`] alive for the participants it has not
//! placed yet. As long as the remainder has a perfect matching, the partial
//! exchange can still be completed; once it doesn't, no amount of searching
//! below that point will help.
//!
//! Matchings are grown with Kuhn's augmenting-path algorithm. Placing a pair
//! that the current matching disagrees with orphans exactly one giver and
//! frees exactly one receiver, so a single augmenting path repairs it.

use super::search::CompatibilityMatrix;

#[derive(Debug, Clone)]
pub(crate) struct Matching {
    receiver_of: Vec<Option<usize>>,
    giver_of: Vec<Option<usize>>,
}

impl Matching {
    /// A perfect matching over every participant, or `None` if none exists.
    pub(crate) fn perfect(matrix: &CompatibilityMatrix) -> Option<Self> {
        let n = matrix.len();
        let mut matching = Self {
            receiver_of: vec![None; n],
            giver_of: vec![None; n],
        };
        let taken = vec![false; n];
        let mut visited = vec![false; n];
        for giver in 0..n {
            visited.fill(false);
            if !matching.augment(matrix, &taken, giver, &mut visited) {
                return None;
            }
        }
        Some(matching)
    }

    /// Receiver currently matched to `giver`.
    #[cfg(test)]
    pub(crate) fn receiver_of(&self, giver: usize) -> Option<usize> {
        self.receiver_of[giver]
    }

    /// Take `giver -> receiver` out of the remainder and re-match the rest.
    ///
    /// `taken` must already mark `receiver` as unavailable. Returns `false`
    /// and leaves the matching as it was when the remaining participants
    /// can't all be paired any more.
    pub(crate) fn place(
        &mut self,
        matrix: &CompatibilityMatrix,
        taken: &[bool],
        giver: usize,
        receiver: usize,
    ) -> bool {
        let (Some(freed), Some(orphan)) = (self.receiver_of[giver], self.giver_of[receiver]) else {
            return false;
        };

        if freed == receiver {
            self.receiver_of[giver] = None;
            self.giver_of[receiver] = None;
            return true;
        }

        let saved = self.clone();
        self.receiver_of[giver] = None;
        self.giver_of[freed] = None;
        self.receiver_of[orphan] = None;
        self.giver_of[receiver] = None;

        let mut visited = vec![false; matrix.len()];
        if self.augment(matrix, taken, orphan, &mut visited) {
            true
        } else {
            *self = saved;
            false
        }
    }

    /// Find an alternating path from `giver` to an unmatched free receiver
    /// and flip it.
    fn augment(
        &mut self,
        matrix: &CompatibilityMatrix,
        taken: &[bool],
        giver: usize,
        visited: &mut [bool],
    ) -> bool {
        for receiver in 0..matrix.len() {
            if taken[receiver] || visited[receiver] || !matrix.allows(giver, receiver) {
                continue;
            }
            visited[receiver] = true;

            let reachable = match self.giver_of[receiver] {
                None => true,
                Some(holder) => self.augment(matrix, taken, holder, visited),
            };
            if reachable {
                self.giver_of[receiver] = Some(giver);
                self.receiver_of[giver] = Some(receiver);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::Participant;

    fn family_heavy(family_size: usize, others: usize) -> Vec<Participant> {
        let mut participants: Vec<Participant> = (0..family_size)
            .map(|i| Participant::new(format!("Smith {i}")).with_family("Smith"))
            .collect();
        participants.extend((0..others).map(|i| Participant::new(format!("Guest {i}"))));
        participants
    }

    #[test]
    fn perfect_matching_is_a_valid_pairing() {
        let matrix = CompatibilityMatrix::build(&family_heavy(3, 3));
        let matching = Matching::perfect(&matrix).unwrap();

        let mut seen = [false; 6];
        for giver in 0..6 {
            let receiver = matching.receiver_of(giver).unwrap();
            assert!(matrix.allows(giver, receiver));
            assert!(!seen[receiver]);
            seen[receiver] = true;
        }
    }

    #[test]
    fn family_majority_has_no_perfect_matching() {
        // Five Smiths need five non-Smith receivers but only four exist
        let matrix = CompatibilityMatrix::build(&family_heavy(5, 4));
        assert!(Matching::perfect(&matrix).is_none());
    }

    #[test]
    fn place_repairs_around_a_disagreeing_pair() {
        let participants = family_heavy(0, 4);
        let matrix = CompatibilityMatrix::build(&participants);
        let mut matching = Matching::perfect(&matrix).unwrap();
        let mut taken = vec![false; 4];

        let current = matching.receiver_of(0).unwrap();
        let other = (1..4).find(|&r| r != current).unwrap();
        taken[other] = true;

        assert!(matching.place(&matrix, &taken, 0, other));
        assert_eq!(matching.receiver_of(0), None);
        for giver in 1..4 {
            let receiver = matching.receiver_of(giver).unwrap();
            assert!(!taken[receiver]);
            assert!(matrix.allows(giver, receiver));
        }
    }

    #[test]
    fn place_rejects_a_pair_that_strands_someone() {
        // After B -> A, placing A -> B would leave C with only itself
        let participants = family_heavy(0, 3);
        let matrix = CompatibilityMatrix::build(&participants);
        let mut matching = Matching::perfect(&matrix).unwrap();
        let mut taken = vec![false; 3];

        taken[0] = true;
        assert!(matching.place(&matrix, &taken, 1, 0));

        let before = matching.clone();
        taken[1] = true;
        assert!(!matching.place(&matrix, &taken, 0, 1));
        assert_eq!(matching.receiver_of, before.receiver_of);
        assert_eq!(matching.giver_of, before.giver_of);
    }
}
