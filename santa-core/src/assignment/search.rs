//! Backtracking search over participant indices.
//!
//! Givers are placed one at a time in a fixed (shuffled) order. Each level
//! tries the free receivers compatible with the current giver, again in a
//! fixed (shuffled) order. Tentative placements live only in this module's
//! scratch vectors; participant records are never touched here.
//!
//! Before the first placement the whole roster must admit a perfect
//! matching, otherwise the search reports exhaustion without taking a step.
//! After that, a placement is only kept if the givers still waiting can all
//! be matched to the receivers still free. A kept placement therefore never
//! leads into a dead subtree.

use std::time::{Duration, Instant};

use super::matching::Matching;
use crate::participant::Participant;

/// How often (in steps) the wall clock is consulted.
const CLOCK_CHECK_INTERVAL: u64 = 64;

/// Pairwise "may give to" table, indexed `[giver * n + receiver]`.
#[derive(Debug, Clone)]
pub(crate) struct CompatibilityMatrix {
    n: usize,
    allowed: Vec<bool>,
}

impl CompatibilityMatrix {
    pub(crate) fn build(participants: &[Participant]) -> Self {
        let n = participants.len();
        let mut allowed = Vec::with_capacity(n * n);
        for giver in participants {
            for receiver in participants {
                allowed.push(giver.can_give_to(receiver));
            }
        }
        Self { n, allowed }
    }

    pub(crate) fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub(crate) fn allows(&self, giver: usize, receiver: usize) -> bool {
        self.allowed[giver * self.n + receiver]
    }
}

/// Limits on how much work one search may do.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Budget {
    pub max_steps: Option<u64>,
    pub time_budget: Option<Duration>,
}

/// Search aborted because a budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Interrupted {
    pub steps: u64,
}

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    /// `targets[giver]` is the receiver index for every giver.
    Found(Vec<usize>),
    /// Every branch was explored without finding a valid assignment.
    Exhausted,
}

pub(crate) struct Search<'a> {
    matrix: &'a CompatibilityMatrix,
    giver_order: &'a [usize],
    receiver_order: &'a [usize],
    target_of: Vec<Option<usize>>,
    receiver_taken: Vec<bool>,
    budget: Budget,
    started: Instant,
    steps: u64,
}

impl<'a> Search<'a> {
    pub(crate) fn new(
        matrix: &'a CompatibilityMatrix,
        giver_order: &'a [usize],
        receiver_order: &'a [usize],
        budget: Budget,
    ) -> Self {
        let n = matrix.len();
        debug_assert_eq!(giver_order.len(), n);
        debug_assert_eq!(receiver_order.len(), n);
        Self {
            matrix,
            giver_order,
            receiver_order,
            target_of: vec![None; n],
            receiver_taken: vec![false; n],
            budget,
            started: Instant::now(),
            steps: 0,
        }
    }

    /// Run the search to success, exhaustion, or budget interruption.
    pub(crate) fn run(mut self) -> (Result<SearchOutcome, Interrupted>, u64) {
        if self.matrix.len() == 0 {
            return (Ok(SearchOutcome::Found(Vec::new())), 0);
        }
        let Some(mut matching) = Matching::perfect(self.matrix) else {
            return (Ok(SearchOutcome::Exhausted), 0);
        };

        let result = match self.place_from(0, &mut matching) {
            Ok(true) => {
                let targets = self
                    .target_of
                    .iter()
                    .map(|target| target.unwrap_or_default())
                    .collect();
                Ok(SearchOutcome::Found(targets))
            }
            Ok(false) => Ok(SearchOutcome::Exhausted),
            Err(interrupted) => Err(interrupted),
        };
        let steps = self.steps;
        (result, steps)
    }

    /// Assign a target to `giver_order[depth]` and everyone after it.
    ///
    /// `matching` pairs the givers from `depth` onward with the free
    /// receivers. Returns `Ok(true)` with `target_of` fully populated on
    /// success. On `Ok(false)` every placement made at or below `depth` has
    /// been undone and `matching` is restored.
    fn place_from(&mut self, depth: usize, matching: &mut Matching) -> Result<bool, Interrupted> {
        let giver = self.giver_order[depth];
        let last = depth + 1 == self.giver_order.len();

        for slot in 0..self.receiver_order.len() {
            let receiver = self.receiver_order[slot];
            if self.receiver_taken[receiver] || !self.matrix.allows(giver, receiver) {
                continue;
            }

            self.tick()?;
            let saved = matching.clone();
            self.receiver_taken[receiver] = true;
            if !matching.place(self.matrix, &self.receiver_taken, giver, receiver) {
                self.receiver_taken[receiver] = false;
                continue;
            }
            self.target_of[giver] = Some(receiver);

            if last || self.place_from(depth + 1, matching)? {
                return Ok(true);
            }

            self.target_of[giver] = None;
            self.receiver_taken[receiver] = false;
            *matching = saved;
        }

        Ok(false)
    }

    fn tick(&mut self) -> Result<(), Interrupted> {
        self.steps += 1;
        if let Some(max_steps) = self.budget.max_steps
            && self.steps > max_steps
        {
            return Err(Interrupted { steps: self.steps - 1 });
        }
        if let Some(time_budget) = self.budget.time_budget
            && self.steps % CLOCK_CHECK_INTERVAL == 0
            && self.started.elapsed() > time_budget
        {
            return Err(Interrupted { steps: self.steps });
        }
        Ok(())
    }
}
