//! The assignment engine.
//!
//! [`AssignmentEngine::plan`] searches for a valid exchange without touching
//! the participants; [`AssignmentEngine::assign`] plans and then commits the
//! targets in one pass. A failed search therefore never leaves a partial
//! assignment behind.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, debug_span, warn};

use super::search::{Budget, CompatibilityMatrix, Search, SearchOutcome};
use crate::config::EngineConfig;
use crate::error::AssignmentError;
use crate::participant::Participant;

/// Work done by one successful search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// Tentative assignments made, including ones later undone.
    pub steps: u64,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// A complete, valid exchange that has not yet been written to participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentPlan {
    /// `targets[i]` is the index of the participant that participant `i` gives to.
    targets: Vec<usize>,
    stats: SearchStats,
}

impl AssignmentPlan {
    /// Receiver index for each giver index.
    pub fn targets(&self) -> &[usize] {
        &self.targets
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Write the planned targets onto the participants the plan was made for.
    ///
    /// `is_target_known` is left alone.
    pub fn apply(&self, participants: &mut [Participant]) {
        debug_assert_eq!(participants.len(), self.targets.len());
        let names: Vec<String> = participants
            .iter()
            .map(|participant| participant.display_name.clone())
            .collect();
        for (participant, &target) in participants.iter_mut().zip(&self.targets) {
            participant.target = Some(names[target].clone());
        }
    }
}

/// Finds gift-exchange assignments that respect the exclusion rules
///
/// Every giver gets exactly one receiver and every receiver exactly one
/// giver; nobody gives to themself, to their own family, or to the person
/// they gave to in the previous event.
///
/// The search order is shuffled from the engine's RNG so repeated runs over
/// the same participants explore different pairings first. The first valid
/// exchange found is returned.
pub struct AssignmentEngine {
    config: EngineConfig,
    rng: StdRng,
}

impl AssignmentEngine {
    /// Create an engine. The RNG is seeded from `config.seed` when present,
    /// otherwise from OS entropy.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Create an engine with a fixed seed and otherwise default config (for testing).
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig::default().with_seed(seed))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assign a target to every participant.
    ///
    /// An empty slice succeeds without doing anything. On error no
    /// participant is modified.
    pub fn assign(
        &mut self,
        participants: &mut [Participant],
    ) -> Result<SearchStats, AssignmentError> {
        let plan = self.plan(participants)?;
        plan.apply(participants);
        Ok(plan.stats())
    }

    /// Search for a valid exchange without modifying the participants.
    pub fn plan(&mut self, participants: &[Participant]) -> Result<AssignmentPlan, AssignmentError> {
        let n = participants.len();
        let _span = debug_span!("assign", participants = n).entered();

        ensure_unique_names(participants)?;

        if n == 0 {
            debug!("No participants, nothing to assign");
            return Ok(AssignmentPlan {
                targets: Vec::new(),
                stats: SearchStats {
                    steps: 0,
                    elapsed: Duration::ZERO,
                },
            });
        }
        if n == 1 {
            warn!("A single participant can only give to themself");
            return Err(AssignmentError::InfeasibleAssignment { participants: 1 });
        }

        let matrix = CompatibilityMatrix::build(participants);
        let mut giver_order: Vec<usize> = (0..n).collect();
        let mut receiver_order: Vec<usize> = (0..n).collect();
        giver_order.shuffle(&mut self.rng);
        receiver_order.shuffle(&mut self.rng);

        let budget = Budget {
            max_steps: self.config.max_steps,
            time_budget: self.config.time_budget,
        };
        let started = Instant::now();
        let (outcome, steps) = Search::new(&matrix, &giver_order, &receiver_order, budget).run();
        let elapsed = started.elapsed();

        match outcome {
            Ok(SearchOutcome::Found(targets)) => {
                debug!(steps, elapsed_ms = elapsed.as_millis() as u64, "Assignment found");
                Ok(AssignmentPlan {
                    targets,
                    stats: SearchStats { steps, elapsed },
                })
            }
            Ok(SearchOutcome::Exhausted) => {
                warn!(steps, "No valid assignment exists; the constraints rule out a full pairing");
                Err(AssignmentError::InfeasibleAssignment { participants: n })
            }
            Err(interrupted) => {
                warn!(
                    steps = interrupted.steps,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Assignment search ran out of budget"
                );
                Err(AssignmentError::SearchBudgetExhausted {
                    steps: interrupted.steps,
                })
            }
        }
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

fn ensure_unique_names(participants: &[Participant]) -> Result<(), AssignmentError> {
    let mut seen = HashSet::with_capacity(participants.len());
    for participant in participants {
        if !seen.insert(participant.display_name.as_str()) {
            return Err(AssignmentError::DuplicateDisplayName(
                participant.display_name.clone(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::verify;

    fn people(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|name| Participant::new(*name)).collect()
    }

    #[test]
    fn assigns_every_participant() {
        let mut participants = people(&["A", "B", "C", "D", "E"]);
        let mut engine = AssignmentEngine::with_seed(1);

        let stats = engine.assign(&mut participants).unwrap();

        assert!(stats.steps >= 5);
        assert_eq!(verify(&participants), Ok(()));
    }

    #[test]
    fn same_seed_gives_same_assignment() {
        let mut first = people(&["A", "B", "C", "D", "E", "F"]);
        let mut second = first.clone();

        AssignmentEngine::with_seed(99).assign(&mut first).unwrap();
        AssignmentEngine::with_seed(99).assign(&mut second).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn plan_leaves_participants_untouched() {
        let participants = people(&["A", "B", "C"]);
        let before = participants.clone();

        let plan = AssignmentEngine::with_seed(3).plan(&participants).unwrap();

        assert_eq!(participants, before);
        assert_eq!(plan.targets().len(), 3);
    }

    #[test]
    fn apply_preserves_target_known_flag() {
        let mut participants = people(&["A", "B"]);
        participants[0].is_target_known = true;

        AssignmentEngine::with_seed(5).assign(&mut participants).unwrap();

        assert!(participants[0].is_target_known);
        assert_eq!(participants[0].target.as_deref(), Some("B"));
        assert_eq!(participants[1].target.as_deref(), Some("A"));
    }

    #[test]
    fn empty_is_noop() {
        let mut participants: Vec<Participant> = Vec::new();
        let stats = AssignmentEngine::with_seed(0).assign(&mut participants).unwrap();
        assert_eq!(stats.steps, 0);
    }

    #[test]
    fn single_participant_is_infeasible() {
        let mut participants = people(&["A"]);
        let err = AssignmentEngine::with_seed(0)
            .assign(&mut participants)
            .unwrap_err();
        assert_eq!(err, AssignmentError::InfeasibleAssignment { participants: 1 });
        assert!(participants[0].target.is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut participants = people(&["A", "B", "A"]);
        let err = AssignmentEngine::with_seed(0)
            .assign(&mut participants)
            .unwrap_err();
        assert_eq!(err, AssignmentError::DuplicateDisplayName("A".to_string()));
    }

    #[test]
    fn budget_exhaustion_leaves_targets_untouched() {
        let mut participants = people(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        participants[0].target = Some("stale".to_string());
        let before = participants.clone();
        let config = EngineConfig::unbounded().with_seed(11).with_max_steps(3);

        let err = AssignmentEngine::new(config)
            .assign(&mut participants)
            .unwrap_err();

        assert_eq!(err, AssignmentError::SearchBudgetExhausted { steps: 3 });
        assert_eq!(participants, before);
    }

    #[test]
    fn time_budget_exhaustion_leaves_targets_untouched() {
        let names: Vec<String> = (0..200).map(|i| format!("P{i}")).collect();
        let mut participants: Vec<Participant> = names.iter().map(Participant::new).collect();
        participants[3].target = Some("stale".to_string());
        let before = participants.clone();
        let config = EngineConfig::unbounded()
            .with_seed(12)
            .with_time_budget(Duration::ZERO);

        let err = AssignmentEngine::new(config)
            .assign(&mut participants)
            .unwrap_err();

        assert!(matches!(err, AssignmentError::SearchBudgetExhausted { steps } if steps > 0));
        assert!(err.is_retryable());
        assert_eq!(participants, before);
    }

    #[test]
    fn family_majority_is_infeasible_not_exhausted() {
        let mut participants: Vec<Participant> = (0..8)
            .map(|i| Participant::new(format!("Smith {i}")).with_family("Smith"))
            .chain((0..7).map(|i| Participant::new(format!("Guest {i}"))))
            .collect();

        let err = AssignmentEngine::with_seed(1)
            .assign(&mut participants)
            .unwrap_err();

        assert_eq!(err, AssignmentError::InfeasibleAssignment { participants: 15 });
        assert!(!err.is_retryable());
    }
}
