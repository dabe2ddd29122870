//! Property and scenario tests for the assignment engine.

use proptest::prelude::*;

use santa_core::{AssignmentEngine, AssignmentError, EngineConfig, Participant, verify};

const NAMES: [&str; 8] = ["Ann", "Ben", "Cat", "Dan", "Eve", "Fay", "Gus", "Hal"];

fn people(names: &[&str]) -> Vec<Participant> {
    names.iter().map(|name| Participant::new(*name)).collect()
}

fn target_of<'a>(participants: &'a [Participant], name: &str) -> &'a str {
    participants
        .iter()
        .find(|participant| participant.display_name == name)
        .and_then(|participant| participant.target.as_deref())
        .unwrap()
}

/// Build participants from generated family slots and previous-target indices.
fn build(families: &[Option<u8>], previous: &[Option<usize>]) -> Vec<Participant> {
    let n = families.len();
    families
        .iter()
        .zip(previous)
        .enumerate()
        .map(|(i, (family, previous))| {
            let mut participant = Participant::new(NAMES[i]);
            participant.family = family.map(|f| format!("family-{f}"));
            participant.previous_target = previous.map(|p| NAMES[p % n].to_string());
            participant
        })
        .collect()
}

/// Exhaustive check for any valid exchange.
fn exists_valid_exchange(participants: &[Participant]) -> bool {
    fn extend(participants: &[Participant], giver: usize, taken: &mut [bool]) -> bool {
        if giver == participants.len() {
            return true;
        }
        for receiver in 0..participants.len() {
            if !taken[receiver] && participants[giver].can_give_to(&participants[receiver]) {
                taken[receiver] = true;
                if extend(participants, giver + 1, taken) {
                    return true;
                }
                taken[receiver] = false;
            }
        }
        false
    }
    participants.len() != 1 && extend(participants, 0, &mut vec![false; participants.len()])
}

fn participants_strategy() -> impl Strategy<Value = Vec<Participant>> {
    (0_usize..=7).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::option::of(0_u8..3), n),
            prop::collection::vec(prop::option::of(0_usize..8), n),
        )
            .prop_map(|(families, previous)| build(&families, &previous))
    })
}

// =============================================================================
// Successful runs produce a valid exchange; failed runs change nothing
// =============================================================================
proptest! {
    #[test]
    fn result_is_valid_or_untouched(
        participants in participants_strategy(),
        seed in any::<u64>(),
        peeked in any::<bool>(),
    ) {
        let mut participants = participants;
        if let Some(first) = participants.first_mut() {
            first.is_target_known = peeked;
        }
        let before = participants.clone();
        let mut engine = AssignmentEngine::new(EngineConfig::unbounded().with_seed(seed));

        match engine.assign(&mut participants) {
            Ok(_) => {
                prop_assert_eq!(verify(&participants), Ok(()));
                for (after, before) in participants.iter().zip(&before) {
                    prop_assert_eq!(after.is_target_known, before.is_target_known);
                    prop_assert!(after.target.as_deref() != after.previous_target());
                }
            }
            Err(_) => {
                prop_assert_eq!(&participants, &before);
            }
        }
    }
}

// =============================================================================
// The search succeeds exactly when some valid exchange exists
// =============================================================================
proptest! {
    #[test]
    fn search_is_complete(
        participants in participants_strategy(),
        seed in any::<u64>(),
    ) {
        let expected = exists_valid_exchange(&participants);
        let mut engine = AssignmentEngine::new(EngineConfig::unbounded().with_seed(seed));

        let result = engine.plan(&participants);

        prop_assert_eq!(result.is_ok(), expected);
        if let Err(err) = result {
            let is_infeasible = matches!(err, AssignmentError::InfeasibleAssignment { .. });
            prop_assert!(is_infeasible);
        }
    }
}

#[test]
fn single_participant_always_fails() {
    for seed in 0..20 {
        let mut participants = people(&["Ann"]);
        let err = AssignmentEngine::with_seed(seed)
            .assign(&mut participants)
            .unwrap_err();
        assert_eq!(err, AssignmentError::InfeasibleAssignment { participants: 1 });
        assert!(participants[0].target.is_none());
    }
}

#[test]
fn empty_roster_succeeds_without_changes() {
    let mut participants: Vec<Participant> = Vec::new();
    santa_core::assign(&mut participants).unwrap();
    assert!(participants.is_empty());
}

#[test]
fn three_strangers_form_a_cycle() {
    let forward = [("A", "B"), ("B", "C"), ("C", "A")];
    let backward = [("A", "C"), ("B", "A"), ("C", "B")];

    for seed in 0..50 {
        let mut participants = people(&["A", "B", "C"]);
        AssignmentEngine::with_seed(seed)
            .assign(&mut participants)
            .unwrap();

        let pairs: Vec<(&str, &str)> = participants
            .iter()
            .map(|p| (p.display_name.as_str(), p.target.as_deref().unwrap()))
            .collect();
        assert!(
            pairs == forward || pairs == backward,
            "unexpected assignment {pairs:?}"
        );
    }
}

#[test]
fn two_from_one_family_is_infeasible() {
    let mut participants = vec![
        Participant::new("A").with_family("Smith"),
        Participant::new("B").with_family("Smith"),
    ];
    let before = participants.clone();

    let err = AssignmentEngine::with_seed(1)
        .assign(&mut participants)
        .unwrap_err();

    assert_eq!(err, AssignmentError::InfeasibleAssignment { participants: 2 });
    assert_eq!(participants, before);
}

#[test]
fn previous_target_is_never_repeated() {
    for seed in 0..100 {
        let mut participants = people(&["A", "B", "C", "D"]);
        participants[0].previous_target = Some("B".to_string());

        AssignmentEngine::with_seed(seed)
            .assign(&mut participants)
            .unwrap();

        assert_ne!(target_of(&participants, "A"), "B", "seed {seed}");
        assert_eq!(verify(&participants), Ok(()));
    }
}

#[test]
fn two_families_only_give_across() {
    for seed in 0..100 {
        let mut participants = vec![
            Participant::new("A").with_family("X"),
            Participant::new("B").with_family("X"),
            Participant::new("C").with_family("Y"),
            Participant::new("D").with_family("Y"),
        ];

        AssignmentEngine::with_seed(seed)
            .assign(&mut participants)
            .unwrap();

        assert_ne!(target_of(&participants, "A"), "B");
        assert_ne!(target_of(&participants, "B"), "A");
        assert_ne!(target_of(&participants, "C"), "D");
        assert_ne!(target_of(&participants, "D"), "C");
        assert_eq!(verify(&participants), Ok(()));
    }
}

#[test]
fn different_seeds_explore_different_pairings() {
    let mut seen = std::collections::HashSet::new();
    for seed in 0..50 {
        let mut participants = people(&NAMES);
        AssignmentEngine::with_seed(seed)
            .assign(&mut participants)
            .unwrap();
        let targets: Vec<String> = participants
            .into_iter()
            .filter_map(|participant| participant.target)
            .collect();
        seen.insert(targets);
    }
    assert!(seen.len() > 1);
}

#[test]
fn large_sparse_event_finishes_within_default_budget() {
    let mut participants: Vec<Participant> = (0..60)
        .map(|i| {
            Participant::new(format!("p{i}"))
                .with_family(format!("f{}", i / 3))
                .with_previous_target(format!("p{}", (i + 1) % 60))
        })
        .collect();

    AssignmentEngine::with_seed(2024)
        .assign(&mut participants)
        .unwrap();

    assert_eq!(verify(&participants), Ok(()));
}

fn smiths_and_guests(smiths: usize, guests: usize) -> Vec<Participant> {
    (0..smiths)
        .map(|i| Participant::new(format!("Smith {i}")).with_family("Smith"))
        .chain((0..guests).map(|i| Participant::new(format!("Guest {i}"))))
        .collect()
}

#[test]
fn family_majority_is_reported_infeasible() {
    for smiths in [4, 8, 11, 16] {
        let mut participants = smiths_and_guests(smiths, smiths - 1);
        let before = participants.clone();

        let err = AssignmentEngine::new(EngineConfig::default().with_seed(1))
            .assign(&mut participants)
            .unwrap_err();

        assert_eq!(
            err,
            AssignmentError::InfeasibleAssignment {
                participants: 2 * smiths - 1
            }
        );
        assert!(!err.is_retryable());
        assert_eq!(participants, before);
    }
}

#[test]
fn half_family_event_succeeds_for_every_seed() {
    for seed in 0..20 {
        let mut participants = smiths_and_guests(10, 10);

        AssignmentEngine::new(EngineConfig::default().with_seed(seed))
            .assign(&mut participants)
            .unwrap();

        assert_eq!(verify(&participants), Ok(()));
    }
}

#[test]
fn large_family_heavy_event_finishes_quickly() {
    for seed in 0..3 {
        let mut participants = smiths_and_guests(25, 25);
        participants.extend((0..10).map(|i| {
            Participant::new(format!("Jones {i}"))
                .with_family("Jones")
                .with_previous_target(format!("Guest {i}"))
        }));

        let stats = AssignmentEngine::new(EngineConfig::default().with_seed(seed))
            .assign(&mut participants)
            .unwrap();

        assert_eq!(verify(&participants), Ok(()));
        assert!(stats.steps <= 60 * 60, "took {} steps", stats.steps);
    }
}
