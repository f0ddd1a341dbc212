//! Property tests for score bounds, cache bounds and normalization.

use std::time::Duration;

use proptest::prelude::*;
use statline_round::{
    Action, LruCache, MAX_NORMALIZED_LEN, MatchingEngine, RevealReason, RoundRules, RoundState,
    Target, Timestamp, check_invariants, normalize,
};

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u64..200_000).prop_map(|now| Action::Tick { now: Timestamp::from_millis(now) }),
        ("[a-z ]{0,12}", 0u64..200_000)
            .prop_map(|(text, at)| Action::guess(text, Timestamp::from_millis(at))),
        Just(Action::Hint),
        (0u64..200_000).prop_map(|at| Action::reveal(RevealReason::GiveUp, Timestamp::from_millis(at))),
        Just(Action::Reset),
        (0u64..200_000, 0u64..300).prop_map(|(now, secs)| Action::Start {
            now: Timestamp::from_millis(now),
            duration: Duration::from_secs(secs),
        }),
    ]
}

proptest! {
    #[test]
    fn test_score_stays_in_range(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let rules = RoundRules::new();
        let mut state = RoundState::Idle;
        for action in &actions {
            if let Ok(next) = rules.reduce(&state, action) {
                state = next;
            }
            prop_assert!(check_invariants(&rules, &state).is_ok(), "{state:?}");
            if let Some(round) = state.active() {
                prop_assert!(*round.score() <= *rules.max_score());
            }
            if let Some(round) = state.revealed() {
                prop_assert!(*round.final_score() <= *rules.max_score());
            }
        }
    }

    #[test]
    fn test_lru_never_exceeds_capacity(
        capacity in 1usize..16,
        keys in prop::collection::vec(0u8..32, 0..100),
    ) {
        let mut cache = LruCache::new(capacity);
        for key in &keys {
            cache.insert(*key, ());
            prop_assert!(cache.len() <= capacity);
        }
        if let Some(last) = keys.last() {
            prop_assert!(cache.contains(last));
        }
    }

    #[test]
    fn test_normalize_is_idempotent(text in any::<String>()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(once.chars().count() <= MAX_NORMALIZED_LEN);
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
    }

    #[test]
    fn test_cached_verdicts_are_stable(input in "[A-Za-z ,.]{0,24}") {
        let engine = MatchingEngine::with_cache_capacity(2);
        let target = Target::new("BradTo00", "Tom", "Brady", "Tom Brady");
        let first = engine.is_match(&input, &target);
        prop_assert_eq!(engine.is_match(&input, &target), first);
        prop_assert_eq!(engine.explain(&input, &target).is_some(), first);
    }
}

#[test]
fn test_least_recently_used_is_evicted() {
    let mut cache = LruCache::new(2);
    cache.insert("a", 1);
    cache.insert("b", 2);
    assert_eq!(cache.get(&"a"), Some(&1));
    assert_eq!(cache.insert("c", 3), Some("b"));
    assert!(!cache.contains(&"b"));
    assert_eq!(cache.keys_by_recency(), vec![&"c", &"a"]);
}
