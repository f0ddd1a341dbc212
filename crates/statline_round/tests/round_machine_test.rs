//! Transition-table tests for the round reducer.

use std::time::Duration;

use statline_round::{
    Action, ActionFault, RevealReason, RoundError, RoundMachine, RoundPhase, RoundRules, RoundState,
    Timestamp,
};

fn ms(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

fn start(rules: &RoundRules, duration_secs: u64) -> RoundState {
    rules
        .reduce(
            &RoundState::Idle,
            &Action::Start {
                now: ms(0),
                duration: Duration::from_secs(duration_secs),
            },
        )
        .expect("start from idle")
}

fn revealed(state: &RoundState) -> &statline_round::RevealedRound {
    state.revealed().expect("round should be revealed")
}

#[test]
fn test_reset_from_idle_is_idempotent() {
    let rules = RoundRules::new();
    let once = rules.reduce(&RoundState::Idle, &Action::Reset).expect("reset");
    let twice = rules.reduce(&once, &Action::Reset).expect("reset");
    assert_eq!(once, RoundState::Idle);
    assert_eq!(twice, RoundState::Idle);
}

#[test]
fn test_timeout_boundary() {
    let rules = RoundRules::new();
    let state = start(&rules, 60);

    let still_active = rules.reduce(&state, &Action::Tick { now: ms(59_999) }).expect("tick");
    assert_eq!(still_active, state);

    let timed_out = rules.reduce(&state, &Action::Tick { now: ms(60_000) }).expect("tick");
    let round = revealed(&timed_out);
    assert_eq!(*round.reason(), RevealReason::Timeout);
    assert_eq!(*round.final_score(), 4);
    assert_eq!(*round.ended_at(), ms(60_000));
}

#[test]
fn test_three_wrong_guesses_exhaust_budget() {
    let rules = RoundRules::new();
    let mut state = start(&rules, 60);
    for (i, guess) in ["Peyton Manning", "Drew Brees", "Aaron Rodgers"].iter().enumerate() {
        assert_eq!(state.phase(), RoundPhase::Active, "round ended early at guess {i}");
        state = rules.reduce(&state, &Action::guess(*guess, ms(1_000))).expect("guess");
    }
    let round = revealed(&state);
    assert_eq!(*round.reason(), RevealReason::MaxGuesses);
    assert_eq!(*round.final_score(), 4);
    assert_eq!(round.guesses().len(), 3);
}

#[test]
fn test_duplicate_guesses_are_not_counted() {
    let rules = RoundRules::new();
    let state = start(&rules, 60);
    let state = rules.reduce(&state, &Action::guess("Drew Brees", ms(1))).expect("guess");
    let again = rules.reduce(&state, &Action::guess("  Drew   Brees ", ms(2))).expect("guess");
    assert_eq!(again, state);
    assert_eq!(again.guesses(), ["Drew Brees".to_string()]);
}

#[test]
fn test_guess_is_truncated() {
    let rules = RoundRules::new();
    let state = start(&rules, 60);
    let long = "x".repeat(250);
    let state = rules.reduce(&state, &Action::guess(long, ms(1))).expect("guess");
    assert_eq!(state.guesses()[0].chars().count(), 100);
}

#[test]
fn test_hints_cost_points_until_cap() {
    let rules = RoundRules::new();
    let mut state = start(&rules, 60);
    for _ in 0..10 {
        state = rules.reduce(&state, &Action::Hint).expect("hint");
    }
    let round = state.active().expect("still active");
    assert_eq!(*round.hints_used(), 3);
    assert_eq!(*round.score(), 2);
}

#[test]
fn test_give_up_and_solve_keep_score() {
    let rules = RoundRules::new();
    let state = rules.reduce(&start(&rules, 60), &Action::Hint).expect("hint");

    for reason in [RevealReason::GiveUp, RevealReason::Solved] {
        let next = rules.reduce(&state, &Action::reveal(reason, ms(5))).expect("reveal");
        assert_eq!(*revealed(&next).reason(), reason);
        assert_eq!(*revealed(&next).final_score(), 4);
        assert_eq!(*revealed(&next).hints_used(), 1);
    }
}

#[test]
fn test_revealed_only_accepts_reset() {
    let rules = RoundRules::new();
    let state = rules
        .reduce(&start(&rules, 60), &Action::reveal(RevealReason::GiveUp, ms(5)))
        .expect("reveal");

    let rejected = [
        Action::Start { now: ms(10), duration: Duration::from_secs(60) },
        Action::Tick { now: ms(10) },
        Action::guess("anyone", ms(10)),
        Action::Hint,
        Action::reveal(RevealReason::Solved, ms(10)),
    ];
    for action in rejected {
        let err = rules.reduce(&state, &action).expect_err("revealed rejects");
        assert_eq!(
            err,
            RoundError::InvalidTransition {
                action: action.clone(),
                state: Box::new(state.clone()),
            }
        );
    }

    assert_eq!(rules.reduce(&state, &Action::Reset).expect("reset"), RoundState::Idle);
}

#[test]
fn test_idle_rejects_round_actions() {
    let rules = RoundRules::new();
    for action in [
        Action::Tick { now: ms(1) },
        Action::guess("Tom Brady", ms(1)),
        Action::Hint,
        Action::reveal(RevealReason::GiveUp, ms(1)),
    ] {
        let err = rules.reduce(&RoundState::Idle, &action).expect_err("idle rejects");
        assert!(err.is_transition(), "{action} should be a transition error");
        assert_eq!(err.action(), &action);
    }
}

#[test]
fn test_active_rejects_start_and_reset() {
    let rules = RoundRules::new();
    let state = start(&rules, 60);
    for action in [
        Action::Start { now: ms(1), duration: Duration::from_secs(60) },
        Action::Reset,
    ] {
        assert!(rules.reduce(&state, &action).expect_err("active rejects").is_transition());
    }
}

#[test]
fn test_validation_errors_are_distinct() {
    let rules = RoundRules::new();
    let active = rules
        .reduce(
            &RoundState::Idle,
            &Action::Start { now: ms(1_000), duration: Duration::from_secs(60) },
        )
        .expect("start");

    let blank = rules.reduce(&active, &Action::guess("   ", ms(2_000))).expect_err("blank");
    assert!(matches!(blank, RoundError::InvalidAction { fault: ActionFault::BlankGuess, .. }));

    let reason = rules
        .reduce(&active, &Action::reveal(RevealReason::MaxGuesses, ms(2_000)))
        .expect_err("unrequestable");
    assert!(matches!(
        reason,
        RoundError::InvalidAction { fault: ActionFault::UnrequestableReason(RevealReason::MaxGuesses), .. }
    ));

    let early = rules.reduce(&active, &Action::Tick { now: ms(500) }).expect_err("early tick");
    assert!(early.is_validation());

    // Payload problems are reported even in the wrong phase.
    let idle = rules
        .reduce(&RoundState::Idle, &Action::reveal(RevealReason::Timeout, ms(0)))
        .expect_err("validation first");
    assert!(idle.is_validation());
}

#[test]
fn test_start_without_representable_deadline_is_rejected() {
    let rules = RoundRules::new();
    let last = Timestamp::from_millis(u64::MAX);
    let start = Action::Start { now: last, duration: Duration::from_secs(60) };

    let err = rules.reduce(&RoundState::Idle, &start).expect_err("no room for a deadline");
    assert!(matches!(
        err,
        RoundError::InvalidAction { fault: ActionFault::DeadlineOverflow { start: at }, .. } if at == last
    ));

    let mut machine = RoundMachine::new(rules);
    assert!(machine.dispatch(start).expect_err("machine rejects").is_validation());
    assert_eq!(machine.state(), &RoundState::Idle);

    let near_end = Action::Start {
        now: ms(u64::MAX - 1),
        duration: Duration::from_secs(60),
    };
    let state = machine.dispatch(near_end).expect("one millisecond left is enough");
    let round = state.active().expect("active round");
    assert!(round.deadline() > round.started_at());
}

#[test]
fn test_reduce_never_mutates_input() {
    let rules = RoundRules::new();
    let state = start(&rules, 60);
    let snapshot = state.clone();
    let _ = rules.reduce(&state, &Action::guess("Drew Brees", ms(1)));
    let _ = rules.reduce(&state, &Action::Hint);
    let _ = rules.reduce(&state, &Action::Reset);
    assert_eq!(state, snapshot);
}
