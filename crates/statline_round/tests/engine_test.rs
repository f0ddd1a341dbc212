//! End-to-end rounds through the engine with a manual clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use statline_round::{
    GuessOutcome, ManualClock, MatchingEngine, RevealReason, RoundEngine, RoundPhase, RoundRules,
    RoundState, Target, Timestamp,
};

fn engine() -> RoundEngine<Arc<ManualClock>> {
    RoundEngine::new(
        RoundRules::new(),
        MatchingEngine::new(),
        Arc::new(ManualClock::new(Timestamp::from_millis(1_000))),
    )
}

fn manning() -> Target {
    Target::new("MannPe00", "Peyton", "Manning", "Peyton Manning").with_aliases(["The Sheriff"])
}

#[test]
fn test_third_wrong_guess_ends_round() {
    let mut engine = engine();
    engine.start(manning(), Duration::from_secs(60)).expect("start");

    assert_eq!(
        engine.submit_guess("Tom Brady").expect("guess"),
        GuessOutcome::Incorrect { remaining: 2 }
    );
    assert_eq!(
        engine.submit_guess("Drew Brees").expect("guess"),
        GuessOutcome::Incorrect { remaining: 1 }
    );
    assert_eq!(
        engine.submit_guess("Eli Manning").expect("guess"),
        GuessOutcome::Incorrect { remaining: 0 }
    );

    let revealed = engine.state().revealed().expect("revealed");
    assert_eq!(*revealed.reason(), RevealReason::MaxGuesses);
    assert_eq!(*revealed.final_score(), 4);
}

#[test]
fn test_correct_last_guess_is_solved() {
    let mut engine = engine();
    engine.start(manning(), Duration::from_secs(60)).expect("start");
    engine.submit_guess("Tom Brady").expect("guess");
    engine.submit_guess("Drew Brees").expect("guess");

    assert_eq!(engine.submit_guess("the sheriff").expect("guess"), GuessOutcome::Correct);
    let revealed = engine.state().revealed().expect("revealed");
    assert!(revealed.is_solved());
    assert_eq!(*revealed.final_score(), 5);
    assert_eq!(revealed.guesses().len(), 3);
}

#[test]
fn test_solve_notifies_once() {
    let mut engine = engine();
    let phases = Arc::new(Mutex::new(Vec::new()));
    let sink = phases.clone();
    engine.subscribe(move |previous: &RoundState, next: &RoundState| {
        sink.lock()
            .expect("observer lock")
            .push((previous.phase(), next.phase()));
    });

    engine.start(manning(), Duration::from_secs(60)).expect("start");
    engine.submit_guess("Peyton Manning").expect("guess");

    let phases = phases.lock().expect("observer lock");
    assert_eq!(
        *phases,
        vec![
            (RoundPhase::Idle, RoundPhase::Active),
            (RoundPhase::Active, RoundPhase::Revealed),
        ]
    );
}

#[test]
fn test_hints_then_timeout() {
    let mut engine = engine();
    engine.start(manning(), Duration::from_secs(30)).expect("start");
    assert_eq!(engine.request_hint().expect("hint"), Some(1));
    assert_eq!(engine.request_hint().expect("hint"), Some(2));

    engine.clock().advance(Duration::from_millis(29_999));
    engine.tick().expect("tick");
    assert_eq!(engine.remaining(), Some(Duration::from_millis(1)));

    engine.clock().advance(Duration::from_millis(1));
    engine.tick().expect("tick");
    let revealed = engine.state().revealed().expect("revealed");
    assert_eq!(*revealed.reason(), RevealReason::Timeout);
    assert_eq!(*revealed.final_score(), 2);
    assert_eq!(*revealed.hints_used(), 2);
}

#[test]
fn test_give_up_then_new_round() {
    let mut engine = engine();
    engine.start(manning(), Duration::from_secs(60)).expect("start");
    engine.give_up().expect("give up");
    assert!(engine.start(manning(), Duration::from_secs(60)).is_err());

    engine.reset().expect("reset");
    assert_eq!(engine.state(), &RoundState::Idle);
    engine
        .start(Target::new("BradTo00", "Tom", "Brady", "Tom Brady"), Duration::from_secs(60))
        .expect("second round");
    assert_eq!(engine.target().map(|t| t.id().as_str()), Some("BradTo00"));
}

#[test]
fn test_errors_leave_state_unchanged() {
    let mut engine = engine();
    assert!(engine.submit_guess("Tom Brady").expect_err("idle").is_transition());
    assert!(engine.request_hint().is_err());
    assert_eq!(engine.state(), &RoundState::Idle);

    engine.start(manning(), Duration::from_secs(60)).expect("start");
    let before = engine.state().clone();
    assert!(engine.submit_guess("  ").expect_err("blank").is_validation());
    assert!(engine.reset().is_err());
    assert_eq!(engine.state(), &before);
}
