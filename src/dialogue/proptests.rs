//! Property-based tests for the dialogue state machine

use super::*;
use crate::sessions::Session;
use proptest::prelude::*;

fn arb_status() -> impl Strategy<Value = Option<Status>> {
    prop_oneof![
        Just(None),
        Just(Some(Status::Menu)),
        Just(Some(Status::Done)),
        Just(Some(Status::DisabilitasStatus)),
        Just(Some(Status::DisabilitasQ1)),
        Just(Some(Status::DisabilitasQ2)),
        Just(Some(Status::DisabilitasQ3)),
    ]
}

fn arb_input() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("0".to_string()),
        Just("6".to_string()),
        Just("ya".to_string()),
        Just("tidak".to_string()),
        "[0-9]{1,2}",
        "[ a-zA-Z]{0,12}",
    ]
}

fn session_for(status: Option<Status>, answers: usize) -> Option<Session> {
    status.map(|status| {
        let mut session = Session::new("P", status);
        let held = match status {
            Status::DisabilitasQ2 => 1,
            Status::DisabilitasQ3 => 2,
            _ => 0,
        };
        session.answers = (0..held.min(answers)).map(|i| format!("a{i}")).collect();
        session
    })
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in "[ \\tA-Za-z0-9]{0,24}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn answers_never_exceed_two(
        inputs in prop::collection::vec(arb_input(), 1..30),
    ) {
        let mut current: Option<Session> = None;
        for input in inputs {
            let step = transition("P", current.as_ref(), &normalize(&input));
            if let Some(next) = step.next {
                prop_assert!(next.answers.len() <= 2);
                current = Some(next);
            }
        }
    }

    #[test]
    fn done_without_zero_is_silent(input in arb_input()) {
        let input = normalize(&input);
        prop_assume!(input != "0");
        let current = Session::new("P", Status::Done);
        let step = transition("P", Some(&current), &input);
        prop_assert_eq!(step.reply, None);
        prop_assert_eq!(step.next.map(|s| s.status), Some(Status::Done));
    }

    #[test]
    fn every_present_state_yields_a_session(
        status in arb_status(),
        input in arb_input(),
        answers in 0usize..3,
    ) {
        let current = session_for(status, answers);
        let step = transition("P", current.as_ref(), &normalize(&input));
        prop_assert!(step.next.is_some());
        if step.completed_answers.is_some() {
            prop_assert_eq!(status, Some(Status::DisabilitasQ3));
        }
    }
}
