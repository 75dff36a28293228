//! Pure state transition function
//!
//! The whole menu tree lives in [`RULES`]. [`transition`] walks the table in
//! order and applies the first rule whose source state and input pattern
//! match. It performs no I/O and never touches the session store.

use super::{Reply, Status};
use crate::sessions::Session;

/// Input accepted by a rule, compared against normalized text.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    Any,
    OneOf(&'static [&'static str]),
}

impl Pattern {
    fn matches(self, input: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(options) => options.contains(&input),
        }
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// `None` matches a sender with no session.
    pub from: Option<Status>,
    pub on: Pattern,
    pub to: Status,
    /// Append the input to the session's answers.
    pub capture: bool,
    pub reply: Option<Reply>,
}

const fn rule(
    from: Option<Status>,
    on: Pattern,
    to: Status,
    capture: bool,
    reply: Option<Reply>,
) -> Rule {
    Rule {
        from,
        on,
        to,
        capture,
        reply,
    }
}

const RESET_KEYWORD: &[&str] = &["0"];
const REQUEST_SERVICES: &[&str] = &["1", "2", "3", "4", "5"];
const ACCESSIBILITY_SERVICE: &[&str] = &["6"];
const YES: &[&str] = &["ya"];
const NO: &[&str] = &["tidak"];

// Order matters: within a state, specific patterns precede `Any`.
pub const RULES: &[Rule] = &[
    rule(None, Pattern::Any, Status::Menu, false, Some(Reply::Welcome)),
    rule(
        Some(Status::Done),
        Pattern::OneOf(RESET_KEYWORD),
        Status::Menu,
        false,
        Some(Reply::Welcome),
    ),
    rule(Some(Status::Done), Pattern::Any, Status::Done, false, None),
    rule(
        Some(Status::Menu),
        Pattern::OneOf(REQUEST_SERVICES),
        Status::Done,
        false,
        Some(Reply::RequestAcknowledged),
    ),
    rule(
        Some(Status::Menu),
        Pattern::OneOf(ACCESSIBILITY_SERVICE),
        Status::DisabilitasStatus,
        false,
        Some(Reply::DisabilityIntro),
    ),
    rule(
        Some(Status::Menu),
        Pattern::Any,
        Status::Menu,
        false,
        Some(Reply::ChooseMenu),
    ),
    rule(
        Some(Status::DisabilitasStatus),
        Pattern::OneOf(YES),
        Status::DisabilitasQ1,
        false,
        Some(Reply::AskDisabilityType),
    ),
    rule(
        Some(Status::DisabilitasStatus),
        Pattern::OneOf(NO),
        Status::Done,
        false,
        Some(Reply::InformationAcknowledged),
    ),
    rule(
        Some(Status::DisabilitasStatus),
        Pattern::Any,
        Status::DisabilitasStatus,
        false,
        Some(Reply::AskYesNo),
    ),
    rule(
        Some(Status::DisabilitasQ1),
        Pattern::Any,
        Status::DisabilitasQ2,
        true,
        Some(Reply::AskAdditionalService),
    ),
    rule(
        Some(Status::DisabilitasQ2),
        Pattern::Any,
        Status::DisabilitasQ3,
        true,
        Some(Reply::AskAccessibility),
    ),
    rule(
        Some(Status::DisabilitasQ3),
        Pattern::Any,
        Status::Done,
        true,
        Some(Reply::InformationAcknowledged),
    ),
];

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Session to store; `None` leaves an absent sender absent.
    pub next: Option<Session>,
    pub reply: Option<Reply>,
    /// All answers of a questionnaire that just finished, in order.
    pub completed_answers: Option<Vec<String>>,
}

/// Pure transition function over already-normalized input.
pub fn transition(sender_id: &str, current: Option<&Session>, input: &str) -> Transition {
    apply(RULES, sender_id, current, input)
}

fn apply(rules: &[Rule], sender_id: &str, current: Option<&Session>, input: &str) -> Transition {
    let status = current.map(|s| s.status);
    let Some(rule) = rules
        .iter()
        .find(|r| r.from == status && r.on.matches(input))
    else {
        return Transition {
            next: current.cloned(),
            reply: Some(Reply::FinishPreviousStep),
            completed_answers: None,
        };
    };

    let mut answers = match (rule.capture, current) {
        (true, Some(session)) => session.answers.clone(),
        _ => Vec::new(),
    };
    if rule.capture {
        answers.push(input.to_string());
    }

    let mut completed_answers = None;
    if !rule.to.is_questionnaire() && rule.capture {
        completed_answers = Some(std::mem::take(&mut answers));
    }

    Transition {
        next: Some(Session {
            sender_id: sender_id.to_string(),
            status: rule.to,
            answers,
        }),
        reply: rule.reply,
        completed_answers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(status: Status) -> Session {
        Session::new("A", status)
    }

    fn status_after(current: Option<Status>, input: &str) -> Option<Status> {
        let current = current.map(session);
        transition("A", current.as_ref(), input)
            .next
            .map(|s| s.status)
    }

    #[test]
    fn absent_sender_always_gets_welcome() {
        for input in ["halo", "6", "0", "", "ya"] {
            let t = transition("A", None, input);
            assert_eq!(t.reply, Some(Reply::Welcome));
            assert_eq!(t.next.unwrap().status, Status::Menu);
        }
    }

    #[test]
    fn menu_request_services_finish_immediately() {
        for input in ["1", "2", "3", "4", "5"] {
            let t = transition("A", Some(&session(Status::Menu)), input);
            assert_eq!(t.reply, Some(Reply::RequestAcknowledged));
            assert_eq!(t.next.unwrap().status, Status::Done);
        }
    }

    #[test]
    fn menu_six_enters_accessibility_flow() {
        let t = transition("A", Some(&session(Status::Menu)), "6");
        assert_eq!(t.reply, Some(Reply::DisabilityIntro));
        assert_eq!(t.next.unwrap().status, Status::DisabilitasStatus);
    }

    #[test]
    fn menu_rejects_unknown_choice() {
        for input in ["7", "0", "satu", "", "12"] {
            let t = transition("A", Some(&session(Status::Menu)), input);
            assert_eq!(t.reply, Some(Reply::ChooseMenu));
            assert_eq!(t.next.unwrap().status, Status::Menu);
        }
    }

    #[test]
    fn yes_no_gate() {
        assert_eq!(
            status_after(Some(Status::DisabilitasStatus), "ya"),
            Some(Status::DisabilitasQ1)
        );
        assert_eq!(
            status_after(Some(Status::DisabilitasStatus), "tidak"),
            Some(Status::Done)
        );

        let t = transition("A", Some(&session(Status::DisabilitasStatus)), "mungkin");
        assert_eq!(t.reply, Some(Reply::AskYesNo));
        assert_eq!(t.next.unwrap().status, Status::DisabilitasStatus);
    }

    #[test]
    fn declining_accessibility_completes_without_answers() {
        let t = transition("A", Some(&session(Status::DisabilitasStatus)), "tidak");
        assert_eq!(t.reply, Some(Reply::InformationAcknowledged));
        assert!(t.completed_answers.is_none());
    }

    #[test]
    fn questionnaire_accumulates_then_completes() {
        let t1 = transition("A", Some(&session(Status::DisabilitasQ1)), "tunarungu");
        let s1 = t1.next.unwrap();
        assert_eq!(s1.status, Status::DisabilitasQ2);
        assert_eq!(s1.answers, vec!["tunarungu"]);
        assert_eq!(t1.reply, Some(Reply::AskAdditionalService));

        let t2 = transition("A", Some(&s1), "");
        let s2 = t2.next.unwrap();
        assert_eq!(s2.status, Status::DisabilitasQ3);
        assert_eq!(s2.answers, vec!["tunarungu", ""]);
        assert_eq!(t2.reply, Some(Reply::AskAccessibility));

        let t3 = transition("A", Some(&s2), "kursi roda");
        let s3 = t3.next.unwrap();
        assert_eq!(s3.status, Status::Done);
        assert!(s3.answers.is_empty());
        assert_eq!(t3.reply, Some(Reply::InformationAcknowledged));
        assert_eq!(
            t3.completed_answers,
            Some(vec![
                "tunarungu".to_string(),
                String::new(),
                "kursi roda".to_string()
            ])
        );
    }

    #[test]
    fn done_only_resumes_on_zero() {
        let t = transition("A", Some(&session(Status::Done)), "0");
        assert_eq!(t.reply, Some(Reply::Welcome));
        assert_eq!(t.next.unwrap().status, Status::Menu);

        for input in ["1", "menu", "", "00"] {
            let t = transition("A", Some(&session(Status::Done)), input);
            assert_eq!(t.reply, None);
            assert_eq!(t.next.unwrap().status, Status::Done);
        }
    }

    #[test]
    fn unmatched_combination_keeps_state_and_asks_to_finish() {
        let rules = [rule(
            Some(Status::Menu),
            Pattern::OneOf(REQUEST_SERVICES),
            Status::Done,
            false,
            Some(Reply::RequestAcknowledged),
        )];
        let mut current = session(Status::DisabilitasQ2);
        current.answers.push("low vision".to_string());

        let t = apply(&rules, "A", Some(&current), "whatever");
        assert_eq!(t.reply, Some(Reply::FinishPreviousStep));
        assert_eq!(t.next, Some(current));

        let t = apply(&rules, "A", None, "whatever");
        assert_eq!(t.reply, Some(Reply::FinishPreviousStep));
        assert!(t.next.is_none());
    }

    #[test]
    fn every_state_has_a_fallback_rule() {
        let states = [
            None,
            Some(Status::Menu),
            Some(Status::Done),
            Some(Status::DisabilitasStatus),
            Some(Status::DisabilitasQ1),
            Some(Status::DisabilitasQ2),
            Some(Status::DisabilitasQ3),
        ];
        for state in states {
            assert!(
                RULES
                    .iter()
                    .any(|r| r.from == state && matches!(r.on, Pattern::Any)),
                "no fallback rule for {state:?}"
            );
        }
    }
}
