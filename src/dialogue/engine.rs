use std::sync::Arc;

use super::{normalize, transition, Reply, Status};
use crate::channels::ChannelMessage;
use crate::sessions::SessionStore;

/// What a single inbound message did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub previous: Option<Status>,
    pub status: Option<Status>,
    pub reply: Option<Reply>,
    pub completed_answers: Option<Vec<String>>,
}

/// Applies the transition table to the session store.
///
/// `handle` never suspends, so one call is one atomic step from the point of
/// view of the message loop.
pub struct DialogueEngine {
    store: Arc<dyn SessionStore>,
}

impl DialogueEngine {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Process one message and report the full outcome.
    ///
    /// An empty sender or zero-length body is dropped: no state change, no
    /// reply.
    pub fn process(&self, sender_id: &str, body: &str) -> Outcome {
        if sender_id.is_empty() || body.is_empty() {
            tracing::debug!(sender = %sender_id, "dropping malformed message");
            return Outcome::default();
        }

        let input = normalize(body);
        tracing::info!(sender = %sender_id, message = %input, "inbound message");

        let current = self.store.get(sender_id);
        let previous = current.as_ref().map(|s| s.status);
        let step = transition(sender_id, current.as_ref(), &input);
        let status = step.next.as_ref().map(|s| s.status);

        if let Some(next) = step.next {
            self.store.set(sender_id, next);
        }

        tracing::debug!(
            sender = %sender_id,
            from = previous.map_or("absent", Status::as_str),
            to = status.map_or("absent", Status::as_str),
            replied = step.reply.is_some(),
            "dialogue transition"
        );

        if let Some(ref answers) = step.completed_answers {
            tracing::info!(sender = %sender_id, ?answers, "accessibility questionnaire completed");
        }

        Outcome {
            previous,
            status,
            reply: step.reply,
            completed_answers: step.completed_answers,
        }
    }

    /// Process one message; returns the reply to send, if any.
    pub fn handle(&self, sender_id: &str, body: &str) -> Option<Reply> {
        self.process(sender_id, body).reply
    }

    /// Validate a transport event, then process it.
    pub fn handle_message(&self, message: &ChannelMessage) -> Option<Reply> {
        match message.validate() {
            Ok((sender, body)) => self.handle(sender, body),
            Err(reason) => {
                tracing::debug!(channel = %message.channel, %reason, "dropping inbound message");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::{InMemorySessionStore, Session};

    fn engine() -> DialogueEngine {
        DialogueEngine::new(Arc::new(InMemorySessionStore::new()))
    }

    fn status_of(engine: &DialogueEngine, sender: &str) -> Option<Status> {
        engine.store().get(sender).map(|s| s.status)
    }

    #[test]
    fn full_accessibility_scenario() {
        let engine = engine();

        assert_eq!(engine.handle("A", "6"), Some(Reply::Welcome));
        assert_eq!(status_of(&engine, "A"), Some(Status::Menu));

        assert_eq!(engine.handle("A", "6"), Some(Reply::DisabilityIntro));
        assert_eq!(status_of(&engine, "A"), Some(Status::DisabilitasStatus));

        assert_eq!(engine.handle("A", "Ya"), Some(Reply::AskDisabilityType));
        assert_eq!(status_of(&engine, "A"), Some(Status::DisabilitasQ1));

        assert_eq!(engine.handle("A", "none"), Some(Reply::AskAdditionalService));
        assert_eq!(status_of(&engine, "A"), Some(Status::DisabilitasQ2));

        assert_eq!(engine.handle("A", "ok"), Some(Reply::AskAccessibility));
        assert_eq!(status_of(&engine, "A"), Some(Status::DisabilitasQ3));

        let outcome = engine.process("A", "done");
        assert_eq!(outcome.reply, Some(Reply::InformationAcknowledged));
        assert_eq!(outcome.previous, Some(Status::DisabilitasQ3));
        assert_eq!(outcome.status, Some(Status::Done));
        assert_eq!(
            outcome.completed_answers,
            Some(vec!["none".to_string(), "ok".to_string(), "done".to_string()])
        );

        assert_eq!(engine.handle("A", "0"), Some(Reply::Welcome));
        assert_eq!(status_of(&engine, "A"), Some(Status::Menu));
    }

    #[test]
    fn menu_choices_ignore_case_and_whitespace() {
        for input in ["1", " 2", "3 ", "\t4\n", "  5  "] {
            let engine = engine();
            engine.handle("B", "halo");
            assert_eq!(engine.handle("B", input), Some(Reply::RequestAcknowledged));
            assert_eq!(status_of(&engine, "B"), Some(Status::Done));
        }
    }

    #[test]
    fn yes_no_gate_is_case_insensitive() {
        let engine = engine();
        engine.handle("C", "hi");
        engine.handle("C", "6");
        assert_eq!(engine.handle("C", "  TIDAK "), Some(Reply::InformationAcknowledged));
        assert_eq!(status_of(&engine, "C"), Some(Status::Done));
    }

    #[test]
    fn done_is_silent_until_zero() {
        let engine = engine();
        engine.handle("D", "hi");
        engine.handle("D", "1");

        assert_eq!(engine.handle("D", "halo?"), None);
        assert_eq!(engine.handle("D", "1"), None);
        assert_eq!(status_of(&engine, "D"), Some(Status::Done));

        assert_eq!(engine.handle("D", " 0 "), Some(Reply::Welcome));
        assert_eq!(status_of(&engine, "D"), Some(Status::Menu));
    }

    #[test]
    fn whitespace_only_answers_count_as_free_text() {
        let engine = engine();
        engine
            .store()
            .set("E", Session::new("E", Status::DisabilitasQ1));

        assert_eq!(engine.handle("E", "   "), Some(Reply::AskAdditionalService));
        assert_eq!(engine.handle("E", " "), Some(Reply::AskAccessibility));
        assert_eq!(engine.handle("E", "\n"), Some(Reply::InformationAcknowledged));
        assert_eq!(status_of(&engine, "E"), Some(Status::Done));
    }

    #[test]
    fn malformed_messages_are_dropped() {
        let engine = engine();
        assert_eq!(engine.handle("", "halo"), None);
        assert_eq!(engine.handle("F", ""), None);
        assert!(engine.store().is_empty());

        let mut msg = ChannelMessage::new("test", "F", "halo");
        msg.sender = None;
        assert_eq!(engine.handle_message(&msg), None);
        assert!(engine.store().is_empty());
    }

    #[test]
    fn handle_message_routes_valid_events() {
        let engine = engine();
        let msg = ChannelMessage::new("test", "G", "hello");
        assert_eq!(engine.handle_message(&msg), Some(Reply::Welcome));
        assert_eq!(status_of(&engine, "G"), Some(Status::Menu));
    }

    #[test]
    fn reset_mid_flow_restarts_at_welcome() {
        let engine = engine();
        engine.handle("H", "hi");
        engine.handle("H", "6");
        engine.handle("H", "ya");

        engine.store().clear();

        let outcome = engine.process("H", "tunanetra");
        assert_eq!(outcome.previous, None);
        assert_eq!(outcome.reply, Some(Reply::Welcome));
        assert_eq!(outcome.status, Some(Status::Menu));
    }

    #[test]
    fn senders_do_not_share_progress() {
        let engine = engine();
        engine.handle("I", "hi");
        engine.handle("I", "6");
        assert_eq!(engine.handle("J", "6"), Some(Reply::Welcome));
        assert_eq!(status_of(&engine, "I"), Some(Status::DisabilitasStatus));
        assert_eq!(status_of(&engine, "J"), Some(Status::Menu));
    }
}
