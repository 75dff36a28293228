use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a sender currently is in the menu tree.
///
/// A sender with no session at all is "absent"; that case is modeled as
/// `Option<Status>::None` rather than a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// Welcome menu shown, waiting for a service number.
    Menu,
    /// Terminal: only the reset keyword resumes the conversation.
    Done,
    /// Accessibility sub-flow: waiting for "ya" / "tidak".
    DisabilitasStatus,
    DisabilitasQ1,
    DisabilitasQ2,
    DisabilitasQ3,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Done => "done",
            Self::DisabilitasStatus => "disabilitas-status",
            Self::DisabilitasQ1 => "disabilitas-q1",
            Self::DisabilitasQ2 => "disabilitas-q2",
            Self::DisabilitasQ3 => "disabilitas-q3",
        }
    }

    /// States that consume free text into the session's answer list.
    pub fn is_questionnaire(self) -> bool {
        matches!(
            self,
            Self::DisabilitasQ1 | Self::DisabilitasQ2 | Self::DisabilitasQ3
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trim surrounding whitespace and lowercase. Every comparison in the
/// transition table runs against this form.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
