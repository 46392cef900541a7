//! Approver decisions.
//!
//! A request moves `pending -> {approved, rejected}`, but that state lives
//! in Slack. Herald only ever sees the decision attached to a button click.

/// Approver decision on a pending announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Broadcast the announcement to its target channels.
    Approve,
    /// Deny the request and notify the requester.
    Reject,
}

impl Decision {
    /// Button `action_id` carrying this decision.
    #[must_use]
    pub const fn action_id(self) -> &'static str {
        match self {
            Self::Approve => "approve_announcement",
            Self::Reject => "reject_announcement",
        }
    }

    /// Recover a decision from a clicked button's `action_id`.
    #[must_use]
    pub fn from_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            "approve_announcement" => Some(Self::Approve),
            "reject_announcement" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Reject => write!(f, "reject"),
        }
    }
}
