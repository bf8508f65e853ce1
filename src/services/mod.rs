pub mod access;
pub mod editor;
pub mod lifecycle;
pub mod roster;

pub use access::{Access, AccessResolution, AccessService};
pub use editor::{StudentEditor, SubmitPhase};
pub use lifecycle::{entry_route, route_for_event, Route, SessionLifecycle};
pub use roster::{RosterPhase, RosterService, RosterStats};

/// One user-visible notification. Every operation outcome, success or
/// failure, is reported through exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.title, description),
            None => write!(f, "{}", self.title),
        }
    }
}
