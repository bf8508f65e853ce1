//! Session-change notifications as an explicit observer registry.
//!
//! Consumers register a callback and get back a [`Subscription`] they must
//! cancel on teardown. Cancellation is idempotent and also runs on drop, so
//! a torn-down view can never be called again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use super::Session;

/// What happened to the session.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    SignedIn(Session),
    SessionRestored(Session),
    SignedOut,
}

impl AuthEvent {
    /// The live session carried by this event, if any.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthEvent::SignedIn(session) | AuthEvent::SessionRestored(session) => Some(session),
            AuthEvent::SignedOut => None,
        }
    }
}

type Callback = Box<dyn Fn(&AuthEvent) + Send + Sync>;
type Registry = Mutex<HashMap<u64, Callback>>;

#[derive(Default)]
pub struct SessionWatch {
    listeners: Arc<Registry>,
    next_id: AtomicU64,
}

impl SessionWatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer. Dropping or cancelling the returned
    /// subscription removes it.
    pub fn subscribe(&self, callback: impl Fn(&AuthEvent) + Send + Sync + 'static) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).insert(id, Box::new(callback));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
            cancelled: false,
        }
    }

    /// Delivers an event to every registered observer, in no particular
    /// order. Callbacks must not re-enter the watch.
    pub fn emit(&self, event: &AuthEvent) {
        let listeners = lock(&self.listeners);
        for callback in listeners.values() {
            callback(event);
        }
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

fn lock(registry: &Registry) -> std::sync::MutexGuard<'_, HashMap<u64, Callback>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to one registered observer.
pub struct Subscription {
    id: u64,
    listeners: Weak<Registry>,
    cancelled: bool,
}

impl Subscription {
    /// Removes the observer. Safe to call more than once; only the first
    /// call has any effect.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Some(listeners) = self.listeners.upgrade() {
            lock(&listeners).remove(&self.id);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use std::sync::atomic::AtomicUsize;
    use uuid::Uuid;

    fn sample_session() -> Session {
        Session {
            access_token: "token".into(),
            refresh_token: None,
            user: AuthUser {
                id: Uuid::new_v4(),
                email: None,
            },
            expires_at: None,
        }
    }

    #[test]
    fn events_reach_registered_observers() {
        let watch = SessionWatch::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_observer = seen.clone();
        let _subscription = watch.subscribe(move |_| {
            seen_by_observer.fetch_add(1, Ordering::SeqCst);
        });

        watch.emit(&AuthEvent::SignedIn(sample_session()));
        watch.emit(&AuthEvent::SignedOut);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cancelled_observer_receives_nothing_further() {
        let watch = SessionWatch::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_by_observer = seen.clone();
        let mut subscription = watch.subscribe(move |_| {
            seen_by_observer.fetch_add(1, Ordering::SeqCst);
        });

        watch.emit(&AuthEvent::SignedOut);
        subscription.cancel();
        watch.emit(&AuthEvent::SignedOut);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let watch = SessionWatch::new();
        let mut subscription = watch.subscribe(|_| {});
        subscription.cancel();
        subscription.cancel();
        assert!(subscription.is_cancelled());
        assert_eq!(watch.observer_count(), 0);
    }

    #[test]
    fn dropping_the_subscription_unregisters() {
        let watch = SessionWatch::new();
        {
            let _subscription = watch.subscribe(|_| {});
            assert_eq!(watch.observer_count(), 1);
        }
        assert_eq!(watch.observer_count(), 0);
    }

    #[test]
    fn signed_out_carries_no_session() {
        assert!(AuthEvent::SignedOut.session().is_none());
        assert!(AuthEvent::SignedIn(sample_session()).session().is_some());
    }
}
