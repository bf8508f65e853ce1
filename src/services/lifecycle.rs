use crate::auth::events::{AuthEvent, SessionWatch, Subscription};
use crate::auth::Session;

/// Navigational surface of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Dashboard,
}

/// Route for a cold entry on a given surface: a live session on the landing
/// or login surface goes to the dashboard, an unauthenticated dashboard goes
/// back to login.
pub fn entry_route(current: Route, session: Option<&Session>) -> Route {
    match (current, session) {
        (Route::Landing | Route::Login, Some(_)) => Route::Dashboard,
        (Route::Dashboard, None) => Route::Login,
        (current, _) => current,
    }
}

/// Redirect decision for a session-change notification, or `None` when the
/// view stays put.
pub fn route_for_event(current: Route, event: &AuthEvent) -> Option<Route> {
    if event.session().is_some() {
        return (current != Route::Dashboard).then_some(Route::Dashboard);
    }
    (current != Route::Login).then_some(Route::Login)
}

/// The single long-lived subscription in the system: watches session events
/// for the lifetime of the entry view and routes on them. Teardown cancels
/// the subscription exactly once; drop does the same.
pub struct SessionLifecycle {
    subscription: Option<Subscription>,
}

impl SessionLifecycle {
    pub fn attach(
        watch: &SessionWatch,
        current: Route,
        on_route: impl Fn(Route) + Send + Sync + 'static,
    ) -> Self {
        let subscription = watch.subscribe(move |event| {
            if let Some(route) = route_for_event(current, event) {
                on_route(route);
            }
        });
        Self {
            subscription: Some(subscription),
        }
    }

    pub fn teardown(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Drop for SessionLifecycle {
    fn drop(&mut self) {
        self.teardown();
    }
}
