//! Navigation seam between the SDK and its presentation layer.
//!
//! Browser-style redirects ("go to login", "go home after logout") are
//! emitted through the [`Navigator`] trait instead of mutating global UI
//! state, so every client instance carries its own isolated navigation
//! target and tests can observe exactly what was requested.

use std::sync::RwLock;

/// Well-known client routes.
pub mod routes {
    /// Home / unauthenticated entry point after logout.
    pub const HOME: &str = "/";

    /// Unauthenticated entry point after session expiry.
    pub const LOGIN: &str = "/login";

    /// Catalog fallback when a buy-now record is missing or stale.
    pub const CATALOG: &str = "/products";

    /// Order confirmation destination for a freshly created order.
    #[must_use]
    pub fn order_confirmation(order_id: &str) -> String {
        format!("/order-confirmation/{order_id}")
    }
}

/// Receives navigation requests from the SDK.
pub trait Navigator: Send + Sync {
    /// Navigate to `route`, discarding any in-memory state tied to the
    /// previous page (the real presentation layer does a full reload).
    fn navigate(&self, route: &str);

    /// The route the client is currently on. Used to avoid redirecting to
    /// the login page when the user is already there.
    fn current_route(&self) -> String;
}

/// Navigator that ignores every request. Suitable for headless embedders.
#[derive(Debug, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: &str) {}

    fn current_route(&self) -> String {
        routes::HOME.to_owned()
    }
}

/// Navigator that records every request, for assertions in tests and for
/// presentation layers that poll rather than subscribe.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: RwLock<Vec<String>>,
}

impl RecordingNavigator {
    /// Create a recorder positioned at the home route.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route navigated to, oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.visited
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(route.to_owned());
    }

    fn current_route(&self) -> String {
        self.visited
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_else(|| routes::HOME.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_route_embeds_the_order_id() {
        assert_eq!(
            routes::order_confirmation("ord-42"),
            "/order-confirmation/ord-42"
        );
    }

    #[test]
    fn recorder_tracks_current_route() {
        let nav = RecordingNavigator::new();
        assert_eq!(nav.current_route(), routes::HOME);

        nav.navigate(routes::LOGIN);
        assert_eq!(nav.current_route(), routes::LOGIN);
        assert_eq!(nav.visited(), vec![routes::LOGIN.to_owned()]);
    }
}
