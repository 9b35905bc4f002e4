//! Client-side navigation seam.
//!
//! # Design
//! The 401 handling path must send the embedding shell to the login page,
//! but the shell is not part of this crate. Navigation goes through the
//! [`Navigator`] trait; [`NavigationLog`] is the default recording
//! implementation, which tests also use to assert the redirect fired
//! exactly once.

use std::sync::{Mutex, PoisonError};

/// Path navigated to when a request is rejected with 401.
pub const LOGIN_PATH: &str = "/login";

/// Receiver of client-side navigation requests.
pub trait Navigator: Send + Sync {
    /// Navigate the embedding shell to `path`.
    fn navigate(&self, path: &str);
}

/// Navigator that records requested paths in order.
#[derive(Debug, Default)]
pub struct NavigationLog {
    visits: Mutex<Vec<String>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths navigated to so far, oldest first.
    pub fn visits(&self) -> Vec<String> {
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "navigation requested");
        self.visits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_are_recorded_in_order() {
        let log = NavigationLog::new();
        log.navigate(LOGIN_PATH);
        log.navigate("/dashboard");
        assert_eq!(log.visits(), vec!["/login".to_string(), "/dashboard".to_string()]);
    }

    #[test]
    fn fresh_log_has_no_visits() {
        assert!(NavigationLog::new().visits().is_empty());
    }
}
