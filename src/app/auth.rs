//! Session gate and login view state.
//!
//! The home view sits behind an [`AuthGate`]. Each mount starts in
//! [`AuthGate::Checking`] and resolves exactly once from the current-user
//! probe; a resolved gate ignores further probe results for that mount.

use crate::domain::{ApiError, User};

/// OAuth providers offered on the login view, as `(path segment, label)`.
pub const PROVIDERS: [(&str, &str); 3] = [
    ("google", "Google"),
    ("github", "GitHub"),
    ("facebook", "Facebook"),
];

/// Shown when the home view bounces an expired session back to login.
pub const SESSION_EXPIRED: &str = "Session expired. Sign in to continue.";
/// Shown when a pasted session cookie does not identify a user.
pub const AUTH_FAILED: &str = "Authentication failed. Please try again.";

/// Auth state of one home view mount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthGate {
    #[default]
    Checking,
    Authenticated(User),
    Unauthenticated,
}

impl AuthGate {
    /// Resolves the gate from a current-user probe.
    ///
    /// Only a gate in `Checking` moves; the returned reference is the state
    /// after the call either way.
    ///
    /// # Example
    ///
    /// ```
    /// use zsplash::app::auth::AuthGate;
    ///
    /// let mut gate = AuthGate::Checking;
    /// gate.resolve(Ok(None));
    /// assert_eq!(gate, AuthGate::Unauthenticated);
    /// ```
    pub fn resolve(&mut self, result: Result<Option<User>, ApiError>) -> &Self {
        if *self != Self::Checking {
            tracing::debug!(gate = ?self, "gate already resolved, ignoring probe");
            return self;
        }

        *self = match result {
            Ok(Some(user)) => Self::Authenticated(user),
            Ok(_) => Self::Unauthenticated,
            Err(e) => {
                tracing::debug!(error = %e, "current user probe failed");
                Self::Unauthenticated
            }
        };
        self
    }

    #[must_use]
    pub const fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Checking | Self::Unauthenticated => None,
        }
    }
}

/// Interactive state of the login view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Index into [`PROVIDERS`].
    pub provider: usize,
    /// Session cookie being pasted.
    pub cookie_input: String,
    /// Set while a pasted cookie is being verified.
    pub verifying: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn next_provider(&mut self) {
        self.provider = (self.provider + 1) % PROVIDERS.len();
    }

    pub fn previous_provider(&mut self) {
        self.provider = self.provider.checked_sub(1).unwrap_or(PROVIDERS.len() - 1);
    }

    /// Path segment of the highlighted provider.
    #[must_use]
    pub fn provider_slug(&self) -> &'static str {
        PROVIDERS[self.provider % PROVIDERS.len()].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.into(),
            name: "Ann".into(),
            email: None,
            avatar: None,
        }
    }

    #[test]
    fn resolves_once_per_mount() {
        let mut gate = AuthGate::default();
        assert_eq!(gate.resolve(Ok(Some(user("u1")))), &AuthGate::Authenticated(user("u1")));

        gate.resolve(Err(ApiError::Unauthorized));
        assert_eq!(gate.user(), Some(&user("u1")));
    }

    #[test]
    fn any_present_user_is_authenticated() {
        let mut gate = AuthGate::Checking;
        gate.resolve(Ok(Some(user(""))));
        assert_eq!(gate, AuthGate::Authenticated(user("")));
    }

    #[test]
    fn missing_user_and_failures_are_unauthenticated() {
        let mut gate = AuthGate::Checking;
        gate.resolve(Ok(None));
        assert_eq!(gate, AuthGate::Unauthenticated);

        let mut gate = AuthGate::Checking;
        gate.resolve(Err(ApiError::failed(Some(500), "boom")));
        assert_eq!(gate, AuthGate::Unauthenticated);
    }

    #[test]
    fn provider_cursor_wraps() {
        let mut form = LoginForm::default();
        form.previous_provider();
        assert_eq!(form.provider_slug(), "facebook");
        form.next_provider();
        assert_eq!(form.provider_slug(), "google");
    }
}
