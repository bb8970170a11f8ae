//! Authentication stub

use thiserror::Error;
use tracing::{debug, warn};

/// Default demo account email.
pub const DEMO_EMAIL: &str = "demo@example.com";

/// Default demo account password.
pub const DEMO_PASSWORD: &str = "password123";

/// Errors returned by an [`Authenticator`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password was left blank.
    #[error("Please enter both email and password")]
    MissingCredentials,

    /// The credentials did not match an account.
    #[error("Invalid email or password")]
    InvalidCredentials,
}

/// Login form input.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}

impl Credentials {
    /// Create credentials from an email and password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// An authenticated customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Account email
    pub email: String,

    /// Display name
    pub name: String,
}

/// Checks credentials and resolves the customer they belong to.
pub trait Authenticator {
    /// Authenticate a login attempt.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the credentials are blank or wrong.
    fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError>;
}

/// Accepts a single hardcoded demo account.
#[derive(Debug, Clone)]
pub struct DemoAuthenticator {
    email: String,
    password: String,
    name: String,
}

impl DemoAuthenticator {
    /// Create an authenticator for a custom demo account.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

impl Default for DemoAuthenticator {
    fn default() -> Self {
        Self::new(DEMO_EMAIL, DEMO_PASSWORD, "Demo User")
    }
}

impl Authenticator for DemoAuthenticator {
    fn authenticate(&self, credentials: &Credentials) -> Result<User, AuthError> {
        let email = credentials.email.trim();

        if email.is_empty() || credentials.password.is_empty() {
            warn!("login rejected: missing credentials");

            return Err(AuthError::MissingCredentials);
        }

        if !email.eq_ignore_ascii_case(&self.email) || credentials.password != self.password {
            warn!(email, "login rejected: invalid credentials");

            return Err(AuthError::InvalidCredentials);
        }

        debug!(email = %self.email, "authenticated demo user");

        Ok(User {
            email: self.email.clone(),
            name: self.name.clone(),
        })
    }
}
