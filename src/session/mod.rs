//! Session
//!
//! A storefront session owns the customer's cart and, once logged in, the user.

use tracing::info;

use crate::cart::Cart;

pub mod auth;

pub use auth::{AuthError, Authenticator, Credentials, DemoAuthenticator, User};

/// Session
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<User>,
    cart: Cart,
}

impl Session {
    /// Start an anonymous session with the given cart.
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        Self { user: None, cart }
    }

    /// Log in, replacing any current user. The cart is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] if the authenticator rejects the credentials;
    /// the session is unchanged.
    pub fn login(
        &mut self,
        authenticator: &impl Authenticator,
        credentials: &Credentials,
    ) -> Result<&User, AuthError> {
        let user = authenticator.authenticate(credentials)?;

        info!(email = %user.email, "logged in");

        Ok(self.user.insert(user))
    }

    /// Log out and reset the cart, including the coupon.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            info!(email = %user.email, "logged out");
        }

        self.cart.reset();
    }

    /// The logged in user.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Whether a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The session's cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the session's cart for ledger operations.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }
}
