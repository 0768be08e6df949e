//! Authentication endpoints.

use crate::client::send_json;
use crate::error::Result;
use crate::session::SessionStore;
use crate::types::{LoginRequest, LoginResponse, RegisterRequest};
use nghe_core::User;
use reqwest::Client;
use tracing::{debug, info};

/// Authentication client.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    session: &'a SessionStore,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, session: &'a SessionStore) -> Self {
        Self {
            http,
            base_url,
            session,
        }
    }

    /// Login with username and password.
    ///
    /// On success the token is persisted and cached in the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/api/v1/auth/login", self.base_url);
        debug!(url = %url, username = %username, "Attempting login");

        let request = LoginRequest {
            username: username.to_string(),
            pass: password.to_string(),
        };

        let response: LoginResponse =
            send_json(self.http.post(&url).json(&request), self.session, "login response")
                .await?;

        self.session.save_token(&response.token).await?;

        info!(username = %username, "Login successful");
        Ok(())
    }

    /// Create a new account. Does not log in.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let url = format!("{}/api/v1/auth/register", self.base_url);
        debug!(url = %url, username = %username, "Registering account");

        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            pass: password.to_string(),
        };

        let user: User =
            send_json(self.http.post(&url).json(&request), self.session, "register response")
                .await?;

        info!(user_id = user.id, username = %user.username, "Account registered");
        Ok(user)
    }

    /// Drop the local session. The server keeps no logout state.
    pub async fn logout(&self) -> Result<()> {
        self.session.clear().await?;
        info!("Logged out");
        Ok(())
    }
}
