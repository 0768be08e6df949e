//! Login and registration screen

use crate::context::{Navigator, Route};
use nghe_client::MusicRepository;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Form fields and request status
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set after a successful registration until acknowledged
    pub register_success: bool,
}

pub struct AuthScreen {
    repository: Arc<dyn MusicRepository>,
    navigator: Navigator,
    state: watch::Sender<AuthState>,
}

impl AuthScreen {
    pub fn new(repository: Arc<dyn MusicRepository>, navigator: Navigator) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            repository,
            navigator,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn set_username(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|s| s.username = value);
    }

    pub fn set_email(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|s| s.email = value);
    }

    pub fn set_password(&self, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|s| s.password = value);
    }

    /// Log in with the current fields and go home on success
    pub async fn login(&self) {
        let (username, password) = {
            let s = self.state.borrow();
            (s.username.clone(), s.password.clone())
        };
        self.begin();

        match self.repository.login(&username, &password).await {
            Ok(()) => {
                info!(username = %username, "Logged in");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.password.clear();
                });
                self.navigator.navigate(Route::Home);
            }
            Err(e) => {
                warn!(error = %e, "Login failed");
                self.fail(e.user_message());
            }
        }
    }

    pub async fn register(&self) {
        let (username, email, password) = {
            let s = self.state.borrow();
            (s.username.clone(), s.email.clone(), s.password.clone())
        };
        self.begin();

        match self.repository.register(&username, &email, &password).await {
            Ok(user) => {
                info!(user_id = user.id, "Registered");
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.register_success = true;
                });
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.fail(e.user_message());
            }
        }
    }

    pub fn clear_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    pub fn clear_register_success(&self) {
        self.state.send_modify(|s| s.register_success = false);
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
            s.register_success = false;
        });
    }

    fn fail(&self, message: String) {
        self.state.send_modify(|s| {
            s.is_loading = false;
            s.error = Some(message);
        });
    }
}
