//! Main Nghe API client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result, INVALID_REQUEST_MESSAGE};
use crate::library::LibraryClient;
use crate::playlists::PlaylistClient;
use crate::session::SessionStore;
use crate::types::{ClientConfig, ErrorBody};
use reqwest::{redirect, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Client for the streaming server's REST API.
///
/// Every request carries `Authorization: Bearer <token>` while the session
/// holds a token. Redirects are never followed so the stream endpoint's
/// `Location` header can be read.
///
/// # Example
///
/// ```ignore
/// use nghe_client::{ApiClient, ClientConfig, MemoryTokenStorage, SessionStore};
/// use std::sync::Arc;
///
/// let session = Arc::new(SessionStore::new(Arc::new(MemoryTokenStorage::new())));
/// let client = ApiClient::new(ClientConfig::new("https://music.example.com"), session)?;
///
/// client.auth().login("an", "secret").await?;
/// let playlists = client.playlists().my_playlists(0).await?;
/// ```
pub struct ApiClient {
    http: Client,
    base_url: String,
    page_size: u32,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig, session: Arc<SessionStore>) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        if config.page_size == 0 {
            return Err(ClientError::Config("page size must be positive".into()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(redirect::Policy::none())
            .user_agent(format!("Nghe/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(base_url = %base_url, page_size = config.page_size, "API client created");

        Ok(Self {
            http,
            base_url,
            page_size: config.page_size,
            session,
        })
    }

    /// Server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Session whose token signs every request.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Login and registration.
    pub fn auth(&self) -> AuthClient<'_> {
        AuthClient::new(&self.http, &self.base_url, &self.session)
    }

    /// Songs, search and stream URLs.
    pub fn library(&self) -> LibraryClient<'_> {
        LibraryClient::new(&self.http, &self.base_url, &self.session, self.page_size)
    }

    /// Playlist browsing and editing.
    pub fn playlists(&self) -> PlaylistClient<'_> {
        PlaylistClient::new(&self.http, &self.base_url, &self.session, self.page_size)
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
    }

    let url = trimmed.trim_end_matches('/').to_string();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ClientError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    url::Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
    Ok(url)
}

/// Attach the session token, if any.
pub(crate) fn authorized(builder: RequestBuilder, session: &SessionStore) -> RequestBuilder {
    match session.token() {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Send and decode a JSON body, mapping error statuses.
pub(crate) async fn send_json<T: DeserializeOwned>(
    builder: RequestBuilder,
    session: &SessionStore,
    what: &str,
) -> Result<T> {
    let response = send_checked(builder, session).await?;
    response
        .json()
        .await
        .map_err(|e| ClientError::Parse(format!("Failed to parse {}: {}", what, e)))
}

/// Send and ignore the body, mapping error statuses.
pub(crate) async fn send_empty(builder: RequestBuilder, session: &SessionStore) -> Result<()> {
    send_checked(builder, session).await.map(drop)
}

async fn send_checked(builder: RequestBuilder, session: &SessionStore) -> Result<Response> {
    let response = authorized(builder, session).send().await?;
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(error_from_response(response, session).await)
    }
}

/// Turn a non-success response into a [`ClientError`].
///
/// 401/403 clear the session and fire the logout broadcast first.
pub(crate) async fn error_from_response(response: Response, session: &SessionStore) -> ClientError {
    let status = response.status();
    let url = response.url().clone();

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            warn!(url = %url, status = %status, "Request rejected, session invalid");
            session.handle_auth_failure(status.as_u16()).await;
            ClientError::Unauthorized {
                status: status.as_u16(),
            }
        }
        StatusCode::BAD_REQUEST => {
            let body = response.text().await.unwrap_or_default();
            let message = validation_message(&body);
            debug!(url = %url, message = %message, "Request rejected as invalid");
            ClientError::Validation(message)
        }
        _ => {
            let message = response.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, "Server returned an error");
            ClientError::Server {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Extract `message` from a 400 body, falling back to a generic text.
pub(crate) fn validation_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| INVALID_REQUEST_MESSAGE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStorage;

    fn session() -> Arc<SessionStore> {
        Arc::new(SessionStore::new(Arc::new(MemoryTokenStorage::new())))
    }

    #[test]
    fn test_url_validation() {
        assert!(ApiClient::new(ClientConfig::new("https://example.com"), session()).is_ok());
        assert!(ApiClient::new(ClientConfig::new("http://localhost:8080"), session()).is_ok());

        assert!(ApiClient::new(ClientConfig::new(""), session()).is_err());
        assert!(ApiClient::new(ClientConfig::new("not-a-url"), session()).is_err());
        assert!(ApiClient::new(ClientConfig::new("ftp://example.com"), session()).is_err());
    }

    #[test]
    fn test_url_normalization() {
        let client = ApiClient::new(ClientConfig::new("https://example.com///"), session())
            .expect("valid url");
        assert_eq!(client.base_url(), "https://example.com");
    }

    #[test]
    fn zero_page_size_rejected() {
        let config = ClientConfig::new("https://example.com").with_page_size(0);
        assert!(ApiClient::new(config, session()).is_err());
    }

    #[test]
    fn validation_message_extraction() {
        assert_eq!(validation_message(r#"{"message":"Name taken"}"#), "Name taken");
        assert_eq!(validation_message(r#"{"error":"x"}"#), INVALID_REQUEST_MESSAGE);
        assert_eq!(validation_message("<html>"), INVALID_REQUEST_MESSAGE);
        assert_eq!(validation_message(r#"{"message":"  "}"#), INVALID_REQUEST_MESSAGE);
    }
}
