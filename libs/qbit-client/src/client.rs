//! WebUI HTTP client implementation

use std::time::Duration;

use reqwest::header::REFERER;
use reqwest::StatusCode;
use url::Url;

use crate::error::{Error, Result};
use crate::preferences::{PreferenceUpdate, Preferences};

/// Login credentials for the WebUI
#[derive(Debug, Clone)]
pub struct Credentials {
    /// WebUI username
    pub username: String,

    /// WebUI password
    pub password: String,
}

impl Credentials {
    /// Create credentials from any string-likes
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Client for the qBittorrent WebUI API
///
/// Holds the session cookie issued by `auth/login`, so `login()` must
/// succeed before the preference calls.
pub struct QbitClient {
    /// Base URL without trailing slash (e.g. "http://localhost:8080")
    base_url: String,

    /// Login credentials
    credentials: Credentials,

    /// Reqwest HTTP client with cookie store enabled
    client: reqwest::Client,
}

impl QbitClient {
    /// Create a new WebUI client
    ///
    /// # Arguments
    ///
    /// * `base_url` - WebUI base URL (e.g. "http://localhost:8080")
    /// * `credentials` - WebUI username and password
    /// * `timeout` - Per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();

        let parsed = Url::parse(&base_url)
            .map_err(|e| Error::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::InvalidBaseUrl(format!(
                "base URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            client,
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticate against the WebUI and store the session cookie
    ///
    /// The WebUI answers HTTP 200 with body `Ok.` on success and `Fails.`
    /// on rejected credentials.
    pub async fn login(&self) -> Result<()> {
        let url = format!("{}/api/v2/auth/login", self.base_url);

        let response = self
            .client
            .post(&url)
            // The WebUI's CSRF check requires a referer matching the host
            .header(REFERER, self.base_url.as_str())
            .form(&[
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                endpoint: "auth/login",
                status,
            });
        }

        let body = response.text().await?;
        if body.trim() != "Ok." {
            tracing::warn!(
                base_url = %self.base_url,
                body = %body.trim(),
                "WebUI rejected login"
            );
            return Err(Error::AuthRejected);
        }

        tracing::debug!(base_url = %self.base_url, "Logged in to WebUI");
        Ok(())
    }

    /// Fetch the current preference set
    pub async fn preferences(&self) -> Result<Preferences> {
        let url = format!("{}/api/v2/app/preferences", self.base_url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                endpoint: "app/preferences",
                status,
            });
        }

        Ok(response.json().await?)
    }

    /// Push a preference update
    ///
    /// The WebUI expects the JSON object wrapped in a `json` form field,
    /// not a JSON request body.
    pub async fn set_preferences(&self, update: &PreferenceUpdate) -> Result<()> {
        let url = format!("{}/api/v2/app/setPreferences", self.base_url);
        let payload = serde_json::to_string(update)?;

        let response = self
            .client
            .post(&url)
            .form(&[("json", payload.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UnexpectedStatus {
                endpoint: "app/setPreferences",
                status,
            });
        }

        tracing::debug!(
            base_url = %self.base_url,
            listen_port = update.listen_port,
            "Preference update accepted"
        );
        Ok(())
    }

    /// Pin the incoming connection port, disabling UPnP and randomization
    pub async fn set_listen_port(&self, port: u16) -> Result<()> {
        self.set_preferences(&PreferenceUpdate::pinned_port(port)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("admin", "adminadmin")
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let result = QbitClient::new("", credentials(), Duration::from_secs(1));
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let result = QbitClient::new("ftp://localhost:8080", credentials(), Duration::from_secs(1));
        assert!(matches!(result, Err(Error::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_trims_trailing_slash() {
        let client =
            QbitClient::new("http://localhost:8080/", credentials(), Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_accepts_https() {
        let client = QbitClient::new(
            "https://qbit.example.com",
            credentials(),
            Duration::from_secs(1),
        );
        assert!(client.is_ok());
    }
}
