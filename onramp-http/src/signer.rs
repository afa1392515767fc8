//! HTTP implementation of the [`UrlSigner`] seam.
//!
//! The signing service exposes a single endpoint:
//! `GET {origin}/api/moonpay-sign?url=<percent-encoded unsigned URL>`.
//! The response body, plain text, is the signed URL.

use std::time::Duration;

use onramp::error::SignError;
use onramp::signing::{BoxFuture, UrlSigner};
use tracing::debug;

use crate::constants::{DEFAULT_SIGNING_ORIGIN, MOONPAY_SIGN_PATH};

/// Configuration for [`HttpUrlSigner`].
pub struct SignerConfig {
    /// Signing service origin (without trailing slash).
    pub origin: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// Optional pre-configured reqwest client. If `None`, a new client is
    /// created with the configured timeout.
    pub http_client: Option<reqwest::Client>,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_SIGNING_ORIGIN.to_owned(),
            timeout: Duration::from_secs(30),
            http_client: None,
        }
    }
}

impl SignerConfig {
    /// Creates a config with the given signing service origin.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a pre-configured reqwest client.
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("origin", &self.origin)
            .field("timeout", &self.timeout)
            .field("has_http_client", &self.http_client.is_some())
            .finish()
    }
}

/// Async HTTP-based URL signer.
///
/// # Example
///
/// ```no_run
/// use onramp_http::signer::{HttpUrlSigner, SignerConfig};
///
/// let signer = HttpUrlSigner::new(SignerConfig::default());
/// // Use with onramp::signing::SigningCoordinator::new(signer)
/// ```
#[derive(Debug, Clone)]
pub struct HttpUrlSigner {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpUrlSigner {
    /// Creates a new HTTP signer from the given configuration.
    pub fn new(config: SignerConfig) -> Self {
        let origin = config.origin.trim_end_matches('/').to_owned();
        let client = config.http_client.unwrap_or_else(|| {
            reqwest::Client::builder()
                .timeout(config.timeout)
                .build()
                .expect("failed to build reqwest::Client")
        });
        Self {
            endpoint: format!("{origin}{MOONPAY_SIGN_PATH}"),
            client,
        }
    }

    /// Creates a signer pointed at the production signing origin.
    #[must_use]
    pub fn default_origin() -> Self {
        Self::new(SignerConfig::default())
    }

    /// Returns the full signing endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn sign_inner(&self, unsigned_url: &str) -> Result<String, SignError> {
        let request_url = format!(
            "{}?url={}",
            self.endpoint,
            urlencoding::encode(unsigned_url)
        );
        debug!(%request_url, "requesting signed purchase URL");

        let response = self
            .client
            .get(&request_url)
            .send()
            .await
            .map_err(|err| SignError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SignError::Status(status.as_u16()));
        }

        let signed_url = response
            .text()
            .await
            .map_err(|err| SignError::Transport(err.to_string()))?;
        if signed_url.is_empty() {
            return Err(SignError::EmptyResponse);
        }
        Ok(signed_url)
    }
}

impl UrlSigner for HttpUrlSigner {
    fn sign<'a>(&'a self, unsigned_url: &'a str) -> BoxFuture<'a, Result<String, SignError>> {
        Box::pin(self.sign_inner(unsigned_url))
    }
}
