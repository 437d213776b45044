//! HTTP(S) resource download

use std::time::Duration;

use crate::capability::Fetcher;
use crate::error::FetchError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Transport settings for [`HttpFetcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// Accept any server certificate. Only for legacy appliances whose
    /// certificates cannot be validated.
    pub insecure: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            insecure: false,
        }
    }
}

/// Blocking HTTP client used to download manifest resources.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(concat!("jnlp-launcher/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(options.timeout);

        if options.insecure {
            tracing::warn!("TLS certificate verification is DISABLED for this run");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &str) -> Result<Vec<u8>, FetchError> {
        tracing::info!("Downloading {uri}");

        let response = self
            .client
            .get(uri)
            .send()
            .map_err(|e| FetchError::Transport {
                uri: uri.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().map_err(|e| FetchError::Transport {
            uri: uri.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!(bytes = bytes.len(), "Downloaded {uri}");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_in_both_modes() {
        assert!(HttpFetcher::new(FetchOptions::default()).is_ok());
        assert!(
            HttpFetcher::new(FetchOptions {
                insecure: true,
                ..FetchOptions::default()
            })
            .is_ok()
        );
    }

    #[test]
    fn test_unreachable_host_is_transport_error() {
        let fetcher = HttpFetcher::new(FetchOptions {
            timeout: Duration::from_secs(2),
            insecure: false,
        })
        .unwrap();
        // Port 9 on loopback: connection refused without touching the network.
        let result = fetcher.fetch("http://127.0.0.1:9/app.jar");
        assert!(matches!(result, Err(FetchError::Transport { .. })));
    }
}
