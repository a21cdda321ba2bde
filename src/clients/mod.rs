//! Metadata provider adapters.
//!
//! The catalog consults two providers: a primary one whose answer is
//! authoritative and mandatory ([`PrimarySource`]), and a secondary one that
//! only supplements it ([`SecondarySource`]). Both are traits so the
//! aggregation pipeline can be exercised without network access.

pub mod genres;
pub mod omdb;
pub mod tmdb;

use crate::models::movie::{PrimaryRecord, SecondaryRecord};
use async_trait::async_trait;
use thiserror::Error;

pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;

/// Errors reported by a provider adapter.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} has no match for '{title}'")]
    NotFound {
        provider: &'static str,
        title: String,
    },

    #[error("{provider} rejected the API key")]
    Auth { provider: &'static str },

    #[error("{provider} request failed: {message}")]
    Upstream {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} returned invalid data: {message}")]
    InvalidData {
        provider: &'static str,
        message: String,
    },
}

impl ProviderError {
    pub fn upstream(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }

    pub fn invalid_data(provider: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidData {
            provider,
            message: message.into(),
        }
    }

    /// Short label used for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Auth { .. } => "auth",
            Self::Upstream { .. } => "provider",
            Self::InvalidData { .. } => "validation",
        }
    }
}

/// Authoritative metadata lookup. Any error is fatal to the caller.
#[async_trait]
pub trait PrimarySource: Send + Sync {
    async fn fetch(&self, title: &str) -> Result<PrimaryRecord, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Supplementary metadata lookup. Callers treat every error as "absent".
#[async_trait]
pub trait SecondarySource: Send + Sync {
    async fn fetch(&self, title: &str) -> Result<SecondaryRecord, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Builds the HTTP client shared by every provider adapter and image download.
pub fn build_http_client(config: &crate::config::HttpConfig) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}
