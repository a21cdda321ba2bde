use super::{PrimarySource, ProviderError};
use crate::config::OmdbConfig;
use crate::models::movie::PrimaryRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

const PROVIDER: &str = "OMDb";
const IMDB_ID_PREFIX: &str = "tt";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    title: Option<String>,
    year: Option<String>,
    released: Option<String>,
    plot: Option<String>,
    director: Option<String>,
    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,
    response: String,
    error: Option<String>,
}

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    #[must_use]
    pub fn new(client: Client, config: &OmdbConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    pub async fn fetch_movie(&self, title: &str) -> Result<PrimaryRecord, ProviderError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ProviderError::upstream(PROVIDER, format!("bad base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.api_key)
            .append_pair("t", title)
            .append_pair("type", "movie");

        debug!(title, "Querying OMDb");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::upstream(PROVIDER, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Auth { provider: PROVIDER });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::upstream(
                PROVIDER,
                format!("{status} - {body}"),
            ));
        }

        let body: OmdbResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::upstream(PROVIDER, format!("malformed response: {e}")))?;

        map_response(title, body)
    }
}

#[async_trait]
impl PrimarySource for OmdbClient {
    async fn fetch(&self, title: &str) -> Result<PrimaryRecord, ProviderError> {
        self.fetch_movie(title).await
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

fn map_response(query: &str, body: OmdbResponse) -> Result<PrimaryRecord, ProviderError> {
    if !body.response.eq_ignore_ascii_case("true") {
        return Err(classify_failure(query, body.error.as_deref().unwrap_or_default()));
    }

    let imdb_id = body
        .imdb_id
        .ok_or_else(|| ProviderError::invalid_data(PROVIDER, "response has no imdbID"))?;
    let external_id = parse_external_id(&imdb_id)?;

    let title = present(body.title)
        .ok_or_else(|| ProviderError::invalid_data(PROVIDER, "response has no title"))?;

    debug!(
        title = %title,
        released = body.released.as_deref().unwrap_or(NOT_AVAILABLE),
        has_plot = body.plot.is_some(),
        "OMDb match"
    );

    Ok(PrimaryRecord {
        title,
        year: present(body.year),
        director: present(body.director),
        external_id,
    })
}

/// OMDb answers failures with `"Response": "False"` and a human readable `Error`.
fn classify_failure(query: &str, message: &str) -> ProviderError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("not found") {
        ProviderError::NotFound {
            provider: PROVIDER,
            title: query.to_string(),
        }
    } else if lower.contains("api key") {
        ProviderError::Auth { provider: PROVIDER }
    } else if message.is_empty() {
        ProviderError::upstream(PROVIDER, "request was not successful")
    } else {
        ProviderError::upstream(PROVIDER, message)
    }
}

/// Extracts the numeric part of an IMDb reference id such as `tt1234567`.
pub fn parse_external_id(reference: &str) -> Result<i64, ProviderError> {
    let digits = reference.strip_prefix(IMDB_ID_PREFIX).ok_or_else(|| {
        ProviderError::invalid_data(
            PROVIDER,
            format!("reference id '{reference}' lacks the '{IMDB_ID_PREFIX}' prefix"),
        )
    })?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProviderError::invalid_data(
            PROVIDER,
            format!("reference id '{reference}' is not numeric"),
        ));
    }

    digits.parse::<i64>().map_err(|e| {
        ProviderError::invalid_data(PROVIDER, format!("reference id '{reference}': {e}"))
    })
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != NOT_AVAILABLE)
}
