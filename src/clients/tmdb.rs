use super::genres;
use super::{ProviderError, SecondarySource};
use crate::config::TmdbConfig;
use crate::models::movie::{ImageType, NewImage, SecondaryRecord};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, header::CONTENT_TYPE};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

const PROVIDER: &str = "TMDB";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: i64,
    title: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct MovieDetail {
    title: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    credits: Option<Credits>,
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimilarResponse {
    #[serde(default)]
    results: Vec<SimilarHit>,
}

#[derive(Debug, Deserialize)]
struct SimilarHit {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    #[must_use]
    pub fn new(client: Client, config: &TmdbConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// Search, then detail. Both must succeed; the similar-title lookup and
    /// the artwork downloads that follow are best-effort.
    pub async fn fetch_movie(&self, title: &str) -> Result<SecondaryRecord, ProviderError> {
        let search: SearchResponse = self
            .get_json("/search/movie", &[("query", title)], title)
            .await?;

        let hit = search
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::NotFound {
                provider: PROVIDER,
                title: title.to_string(),
            })?;

        debug!(tmdb_id = hit.id, hit_title = ?hit.title, "TMDB search hit");

        let detail: MovieDetail = self
            .get_json(
                &format!("/movie/{}", hit.id),
                &[("append_to_response", "credits")],
                title,
            )
            .await?;

        let mut record = SecondaryRecord {
            year: detail.release_date.as_deref().and_then(release_year),
            director: detail.credits.as_ref().and_then(director_from_credits),
            genre: hit
                .genre_ids
                .first()
                .map(|id| genres::genre_name(*id).to_string()),
            title: detail.title.clone().or(hit.title),
            ..SecondaryRecord::default()
        };

        if self.config.fetch_similar {
            record.similar_title = self.similar_title_best_effort(hit.id, title).await;
        }

        if self.config.fetch_images {
            let artwork = [
                (
                    ImageType::Poster,
                    detail.poster_path.as_deref(),
                    self.config.poster_size.as_str(),
                ),
                (
                    ImageType::Backdrop,
                    detail.backdrop_path.as_deref(),
                    self.config.backdrop_size.as_str(),
                ),
            ];

            for (image_type, path, size) in artwork {
                let Some(path) = path else {
                    continue;
                };
                if let Some(image) = self.image_best_effort(image_type, size, path).await {
                    record.images.push(image);
                }
            }
        }

        info!(
            title,
            genre = ?record.genre,
            similar = ?record.similar_title,
            images = record.images.len(),
            "TMDB data fetched"
        );

        Ok(record)
    }

    async fn similar_title_best_effort(&self, tmdb_id: i64, title: &str) -> Option<String> {
        match self.fetch_similar_title(tmdb_id, title).await {
            Ok(similar) => similar,
            Err(e) => {
                warn!(tmdb_id, error = %e, "Similar title lookup failed, continuing without it");
                metrics::counter!("secondary_fetch_failures_total", "step" => "similar")
                    .increment(1);
                None
            }
        }
    }

    async fn fetch_similar_title(
        &self,
        tmdb_id: i64,
        title: &str,
    ) -> Result<Option<String>, ProviderError> {
        let similar: SimilarResponse = self
            .get_json(&format!("/movie/{tmdb_id}/similar"), &[], title)
            .await?;

        Ok(similar
            .results
            .into_iter()
            .filter_map(|hit| hit.title)
            .find(|t| !t.trim().is_empty()))
    }

    async fn image_best_effort(
        &self,
        image_type: ImageType,
        size: &str,
        path: &str,
    ) -> Option<NewImage> {
        match self.download_image(image_type, size, path).await {
            Ok(image) => Some(image),
            Err(e) => {
                let step = match image_type {
                    ImageType::Poster => "poster",
                    ImageType::Backdrop => "backdrop",
                };
                warn!(%image_type, path, error = %e, "Image download failed, continuing without it");
                metrics::counter!("secondary_fetch_failures_total", "step" => step).increment(1);
                None
            }
        }
    }

    pub async fn download_image(
        &self,
        image_type: ImageType,
        size: &str,
        path: &str,
    ) -> Result<NewImage, ProviderError> {
        let url = image_url(&self.config.image_base_url, size, path);
        debug!(url = %url, %image_type, "Downloading image");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::upstream(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::upstream(
                PROVIDER,
                format!("image {url} returned {status}"),
            ));
        }

        let header_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let payload = response
            .bytes()
            .await
            .map_err(|e| ProviderError::upstream(PROVIDER, e.to_string()))?;

        if payload.is_empty() {
            return Err(ProviderError::invalid_data(
                PROVIDER,
                format!("image {url} is empty"),
            ));
        }

        Ok(NewImage {
            image_type,
            content_type: content_type_for(path, header_type.as_deref()),
            payload: payload.to_vec(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        title: &str,
    ) -> Result<T, ProviderError> {
        let mut url = Url::parse(&format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            path
        ))
        .map_err(|e| ProviderError::upstream(PROVIDER, format!("bad URL for {path}: {e}")))?;

        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .extend_pairs(params);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::upstream(PROVIDER, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_default();

            return Err(match status {
                StatusCode::UNAUTHORIZED => ProviderError::Auth { provider: PROVIDER },
                StatusCode::NOT_FOUND => ProviderError::NotFound {
                    provider: PROVIDER,
                    title: title.to_string(),
                },
                _ => ProviderError::upstream(PROVIDER, format!("{path}: {status} - {message}")),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::upstream(PROVIDER, format!("malformed {path} response: {e}")))
    }
}

#[async_trait]
impl SecondarySource for TmdbClient {
    async fn fetch(&self, title: &str) -> Result<SecondaryRecord, ProviderError> {
        self.fetch_movie(title).await
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

/// `base + size + relative path`, e.g. `https://image.tmdb.org/t/p/` + `w500` + `/abc.jpg`.
#[must_use]
pub fn image_url(base: &str, size: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{size}/{path}")
}

fn release_year(date: &str) -> Option<String> {
    date.get(..4).map(str::to_string)
}

fn director_from_credits(credits: &Credits) -> Option<String> {
    credits
        .crew
        .iter()
        .find(|member| member.job.as_deref() == Some("Director"))
        .map(|member| member.name.clone())
        .filter(|name| !name.trim().is_empty())
}

fn content_type_for(path: &str, header: Option<&str>) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .or_else(|| header.map(str::to_string))
        .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
}
