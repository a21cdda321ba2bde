use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub omdb: OmdbConfig,

    pub tmdb: TmdbConfig,

    pub http: HttpConfig,

    pub server: ServerConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// `"pretty"` or `"json"`
    pub log_format: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/marquee.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

/// Primary (authoritative) metadata provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OmdbConfig {
    pub api_key: String,

    pub base_url: String,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://www.omdbapi.com/".to_string(),
        }
    }
}

/// Secondary (supplementary) metadata provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_key: String,

    pub base_url: String,

    pub image_base_url: String,

    /// Size token used for posters (w92, w154, w185, w342, w500, w780, original)
    pub poster_size: String,

    /// Size token used for backdrops (w300, w780, w1280, original)
    pub backdrop_size: String,

    pub fetch_similar: bool,

    pub fetch_images: bool,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/".to_string(),
            poster_size: "w500".to_string(),
            backdrop_size: "w1280".to_string(),
            fetch_similar: true,
            fetch_images: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Applies to every provider and CDN request (default: 30)
    pub request_timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            user_agent: format!("Marquee/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 8080,
            cors_allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = paths
            .iter()
            .find(|path| path.exists())
            .map_or_else(
                || {
                    info!("No config file found, using defaults");
                    Ok(Self::default())
                },
                |path| {
                    info!("Loading config from: {}", path.display());
                    Self::load_from_path(path)
                },
            )?;

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets and the database location may come from the environment
    /// (or a `.env` file) instead of the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OMDB_API_KEY")
            && !key.is_empty()
        {
            self.omdb.api_key = key;
        }
        if let Ok(key) = std::env::var("TMDB_API_KEY")
            && !key.is_empty()
        {
            self.tmdb.api_key = key;
        }
        if let Ok(url) = std::env::var("MARQUEE_DATABASE_URL")
            && !url.is_empty()
        {
            self.general.database_path = url;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("marquee").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".marquee").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.omdb.api_key.trim().is_empty() {
            anyhow::bail!("OMDb API key is not set (omdb.api_key or OMDB_API_KEY)");
        }

        if self.tmdb.api_key.trim().is_empty() {
            anyhow::bail!("TMDB API key is not set (tmdb.api_key or TMDB_API_KEY)");
        }

        for (name, value) in [
            ("omdb.base_url", &self.omdb.base_url),
            ("tmdb.base_url", &self.tmdb.base_url),
            ("tmdb.image_base_url", &self.tmdb.image_base_url),
        ] {
            url::Url::parse(value).with_context(|| format!("Invalid URL for {name}: {value}"))?;
        }

        if self.http.request_timeout_seconds == 0 {
            anyhow::bail!("http.request_timeout_seconds must be > 0");
        }

        if self.general.min_db_connections > self.general.max_db_connections {
            anyhow::bail!("general.min_db_connections cannot exceed general.max_db_connections");
        }

        Ok(())
    }
}
