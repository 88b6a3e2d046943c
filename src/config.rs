use crate::errors::MediaError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket_root: String,
}

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub filename_max_length: usize,
    pub probe_images: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self, MediaError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Self {
            api: ApiConfig {
                base_url: std::env::var("CLOUDMEDIA_API_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
                timeout_secs: std::env::var("CLOUDMEDIA_API_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
                accept_invalid_certs: env_flag("CLOUDMEDIA_ACCEPT_INVALID_CERTS", false),
            },
            storage: StorageConfig {
                bucket_root: std::env::var("CLOUDMEDIA_BUCKET_URL")
                    .unwrap_or_else(|_| "http://localhost:9000/media".to_string()),
            },
            ui: UiConfig {
                filename_max_length: std::env::var("CLOUDMEDIA_FILENAME_MAX_LENGTH")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()
                    .unwrap_or(15),
                probe_images: env_flag("CLOUDMEDIA_PROBE_IMAGES", true),
            },
        };

        config.normalized()
    }

    /// Config pointing at explicit endpoints, everything else default.
    pub fn with_endpoints(api_url: &str, bucket_root: &str) -> Result<Self, MediaError> {
        Self {
            api: ApiConfig { base_url: api_url.to_string(), timeout_secs: 30, accept_invalid_certs: false },
            storage: StorageConfig { bucket_root: bucket_root.to_string() },
            ui: UiConfig { filename_max_length: 15, probe_images: true },
        }
        .normalized()
    }

    /// Validate both URLs and strip trailing slashes so joins never double them.
    fn normalized(mut self) -> Result<Self, MediaError> {
        self.api.base_url = normalize_url("CLOUDMEDIA_API_URL", &self.api.base_url)?;
        self.storage.bucket_root = normalize_url("CLOUDMEDIA_BUCKET_URL", &self.storage.bucket_root)?;
        Ok(self)
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key).map(|v| parse_flag(&v, default)).unwrap_or(default)
}

/// Unrecognised values keep `default`.
fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => true,
        "false" | "0" | "no" => false,
        _ => default,
    }
}

fn normalize_url(key: &str, raw: &str) -> Result<String, MediaError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| MediaError::InvalidConfig(format!("{key}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MediaError::InvalidConfig(format!("{key}: unsupported scheme '{}'", parsed.scheme())));
    }
    Ok(trimmed.to_string())
}
