//! Library configuration loaded from environment variables.
//!
//! The storage backend is selected here once; everything downstream receives
//! the chosen backend as a trait object and never branches on it again.

use std::env;
use std::path::PathBuf;

/// Which storage backend to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Firestore document database
    Cloud,
    /// Persisted JSON file with the same logical schema
    Local,
}

/// Library configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Storage backend selection
    pub backend: StoreBackend,
    /// GCP project ID (cloud backend)
    pub gcp_project_id: String,
    /// Path of the local store file (local backend)
    pub local_data_path: PathBuf,
    /// Identity provider base URL (cloud backend)
    pub identity_endpoint: String,
    /// Identity provider API key (cloud backend)
    pub identity_api_key: String,
    /// HS256 signing key for session tokens (raw bytes)
    pub session_signing_key: Vec<u8>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            backend: StoreBackend::Local,
            gcp_project_id: "test-project".to_string(),
            local_data_path: PathBuf::from("tradepost-data.json"),
            identity_endpoint: "https://identitytoolkit.googleapis.com".to_string(),
            identity_api_key: "test_api_key".to_string(),
            session_signing_key: b"test_session_key_32_bytes_min!!".to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let backend = match env::var("TRADEPOST_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .as_str()
        {
            "cloud" => StoreBackend::Cloud,
            "local" => StoreBackend::Local,
            other => return Err(ConfigError::InvalidBackend(other.to_string())),
        };

        Ok(Self {
            backend,
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            local_data_path: env::var("TRADEPOST_DATA_PATH")
                .unwrap_or_else(|_| "tradepost-data.json".to_string())
                .into(),
            identity_endpoint: env::var("IDENTITY_ENDPOINT")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_string()),
            // Required only for the cloud backend; the local backend stores
            // credentials itself.
            identity_api_key: match backend {
                StoreBackend::Cloud => env::var("IDENTITY_API_KEY")
                    .map_err(|_| ConfigError::Missing("IDENTITY_API_KEY"))?,
                StoreBackend::Local => env::var("IDENTITY_API_KEY").unwrap_or_default(),
            },
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Unknown storage backend: {0}")]
    InvalidBackend(String),
}
