/// Configuration management for media-feed-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CorsConfig {
    /// `*` allows any origin.
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub metadata_file: PathBuf,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: std::env::var("MEDIA_FEED_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("MEDIA_FEED_PORT", 5000),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(
                    &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
                ),
            },
            storage: StorageConfig {
                upload_dir: std::env::var("MEDIA_FEED_UPLOAD_DIR")
                    .unwrap_or_else(|_| "uploads".to_string())
                    .into(),
                metadata_file: std::env::var("MEDIA_FEED_METADATA_FILE")
                    .unwrap_or_else(|_| "posts_metadata.json".to_string())
                    .into(),
                max_upload_bytes: parse_var("MEDIA_FEED_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            },
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            metadata_file: PathBuf::from("posts_metadata.json"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

fn parse_var<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid {key} value {raw:?}, using default: {default}");
            default
        }),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        assert_eq!(
            parse_origins(" https://a.example , https://b.example,,"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(parse_origins("*"), vec!["*"]);
    }
}
