/// Configuration management for board-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://wordtile.db?mode=rwc";

const LEGACY_POSTGRES_SCHEME: &str = "postgres://";
const POSTGRES_SCHEME: &str = "postgresql://";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Config {
            app: AppConfig {
                host: std::env::var("BOARD_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("BOARD_PORT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5001),
            },
            database: DatabaseConfig {
                url: resolve_database_url(std::env::var("DATABASE_URL").ok()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
        }
    }
}

/// Pick the connection string: the provided value when set and non-blank,
/// otherwise the local SQLite default. A legacy `postgres://` prefix is
/// rewritten to `postgresql://`.
pub fn resolve_database_url(raw: Option<String>) -> String {
    let Some(url) = raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) else {
        tracing::info!("DATABASE_URL not set, using default: {DEFAULT_DATABASE_URL}");
        return DEFAULT_DATABASE_URL.to_string();
    };

    match url.strip_prefix(LEGACY_POSTGRES_SCHEME) {
        Some(rest) => format!("{POSTGRES_SCHEME}{rest}"),
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_blank_url_falls_back_to_sqlite() {
        assert_eq!(resolve_database_url(None), DEFAULT_DATABASE_URL);
        assert_eq!(resolve_database_url(Some("  ".into())), DEFAULT_DATABASE_URL);
    }

    #[test]
    fn legacy_postgres_scheme_is_rewritten_once() {
        assert_eq!(
            resolve_database_url(Some("postgres://u:p@db:5432/board".into())),
            "postgresql://u:p@db:5432/board"
        );
        assert_eq!(
            resolve_database_url(Some("postgresql://u:p@db/board".into())),
            "postgresql://u:p@db/board"
        );
        assert_eq!(
            resolve_database_url(Some("sqlite://other.db".into())),
            "sqlite://other.db"
        );
    }

    #[test]
    fn debug_output_redacts_url() {
        let cfg = DatabaseConfig {
            url: "postgresql://user:secret@db/board".into(),
            max_connections: 2,
        };
        assert!(!format!("{cfg:?}").contains("secret"));
    }
}
