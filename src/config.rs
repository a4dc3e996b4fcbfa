use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "TriagePortal";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default chat-completions endpoint (OpenAI-compatible).
pub const DEFAULT_COMPLETIONS_BASE_URL: &str = "https://api.openai.com/v1";

/// Default triage model.
pub const DEFAULT_TRIAGE_MODEL: &str = "gpt-3.5-turbo";

/// Default bound on a single triage call. A timeout is handled like any
/// other service failure: the submission proceeds with a degraded result.
pub const DEFAULT_TRIAGE_TIMEOUT_SECS: u64 = 8;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to (`PORTAL_BIND`).
    pub bind_addr: SocketAddr,
    /// Directory holding the database and uploaded attachments
    /// (`PORTAL_DATA_DIR`).
    pub data_dir: PathBuf,
    /// Credential for the completion service (`OPENAI_API_KEY`).
    /// `None` disables AI triage entirely — submissions still succeed
    /// with a fixed "manual review" result.
    pub openai_api_key: Option<String>,
    /// Base URL of the completion service (`OPENAI_BASE_URL`).
    pub openai_base_url: String,
    /// Model name sent with each completion request (`TRIAGE_MODEL`).
    pub triage_model: String,
    /// Per-call timeout in seconds (`TRIAGE_TIMEOUT_SECS`).
    pub triage_timeout_secs: u64,
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let bind_addr = std::env::var("PORTAL_BIND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| ([127, 0, 0, 1], 5000).into());

        let data_dir = std::env::var("PORTAL_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let openai_api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_COMPLETIONS_BASE_URL.to_string());

        let triage_model =
            std::env::var("TRIAGE_MODEL").unwrap_or_else(|_| DEFAULT_TRIAGE_MODEL.to_string());

        let triage_timeout_secs = std::env::var("TRIAGE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TRIAGE_TIMEOUT_SECS);

        Self {
            bind_addr,
            data_dir,
            openai_api_key,
            openai_base_url,
            triage_model,
            triage_timeout_secs,
        }
    }

    /// Path of the portal database inside the data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("portal.db")
    }

    /// Directory where uploaded attachments are persisted.
    pub fn upload_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

impl Default for AppConfig {
    /// The configuration an empty environment would produce.
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 5000).into(),
            data_dir: default_data_dir(),
            openai_api_key: None,
            openai_base_url: DEFAULT_COMPLETIONS_BASE_URL.to_string(),
            triage_model: DEFAULT_TRIAGE_MODEL.to_string(),
            triage_timeout_secs: DEFAULT_TRIAGE_TIMEOUT_SECS,
        }
    }
}

/// Get the default application data directory
/// ~/TriagePortal/ on all platforms (user-visible)
pub fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,triage_portal=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_under_home() {
        let dir = default_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("TriagePortal"));
    }

    #[test]
    fn db_and_upload_paths_under_data_dir() {
        let config = AppConfig {
            bind_addr: ([127, 0, 0, 1], 5000).into(),
            data_dir: PathBuf::from("/tmp/portal-test"),
            openai_api_key: None,
            openai_base_url: DEFAULT_COMPLETIONS_BASE_URL.into(),
            triage_model: DEFAULT_TRIAGE_MODEL.into(),
            triage_timeout_secs: DEFAULT_TRIAGE_TIMEOUT_SECS,
        };
        assert_eq!(config.db_path(), PathBuf::from("/tmp/portal-test/portal.db"));
        assert_eq!(config.upload_dir(), PathBuf::from("/tmp/portal-test/uploads"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn triage_timeout_is_single_digit_seconds() {
        assert!(DEFAULT_TRIAGE_TIMEOUT_SECS < 10);
    }
}
