//! Retriever configuration.

use serde::{Deserialize, Serialize};

use super::types::Credential;

/// Available retrieval strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Instagram-specific retrieval via the `instaloader` CLI.
    Instaloader,
    /// Generic retrieval via the `yt-dlp` CLI.
    YtDlp,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Instaloader => "instaloader",
            StrategyKind::YtDlp => "yt-dlp",
        }
    }
}

/// Ordering policy for the authenticated retrieval fallback.
///
/// The legacy revisions of this pipeline disagreed on whether to lead
/// with the credential; the order is explicit configuration here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthOrder {
    /// Try anonymously, fall back to the credential on failure.
    #[default]
    UnauthenticatedFirst,
    /// Lead with the credential, fall back to an anonymous attempt.
    AuthenticatedFirst,
}

/// Configuration for the retrieval step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Strategies to try, in order. The first one that produces an
    /// artifact wins.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<StrategyKind>,

    /// When a credential is configured, whether the authenticated
    /// attempt comes before or after the anonymous one.
    #[serde(default)]
    pub auth_order: AuthOrder,

    /// Per-invocation timeout for the extraction tool (seconds).
    /// The process is killed when it expires.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Path or name of the instaloader binary.
    #[serde(default = "default_instaloader_bin")]
    pub instaloader_bin: String,

    /// Path or name of the yt-dlp binary.
    #[serde(default = "default_ytdlp_bin")]
    pub ytdlp_bin: String,

    /// Optional credential for authenticated retrieval.
    #[serde(default)]
    pub credential: Option<Credential>,
}

fn default_strategies() -> Vec<StrategyKind> {
    vec![StrategyKind::Instaloader]
}

fn default_timeout() -> u64 {
    180
}

fn default_instaloader_bin() -> String {
    "instaloader".to_string()
}

fn default_ytdlp_bin() -> String {
    "yt-dlp".to_string()
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            auth_order: AuthOrder::default(),
            timeout_secs: default_timeout(),
            instaloader_bin: default_instaloader_bin(),
            ytdlp_bin: default_ytdlp_bin(),
            credential: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RetrieverConfig::default();
        assert_eq!(config.strategies, vec![StrategyKind::Instaloader]);
        assert_eq!(config.auth_order, AuthOrder::UnauthenticatedFirst);
        assert_eq!(config.timeout_secs, 180);
        assert!(config.credential.is_none());
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            strategies = ["instaloader", "yt_dlp"]
            auth_order = "authenticated_first"
            timeout_secs = 60

            [credential]
            session_token = "abc123"
        "#;
        let config: RetrieverConfig = toml::from_str(toml).unwrap();
        assert_eq!(
            config.strategies,
            vec![StrategyKind::Instaloader, StrategyKind::YtDlp]
        );
        assert_eq!(config.auth_order, AuthOrder::AuthenticatedFirst);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.credential.unwrap().kind(), "session_token");
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: RetrieverConfig = toml::from_str("").unwrap();
        assert_eq!(config.instaloader_bin, "instaloader");
        assert_eq!(config.ytdlp_bin, "yt-dlp");
    }
}
