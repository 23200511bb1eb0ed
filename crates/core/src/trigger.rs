//! Inbound trigger: the `{sourceUrl, caption}` pair delivered by the
//! chat-command front-end, validated against the domain allow-list
//! before any retrieval work starts.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for trigger validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Domains the relay accepts source URLs from. A URL is accepted
    /// when its host equals an entry or is a subdomain of one.
    #[serde(default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,
}

fn default_allowed_domains() -> Vec<String> {
    vec!["instagram.com".to_string()]
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            allowed_domains: default_allowed_domains(),
        }
    }
}

/// Why a trigger was rejected before retrieval.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("not a valid absolute URL: {0}")]
    MalformedUrl(String),

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("domain not allowed: {0}")]
    DomainNotAllowed(String),
}

/// One inbound request from the trigger origin.
#[derive(Debug, Clone)]
pub struct TriggerRequest {
    pub source_url: String,
    pub caption: String,
}

impl TriggerRequest {
    /// Validates the source URL against the allow-list, returning the
    /// parsed URL on success.
    pub fn validate(&self, allowed_domains: &[String]) -> Result<Url, TriggerError> {
        let url = Url::parse(self.source_url.trim())
            .map_err(|_| TriggerError::MalformedUrl(self.source_url.clone()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(TriggerError::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url
            .host_str()
            .ok_or_else(|| TriggerError::MalformedUrl(self.source_url.clone()))?;

        let allowed = allowed_domains
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));
        if !allowed {
            return Err(TriggerError::DomainNotAllowed(host.to_string()));
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> TriggerRequest {
        TriggerRequest {
            source_url: url.to_string(),
            caption: String::new(),
        }
    }

    fn allowed() -> Vec<String> {
        default_allowed_domains()
    }

    #[test]
    fn test_accepts_exact_domain() {
        assert!(request("https://instagram.com/reel/ABC/")
            .validate(&allowed())
            .is_ok());
    }

    #[test]
    fn test_accepts_subdomain() {
        assert!(request("https://www.instagram.com/reel/ABC123/")
            .validate(&allowed())
            .is_ok());
    }

    #[test]
    fn test_rejects_lookalike_domain() {
        let err = request("https://notinstagram.com/reel/ABC/")
            .validate(&allowed())
            .unwrap_err();
        assert!(matches!(err, TriggerError::DomainNotAllowed(_)));
    }

    #[test]
    fn test_rejects_other_domain() {
        let err = request("https://www.youtube.com/watch?v=x")
            .validate(&allowed())
            .unwrap_err();
        assert!(matches!(err, TriggerError::DomainNotAllowed(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = request("not a url at all").validate(&allowed()).unwrap_err();
        assert!(matches!(err, TriggerError::MalformedUrl(_)));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let err = request("ftp://instagram.com/file")
            .validate(&allowed())
            .unwrap_err();
        assert!(matches!(err, TriggerError::UnsupportedScheme(_)));
    }

    #[test]
    fn test_trims_whitespace() {
        assert!(request("  https://instagram.com/reel/ABC/  ")
            .validate(&allowed())
            .is_ok());
    }
}
