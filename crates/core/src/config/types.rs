use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchConfig;
use crate::locator::LocatorConfig;
use crate::orchestrator::OrchestratorConfig;
use crate::relay::{BackendKind, RelayConfig};
use crate::retriever::{AuthOrder, RetrieverConfig, StrategyKind};
use crate::trigger::TriggerConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub retriever: RetrieverConfig,
    #[serde(default)]
    pub locator: LocatorConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

/// Sanitized config for logs and status output (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub allowed_domains: Vec<String>,
    pub strategies: Vec<StrategyKind>,
    pub auth_order: AuthOrder,
    /// Kind only; the credential value never leaves the config struct.
    pub credential: Option<&'static str>,
    pub backends: Vec<BackendKind>,
    /// Webhook reduced to scheme and host; the path often embeds a
    /// secret token.
    pub webhook: String,
    pub source_tag: String,
    pub max_concurrent_jobs: usize,
    pub job_deadline_secs: u64,
}

impl Config {
    /// Projection safe to log or expose in status output.
    pub fn sanitized(&self) -> SanitizedConfig {
        let webhook = match reqwest::Url::parse(&self.dispatch.webhook_url) {
            Ok(url) => format!(
                "{}://{}/<redacted>",
                url.scheme(),
                url.host_str().unwrap_or("<invalid>")
            ),
            Err(_) => "<invalid>".to_string(),
        };

        SanitizedConfig {
            allowed_domains: self.trigger.allowed_domains.clone(),
            strategies: self.retriever.strategies.clone(),
            auth_order: self.retriever.auth_order,
            credential: self.retriever.credential.as_ref().map(|c| c.kind()),
            backends: self.relay.backends.clone(),
            webhook,
            source_tag: self.dispatch.source_tag.clone(),
            max_concurrent_jobs: self.orchestrator.max_concurrent_jobs,
            job_deadline_secs: self.orchestrator.job_deadline_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
            [dispatch]
            webhook_url = "https://hook.example/t/secret-token-123"
        "#
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.trigger.allowed_domains, vec!["instagram.com"]);
        assert_eq!(config.retriever.strategies, vec![StrategyKind::Instaloader]);
        assert_eq!(config.relay.backends.len(), 3);
        assert_eq!(config.orchestrator.max_concurrent_jobs, 2);
    }

    #[test]
    fn test_missing_dispatch_section_fails() {
        let result = toml::from_str::<Config>("[trigger]\nallowed_domains = [\"a.com\"]\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_redacts_secrets() {
        let toml = r#"
            [retriever.credential]
            session_token = "super-secret"

            [dispatch]
            webhook_url = "https://hook.example/t/secret-token-123"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = config.sanitized();

        assert_eq!(sanitized.credential, Some("session_token"));
        assert_eq!(sanitized.webhook, "https://hook.example/<redacted>");

        let rendered = serde_json::to_string(&sanitized).unwrap();
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("secret-token-123"));
    }
}
