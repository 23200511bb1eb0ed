use super::{types::Config, ConfigError};

/// Validate configuration at startup, before any job runs.
/// Currently validates:
/// - at least one retrieval strategy and one relay backend
/// - non-empty domain allow-list
/// - webhook URL is an absolute http(s) URL
/// - non-zero timeouts and job deadline
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.retriever.strategies.is_empty() {
        return Err(ConfigError::ValidationError(
            "retriever.strategies cannot be empty".to_string(),
        ));
    }
    if config.relay.backends.is_empty() {
        return Err(ConfigError::ValidationError(
            "relay.backends cannot be empty".to_string(),
        ));
    }
    if config.trigger.allowed_domains.is_empty() {
        return Err(ConfigError::ValidationError(
            "trigger.allowed_domains cannot be empty".to_string(),
        ));
    }
    if config.locator.video_extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "locator.video_extensions cannot be empty".to_string(),
        ));
    }

    match reqwest::Url::parse(&config.dispatch.webhook_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => {
            return Err(ConfigError::ValidationError(
                "dispatch.webhook_url must be an absolute http(s) URL".to_string(),
            ));
        }
    }

    for (name, value) in [
        ("retriever.timeout_secs", config.retriever.timeout_secs),
        ("dispatch.timeout_secs", config.dispatch.timeout_secs),
        (
            "orchestrator.job_deadline_secs",
            config.orchestrator.job_deadline_secs,
        ),
    ] {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{name} cannot be 0"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config_from_str;

    fn valid_config() -> Config {
        load_config_from_str(
            r#"
            [dispatch]
            webhook_url = "https://hook.example/t/abc"
        "#,
        )
        .unwrap()
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_strategies_fails() {
        let mut config = valid_config();
        config.retriever.strategies.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_empty_backends_fails() {
        let mut config = valid_config();
        config.relay.backends.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_relative_webhook_fails() {
        let mut config = valid_config();
        config.dispatch.webhook_url = "/just/a/path".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_deadline_fails() {
        let mut config = valid_config();
        config.orchestrator.job_deadline_secs = 0;
        assert!(validate_config(&config).is_err());
    }
}
