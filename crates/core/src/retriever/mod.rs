//! Retrieval strategies: turning a source URL into a local media file.
//!
//! Each strategy wraps one external extraction tool as a subprocess.
//! The [`AuthenticatedRetriever`] decorator adds the single-retry
//! credential fallback on top of any strategy.

mod auth;
mod config;
mod error;
mod instaloader;
pub(crate) mod process;
mod traits;
mod types;
mod ytdlp;

use std::sync::Arc;

use crate::locator::LocatorConfig;

pub use auth::AuthenticatedRetriever;
pub use config::{AuthOrder, RetrieverConfig, StrategyKind};
pub use error::{LocateError, RetrieveError};
pub use instaloader::InstaloaderRetriever;
pub use traits::Retriever;
pub use types::{Credential, RetrievalJob, RetrievedArtifact};
pub use ytdlp::YtDlpRetriever;

/// Builds the configured strategies, in order, each wrapped with the
/// credential fallback decorator.
pub fn create_strategies(
    config: &RetrieverConfig,
    locator: &LocatorConfig,
) -> Vec<AuthenticatedRetriever> {
    config
        .strategies
        .iter()
        .map(|kind| {
            let inner: Arc<dyn Retriever> = match kind {
                StrategyKind::Instaloader => {
                    Arc::new(InstaloaderRetriever::new(config, locator))
                }
                StrategyKind::YtDlp => Arc::new(YtDlpRetriever::new(config, locator)),
            };
            AuthenticatedRetriever::new(inner, config.credential.clone(), config.auth_order)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_strategies_preserves_order() {
        let config = RetrieverConfig {
            strategies: vec![StrategyKind::YtDlp, StrategyKind::Instaloader],
            ..RetrieverConfig::default()
        };
        let strategies = create_strategies(&config, &LocatorConfig::default());
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0].id(), "yt-dlp");
        assert_eq!(strategies[1].id(), "instaloader");
    }
}
