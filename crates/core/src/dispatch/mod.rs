//! Dispatch module: final notification to the downstream automation
//! consumer once the artifact is publicly hosted.

mod error;
mod traits;
mod types;
mod webhook;

use serde::{Deserialize, Serialize};

pub use error::DispatchError;
pub use traits::Notifier;
pub use types::{DispatchAck, DispatchPayload};
pub use webhook::WebhookNotifier;

/// Configuration for the dispatch step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Downstream webhook URL. Required; often carries an embedded
    /// secret, so it is redacted in sanitized config output.
    pub webhook_url: String,

    /// Origin tag sent as the payload's `source` field.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,

    /// Request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_source_tag() -> String {
    "reelay".to_string()
}

fn default_timeout() -> u64 {
    60
}
