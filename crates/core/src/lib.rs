//! Core library for the reelay media relay pipeline.
//!
//! A triggered job flows through four components, each with its own
//! internal fallback but no retry across component boundaries:
//! retrieval strategies (with a credential fallback decorator), the
//! media locator (with an optional remux step), the relay uploader
//! chain, and the dispatch notifier. The orchestrator sequences them,
//! owns the per-job working directory, and guarantees its removal on
//! every exit path.

pub mod config;
pub mod dispatch;
pub mod locator;
pub mod orchestrator;
pub mod relay;
pub mod retriever;
pub mod testing;
pub mod trigger;

pub use config::{load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig};
pub use dispatch::{DispatchAck, DispatchConfig, DispatchError, DispatchPayload, Notifier, WebhookNotifier};
pub use locator::LocatorConfig;
pub use orchestrator::{
    FailureKind, JobError, JobReceipt, JobState, LogProgress, OrchestratorConfig, ProgressSink,
    RelayOrchestrator,
};
pub use relay::{
    BackendKind, PublicLink, RelayBackend, RelayConfig, RelayError, UploadError, UploaderChain,
};
pub use retriever::{
    AuthOrder, AuthenticatedRetriever, Credential, RetrievalJob, RetrieveError, RetrievedArtifact,
    Retriever, RetrieverConfig, StrategyKind,
};
pub use trigger::{TriggerConfig, TriggerError, TriggerRequest};
