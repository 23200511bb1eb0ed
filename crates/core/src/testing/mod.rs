//! Test doubles for the pipeline components.
//!
//! Used by the integration tests under `tests/` and available to
//! downstream consumers for their own testing.

mod mock_backend;
mod mock_notifier;
mod mock_retriever;

pub use mock_backend::MockBackend;
pub use mock_notifier::MockNotifier;
pub use mock_retriever::{MockFailure, MockRetriever};
