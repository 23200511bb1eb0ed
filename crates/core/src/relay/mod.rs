//! Relay module: publishing a retrieved artifact to an ephemeral
//! public host via an ordered fallback chain of backends.

mod chain;
mod config;
mod error;
mod file_io;
mod null_pointer;
mod traits;
mod transfer_sh;
mod types;

use std::sync::Arc;

use tokio_util::io::ReaderStream;

use crate::retriever::RetrievedArtifact;

pub use chain::UploaderChain;
pub use config::{FileIoConfig, NullPointerConfig, RelayConfig, TransferShConfig};
pub use error::{BackendFailure, RelayError, UploadError};
pub use file_io::FileIoBackend;
pub use null_pointer::NullPointerBackend;
pub use traits::RelayBackend;
pub use transfer_sh::TransferShBackend;
pub use types::{BackendKind, PublicLink};

/// Builds the uploader chain from configuration, in configured order.
pub fn create_chain(config: &RelayConfig) -> UploaderChain {
    let backends = config
        .backends
        .iter()
        .map(|kind| -> Arc<dyn RelayBackend> {
            match kind {
                BackendKind::TransferSh => Arc::new(TransferShBackend::new(&config.transfer_sh)),
                BackendKind::NullPointer => Arc::new(NullPointerBackend::new(&config.null_pointer)),
                BackendKind::FileIo => Arc::new(FileIoBackend::new(&config.file_io)),
            }
        })
        .collect();
    UploaderChain::new(backends)
}

/// Opens the artifact as a streaming request body with its known
/// length, so uploads never buffer the whole file in memory.
pub(crate) async fn stream_artifact(
    artifact: &RetrievedArtifact,
) -> Result<(reqwest::Body, u64), UploadError> {
    let file = tokio::fs::File::open(artifact.path()).await?;
    Ok((
        reqwest::Body::wrap_stream(ReaderStream::new(file)),
        artifact.size_bytes(),
    ))
}

/// Maps a reqwest transport error to the upload error taxonomy.
pub(crate) fn map_send_error(error: reqwest::Error, timeout_secs: u64) -> UploadError {
    if error.is_timeout() {
        UploadError::Timeout { secs: timeout_secs }
    } else {
        UploadError::Network(error.to_string())
    }
}

/// Bounded copy of a response body for diagnostics.
pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(200).collect()
}
