//! Uploader chain integration tests: backend ordering, short-circuit
//! on first success, and failure aggregation.

use std::sync::Arc;

use tempfile::TempDir;

use reelay_core::{
    testing::MockBackend, BackendKind, RelayBackend, RelayError, RetrievedArtifact, UploaderChain,
};

struct ChainHarness {
    chain: UploaderChain,
    backends: Vec<MockBackend>,
    _temp_dir: TempDir,
    artifact: RetrievedArtifact,
}

impl ChainHarness {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("clip.mp4");
        tokio::fs::write(&path, vec![0u8; 2048])
            .await
            .expect("Failed to write artifact");
        let artifact = RetrievedArtifact::try_from_path(&path)
            .await
            .expect("artifact must exist");

        let backends = vec![
            MockBackend::new(BackendKind::TransferSh),
            MockBackend::new(BackendKind::NullPointer),
            MockBackend::new(BackendKind::FileIo),
        ];
        let chain = UploaderChain::new(
            backends
                .iter()
                .map(|b| Arc::new(b.clone()) as Arc<dyn RelayBackend>)
                .collect(),
        );

        Self {
            chain,
            backends,
            _temp_dir: temp_dir,
            artifact,
        }
    }
}

#[tokio::test]
async fn test_first_success_short_circuits() {
    let harness = ChainHarness::new().await;
    harness.backends[0]
        .succeed_with("https://transfer.example/abc")
        .await;

    let link = harness.chain.upload(&harness.artifact).await.unwrap();

    assert_eq!(link.url, "https://transfer.example/abc");
    assert_eq!(link.backend, BackendKind::TransferSh);
    assert_eq!(harness.backends[0].calls(), 1);
    assert_eq!(harness.backends[1].calls(), 0);
    assert_eq!(harness.backends[2].calls(), 0);
}

#[tokio::test]
async fn test_falls_through_to_last_backend() {
    let harness = ChainHarness::new().await;
    harness.backends[0].fail_with_status(503).await;
    harness.backends[1].fail_network().await;
    harness.backends[2]
        .succeed_with("https://file.example/final")
        .await;

    let link = harness.chain.upload(&harness.artifact).await.unwrap();

    assert_eq!(link.url, "https://file.example/final");
    assert_eq!(link.backend, BackendKind::FileIo);
    // Each earlier backend was tried exactly once.
    for backend in &harness.backends {
        assert_eq!(backend.calls(), 1);
    }
}

#[tokio::test]
async fn test_bad_response_counts_as_failure() {
    let harness = ChainHarness::new().await;
    harness.backends[0].fail_bad_response().await;
    harness.backends[1]
        .succeed_with("https://null.example/ok")
        .await;

    let link = harness.chain.upload(&harness.artifact).await.unwrap();

    assert_eq!(link.backend, BackendKind::NullPointer);
    assert_eq!(harness.backends[0].calls(), 1);
    assert_eq!(harness.backends[2].calls(), 0);
}

#[tokio::test]
async fn test_all_backends_failing_aggregates_in_order() {
    let harness = ChainHarness::new().await;
    harness.backends[0].fail_with_status(500).await;
    harness.backends[1].fail_network().await;
    harness.backends[2].fail_bad_response().await;

    let err = harness.chain.upload(&harness.artifact).await.unwrap_err();

    let RelayError::AllBackendsFailed { failures } = err;
    assert_eq!(failures.len(), 3);
    // One entry per backend, in the configured order.
    assert_eq!(
        failures.iter().map(|f| f.backend).collect::<Vec<_>>(),
        vec![
            BackendKind::TransferSh,
            BackendKind::NullPointer,
            BackendKind::FileIo,
        ]
    );
    for backend in &harness.backends {
        assert_eq!(backend.calls(), 1);
    }
}
