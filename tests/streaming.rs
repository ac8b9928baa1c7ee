//! Streamed-download flows: default buffering, early-stopping hooks,
//! and sink redirection.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use cask_storage::error::StorageError;
use cask_storage::transfer::{Consumed, Transfer, TransferState};
use futures::stream;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

fn transfer_of(chunks: Vec<&'static [u8]>) -> Transfer {
    let items = chunks
        .into_iter()
        .map(|chunk| Ok(Bytes::from_static(chunk)))
        .collect::<Vec<Result<Bytes, StorageError>>>();
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("content-type"),
        HeaderValue::from_static("application/octet-stream"),
    );
    Transfer::new(StatusCode::OK, headers, Box::pin(stream::iter(items)))
}

#[tokio::test]
async fn test_default_consumption_buffers_the_whole_body() {
    let mut transfer = transfer_of(vec![b"lorem ", b"ipsum ", b"dolor"]);
    let body = transfer.collect().await.unwrap();
    assert_eq!(&body[..], b"lorem ipsum dolor");
    assert_eq!(transfer.state(), TransferState::Completed);
}

#[tokio::test]
async fn test_hook_sees_status_and_headers_per_chunk() {
    let mut transfer = transfer_of(vec![b"a", b"b"]);
    let outcome = transfer
        .each_chunk(|frame| {
            assert_eq!(frame.status, StatusCode::OK);
            assert!(frame.headers.contains_key("content-type"));
            ControlFlow::<()>::Continue(())
        })
        .await
        .unwrap();
    assert_eq!(outcome, Consumed::Exhausted);
}

#[tokio::test]
async fn test_early_stop_leaves_later_chunks_unpulled() {
    let pulled = Arc::new(AtomicUsize::new(0));
    let counter = pulled.clone();
    let items = (0..10).map(move |_| -> Result<Bytes, StorageError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Bytes::from_static(b"chunk"))
    });
    let mut transfer = Transfer::new(
        StatusCode::OK,
        HeaderMap::new(),
        Box::pin(stream::iter(items)),
    );

    let outcome = transfer
        .each_chunk(|frame| ControlFlow::Break(frame.chunk.len()))
        .await
        .unwrap();
    assert_eq!(outcome, Consumed::Stopped(5));
    // only the first chunk was ever pulled off the stream
    assert_eq!(pulled.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sink_redirection_into_a_file() {
    let target = tempfile::NamedTempFile::new().unwrap();
    let mut sink = tokio::fs::File::create(target.path()).await.unwrap();

    let mut transfer = transfer_of(vec![b"first-", b"second-", b"third"]);
    let written = transfer.pipe_to(&mut sink).await.unwrap();
    drop(sink);

    assert_eq!(written, 18);
    let contents = std::fs::read(target.path()).unwrap();
    assert_eq!(&contents[..], b"first-second-third");
    assert_eq!(transfer.state(), TransferState::Completed);
}

#[tokio::test]
async fn test_a_transfer_is_single_pass() {
    let mut transfer = transfer_of(vec![b"only once"]);
    transfer.collect().await.unwrap();

    let err = transfer
        .each_chunk(|_| ControlFlow::<()>::Continue(()))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::StreamConsumed));

    let mut sink = Vec::new();
    let err = transfer.pipe_to(&mut sink).await.unwrap_err();
    assert!(matches!(err, StorageError::StreamConsumed));
}

#[tokio::test]
async fn test_mid_stream_error_fails_the_transfer() {
    let items: Vec<Result<Bytes, StorageError>> = vec![
        Ok(Bytes::from_static(b"partial")),
        Err(StorageError::Interrupted("connection reset".to_string())),
    ];
    let mut transfer = Transfer::new(
        StatusCode::OK,
        HeaderMap::new(),
        Box::pin(stream::iter(items)),
    );
    let err = transfer.collect().await.unwrap_err();
    assert!(matches!(err, StorageError::Interrupted(_)));
    assert_eq!(transfer.state(), TransferState::Failed);
}
