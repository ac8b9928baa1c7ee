//! Lazy, single-pass streaming for large downloads.

use std::fmt;
use std::ops::ControlFlow;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use http::{HeaderMap, StatusCode};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::StorageError;

/// Boxed chunk stream produced by the transport.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Lifecycle of a single transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Pending,
    Streaming,
    Completed,
    Failed,
}

/// What a chunk hook sees on every invocation.
#[derive(Debug)]
pub struct TransferFrame<'a> {
    pub status: StatusCode,
    pub headers: &'a HeaderMap,
    pub chunk: &'a Bytes,
}

/// Outcome of a hook-driven consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consumed<T> {
    /// The hook broke out; its value is the call's outcome.
    Stopped(T),
    /// The stream ran dry without the hook breaking.
    Exhausted,
}

/// A streamed response body.
///
/// The chunk sequence is finite, strictly ordered, and single-pass:
/// every consumption method takes the stream, and a second attempt
/// fails with [`StorageError::StreamConsumed`]. Reading the object
/// again means re-issuing the request — nothing is replayed from
/// cached state.
pub struct Transfer {
    status: StatusCode,
    headers: HeaderMap,
    state: TransferState,
    stream: Option<ByteStream>,
}

impl Transfer {
    pub fn new(status: StatusCode, headers: HeaderMap, stream: ByteStream) -> Self {
        Self {
            status,
            headers,
            state: TransferState::Pending,
            stream: Some(stream),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    fn take_stream(&mut self) -> Result<ByteStream, StorageError> {
        self.stream.take().ok_or(StorageError::StreamConsumed)
    }

    /// Default consumption: buffer the whole stream into one body.
    pub async fn collect(&mut self) -> Result<Bytes, StorageError> {
        let mut stream = self.take_stream()?;
        self.state = TransferState::Streaming;
        let mut buffer = BytesMut::new();
        while let Some(next) = stream.next().await {
            match next {
                Ok(chunk) => buffer.extend_from_slice(&chunk),
                Err(err) => {
                    self.state = TransferState::Failed;
                    return Err(err);
                }
            }
        }
        self.state = TransferState::Completed;
        Ok(buffer.freeze())
    }

    /// Drive the stream through `hook` one chunk at a time.
    ///
    /// Returning [`ControlFlow::Break`] stops consumption immediately:
    /// later chunks are never pulled, no partial buffering is retained,
    /// and the hook's value becomes the call's outcome.
    pub async fn each_chunk<T, F>(&mut self, mut hook: F) -> Result<Consumed<T>, StorageError>
    where
        F: FnMut(TransferFrame<'_>) -> ControlFlow<T>,
    {
        let mut stream = self.take_stream()?;
        self.state = TransferState::Streaming;
        while let Some(next) = stream.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(err) => {
                    self.state = TransferState::Failed;
                    return Err(err);
                }
            };
            let frame = TransferFrame {
                status: self.status,
                headers: &self.headers,
                chunk: &chunk,
            };
            if let ControlFlow::Break(value) = hook(frame) {
                tracing::debug!("chunk hook stopped the transfer early");
                self.state = TransferState::Completed;
                return Ok(Consumed::Stopped(value));
            }
        }
        self.state = TransferState::Completed;
        Ok(Consumed::Exhausted)
    }

    /// Redirect every chunk into `sink`, returning the bytes written.
    /// The sink is exclusively borrowed for the duration of the call.
    pub async fn pipe_to<W>(&mut self, sink: &mut W) -> Result<u64, StorageError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut stream = self.take_stream()?;
        self.state = TransferState::Streaming;
        let mut written = 0u64;
        while let Some(next) = stream.next().await {
            let chunk = match next {
                Ok(chunk) => chunk,
                Err(err) => {
                    self.state = TransferState::Failed;
                    return Err(err);
                }
            };
            if let Err(err) = sink.write_all(&chunk).await {
                self.state = TransferState::Failed;
                return Err(StorageError::Interrupted(err.to_string()));
            }
            written += chunk.len() as u64;
        }
        if let Err(err) = sink.flush().await {
            self.state = TransferState::Failed;
            return Err(StorageError::Interrupted(err.to_string()));
        }
        self.state = TransferState::Completed;
        Ok(written)
    }
}

impl fmt::Debug for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transfer")
            .field("status", &self.status)
            .field("state", &self.state)
            .field("consumed", &self.stream.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn transfer_of(chunks: Vec<&'static [u8]>) -> Transfer {
        let items = chunks
            .into_iter()
            .map(|chunk| Ok(Bytes::from_static(chunk)))
            .collect::<Vec<Result<Bytes, StorageError>>>();
        Transfer::new(
            StatusCode::OK,
            HeaderMap::new(),
            Box::pin(stream::iter(items)),
        )
    }

    /// Transfer whose chunks count how many were actually pulled.
    fn counted_transfer(total: usize, pulled: Arc<AtomicUsize>) -> Transfer {
        let items = (0..total).map(move |_| -> Result<Bytes, StorageError> {
            pulled.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(b"chunk"))
        });
        Transfer::new(
            StatusCode::OK,
            HeaderMap::new(),
            Box::pin(stream::iter(items)),
        )
    }

    #[tokio::test]
    async fn test_collect_buffers_everything() {
        let mut transfer = transfer_of(vec![b"hello ", b"world"]);
        assert_eq!(transfer.state(), TransferState::Pending);
        let body = transfer.collect().await.unwrap();
        assert_eq!(&body[..], b"hello world");
        assert_eq!(transfer.state(), TransferState::Completed);
    }

    #[tokio::test]
    async fn test_hook_break_stops_consumption() {
        let pulled = Arc::new(AtomicUsize::new(0));
        let mut transfer = counted_transfer(5, pulled.clone());
        let outcome = transfer
            .each_chunk(|frame| ControlFlow::Break(frame.chunk.len()))
            .await
            .unwrap();
        assert_eq!(outcome, Consumed::Stopped(5));
        assert_eq!(pulled.load(Ordering::SeqCst), 1);
        assert_eq!(transfer.state(), TransferState::Completed);
    }

    #[tokio::test]
    async fn test_hook_exhaustion_is_distinct_from_break() {
        let mut transfer = transfer_of(vec![b"a", b"b"]);
        let mut seen = 0usize;
        let outcome = transfer
            .each_chunk(|_| {
                seen += 1;
                ControlFlow::<()>::Continue(())
            })
            .await
            .unwrap();
        assert_eq!(outcome, Consumed::Exhausted);
        assert_eq!(seen, 2);
    }

    #[tokio::test]
    async fn test_second_consumption_fails() {
        let mut transfer = transfer_of(vec![b"a"]);
        transfer.collect().await.unwrap();
        let err = transfer.collect().await.unwrap_err();
        assert!(matches!(err, StorageError::StreamConsumed));
    }

    #[tokio::test]
    async fn test_stream_error_marks_failed() {
        let items: Vec<Result<Bytes, StorageError>> = vec![
            Ok(Bytes::from_static(b"a")),
            Err(StorageError::Interrupted("connection reset".to_string())),
        ];
        let mut transfer = Transfer::new(
            StatusCode::OK,
            HeaderMap::new(),
            Box::pin(stream::iter(items)),
        );
        assert!(transfer.collect().await.is_err());
        assert_eq!(transfer.state(), TransferState::Failed);
    }

    #[tokio::test]
    async fn test_pipe_to_writes_all_chunks() {
        let mut transfer = transfer_of(vec![b"hello ", b"world"]);
        let mut sink = Vec::new();
        let written = transfer.pipe_to(&mut sink).await.unwrap();
        assert_eq!(written, 11);
        assert_eq!(&sink[..], b"hello world");
    }
}
