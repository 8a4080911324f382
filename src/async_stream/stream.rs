//! Async stream adapters for re-chunking.
//!
//! The state machine is the one driving the synchronous [`Rechunk`]
//! iterator. A stream only differs in where it waits: when the source returns
//! `Poll::Pending`, and between chunks, until the consumer polls again.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use rechunkrs::rechunk_async;
//!
//! async fn demo<S>(body: S) -> Result<(), rechunkrs::RechunkError>
//! where
//!     S: futures_core::Stream<Item = bytes::Bytes>,
//! {
//!     let mut chunks = std::pin::pin!(rechunk_async(body, 64 * 1024));
//!
//!     while let Some(chunk) = chunks.next().await {
//!         let chunk = chunk?;
//!         println!("chunk: {} bytes", chunk.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`Rechunk`]: crate::Rechunk

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_core::Stream;
use futures_core::stream::FusedStream;
use pin_project_lite::pin_project;

use crate::chunker::Rechunker;
use crate::config::IntoChunkSize;
use crate::error::RechunkError;
use crate::view::BinaryView;

/// Re-chunking state shared by both stream types.
///
/// Kept outside the pinned structs so the polling loop can be written once
/// for plain and fallible sources.
#[derive(Debug)]
struct State {
    engine: Option<Rechunker>,
    /// Chunk size error waiting to be delivered on the first poll.
    deferred: Option<RechunkError>,
    pulled: u64,
    finished: bool,
}

impl State {
    fn new(chunk_size: impl IntoChunkSize) -> Self {
        let (engine, deferred) = match chunk_size.into_chunk_size() {
            Ok(size) => {
                log::trace!("rechunk: async source, {}", size);
                (Some(Rechunker::with_chunk_size(size)), None)
            }
            Err(e) => (None, Some(e)),
        };
        Self {
            engine,
            deferred,
            pulled: 0,
            finished: false,
        }
    }

    fn poll_next<T, E>(
        &mut self,
        cx: &mut Context<'_>,
        mut poll_unit: impl FnMut(&mut Context<'_>) -> Poll<Option<Result<T, E>>>,
    ) -> Poll<Option<Result<Bytes, E>>>
    where
        T: BinaryView,
        E: From<RechunkError>,
    {
        if self.finished {
            return Poll::Ready(None);
        }

        if let Some(e) = self.deferred.take() {
            self.finished = true;
            return Poll::Ready(Some(Err(e.into())));
        }

        let Some(engine) = self.engine.as_mut() else {
            self.finished = true;
            return Poll::Ready(None);
        };

        loop {
            if let Some(chunk) = engine.next_chunk() {
                return Poll::Ready(Some(Ok(chunk)));
            }

            let unit = match poll_unit(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => {
                    self.finished = true;
                    return Poll::Ready(engine.finish().map(Ok));
                }
                Poll::Ready(Some(Err(e))) => {
                    self.finished = true;
                    engine.reset();
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(Some(Ok(unit))) => unit,
            };

            let index = self.pulled;
            self.pulled += 1;

            match unit.into_byte_view() {
                Ok(unit) => {
                    if let Some(merged) = engine.feed(unit) {
                        return Poll::Ready(Some(Ok(merged)));
                    }
                }
                Err(_) => {
                    log::debug!("rechunk: item {} is not a binary view, aborting", index);
                    self.finished = true;
                    engine.reset();
                    return Poll::Ready(Some(Err(RechunkError::item_not_a_view(index).into())));
                }
            }
        }
    }
}

pin_project! {
    /// A stream that re-chunks the units of another stream.
    ///
    /// Yields `Ok(chunk)` for every chunk. An invalid chunk size, or a source
    /// item that is not a recognized binary view, is yielded as one `Err`,
    /// after which the stream ends without polling the source again.
    ///
    /// Dropping the stream cancels the operation; nothing runs in the
    /// background.
    #[derive(Debug)]
    pub struct RechunkStream<S> {
        #[pin]
        source: S,
        state: State,
    }
}

impl<S> RechunkStream<S> {
    /// Returns the number of bytes waiting for more input.
    pub fn pending_len(&self) -> usize {
        self.state.engine.as_ref().map_or(0, Rechunker::pending_len)
    }

    /// Consumes the stream, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S> Stream for RechunkStream<S>
where
    S: Stream,
    S::Item: BinaryView,
{
    type Item = Result<Bytes, RechunkError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        this.state.poll_next(cx, |cx| {
            this.source
                .as_mut()
                .poll_next(cx)
                .map(|unit| unit.map(Ok::<_, RechunkError>))
        })
    }
}

impl<S> FusedStream for RechunkStream<S>
where
    S: Stream,
    S::Item: BinaryView,
{
    fn is_terminated(&self) -> bool {
        self.state.finished
    }
}

pin_project! {
    /// A stream that re-chunks a fallible stream of units.
    ///
    /// Source errors are yielded unchanged and end the stream; bytes carried
    /// at that point are discarded. Re-chunking errors are converted into the
    /// source's error type.
    #[derive(Debug)]
    pub struct TryRechunkStream<S> {
        #[pin]
        source: S,
        state: State,
    }
}

impl<S> TryRechunkStream<S> {
    /// Returns the number of bytes waiting for more input.
    pub fn pending_len(&self) -> usize {
        self.state.engine.as_ref().map_or(0, Rechunker::pending_len)
    }

    /// Consumes the stream, returning the source.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S, T, E> Stream for TryRechunkStream<S>
where
    S: Stream<Item = Result<T, E>>,
    T: BinaryView,
    E: From<RechunkError>,
{
    type Item = Result<Bytes, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        this.state
            .poll_next(cx, |cx| this.source.as_mut().poll_next(cx))
    }
}

impl<S, T, E> FusedStream for TryRechunkStream<S>
where
    S: Stream<Item = Result<T, E>>,
    T: BinaryView,
    E: From<RechunkError>,
{
    fn is_terminated(&self) -> bool {
        self.state.finished
    }
}

/// Creates a stream re-chunking `source` into chunks of `chunk_size` bytes.
///
/// Never fails at call time: an invalid `chunk_size` is delivered as the
/// first item of the returned stream.
///
/// To re-chunk a tokio `AsyncRead`, turn it into a stream of `Bytes` first,
/// e.g. with `tokio_util::io::ReaderStream`, and use [`try_rechunk_async`].
///
/// # Example
///
/// ```ignore
/// use futures_util::{stream, StreamExt};
/// use rechunkrs::rechunk_async;
///
/// let units = stream::iter(vec![vec![0u8; 1000], vec![0u8; 2000]]);
/// let chunks: Vec<_> = rechunk_async(units, 500).collect().await;
/// assert_eq!(chunks.len(), 6);
/// ```
pub fn rechunk_async<S>(source: S, chunk_size: impl IntoChunkSize) -> RechunkStream<S>
where
    S: Stream,
    S::Item: BinaryView,
{
    RechunkStream {
        source,
        state: State::new(chunk_size),
    }
}

/// Creates a stream re-chunking the units of a synchronous iterator.
///
/// The iterator is pulled from within `poll_next`, so it should not block.
pub fn rechunk_async_iter<I>(
    source: I,
    chunk_size: impl IntoChunkSize,
) -> RechunkStream<futures_util::stream::Iter<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: BinaryView,
{
    rechunk_async(futures_util::stream::iter(source), chunk_size)
}

/// Creates a stream re-chunking a fallible `source`, such as an HTTP body.
///
/// # Example
///
/// ```ignore
/// use futures_util::TryStreamExt;
/// use rechunkrs::try_rechunk_async;
///
/// let body = reqwest::get(url).await?.bytes_stream().map_err(std::io::Error::other);
/// let mut chunks = std::pin::pin!(try_rechunk_async(body, 1 << 20));
/// while let Some(chunk) = chunks.try_next().await? {
///     upload(chunk).await?;
/// }
/// ```
pub fn try_rechunk_async<S, T, E>(
    source: S,
    chunk_size: impl IntoChunkSize,
) -> TryRechunkStream<S>
where
    S: Stream<Item = Result<T, E>>,
    T: BinaryView,
    E: From<RechunkError>,
{
    TryRechunkStream {
        source,
        state: State::new(chunk_size),
    }
}
