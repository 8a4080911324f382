// Integration tests for the async re-chunking API
// Tests cover: parity with the sync iterator, suspension, cancellation, errors

#![cfg(feature = "async")]

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::stream::{self, Stream, StreamExt};
use rechunkrs::{RechunkError, rechunk, rechunk_async, rechunk_async_iter, try_rechunk_async};
use tokio::sync::mpsc;
use tokio_test::{assert_pending, assert_ready, task};

fn units_of(sizes: &[usize]) -> Vec<Bytes> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &len)| Bytes::from(vec![i as u8; len]))
        .collect()
}

async fn lengths<S>(stream: S) -> Vec<usize>
where
    S: Stream<Item = Result<Bytes, RechunkError>>,
{
    stream.map(|c| c.unwrap().len()).collect().await
}

/// A source fed by hand through a channel.
struct ChannelSource(mpsc::UnboundedReceiver<Bytes>);

impl Stream for ChannelSource {
    type Item = Bytes;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        self.0.poll_recv(cx)
    }
}

/// A source that suspends once before every item, and counts its pulls.
struct Yielding {
    units: std::vec::IntoIter<Bytes>,
    ready: bool,
    pulls: Arc<AtomicUsize>,
}

impl Yielding {
    fn new(units: Vec<Bytes>, pulls: Arc<AtomicUsize>) -> Self {
        Self {
            units: units.into_iter(),
            ready: false,
            pulls,
        }
    }
}

impl Stream for Yielding {
    type Item = Bytes;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Bytes>> {
        if !self.ready {
            self.ready = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        self.ready = false;
        self.pulls.fetch_add(1, Ordering::SeqCst);
        Poll::Ready(self.units.next())
    }
}

// ============================================================================
// Concrete Scenarios
// ============================================================================

#[tokio::test]
async fn test_async_scenarios() {
    let cases: [(&[usize], usize, Vec<usize>); 4] = [
        (&[1000, 2000], 500, vec![500; 6]),
        (&[300, 300, 300], 500, vec![500, 400]),
        (&[100, 800, 150], 500, vec![500, 500, 50]),
        (&[], 500, vec![]),
    ];

    for (sizes, chunk_size, expected) in cases {
        let stream = rechunk_async(stream::iter(units_of(sizes)), chunk_size);
        assert_eq!(lengths(stream).await, expected, "units {:?}", sizes);
    }
}

#[tokio::test]
async fn test_sync_source_as_stream() {
    let stream = rechunk_async_iter(units_of(&[100, 800, 150]), 500);
    assert_eq!(lengths(stream).await, vec![500, 500, 50]);
}

#[tokio::test]
async fn test_async_matches_sync() {
    let sizes: Vec<usize> = (0..300).map(|i| (i * 37) % 211).collect();
    let units = units_of(&sizes);

    let sync: Vec<Bytes> = rechunk(units.clone(), 97)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    let pulls = Arc::new(AtomicUsize::new(0));
    let stream = rechunk_async(Yielding::new(units, pulls), 97);
    let asynchronous: Vec<Bytes> = stream.map(Result::unwrap).collect().await;

    assert_eq!(sync, asynchronous);
}

#[tokio::test]
async fn test_async_zero_copy() {
    let unit = Bytes::from(vec![1u8; 1000]);
    let stream = rechunk_async_iter(vec![unit.clone()], 250);
    let chunks: Vec<Bytes> = stream.map(Result::unwrap).collect().await;

    assert_eq!(chunks.len(), 4);
    for (i, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.as_ptr(), unit[i * 250..].as_ptr());
    }
}

// ============================================================================
// Suspension and Cancellation
// ============================================================================

#[test]
fn test_waits_for_source() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut chunks = task::spawn(rechunk_async(ChannelSource(rx), 500));

    assert_pending!(chunks.poll_next());

    tx.send(Bytes::from(vec![0u8; 300])).unwrap();
    assert!(chunks.is_woken());
    // Not enough for a chunk yet: the bytes are carried and the stream waits.
    assert_pending!(chunks.poll_next());

    tx.send(Bytes::from(vec![1u8; 300])).unwrap();
    let chunk = assert_ready!(chunks.poll_next()).unwrap().unwrap();
    assert_eq!(chunk.len(), 500);
    assert_pending!(chunks.poll_next());

    drop(tx);
    let last = assert_ready!(chunks.poll_next()).unwrap().unwrap();
    assert_eq!(last.len(), 100);
    assert!(assert_ready!(chunks.poll_next()).is_none());
}

#[tokio::test]
async fn test_dropping_stream_stops_pulling() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let units = units_of(&[1000; 100]);
    let stream = rechunk_async(Yielding::new(units, pulls.clone()), 500);

    let taken: Vec<_> = stream.take(3).collect().await;
    assert_eq!(taken.len(), 3);
    assert_eq!(pulls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_suspending_source_with_tiny_units() {
    let pulls = Arc::new(AtomicUsize::new(0));
    let units = units_of(&[1; 10_000]);
    let stream = rechunk_async(Yielding::new(units, pulls.clone()), 4096);

    assert_eq!(lengths(stream).await, vec![4096, 4096, 1808]);
    // Every unit plus the end-of-stream marker.
    assert_eq!(pulls.load(Ordering::SeqCst), 10_001);
}

// ============================================================================
// Error Handling
// ============================================================================

#[tokio::test]
async fn test_invalid_chunk_size_is_delivered_by_the_stream() {
    for bad in [0.0, -1.0, 1.5, f64::NAN, f64::INFINITY] {
        // Building the stream never fails.
        let mut stream = rechunk_async_iter(units_of(&[10]), bad);

        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.argument(), "chunk_size");
        assert!(stream.next().await.is_none());
    }
}

#[tokio::test]
async fn test_bad_item_ends_stream() {
    let units: Vec<Box<dyn std::any::Any + Send>> = vec![
        Box::new(vec![0u8; 700]),
        Box::new(17u64),
        Box::new(vec![0u8; 700]),
    ];
    let items: Vec<_> = rechunk_async_iter(units, 500).collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap().len(), 500);
    assert_eq!(items[1].as_ref().unwrap_err().argument(), "item");
}

#[tokio::test]
async fn test_fallible_source() {
    let units = stream::iter(vec![
        Ok(Bytes::from_static(b"hello ")),
        Ok(Bytes::from_static(b"world")),
        Err(std::io::Error::other("eof in the middle")),
    ]);
    let mut chunks = try_rechunk_async(units, 4);

    assert_eq!(&chunks.next().await.unwrap().unwrap()[..], b"hell");
    assert_eq!(&chunks.next().await.unwrap().unwrap()[..], b"o wo");
    assert_eq!(chunks.pending_len(), 3);
    // The source failure ends the stream; the carried "rld" is discarded.
    let err = chunks.next().await.unwrap().unwrap_err();
    assert_eq!(err.to_string(), "eof in the middle");
    assert_eq!(chunks.pending_len(), 0);
    assert!(chunks.next().await.is_none());
}
