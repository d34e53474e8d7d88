//! Bounded item streams between pipeline stages.
//!
//! A stream is a FIFO queue of [`Item`]s with an explicit end-of-stream
//! terminator. It is split into two halves:
//!
//! - [`StreamWriter`]: owned by exactly one producer. Writes items, then
//!   finishes the stream with [`StreamWriter::end`].
//! - [`Stream`]: owned by the consumer. Reads items until the terminator.
//!
//! # Closed vs. ended
//!
//! ```text
//!            close()                      read() sees terminator
//! [open] ─────────────► [closed]   [open] ───────────────────────► [ended]
//!   writes accepted      writes dropped      per reader, one-way
//! ```
//!
//! *Closed* is a cancellation request from downstream: the writer drops
//! anything written afterwards and producers are expected to poll
//! [`StreamWriter::is_closed`] between writes. Closing does not wake a
//! writer blocked on a full queue. *Ended* is the producer's natural
//! completion, learned by the reader when it dequeues the terminator.
//!
//! If every writer is dropped without a terminator, the reader treats the
//! disconnect as end-of-stream. If the reader is dropped, the stream is
//! marked closed and blocked writers are released.
//!
//! A write that passed the closed check before `close()` landed is still
//! delivered, so a terminator already in flight is never lost. Anything
//! written after `close()` returns is dropped.

use crate::item::Item;
use crate::operator::Description;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// What travels through the queue.
enum Message {
    Item(Item),
    End,
}

/// State shared by both halves of a stream.
struct Shared {
    closed: AtomicBool,
    accepted: AtomicU64,
    dropped: AtomicU64,
    provider: Option<Description>,
}

impl Shared {
    fn new(provider: Option<Description>) -> Self {
        Self {
            closed: AtomicBool::new(false),
            accepted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            provider,
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn stats(&self) -> StreamStats {
        StreamStats {
            accepted: self.accepted.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Write-side counters of a stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    /// Items enqueued for the reader (terminator excluded).
    pub accepted: u64,
    /// Writes discarded because the stream was closed.
    pub dropped: u64,
}

/// Create a stream. `capacity` of `None` never blocks the writer.
pub fn channel(capacity: Option<usize>) -> (StreamWriter, Stream) {
    channel_with_provider(capacity, None)
}

/// Create a stream that remembers which operator produces it.
pub fn channel_with_provider(
    capacity: Option<usize>,
    provider: Option<Description>,
) -> (StreamWriter, Stream) {
    let (tx, rx) = match capacity {
        Some(cap) => bounded(cap),
        None => unbounded(),
    };
    let shared = Arc::new(Shared::new(provider));
    (
        StreamWriter {
            tx,
            shared: shared.clone(),
        },
        Stream {
            rx,
            shared,
            ended: false,
        },
    )
}

/// Producer half of a stream.
pub struct StreamWriter {
    tx: Sender<Message>,
    shared: Arc<Shared>,
}

impl StreamWriter {
    /// Enqueue an item, blocking while the queue is full.
    ///
    /// Silently dropped if the stream is closed.
    pub fn write(&self, item: Item) {
        if self.shared.is_closed() {
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Dropping item written to a closed stream");
            return;
        }

        if self.tx.send(Message::Item(item)).is_err() {
            // Reader is gone: nothing will ever drain this stream again.
            self.shared.close();
            self.shared.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Stream reader dropped, closing stream");
            return;
        }

        self.shared.accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// Write the terminator. Dropped like any other write once closed.
    pub fn end(self) {
        if self.shared.is_closed() {
            tracing::trace!("Stream closed before end-of-stream was written");
            return;
        }
        if self.tx.send(Message::End).is_err() {
            self.shared.close();
        }
    }

    /// Whether downstream asked producers to stop.
    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    pub fn stats(&self) -> StreamStats {
        self.shared.stats()
    }
}

impl fmt::Debug for StreamWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamWriter")
            .field("closed", &self.is_closed())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Consumer half of a stream.
pub struct Stream {
    rx: Receiver<Message>,
    shared: Arc<Shared>,
    ended: bool,
}

impl Stream {
    /// Read the next item, blocking until one is available.
    ///
    /// Returns `None` once the stream has ended. Calling again after that
    /// is a caller bug: it logs a warning and keeps returning `None`.
    pub fn read(&mut self) -> Option<Item> {
        if self.ended {
            tracing::warn!("Reading from an ended stream");
            return None;
        }

        match self.rx.recv() {
            Ok(Message::Item(item)) => Some(item),
            Ok(Message::End) => {
                self.ended = true;
                None
            }
            Err(_) => {
                self.ended = true;
                if self.shared.is_closed() {
                    tracing::debug!("Closed stream finished without end-of-stream");
                } else {
                    tracing::warn!("Stream writer disconnected without end-of-stream");
                }
                None
            }
        }
    }

    /// Read every remaining item in write order. Blocks until the stream ends.
    pub fn read_all(&mut self) -> Vec<Item> {
        let mut items = Vec::new();
        while let Some(item) = self.read() {
            items.push(item);
        }
        items
    }

    /// Iterate over the remaining items.
    pub fn iter(&mut self) -> impl Iterator<Item = Item> + '_ {
        std::iter::from_fn(move || self.read())
    }

    /// Ask the producer to stop. One-way and idempotent.
    ///
    /// Items already buffered can still be read.
    pub fn close(&self) {
        if !self.shared.is_closed() {
            tracing::trace!("Closing stream");
        }
        self.shared.close();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Whether this reader has seen the end of the stream.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn stats(&self) -> StreamStats {
        self.shared.stats()
    }

    /// Description of the operator writing into this stream.
    pub fn provider(&self) -> Option<&Description> {
        self.shared.provider.as_ref()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let provider = self
            .provider()
            .map(ToString::to_string)
            .unwrap_or_default();
        serde_json::json!({ "streamProvider": provider })
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        self.shared.close();
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("provider", &self.provider().map(ToString::to_string))
            .field("closed", &self.is_closed())
            .field("ended", &self.ended)
            .finish()
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
