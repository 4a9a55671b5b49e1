//! Per-session streaming buffer with a sequence guard.
//!
//! Each chat request takes a ticket from a monotonic counter and resets the
//! buffer. Chunks carrying an older ticket are dropped, so a slow request
//! that was superseded can never write into the newer answer.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Sequence number of one streaming request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamTicket(pub u64);

/// Current buffer contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub ticket: StreamTicket,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Default)]
struct Buffer {
    ticket: u64,
    text: String,
    done: bool,
}

/// Append-only text buffer owned by the latest request.
#[derive(Debug, Default)]
pub struct ChatStream {
    next: AtomicU64,
    buffer: Mutex<Buffer>,
}

impl ChatStream {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Buffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a new request, superseding any in flight.
    pub fn begin(&self) -> StreamTicket {
        let ticket = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        let mut buffer = self.lock();
        // A later begin() may already hold the buffer.
        if ticket > buffer.ticket {
            *buffer = Buffer {
                ticket,
                ..Default::default()
            };
        }
        StreamTicket(ticket)
    }

    /// Appends `chunk` if `ticket` is still current. Returns whether it was kept.
    pub fn append(&self, ticket: StreamTicket, chunk: &str) -> bool {
        let mut buffer = self.lock();
        if buffer.ticket != ticket.0 || buffer.done {
            debug!(
                ticket = ticket.0,
                current = buffer.ticket,
                "Discarding stale stream chunk"
            );
            return false;
        }
        buffer.text.push_str(chunk);
        true
    }

    /// Marks the request done. Returns `false` when it was superseded.
    pub fn finish(&self, ticket: StreamTicket) -> bool {
        let mut buffer = self.lock();
        if buffer.ticket != ticket.0 {
            return false;
        }
        buffer.done = true;
        true
    }

    #[must_use]
    pub fn is_current(&self, ticket: StreamTicket) -> bool {
        self.lock().ticket == ticket.0
    }

    #[must_use]
    pub fn snapshot(&self) -> StreamSnapshot {
        let buffer = self.lock();
        StreamSnapshot {
            ticket: StreamTicket(buffer.ticket),
            text: buffer.text.clone(),
            done: buffer.done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_appends_for_current_ticket() {
        let stream = ChatStream::new();
        let t = stream.begin();
        assert!(stream.append(t, "Hello "));
        assert!(stream.append(t, "LP"));
        assert!(stream.finish(t));
        let snap = stream.snapshot();
        assert_eq!(snap.text, "Hello LP");
        assert!(snap.done);
        assert!(!stream.append(t, "late"));
    }

    #[test]
    fn test_superseded_request_cannot_clobber() {
        let stream = ChatStream::new();
        let old = stream.begin();
        assert!(stream.append(old, "old answer"));
        let new = stream.begin();
        assert!(new > old);
        assert!(!stream.append(old, " more old"));
        assert!(stream.append(new, "new answer"));
        assert!(!stream.finish(old));
        assert!(!stream.is_current(old));
        assert_eq!(stream.snapshot().text, "new answer");
    }

    #[tokio::test]
    async fn test_concurrent_requests_keep_only_latest() {
        let stream = Arc::new(ChatStream::new());
        let first = stream.begin();
        let second = stream.begin();

        let s1 = Arc::clone(&stream);
        let s2 = Arc::clone(&stream);
        let a = tokio::spawn(async move {
            for _ in 0..100 {
                s1.append(first, "x");
                tokio::task::yield_now().await;
            }
        });
        let b = tokio::spawn(async move {
            for _ in 0..100 {
                s2.append(second, "y");
                tokio::task::yield_now().await;
            }
        });
        a.await.unwrap();
        b.await.unwrap();

        let snap = stream.snapshot();
        assert_eq!(snap.ticket, second);
        assert_eq!(snap.text, "y".repeat(100));
    }
}
