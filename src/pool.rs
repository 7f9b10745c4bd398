//! Match Result Pool (E): bounded reusable storage for match records.
//!
//! Rentals are scoped handles whose `Drop` impl clears and returns the
//! buffer — grounded on the teacher's flush-on-`Drop` `ContentSearchVisitor`
//! (there it flushes a result buffer to shared storage; here it returns a
//! buffer to the shared pool instead).

use std::sync::{Arc, Mutex};

use crate::types::MatchRecord;

struct PoolInner {
    spares: Mutex<Vec<Vec<MatchRecord>>>,
}

/// A shared, bounded stack of spare `Vec<MatchRecord>` buffers.
#[derive(Clone)]
pub struct MatchPool {
    inner: Arc<PoolInner>,
}

impl MatchPool {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(PoolInner {
                spares: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Rent a buffer with at least `capacity` free slots. Reuses a returned
    /// buffer when one is available, otherwise allocates fresh.
    #[must_use]
    pub fn rent(&self, capacity: usize) -> PoolGuard {
        let buffer = {
            let mut spares = self.inner.spares.lock().unwrap_or_else(|e| e.into_inner());
            spares.pop()
        }
        .map(|mut buf| {
            buf.reserve(capacity.saturating_sub(buf.capacity()));
            buf
        })
        .unwrap_or_else(|| Vec::with_capacity(capacity));

        PoolGuard {
            pool: self.clone(),
            buffer: Some(buffer),
        }
    }

    fn give_back(&self, mut buffer: Vec<MatchRecord>) {
        buffer.clear();
        let mut spares = self.inner.spares.lock().unwrap_or_else(|e| e.into_inner());
        spares.push(buffer);
    }
}

impl Default for MatchPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A scoped rental of a `Vec<MatchRecord>`. Returns the (cleared) buffer to
/// the pool on drop — release happens on every exit path: success, early
/// stop, or error.
pub struct PoolGuard {
    pool: MatchPool,
    buffer: Option<Vec<MatchRecord>>,
}

impl std::ops::Deref for PoolGuard {
    type Target = Vec<MatchRecord>;
    fn deref(&self) -> &Self::Target {
        self.buffer.as_ref().expect("buffer present until drop")
    }
}

impl std::ops::DerefMut for PoolGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer.as_mut().expect("buffer present until drop")
    }
}

impl Drop for PoolGuard {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.give_back(buffer);
        }
    }
}
