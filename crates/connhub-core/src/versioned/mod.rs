//! Values paired with a monotonically advancing update timestamp.
//!
//! [`Versioned`] groups a value, the millisecond timestamp of its last
//! mutation, and the reader/writer lock guarding both. Readers run
//! concurrently; writers are serialized and every mutation stamps a new
//! timestamp strictly greater than the previous one while the exclusive lock
//! is still held, so no reader can ever observe a timestamp going backwards.
//!
//! ```rust,ignore
//! let text = Versioned::new(String::new());
//! let t1 = text.write("hello".into()).await;
//! let t2 = text.write("world".into()).await;
//! assert!(t2 > t1);
//! ```

use tokio::sync::{RwLock, RwLockWriteGuard};

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A value as observed at a given timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot<T> {
    /// The value
    pub value: T,
    /// Millisecond timestamp of the mutation that produced `value`
    pub updated_at: i64,
}

#[derive(Debug)]
struct Slot<T> {
    value: T,
    updated_at: i64,
}

/// A value plus its last-update timestamp behind a reader/writer lock.
#[derive(Debug)]
pub struct Versioned<T> {
    slot: RwLock<Slot<T>>,
}

impl<T> Versioned<T> {
    /// Create a value stamped with the current time.
    pub fn new(value: T) -> Self {
        Self::with_timestamp(value, now_millis())
    }

    /// Create a value with an explicit initial timestamp.
    pub fn with_timestamp(value: T, updated_at: i64) -> Self {
        Self {
            slot: RwLock::new(Slot { value, updated_at }),
        }
    }

    /// Timestamp of the last mutation.
    pub async fn updated_at(&self) -> i64 {
        self.slot.read().await.updated_at
    }

    /// Replace the value and return the new timestamp.
    pub async fn write(&self, value: T) -> i64 {
        self.lock().await.replace(value)
    }

    /// Acquire exclusive access for a compound read-modify-write.
    ///
    /// Other readers and writers wait until the guard is dropped, which makes
    /// the guard suitable for holding across I/O that must be serialized with
    /// the mutation it precedes.
    pub async fn lock(&self) -> VersionedGuard<'_, T> {
        VersionedGuard {
            slot: self.slot.write().await,
        }
    }
}

impl<T: Clone> Versioned<T> {
    /// Read the current value and its timestamp.
    pub async fn read(&self) -> Snapshot<T> {
        let slot = self.slot.read().await;
        Snapshot {
            value: slot.value.clone(),
            updated_at: slot.updated_at,
        }
    }

    /// Read the value only if it changed after `since`.
    pub async fn read_since(&self, since: i64) -> Option<Snapshot<T>> {
        let slot = self.slot.read().await;
        (slot.updated_at > since).then(|| Snapshot {
            value: slot.value.clone(),
            updated_at: slot.updated_at,
        })
    }
}

/// Exclusive access to a [`Versioned`] value.
///
/// Every mutating method stamps a fresh timestamp before returning it.
#[derive(Debug)]
pub struct VersionedGuard<'a, T> {
    slot: RwLockWriteGuard<'a, Slot<T>>,
}

impl<T> VersionedGuard<'_, T> {
    /// The current value.
    pub fn value(&self) -> &T {
        &self.slot.value
    }

    /// Timestamp of the last mutation.
    pub fn updated_at(&self) -> i64 {
        self.slot.updated_at
    }

    /// Replace the value wholesale.
    pub fn replace(&mut self, value: T) -> i64 {
        self.slot.value = value;
        self.stamp()
    }

    /// Mutate the value in place.
    pub fn modify<F>(&mut self, f: F) -> i64
    where
        F: FnOnce(&mut T),
    {
        f(&mut self.slot.value);
        self.stamp()
    }

    /// Advance the timestamp without changing the value.
    pub fn touch(&mut self) -> i64 {
        self.stamp()
    }

    // Same-millisecond writes and backwards clock steps still move forward.
    fn stamp(&mut self) -> i64 {
        let next = now_millis().max(self.slot.updated_at.saturating_add(1));
        self.slot.updated_at = next;
        next
    }
}
