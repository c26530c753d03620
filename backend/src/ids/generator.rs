//! Id generator implementations

use std::sync::atomic::{AtomicU64, Ordering};

/// Produces candidate aircraft ids
pub trait IdGenerator: Send + Sync {
    /// Next candidate id (never reused by the store once written)
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs
///
/// # Example
/// ```
/// use atc_dispatch_core::ids::{IdGenerator, UuidGenerator};
///
/// let ids = UuidGenerator;
/// assert_ne!(ids.next_id(), ids.next_id());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic ids of the form `{prefix}-00000001`
///
/// Same prefix → same sequence. Useful for replaying a request script and
/// diffing the output.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{:08}", self.prefix, n)
    }
}
