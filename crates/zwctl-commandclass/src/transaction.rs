//! Transaction seam to the transport.
//!
//! The transport owns transactions (retries, timeouts, correlation). Handlers
//! only ever complete one, once per handled response.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifier the transport assigns to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId(pub u32);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx#{}", self.0)
    }
}

/// An in-flight request/response exchange, as seen by a handler.
pub trait Transaction: Send + Sync {
    /// Transport-assigned id.
    fn id(&self) -> TransactionId;

    /// Mark the exchange complete.
    fn set_complete(&self);
}

/// Transaction that just counts completion signals.
///
/// Useful for hosts without a transaction manager of their own.
#[derive(Debug)]
pub struct CountingTransaction {
    id: TransactionId,
    completions: AtomicU32,
}

impl CountingTransaction {
    /// Create an incomplete transaction.
    pub fn new(id: u32) -> Self {
        CountingTransaction {
            id: TransactionId(id),
            completions: AtomicU32::new(0),
        }
    }

    /// Number of times `set_complete` was called.
    pub fn completions(&self) -> u32 {
        self.completions.load(Ordering::Acquire)
    }

    /// Whether `set_complete` was called at least once.
    pub fn is_complete(&self) -> bool {
        self.completions() > 0
    }
}

impl Transaction for CountingTransaction {
    fn id(&self) -> TransactionId {
        self.id
    }

    fn set_complete(&self) {
        self.completions.fetch_add(1, Ordering::AcqRel);
    }
}
