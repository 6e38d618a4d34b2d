//! Product id generation.
//!
//! The repository calls its generator only when a create payload carries no
//! id. Tests inject a deterministic generator to control list order.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of fresh primary keys.
pub trait IdGenerator: Debug + Send + Sync {
    /// Returns an id that has not been handed out before.
    fn generate(&self) -> String;
}

/// UUID v7 ids: a millisecond timestamp prefix plus random bits.
///
/// Ids from one process sort in creation order, so the default ascending-id
/// listing reads oldest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::now_v7().to_string()
    }
}

/// Zero-padded counter ids (`{prefix}-000001`, ...), ascending in both
/// numeric and lexical order.
#[derive(Debug)]
pub struct SequentialGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialGenerator {
    /// Starts counting at 1.
    pub fn new(prefix: impl Into<String>) -> Self {
        SequentialGenerator {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialGenerator {
    fn generate(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:06}", self.prefix, n)
    }
}
