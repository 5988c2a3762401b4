//! Pluggable fingerprint capability used by the durable writer.
//!
//! The writer only needs "compute a comparable fingerprint of two byte
//! sequences and report equality"; it is indifferent to the algorithm.
//! Concrete digest implementations (MD5, SHA1, CRC32, ...) live outside
//! this crate; anything satisfying [`Fingerprint`] can be pushed onto a
//! [`DurableWriter`](crate::io::durable::DurableWriter), and multiple
//! providers are AND-combined during verification.

/// Equality comparator over opaque byte-sequence digests.
pub trait Fingerprint: Send + Sync {
    /// Short provider name, used in mismatch errors.
    fn name(&self) -> &'static str;

    /// Whether the two byte sequences have equal fingerprints.
    fn equal(&self, a: &[u8], b: &[u8]) -> bool;
}

/// Wrapping byte-sum comparator, the writer's default redundancy check.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteSum;

impl Fingerprint for ByteSum {
    fn name(&self) -> &'static str {
        "byte-sum"
    }

    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        byte_sum(a) == byte_sum(b)
    }
}

fn byte_sum(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_add(u64::from(b)))
}
