//! Configurable limits for bounded decoding.

/// Wire-level limits for message framing.
///
/// These limits are enforced before a declared payload is read, so a hostile
/// `dlen` can never force an unbounded allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum declared payload length in bytes.
    pub max_payload_bytes: usize,

    /// Maximum number of piggybacked messages split from one buffer.
    pub max_messages: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            // Large enough for bulk reads and writes.
            max_payload_bytes: 16 * 1024 * 1024,
            max_messages: 64,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_payload_bytes: 4096,
            max_messages: 8,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_payload_bytes: usize::MAX,
            max_messages: usize::MAX,
        }
    }
}
