//! # Sequence Tracking - Loss Detection Across the Air Gap
//!
//! ## Purpose
//!
//! Both halves of the packet-loss protocol. The transmit side owns a
//! [`SequenceNumberGenerator`], an explicit wrapping counter stamped onto
//! every advertisement batch. The receiving bridge owns a
//! [`SequenceTracker`], a per-sender table of last-confirmed sequence
//! numbers used to count gaps in mod-256 arithmetic.
//!
//! ## At-Least-Once Semantics
//!
//! Observation and confirmation are separate steps: `observe` computes the
//! missed count without touching state, and `confirm` advances the stored
//! sequence number only after the caller's downstream write succeeded. A
//! failed write therefore leaves the counter behind, and the retried
//! delivery is still counted correctly next time.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::{ProtocolError, ProtocolResult};

/// Six-byte BLE sender address
///
/// Displays in the conventional reversed-hex form, least significant byte
/// last, matching how scanners report addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenderAddress([u8; 6]);

impl SenderAddress {
    pub fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for SenderAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        f.write_str(&hex::encode(reversed))
    }
}

/// Transmit-side wrapping packet counter
///
/// Owned by the broadcasting process and passed to
/// [`encode_advertisements`](crate::encode_advertisements); one fresh number
/// per logical measurement, wrapping at 256.
#[derive(Debug, Clone, Default)]
pub struct SequenceNumberGenerator {
    next: u8,
}

impl SequenceNumberGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a known counter value
    pub fn starting_at(next: u8) -> Self {
        Self { next }
    }

    /// Return the current sequence number and advance, wrapping mod 256
    pub fn next(&mut self) -> u8 {
        let current = self.next;
        self.next = self.next.wrapping_add(1);
        current
    }
}

/// Bridge-side per-sender gap detector
///
/// The sender table grows as new addresses are observed and is cleared only
/// by [`SequenceTracker::clear`]; eviction policy is left to the receiving
/// bridge.
#[derive(Debug, Clone, Default)]
pub struct SequenceTracker {
    last_confirmed: HashMap<SenderAddress, u8>,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count packets missed between the last confirmed sequence number and
    /// this one, in mod-256 arithmetic.
    ///
    /// The first observation of a sender seeds its state so that it reports
    /// zero missed. A re-received sequence number fails with
    /// `DuplicatePacket` and leaves state unchanged; callers should discard
    /// the packet and keep scanning. State advances only via
    /// [`SequenceTracker::confirm`].
    pub fn observe(&mut self, sender: SenderAddress, sequence: u8) -> ProtocolResult<u8> {
        let last = *self.last_confirmed.entry(sender).or_insert_with(|| {
            debug!(%sender, sequence, "first packet from sender");
            sequence.wrapping_sub(1)
        });

        if sequence == last {
            return Err(ProtocolError::DuplicatePacket { sequence });
        }

        let missed = sequence.wrapping_sub(last).wrapping_sub(1);
        if missed > 0 {
            warn!(%sender, missed, "missed packets detected");
        }
        Ok(missed)
    }

    /// Record that `sequence` from `sender` was consumed downstream
    pub fn confirm(&mut self, sender: SenderAddress, sequence: u8) {
        self.last_confirmed.insert(sender, sequence);
    }

    /// Number of senders observed so far
    pub fn len(&self) -> usize {
        self.last_confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_confirmed.is_empty()
    }

    /// Drop all sender state
    pub fn clear(&mut self) {
        self.last_confirmed.clear();
    }
}
