use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;

/// The two sides of the ping-pong.
///
/// `B` starts every round trip by sending, `A` answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Party {
    A = 1,
    B = 2,
}

/// Observer of token ownership.
///
/// Hooks run inside the timed loop, so the default implementations do nothing and
/// [`NoProbe`] compiles down to nothing.
pub trait Probe: Send + Sync + 'static {
    /// `party` received the token.
    #[inline]
    fn acquired(&self, _party: Party) {}

    /// `party` is about to hand the token over.
    #[inline]
    fn released(&self, _party: Party) {}
}

/// Probe used for timed runs.
pub struct NoProbe;

impl Probe for NoProbe {}

/// Records every handoff and flags any breach of strict alternation.
///
/// Party B holds the token before the first round trip.
pub struct HandoffTrace {
    holders: CachePadded<AtomicUsize>,
    handoffs: CachePadded<AtomicUsize>,
    /// Acquisitions that happened while the other party still held the token
    overlaps: AtomicUsize,
    /// Acquisitions by the party that acquired last
    out_of_turn: AtomicUsize,
    last: AtomicU8,
}

impl Default for HandoffTrace {
    fn default() -> Self {
        Self {
            holders: CachePadded::new(AtomicUsize::new(1)),
            handoffs: CachePadded::new(AtomicUsize::new(0)),
            overlaps: AtomicUsize::new(0),
            out_of_turn: AtomicUsize::new(0),
            last: AtomicU8::new(Party::B as u8),
        }
    }
}

impl HandoffTrace {
    pub fn handoffs(&self) -> usize {
        self.handoffs.load(Ordering::Acquire)
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::Acquire)
    }

    pub fn out_of_turn(&self) -> usize {
        self.out_of_turn.load(Ordering::Acquire)
    }

    /// Parties currently holding the token.
    pub fn holders(&self) -> usize {
        self.holders.load(Ordering::Acquire)
    }

    /// True when both parties never held the token at once and took turns on every handoff.
    pub fn strictly_alternating(&self) -> bool {
        self.overlaps() == 0 && self.out_of_turn() == 0
    }
}

impl Probe for HandoffTrace {
    fn acquired(&self, party: Party) {
        if self.holders.fetch_add(1, Ordering::AcqRel) != 0 {
            self.overlaps.fetch_add(1, Ordering::Relaxed);
        }
        if self.last.swap(party as u8, Ordering::AcqRel) == party as u8 {
            self.out_of_turn.fetch_add(1, Ordering::Relaxed);
        }
        self.handoffs.fetch_add(1, Ordering::AcqRel);
    }

    fn released(&self, _party: Party) {
        self.holders.fetch_sub(1, Ordering::AcqRel);
    }
}
