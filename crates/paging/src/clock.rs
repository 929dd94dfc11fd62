use std::num::NonZeroUsize;

use crate::replacer::Replacer;
use crate::{FrameTable, PageId};

/// Second-chance (clock) replacer.
///
/// Resident pages sit in a fixed ring of `capacity` slots. New pages are
/// written under the hand, which then advances. The reference bits
/// themselves live in the frame table.
#[derive(Debug)]
pub struct ClockReplacer {
    ring: Vec<Option<PageId>>,
    hand: usize,
}

impl ClockReplacer {
    /// Creates a replacer with an empty ring of `capacity` slots.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            ring: vec![None; capacity.get()],
            hand: 0,
        }
    }

    /// Slot the hand currently points at.
    pub fn hand(&self) -> usize {
        self.hand
    }

    /// Page held in the given slot, if any.
    pub fn slot(&self, index: usize) -> Option<PageId> {
        self.ring.get(index).copied().flatten()
    }

    fn advance(&mut self) {
        self.hand += 1;
        if self.hand == self.ring.len() {
            self.hand = 0;
        }
    }
}

impl Replacer for ClockReplacer {
    fn on_admit(&mut self, frames: &mut FrameTable, page: PageId) {
        self.ring[self.hand] = Some(page);
        frames.set_referenced(page, false);
        self.advance();
    }

    fn on_hit(&mut self, frames: &mut FrameTable, page: PageId) {
        frames.set_referenced(page, true);
    }

    fn select_victim(&mut self, frames: &mut FrameTable, _index: usize) -> PageId {
        // Each step either finds a victim or clears one more bit, so two
        // sweeps always suffice.
        for _ in 0..2 * self.ring.len() {
            let page = self.ring[self.hand]
                .unwrap_or_else(|| panic!("clock slot {} empty while frames are full", self.hand));
            if !frames.is_referenced(page) {
                log::trace!("clock hand {} selects page {}", self.hand, page);
                return page;
            }
            frames.set_referenced(page, false);
            self.advance();
        }
        unreachable!("clock sweep did not terminate");
    }
}
