use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{FrameTable, PageId};

/// Eviction policy consulted by the simulation.
///
/// Implementations keep only the ordering they need; residency itself
/// lives in the [`FrameTable`], and only the simulation admits or evicts.
pub trait Replacer {
    /// Called whenever a page becomes resident.
    fn on_admit(&mut self, frames: &mut FrameTable, page: PageId);

    /// Called whenever a resident page is accessed again.
    fn on_hit(&mut self, frames: &mut FrameTable, page: PageId);

    /// Chooses a resident page to evict. Only called when every frame is
    /// occupied and the access at `index` faulted.
    fn select_victim(&mut self, frames: &mut FrameTable, index: usize) -> PageId;
}

/// Error returned when a policy name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown replacement policy {0:?} (expected opt, lru, sca or second)")]
pub struct UnknownPolicy(pub String);

/// The replacement policies a simulation can run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    Optimal,
    Lru,
    SecondChance,
}

impl Policy {
    /// Upper-case name used in reports.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Optimal => "OPT",
            Policy::Lru => "LRU",
            Policy::SecondChance => "SECOND",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "opt" => Ok(Policy::Optimal),
            "lru" => Ok(Policy::Lru),
            "sca" | "second" => Ok(Policy::SecondChance),
            _ => Err(UnknownPolicy(name.to_string())),
        }
    }
}

/// LRU replacer that evicts the least recently accessed resident page.
///
/// Every access pushes a fresh stamp to the back of `order`; entries whose
/// stamp no longer matches `latest` are stale and skipped on eviction.
#[derive(Debug, Default)]
pub struct LruReplacer {
    order: VecDeque<(PageId, u64)>,
    latest: HashMap<PageId, u64>,
    clock: u64,
}

impl LruReplacer {
    /// Creates an empty LRU replacer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages currently tracked.
    pub fn len(&self) -> usize {
        self.latest.len()
    }

    /// Returns whether no page is tracked.
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    fn record_access(&mut self, page: PageId) {
        let stamp = self.clock;
        self.clock += 1;
        self.latest.insert(page, stamp);
        self.order.push_back((page, stamp));
        if self.order.len() > 2 * self.latest.len() + 16 {
            self.compact();
        }
    }

    fn compact(&mut self) {
        let latest = &self.latest;
        self.order.retain(|(page, stamp)| latest.get(page) == Some(stamp));
    }
}

impl Replacer for LruReplacer {
    fn on_admit(&mut self, _frames: &mut FrameTable, page: PageId) {
        self.record_access(page);
    }

    fn on_hit(&mut self, _frames: &mut FrameTable, page: PageId) {
        self.record_access(page);
    }

    fn select_victim(&mut self, _frames: &mut FrameTable, _index: usize) -> PageId {
        while let Some((page, stamp)) = self.order.pop_front() {
            if self.latest.get(&page) == Some(&stamp) {
                self.latest.remove(&page);
                return page;
            }
        }
        panic!("LRU victim requested with no resident pages");
    }
}
