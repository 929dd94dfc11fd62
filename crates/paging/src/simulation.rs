use std::num::NonZeroUsize;

use serde::Serialize;

use crate::{
    AccessRecord, ClockReplacer, FrameTable, LruReplacer, OptimalReplacer, PageId, Policy,
    Replacer, Trace,
};

/// Counters accumulated over one replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub accesses: u64,
    pub faults: u64,
    pub writebacks: u64,
}

impl SimulationStats {
    pub fn hits(&self) -> u64 {
        self.accesses - self.faults
    }

    /// Fraction of accesses that faulted, in `0.0..=1.0`.
    pub fn fault_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.faults as f64 / self.accesses as f64
        }
    }
}

/// A page pushed out of memory to make room for a faulting one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    pub page: PageId,
    pub wrote_back: bool,
}

/// Outcome of a single access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Hit,
    Fault { evicted: Option<Eviction> },
}

/// Simulation context: frame table, replacement policy and counters for one run.
#[derive(Debug)]
pub struct Simulation<R: Replacer> {
    frames: FrameTable,
    replacer: R,
    stats: SimulationStats,
}

impl<R: Replacer> Simulation<R> {
    pub fn new(replacer: R, frames: NonZeroUsize) -> Self {
        Self {
            frames: FrameTable::new(frames),
            replacer,
            stats: SimulationStats::default(),
        }
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn replacer(&self) -> &R {
        &self.replacer
    }

    pub fn stats(&self) -> SimulationStats {
        self.stats
    }

    /// Applies the access found at position `index` of the trace.
    pub fn step(&mut self, index: usize, record: AccessRecord) -> Access {
        self.stats.accesses += 1;
        let page = record.page;

        let access = if self.frames.is_resident(page) {
            log::trace!("hit page {} at {}", page, index);
            self.replacer.on_hit(&mut self.frames, page);
            Access::Hit
        } else {
            self.stats.faults += 1;
            let evicted = if self.frames.try_admit_direct(page) {
                log::trace!("fault page {} at {}: free frame", page, index);
                None
            } else {
                let victim = self.replacer.select_victim(&mut self.frames, index);
                let wrote_back = self.frames.evict(victim);
                if wrote_back {
                    self.stats.writebacks += 1;
                }
                log::debug!(
                    "fault page {} at {}: evicted {} (write-back: {})",
                    page,
                    index,
                    victim,
                    wrote_back
                );
                self.frames.admit_after_eviction(page);
                Some(Eviction {
                    page: victim,
                    wrote_back,
                })
            };
            self.replacer.on_admit(&mut self.frames, page);
            Access::Fault { evicted }
        };

        if record.operation.is_store() {
            self.frames.set_dirty(page, true);
        }
        access
    }

    /// Replays every record of the trace in order and returns the totals.
    pub fn run(&mut self, trace: &Trace) -> SimulationStats {
        for (index, record) in trace.iter().enumerate() {
            self.step(index, *record);
        }
        self.stats
    }
}

/// Runs a complete replay of `trace` under the given policy.
pub fn simulate(policy: Policy, frames: NonZeroUsize, trace: &Trace) -> SimulationStats {
    let stats = match policy {
        Policy::Optimal => Simulation::new(OptimalReplacer::new(trace), frames).run(trace),
        Policy::Lru => Simulation::new(LruReplacer::new(), frames).run(trace),
        Policy::SecondChance => Simulation::new(ClockReplacer::new(frames), frames).run(trace),
    };
    log::info!(
        "{} with {} frames: {} accesses, {} faults, {} write-backs",
        policy,
        frames,
        stats.accesses,
        stats.faults,
        stats.writebacks
    );
    stats
}
