// MODULE DECLARATIONS
mod clock;
mod frames;
mod optimal;
mod page;
mod replacer;
mod simulation;
mod trace;

// PUBLIC API EXPORTS
pub use clock::ClockReplacer;
pub use frames::FrameTable;
pub use optimal::OptimalReplacer;
pub use page::{PAGE_SHIFT, Page, PageId};
pub use replacer::{LruReplacer, Policy, Replacer, UnknownPolicy};
pub use simulation::{Access, Eviction, Simulation, SimulationStats, simulate};
pub use trace::{AccessRecord, Operation, Trace, TraceError, TraceResult};
