use std::collections::HashMap;

use crate::replacer::Replacer;
use crate::{FrameTable, PageId, Trace};

/// Clairvoyant replacer: evicts the resident page whose next use is the
/// farthest ahead in the trace, or one that is never used again.
///
/// Built from the trace it will replay. For every page it stores the
/// ascending positions at which that page is accessed, so the next use
/// after any index is a binary search away.
#[derive(Debug, Default)]
pub struct OptimalReplacer {
    positions: HashMap<PageId, Vec<usize>>,
}

impl OptimalReplacer {
    pub fn new(trace: &Trace) -> Self {
        let mut positions: HashMap<PageId, Vec<usize>> = HashMap::new();
        for (index, record) in trace.iter().enumerate() {
            positions.entry(record.page).or_default().push(index);
        }
        Self { positions }
    }

    /// Position of the first access to `page` strictly after `index`.
    pub fn next_use(&self, page: PageId, index: usize) -> Option<usize> {
        let positions = self.positions.get(&page)?;
        let next = positions.partition_point(|&position| position <= index);
        positions.get(next).copied()
    }
}

impl Replacer for OptimalReplacer {
    fn on_admit(&mut self, _frames: &mut FrameTable, _page: PageId) {}

    fn on_hit(&mut self, _frames: &mut FrameTable, _page: PageId) {}

    /// Resident pages are visited in ascending id order, so among pages
    /// that are never used again the lowest id is chosen.
    fn select_victim(&mut self, frames: &mut FrameTable, index: usize) -> PageId {
        let mut farthest: Option<(PageId, usize)> = None;
        for page in frames.resident_pages() {
            let Some(next) = self.next_use(page, index) else {
                return page;
            };
            match farthest {
                Some((_, best)) if best >= next => {}
                _ => farthest = Some((page, next)),
            }
        }
        farthest
            .map(|(page, _)| page)
            .unwrap_or_else(|| panic!("optimal victim requested with no resident pages"))
    }
}
