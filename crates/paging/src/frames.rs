use std::collections::{BTreeSet, HashMap};
use std::num::NonZeroUsize;

use crate::{Page, PageId};

/// Physical memory model: the page directory plus the bounded resident set.
///
/// The directory is the only owner of page metadata. The resident set
/// stores page ids that key into it, so dirty and reference updates are
/// always applied in one place.
#[derive(Debug, Clone)]
pub struct FrameTable {
    capacity: NonZeroUsize,
    directory: HashMap<PageId, Page>,
    resident: BTreeSet<PageId>,
}

impl FrameTable {
    /// Creates an empty frame table with a fixed number of frames.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            directory: HashMap::new(),
            resident: BTreeSet::new(),
        }
    }

    /// Returns the number of frames.
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Number of resident pages.
    pub fn len(&self) -> usize {
        self.resident.len()
    }

    /// Returns whether no page is resident.
    pub fn is_empty(&self) -> bool {
        self.resident.is_empty()
    }

    /// Returns whether every frame holds a page.
    pub fn is_full(&self) -> bool {
        self.resident.len() >= self.capacity.get()
    }

    /// Returns whether the page currently occupies a frame.
    pub fn is_resident(&self, page: PageId) -> bool {
        self.resident.contains(&page)
    }

    /// Resident pages in ascending id order.
    pub fn resident_pages(&self) -> impl Iterator<Item = PageId> + '_ {
        self.resident.iter().copied()
    }

    /// Returns the directory entry of a page, resident or not.
    pub fn page(&self, page: PageId) -> Option<&Page> {
        self.directory.get(&page)
    }

    /// Number of pages ever referenced.
    pub fn distinct_pages(&self) -> usize {
        self.directory.len()
    }

    /// Ensures the page has a directory entry.
    pub fn touch(&mut self, page: PageId) -> &mut Page {
        self.directory.entry(page).or_default()
    }

    /// Admits the page if a frame is free. Leaves the table untouched otherwise.
    pub fn try_admit_direct(&mut self, page: PageId) -> bool {
        if self.is_full() {
            return false;
        }
        self.touch(page);
        self.resident.insert(page);
        true
    }

    /// Removes a resident page, returning whether it had to be written back.
    ///
    /// Panics if the page is not resident.
    pub fn evict(&mut self, victim: PageId) -> bool {
        assert!(
            self.resident.remove(&victim),
            "evicting non-resident page {victim}"
        );
        let page = self
            .directory
            .get_mut(&victim)
            .expect("resident page missing from directory");
        let wrote_back = page.dirty;
        page.dirty = false;
        wrote_back
    }

    /// Places a page into the frame released by the preceding eviction.
    ///
    /// Panics if no frame is free.
    pub fn admit_after_eviction(&mut self, page: PageId) {
        assert!(!self.is_full(), "admitting page {page} without a free frame");
        self.touch(page);
        self.resident.insert(page);
    }

    /// Panics if the page has never been referenced.
    pub fn set_dirty(&mut self, page: PageId, dirty: bool) {
        self.entry_mut(page).dirty = dirty;
    }

    /// Panics if the page has never been referenced.
    pub fn set_referenced(&mut self, page: PageId, referenced: bool) {
        self.entry_mut(page).referenced = referenced;
    }

    /// Returns the page's reference bit; unknown pages read as unreferenced.
    pub fn is_referenced(&self, page: PageId) -> bool {
        self.directory.get(&page).is_some_and(|entry| entry.referenced)
    }

    /// Returns the page's dirty bit; unknown pages read as clean.
    pub fn is_dirty(&self, page: PageId) -> bool {
        self.directory.get(&page).is_some_and(|entry| entry.dirty)
    }

    fn entry_mut(&mut self, page: PageId) -> &mut Page {
        self.directory
            .get_mut(&page)
            .unwrap_or_else(|| panic!("page {page} not in directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(capacity: usize) -> FrameTable {
        FrameTable::new(NonZeroUsize::new(capacity).unwrap())
    }

    #[test]
    fn test_admit_until_full() {
        let mut table = frames(2);
        assert!(table.try_admit_direct(PageId(1)));
        assert!(table.try_admit_direct(PageId(2)));
        assert!(table.is_full());

        assert!(!table.try_admit_direct(PageId(3)));
        assert!(!table.is_resident(PageId(3)));
        assert!(table.page(PageId(3)).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_evict_reports_dirty_and_cleans() {
        let mut table = frames(1);
        assert!(table.try_admit_direct(PageId(7)));
        table.set_dirty(PageId(7), true);

        assert!(table.evict(PageId(7)));
        assert!(!table.is_resident(PageId(7)));
        assert!(!table.is_dirty(PageId(7)));
        // the page stays in the directory after losing residency
        assert_eq!(table.distinct_pages(), 1);

        table.admit_after_eviction(PageId(8));
        assert!(table.is_resident(PageId(8)));
        assert!(!table.evict(PageId(8)));
    }

    #[test]
    fn test_resident_pages_ascending() {
        let mut table = frames(3);
        table.try_admit_direct(PageId(30));
        table.try_admit_direct(PageId(10));
        table.try_admit_direct(PageId(20));
        let pages: Vec<_> = table.resident_pages().collect();
        assert_eq!(pages, vec![PageId(10), PageId(20), PageId(30)]);
    }

    #[test]
    fn test_flags_survive_eviction() {
        let mut table = frames(1);
        table.try_admit_direct(PageId(1));
        table.set_referenced(PageId(1), true);
        table.evict(PageId(1));
        assert!(table.is_referenced(PageId(1)));
    }

    #[test]
    #[should_panic(expected = "evicting non-resident page")]
    fn test_evict_non_resident_panics() {
        let mut table = frames(1);
        table.evict(PageId(1));
    }

    #[test]
    #[should_panic(expected = "without a free frame")]
    fn test_admit_into_full_table_panics() {
        let mut table = frames(1);
        table.try_admit_direct(PageId(1));
        table.admit_after_eviction(PageId(2));
    }
}
