use std::fmt;

/// Number of low address bits that select a byte within a page (4 KiB pages).
pub const PAGE_SHIFT: u32 = 12;

/// Virtual page number: an address with its page offset shifted off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(pub u64);

impl PageId {
    /// Returns the page containing the given virtual address.
    pub fn from_address(address: u64) -> Self {
        Self(address >> PAGE_SHIFT)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Per-page metadata kept for every page the trace has touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub(crate) referenced: bool,
    pub(crate) dirty: bool,
}

impl Page {
    /// Creates a clean, unreferenced page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the page was used since its reference bit was last cleared.
    pub fn is_referenced(&self) -> bool {
        self.referenced
    }

    /// Returns whether the page has been stored to since its last write-back.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
