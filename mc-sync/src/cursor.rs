//! Resumable position in a paginated remote list

use mc_api::types::{ListLimits, ListLimitsReturned};

/// Offset and size of the next page to request
///
/// Whether another page follows is decided only by the range the host reports,
/// never by how many items came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u32,
    pub size: u32,
}

impl PageCursor {
    /// Cursor at the start of a list
    pub fn first(size: u32) -> Self {
        Self { offset: 0, size }
    }

    pub fn is_first(&self) -> bool {
        self.offset == 0
    }

    pub fn limits(&self) -> ListLimits {
        ListLimits::page(self.offset, self.size)
    }

    /// Cursor for the following page, or `None` once the host reports nothing beyond `returned`
    pub fn next(&self, returned: &ListLimitsReturned) -> Option<Self> {
        if !returned.more_available() {
            return None;
        }
        Some(Self {
            offset: self.offset.checked_add(self.size)?,
            size: self.size,
        })
    }
}
