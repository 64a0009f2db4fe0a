// Pagination value object (1-indexed pages)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Offset/limit for this page, or `None` when the request can only yield
    /// an empty result (`page < 1`, `page_size <= 0`, or an offset that does
    /// not fit the platform).
    pub fn window(&self) -> Option<PageWindow> {
        if self.page < 1 || self.page_size <= 0 {
            return None;
        }
        let offset = (self.page - 1).checked_mul(self.page_size)?;
        Some(PageWindow {
            offset: usize::try_from(offset).ok()?,
            limit: usize::try_from(self.page_size).ok()?,
        })
    }
}
