use serde::{Deserialize, Serialize};

/// Server-owned paging state, mirrored after each list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Pagination {
    pub fn empty(limit: u32) -> Self {
        Self { page: 1, limit, total: 0, pages: 0 }
    }

    pub fn from_total(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self { page, limit, total, pages }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.pages.max(1)
    }
}
