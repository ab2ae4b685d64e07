//! Pagination parameters shared by list endpoints.

use serde::Deserialize;

/// 1-based page plus page size; deserializes straight from a query string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub const MAX_PER_PAGE: u32 = 100;

    /// Clamp to `1..=100` and convert to a 0-based page index for the store.
    pub fn normalize(self) -> (u64, u64) {
        let page = self.page.max(1);
        let per_page = self.per_page.clamp(1, Self::MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}
