//! Page parameters for history queries

use serde::{Deserialize, Serialize};

const MAX_PER_PAGE: u32 = 100;
const DEFAULT_PER_PAGE: u32 = 50;

/// Clamped page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Page is at least 1; per page is clamped to 1..=100.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// Query string form: `?page=2&per_page=20`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl From<PageParams> for Pagination {
    fn from(p: PageParams) -> Self {
        Self::new(p.page.unwrap_or(1), p.per_page.unwrap_or(DEFAULT_PER_PAGE))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps() {
        let p = Pagination::new(0, 1000);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, 100);
        assert_eq!(Pagination::new(3, 0).per_page, 1);
    }

    #[test]
    fn offset() {
        assert_eq!(Pagination::new(1, 50).offset(), 0);
        assert_eq!(Pagination::new(3, 20).offset(), 40);
    }

    #[test]
    fn from_params() {
        let p = Pagination::from(PageParams::default());
        assert_eq!(p, Pagination::new(1, 50));
    }
}
