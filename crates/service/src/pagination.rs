//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct, helpers to normalize inputs and the
//! `Page` envelope returned by listings.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`: (0-based page index, page size)
    pub fn normalize(self) -> (u64, u64) {
        self.normalize_with(100)
    }

    /// Same as [`Pagination::normalize`] with a caller-supplied page size cap.
    pub fn normalize_with(self, max_per_page: u32) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, max_per_page.max(1));
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}

/// Listing metadata; `last_page` is at least 1 even when `total` is 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub per_page: u64,
    pub total: u64,
    pub last_page: u64,
}

impl PageMeta {
    pub fn new(page_index: u64, per_page: u64, total: u64) -> Self {
        let per_page = per_page.max(1);
        Self {
            current_page: page_index + 1,
            per_page,
            total,
            last_page: total.div_ceil(per_page).max(1),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page { data: self.data.into_iter().map(f).collect(), meta: self.meta }
    }
}

#[cfg(test)]
mod tests {
    use super::{PageMeta, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
        let (_, per) = Pagination { page: 1, per_page: 1000 }.normalize_with(25);
        assert_eq!(per, 25);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 10);
    }

    #[test]
    fn meta_computes_last_page() {
        assert_eq!(PageMeta::new(0, 10, 0).last_page, 1);
        assert_eq!(PageMeta::new(0, 10, 10).last_page, 1);
        let meta = PageMeta::new(2, 10, 21);
        assert_eq!(meta.current_page, 3);
        assert_eq!(meta.last_page, 3);
    }
}
