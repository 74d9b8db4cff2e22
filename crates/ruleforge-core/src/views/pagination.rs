// crates/ruleforge-core/src/views/pagination.rs
// ============================================================================
// Module: Pagination
// Description: One-based page slicing for tabular views.
// Purpose: Share the dashboard's page arithmetic with every table.
// Dependencies: serde
// ============================================================================

use serde::Serialize;

/// A page of items plus the counters shown under the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSlice<'a, T> {
    /// Items on this page.
    pub items: &'a [T],
    /// One-based page number after clamping.
    pub page: usize,
    /// Total number of pages (`ceil(total / page_size)`).
    pub total_pages: usize,
    /// One-based index of the first item shown (0 when empty).
    pub from: usize,
    /// One-based index of the last item shown (0 when empty).
    pub to: usize,
    /// Total item count before slicing.
    pub total: usize,
}

/// Slices `items` into the requested one-based page.
///
/// Page numbers below 1 select the first page and numbers past the end
/// select the last page. A zero page size is treated as one.
#[must_use]
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> PageSlice<'_, T> {
    let size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(size);
    let page = page.clamp(1, total_pages.max(1));
    let start = (page - 1).saturating_mul(size).min(total);
    let end = start.saturating_add(size).min(total);
    let (from, to) = if start == end { (0, 0) } else { (start + 1, end) };
    PageSlice {
        items: &items[start .. end],
        page,
        total_pages,
        from,
        to,
        total,
    }
}
