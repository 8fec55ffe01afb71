//! Page reconciliation: decide whether a fetched page can be shown as-is
//! or whether the requested page no longer exists.

use crate::query::QueryState;
use crate::types::{Page, PageMeta};

/// Why a collection page shows no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The collection itself is empty.
    NoData,
    /// Rows exist, but none match the current filter.
    NoResults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Show the page.
    Accept,
    /// Show the given empty state; the requested page stays.
    Empty(EmptyState),
    /// The requested page is gone; fetch `page` instead.
    Refetch { page: u32 },
}

/// Judge the first response for `query`.
///
/// A requested page beyond `last_page` is corrected to the last page. When
/// the last page itself comes back without rows while the total says rows
/// exist, rows were removed between counting and fetching, so the previous
/// page is used. Any other in-range page is shown as the server sent it.
pub fn reconcile<T>(query: &QueryState, page: &Page<T>) -> Reconciliation {
    let meta = &page.meta;
    let requested = query.page();
    let last = meta.last_page.max(1);

    if requested > last {
        return Reconciliation::Refetch { page: last };
    }
    if meta.total == 0 {
        return Reconciliation::Empty(empty_state(query, meta));
    }
    if page.data.is_empty() && requested == last {
        return Reconciliation::Refetch {
            page: requested.saturating_sub(1).max(1),
        };
    }
    Reconciliation::Accept
}

/// Judge a corrective response. It is final: never asks for another fetch.
pub fn settle<T>(query: &QueryState, page: &Page<T>) -> Option<EmptyState> {
    page.data.is_empty().then(|| empty_state(query, &page.meta))
}

/// Tell "nothing matches the filter" apart from "nothing at all".
///
/// The unfiltered total decides when the server reports it; otherwise an
/// active filter implies rows may exist outside it.
pub fn empty_state(query: &QueryState, meta: &PageMeta) -> EmptyState {
    let has_rows = match meta.total_unfiltered {
        Some(unfiltered) => unfiltered > 0,
        None => query.is_filtered(),
    };
    if has_rows {
        EmptyState::NoResults
    } else {
        EmptyState::NoData
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(
        data: Vec<u32>,
        current: u32,
        last: u32,
        total: u64,
        unfiltered: Option<u64>,
    ) -> Page<u32> {
        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            (Some(1), Some(data.len() as u64))
        };
        Page {
            data,
            meta: PageMeta {
                current_page: current,
                last_page: last,
                per_page: 10,
                from,
                to,
                total,
                total_unfiltered: unfiltered,
            },
        }
    }

    fn query_on(p: u32) -> QueryState {
        let mut q = QueryState::new(Some("name"));
        q.set_page(p);
        q
    }

    #[test]
    fn accepts_page_in_range() {
        let r = reconcile(&query_on(2), &page(vec![11, 12], 2, 3, 22, Some(22)));
        assert_eq!(r, Reconciliation::Accept);
    }

    #[test]
    fn shrunk_collection_corrects_to_last_page() {
        let r = reconcile(&query_on(2), &page(vec![], 2, 1, 2, None));
        assert_eq!(r, Reconciliation::Refetch { page: 1 });

        let r = reconcile(&query_on(7), &page(vec![], 7, 4, 40, None));
        assert_eq!(r, Reconciliation::Refetch { page: 4 });
    }

    #[test]
    fn empty_filter_result_beyond_first_page_goes_to_page_one() {
        let r = reconcile(&query_on(3), &page(vec![], 3, 0, 0, Some(5)));
        assert_eq!(r, Reconciliation::Refetch { page: 1 });
    }

    #[test]
    fn empty_collection_on_first_page_is_not_corrected() {
        let r = reconcile(&query_on(1), &page(vec![], 1, 1, 0, Some(0)));
        assert_eq!(r, Reconciliation::Empty(EmptyState::NoData));

        let r = reconcile(&query_on(1), &page(vec![], 1, 1, 0, Some(9)));
        assert_eq!(r, Reconciliation::Empty(EmptyState::NoResults));
    }

    #[test]
    fn emptied_last_page_steps_back() {
        let r = reconcile(&query_on(3), &page(vec![], 3, 3, 21, None));
        assert_eq!(r, Reconciliation::Refetch { page: 2 });

        let r = reconcile(&query_on(1), &page(vec![], 1, 1, 1, None));
        assert_eq!(r, Reconciliation::Refetch { page: 1 });
    }

    #[test]
    fn empty_page_before_last_is_accepted() {
        let r = reconcile(&query_on(2), &page(vec![], 2, 3, 21, None));
        assert_eq!(r, Reconciliation::Accept);
    }

    #[test]
    fn growth_needs_no_correction() {
        let r = reconcile(&query_on(1), &page(vec![1, 2, 3], 1, 5, 50, None));
        assert_eq!(r, Reconciliation::Accept);
    }

    #[test]
    fn missing_unfiltered_total_falls_back_to_filter() {
        let mut q = QueryState::new(None);
        let meta = page(vec![], 1, 1, 0, None).meta;
        assert_eq!(empty_state(&q, &meta), EmptyState::NoData);
        q.set_filter("nobody");
        assert_eq!(empty_state(&q, &meta), EmptyState::NoResults);
    }

    #[test]
    fn settle_never_refetches() {
        let q = query_on(1);
        assert_eq!(settle(&q, &page(vec![], 1, 1, 0, Some(3))), Some(EmptyState::NoResults));
        assert_eq!(settle(&q, &page(vec![1], 1, 1, 1, Some(3))), None);
    }
}
