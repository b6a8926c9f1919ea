use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Navigation controls available for a page, each carrying its target page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Affordances {
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

/// The visible slice of an ordered result set.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
    pub affordances: Affordances,
}

/// Number of pages needed to show `len` results, `page_size` at a time.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1))
}

/// Compute the window for `page` (1-based) over `results`.
///
/// Pure: calling it again for another page never touches the results. A
/// page of 0 is read as 1 and a page size of 0 as 1. Pages past the end
/// yield an empty slice.
pub fn paginate<T>(results: &[T], page: usize, page_size: usize) -> PageWindow<'_, T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = total_pages(results.len(), page_size);

    let start = (page - 1).saturating_mul(page_size).min(results.len());
    let end = page.saturating_mul(page_size).min(results.len());

    PageWindow {
        items: &results[start..end],
        page,
        total_pages: total,
        affordances: affordances_for(page, total),
    }
}

fn affordances_for(page: usize, total: usize) -> Affordances {
    if total <= 1 {
        return Affordances::default();
    }
    if page == 1 {
        Affordances {
            prev: None,
            next: Some(2),
        }
    } else if page < total {
        Affordances {
            prev: Some(page - 1),
            next: Some(page + 1),
        }
    } else if page == total {
        Affordances {
            prev: Some(page - 1),
            next: None,
        }
    } else {
        Affordances::default()
    }
}
