use serde::Serialize;

/// Number of pages up to which every page button is rendered.
const FULL_WINDOW: usize = 7;

/// A single slot of the pagination bar. Ellipsis serializes as `null` so
/// templates can test `{% if page %}`.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

fn get_pages(total_pages: usize, current_page: usize) -> Vec<PageItem> {
    if total_pages <= FULL_WINDOW {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let (start, end) = if current_page <= 3 {
        (2, 5)
    } else if current_page >= total_pages - 2 {
        (total_pages - 4, total_pages - 1)
    } else {
        (
            current_page.saturating_sub(1).max(2),
            (current_page + 1).min(total_pages - 1),
        )
    };

    let mut pages = vec![PageItem::Page(1)];
    if start > 2 {
        pages.push(PageItem::Ellipsis);
    }
    pages.extend((start..=end).map(PageItem::Page));
    if end < total_pages - 1 {
        pages.push(PageItem::Ellipsis);
    }
    pages.push(PageItem::Page(total_pages));

    pages
}

/// Page window plus previous/next availability for one list page.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Pager {
    pub pages: Vec<PageItem>,
    pub page: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl Pager {
    pub fn new(current_page: usize, total_pages: usize) -> Self {
        let current_page = current_page.max(1);

        Self {
            pages: get_pages(total_pages, current_page),
            page: current_page,
            total_pages,
            has_prev: current_page > 1,
            has_next: current_page < total_pages,
        }
    }

    pub fn prev_page(&self) -> Option<usize> {
        self.has_prev.then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.has_next.then(|| self.page + 1)
    }
}
