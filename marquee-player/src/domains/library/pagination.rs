use std::ops::Range;

/// Client-side paging over an in-memory list
///
/// Pages are 1-based. The current page is kept within `1..=total_pages`
/// (or at 1 for an empty list) whenever the item count changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
    current_page: usize,
    item_count: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            item_count: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn total_pages(&self) -> usize {
        self.item_count.div_ceil(self.page_size)
    }

    pub fn set_item_count(&mut self, item_count: usize) {
        self.item_count = item_count;
        self.clamp();
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Advance one page; returns whether the page changed.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.current_page += 1;
        true
    }

    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.current_page -= 1;
        true
    }

    pub fn go_to(&mut self, page: usize) {
        self.current_page = page;
        self.clamp();
    }

    /// Index range of the current page within the full list.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.item_count);
        start.min(end)..end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        let end = range.end.min(items.len());
        &items[range.start.min(end)..end]
    }

    fn clamp(&mut self) {
        self.current_page = self.current_page.clamp(1, self.total_pages().max(1));
    }
}
