pub const ITEMS_PER_PAGE: usize = 10;
pub const MAX_VISIBLE_PAGES: usize = 5;

/// Items on the 1-based `page`. Out-of-range pages yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = page.saturating_mul(page_size).min(items.len());
    &items[start..end]
}

pub fn total_pages(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    item_count.div_ceil(page_size)
}

/// Consecutive page numbers centred on `current_page`, slid back inside `[1, total_pages]`.
pub fn visible_page_window(current_page: usize, total_pages: usize, max_visible: usize) -> Vec<usize> {
    if max_visible == 0 || total_pages == 0 {
        return Vec::new();
    }
    let mut start = current_page.saturating_sub(max_visible / 2).max(1);
    let end = total_pages.min(start.saturating_add(max_visible - 1));
    if end + 1 < start.saturating_add(max_visible) {
        start = (end + 1).saturating_sub(max_visible).max(1);
    }
    (start..=end).collect()
}

/// 1-based bounds of the rows shown on `page`, as `(from, to)`; `(0, 0)` when empty.
pub fn page_bounds(page: usize, page_size: usize, item_count: usize) -> (usize, usize) {
    if item_count == 0 || page == 0 {
        return (0, 0);
    }
    let from = (page - 1).saturating_mul(page_size) + 1;
    let to = page.saturating_mul(page_size).min(item_count);
    (from.min(item_count), to)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}
