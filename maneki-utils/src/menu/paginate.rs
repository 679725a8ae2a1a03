//! Pure pagination math for reaction menus.

use std::iter::FusedIterator;

/// Largest page size a menu accepts. Larger pages break the embed layout.
pub const MAX_PAGE_SIZE: usize = 10;

/// Return `max` when `value > max`, `min` when `value < min`, otherwise `value`.
pub fn clamp<T: PartialOrd>(value: T, max: T, min: T) -> T {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Number of pages needed for `item_count` items. Always at least 1.
pub fn page_count(item_count: usize, page_size: usize) -> usize {
    item_count.max(1).div_ceil(page_size.max(1))
}

/// Clamp a one-based page into `[1, page_count]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    clamp(page, total_pages.max(1), 1)
}

/// Start/end indices of a one-based page.
pub fn page_window(total_items: usize, page_size: usize, page: usize) -> (usize, usize) {
    let page_size = page_size.max(1);
    let start = page
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    (start, end)
}

/// Split `items` into consecutive pages of at most `page_size` entries.
///
/// The iterator is lazy and borrows `items`; call `paginate` again (or clone
/// the iterator) to walk the pages a second time. An empty slice still yields
/// a single empty page.
pub fn paginate<T>(items: &[T], page_size: usize) -> Pages<'_, T> {
    Pages {
        items,
        page_size: page_size.max(1),
        next_page: 1,
        total: page_count(items.len(), page_size),
    }
}

/// Iterator returned by [`paginate`].
#[derive(Debug)]
pub struct Pages<'a, T> {
    items: &'a [T],
    page_size: usize,
    next_page: usize,
    total: usize,
}

impl<T> Clone for Pages<'_, T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items,
            page_size: self.page_size,
            next_page: self.next_page,
            total: self.total,
        }
    }
}

impl<'a, T> Iterator for Pages<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_page > self.total {
            return None;
        }

        let (start, end) = page_window(self.items.len(), self.page_size, self.next_page);
        self.next_page += 1;
        Some(&self.items[start..end])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total + 1).saturating_sub(self.next_page);
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Pages<'_, T> {}

impl<T> FusedIterator for Pages<'_, T> {}
