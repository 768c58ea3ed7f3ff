//! Offset pagination of listings.
//!
//! Pure arithmetic over an item count and a requested page:
//!
//! ```text
//! total 25, size 10:   page 1 → [0, 10)   page 2 → [10, 20)   page 3 → [20, 25)
//!                      page 0 → page 1    page 9 → page 3
//! size ≤ 0:            one page holding everything
//! ```

use std::ops::Range;

/// The visible part of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    /// Current page, `1..=max`.
    pub current: usize,
    /// Number of pages, at least 1.
    pub max: usize,
    /// Index range of the items on the current page.
    pub range: Range<usize>,
}

impl PageWindow {
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.range.clone()]
    }

    pub fn is_paginated(&self) -> bool {
        self.max > 1
    }
}

/// Clamp `requested` into the valid pages of `total` items.
///
/// A missing or zero request means the first page; a request past the end
/// means the last page.
pub fn paginate(total: usize, requested: Option<usize>, page_size: i64) -> PageWindow {
    let size = match usize::try_from(page_size) {
        Ok(size) if size > 0 => size,
        _ => {
            return PageWindow {
                current: 1,
                max: 1,
                range: 0..total,
            };
        }
    };

    let max = total.div_ceil(size).max(1);
    let current = requested.unwrap_or(1).clamp(1, max);
    let start = (current - 1) * size;
    let end = (start + size).min(total);
    PageWindow {
        current,
        max,
        range: start.min(end)..end,
    }
}

/// Page of a listing on which the item at `index` appears.
pub fn page_of_index(index: usize, page_size: i64) -> usize {
    match usize::try_from(page_size) {
        Ok(size) if size > 0 => index / size + 1,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaginated_shows_everything() {
        for size in [0, -5] {
            let window = paginate(25, Some(3), size);
            assert_eq!(window, PageWindow { current: 1, max: 1, range: 0..25 });
            assert!(!window.is_paginated());
        }
    }

    #[test]
    fn middle_page() {
        let window = paginate(25, Some(2), 10);
        assert_eq!(window, PageWindow { current: 2, max: 3, range: 10..20 });
    }

    #[test]
    fn past_the_end_clamps_to_last_page() {
        let items: Vec<usize> = (1..=25).collect();
        let window = paginate(25, Some(4), 10);
        assert_eq!(window.current, 3);
        assert_eq!(window.slice(&items), &[21, 22, 23, 24, 25]);
    }

    #[test]
    fn zero_or_missing_request_is_first_page() {
        assert_eq!(paginate(25, Some(0), 10).current, 1);
        assert_eq!(paginate(25, None, 10).current, 1);
    }

    #[test]
    fn empty_listing_has_one_empty_page() {
        let window = paginate(0, Some(5), 10);
        assert_eq!(window, PageWindow { current: 1, max: 1, range: 0..0 });
    }

    #[test]
    fn exact_multiple() {
        assert_eq!(paginate(20, Some(2), 10).range, 10..20);
        assert_eq!(paginate(20, None, 10).max, 2);
    }

    #[test]
    fn windows_stay_within_bounds() {
        for total in 0..30 {
            for size in 1..7 {
                for requested in 0..10 {
                    let window = paginate(total, Some(requested), size);
                    assert!(window.current >= 1 && window.current <= window.max);
                    assert_eq!(window.max, total.div_ceil(size as usize).max(1));
                    assert!(window.range.end <= total);
                    assert!(window.range.start <= window.range.end);
                }
            }
        }
    }

    #[test]
    fn item_page() {
        assert_eq!(page_of_index(0, 10), 1);
        assert_eq!(page_of_index(9, 10), 1);
        assert_eq!(page_of_index(10, 10), 2);
        assert_eq!(page_of_index(24, 0), 1);
    }
}
