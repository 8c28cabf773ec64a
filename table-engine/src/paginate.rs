//! FILENAME: table-engine/src/paginate.rs
//! PURPOSE: Page arithmetic over a filtered row count.
//! CONTEXT: Pure functions. Pages are 1-based; ranges are half-open positions
//! into the filtered (and sorted) index list.

/// Number of pages needed for `filtered_count` rows. Always at least 1.
pub fn total_pages(filtered_count: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 1;
    }
    filtered_count.div_ceil(items_per_page).max(1)
}

/// Half-open `(start, end)` slice of the filtered list shown on `current_page`.
/// `start <= end <= filtered_count` holds for any input.
pub fn page_range(current_page: usize, items_per_page: usize, filtered_count: usize) -> (usize, usize) {
    if filtered_count == 0 {
        return (0, 0);
    }
    let start = current_page
        .saturating_sub(1)
        .saturating_mul(items_per_page)
        .min(filtered_count);
    let end = start.saturating_add(items_per_page).min(filtered_count);
    (start, end)
}

/// Clamp `page` into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages).max(1)
}

/// Page numbers to offer as buttons: `current - radius ..= current + radius`,
/// limited to `[1, total_pages]`.
pub fn page_window(current_page: usize, total_pages: usize, radius: usize) -> Vec<usize> {
    let total = total_pages.max(1);
    let current = clamp_page(current_page, total);
    let first = current.saturating_sub(radius).max(1);
    let last = current.saturating_add(radius).min(total);
    (first..=last).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(0, 1), 1);
        assert_eq!(total_pages(23, 10), 3);
        assert_eq!(total_pages(57, 10), 6);
        assert_eq!(total_pages(50, 10), 5);
        assert_eq!(total_pages(1, 25), 1);
    }

    #[test]
    fn test_page_range() {
        assert_eq!(page_range(1, 10, 57), (0, 10));
        assert_eq!(page_range(6, 10, 57), (50, 57));
        assert_eq!(page_range(1, 10, 0), (0, 0));
        assert_eq!(page_range(3, 10, 23), (20, 23));
    }

    #[test]
    fn test_page_range_never_inverted() {
        for count in 0..40 {
            for per_page in 1..12 {
                for page in 0..10 {
                    let (start, end) = page_range(page, per_page, count);
                    assert!(start <= end, "page={} per_page={} count={}", page, per_page, count);
                    assert!(end <= count);
                }
            }
        }
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 6), 1);
        assert_eq!(clamp_page(4, 6), 4);
        assert_eq!(clamp_page(9, 6), 6);
        assert_eq!(clamp_page(3, 1), 1);
    }

    #[test]
    fn test_page_window() {
        assert_eq!(page_window(1, 6, 3), vec![1, 2, 3, 4]);
        assert_eq!(page_window(5, 10, 3), vec![2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(page_window(10, 10, 3), vec![7, 8, 9, 10]);
        assert_eq!(page_window(1, 1, 3), vec![1]);
        assert_eq!(page_window(4, 6, 0), vec![4]);
    }
}
