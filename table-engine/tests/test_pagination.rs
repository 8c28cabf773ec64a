//! FILENAME: tests/test_pagination.rs
//! Integration tests for paging through a loaded table.

mod common;

use common::{EmployeeFixture, TestHarness};
use table_engine::paginate::{page_range, total_pages};
use table_engine::TableError;

// ============================================================================
// PAGE ARITHMETIC
// ============================================================================

#[test]
fn test_57_employees_ten_per_page() {
    let harness = TestHarness::with_employees(10);
    assert_eq!(harness.table.total_pages(), 6);
    assert_eq!(page_range(1, 10, 57), (0, 10));
    assert_eq!(page_range(6, 10, 57), (50, 57));
}

#[test]
fn test_total_pages_edge_cases() {
    for per_page in 1..30 {
        assert_eq!(total_pages(0, per_page), 1);
    }
    assert_eq!(total_pages(23, 10), 3);
}

#[test]
fn test_last_page_is_short() {
    let mut harness = TestHarness::with_employees(10);
    assert_eq!(harness.table.last_page(), 6);
    assert_eq!(harness.table.visible_rows(), (50..57).collect::<Vec<_>>());
    assert_eq!(harness.table.summary().display_label(), "51 - 57");
}

#[test]
fn test_empty_table_has_one_page() {
    let mut harness = TestHarness::new();
    assert_eq!(harness.table.total_pages(), 1);
    assert!(harness.table.visible_rows().is_empty());
    assert_eq!(harness.table.summary().display_label(), "0");
    assert_eq!(harness.table.next_page(), 1);
}

// ============================================================================
// PAGE STATE
// ============================================================================

#[test]
fn test_page_reclamped_when_filter_shrinks_result() {
    let mut harness = TestHarness::with_employees(10);
    harness.table.set_page(6);
    harness.table.set_search_text("london");
    assert_eq!(harness.table.current_page(), 1);
    assert_eq!(harness.table.total_pages(), 1);
    assert_eq!(harness.table.visible_rows(), EmployeeFixture::LONDON.to_vec());
}

#[test]
fn test_page_size_change_returns_to_first_page() {
    let mut harness = TestHarness::with_employees(10);
    harness.table.set_page(4);
    assert_eq!(harness.table.set_items_per_page(25).unwrap(), 25);
    assert_eq!(harness.table.current_page(), 1);
    assert_eq!(harness.table.total_pages(), 3);
}

#[test]
fn test_page_navigation_emits_summaries() {
    let mut harness = TestHarness::with_employees(10);
    harness.table.next_page();
    harness.table.next_page();
    harness.table.set_page(3);
    let summaries = harness.drain_filter_summaries();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].current_page, 3);
    assert_eq!(summaries[1].visible_range, (20, 30));
    assert_eq!(summaries[1].filtered_count, 57);
}

#[test]
fn test_page_window_around_current() {
    let mut harness = TestHarness::with_employees(5);
    assert_eq!(harness.table.total_pages(), 12);
    assert_eq!(harness.table.page_window(), vec![1, 2, 3, 4]);
    harness.table.set_page(6);
    assert_eq!(harness.table.page_window(), vec![3, 4, 5, 6, 7, 8, 9]);
    harness.table.last_page();
    assert_eq!(harness.table.page_window(), vec![9, 10, 11, 12]);
}

#[test]
fn test_explicit_page_lookup() {
    let harness = TestHarness::with_employees(10);
    assert_eq!(harness.table.page_rows(2).unwrap(), (10..20).collect::<Vec<_>>());
    assert!(matches!(
        harness.table.page_rows(7),
        Err(TableError::PageOutOfRange { page: 7, total: 6 })
    ));
}

#[test]
fn test_page_range_properties_over_table() {
    let mut harness = TestHarness::with_employees(10);
    for term in ["", "london", "tokyo", "developer", "0", "nothing-matches"] {
        harness.table.set_search_text(term);
        let count = harness.table.filtered_count();
        for page in 1..=harness.table.total_pages() {
            let (start, end) = page_range(page, 10, count);
            assert!(start <= end);
            assert!(end <= count);
        }
    }
}
