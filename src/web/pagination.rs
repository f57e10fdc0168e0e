//! Pure pagination math for the dashboard table, computed from the counters
//! the backend reported, never from what the client assumed.

/// Numbered page links shown at once.
const MAX_VISIBLE_PAGES: u64 = 5;

/// "Showing X-Y of Z students" with a 1-indexed start and the end clamped to
/// the total.
pub fn page_summary(page_number: u64, page_size: u64, total_elements: u64) -> String {
    // Page number and size come straight from the query string, so the
    // products can exceed u64; saturate instead of overflowing.
    let start = if total_elements == 0 {
        0
    } else {
        page_number.saturating_mul(page_size).saturating_add(1)
    };
    let end = total_elements.min(page_number.saturating_add(1).saturating_mul(page_size));
    format!("Showing {start}-{end} of {total_elements} students")
}

/// Window of page numbers to render, centered on the current page and
/// clamped to the valid range.
pub fn page_window(page_number: u64, total_pages: u64) -> Vec<u64> {
    if total_pages == 0 {
        return Vec::new();
    }
    let start = page_number.saturating_sub(MAX_VISIBLE_PAGES / 2);
    let end = (start + MAX_VISIBLE_PAGES - 1).min(total_pages - 1);
    (start..=end).collect()
}

pub fn has_prev(page_number: u64) -> bool {
    page_number > 0
}

pub fn has_next(page_number: u64, total_pages: u64) -> bool {
    page_number + 1 < total_pages
}

/// Parse a requested page number; anything that is not a non-negative
/// integer falls back to the first page.
pub fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|page| *page >= 0)
        .map(|page| page as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_second_page_of_23() {
        assert_eq!(page_summary(1, 10, 23), "Showing 11-20 of 23 students");
        assert!(has_prev(1));
        assert!(has_next(1, 3));
    }

    #[test]
    fn summary_clamps_last_page() {
        assert_eq!(page_summary(2, 10, 23), "Showing 21-23 of 23 students");
        assert!(!has_next(2, 3));
    }

    #[test]
    fn summary_empty_result() {
        assert_eq!(page_summary(0, 10, 0), "Showing 0-0 of 0 students");
    }

    #[test]
    fn window_centers_on_current_page() {
        assert_eq!(page_window(5, 12), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn window_clamps_at_both_ends() {
        assert_eq!(page_window(0, 12), vec![0, 1, 2, 3, 4]);
        assert_eq!(page_window(11, 12), vec![9, 10, 11]);
        assert_eq!(page_window(0, 2), vec![0, 1]);
        assert!(page_window(0, 0).is_empty());
    }

    #[test]
    fn summary_saturates_on_huge_page_and_size() {
        let summary = page_summary(i64::MAX as u64, u64::MAX, 23);
        assert!(summary.ends_with("of 23 students"));
        assert_eq!(page_summary(u64::MAX, u64::MAX, 23), format!("Showing {}-23 of 23 students", u64::MAX));
    }

    #[test]
    fn parse_page_rejects_garbage() {
        assert_eq!(parse_page(Some("3")), 3);
        assert_eq!(parse_page(Some(" 7 ")), 7);
        assert_eq!(parse_page(Some("-1")), 0);
        assert_eq!(parse_page(Some("abc")), 0);
        assert_eq!(parse_page(None), 0);
    }

    #[test]
    fn first_page_has_no_prev() {
        assert!(!has_prev(0));
        assert!(!has_next(0, 1));
        assert!(has_next(0, 2));
    }
}
