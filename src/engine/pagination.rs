use serde::Serialize;

/// Numbered buttons shown at once in the pagination bar.
pub const MAX_PAGE_BUTTONS: usize = 5;

/// Number of pages needed for `total` rows. Zero rows means zero pages.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Rows on a 1-based `page`: `[size*(page-1), size*page)` clipped to the input.
///
/// Page 0 and pages past the end give an empty slice rather than clamping.
pub fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = page_size.saturating_mul(page - 1);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// 1-based inclusive range of rows shown on `page`, as in "showing 13-24 of 25".
/// `None` when the page holds nothing.
pub fn visible_range(total: usize, page: usize, page_size: usize) -> Option<(usize, usize)> {
    if page == 0 || page_size == 0 {
        return None;
    }
    let first = page_size.saturating_mul(page - 1).saturating_add(1);
    if first > total {
        return None;
    }
    let last = page_size.saturating_mul(page).min(total);
    Some((first, last))
}

/// Page after a "previous" click. No-op on the first page.
pub fn previous_page(current: usize) -> usize {
    if current > 1 {
        current - 1
    } else {
        current
    }
}

/// Page after a "next" click. No-op on or past the last page.
pub fn next_page(current: usize, total_pages: usize) -> usize {
    if current < total_pages {
        current + 1
    } else {
        current
    }
}

/// One element of the pagination bar, left to right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageControl {
    Previous { enabled: bool },
    /// A numbered page button. First/last shortcuts are plain page buttons.
    Page { number: usize, active: bool },
    Ellipsis,
    Next { enabled: bool },
}

/// Pagination bar for `current` out of `total_pages`.
///
/// Up to [`MAX_PAGE_BUTTONS`] numbered buttons centred on the current page;
/// the window slides left near the end so it stays full. The first and last
/// pages are always reachable, with an ellipsis when there is a gap.
pub fn page_controls(current: usize, total_pages: usize) -> Vec<PageControl> {
    let half = MAX_PAGE_BUTTONS / 2;
    let mut start = current.saturating_sub(half).max(1);
    let end = total_pages.min(start.saturating_add(MAX_PAGE_BUTTONS - 1));
    if end.saturating_add(1) < start.saturating_add(MAX_PAGE_BUTTONS) {
        start = (end + 1).saturating_sub(MAX_PAGE_BUTTONS).max(1);
    }

    let mut controls = vec![PageControl::Previous {
        enabled: current > 1,
    }];

    if start > 1 {
        controls.push(PageControl::Page {
            number: 1,
            active: current == 1,
        });
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    for number in start..=end {
        controls.push(PageControl::Page {
            number,
            active: number == current,
        });
    }

    if end < total_pages {
        if end + 1 < total_pages {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Page {
            number: total_pages,
            active: current == total_pages,
        });
    }

    controls.push(PageControl::Next {
        enabled: current < total_pages,
    });
    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(controls: &[PageControl]) -> Vec<String> {
        controls
            .iter()
            .filter_map(|c| match c {
                PageControl::Page { number, active } => Some(if *active {
                    format!("[{}]", number)
                } else {
                    number.to_string()
                }),
                PageControl::Ellipsis => Some("...".to_string()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(12, 12), 1);
        assert_eq!(total_pages(25, 12), 3);
    }

    #[test]
    fn test_pages_reconstruct_input() {
        for len in [0usize, 1, 11, 12, 13, 24, 25, 100] {
            let items: Vec<usize> = (0..len).collect();
            let mut rebuilt = Vec::new();
            for page in 1..=total_pages(len, 12) {
                rebuilt.extend_from_slice(page_slice(&items, page, 12));
            }
            assert_eq!(rebuilt, items, "len={}", len);
        }
    }

    #[test]
    fn test_out_of_range_pages_are_empty() {
        let items: Vec<usize> = (0..25).collect();
        assert!(page_slice(&items, 4, 12).is_empty());
        assert!(page_slice(&items, 0, 12).is_empty());
        let empty: Vec<usize> = Vec::new();
        assert!(page_slice(&empty, 1, 12).is_empty());
        assert_eq!(page_slice(&items, 3, 12), &[24]);
    }

    #[test]
    fn test_visible_range() {
        assert_eq!(visible_range(25, 1, 12), Some((1, 12)));
        assert_eq!(visible_range(25, 3, 12), Some((25, 25)));
        assert_eq!(visible_range(25, 4, 12), None);
        assert_eq!(visible_range(0, 1, 12), None);
    }

    #[test]
    fn test_prev_next_are_noops_at_bounds() {
        assert_eq!(previous_page(1), 1);
        assert_eq!(previous_page(3), 2);
        assert_eq!(next_page(3, 3), 3);
        assert_eq!(next_page(2, 3), 3);
        assert_eq!(next_page(1, 0), 1);
    }

    #[test]
    fn test_window_small_total() {
        let c = page_controls(1, 3);
        assert_eq!(numbers(&c), vec!["[1]", "2", "3"]);
        assert_eq!(c.first(), Some(&PageControl::Previous { enabled: false }));
        assert_eq!(c.last(), Some(&PageControl::Next { enabled: true }));
    }

    #[test]
    fn test_window_at_start() {
        assert_eq!(
            numbers(&page_controls(1, 10)),
            vec!["[1]", "2", "3", "4", "5", "...", "10"]
        );
    }

    #[test]
    fn test_window_in_middle() {
        assert_eq!(
            numbers(&page_controls(6, 12)),
            vec!["1", "...", "4", "5", "[6]", "7", "8", "...", "12"]
        );
    }

    #[test]
    fn test_window_slides_at_end() {
        let c = page_controls(10, 10);
        assert_eq!(numbers(&c), vec!["1", "...", "6", "7", "8", "9", "[10]"]);
        assert_eq!(c.last(), Some(&PageControl::Next { enabled: false }));
    }

    #[test]
    fn test_window_touching_edge_has_no_ellipsis() {
        // start == 2: first page shown without a gap marker
        assert_eq!(
            numbers(&page_controls(4, 10)),
            vec!["1", "2", "3", "[4]", "5", "6", "...", "10"]
        );
        // end == total - 1: last page shown without a gap marker
        assert_eq!(
            numbers(&page_controls(7, 10)),
            vec!["1", "...", "5", "6", "[7]", "8", "9", "10"]
        );
    }

    #[test]
    fn test_no_pages() {
        let c = page_controls(1, 0);
        assert_eq!(
            c,
            vec![
                PageControl::Previous { enabled: false },
                PageControl::Next { enabled: false }
            ]
        );
    }

    #[test]
    fn test_huge_page_number_saturates() {
        assert_eq!(visible_range(25, usize::MAX, 12), None);
        assert!(page_slice(&[1, 2, 3], usize::MAX, 12).is_empty());

        let c = page_controls(usize::MAX, 3);
        assert_eq!(numbers(&c), vec!["1", "2", "3"]);
        assert_eq!(c.first(), Some(&PageControl::Previous { enabled: true }));
        assert_eq!(c.last(), Some(&PageControl::Next { enabled: false }));
    }
}
