//! Windowed page controls.
//!
//! Shows the first page, the last page and up to two pages either side of
//! the current one, with an ellipsis where the run of numbers breaks.

use crate::models::Pagination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    /// Link to the given (previous) page
    Prev(u32),
    Page { number: u32, active: bool },
    Ellipsis,
    /// Link to the given (next) page
    Next(u32),
}

/// Controls for `pagination`; empty when there is at most one page.
#[must_use]
pub fn build_pagination(pagination: &Pagination) -> Vec<PageControl> {
    let last = pagination.last_page;
    if last <= 1 {
        return Vec::new();
    }
    let current = pagination.current_page.clamp(1, last);

    // Only these pages can produce a control; avoids walking huge page counts.
    let mut candidates: Vec<u32> = (current.saturating_sub(3)..=current.saturating_add(3))
        .filter(|i| (1..=last).contains(i))
        .chain([1, last])
        .collect();
    candidates.sort_unstable();
    candidates.dedup();

    let mut controls = Vec::with_capacity(candidates.len() + 2);
    if current > 1 {
        controls.push(PageControl::Prev(current - 1));
    }
    for i in candidates {
        let in_window = i >= current.saturating_sub(2) && i <= current.saturating_add(2);
        if i == 1 || i == last || in_window {
            controls.push(PageControl::Page {
                number: i,
                active: i == current,
            });
        } else if current.checked_sub(3) == Some(i) || current.checked_add(3) == Some(i) {
            controls.push(PageControl::Ellipsis);
        }
    }
    if current < last {
        controls.push(PageControl::Next(current + 1));
    }
    controls
}

/// `<div class="pagination">` with one `data-page` button per control.
///
/// Returns an empty string when there is nothing to page through.
#[must_use]
pub fn render_pagination(pagination: &Pagination) -> String {
    let controls = build_pagination(pagination);
    if controls.is_empty() {
        return String::new();
    }

    let buttons: String = controls
        .into_iter()
        .map(|control| match control {
            PageControl::Prev(page) => {
                format!(r#"<button class="page-btn" data-page="{page}">&laquo; Prev</button>"#)
            }
            PageControl::Page { number, active } => format!(
                r#"<button class="page-btn{}" data-page="{number}">{number}</button>"#,
                if active { " active" } else { "" }
            ),
            PageControl::Ellipsis => r#"<span class="page-ellipsis">...</span>"#.to_owned(),
            PageControl::Next(page) => {
                format!(r#"<button class="page-btn" data-page="{page}">Next &raquo;</button>"#)
            }
        })
        .collect();
    format!(r#"<div class="pagination">{buttons}</div>"#)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use PageControl::{Ellipsis, Next, Prev};

    fn page(number: u32) -> PageControl {
        PageControl::Page {
            number,
            active: false,
        }
    }

    fn active(number: u32) -> PageControl {
        PageControl::Page {
            number,
            active: true,
        }
    }

    #[test]
    fn test_middle_page_window() {
        let controls = build_pagination(&Pagination::new(5, 10));
        assert_eq!(
            controls,
            [
                Prev(4),
                page(1),
                Ellipsis,
                page(3),
                page(4),
                active(5),
                page(6),
                page(7),
                Ellipsis,
                page(10),
                Next(6),
            ]
        );
    }

    #[test]
    fn test_single_page_is_empty() {
        assert!(build_pagination(&Pagination::new(1, 1)).is_empty());
        assert!(build_pagination(&Pagination::new(1, 0)).is_empty());
        assert_eq!(render_pagination(&Pagination::new(1, 1)), "");
    }

    #[test]
    fn test_edges() {
        assert_eq!(
            build_pagination(&Pagination::new(1, 3)),
            [active(1), page(2), page(3), Next(2)]
        );
        assert_eq!(
            build_pagination(&Pagination::new(10, 10)),
            [Prev(9), page(1), Ellipsis, page(8), page(9), active(10)]
        );
        // current - 3 == 1 is the first page, not an ellipsis
        assert_eq!(
            build_pagination(&Pagination::new(4, 4)),
            [Prev(3), page(1), page(2), page(3), active(4)]
        );
    }

    #[test]
    fn test_huge_page_count() {
        let controls = build_pagination(&Pagination::new(2_000_000, 4_000_000));
        assert_eq!(controls.len(), 11);
    }

    #[test]
    fn test_render_markup() {
        let html = render_pagination(&Pagination::new(2, 3));
        assert_eq!(
            html,
            concat!(
                r#"<div class="pagination">"#,
                r#"<button class="page-btn" data-page="1">&laquo; Prev</button>"#,
                r#"<button class="page-btn" data-page="1">1</button>"#,
                r#"<button class="page-btn active" data-page="2">2</button>"#,
                r#"<button class="page-btn" data-page="3">3</button>"#,
                r#"<button class="page-btn" data-page="3">Next &raquo;</button>"#,
                "</div>"
            )
        );
    }
}
