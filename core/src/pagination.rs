//! Pure pagination arithmetic for the results view.

use serde::Serialize;

pub const DEFAULT_WINDOW: u32 = 5;

/// What the pagination control should render for a page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    pub current_page: u32,
    pub total_pages: u32,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    /// Ascending page numbers to show. Always contains the first and last
    /// page plus a window centered on the current one.
    pub visible_pages: Vec<u32>,
}

impl PaginationState {
    pub fn derive(current_page: u32, total_pages: u32) -> Self {
        Self::derive_with_window(current_page, total_pages, DEFAULT_WINDOW)
    }

    pub fn derive_with_window(current_page: u32, total_pages: u32, window: u32) -> Self {
        let total = total_pages.max(1);
        let current = clamp_page(current_page, total);
        let width = window.clamp(1, total);

        // `start <= current <= total` and `width <= total`, so the
        // subtractions below cannot underflow and `end` never passes `total`.
        let mut start = current.saturating_sub(width / 2).max(1);
        let end = if total - start < width - 1 {
            start = total - (width - 1);
            total
        } else {
            start + (width - 1)
        };

        let mut visible_pages = Vec::with_capacity(width as usize + 2);
        if start > 1 {
            visible_pages.push(1);
        }
        visible_pages.extend(start..=end);
        if end < total {
            visible_pages.push(total);
        }

        Self {
            current_page: current,
            total_pages: total,
            can_go_prev: current > 1,
            can_go_next: current < total,
            visible_pages,
        }
    }

    /// True where the control should draw an ellipsis between two visible
    /// page numbers.
    pub fn gaps(&self) -> Vec<bool> {
        self.visible_pages
            .windows(2)
            .map(|pair| pair[1] > pair[0] + 1)
            .collect()
    }
}

/// Clamps a requested page into `[1, total_pages]`.
pub fn clamp_page(requested: u32, total_pages: u32) -> u32 {
    requested.clamp(1, total_pages.max(1))
}

/// Target page for a navigation click, or `None` when the click is a no-op
/// (out of range or already current).
pub fn transition(current_page: u32, target: u32, total_pages: u32) -> Option<u32> {
    if target < 1 || target > total_pages.max(1) || target == current_page {
        return None;
    }
    Some(target)
}
