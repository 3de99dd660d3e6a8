//! Offset-backed Relay cursors for the `all*` connection queries.

use async_graphql::connection::{Connection, Edge};
use async_graphql::{OutputType, SimpleObject};

/// Upper bound on `first`/`last`, also used when neither is given.
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, SimpleObject)]
pub struct ConnectionTotals {
    /// Number of rows matching the filter, ignoring pagination.
    pub total_count: i64,
}

pub type CrmConnection<T> = Connection<usize, T, ConnectionTotals>;

/// Half-open `[start, end)` slice of the filtered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl PageWindow {
    pub fn resolve(
        total: usize,
        after: Option<usize>,
        before: Option<usize>,
        first: Option<usize>,
        last: Option<usize>,
    ) -> Self {
        let mut start = after.map(|a| a.saturating_add(1)).unwrap_or(0).min(total);
        let mut end = before.unwrap_or(total).min(total).max(start);

        match (first, last) {
            (None, None) => end = end.min(start + MAX_PAGE_SIZE),
            (first, last) => {
                if let Some(first) = first {
                    end = end.min(start + first.min(MAX_PAGE_SIZE));
                }
                if let Some(last) = last {
                    start = start.max(end.saturating_sub(last.min(MAX_PAGE_SIZE)));
                }
            }
        }

        Self { start, end, total }
    }

    pub fn offset(&self) -> u64 {
        self.start as u64
    }

    pub fn limit(&self) -> u64 {
        (self.end - self.start) as u64
    }

    pub fn into_connection<T: OutputType>(self, items: Vec<T>) -> CrmConnection<T> {
        let mut connection = Connection::with_additional_fields(
            self.start > 0,
            self.end < self.total,
            ConnectionTotals {
                total_count: self.total as i64,
            },
        );
        connection.edges.extend(
            items
                .into_iter()
                .enumerate()
                .map(|(i, node)| Edge::new(self.start + i, node)),
        );
        connection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_capped_at_max() {
        let window = PageWindow::resolve(250, None, None, None, None);
        assert_eq!((window.start, window.end), (0, MAX_PAGE_SIZE));
        assert_eq!(window.limit(), MAX_PAGE_SIZE as u64);
    }

    #[test]
    fn first_after_walks_forward() {
        let window = PageWindow::resolve(10, Some(2), None, Some(3), None);
        assert_eq!((window.start, window.end), (3, 6));
        assert_eq!(window.offset(), 3);
    }

    #[test]
    fn last_before_walks_backward() {
        let window = PageWindow::resolve(10, None, Some(8), None, Some(2));
        assert_eq!((window.start, window.end), (6, 8));
    }

    #[test]
    fn cursors_past_the_end_yield_empty_window() {
        let window = PageWindow::resolve(5, Some(9), None, Some(2), None);
        assert_eq!(window.limit(), 0);
        assert_eq!(window.start, 5);
    }

    #[test]
    fn oversized_first_is_clamped() {
        let window = PageWindow::resolve(500, None, None, Some(1000), None);
        assert_eq!(window.end, MAX_PAGE_SIZE);
    }

    #[test]
    fn connection_reports_page_flags() {
        let window = PageWindow::resolve(10, Some(2), None, Some(3), None);
        let connection = window.into_connection(vec![1, 2, 3]);
        assert!(connection.has_previous_page);
        assert!(connection.has_next_page);
        assert_eq!(connection.edges.len(), 3);
        assert_eq!(connection.edges[0].cursor, 3);
        assert_eq!(connection.additional_fields.total_count, 10);
    }
}
