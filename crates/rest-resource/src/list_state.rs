//! List State
//!
//! Normalized state for one paginated resource list, updated only through
//! reducer methods. Every fetch is tagged with a generation number; a
//! response is applied only if its ticket is still the latest one issued,
//! so a slow superseded request can never overwrite newer results.

use crate::envelope::{Page, Pagination};
use crate::error::ApiError;
use crate::query::{Filters, ListQuery, Sort, SortDirection};

/// Lifecycle of the latest list fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected,
}

/// Monotonic request-generation counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }

    /// Make every outstanding generation stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// Handle for one issued fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub query: ListQuery,
}

pub const SEARCH_FILTER: &str = "search";

#[derive(Debug, Clone, PartialEq)]
pub struct ListState<R> {
    pub items: Vec<R>,
    pub current_item: Option<R>,
    pub pagination: Pagination,
    pub filters: Filters,
    pub sort: Sort,
    pub status: RequestStatus,
    pub error: Option<String>,
    generation: RequestGeneration,
}

impl<R> Default for ListState<R> {
    fn default() -> Self {
        Self::new(Pagination::default().per_page)
    }
}

impl<R> ListState<R> {
    pub fn new(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            current_item: None,
            pagination: Pagination {
                per_page: per_page.max(1),
                ..Pagination::default()
            },
            filters: Filters::new(),
            sort: Sort::default(),
            status: RequestStatus::Idle,
            error: None,
            generation: RequestGeneration::default(),
        }
    }

    pub fn with_sort(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort = Sort {
            field: field.to_string(),
            direction,
        };
        self
    }

    pub fn loading(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// The query the current state asks for
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.pagination.current_page,
            per_page: self.pagination.per_page,
            filters: self.filters.clone(),
            sort: self.sort.clone(),
        }
    }

    pub fn search_term(&self) -> &str {
        self.filters.get(SEARCH_FILTER).map(String::as_str).unwrap_or("")
    }

    /// pending: issue a ticket for the current query
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.status = RequestStatus::Pending;
        FetchTicket {
            generation: self.generation.issue(),
            query: self.query(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.generation.is_current(ticket.generation)
    }

    /// fulfilled | rejected. Returns false when the ticket was stale and
    /// the result was dropped.
    pub fn resolve_fetch(&mut self, ticket: &FetchTicket, result: Result<Page<R>, ApiError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("dropping stale list response (generation {})", ticket.generation);
            return false;
        }
        match result {
            Ok(page) => {
                let per_page = ticket.query.per_page.max(1);
                let mut items = page.items;
                if items.len() > per_page as usize {
                    tracing::warn!(
                        "server returned {} rows for per_page={}, truncating",
                        items.len(),
                        per_page
                    );
                    items.truncate(per_page as usize);
                }
                self.items = items;
                self.pagination = Pagination {
                    current_page: ticket.query.page.max(1),
                    per_page,
                    total: page.pagination.total,
                    total_pages: page.pagination.total_pages,
                };
                self.status = RequestStatus::Fulfilled;
                self.error = None;
            }
            Err(err) => {
                self.status = RequestStatus::Rejected;
                self.error = Some(err.message);
            }
        }
        true
    }

    /// Forget in-flight fetches (owner unmounted or list reset).
    pub fn cancel_pending(&mut self) {
        self.generation.invalidate();
        if self.status == RequestStatus::Pending {
            self.status = RequestStatus::Idle;
        }
    }

    /// Set or clear one filter. Any filter change returns to page 1.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        let value = value.trim();
        let changed = if value.is_empty() {
            self.filters.remove(key).is_some()
        } else {
            self.filters.insert(key.to_string(), value.to_string()).as_deref() != Some(value)
        };
        if changed {
            self.pagination.current_page = 1;
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.pagination.current_page = 1;
        }
    }

    pub fn set_page(&mut self, page: u32) {
        self.pagination.current_page = page.max(1);
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.pagination.per_page = per_page.max(1);
        self.pagination.current_page = 1;
    }

    pub fn set_sort(&mut self, field: &str, direction: SortDirection) {
        self.sort = Sort {
            field: field.to_string(),
            direction,
        };
    }

    /// Sorting by the active column flips direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        let direction = if self.sort.field == field {
            self.sort.direction.toggled()
        } else {
            SortDirection::Asc
        };
        self.set_sort(field, direction);
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_current(&mut self, item: Option<R>) {
        self.current_item = item;
    }
}

impl<R: crate::RestResource> ListState<R> {
    /// Replace a row in place (same id), keeping order.
    pub fn replace_item(&mut self, item: R) {
        let id = item.id();
        if let Some(slot) = self.items.iter_mut().find(|i| i.id() == id) {
            *slot = item.clone();
        }
        if self.current_item.as_ref().map(|c| c.id()) == Some(id) {
            self.current_item = Some(item);
        }
    }

    pub fn remove_item(&mut self, id: u64) {
        let before = self.items.len();
        self.items.retain(|i| i.id() != id);
        if self.items.len() < before {
            self.pagination.total = self.pagination.total.saturating_sub(1);
        }
        if self.current_item.as_ref().map(|c| c.id()) == Some(id) {
            self.current_item = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(u64);

    impl crate::RestResource for Row {
        type Api = u64;
        type Payload = u64;
        const PATH: &'static str = "rows";
        const LABEL: &'static str = "Row";

        fn id(&self) -> u64 {
            self.0
        }
        fn from_api(api: u64) -> Self {
            Row(api)
        }
        fn to_payload(&self) -> u64 {
            self.0
        }
    }

    fn page(ids: std::ops::Range<u64>, total: u64, total_pages: u32) -> Page<Row> {
        Page {
            items: ids.map(Row).collect(),
            pagination: Pagination { current_page: 1, per_page: 10, total, total_pages },
        }
    }

    #[test]
    fn test_fetch_lifecycle() {
        let mut state = ListState::<Row>::new(10);
        assert_eq!(state.status, RequestStatus::Idle);

        let ticket = state.begin_fetch();
        assert!(state.loading());

        assert!(state.resolve_fetch(&ticket, Ok(page(1..4, 3, 1))));
        assert!(!state.loading());
        assert_eq!(state.status, RequestStatus::Fulfilled);
        assert_eq!(state.items.len(), 3);
    }

    #[test]
    fn test_requested_page_is_reflected_and_rows_capped() {
        let mut state = ListState::<Row>::new(5);
        state.set_page(3);
        let ticket = state.begin_fetch();

        // server ignores per_page and sends 8 rows
        state.resolve_fetch(&ticket, Ok(page(0..8, 40, 8)));
        assert_eq!(state.pagination.current_page, 3);
        assert!(state.items.len() <= 5);
        assert_eq!(state.pagination.total_pages, 8);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = ListState::<Row>::new(10);
        let slow = state.begin_fetch();
        state.set_filter(SEARCH_FILTER, "acme");
        let fast = state.begin_fetch();

        assert!(state.resolve_fetch(&fast, Ok(page(1..2, 1, 1))));
        assert!(!state.resolve_fetch(&slow, Ok(page(1..9, 8, 1))));
        assert_eq!(state.items, vec![Row(1)]);
    }

    #[test]
    fn test_stale_error_does_not_clear_loading() {
        let mut state = ListState::<Row>::new(10);
        let first = state.begin_fetch();
        let _second = state.begin_fetch();

        state.resolve_fetch(&first, Err(ApiError::new(ErrorCode::Timeout, "slow")));
        assert!(state.loading());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_rejection_keeps_error_until_cleared() {
        let mut state = ListState::<Row>::new(10);
        let ticket = state.begin_fetch();
        state.resolve_fetch(&ticket, Err(ApiError::new(ErrorCode::Http(500), "boom")));
        assert_eq!(state.status, RequestStatus::Rejected);
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.set_page(2);
        assert_eq!(state.error.as_deref(), Some("boom"));
        state.clear_error();
        assert!(state.error.is_none());
    }

    #[test]
    fn test_cancel_pending_ignores_late_results() {
        let mut state = ListState::<Row>::new(10);
        let ticket = state.begin_fetch();
        state.cancel_pending();
        assert!(!state.loading());
        assert!(!state.resolve_fetch(&ticket, Ok(page(1..3, 2, 1))));
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut state = ListState::<Row>::new(10);
        state.set_page(4);
        state.set_filter(SEARCH_FILTER, "acme");
        assert_eq!(state.pagination.current_page, 1);
        assert_eq!(state.search_term(), "acme");

        state.set_page(2);
        state.set_filter(SEARCH_FILTER, " acme ");
        assert_eq!(state.pagination.current_page, 2, "unchanged value keeps page");

        state.set_filter(SEARCH_FILTER, "");
        assert_eq!(state.pagination.current_page, 1);
        assert!(state.filters.is_empty());
    }

    #[test]
    fn test_toggle_sort() {
        let mut state = ListState::<Row>::new(10);
        state.toggle_sort("name");
        assert_eq!(state.sort.direction, SortDirection::Asc);
        state.toggle_sort("name");
        assert_eq!(state.sort.direction, SortDirection::Desc);
        state.toggle_sort("email");
        assert_eq!(state.sort, Sort { field: "email".into(), direction: SortDirection::Asc });
    }

    #[test]
    fn test_replace_and_remove_item() {
        let mut state = ListState::<Row>::new(10);
        let ticket = state.begin_fetch();
        state.resolve_fetch(&ticket, Ok(page(1..4, 3, 1)));
        state.set_current(Some(Row(2)));

        state.remove_item(2);
        assert_eq!(state.items, vec![Row(1), Row(3)]);
        assert_eq!(state.pagination.total, 2);
        assert!(state.current_item.is_none());
    }
}
