//! Resource Controller
//!
//! Binds a `ListState<R>` reducer to a Leptos signal and drives it through
//! the generic `ResourceService<R, _>`. One controller per mounted list or
//! form page; it lives in the reactive arena, so it is `Copy` and dies with
//! its owner.
//!
//! Fetch ordering uses the reducer's generation tickets: a newer fetch makes
//! every older one stale, and results that land after unmount find a
//! disposed signal and are dropped by `try_update`.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::{
    ApiError, Debouncer, ListState, Pagination, ReqwestTransport, ResourceService, RestResource, Sort, SortDirection,
    SEARCH_FILTER,
};

use crate::context::use_app_context;
use crate::controllers::Toasts;

type Service<R> = ResourceService<R, ReqwestTransport>;

pub struct ResourceController<R: RestResource + Send + Sync> {
    state: RwSignal<ListState<R>>,
    detail_loading: RwSignal<bool>,
    service: StoredValue<Service<R>, LocalStorage>,
    refresh_timer: StoredValue<Debouncer<()>>,
    toasts: Toasts,
    refresh_delay_ms: u32,
}

impl<R: RestResource + Send + Sync> Clone for ResourceController<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R: RestResource + Send + Sync> Copy for ResourceController<R> {}

/// Controller for `R` wired to the app's API client and toasts.
pub fn use_resource<R: RestResource + Send + Sync>() -> ResourceController<R> {
    let ctx = use_app_context();
    let config = ctx.config();
    let controller = ResourceController::new(
        ctx.service::<R>(),
        ListState::new(config.per_page),
        ctx.toasts,
        config.refresh_delay_ms,
    );
    on_cleanup(move || controller.cancel_pending());
    controller
}

/// Like [`use_resource`], plus the list auto-fetches whenever its query
/// (page, page size, filters, sort) changes.
pub fn use_resource_list<R: RestResource + Send + Sync>(default_sort: (&str, SortDirection)) -> ResourceController<R> {
    let controller = use_resource::<R>();
    controller
        .state
        .update_untracked(|s| s.set_sort(default_sort.0, default_sort.1));
    controller.auto_fetch();
    controller
}

impl<R: RestResource + Send + Sync> ResourceController<R> {
    pub fn new(service: Service<R>, initial: ListState<R>, toasts: Toasts, refresh_delay_ms: u32) -> Self {
        Self {
            state: RwSignal::new(initial),
            detail_loading: RwSignal::new(false),
            service: StoredValue::new_local(service),
            refresh_timer: StoredValue::new(Debouncer::new()),
            toasts,
            refresh_delay_ms,
        }
    }

    // ========================
    // Reads
    // ========================

    pub fn state(&self) -> RwSignal<ListState<R>> {
        self.state
    }

    pub fn items(&self) -> Signal<Vec<R>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.items.clone()))
    }

    pub fn current(&self) -> Signal<Option<R>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.current_item.clone()))
    }

    pub fn pagination(&self) -> Signal<Pagination> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.pagination.clone()))
    }

    pub fn sort(&self) -> Signal<Sort> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.sort.clone()))
    }

    pub fn loading(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.loading()))
    }

    pub fn detail_loading(&self) -> ReadSignal<bool> {
        self.detail_loading.read_only()
    }

    pub fn error(&self) -> Signal<Option<String>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.error.clone()))
    }

    pub fn filter(&self, key: &'static str) -> Signal<String> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.filters.get(key).cloned().unwrap_or_default()))
    }

    pub fn search_term(&self) -> Signal<String> {
        self.filter(SEARCH_FILTER)
    }

    // ========================
    // List handlers
    // ========================

    pub fn handle_search(&self, term: &str) {
        self.handle_filter(SEARCH_FILTER, term);
    }

    /// Any change to a filter returns the list to page 1.
    pub fn handle_filter(&self, key: &str, value: &str) {
        self.state.update(|s| s.set_filter(key, value));
    }

    pub fn clear_filters(&self) {
        self.state.update(|s| s.clear_filters());
    }

    pub fn handle_page_change(&self, page: u32) {
        self.state.update(|s| s.set_page(page));
    }

    pub fn handle_sort(&self, field: &str, direction: SortDirection) {
        self.state.update(|s| s.set_sort(field, direction));
    }

    pub fn toggle_sort(&self, field: &str) {
        self.state.update(|s| s.toggle_sort(field));
    }

    pub fn handle_per_page_change(&self, per_page: u32) {
        self.state.update(|s| s.set_per_page(per_page));
    }

    pub fn clear_error(&self) {
        self.state.update(|s| s.clear_error());
    }

    // ========================
    // Fetching
    // ========================

    fn auto_fetch(&self) {
        let state = self.state;
        let query = Memo::new(move |_| state.with(|s| s.query()));
        let controller = *self;
        Effect::new(move |_| {
            query.track();
            controller.refresh();
        });
    }

    /// Fetch the current query now. Supersedes any fetch in flight.
    pub fn refresh(&self) {
        let Some(ticket) = self.state.try_update(|s| s.begin_fetch()) else {
            return;
        };
        let Some(service) = self.service.try_get_value() else {
            return;
        };
        let state = self.state;
        spawn_local(async move {
            let result = service.get_all(&ticket.query).await;
            if let Err(e) = &result {
                tracing::warn!("[{}] list fetch failed: {}", R::PATH, e);
            }
            state.try_update(|s| s.resolve_fetch(&ticket, result));
        });
    }

    /// One refetch after the configured delay; repeated calls inside the
    /// window collapse into the last one.
    pub fn schedule_refresh(&self) {
        let Some(ticket) = self.refresh_timer.try_update_value(|d| d.push(())) else {
            return;
        };
        let controller = *self;
        spawn_local(async move {
            TimeoutFuture::new(controller.refresh_delay_ms).await;
            if controller.refresh_timer.try_update_value(|d| d.take(ticket)).flatten().is_some() {
                controller.refresh();
            }
        });
    }

    pub fn cancel_pending(&self) {
        self.state.try_update(|s| s.cancel_pending());
        self.refresh_timer.try_update_value(|d| d.cancel());
    }

    /// Load one record into `current_item`.
    pub async fn load_one(&self, id: u64) -> Result<R, ApiError> {
        let service = self.service_handle()?;
        self.detail_loading.try_set(true);
        let result = service.get_by_id(id).await;
        self.detail_loading.try_set(false);
        match &result {
            Ok(record) => {
                let record = record.clone();
                self.state.try_update(|s| {
                    s.set_current(Some(record));
                    s.clear_error();
                });
            }
            Err(e) => {
                tracing::warn!("[{}] load {} failed: {}", R::PATH, id, e);
                self.state.try_update(|s| s.set_error(e.message.clone()));
            }
        }
        result
    }

    /// Patch `current_item` in place (sub-resource edits on a detail page).
    pub fn patch_current(&self, f: impl FnOnce(&mut R)) {
        self.state.try_update(|s| {
            if let Some(current) = s.current_item.as_mut() {
                f(current);
            }
        });
    }

    // ========================
    // Mutations
    // ========================

    pub async fn create(&self, record: R) -> Result<R, ApiError> {
        let service = self.service_handle()?;
        let result = service.create(&record).await;
        self.settle(&result, "created");
        if let Ok(created) = &result {
            self.state.try_update(|s| s.set_current(Some(created.clone())));
        }
        result
    }

    pub async fn update(&self, id: u64, record: R) -> Result<R, ApiError> {
        let service = self.service_handle()?;
        let result = service.update(id, &record).await;
        self.settle(&result, "updated");
        if let Ok(updated) = &result {
            let updated = updated.clone();
            self.state.try_update(|s| s.replace_item(updated));
        }
        result
    }

    pub async fn remove(&self, id: u64) -> Result<(), ApiError> {
        let service = self.service_handle()?;
        let result = service.delete(id).await;
        self.settle(&result, "deleted");
        if result.is_ok() {
            self.state.try_update(|s| s.remove_item(id));
        }
        result
    }

    fn service_handle(&self) -> Result<Service<R>, ApiError> {
        self.service
            .try_get_value()
            .ok_or_else(|| ApiError::new(rest_resource::ErrorCode::NetworkError, "Request cancelled"))
    }

    /// Toast the outcome, store the error, and queue the follow-up refetch.
    fn settle<T>(&self, result: &Result<T, ApiError>, verb: &str) {
        match result {
            Ok(_) => {
                self.toasts.success(format!("{} {}", R::LABEL, verb));
                self.state.try_update(|s| s.clear_error());
                self.schedule_refresh();
            }
            Err(e) => {
                tracing::warn!("[{}] {} failed: {}", R::PATH, verb, e);
                self.toasts.error(e.message.clone());
                self.state.try_update(|s| s.set_error(e.message.clone()));
            }
        }
    }
}
