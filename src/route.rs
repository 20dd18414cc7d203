//! Client-side Routing
//!
//! Paths map to a [`Route`] value; the [`Navigator`] keeps the current route
//! in a signal and mirrors it to `history` (push on navigate, read back on
//! `popstate`).

use leptos::prelude::*;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Customers,
    CustomerNew,
    CustomerEdit(u64),
    Quotes,
    QuoteNew,
    QuoteEdit(u64),
    Jobs,
    JobDetail(u64),
    Employees,
    EmployeeNew,
    EmployeeEdit(u64),
    Login,
    ForgotPassword,
    NotFound(String),
}

impl Route {
    /// Parse a location path; query string and fragment are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["dashboard"] => Route::Dashboard,
            ["customers"] => Route::Customers,
            ["customers", "new"] => Route::CustomerNew,
            ["customers", id, "edit"] => id_route(id, Route::CustomerEdit, path),
            ["quotes"] => Route::Quotes,
            ["quotes", "new"] => Route::QuoteNew,
            ["quotes", id, "edit"] => id_route(id, Route::QuoteEdit, path),
            ["jobs"] => Route::Jobs,
            ["jobs", id] => id_route(id, Route::JobDetail, path),
            ["employees"] => Route::Employees,
            ["employees", "new"] => Route::EmployeeNew,
            ["employees", id, "edit"] => id_route(id, Route::EmployeeEdit, path),
            ["auth", "login"] => Route::Login,
            ["auth", "forgot-password"] => Route::ForgotPassword,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/dashboard".to_string(),
            Route::Customers => "/customers".to_string(),
            Route::CustomerNew => "/customers/new".to_string(),
            Route::CustomerEdit(id) => format!("/customers/{}/edit", id),
            Route::Quotes => "/quotes".to_string(),
            Route::QuoteNew => "/quotes/new".to_string(),
            Route::QuoteEdit(id) => format!("/quotes/{}/edit", id),
            Route::Jobs => "/jobs".to_string(),
            Route::JobDetail(id) => format!("/jobs/{}", id),
            Route::Employees => "/employees".to_string(),
            Route::EmployeeNew => "/employees/new".to_string(),
            Route::EmployeeEdit(id) => format!("/employees/{}/edit", id),
            Route::Login => "/auth/login".to_string(),
            Route::ForgotPassword => "/auth/forgot-password".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login | Route::ForgotPassword)
    }

    /// Top-level nav section this route belongs to
    pub fn section(&self) -> Option<Route> {
        match self {
            Route::Dashboard => Some(Route::Dashboard),
            Route::Customers | Route::CustomerNew | Route::CustomerEdit(_) => Some(Route::Customers),
            Route::Quotes | Route::QuoteNew | Route::QuoteEdit(_) => Some(Route::Quotes),
            Route::Jobs | Route::JobDetail(_) => Some(Route::Jobs),
            Route::Employees | Route::EmployeeNew | Route::EmployeeEdit(_) => Some(Route::Employees),
            _ => None,
        }
    }
}

fn id_route(raw: &str, make: fn(u64) -> Route, path: &str) -> Route {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => make(id),
        _ => Route::NotFound(path.to_string()),
    }
}

/// Current route plus history integration
#[derive(Clone, Copy)]
pub struct Navigator {
    current: RwSignal<Route>,
}

impl Navigator {
    /// Start from the browser location and follow back/forward.
    pub fn install() -> Self {
        let initial = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .map(|p| Route::parse(&p))
            .unwrap_or(Route::Dashboard);
        let current = RwSignal::new(initial);

        let handle = window_event_listener(leptos::ev::popstate, move |_| {
            if let Some(path) = web_sys::window().and_then(|w| w.location().pathname().ok()) {
                tracing::debug!("[ROUTE] popstate {}", path);
                current.set(Route::parse(&path));
            }
        });
        on_cleanup(move || handle.remove());

        Self { current }
    }

    pub fn current(&self) -> Route {
        self.current.get()
    }

    pub fn route(&self) -> ReadSignal<Route> {
        self.current.read_only()
    }

    pub fn navigate(&self, route: Route) {
        self.write_history(&route, false);
        self.current.set(route);
    }

    /// Navigate without leaving a history entry (redirects).
    pub fn replace(&self, route: Route) {
        self.write_history(&route, true);
        self.current.set(route);
    }

    fn write_history(&self, route: &Route, replace: bool) {
        let path = route.path();
        let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
            return;
        };
        let result = if replace {
            history.replace_state_with_url(&JsValue::NULL, "", Some(&path))
        } else {
            history.push_state_with_url(&JsValue::NULL, "", Some(&path))
        };
        if result.is_err() {
            tracing::warn!("[ROUTE] could not update history for {}", path);
        }
    }
}

pub fn use_navigator() -> Navigator {
    expect_context::<Navigator>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/customers/new"), Route::CustomerNew);
        assert_eq!(Route::parse("/customers/15/edit"), Route::CustomerEdit(15));
        assert_eq!(Route::parse("/jobs/7?tab=tasks"), Route::JobDetail(7));
        assert_eq!(Route::parse("/employees/3/edit/"), Route::EmployeeEdit(3));
        assert_eq!(Route::parse("/auth/forgot-password"), Route::ForgotPassword);
    }

    #[test]
    fn test_bad_ids_are_not_found() {
        assert_eq!(Route::parse("/jobs/abc"), Route::NotFound("/jobs/abc".into()));
        assert_eq!(Route::parse("/quotes/0/edit"), Route::NotFound("/quotes/0/edit".into()));
    }

    #[test]
    fn test_path_parses_back() {
        let routes = [
            Route::Dashboard,
            Route::Customers,
            Route::CustomerEdit(2),
            Route::QuoteNew,
            Route::QuoteEdit(9),
            Route::Jobs,
            Route::JobDetail(4),
            Route::EmployeeNew,
            Route::Login,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn test_sections() {
        assert_eq!(Route::JobDetail(1).section(), Some(Route::Jobs));
        assert_eq!(Route::Login.section(), None);
        assert!(Route::Login.is_public());
        assert!(!Route::Customers.is_public());
    }
}
