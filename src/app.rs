//! FieldOps App
//!
//! Builds the API client and session, provides app-wide context, and maps
//! the current route to a page. Routes other than the auth pages require a
//! session; losing it mid-use sends the user back to sign in.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use crate::components::pages::{
    CustomerFormPage, CustomersPage, DashboardPage, EmployeeFormPage, EmployeesPage, ForgotPasswordPage, JobDetailPage,
    JobsPage, LoginPage, NotFoundPage, QuoteFormPage, QuotesPage,
};
use crate::components::{AppErrorBoundary, Layout, ToastHost};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::controllers::Toasts;
use crate::route::{Navigator, Route};
use crate::services::{auth, build_api};
use crate::store::{store_sign_in, store_sign_out, AppState, AppStateStoreFields};

fn render_route(route: Route) -> AnyView {
    match route {
        Route::Dashboard => view! { <DashboardPage /> }.into_any(),
        Route::Customers => view! { <CustomersPage /> }.into_any(),
        Route::CustomerNew => view! { <CustomerFormPage /> }.into_any(),
        Route::CustomerEdit(id) => view! { <CustomerFormPage id=id /> }.into_any(),
        Route::Quotes => view! { <QuotesPage /> }.into_any(),
        Route::QuoteNew => view! { <QuoteFormPage /> }.into_any(),
        Route::QuoteEdit(id) => view! { <QuoteFormPage id=id /> }.into_any(),
        Route::Jobs => view! { <JobsPage /> }.into_any(),
        Route::JobDetail(id) => view! { <JobDetailPage id=id /> }.into_any(),
        Route::Employees => view! { <EmployeesPage /> }.into_any(),
        Route::EmployeeNew => view! { <EmployeeFormPage /> }.into_any(),
        Route::EmployeeEdit(id) => view! { <EmployeeFormPage id=id /> }.into_any(),
        Route::Login => view! { <LoginPage /> }.into_any(),
        Route::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        Route::NotFound(path) => view! { <NotFoundPage path=path /> }.into_any(),
    }
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let api = build_api(&config);
    let session = api.session().clone();
    let toasts = Toasts::new(config.toast_duration_ms);

    let restored_user = auth::current_user(&session);
    let needs_profile = session.is_authenticated() && restored_user.is_none();
    let store = Store::new(AppState::new(restored_user, session.is_authenticated()));
    provide_context(store);

    let ctx = AppContext::new(config, api, toasts);
    provide_context(ctx);

    let navigator = Navigator::install();
    provide_context(navigator);

    session.on_expired(move || {
        store_sign_out(&store);
        toasts.info("Your session has expired. Please sign in again.");
        navigator.replace(Route::Login);
    });

    // A token without a cached profile: ask the server who we are.
    if needs_profile {
        let api = ctx.api();
        spawn_local(async move {
            match auth::me(&api).await {
                Ok(user) => store_sign_in(&store, Some(user)),
                Err(e) => tracing::warn!("[APP] could not load profile: {}", e),
            }
        });
    }

    let route = navigator.route();

    Effect::new(move |_| {
        let signed_in = store.authenticated().get();
        let current = route.get();
        if !signed_in && !current.is_public() {
            tracing::debug!("[APP] {} needs a session", current.path());
            navigator.replace(Route::Login);
        } else if signed_in && current == Route::Login {
            navigator.replace(Route::Dashboard);
        }
    });

    let is_public = Memo::new(move |_| route.with(Route::is_public));
    let page = move || {
        let current = route.get();
        if !current.is_public() && !store.authenticated().get() {
            return ().into_any();
        }
        render_route(current)
    };

    view! {
        <AppErrorBoundary>
            <Show when=move || is_public.get() fallback=move || view! { <Layout>{page}</Layout> }>
                {page}
            </Show>
        </AppErrorBoundary>
        <ToastHost />
    }
}
