//! Dashboard Page

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::NavLink;
use crate::context::use_app_context;
use crate::models::DashboardStats;
use crate::route::Route;
use crate::services::dashboard::fetch_stats;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn DashboardPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let (stats, set_stats) = signal::<Option<DashboardStats>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    let api = ctx.api();
    spawn_local(async move {
        match fetch_stats(&api).await {
            Ok(loaded) => {
                set_stats.try_set(Some(loaded));
            }
            Err(e) => {
                tracing::warn!("[DASHBOARD] stats failed: {}", e);
                set_error.try_set(Some(e.message));
            }
        }
    });

    let greeting = move || {
        store
            .user()
            .get()
            .map(|u| format!("Welcome back, {}", u.name))
            .unwrap_or_else(|| "Welcome back".to_string())
    };

    let card = move |label: &'static str, route: Route, value: fn(&DashboardStats) -> u64| {
        view! {
            <NavLink route=route class="stat-card">
                <span class="stat-value">
                    {move || stats.with(|s| s.as_ref().map(value).map(|v| v.to_string()).unwrap_or_else(|| "–".to_string()))}
                </span>
                <span class="stat-label">{label}</span>
            </NavLink>
        }
    };

    view! {
        <section class="dashboard">
            <h1>{greeting}</h1>
            {move || error.get().map(|e| view! { <p class="page-error">{e}</p> })}
            <div class="stat-grid">
                {card("Customers", Route::Customers, |s| s.total_clients)}
                {card("Active jobs", Route::Jobs, |s| s.active_jobs)}
                {card("Due today", Route::Jobs, |s| s.jobs_due_today)}
                {card("Open quotes", Route::Quotes, |s| s.pending_quotes)}
                {card("Employees", Route::Employees, |s| s.total_employees)}
            </div>
        </section>
    }
}
