//! Jobs List Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::SortDirection;

use crate::components::{
    DeleteConfirmButton, NavLink, PageError, PaginationBar, SearchInput, SortHeader, StatusBadge, TableStatusRow,
};
use crate::context::use_app_context;
use crate::controllers::use_resource_list;
use crate::models::{Job, JobPriority, JobStatus};
use crate::route::Route;

#[component]
pub fn JobsPage() -> impl IntoView {
    let debounce_ms = use_app_context().config().search_debounce_ms;
    let jobs = use_resource_list::<Job>(("scheduled_date", SortDirection::Asc));

    let items = jobs.items();
    let sort = jobs.sort();
    let status_filter = jobs.filter("status");
    let priority_filter = jobs.filter("priority");
    let on_sort = Callback::new(move |field: &'static str| jobs.toggle_sort(field));

    let remove = move |id: u64| {
        spawn_local(async move {
            let _ = jobs.remove(id).await;
        });
    };

    view! {
        <section class="list-page">
            <header class="page-header">
                <h1>"Jobs"</h1>
                <NavLink route=Route::Quotes class="btn btn-secondary">"Create from a quote"</NavLink>
            </header>

            <div class="list-toolbar">
                <SearchInput
                    value=jobs.search_term()
                    on_search=move |term: String| jobs.handle_search(&term)
                    placeholder="Search number, title or location…"
                    delay_ms=debounce_ms
                />
                <select
                    prop:value=move || status_filter.get()
                    on:change=move |ev| jobs.handle_filter("status", &event_target_value(&ev))
                >
                    <option value="">"All statuses"</option>
                    {JobStatus::ALL
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                        .collect_view()}
                </select>
                <select
                    prop:value=move || priority_filter.get()
                    on:change=move |ev| jobs.handle_filter("priority", &event_target_value(&ev))
                >
                    <option value="">"Any priority"</option>
                    {JobPriority::ALL
                        .into_iter()
                        .map(|p| view! { <option value=p.as_str()>{p.label()}</option> })
                        .collect_view()}
                </select>
                <button type="button" class="btn btn-link" on:click=move |_| jobs.clear_filters()>
                    "Clear filters"
                </button>
            </div>

            <PageError error=jobs.error() on_dismiss=move |_| jobs.clear_error() />

            <table class="data-table">
                <thead>
                    <tr>
                        <SortHeader label="Number" field="job_number" sort=sort on_sort=on_sort />
                        <SortHeader label="Title" field="title" sort=sort on_sort=on_sort />
                        <th>"Customer"</th>
                        <SortHeader label="Status" field="status" sort=sort on_sort=on_sort />
                        <SortHeader label="Priority" field="priority" sort=sort on_sort=on_sort />
                        <SortHeader label="Scheduled" field="scheduled_date" sort=sort on_sort=on_sort />
                        <th>"Progress"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <TableStatusRow
                        colspan=8
                        loading=jobs.loading()
                        empty=Signal::derive(move || items.with(Vec::is_empty))
                        empty_text="No jobs match these filters"
                    />
                    <For
                        each=move || items.get()
                        key=|j| (j.id, j.status, j.priority, j.title.clone(), j.scheduled_date, j.completed_tasks())
                        children=move |job| {
                            let id = job.id;
                            let title = job.title.clone();
                            view! {
                                <tr>
                                    <td>{job.job_number.clone()}</td>
                                    <td><NavLink route=Route::JobDetail(id)>{title}</NavLink></td>
                                    <td>{job.client_name.clone()}</td>
                                    <td><StatusBadge status=job.status.as_str() label=job.status.label() /></td>
                                    <td><span class=format!("priority priority-{}", job.priority.as_str())>{job.priority.label()}</span></td>
                                    <td>{job.scheduled_date.map(|d| d.to_string()).unwrap_or_default()}</td>
                                    <td>
                                        <progress max="100" value=job.progress()></progress>
                                    </td>
                                    <td class="row-actions">
                                        <NavLink route=Route::JobDetail(id) class="btn btn-small">"Open"</NavLink>
                                        <DeleteConfirmButton
                                            button_class="btn btn-small danger"
                                            what="job"
                                            on_confirm=move |_| remove(id)
                                        />
                                    </td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>

            <PaginationBar
                pagination=jobs.pagination()
                on_page=move |page: u32| jobs.handle_page_change(page)
                on_per_page=move |n: u32| jobs.handle_per_page_change(n)
            />
        </section>
    }
}
