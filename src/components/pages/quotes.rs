//! Quotes List Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::SortDirection;

use crate::components::form_field::format_money;
use crate::components::{
    DeleteConfirmButton, NavLink, PageError, PaginationBar, SearchInput, SortHeader, StatusBadge, TableStatusRow,
};
use crate::context::use_app_context;
use crate::controllers::use_resource_list;
use crate::models::{Quote, QuoteStatus};
use crate::route::Route;

#[component]
pub fn QuotesPage() -> impl IntoView {
    let debounce_ms = use_app_context().config().search_debounce_ms;
    let quotes = use_resource_list::<Quote>(("created_at", SortDirection::Desc));

    let items = quotes.items();
    let sort = quotes.sort();
    let status_filter = quotes.filter("status");
    let on_sort = Callback::new(move |field: &'static str| quotes.toggle_sort(field));

    let remove = move |id: u64| {
        spawn_local(async move {
            let _ = quotes.remove(id).await;
        });
    };

    view! {
        <section class="list-page">
            <header class="page-header">
                <h1>"Quotes"</h1>
                <NavLink route=Route::QuoteNew class="btn btn-primary">"New quote"</NavLink>
            </header>

            <div class="list-toolbar">
                <SearchInput
                    value=quotes.search_term()
                    on_search=move |term: String| quotes.handle_search(&term)
                    placeholder="Search number, title or customer…"
                    delay_ms=debounce_ms
                />
                <select
                    prop:value=move || status_filter.get()
                    on:change=move |ev| quotes.handle_filter("status", &event_target_value(&ev))
                >
                    <option value="">"All statuses"</option>
                    {QuoteStatus::ALL
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                        .collect_view()}
                </select>
            </div>

            <PageError error=quotes.error() on_dismiss=move |_| quotes.clear_error() />

            <table class="data-table">
                <thead>
                    <tr>
                        <SortHeader label="Number" field="quote_number" sort=sort on_sort=on_sort />
                        <SortHeader label="Title" field="title" sort=sort on_sort=on_sort />
                        <th>"Customer"</th>
                        <SortHeader label="Status" field="status" sort=sort on_sort=on_sort />
                        <SortHeader label="Valid until" field="valid_until" sort=sort on_sort=on_sort />
                        <SortHeader label="Total" field="total" sort=sort on_sort=on_sort />
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <TableStatusRow
                        colspan=7
                        loading=quotes.loading()
                        empty=Signal::derive(move || items.with(Vec::is_empty))
                        empty_text="No quotes yet"
                    />
                    <For
                        each=move || items.get()
                        key=|q| (q.id, q.status, q.title.clone(), q.total.to_bits(), q.job_id)
                        children=move |quote| {
                            let id = quote.id;
                            view! {
                                <tr>
                                    <td>{quote.quote_number.clone()}</td>
                                    <td><NavLink route=Route::QuoteEdit(id)>{quote.title.clone()}</NavLink></td>
                                    <td>{quote.client_name.clone()}</td>
                                    <td><StatusBadge status=quote.status.as_str() label=quote.status.label() /></td>
                                    <td>{quote.valid_until.map(|d| d.to_string()).unwrap_or_default()}</td>
                                    <td class="numeric">{format_money(quote.total)}</td>
                                    <td class="row-actions">
                                        {quote.job_id.map(|job_id| view! {
                                            <NavLink route=Route::JobDetail(job_id) class="btn btn-small">"View job"</NavLink>
                                        })}
                                        <NavLink route=Route::QuoteEdit(id) class="btn btn-small">"Open"</NavLink>
                                        <DeleteConfirmButton
                                            button_class="btn btn-small danger"
                                            what="quote"
                                            disabled=quote.job_id.is_some()
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
                pagination=quotes.pagination()
                on_page=move |page: u32| quotes.handle_page_change(page)
                on_per_page=move |n: u32| quotes.handle_per_page_change(n)
            />
        </section>
    }
}
