//! Customers List Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::SortDirection;

use crate::components::{
    DeleteConfirmButton, NavLink, PageError, PaginationBar, SearchInput, SortHeader, StatusBadge, TableStatusRow,
};
use crate::context::use_app_context;
use crate::controllers::use_resource_list;
use crate::models::{Client, ClientStatus};
use crate::route::Route;

#[component]
pub fn CustomersPage() -> impl IntoView {
    let debounce_ms = use_app_context().config().search_debounce_ms;
    let clients = use_resource_list::<Client>(("created_at", SortDirection::Desc));

    let items = clients.items();
    let loading = clients.loading();
    let sort = clients.sort();
    let status_filter = clients.filter("status");
    let on_sort = Callback::new(move |field: &'static str| clients.toggle_sort(field));

    let remove = move |id: u64| {
        spawn_local(async move {
            let _ = clients.remove(id).await;
        });
    };

    view! {
        <section class="list-page">
            <header class="page-header">
                <h1>"Customers"</h1>
                <NavLink route=Route::CustomerNew class="btn btn-primary">"New customer"</NavLink>
            </header>

            <div class="list-toolbar">
                <SearchInput
                    value=clients.search_term()
                    on_search=move |term: String| clients.handle_search(&term)
                    placeholder="Search name, email or phone…"
                    delay_ms=debounce_ms
                />
                <select
                    prop:value=move || status_filter.get()
                    on:change=move |ev| clients.handle_filter("status", &event_target_value(&ev))
                >
                    <option value="">"All statuses"</option>
                    {ClientStatus::ALL
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                        .collect_view()}
                </select>
                <button type="button" class="btn btn-link" on:click=move |_| clients.clear_filters()>
                    "Clear filters"
                </button>
            </div>

            <PageError error=clients.error() on_dismiss=move |_| clients.clear_error() />

            <table class="data-table">
                <thead>
                    <tr>
                        <SortHeader label="Name" field="name" sort=sort on_sort=on_sort />
                        <th>"Email"</th>
                        <th>"Phone"</th>
                        <SortHeader label="Status" field="status" sort=sort on_sort=on_sort />
                        <th>"Jobs"</th>
                        <SortHeader label="Added" field="created_at" sort=sort on_sort=on_sort />
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <TableStatusRow
                        colspan=7
                        loading=loading
                        empty=Signal::derive(move || items.with(Vec::is_empty))
                        empty_text="No customers match these filters"
                    />
                    <For
                        each=move || items.get()
                        key=|c| (c.id, c.status, c.name.clone(), c.company_name.clone(), c.email.clone())
                        children=move |client| {
                            let id = client.id;
                            let display_name = client.display_name().to_string();
                            view! {
                                <tr>
                                    <td>
                                        <NavLink route=Route::CustomerEdit(id)>{display_name}</NavLink>
                                        {(!client.company_name.is_empty() && client.company_name != client.name)
                                            .then(|| view! { <div class="cell-sub">{client.name.clone()}</div> })}
                                    </td>
                                    <td>{client.email.clone()}</td>
                                    <td>{client.phone.clone()}</td>
                                    <td><StatusBadge status=client.status.as_str() label=client.status.label() /></td>
                                    <td>{client.jobs_count}</td>
                                    <td>{client.created_at.clone().unwrap_or_default()}</td>
                                    <td class="row-actions">
                                        <NavLink route=Route::CustomerEdit(id) class="btn btn-small">"Edit"</NavLink>
                                        <DeleteConfirmButton
                                            button_class="btn btn-small danger"
                                            what="customer"
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
                pagination=clients.pagination()
                on_page=move |page: u32| clients.handle_page_change(page)
                on_per_page=move |n: u32| clients.handle_per_page_change(n)
            />
        </section>
    }
}
