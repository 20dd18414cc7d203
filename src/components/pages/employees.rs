//! Employees List Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::SortDirection;

use crate::components::{
    DeleteConfirmButton, NavLink, PageError, PaginationBar, SearchInput, SortHeader, StatusBadge, TableStatusRow,
};
use crate::context::use_app_context;
use crate::controllers::use_resource_list;
use crate::models::{Employee, EmployeeRole};
use crate::route::Route;

#[component]
pub fn EmployeesPage() -> impl IntoView {
    let debounce_ms = use_app_context().config().search_debounce_ms;
    let employees = use_resource_list::<Employee>(("last_name", SortDirection::Asc));

    let items = employees.items();
    let sort = employees.sort();
    let role_filter = employees.filter("role");
    let active_filter = employees.filter("is_active");
    let on_sort = Callback::new(move |field: &'static str| employees.toggle_sort(field));

    let remove = move |id: u64| {
        spawn_local(async move {
            let _ = employees.remove(id).await;
        });
    };

    view! {
        <section class="list-page">
            <header class="page-header">
                <h1>"Employees"</h1>
                <NavLink route=Route::EmployeeNew class="btn btn-primary">"New employee"</NavLink>
            </header>

            <div class="list-toolbar">
                <SearchInput
                    value=employees.search_term()
                    on_search=move |term: String| employees.handle_search(&term)
                    placeholder="Search name or email…"
                    delay_ms=debounce_ms
                />
                <select
                    prop:value=move || role_filter.get()
                    on:change=move |ev| employees.handle_filter("role", &event_target_value(&ev))
                >
                    <option value="">"All roles"</option>
                    {EmployeeRole::ALL
                        .into_iter()
                        .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                        .collect_view()}
                </select>
                <select
                    prop:value=move || active_filter.get()
                    on:change=move |ev| employees.handle_filter("is_active", &event_target_value(&ev))
                >
                    <option value="">"Active and inactive"</option>
                    <option value="1">"Active"</option>
                    <option value="0">"Inactive"</option>
                </select>
            </div>

            <PageError error=employees.error() on_dismiss=move |_| employees.clear_error() />

            <table class="data-table">
                <thead>
                    <tr>
                        <SortHeader label="Name" field="last_name" sort=sort on_sort=on_sort />
                        <SortHeader label="Email" field="email" sort=sort on_sort=on_sort />
                        <SortHeader label="Role" field="role" sort=sort on_sort=on_sort />
                        <th>"Department"</th>
                        <th>"Manager"</th>
                        <th>"Status"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <TableStatusRow
                        colspan=7
                        loading=employees.loading()
                        empty=Signal::derive(move || items.with(Vec::is_empty))
                        empty_text="No employees found"
                    />
                    <For
                        each=move || items.get()
                        key=|e| (e.id, e.full_name(), e.email.clone(), e.role, e.is_active, e.manager_id)
                        children=move |employee| {
                            let id = employee.id;
                            let full_name = employee.full_name();
                            let (status, label) = if employee.is_active { ("active", "Active") } else { ("inactive", "Inactive") };
                            view! {
                                <tr>
                                    <td><NavLink route=Route::EmployeeEdit(id)>{full_name}</NavLink></td>
                                    <td>{employee.email.clone()}</td>
                                    <td>{employee.role.label()}</td>
                                    <td>{employee.department.clone()}</td>
                                    <td>{employee.manager_name.clone()}</td>
                                    <td><StatusBadge status=status label=label /></td>
                                    <td class="row-actions">
                                        <NavLink route=Route::EmployeeEdit(id) class="btn btn-small">"Edit"</NavLink>
                                        <DeleteConfirmButton
                                            button_class="btn btn-small danger"
                                            what="employee"
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
                pagination=employees.pagination()
                on_page=move |page: u32| employees.handle_page_change(page)
                on_per_page=move |n: u32| employees.handle_per_page_change(n)
            />
        </section>
    }
}
