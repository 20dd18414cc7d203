//! Table building blocks: sortable headers, status badges, empty and
//! loading rows.

use leptos::prelude::*;
use rest_resource::{Sort, SortDirection};

/// Column header that toggles sorting on click
#[component]
pub fn SortHeader(
    label: &'static str,
    field: &'static str,
    #[prop(into)] sort: Signal<Sort>,
    #[prop(into)] on_sort: Callback<&'static str>,
) -> impl IntoView {
    let indicator = move || {
        let sort = sort.get();
        if sort.field != field {
            ""
        } else if sort.direction == SortDirection::Asc {
            " ▲"
        } else {
            " ▼"
        }
    };
    let aria_sort = move || {
        let sort = sort.get();
        match (sort.field == field, sort.direction) {
            (false, _) => "none",
            (true, SortDirection::Asc) => "ascending",
            (true, SortDirection::Desc) => "descending",
        }
    };

    view! {
        <th class="sortable" aria-sort=aria_sort on:click=move |_| on_sort.run(field)>
            {label}
            <span class="sort-indicator">{indicator}</span>
        </th>
    }
}

#[component]
pub fn StatusBadge(#[prop(into)] status: String, #[prop(into)] label: String) -> impl IntoView {
    view! { <span class=format!("status-badge status-{}", status)>{label}</span> }
}

/// Placeholder row while loading or when the list is empty
#[component]
pub fn TableStatusRow(
    colspan: u32,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] empty: Signal<bool>,
    #[prop(into)] empty_text: String,
) -> impl IntoView {
    view! {
        <Show when=move || loading.get() || empty.get()>
            <tr class="table-status-row">
                <td colspan=colspan>
                    {
                        let empty_text = empty_text.clone();
                        move || if loading.get() { "Loading…".to_string() } else { empty_text.clone() }
                    }
                </td>
            </tr>
        </Show>
    }
}

/// Dismissable banner for the last list or load failure
#[component]
pub fn PageError(#[prop(into)] error: Signal<Option<String>>, #[prop(into)] on_dismiss: Callback<()>) -> impl IntoView {
    move || {
        error.get().map(|message| {
            view! {
                <div class="page-error" role="alert">
                    <span>{message}</span>
                    <button type="button" class="btn btn-link" on:click=move |_| on_dismiss.run(())>
                        "Dismiss"
                    </button>
                </div>
            }
        })
    }
}
