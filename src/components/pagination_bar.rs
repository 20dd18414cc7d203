//! Pagination Bar Component
//!
//! "Showing 11–20 of 57", prev/next, numbered pages and a page-size select.

use leptos::prelude::*;
use rest_resource::Pagination;

const PAGE_SIZES: [u32; 4] = [10, 25, 50, 100];

/// Page numbers to show around `current`, with `None` for gaps.
pub fn page_window(current: u32, total_pages: u32) -> Vec<Option<u32>> {
    if total_pages <= 7 {
        return (1..=total_pages).map(Some).collect();
    }
    let current = current.clamp(1, total_pages);
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total_pages - 1);

    let mut pages = vec![Some(1)];
    if start > 2 {
        pages.push(None);
    }
    pages.extend((start..=end).map(Some));
    if end < total_pages - 1 {
        pages.push(None);
    }
    pages.push(Some(total_pages));
    pages
}

#[component]
pub fn PaginationBar(
    #[prop(into)] pagination: Signal<Pagination>,
    #[prop(into)] on_page: Callback<u32>,
    #[prop(into)] on_per_page: Callback<u32>,
) -> impl IntoView {
    let summary = move || {
        let p = pagination.get();
        match p.row_range() {
            Some((from, to)) => format!("Showing {}–{} of {}", from, to, p.total),
            None => "No results".to_string(),
        }
    };

    view! {
        <div class="pagination-bar">
            <span class="pagination-summary">{summary}</span>
            <div class="pagination-pages">
                <button
                    type="button"
                    class="page-btn"
                    disabled=move || !pagination.get().has_previous()
                    on:click=move |_| on_page.run(pagination.get_untracked().current_page.saturating_sub(1))
                >
                    "‹"
                </button>
                {move || {
                    let p = pagination.get();
                    page_window(p.current_page, p.total_pages)
                        .into_iter()
                        .map(|entry| match entry {
                            Some(page) => {
                                let class = if page == p.current_page { "page-btn active" } else { "page-btn" };
                                view! {
                                    <button type="button" class=class on:click=move |_| on_page.run(page)>
                                        {page}
                                    </button>
                                }
                                .into_any()
                            }
                            None => view! { <span class="page-gap">"…"</span> }.into_any(),
                        })
                        .collect_view()
                }}
                <button
                    type="button"
                    class="page-btn"
                    disabled=move || !pagination.get().has_next()
                    on:click=move |_| on_page.run(pagination.get_untracked().current_page + 1)
                >
                    "›"
                </button>
            </div>
            <select
                class="per-page-select"
                on:change=move |ev| {
                    if let Ok(n) = event_target_value(&ev).parse::<u32>() {
                        on_per_page.run(n);
                    }
                }
            >
                {PAGE_SIZES
                    .iter()
                    .map(|size| {
                        let size = *size;
                        view! {
                            <option value=size.to_string() selected=move || pagination.get().per_page == size>
                                {format!("{} / page", size)}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_lists_show_every_page() {
        assert_eq!(page_window(2, 3), vec![Some(1), Some(2), Some(3)]);
        assert!(page_window(1, 0).is_empty());
    }

    #[test]
    fn test_long_lists_collapse_with_gaps() {
        assert_eq!(page_window(5, 20), vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(20)]);
        assert_eq!(page_window(1, 20), vec![Some(1), Some(2), None, Some(20)]);
        assert_eq!(page_window(20, 20), vec![Some(1), None, Some(19), Some(20)]);
    }
}
