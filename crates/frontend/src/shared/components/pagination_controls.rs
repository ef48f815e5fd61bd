use contracts::shared::list::total_pages;
use leptos::prelude::*;

use crate::shared::icons::icon;

/// Last page index (1-based) for `count` rows; at least 1 so an empty list
/// still shows "1 / 1"
pub fn last_page(count: usize, page_size: usize) -> usize {
    total_pages(count, page_size).max(1)
}

/// First / previous / next / last buttons for a 1-based page index
#[component]
pub fn PaginationControls(
    /// Current page, starting at 1
    #[prop(into)]
    page: Signal<usize>,

    /// Rows matching the current filter
    #[prop(into)]
    count: Signal<usize>,

    page_size: usize,

    on_page_change: Callback<usize>,
) -> impl IntoView {
    let last = move || last_page(count.get(), page_size);

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(1)
                disabled=move || page.get() <= 1
                title="First page"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let current = page.get();
                    if current > 1 {
                        on_page_change.run(current - 1);
                    }
                }
                disabled=move || page.get() <= 1
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {} ({})", page.get(), last(), count.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| {
                    let current = page.get();
                    if current < last() {
                        on_page_change.run(current + 1);
                    }
                }
                disabled=move || page.get() >= last()
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| on_page_change.run(last())
                disabled=move || page.get() >= last()
                title="Last page"
            >
                {icon("chevrons-right")}
            </button>
        </div>
    }
}
