use crate::shared::icons::icon;
use leptos::prelude::*;

/// Collapsible filter panel with pagination in its header.
///
/// The clear button is shown while the filter narrows the list.
#[component]
pub fn FilterPanel(
    #[prop(into)] is_expanded: RwSignal<bool>,

    /// Whether any filter field is set
    #[prop(into)]
    is_filtered: Signal<bool>,

    on_clear: Callback<()>,

    /// Rendered in the middle of the header, usually pagination controls
    #[prop(into)]
    header_center: ViewFn,

    /// Form fields of the filter
    children: Children,
) -> impl IntoView {
    let toggle_expanded = move |_| {
        is_expanded.update(|e| *e = !*e);
    };

    view! {
        <div class="filter-panel">
            <div class="filter-panel-header">
                <div class="filter-panel-header__left" on:click=toggle_expanded>
                    <span class=move || {
                        if is_expanded.get() {
                            "filter-panel__chevron filter-panel__chevron--expanded"
                        } else {
                            "filter-panel__chevron"
                        }
                    }>
                        {icon("chevron-right")}
                    </span>
                    {icon("filter")}
                    <span class="filter-panel__title">"Filters"</span>
                </div>
                <div class="filter-panel-header__center">
                    {header_center.run()}
                </div>
                <div class="filter-panel-header__right">
                    <Show when=move || is_filtered.get()>
                        <button
                            class="filter-panel__clear"
                            on:click=move |_| on_clear.run(())
                            title="Clear filters"
                        >
                            {icon("x")}
                            " Clear"
                        </button>
                    </Show>
                </div>
            </div>

            <div class=move || {
                if is_expanded.get() {
                    "filter-panel__collapsible filter-panel__collapsible--expanded"
                } else {
                    "filter-panel__collapsible filter-panel__collapsible--collapsed"
                }
            }>
                <div class="filter-panel-content">
                    {children()}
                </div>
            </div>
        </div>
    }
}
