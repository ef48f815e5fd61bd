/// Shared helpers for list views: sort markers and the search box
use contracts::shared::list::{Ordering, SortDirection};
use leptos::prelude::*;

/// Sort marker shown next to a column header
pub fn get_sort_indicator(sorting: Option<&Ordering>, field: &str) -> &'static str {
    match sorting {
        Some(o) if o.name == field => match o.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Dsc => " ▼",
        },
        _ => " ⇅",
    }
}

/// CSS class of the sort marker
pub fn get_sort_class(sorting: Option<&Ordering>, field: &str) -> &'static str {
    match sorting {
        Some(o) if o.name == field => "sort-icon active",
        _ => "sort-icon",
    }
}

/// Text input with a clear button.
///
/// Echoes `value` as typed; debouncing is left to the list's filter state.
#[component]
pub fn SearchInput(
    /// Value to echo, usually the raw filter field
    #[prop(into)]
    value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    let is_active = move || !value.get().trim().is_empty();

    view! {
        <div style="position: relative; display: inline-flex; align-items: center;">
            <input
                type="text"
                placeholder=placeholder
                style=move || format!(
                    "width: 250px; padding: 6px 32px 6px 10px; border: 1px solid #ddd; border-radius: 4px; font-size: 15px; background: {};",
                    if is_active() { "#fffbea" } else { "white" }
                )
                prop:value=move || value.get()
                on:input=move |ev| on_change.run(event_target_value(&ev))
            />
            <Show when=is_active>
                <button
                    style="position: absolute; right: 6px; background: none; border: none; cursor: pointer; padding: 4px; display: inline-flex; align-items: center; color: #666; line-height: 1;"
                    on:click=move |_| on_change.run(String::new())
                    title="Clear"
                >
                    {crate::shared::icons::icon("x")}
                </button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_indicator() {
        let asc = Ordering::asc("name");
        let dsc = Ordering::dsc("name");
        assert_eq!(get_sort_indicator(Some(&asc), "name"), " ▲");
        assert_eq!(get_sort_indicator(Some(&dsc), "name"), " ▼");
        assert_eq!(get_sort_indicator(Some(&asc), "glide"), " ⇅");
        assert_eq!(get_sort_indicator(None, "name"), " ⇅");
    }

    #[test]
    fn test_sort_class() {
        let asc = Ordering::asc("name");
        assert_eq!(get_sort_class(Some(&asc), "name"), "sort-icon active");
        assert_eq!(get_sort_class(None, "name"), "sort-icon");
    }
}
