//! Sortable table header cell
//!
//! ```rust,ignore
//! let state = use_filter_state(EmergencyFilter::default(), FilterStateOptions::default());
//! <SortableHeaderCell label="Start date" field="disaster_start_date" sort_state=state.sort_state() />
//! ```

use contracts::shared::list::Ordering;
use leptos::prelude::*;
use thaw::*;

use crate::shared::filter_state::SortState;
use crate::shared::list_utils::{get_sort_class, get_sort_indicator};

/// Header cell that switches the list ordering on click.
///
/// The active column flips direction, any other column starts ascending.
#[component]
pub fn SortableHeaderCell(
    #[prop(into)] label: String,

    /// Ordering name sent to the API
    #[prop(into)]
    field: String,

    sort_state: SortState,

    #[prop(optional, default = 100.0)] min_width: f64,

    /// `left` or `right`
    #[prop(optional, default = "left")]
    align: &'static str,
) -> impl IntoView {
    let SortState {
        sorting,
        set_sorting,
    } = sort_state;

    let field_for_click = field.clone();
    let field_for_class = field.clone();
    let field_for_indicator = field;

    let handle_click = move |_| {
        let next = sorting.with(|current| Ordering::next_for(current.as_ref(), &field_for_click));
        set_sorting.run(Some(next));
    };

    let header_style = if align == "right" {
        "cursor: pointer; justify-content: flex-end; padding-right: 12px;"
    } else {
        "cursor: pointer; padding-right: 12px;"
    };

    view! {
        <TableHeaderCell resizable=true min_width=min_width>
            <div class="table__sortable-header" style=header_style on:click=handle_click>
                {label}
                <span class=move || sorting.with(|s| get_sort_class(s.as_ref(), &field_for_class))>
                    {move || sorting.with(|s| get_sort_indicator(s.as_ref(), &field_for_indicator))}
                </span>
            </div>
        </TableHeaderCell>
    }
}
