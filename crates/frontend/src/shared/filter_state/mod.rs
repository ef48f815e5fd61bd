//! Filter, sort order and page of a list view, as one debounced state.
//!
//! `FilterStateController` is the plain state machine; `use_filter_state`
//! binds it to Leptos signals and a browser timer.

mod controller;
mod hook;
mod state;

pub use controller::{FilterEvent, FilterStateController, ListenerId};
pub use hook::{use_filter_state, use_filter_state_with, FilterStateHandle, SortState};
pub use state::{
    is_filtered, merge_field, reduce, FilterAction, FilterState, FilterStateOptions,
    MergeFieldError, Update,
};
