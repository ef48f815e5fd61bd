pub mod api_utils;
pub mod components;
pub mod debounce;
pub mod filter_state;
pub mod form_errors;
pub mod icons;
pub mod list_utils;
