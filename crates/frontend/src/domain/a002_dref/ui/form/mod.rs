//! DREF application form
//!
//! - view_model.rs: form state, row commands, submit and error mapping
//! - view.rs: Leptos components (pure UI)

mod view;
mod view_model;

pub use view::DrefForm;
pub use view_model::{dref_key_rules, DrefFormViewModel};
