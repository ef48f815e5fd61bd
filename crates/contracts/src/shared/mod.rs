pub mod list;
pub mod response_error;
