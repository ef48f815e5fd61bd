//! Server validation errors turned into the error tree forms render from.

mod path;
mod transform;

pub use path::{display_path, match_array, FieldKey, KeyRules, PathSegment, PatternSegment, NUM};
pub use transform::{
    transform_array_error, transform_object_error, transform_response_body, FormError,
    FormErrorMap,
};
