use contracts::shared::list::Ordering;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Current query state of a list view. `page` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState<F> {
    pub filter: F,
    pub ordering: Option<Ordering>,
    pub page: usize,
}

impl<F> FilterState<F> {
    /// Rows before the current page; saturates instead of overflowing
    pub fn offset(&self, page_size: usize) -> usize {
        page_size.saturating_mul(self.page.saturating_sub(1))
    }
}

/// Construction-time defaults of a list view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterStateOptions {
    pub ordering: Option<Ordering>,
    pub page: usize,
    pub page_size: usize,
    pub debounce_time_ms: u64,
}

impl Default for FilterStateOptions {
    fn default() -> Self {
        Self {
            ordering: Some(Ordering::dsc("id")),
            page: 1,
            page_size: 10,
            debounce_time_ms: 200,
        }
    }
}

impl FilterStateOptions {
    pub fn with_ordering(mut self, ordering: Option<Ordering>) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_debounce_time(mut self, ms: u64) -> Self {
        self.debounce_time_ms = ms;
        self
    }
}

/// New value, or a function of the previous one
pub enum Update<T> {
    Replace(T),
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Update::With(Box::new(f))
    }

    pub fn apply(self, prev: &T) -> T {
        match self {
            Update::Replace(value) => value,
            Update::With(f) => f(prev),
        }
    }
}

pub enum FilterAction<F> {
    ResetFilter,
    SetFilter(Update<F>),
    SetPage(usize),
    SetOrdering(Update<Option<Ordering>>),
}

impl<F> FilterAction<F> {
    pub fn kind(&self) -> &'static str {
        match self {
            FilterAction::ResetFilter => "reset-filter",
            FilterAction::SetFilter(_) => "set-filter",
            FilterAction::SetPage(_) => "set-page",
            FilterAction::SetOrdering(_) => "set-ordering",
        }
    }
}

/// Applies one action. Filter and ordering changes always go back to page 1.
pub fn reduce<F: Clone>(
    initial: &FilterState<F>,
    prev: &FilterState<F>,
    action: FilterAction<F>,
) -> FilterState<F> {
    match action {
        FilterAction::ResetFilter => initial.clone(),
        FilterAction::SetFilter(update) => FilterState {
            filter: update.apply(&prev.filter),
            ordering: prev.ordering.clone(),
            page: 1,
        },
        FilterAction::SetPage(page) => FilterState {
            page: page.max(1),
            ..prev.clone()
        },
        FilterAction::SetOrdering(update) => FilterState {
            filter: prev.filter.clone(),
            ordering: update.apply(&prev.ordering),
            page: 1,
        },
    }
}

fn has_defined_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map.values().any(has_defined_value),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Whether the filter narrows the list at all: at least one field is set to
/// something other than null, an empty string or an empty list.
pub fn is_filtered<F: Serialize>(filter: &F) -> bool {
    match serde_json::to_value(filter) {
        Ok(value) => has_defined_value(&value),
        Err(e) => {
            log::warn!("filter is not serializable: {}", e);
            false
        }
    }
}

#[derive(Debug, Error)]
pub enum MergeFieldError {
    #[error("filter does not serialize to an object")]
    NotAnObject,
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Shallow merge of a single field into a filter
pub fn merge_field<F, V>(filter: &F, key: &str, value: V) -> Result<F, MergeFieldError>
where
    F: Serialize + DeserializeOwned,
    V: Serialize,
{
    let mut current = serde_json::to_value(filter)?;
    let Value::Object(map) = &mut current else {
        return Err(MergeFieldError::NotAnObject);
    };
    map.insert(key.to_string(), serde_json::to_value(value)?);
    Ok(serde_json::from_value(current)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Filter {
        search: Option<String>,
        region: Option<i64>,
        #[serde(default)]
        tags: Vec<String>,
    }

    fn initial() -> FilterState<Filter> {
        FilterState {
            filter: Filter::default(),
            ordering: Some(Ordering::dsc("id")),
            page: 1,
        }
    }

    #[test]
    fn test_set_filter_resets_page() {
        let init = initial();
        let on_page_4 = reduce(&init, &init, FilterAction::SetPage(4));
        assert_eq!(on_page_4.page, 4);

        let next = reduce(
            &init,
            &on_page_4,
            FilterAction::SetFilter(Update::Replace(Filter {
                region: Some(2),
                ..Filter::default()
            })),
        );
        assert_eq!(next.page, 1);
        assert_eq!(next.filter.region, Some(2));
        assert_eq!(next.ordering, init.ordering);
    }

    #[test]
    fn test_set_ordering_resets_page() {
        let init = initial();
        let on_page_3 = reduce(&init, &init, FilterAction::SetPage(3));
        let next = reduce(
            &init,
            &on_page_3,
            FilterAction::SetOrdering(Update::with(|prev: &Option<Ordering>| {
                prev.as_ref().map(Ordering::toggled)
            })),
        );
        assert_eq!(next.page, 1);
        assert_eq!(next.ordering, Some(Ordering::asc("id")));
    }

    #[test]
    fn test_set_page_keeps_filter_and_clamps() {
        let init = initial();
        let filtered = reduce(
            &init,
            &init,
            FilterAction::SetFilter(Update::with(|prev: &Filter| Filter {
                search: Some("flood".to_string()),
                ..prev.clone()
            })),
        );
        let paged = reduce(&init, &filtered, FilterAction::SetPage(0));
        assert_eq!(paged.page, 1);
        assert_eq!(paged.filter.search.as_deref(), Some("flood"));
    }

    #[test]
    fn test_reset_returns_initial() {
        let init = initial();
        let mut state = reduce(&init, &init, FilterAction::SetPage(7));
        state = reduce(
            &init,
            &state,
            FilterAction::SetOrdering(Update::Replace(None)),
        );
        state = reduce(&init, &state, FilterAction::ResetFilter);
        assert_eq!(state, init);
    }

    #[test]
    fn test_offset_saturates() {
        let init = initial();
        assert_eq!(init.offset(20), 0);

        let paged = reduce(&init, &init, FilterAction::SetPage(4));
        assert_eq!(paged.offset(20), 60);

        let huge = reduce(&init, &init, FilterAction::SetPage(usize::MAX));
        assert_eq!(huge.offset(20), usize::MAX);
    }

    #[test]
    fn test_is_filtered() {
        assert!(!is_filtered(&Filter::default()));
        assert!(!is_filtered(&Filter {
            search: Some(String::new()),
            ..Filter::default()
        }));
        assert!(is_filtered(&Filter {
            region: Some(0),
            ..Filter::default()
        }));
        assert!(is_filtered(&Filter {
            tags: vec!["health".to_string()],
            ..Filter::default()
        }));
    }

    #[test]
    fn test_merge_field() {
        let filter = Filter {
            search: Some("flood".to_string()),
            ..Filter::default()
        };
        let merged = merge_field(&filter, "region", Some(3)).unwrap();
        assert_eq!(merged.region, Some(3));
        assert_eq!(merged.search.as_deref(), Some("flood"));

        let cleared = merge_field(&merged, "search", None::<String>).unwrap();
        assert_eq!(cleared.search, None);
    }

    #[test]
    fn test_merge_field_rejects_non_object() {
        let result = merge_field(&5_i64, "region", 3);
        assert!(matches!(result, Err(MergeFieldError::NotAnObject)));

        let result = merge_field(&Filter::default(), "region", "north");
        assert!(matches!(result, Err(MergeFieldError::Json(_))));
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: FilterStateOptions =
            serde_json::from_str(r#"{"page_size": 25, "ordering": null}"#).unwrap();
        assert_eq!(options.page_size, 25);
        assert_eq!(options.ordering, None);
        assert_eq!(options.page, 1);
        assert_eq!(options.debounce_time_ms, 200);

        let defaults = FilterStateOptions::default();
        assert_eq!(defaults.ordering, Some(Ordering::dsc("id")));
        assert_eq!(defaults.page_size, 10);
    }
}
