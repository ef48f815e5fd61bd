//! Wire shapes shared by every paginated list endpoint.
//!
//! A list view sends `ListQuery<F>` as query parameters and gets back a
//! `ListResponse<T>`.

use serde::{Deserialize, Serialize};

// ============================================================================
// Ordering
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Dsc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Dsc,
            SortDirection::Dsc => SortDirection::Asc,
        }
    }
}

/// Sort column and direction of a list query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ordering {
    pub name: String,
    pub direction: SortDirection,
}

impl Ordering {
    pub fn new(name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            name: name.into(),
            direction,
        }
    }

    pub fn asc(name: impl Into<String>) -> Self {
        Self::new(name, SortDirection::Asc)
    }

    pub fn dsc(name: impl Into<String>) -> Self {
        Self::new(name, SortDirection::Dsc)
    }

    /// Query parameter form: `name` when ascending, `-name` when descending
    pub fn to_param(&self) -> String {
        match self.direction {
            SortDirection::Asc => self.name.clone(),
            SortDirection::Dsc => format!("-{}", self.name),
        }
    }

    /// Parses the query parameter form back. Empty names yield `None`.
    pub fn from_param(param: &str) -> Option<Self> {
        let param = param.trim();
        let (name, direction) = match param.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Dsc),
            None => (param, SortDirection::Asc),
        };
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, direction))
    }

    pub fn toggled(&self) -> Self {
        Self::new(self.name.clone(), self.direction.reversed())
    }

    /// Ordering after a click on the `name` column header.
    ///
    /// Clicking the active column flips its direction, any other column
    /// starts ascending.
    pub fn next_for(current: Option<&Ordering>, name: &str) -> Ordering {
        match current {
            Some(ordering) if ordering.name == name => ordering.toggled(),
            _ => Ordering::asc(name),
        }
    }
}

/// `ordering` query parameter, `None` when the list is unordered
pub fn ordering_param(ordering: Option<&Ordering>) -> Option<String> {
    ordering.map(Ordering::to_param)
}

// ============================================================================
// Query / response
// ============================================================================

/// Query parameters of a paginated list request.
///
/// Filter fields are flattened next to `ordering`, `offset` and `limit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery<F> {
    #[serde(flatten)]
    pub filter: F,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub count: usize,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

/// Number of pages needed to show `count` rows, `page_size` per page
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}
