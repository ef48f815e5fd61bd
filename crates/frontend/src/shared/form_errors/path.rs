use std::fmt;

use uuid::Uuid;

/// One step from the root of an error body to a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Dotted form for logs, e.g. `planned_interventions[2].title`
pub fn display_path(path: &[PathSegment]) -> String {
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                out.push_str(&format!("[{}]", index));
            }
        }
    }
    out
}

/// Key an array item's errors are stored under in the form error tree.
///
/// Mirrors what a key resolver may return for a row: a client-side
/// identifier or a plain number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    Name(String),
    Index(i64),
}

impl FieldKey {
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldKey::Name(name) if name.is_empty())
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Name(name) => write!(f, "{}", name),
            FieldKey::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::Name(name.to_string())
    }
}

impl From<String> for FieldKey {
    fn from(name: String) -> Self {
        FieldKey::Name(name)
    }
}

impl From<i64> for FieldKey {
    fn from(index: i64) -> Self {
        FieldKey::Index(index)
    }
}

impl From<Uuid> for FieldKey {
    fn from(id: Uuid) -> Self {
        FieldKey::Name(id.to_string())
    }
}

// ============================================================================
// Path patterns
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSegment {
    Key(String),
    Index(usize),
    /// Any array index; the index is captured
    Num,
}

pub const NUM: PatternSegment = PatternSegment::Num;

impl From<&str> for PatternSegment {
    fn from(key: &str) -> Self {
        PatternSegment::Key(key.to_string())
    }
}

impl From<usize> for PatternSegment {
    fn from(index: usize) -> Self {
        PatternSegment::Index(index)
    }
}

/// Matches a location against a pattern of the same length.
///
/// Returns the indices found at the [`NUM`] positions, in order, or `None`
/// when a literal segment differs or the lengths do not agree.
pub fn match_array(path: &[PathSegment], pattern: &[PatternSegment]) -> Option<Vec<usize>> {
    if path.len() != pattern.len() {
        return None;
    }
    let mut captured = Vec::new();
    for (segment, expected) in path.iter().zip(pattern) {
        match (expected, segment) {
            (PatternSegment::Num, PathSegment::Index(index)) => captured.push(*index),
            (PatternSegment::Key(expected), PathSegment::Key(key)) if expected == key => {}
            (PatternSegment::Index(expected), PathSegment::Index(index)) if expected == index => {}
            _ => return None,
        }
    }
    Some(captured)
}

type Resolve = Box<dyn Fn(&[usize]) -> Option<FieldKey>>;

/// Key resolver built from path patterns; the first matching rule wins and
/// unmatched locations resolve to `None`.
///
/// ```ignore
/// let rules = KeyRules::new().rule(
///     vec!["planned_interventions".into(), NUM],
///     move |idx| rows.get(idx[0]).map(|row| row.client_id.into()),
/// );
/// ```
#[derive(Default)]
pub struct KeyRules {
    rules: Vec<(Vec<PatternSegment>, Resolve)>,
}

impl KeyRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(
        mut self,
        pattern: Vec<PatternSegment>,
        resolve: impl Fn(&[usize]) -> Option<FieldKey> + 'static,
    ) -> Self {
        self.rules.push((pattern, Box::new(resolve)));
        self
    }

    pub fn resolve(&self, location: &[PathSegment]) -> Option<FieldKey> {
        self.rules
            .iter()
            .find_map(|(pattern, resolve)| {
                match_array(location, pattern).map(|captured| resolve(&captured))
            })
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(key: &str) -> PathSegment {
        PathSegment::Key(key.to_string())
    }

    fn i(index: usize) -> PathSegment {
        PathSegment::Index(index)
    }

    #[test]
    fn test_match_array_captures_indices() {
        assert_eq!(
            match_array(
                &[k("items"), i(2), k("name")],
                &["items".into(), NUM, "name".into()]
            ),
            Some(vec![2])
        );
        assert_eq!(
            match_array(
                &[k("a"), i(1), k("b"), i(4)],
                &["a".into(), NUM, "b".into(), NUM]
            ),
            Some(vec![1, 4])
        );
    }

    #[test]
    fn test_match_array_rejects() {
        // length mismatch
        assert_eq!(
            match_array(&[k("items"), i(2)], &["items".into(), NUM, "name".into()]),
            None
        );
        // literal mismatch
        assert_eq!(match_array(&[k("other"), i(2)], &["items".into(), NUM]), None);
        // the wildcard only takes indices
        assert_eq!(match_array(&[k("items"), k("x")], &["items".into(), NUM]), None);
        assert_eq!(
            match_array(&[k("items"), i(3)], &["items".into(), PatternSegment::Index(2)]),
            None
        );
    }

    #[test]
    fn test_match_array_without_wildcards() {
        assert_eq!(
            match_array(&[k("items"), i(2)], &["items".into(), PatternSegment::Index(2)]),
            Some(vec![])
        );
    }

    #[test]
    fn test_key_rules_first_match_wins() {
        let rules = KeyRules::new()
            .rule(vec!["items".into(), NUM], |idx| {
                (idx[0] > 0).then(|| FieldKey::from(format!("row-{}", idx[0])))
            })
            .rule(vec!["items".into(), NUM], |_| Some(FieldKey::Index(-1)))
            .rule(vec!["items".into(), NUM, "parts".into(), NUM], |idx| {
                Some(FieldKey::Index((idx[0] * 10 + idx[1]) as i64))
            });

        assert_eq!(
            rules.resolve(&[k("items"), i(2)]),
            Some(FieldKey::from("row-2"))
        );
        // the first rule matches but resolves to nothing; later rules are not tried
        assert_eq!(rules.resolve(&[k("items"), i(0)]), None);
        assert_eq!(
            rules.resolve(&[k("items"), i(1), k("parts"), i(3)]),
            Some(FieldKey::Index(13))
        );
        assert_eq!(rules.resolve(&[k("other"), i(0)]), None);
    }

    #[test]
    fn test_display_path() {
        assert_eq!(
            display_path(&[k("planned_interventions"), i(2), k("title")]),
            "planned_interventions[2].title"
        );
    }
}
