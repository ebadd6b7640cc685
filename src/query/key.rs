//! Cache keys for query results

use std::fmt;

/// Ordered list of segments identifying a cached query
///
/// Keys form a hierarchy: invalidating `["reclamacoes"]` also invalidates
/// `["reclamacoes", "7"]` and `["reclamacoes", "usuario", "1"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// A key with a single segment
    pub fn root(segment: &str) -> Self {
        Self(vec![segment.to_string()])
    }

    /// Append a segment
    pub fn push<S: ToString>(mut self, segment: S) -> Self {
        self.0.push(segment.to_string());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` is this key or one of its ancestors
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl<S: ToString> FromIterator<S> for QueryKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| s.to_string()).collect())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}
