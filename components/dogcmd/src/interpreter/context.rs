//! Run-wide decoration applied to every metric: the namespace prefix and the
//! tag set. Both are fixed once at startup and only read afterwards.

/// Separator appended to a non-empty namespace.
pub const NAMESPACE_SEPARATOR: char = '.';

/// Metric name prefix. Empty, or guaranteed to end with [`NAMESPACE_SEPARATOR`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace(String);

impl Namespace {
    /// Normalize a raw namespace, appending the separator when missing.
    pub fn new(raw: impl Into<String>) -> Self {
        let mut prefix = raw.into();
        if !prefix.is_empty() && !prefix.ends_with(NAMESPACE_SEPARATOR) {
            prefix.push(NAMESPACE_SEPARATOR);
        }
        Self(prefix)
    }

    /// Fully-qualified metric name for `name`.
    pub fn qualify(&self, name: &str) -> String {
        format!("{}{}", self.0, name)
    }

    /// The prefix as given to [`Namespace::qualify`].
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no prefix is applied.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Split a comma separated tag list, trimming whitespace around each element.
///
/// Order and duplicates are preserved; an empty input yields no tags.
pub fn parse_tags(csv: &str) -> Vec<String> {
    if csv.is_empty() {
        return Vec::new();
    }
    csv.split(',').map(|tag| tag.trim().to_string()).collect()
}

/// Read-only state shared by every command of a run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub namespace: Namespace,
    pub tags: Vec<String>,
}

impl RunContext {
    pub fn new(namespace: Namespace, tags: Vec<String>) -> Self {
        Self { namespace, tags }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_gets_a_trailing_separator() {
        assert_eq!(Namespace::new("app").as_str(), "app.");
        assert_eq!(Namespace::new("app.").as_str(), "app.");
        assert_eq!(Namespace::new("a.b").as_str(), "a.b.");
        assert!(Namespace::new("").is_empty());
    }

    #[test]
    fn qualify_is_plain_concatenation() {
        assert_eq!(Namespace::new("app.").qualify("foo"), "app.foo");
        assert_eq!(Namespace::new("app").qualify("foo"), "app.foo");
        assert_eq!(Namespace::default().qualify("foo"), "foo");
        assert_eq!(Namespace::default().qualify(""), "");
    }

    #[test]
    fn tags_are_trimmed_in_order() {
        assert_eq!(parse_tags("a, b ,c"), vec!["a", "b", "c"]);
        assert_eq!(parse_tags("env:prod,env:prod"), vec!["env:prod", "env:prod"]);
        assert_eq!(parse_tags(" team:core "), vec!["team:core"]);
        assert!(parse_tags("").is_empty());
    }
}
