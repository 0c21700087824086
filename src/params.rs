use crate::ordered::OrderedMap;

/// Outgoing request parameters, in the order they will be written to the URL.
///
/// Setting a key that already exists overwrites its value in place, so the
/// key keeps its original position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    entries: OrderedMap,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `key=value&key2=value2` line. Empty segments are skipped and a
    /// segment without `=` maps to an empty value.
    pub fn from_query_line(line: &str) -> Self {
        let mut params = Self::new();

        for segment in line.split('&').filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            params.set(key, value);
        }

        params
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.set(key.into(), value.into());
    }

    /// Builder-style [`ParameterSet::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterSet;

    #[test]
    fn overwrite_keeps_position() {
        let mut params = ParameterSet::new().with("a", "1").with("b", "2");
        params.set("a", "3");

        let pairs: Vec<_> = params.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }

    #[test]
    fn query_line_parsing() {
        let params = ParameterSet::from_query_line("trophy_id=23&&achieved=empty&flag");

        assert_eq!(params.len(), 3);
        assert_eq!(params.get("trophy_id"), Some("23"));
        assert_eq!(params.get("achieved"), Some("empty"));
        assert_eq!(params.get("flag"), Some(""));
        assert!(ParameterSet::from_query_line("").is_empty());
    }
}
