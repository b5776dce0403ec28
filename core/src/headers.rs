//! Ordered, case-insensitive multi-value header map.
//!
//! Names keep the case they first arrived with and are iterated in arrival
//! order. A name may carry several values (e.g. `Set-Cookie`), so lookups
//! always return a slice, never a single string.

/// Header name → ordered values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(existing, _)| existing.eq_ignore_ascii_case(name))
    }

    /// Append a value, keeping any values already stored under `name`.
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        match self.position(name) {
            Some(i) => self.entries[i].1.push(value.into()),
            None => self.entries.push((name.to_string(), vec![value.into()])),
        }
    }

    /// Replace all values of `name`. An empty `values` removes the header.
    pub fn set(&mut self, name: &str, values: Vec<String>) {
        if values.is_empty() {
            self.remove(name);
            return;
        }
        match self.position(name) {
            Some(i) => self.entries[i].1 = values,
            None => self.entries.push((name.to_string(), values)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Mutable access to the most recently appended value of the last header,
    /// used to join folded continuation lines.
    pub(crate) fn last_value_mut(&mut self) -> Option<&mut String> {
        self.entries.last_mut().and_then(|(_, values)| values.last_mut())
    }

    /// Replace every header named in `other` with its values there.
    pub fn extend_replacing(&mut self, other: HeaderMap) {
        for (name, values) in other.entries {
            self.set(&name, values);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Render as `Name: value` lines, one per value, in order.
    pub fn to_lines(&self) -> Vec<String> {
        self.iter()
            .flat_map(|(name, values)| values.iter().map(move |v| format!("{name}: {v}")))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        for (name, value) in iter {
            map.append(name.as_ref(), value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut map = HeaderMap::new();
        map.append("Content-Type", "text/html");
        assert_eq!(map.get("content-type"), Some(&["text/html".to_string()][..]));
        assert!(map.contains("CONTENT-TYPE"));
    }

    #[test]
    fn first_seen_case_is_kept() {
        let mut map = HeaderMap::new();
        map.append("Set-Cookie", "a=1");
        map.append("set-cookie", "b=2");
        let names: Vec<&str> = map.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Set-Cookie"]);
        assert_eq!(map.get("Set-Cookie").unwrap(), ["a=1", "b=2"]);
    }

    #[test]
    fn set_replaces_and_empty_removes() {
        let mut map: HeaderMap = [("X-Foo", "Bar"), ("X-Foo", "Baz")].into_iter().collect();
        map.set("x-foo", vec!["Qux".to_string()]);
        assert_eq!(map.get("X-Foo").unwrap(), ["Qux"]);
        map.set("X-Foo", Vec::new());
        assert!(map.is_empty());
    }

    #[test]
    fn to_lines_repeats_multi_valued_names() {
        let map: HeaderMap = [("User-Agent", "Bget"), ("X-Foo", "Bar"), ("X-Foo", "Baz")]
            .into_iter()
            .collect();
        assert_eq!(
            map.to_lines(),
            vec!["User-Agent: Bget", "X-Foo: Bar", "X-Foo: Baz"]
        );
    }

    #[test]
    fn extend_replacing_overwrites_named_headers_only() {
        let mut map: HeaderMap = [("User-Agent", "curl"), ("Accept", "*/*")].into_iter().collect();
        let other: HeaderMap = [("user-agent", "Bget")].into_iter().collect();
        map.extend_replacing(other);
        assert_eq!(map.get("User-Agent").unwrap(), ["Bget"]);
        assert_eq!(map.get("Accept").unwrap(), ["*/*"]);
    }
}
