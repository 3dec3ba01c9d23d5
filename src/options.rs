use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Key-value configuration handed to an operation.
///
/// Values are stored as JSON values so that hosts can pass either native
/// types (`16`, `true`) or the raw strings coming from form controls
/// (`"16"`, `"true"`). The typed accessors accept both.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Options {
    data: Map<String, Value>,
}

impl Options {
    pub fn new() -> Self {
        Options { data: Map::new() }
    }

    pub fn from<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        let mut options = Options::new();
        options.extend(entries);
        options
    }

    /// Builder-style insert
    pub fn with<K: Into<String>, V: Serialize>(mut self, key: K, val: V) -> Self {
        self.insert(key, &val);
        self
    }

    /// Inserts a value, replacing any previous value for the key
    pub fn insert<T: Serialize + ?Sized, S: Into<String>>(&mut self, key: S, val: &T) {
        let value = serde_json::to_value(val).unwrap_or(Value::Null);
        self.data.insert(key.into(), value);
    }

    /// Extends the options replacing existing keys.
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Serialize,
    {
        for (key, value) in entries {
            self.insert(key, &value);
        }
    }

    /// Copies every entry of `other` whose key is not already present.
    pub fn append_from(&mut self, other: &Options) {
        for (key, value) in &other.data {
            if !self.data.contains_key(key) {
                self.data.insert(key.clone(), value.clone());
            }
        }
    }

    pub fn contains<S: AsRef<str>>(&self, key: S) -> bool {
        self.data.contains_key(key.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.data.get(key).filter(|v| !v.is_null())
    }

    /// Retrieves a string value (if available)
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_raw(key).and_then(Value::as_str)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        match self.get_raw(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => default.to_string(),
        }
    }

    /// Reads a boolean flag. Accepts JSON booleans and the strings
    /// `true`/`false`/`1`/`0`/`yes`/`no`.
    pub fn flag_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.get_raw(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Number(n)) => Ok(n.as_u64().map_or(false, |n| n != 0)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                _ => Err(Error::option(key, format!("expected a boolean, got \"{}\"", s))),
            },
            Some(other) => Err(Error::option(key, format!("expected a boolean, got {}", other))),
        }
    }

    /// Checks whether the flag is present and set
    pub fn is_active(&self, key: &str) -> bool {
        self.flag_or(key, false).unwrap_or(false)
    }

    pub fn u64_opt(&self, key: &str) -> Result<Option<u64>> {
        match self.get_raw(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| Error::option(key, format!("expected a positive integer, got {}", n))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map(Some)
                .map_err(|_| Error::option(key, format!("expected a positive integer, got \"{}\"", s))),
            Some(other) => Err(Error::option(
                key,
                format!("expected a positive integer, got {}", other),
            )),
        }
    }

    pub fn usize_or(&self, key: &str, default: usize) -> Result<usize> {
        Ok(self.u64_opt(key)?.map_or(default, |v| v as usize))
    }

    pub fn f64_opt(&self, key: &str) -> Result<Option<f64>> {
        match self.get_raw(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| Error::option(key, format!("expected a number, got \"{}\"", s))),
            Some(other) => Err(Error::option(key, format!("expected a number, got {}", other))),
        }
    }

    /// Reads a single character, e.g. a CSV delimiter. `\t` and `tab` name the tab character.
    pub fn char_or(&self, key: &str, default: char) -> Result<char> {
        match self.get(key) {
            None if self.get_raw(key).is_none() => Ok(default),
            None => Err(Error::option(key, "expected a single character")),
            Some("\\t") | Some("tab") => Ok('\t'),
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(Error::option(
                        key,
                        format!("expected a single character, got \"{}\"", s),
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors_accept_strings_and_natives() {
        let options = Options::new()
            .with("length", 16)
            .with("count", "5")
            .with("numbers", true)
            .with("symbols", "0")
            .with("delimiter", ";");

        assert_eq!(options.usize_or("length", 0).unwrap(), 16);
        assert_eq!(options.usize_or("count", 0).unwrap(), 5);
        assert_eq!(options.usize_or("missing", 7).unwrap(), 7);
        assert!(options.flag_or("numbers", false).unwrap());
        assert!(!options.flag_or("symbols", true).unwrap());
        assert_eq!(options.char_or("delimiter", ',').unwrap(), ';');
        assert_eq!(options.char_or("quote", '"').unwrap(), '"');
    }

    #[test]
    fn test_invalid_values_are_option_errors() {
        let options = Options::new()
            .with("length", "sixteen")
            .with("upper", "maybe")
            .with("delimiter", "::");

        assert!(matches!(
            options.usize_or("length", 16),
            Err(Error::InvalidOption { .. })
        ));
        assert!(options.flag_or("upper", true).is_err());
        assert!(options.char_or("delimiter", ',').is_err());
    }

    #[test]
    fn test_append_from_keeps_existing_keys() {
        let mut options = Options::from([("indent", 4)]);
        let defaults = Options::from([("indent", 2), ("sort", 0)]);
        options.append_from(&defaults);

        assert_eq!(options.usize_or("indent", 0).unwrap(), 4);
        assert!(options.contains("sort"));
    }

    #[test]
    fn test_float_values() {
        let options = Options::new().with("ratio", 3.5).with("text", "4").with("bad", "x");
        assert_eq!(options.f64_opt("ratio").unwrap(), Some(3.5));
        assert_eq!(options.f64_opt("text").unwrap(), Some(4.0));
        assert_eq!(options.f64_opt("missing").unwrap(), None);
        assert!(options.f64_opt("bad").is_err());
    }

    #[test]
    fn test_tab_delimiter_alias() {
        let options = Options::new().with("delimiter", "tab");
        assert_eq!(options.char_or("delimiter", ',').unwrap(), '\t');
    }
}
