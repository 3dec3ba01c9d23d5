use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// An operation-specific counter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    Count(usize),
    Ratio(f64),
    Flag(bool),
}

impl Metric {
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Metric::Count(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_ratio(&self) -> Option<f64> {
        match self {
            Metric::Ratio(r) => Some(*r),
            Metric::Count(n) => Some(*n as f64),
            Metric::Flag(_) => None,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Metric::Count(n) => *n == 0,
            Metric::Ratio(r) => *r == 0.0,
            Metric::Flag(b) => !b,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Count(n) => write!(f, "{}", n),
            Metric::Ratio(r) => write!(f, "{:.4}", r),
            Metric::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Display statistics derived on every invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
    pub bytes: usize,
    pub metrics: BTreeMap<String, Metric>,
}

impl Stats {
    /// Measures a piece of text.
    ///
    /// # Examples
    ///
    /// ```
    /// use devutils::stats::Stats;
    ///
    /// let stats = Stats::measure("héllo world\nbye");
    /// assert_eq!(stats.characters, 15);
    /// assert_eq!(stats.words, 3);
    /// assert_eq!(stats.lines, 2);
    /// assert_eq!(stats.bytes, 16);
    /// ```
    pub fn measure(text: &str) -> Self {
        Stats {
            characters: char_count(text),
            words: word_count(text),
            lines: line_count(text),
            bytes: text.len(),
            metrics: BTreeMap::new(),
        }
    }

    pub fn with_metric<K: Into<String>>(mut self, key: K, metric: Metric) -> Self {
        self.metrics.insert(key.into(), metric);
        self
    }

    pub fn metric(&self, key: &str) -> Option<&Metric> {
        self.metrics.get(key)
    }

    /// True when every counter, including operation metrics, is zero
    pub fn is_zeroed(&self) -> bool {
        self.characters == 0
            && self.words == 0
            && self.lines == 0
            && self.bytes == 0
            && self.metrics.values().all(Metric::is_zero)
    }
}

pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Words are the runs left after splitting the trimmed text on whitespace
pub fn word_count(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        0
    } else {
        WHITESPACE_RUN.split(trimmed).count()
    }
}

/// Number of lines as a text area shows them; the empty text has none
pub fn line_count(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        text.split('\n').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_zeroed() {
        assert!(Stats::measure("").is_zeroed());
        assert!(Stats::default().with_metric("tokens", Metric::Count(0)).is_zeroed());
        assert!(!Stats::default().with_metric("tokens", Metric::Count(1)).is_zeroed());
    }

    #[test]
    fn test_word_count_whitespace_runs() {
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count("  one \t two\n\nthree  "), 3);
    }

    #[test]
    fn test_line_count_trailing_newline() {
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\n"), 2);
        assert_eq!(line_count("a\nb\nc"), 3);
    }

    #[test]
    fn test_char_count_never_decreases_on_append() {
        let samples = ["", "a", "héllo", "🦀 crab", "line\nbreak"];
        for base in samples {
            for suffix in samples.iter().filter(|s| !s.is_empty()) {
                let appended = format!("{}{}", base, suffix);
                assert!(char_count(&appended) > char_count(base));
            }
        }
    }
}
