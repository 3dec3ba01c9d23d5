use unicode_segmentation::UnicodeSegmentation;

use crate::constants::defaults;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::transforms::{Transform, Transformed};

/// Splits text into words, also breaking `snake_case` and `camelCase`
/// boundaries (`parseHTTPResponse` gives parse, HTTP, Response).
fn split_words(text: &str) -> Vec<String> {
    let mut words = Vec::new();
    for word in text.unicode_words() {
        for part in word.split('_').filter(|p| !p.is_empty()) {
            let chars: Vec<char> = part.chars().collect();
            let mut current = String::new();
            for (i, &c) in chars.iter().enumerate() {
                if i > 0 && c.is_uppercase() {
                    let prev = chars[i - 1];
                    let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
                    let boundary = prev.is_lowercase()
                        || prev.is_numeric()
                        || (prev.is_uppercase() && next_lower);
                    if boundary && !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                current.push(c);
            }
            if !current.is_empty() {
                words.push(current);
            }
        }
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Capitalizes every word in place, leaving separators untouched
fn title_case(text: &str) -> String {
    text.split_word_bounds()
        .map(|segment| {
            if segment.chars().next().is_some_and(char::is_alphanumeric) {
                capitalize(segment)
            } else {
                segment.to_string()
            }
        })
        .collect()
}

/// Lowercases the text and capitalizes the first letter of every sentence
fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_start = true;
    for c in text.chars() {
        if at_start && c.is_alphanumeric() {
            out.extend(c.to_uppercase());
            at_start = false;
        } else {
            out.extend(c.to_lowercase());
            if matches!(c, '.' | '!' | '?') {
                at_start = true;
            }
        }
    }
    out
}

/// Converts text to an URL-friendly slug
///
/// # Examples
///
/// ```
/// use devutils::options::Options;
/// use devutils::transforms::{Slugify, Transform};
///
/// let slug = Slugify::new()
///     .transform("  Hello, World! Don't panic ", &Options::new())
///     .unwrap();
/// assert_eq!(slug.output, "hello-world-dont-panic");
/// ```
pub struct Slugify;

impl Slugify {
    pub fn new() -> Self {
        Self
    }

    pub fn slugify(text: &str, separator: &str) -> String {
        let mut slug = String::with_capacity(text.len());
        let mut pending = false;
        for c in text.chars().flat_map(char::to_lowercase) {
            if c.is_alphanumeric() {
                if pending && !slug.is_empty() {
                    slug.push_str(separator);
                }
                pending = false;
                slug.push(c);
            } else if !matches!(c, '\'' | '\u{2019}') {
                pending = true;
            }
        }
        slug
    }
}

impl Transform for Slugify {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let separator = options.string_or("separator", defaults::SLUG_SEPARATOR);
        if separator.chars().any(char::is_alphanumeric) {
            return Err(Error::option(
                "separator",
                "cannot contain letters or digits",
            ));
        }
        let slug = Self::slugify(text, &separator);
        let length = slug.chars().count();
        Ok(Transformed::new(slug).count("slug_length", length))
    }
}

/// Target casing of [`CaseConverter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Lower,
    Upper,
    Title,
    Sentence,
    Camel,
    Pascal,
    Snake,
    Kebab,
    Constant,
}

impl Case {
    const NAMES: [(&'static str, Case); 9] = [
        ("lower", Case::Lower),
        ("upper", Case::Upper),
        ("title", Case::Title),
        ("sentence", Case::Sentence),
        ("camel", Case::Camel),
        ("pascal", Case::Pascal),
        ("snake", Case::Snake),
        ("kebab", Case::Kebab),
        ("constant", Case::Constant),
    ];

    fn parse(name: &str) -> Result<Case> {
        Self::NAMES
            .iter()
            .find(|(id, _)| id.eq_ignore_ascii_case(name))
            .map(|(_, case)| *case)
            .ok_or_else(|| {
                Error::option(
                    "case",
                    format!(
                        "expected one of {}, got \"{}\"",
                        Self::NAMES.map(|(id, _)| id).join(", "),
                        name
                    ),
                )
            })
    }

    pub fn apply(&self, text: &str) -> String {
        match self {
            Case::Lower => text.to_lowercase(),
            Case::Upper => text.to_uppercase(),
            Case::Title => title_case(text),
            Case::Sentence => sentence_case(text),
            Case::Camel => split_words(text)
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            Case::Pascal => split_words(text).iter().map(|w| capitalize(w)).collect(),
            Case::Snake => join_words(text, "_", str::to_lowercase),
            Case::Kebab => join_words(text, "-", str::to_lowercase),
            Case::Constant => join_words(text, "_", str::to_uppercase),
        }
    }
}

fn join_words(text: &str, separator: &str, convert: fn(&str) -> String) -> String {
    split_words(text)
        .iter()
        .map(|w| convert(w))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Changes the casing of the input; option `case` picks the target
pub struct CaseConverter;

impl CaseConverter {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for CaseConverter {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let case = Case::parse(&options.string_or("case", "lower"))?;
        let words = split_words(text).len();
        Ok(Transformed::new(case.apply(text)).count("word_parts", words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(text: &str, case: &str) -> String {
        CaseConverter::new()
            .transform(text, &Options::new().with("case", case))
            .unwrap()
            .output
    }

    #[test]
    fn test_split_words() {
        assert_eq!(
            split_words("parseHTTPResponse now_or never-2x"),
            vec!["parse", "HTTP", "Response", "now", "or", "never", "2x"]
        );
    }

    #[test]
    fn test_identifier_cases() {
        let text = "hello big_World";
        assert_eq!(convert(text, "camel"), "helloBigWorld");
        assert_eq!(convert(text, "pascal"), "HelloBigWorld");
        assert_eq!(convert(text, "snake"), "hello_big_world");
        assert_eq!(convert(text, "kebab"), "hello-big-world");
        assert_eq!(convert(text, "constant"), "HELLO_BIG_WORLD");
    }

    #[test]
    fn test_prose_cases() {
        assert_eq!(convert("the QUICK fox, jumps.", "title"), "The Quick Fox, Jumps.");
        assert_eq!(
            convert("HELLO there. how ARE you? fine", "sentence"),
            "Hello there. How are you? Fine"
        );
        assert_eq!(convert("MiXeD", "lower"), "mixed");
        assert_eq!(convert("straße", "upper"), "STRASSE");
    }

    #[test]
    fn test_unknown_case() {
        let err = CaseConverter::new()
            .transform("x", &Options::new().with("case", "sponge"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption { .. }));
    }

    #[test]
    fn test_slug_separators() {
        assert_eq!(Slugify::slugify("--Rust & WebAssembly--", "-"), "rust-webassembly");
        assert_eq!(Slugify::slugify("Crème Brûlée 2024", "_"), "crème_brûlée_2024");
        assert_eq!(Slugify::slugify("!!!", "-"), "");
    }

    #[test]
    fn test_slug_rejects_alphanumeric_separator() {
        let options = Options::new().with("separator", "x");
        assert!(Slugify::new().transform("a b", &options).is_err());
    }
}
