use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::constants::{defaults, LINKEDIN_LIMITS};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::stats::{char_count, line_count, word_count, Metric};
use crate::transforms::{Transform, Transformed};

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Renders `label: value` lines in the given order
fn report(rows: &[(&str, String)]) -> String {
    rows.iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n")
}

fn non_space_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

pub struct CharCounter;

impl CharCounter {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for CharCounter {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        let characters = char_count(text);
        let no_spaces = non_space_count(text);
        let graphemes = text.graphemes(true).count();
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        let digits = text.chars().filter(|c| c.is_numeric()).count();

        let output = report(&[
            ("Characters", characters.to_string()),
            ("Characters (no spaces)", no_spaces.to_string()),
            ("Graphemes", graphemes.to_string()),
            ("Letters", letters.to_string()),
            ("Digits", digits.to_string()),
        ]);
        Ok(Transformed::new(output)
            .count("characters_no_spaces", no_spaces)
            .count("graphemes", graphemes)
            .count("letters", letters)
            .count("digits", digits))
    }
}

pub struct WordCounter;

impl WordCounter {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for WordCounter {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        let words = word_count(text);
        let sentences = SENTENCE_END
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();
        let paragraphs = PARAGRAPH_BREAK
            .split(text)
            .filter(|p| !p.trim().is_empty())
            .count();
        let reading_minutes = words.div_ceil(defaults::WORDS_PER_MINUTE);

        let output = report(&[
            ("Words", words.to_string()),
            ("Characters", char_count(text).to_string()),
            ("Characters (no spaces)", non_space_count(text).to_string()),
            ("Sentences", sentences.to_string()),
            ("Paragraphs", paragraphs.to_string()),
            ("Reading time (min)", reading_minutes.to_string()),
        ]);
        Ok(Transformed::new(output)
            .count("characters_no_spaces", non_space_count(text))
            .count("sentences", sentences)
            .count("paragraphs", paragraphs)
            .count("reading_minutes", reading_minutes))
    }
}

pub struct LineCounter;

impl LineCounter {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for LineCounter {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        let lines = line_count(text);
        let blank = text.split('\n').filter(|l| l.trim().is_empty()).count();
        let longest = text.split('\n').map(char_count).max().unwrap_or(0);

        let output = report(&[
            ("Lines", lines.to_string()),
            ("Non-blank lines", (lines - blank).to_string()),
            ("Blank lines", blank.to_string()),
            ("Longest line", longest.to_string()),
        ]);
        Ok(Transformed::new(output)
            .count("blank_lines", blank)
            .count("non_blank_lines", lines - blank)
            .count("longest_line", longest))
    }
}

/// Counts a LinkedIn post against the limit of its content type.
/// The output is the feed preview of the text.
pub struct LinkedInCounter;

impl LinkedInCounter {
    pub fn new() -> Self {
        Self
    }

    /// Character limit of a content type (`post`, `comment`, `headline`, `about`)
    pub fn limit_for(content: &str) -> Option<usize> {
        LINKEDIN_LIMITS
            .iter()
            .find(|(id, _, _)| *id == content)
            .map(|(_, _, limit)| *limit)
    }

    fn preview(text: &str, content: &str) -> String {
        if content == "headline" || char_count(text) <= defaults::LINKEDIN_PREVIEW_CHARS {
            return text.to_string();
        }
        let cut: String = text.chars().take(defaults::LINKEDIN_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}

impl Transform for LinkedInCounter {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let content = options.string_or("content", defaults::LINKEDIN_CONTENT);
        let limit = Self::limit_for(&content).ok_or_else(|| {
            Error::option(
                "content",
                format!(
                    "expected one of {}, got \"{}\"",
                    LINKEDIN_LIMITS
                        .iter()
                        .map(|(id, _, _)| *id)
                        .collect::<Vec<_>>()
                        .join(", "),
                    content
                ),
            )
        })?;

        let characters = char_count(text);
        let percent = (characters as f64 / limit as f64 * 100.0).min(100.0);
        Ok(Transformed::new(Self::preview(text, &content))
            .count("limit", limit)
            .count("remaining", limit.saturating_sub(characters))
            .count("over_by", characters.saturating_sub(limit))
            .metric("percent_used", Metric::Ratio(percent))
            .metric("over_limit", Metric::Flag(characters > limit)))
    }
}

/// Occurrences of every character, most frequent first
pub struct CharFrequency;

impl CharFrequency {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for CharFrequency {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let ignore_case = options.flag_or("ignore_case", false)?;
        let include_whitespace = options.flag_or("include_whitespace", false)?;

        let mut counts: HashMap<char, usize> = HashMap::new();
        let mut total = 0;
        for c in text.chars() {
            if !include_whitespace && c.is_whitespace() {
                continue;
            }
            let key = if ignore_case {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                c
            };
            *counts.entry(key).or_insert(0) += 1;
            total += 1;
        }

        let mut ranked: Vec<(char, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let output = ranked
            .iter()
            .map(|(c, n)| {
                format!(
                    "{:?}: {} ({:.1}%)",
                    c,
                    n,
                    *n as f64 / total as f64 * 100.0
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        Ok(Transformed::new(output)
            .count("distinct", ranked.len())
            .count("counted", total))
    }
}
