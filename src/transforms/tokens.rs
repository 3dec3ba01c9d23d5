use std::collections::HashMap;
use std::sync::Arc;
use strum_macros::Display;

use crate::constants::{defaults, TOKEN_RATES};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::stats::{char_count, word_count, Metric};
use crate::transforms::{Transform, Transformed};

/// An exact tokenizer for a model family, typically backed by an external
/// BPE implementation supplied by the host.
pub trait Tokenizer: Send + Sync {
    fn count_tokens(&self, text: &str) -> usize;
}

/// How a token count was obtained
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TokenMethod {
    #[strum(serialize = "heuristic")]
    Heuristic,
    #[strum(serialize = "exact")]
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ModelRate {
    chars_per_token: f64,
    input_per_1k: f64,
    output_per_1k: f64,
}

fn rate_for(model: &str) -> Result<ModelRate> {
    TOKEN_RATES
        .iter()
        .find(|(id, ..)| *id == model)
        .map(|(_, chars_per_token, input, output)| ModelRate {
            chars_per_token: *chars_per_token,
            input_per_1k: *input,
            output_per_1k: *output,
        })
        .ok_or_else(|| {
            Error::option(
                "model",
                format!(
                    "expected one of {}, got \"{}\"",
                    TOKEN_RATES
                        .iter()
                        .map(|(id, ..)| *id)
                        .collect::<Vec<_>>()
                        .join(", "),
                    model
                ),
            )
        })
}

/// Estimates tokens and API cost for a prompt.
///
/// Counts come from the tokenizer registered for the model when there is one,
/// otherwise from `ceil(characters / chars_per_token)`. The `exact` metric
/// tells the two apart. Characters are Unicode scalar values, so a character
/// outside the Basic Multilingual Plane counts once, not as two UTF-16 units.
#[derive(Default)]
pub struct TokenCounter {
    tokenizers: HashMap<String, Arc<dyn Tokenizer>>,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an exact tokenizer for a model id
    pub fn with_tokenizer<T: Tokenizer + 'static>(mut self, model: &str, tokenizer: T) -> Self {
        self.tokenizers.insert(model.to_string(), Arc::new(tokenizer));
        self
    }

    /// Returns the token count for the text and the method used
    pub fn count(&self, text: &str, model: &str) -> Result<(usize, TokenMethod)> {
        let rate = rate_for(model)?;
        Ok(self.count_with(text, model, rate))
    }

    fn count_with(&self, text: &str, model: &str, rate: ModelRate) -> (usize, TokenMethod) {
        match self.tokenizers.get(model) {
            Some(tokenizer) => (tokenizer.count_tokens(text), TokenMethod::Exact),
            None => (
                (char_count(text) as f64 / rate.chars_per_token).ceil() as usize,
                TokenMethod::Heuristic,
            ),
        }
    }
}

impl Transform for TokenCounter {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let model = options.string_or("model", defaults::TOKEN_MODEL);
        let context_limit = options.usize_or("context_limit", defaults::TOKEN_CONTEXT_LIMIT)?;
        if context_limit == 0 {
            return Err(Error::option("context_limit", "must be greater than 0"));
        }
        let mut rate = rate_for(&model)?;
        if let Some(chars_per_token) = options.f64_opt("chars_per_token")? {
            if chars_per_token <= 0.0 {
                return Err(Error::option("chars_per_token", "must be greater than 0"));
            }
            rate.chars_per_token = chars_per_token;
        }
        let (tokens, method) = self.count_with(text, &model, rate);

        let input_cost = tokens as f64 / 1000.0 * rate.input_per_1k;
        let output_cost = tokens as f64 / 1000.0 * rate.output_per_1k;
        let usage = tokens as f64 / context_limit as f64 * 100.0;

        let output = format!(
            "Tokens: {} ({})\nWords: {}\nInput cost: ${:.4}\nOutput cost: ${:.4}\nContext used: {:.1}% of {}",
            tokens,
            method,
            word_count(text),
            input_cost,
            output_cost,
            usage,
            context_limit
        );
        Ok(Transformed::new(output)
            .count("tokens", tokens)
            .metric("input_cost", Metric::Ratio(input_cost))
            .metric("output_cost", Metric::Ratio(output_cost))
            .metric("usage_percent", Metric::Ratio(usage))
            .metric("exact", Metric::Flag(method == TokenMethod::Exact)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WhitespaceTokenizer;

    impl Tokenizer for WhitespaceTokenizer {
        fn count_tokens(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    #[test]
    fn test_heuristic_rounds_up() {
        let counter = TokenCounter::new();
        assert_eq!(counter.count("abcde", "gpt-4").unwrap(), (2, TokenMethod::Heuristic));
        assert_eq!(counter.count("abcdefg", "claude-3").unwrap().0, 2);
        assert_eq!(counter.count("abcdefgh", "claude-3").unwrap().0, 3);
    }

    #[test]
    fn test_heuristic_counts_scalar_values() {
        let counter = TokenCounter::new();
        assert_eq!(counter.count("🦀🦀🦀🦀", "gpt-4").unwrap().0, 1);
        assert_eq!(counter.count("héllo", "gpt-4").unwrap().0, 2);
    }

    #[test]
    fn test_exact_tokenizer_takes_precedence() {
        let counter = TokenCounter::new().with_tokenizer("gpt-4", WhitespaceTokenizer);
        assert_eq!(
            counter.count("one two three", "gpt-4").unwrap(),
            (3, TokenMethod::Exact)
        );
        // other models keep the heuristic
        assert_eq!(
            counter.count("one two three", "gpt-3.5").unwrap().1,
            TokenMethod::Heuristic
        );
    }

    #[test]
    fn test_cost_and_usage_metrics() {
        let text = "x".repeat(4000);
        let out = TokenCounter::new().transform(&text, &Options::new()).unwrap();
        let get = |key: &str| {
            out.metrics
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, m)| *m)
                .unwrap()
        };
        assert_eq!(get("tokens"), Metric::Count(1000));
        assert!((get("input_cost").as_ratio().unwrap() - 0.03).abs() < 1e-9);
        assert!((get("output_cost").as_ratio().unwrap() - 0.06).abs() < 1e-9);
        assert!((get("usage_percent").as_ratio().unwrap() - 12.207_031_25).abs() < 1e-9);
        assert_eq!(get("exact"), Metric::Flag(false));
        assert!(out.output.contains("(heuristic)"));
    }

    #[test]
    fn test_chars_per_token_override() {
        let options = Options::new().with("chars_per_token", 2.0);
        let out = TokenCounter::new().transform("abcde", &options).unwrap();
        assert!(out.metrics.contains(&("tokens", Metric::Count(3))));
        let options = Options::new().with("chars_per_token", 0);
        assert!(TokenCounter::new().transform("abcde", &options).is_err());
    }

    #[test]
    fn test_unknown_model() {
        let err = TokenCounter::new()
            .transform("hi", &Options::new().with("model", "gpt-9"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption { .. }));
    }
}
