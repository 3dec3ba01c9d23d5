use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::debug;
use crate::error::Error;
use crate::options::Options;
use crate::outcome::{ErrorKind, Failure, Outcome};
use crate::stats::Stats;
use crate::transforms::{TransformManager, TransformRegistry, Transformed};

/// Runs named operations over text and turns every result, error or panic
/// into an [`Outcome`].
///
/// # Examples
///
/// ```
/// use devutils::engine::Engine;
/// use devutils::options::Options;
///
/// let engine = Engine::new();
/// let outcome = engine.run("json-minify", "{ \"a\": [1, 2] }", &Options::new());
/// assert_eq!(outcome.output(), Some("{\"a\":[1,2]}"));
/// assert_eq!(outcome.stats().unwrap().characters, 15);
/// ```
#[derive(Clone)]
pub struct Engine {
    registry: Arc<TransformRegistry>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Engine over the shared default registry with default configuration
    pub fn new() -> Self {
        Engine {
            registry: TransformManager::get().share(),
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<TransformRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &TransformRegistry {
        &self.registry
    }

    /// Options a fresh tool for `operation` starts with
    pub fn defaults_for(&self, operation: &str) -> Options {
        self.config.defaults_for(operation)
    }

    /// Runs an operation. Caller options take precedence over the configured
    /// defaults of the operation.
    pub fn run(&self, operation: &str, input: &str, options: &Options) -> Outcome {
        let transform = match self.registry.get(operation) {
            Some(transform) => transform,
            None => {
                debug!("Unknown operation \"{}\"", operation);
                return Outcome::Failure(Error::UnknownOperation(operation.to_string()).into());
            }
        };

        let consumes_input = transform.consumes_input();
        if consumes_input && input.is_empty() {
            debug!("{}: empty input, nothing to do", operation);
            return Outcome::empty();
        }

        let mut merged = options.clone();
        merged.append_from(&self.config.defaults_for(operation));

        let result = panic::catch_unwind(AssertUnwindSafe(|| transform.transform(input, &merged)));
        let outcome = match result {
            Ok(Ok(transformed)) => {
                let stats = attach_metrics(Stats::measure(input), &transformed);
                Outcome::Success {
                    output: transformed.output,
                    stats,
                }
            }
            Ok(Err(e)) => Outcome::Failure(e.into()),
            Err(payload) => Outcome::Failure(Failure::new(
                ErrorKind::Unknown,
                format!("Operation \"{}\" failed: {}", operation, panic_message(&*payload)),
            )),
        };

        match &outcome {
            Outcome::Success { output, .. } => debug!(
                "{}: {} input bytes -> {} output bytes",
                operation,
                input.len(),
                output.len()
            ),
            Outcome::Failure(failure) => {
                debug!("{}: {} ({})", operation, failure.kind, failure.message)
            }
        }
        outcome
    }
}

fn attach_metrics(stats: Stats, transformed: &Transformed) -> Stats {
    transformed
        .metrics
        .iter()
        .fold(stats, |stats, (key, metric)| stats.with_metric(*key, *metric))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unexpected internal error".to_string()
    }
}

/// Runs an operation on the default engine
///
/// # Examples
///
/// ```
/// use devutils::engine::run;
/// use devutils::options::Options;
///
/// let outcome = run("base64-encode", "hello", &Options::new());
/// assert_eq!(outcome.output(), Some("aGVsbG8="));
/// ```
pub fn run(operation: &str, input: &str, options: &Options) -> Outcome {
    Engine::new().run(operation, input, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::stats::Metric;
    use crate::transforms::{DiffKind, Transform};

    struct Exploding;

    impl Transform for Exploding {
        fn transform(&self, _text: &str, _options: &Options) -> Result<Transformed> {
            panic!("boom");
        }
    }

    fn output(operation: &str, input: &str, options: &Options) -> String {
        run(operation, input, options)
            .output()
            .map(str::to_string)
            .unwrap_or_else(|| panic!("{} failed on {:?}", operation, input))
    }

    #[test]
    fn test_unknown_operation() {
        let outcome = run("rot13", "abc", &Options::new());
        assert_eq!(outcome.kind(), Some(ErrorKind::UnknownOperation));
    }

    #[test]
    fn test_empty_input_is_zeroed_success() {
        let engine = Engine::new();
        for name in engine.registry().names() {
            let transform = engine.registry().get(name).unwrap();
            if !transform.consumes_input() {
                continue;
            }
            let outcome = engine.run(name, "", &Options::new());
            assert_eq!(outcome, Outcome::empty(), "{}", name);
            assert!(outcome.stats().unwrap().is_zeroed(), "{}", name);
        }
    }

    #[test]
    fn test_generators_run_on_empty_input() {
        let outcome = run("uuid-v4", "", &Options::new());
        assert_eq!(outcome.output().map(str::len), Some(36));
        let stats = outcome.stats().unwrap();
        assert_eq!(
            (stats.characters, stats.words, stats.lines, stats.bytes),
            (0, 0, 0, 0)
        );
        assert_eq!(stats.metric("count"), Some(&Metric::Count(1)));

        let outcome = run("password-generate", "", &Options::new().with("length", 12));
        assert_eq!(outcome.output().map(|p| p.chars().count()), Some(12));
        assert_eq!(outcome.stats().unwrap().characters, 0);

        let outcome = run("password-generate", "", &Options::new().with("length", 0));
        assert_eq!(outcome.kind(), Some(ErrorKind::InvalidOptions));
    }

    #[test]
    fn test_round_trips_printable_ascii() {
        let printable: String = (0x20u8..0x7f).map(char::from).collect();
        let options = Options::new();
        let encoded = output("base64-encode", &printable, &options);
        assert_eq!(output("base64-decode", &encoded, &options), printable);
        let encoded = output("url-encode", &printable, &options);
        assert_eq!(output("url-decode", &encoded, &options), printable);
    }

    #[test]
    fn test_minify_is_idempotent() {
        let source = "{\n  \"b\": [1, {\"c\": null}],\n  \"a\": \"x\"\n}";
        let options = Options::new();
        let pretty = output("json-pretty", source, &options);
        let once = output("json-minify", &pretty, &options);
        assert_eq!(output("json-minify", &once, &options), output("json-minify", source, &options));
        assert_eq!(once, "{\"b\":[1,{\"c\":null}],\"a\":\"x\"}");
    }

    #[test]
    fn test_syntax_error_position() {
        let outcome = run("json-validate", "{\"a\":1,}", &Options::new());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::SyntaxError);
        let position = failure.position.unwrap();
        assert_eq!(position.line, 1);
        assert!(position.column > 1);
    }

    #[test]
    fn test_invalid_base64() {
        let outcome = run("base64-decode", "a$b=", &Options::new());
        assert_eq!(outcome.kind(), Some(ErrorKind::InvalidEncoding));
    }

    #[test]
    fn test_character_count_is_monotonic() {
        let mut text = String::from("a");
        let mut previous = 0;
        for suffix in ["b", " ", "\n", "🦀", "e\u{301}"] {
            text.push_str(suffix);
            let outcome = run("char-count", &text, &Options::new());
            let characters = outcome.stats().unwrap().characters;
            assert!(characters > previous);
            previous = characters;
        }
    }

    #[test]
    fn test_diff_through_engine() {
        let options = Options::new().with("modified", "a\nx\nc");
        let outcome = run("text-diff", "a\nb\nc", &options);
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.metric("added"), Some(&Metric::Count(1)));
        assert_eq!(stats.metric("removed"), Some(&Metric::Count(1)));
        assert_eq!(stats.metric("same"), Some(&Metric::Count(2)));
        let diff = crate::transforms::diff_lines(
            "a\nb\nc",
            "a\nx\nc",
            crate::transforms::DiffAlgorithm::Positional,
        );
        assert_eq!(diff[1].kind, DiffKind::Removed);
        assert_eq!(diff[2].kind, DiffKind::Added);
    }

    #[test]
    fn test_panics_become_failures() {
        let mut registry = TransformRegistry::new();
        registry.register("explode", Exploding);
        let engine = Engine::new().with_registry(Arc::new(registry));
        let outcome = engine.run("explode", "x", &Options::new());
        let failure = outcome.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::Unknown);
        assert!(failure.message.contains("boom"));
    }

    #[test]
    fn test_configured_defaults_and_overrides() {
        let config = EngineConfig::from_toml_str("[json]\nindent = 4").unwrap();
        let engine = Engine::new().with_config(config);
        let pretty = engine.run("json-pretty", "{\"a\":1}", &Options::new());
        assert_eq!(pretty.output(), Some("{\n    \"a\": 1\n}"));

        let pretty = engine.run("json-pretty", "{\"a\":1}", &Options::new().with("indent", 1));
        assert_eq!(pretty.output(), Some("{\n \"a\": 1\n}"));
    }

    #[test]
    fn test_stats_describe_input_with_metrics() {
        let outcome = run("json-validate", "{\"a\": [1, 2]}", &Options::new());
        let stats = outcome.stats().unwrap();
        assert_eq!(stats.characters, 13);
        assert_eq!(stats.words, 3);
        assert_eq!(stats.metric("keys"), Some(&Metric::Count(1)));
        assert_eq!(stats.metric("arrays"), Some(&Metric::Count(1)));
    }
}
