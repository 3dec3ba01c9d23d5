use crate::error::Result;
use crate::options::Options;
use crate::stats::Metric;

mod case;
mod codec;
mod counters;
mod csv;
mod diff;
mod generate;
mod http_status;
mod json;
mod registry;
mod tokens;

pub use case::{Case, CaseConverter, Slugify};
pub use codec::{Base64Decode, Base64Encode, HtmlDecode, HtmlEncode, UrlDecode, UrlEncode};
pub use counters::{CharCounter, CharFrequency, LineCounter, LinkedInCounter, WordCounter};
pub use csv::{CsvToJson, JsonToCsv};
pub use diff::{diff_lines, DiffAlgorithm, DiffKind, DiffLine, TextDiff, LCS_MAX_CELLS};
pub use generate::{PasswordGenerator, UuidGenerator};
pub use http_status::HttpStatusLookup;
pub use json::{to_indented_string, JsonMinify, JsonPretty, JsonValidate, JwtDecode};
pub use registry::{TransformManager, TransformRegistry};
pub use tokens::{TokenCounter, TokenMethod, Tokenizer};

/// Output of a single transform before the engine attaches the text statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformed {
    pub output: String,
    pub metrics: Vec<(&'static str, Metric)>,
}

impl Transformed {
    pub fn new<S: Into<String>>(output: S) -> Self {
        Transformed {
            output: output.into(),
            metrics: Vec::new(),
        }
    }

    pub fn metric(mut self, key: &'static str, metric: Metric) -> Self {
        self.metrics.push((key, metric));
        self
    }

    pub fn count(self, key: &'static str, n: usize) -> Self {
        self.metric(key, Metric::Count(n))
    }
}

/// Trait for the text operations exposed by the engine
///
/// Every operation is a pure function of its input and options. Failures are
/// reported through the returned `Result` and never by panicking.
///
/// # Examples
///
/// ```
/// use devutils::options::Options;
/// use devutils::transforms::{Base64Encode, Transform};
///
/// let encoded = Base64Encode::new().transform("hello", &Options::new()).unwrap();
/// assert_eq!(encoded.output, "aGVsbG8=");
/// ```
pub trait Transform: Send + Sync {
    /// Transforms the input text
    ///
    /// # Arguments
    /// * `text` - The text to transform, never empty for input-consuming operations
    /// * `options` - The operation specific options
    ///
    /// # Returns
    /// The transformed text plus operation metrics, or an error if transformation fails
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed>;

    /// Whether the operation reads its input. Generators ignore it and run on
    /// empty input, reporting what they produced through their metrics only.
    fn consumes_input(&self) -> bool {
        true
    }
}
