use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{json, Value};

use crate::constants::defaults;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::transforms::codec::{bytes_to_text, decode_base64, URL_SAFE};
use crate::transforms::{Transform, Transformed};

/// Indents wider than this are clamped
const MAX_INDENT: usize = 10;

/// Structural counters of a parsed document
#[derive(Debug, Default, PartialEq, Eq)]
struct Shape {
    keys: usize,
    arrays: usize,
    objects: usize,
    depth: usize,
}

impl Shape {
    fn of(value: &Value) -> Self {
        let mut shape = Shape::default();
        shape.visit(value, 1);
        shape
    }

    fn visit(&mut self, value: &Value, level: usize) {
        match value {
            Value::Object(map) => {
                self.objects += 1;
                self.keys += map.len();
                self.depth = self.depth.max(level);
                map.values().for_each(|v| self.visit(v, level + 1));
            }
            Value::Array(items) => {
                self.arrays += 1;
                self.depth = self.depth.max(level);
                items.iter().for_each(|v| self.visit(v, level + 1));
            }
            _ => {}
        }
    }

    fn attach(&self, transformed: Transformed, minified_size: usize) -> Transformed {
        transformed
            .count("size", minified_size)
            .count("keys", self.keys)
            .count("arrays", self.arrays)
            .count("objects", self.objects)
            .count("depth", self.depth)
    }
}

pub fn parse(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| Error::json(e, text))
}

/// Serializes a value with the given indent width, 0 meaning minified
///
/// # Examples
///
/// ```
/// use devutils::transforms::to_indented_string;
/// use serde_json::json;
///
/// let value = json!({"a": [1, 2]});
/// assert_eq!(to_indented_string(&value, 0).unwrap(), r#"{"a":[1,2]}"#);
/// assert_eq!(
///     to_indented_string(&value, 1).unwrap(),
///     "{\n \"a\": [\n  1,\n  2\n ]\n}"
/// );
/// ```
pub fn to_indented_string(value: &Value, indent: usize) -> Result<String> {
    let indent = indent.min(MAX_INDENT);
    if indent == 0 {
        return Ok(serde_json::to_string(value)?);
    }
    let indent_str = " ".repeat(indent);
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent_str.as_bytes()));
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| Error::Msg(e.to_string()))
}

fn format(text: &str, indent: usize) -> Result<Transformed> {
    if text.trim().is_empty() {
        return Ok(Transformed::default());
    }
    let value = parse(text)?;
    let minified = serde_json::to_string(&value)?;
    let output = if indent == 0 {
        minified.clone()
    } else {
        to_indented_string(&value, indent)?
    };
    Ok(Shape::of(&value).attach(Transformed::new(output), minified.len()))
}

pub struct JsonPretty;

impl JsonPretty {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for JsonPretty {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        format(text, options.usize_or("indent", defaults::JSON_INDENT)?)
    }
}

pub struct JsonMinify;

impl JsonMinify {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for JsonMinify {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        format(text, 0)
    }
}

/// Validates the document, the output is a one-line verdict
pub struct JsonValidate;

impl JsonValidate {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for JsonValidate {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        if text.trim().is_empty() {
            return Ok(Transformed::default());
        }
        let mut transformed = format(text, 0)?;
        transformed.output = "Valid JSON".to_string();
        Ok(transformed)
    }
}

/// Decodes the header and payload of a JSON Web Token. The signature is not verified.
pub struct JwtDecode;

impl JwtDecode {
    pub fn new() -> Self {
        Self
    }

    fn decode_segment(segment: &str, name: &str) -> Result<Value> {
        let bytes = decode_base64(segment, &URL_SAFE).map_err(|e| {
            Error::InvalidEncoding(format!("Invalid JWT {}: {}", name, e))
        })?;
        let (text, _) = bytes_to_text(bytes);
        parse(&text).map_err(|e| match e {
            Error::Syntax { message, .. } => Error::Syntax {
                message: format!("Invalid JWT {} JSON: {}", name, message),
                position: None,
            },
            other => other,
        })
    }
}

impl Transform for JwtDecode {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let token = text.trim();
        let token = token
            .strip_prefix("Bearer ")
            .unwrap_or(token)
            .trim();
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(Error::InvalidInput(format!(
                "A JWT has 3 dot-separated segments, found {}",
                segments.len()
            )));
        }

        let header = Self::decode_segment(segments[0], "header")?;
        let payload = Self::decode_segment(segments[1], "payload")?;
        let claims = payload.as_object().map_or(0, |m| m.len());
        let expires_at = payload.get("exp").and_then(Value::as_u64);

        let document = json!({
            "header": header,
            "payload": payload,
            "signature": segments[2],
        });
        let indent = options.usize_or("indent", defaults::JSON_INDENT)?;
        let mut transformed =
            Transformed::new(to_indented_string(&document, indent)?).count("claims", claims);
        if let Some(exp) = expires_at {
            transformed = transformed.count("expires_at", exp as usize);
        }
        Ok(transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Position;

    fn opts() -> Options {
        Options::new()
    }

    #[test]
    fn test_pretty_default_indent_keeps_key_order() {
        let out = JsonPretty::new()
            .transform(r#"{"b":1,"a":[true,null]}"#, &opts())
            .unwrap();
        assert_eq!(
            out.output,
            "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
    }

    #[test]
    fn test_pretty_custom_and_zero_indent() {
        let text = r#"{"a":{"b":2}}"#;
        let four = JsonPretty::new()
            .transform(text, &Options::new().with("indent", 4))
            .unwrap();
        assert_eq!(four.output, "{\n    \"a\": {\n        \"b\": 2\n    }\n}");
        let zero = JsonPretty::new()
            .transform(text, &Options::new().with("indent", 0))
            .unwrap();
        assert_eq!(zero.output, text);
    }

    #[test]
    fn test_minify_is_idempotent_over_pretty() {
        let samples = [
            r#"{ "name": "devutils", "tags": ["a", "b"], "nested": { "x": 1.5, "y": null } }"#,
            "[1, 2, [3, [4]]]",
            "\"just a string\"",
            "42",
        ];
        for s in samples {
            let pretty = JsonPretty::new().transform(s, &opts()).unwrap().output;
            let once = JsonMinify::new().transform(&pretty, &opts()).unwrap().output;
            let twice = JsonMinify::new().transform(&once, &opts()).unwrap().output;
            let direct = JsonMinify::new().transform(s, &opts()).unwrap().output;
            assert_eq!(twice, direct);
        }
    }

    #[test]
    fn test_trailing_comma_position() {
        let err = JsonValidate::new().transform(r#"{"a":1,}"#, &opts()).unwrap_err();
        match err {
            Error::Syntax {
                position: Some(Position { line, column }),
                ..
            } => {
                assert_eq!(line, 1);
                assert!(column > 1, "column was {}", column);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_error_column_ignores_multibyte_characters() {
        let position = |text: &str| match JsonValidate::new().transform(text, &opts()) {
            Err(Error::Syntax { position, .. }) => position,
            other => panic!("unexpected result {:?}", other),
        };
        assert_eq!(position(r#"{"e":1,}"#), position(r#"{"é":1,}"#));
        assert_eq!(
            position(r#"{"🦀": 1,}"#),
            Some(Position { line: 1, column: 9 })
        );
    }

    #[test]
    fn test_multiline_error_position() {
        let err = JsonPretty::new()
            .transform("{\n  \"a\": 1\n  \"b\": 2\n}", &opts())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Syntax {
                position: Some(Position { line: 3, .. }),
                ..
            }
        ));
    }

    #[test]
    fn test_shape_metrics() {
        let out = JsonValidate::new()
            .transform(r#"{"a":[{"b":1},{"c":[2]}],"d":{}}"#, &opts())
            .unwrap();
        assert_eq!(out.output, "Valid JSON");
        let metric = |key: &str| {
            out.metrics
                .iter()
                .find(|(k, _)| *k == key)
                .and_then(|(_, m)| m.as_count())
                .unwrap()
        };
        assert_eq!(metric("keys"), 4);
        assert_eq!(metric("arrays"), 2);
        assert_eq!(metric("objects"), 4);
        assert_eq!(metric("depth"), 4);
        assert_eq!(metric("size"), 32);
    }

    #[test]
    fn test_blank_document_is_a_no_op() {
        let out = JsonPretty::new().transform("  \n ", &opts()).unwrap();
        assert_eq!(out, Transformed::default());
    }

    #[test]
    fn test_jwt_decode() {
        // {"alg":"HS256","typ":"JWT"} . {"sub":"1234567890","name":"John Doe","iat":1516239022}
        let token = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
                     eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
                     SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";
        let out = JwtDecode::new().transform(token, &opts()).unwrap();
        let doc: Value = serde_json::from_str(&out.output).unwrap();
        assert_eq!(doc["header"]["alg"], "HS256");
        assert_eq!(doc["payload"]["name"], "John Doe");
        assert_eq!(doc["signature"], "SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c");
        assert!(out.metrics.contains(&("claims", crate::stats::Metric::Count(3))));
    }

    #[test]
    fn test_jwt_errors() {
        assert!(matches!(
            JwtDecode::new().transform("abc.def", &opts()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            JwtDecode::new().transform("a$b.c.d", &opts()),
            Err(Error::InvalidEncoding(_))
        ));
        // "bm90IGpzb24" is "not json"
        assert!(matches!(
            JwtDecode::new().transform("bm90IGpzb24.bm90IGpzb24.x", &opts()),
            Err(Error::Syntax { .. })
        ));
    }
}
