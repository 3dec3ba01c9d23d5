use serde_json::{Map, Value};

use crate::constants::defaults;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::transforms::json::{parse, to_indented_string};
use crate::transforms::{Transform, Transformed};

/// Delimiter and quote rules shared by both directions
#[derive(Debug, Clone, Copy)]
struct Dialect {
    delimiter: char,
    quote: char,
}

impl Dialect {
    fn from_options(options: &Options) -> Result<Self> {
        let dialect = Dialect {
            delimiter: options.char_or("delimiter", defaults::CSV_DELIMITER)?,
            quote: options.char_or("quote", defaults::CSV_QUOTE)?,
        };
        if dialect.delimiter == dialect.quote {
            return Err(Error::option("quote", "must differ from the delimiter"));
        }
        if matches!(dialect.delimiter, '\n' | '\r') {
            return Err(Error::option("delimiter", "line breaks cannot be delimiters"));
        }
        Ok(dialect)
    }

    /// Splits text into records. Quoted fields may contain delimiters, line
    /// breaks and doubled quotes. An unterminated quote runs to the end of
    /// the text.
    fn records(&self, text: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut record = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == self.quote {
                    if chars.peek() == Some(&self.quote) {
                        field.push(self.quote);
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    field.push(c);
                }
                continue;
            }

            match c {
                c if c == self.quote && field.is_empty() => in_quotes = true,
                c if c == self.delimiter => record.push(std::mem::take(&mut field)),
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                _ => field.push(c),
            }
        }

        if !field.is_empty() || !record.is_empty() {
            record.push(field);
            records.push(record);
        }

        // blank lines carry no data
        records.retain(|r| !(r.len() == 1 && r[0].trim().is_empty()));
        records
    }

    fn escape(&self, field: &str) -> String {
        let needs_quotes = field.contains(self.delimiter)
            || field.contains(self.quote)
            || field.contains('\n')
            || field.contains('\r');
        if needs_quotes {
            let doubled = format!("{}{}", self.quote, self.quote);
            format!(
                "{q}{}{q}",
                field.replace(self.quote, &doubled),
                q = self.quote
            )
        } else {
            field.to_string()
        }
    }
}

fn infer(cell: &str) -> Value {
    match cell.trim() {
        "" => Value::String(String::new()),
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        trimmed => serde_json::from_str::<serde_json::Number>(trimmed)
            .map(Value::Number)
            .unwrap_or_else(|_| Value::String(cell.to_string())),
    }
}

fn column_name(index: usize) -> String {
    format!("field_{}", index + 1)
}

/// Converts delimited text into a JSON array of objects keyed by the header row
pub struct CsvToJson;

impl CsvToJson {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for CsvToJson {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let dialect = Dialect::from_options(options)?;
        let has_header = options.flag_or("header", true)?;
        let infer_types = options.flag_or("infer_types", false)?;

        let mut records = dialect.records(text).into_iter();
        let header: Vec<String> = if has_header {
            records
                .next()
                .unwrap_or_default()
                .into_iter()
                .map(|h| h.trim().to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut ragged = 0;
        let rows: Vec<Value> = records
            .map(|record| {
                if has_header && record.len() != header.len() {
                    ragged += 1;
                }
                let width = header.len().max(record.len());
                let mut row = Map::new();
                for index in 0..width {
                    let key = header
                        .get(index)
                        .filter(|h| !h.is_empty())
                        .cloned()
                        .unwrap_or_else(|| column_name(index));
                    let cell = record.get(index).map(String::as_str).unwrap_or("");
                    let value = if infer_types {
                        infer(cell)
                    } else {
                        Value::String(cell.to_string())
                    };
                    row.insert(key, value);
                }
                Value::Object(row)
            })
            .collect();

        let columns = rows
            .iter()
            .filter_map(Value::as_object)
            .map(Map::len)
            .max()
            .unwrap_or(header.len());
        let row_count = rows.len();
        let indent = options.usize_or("indent", defaults::JSON_INDENT)?;
        Ok(
            Transformed::new(to_indented_string(&Value::Array(rows), indent)?)
                .count("rows", row_count)
                .count("columns", columns)
                .count("ragged_rows", ragged),
        )
    }
}

/// Flattens nested objects into dotted keys; arrays become comma-joined cells
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&path, nested, out);
            }
        }
        other => out.push((prefix.to_string(), cell_text(other))),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(","),
        Value::Object(map) if map.is_empty() => String::new(),
        other => other.to_string(),
    }
}

/// Converts a JSON array of objects (or a single object) into delimited text
pub struct JsonToCsv;

impl JsonToCsv {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for JsonToCsv {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let dialect = Dialect::from_options(options)?;
        if text.trim().is_empty() {
            return Ok(Transformed::default());
        }

        let value = parse(text)?;
        let items = match value {
            Value::Array(items) => items,
            object @ Value::Object(_) => vec![object],
            _ => {
                return Err(Error::InvalidInput(
                    "Input must be an array of objects".to_string(),
                ))
            }
        };

        let mut header: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<(String, String)>> = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if !item.is_object() {
                return Err(Error::InvalidInput(format!(
                    "Item {} is not an object",
                    index + 1
                )));
            }
            let mut cells = Vec::new();
            flatten("", item, &mut cells);
            for (key, _) in &cells {
                if !header.contains(key) {
                    header.push(key.clone());
                }
            }
            rows.push(cells);
        }

        let delimiter = dialect.delimiter.to_string();
        let mut lines = Vec::with_capacity(rows.len() + 1);
        lines.push(
            header
                .iter()
                .map(|h| dialect.escape(h))
                .collect::<Vec<_>>()
                .join(&delimiter),
        );
        for cells in &rows {
            let line = header
                .iter()
                .map(|h| {
                    cells
                        .iter()
                        .find(|(key, _)| key == h)
                        .map_or(String::new(), |(_, v)| dialect.escape(v))
                })
                .collect::<Vec<_>>()
                .join(&delimiter);
            lines.push(line);
        }

        Ok(Transformed::new(lines.join("\n"))
            .count("rows", rows.len())
            .count("columns", header.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn csv_to_value(text: &str, options: &Options) -> Value {
        let out = CsvToJson::new().transform(text, options).unwrap();
        serde_json::from_str(&out.output).unwrap()
    }

    #[test]
    fn test_csv_to_json_basic() {
        let value = csv_to_value("name,age\nAda,36\nLinus,54\n", &Options::new());
        assert_eq!(
            value,
            json!([{"name": "Ada", "age": "36"}, {"name": "Linus", "age": "54"}])
        );
    }

    #[test]
    fn test_csv_quotes_and_embedded_breaks() {
        let text = "id,quote\r\n1,\"He said \"\"hi\"\", then left\"\r\n2,\"multi\nline\"";
        let value = csv_to_value(text, &Options::new());
        assert_eq!(value[0]["quote"], "He said \"hi\", then left");
        assert_eq!(value[1]["quote"], "multi\nline");
    }

    #[test]
    fn test_csv_ragged_rows_are_filled() {
        let out = CsvToJson::new()
            .transform("a,b,c\n1\n1,2,3,4", &Options::new())
            .unwrap();
        let value: Value = serde_json::from_str(&out.output).unwrap();
        assert_eq!(value[0], json!({"a": "1", "b": "", "c": ""}));
        assert_eq!(value[1], json!({"a": "1", "b": "2", "c": "3", "field_4": "4"}));
        assert!(out.metrics.contains(&("ragged_rows", crate::stats::Metric::Count(2))));
    }

    #[test]
    fn test_csv_custom_dialect_and_types() {
        let options = Options::new()
            .with("delimiter", ";")
            .with("quote", "'")
            .with("infer_types", true);
        let value = csv_to_value("x;y;z\n1.5;'a;b';true\n", &options);
        assert_eq!(value, json!([{"x": 1.5, "y": "a;b", "z": true}]));
    }

    #[test]
    fn test_csv_without_header() {
        let value = csv_to_value("1,2\n3,4", &Options::new().with("header", false));
        assert_eq!(
            value,
            json!([{"field_1": "1", "field_2": "2"}, {"field_1": "3", "field_2": "4"}])
        );
    }

    #[test]
    fn test_unterminated_quote_is_best_effort() {
        let value = csv_to_value("a,b\n1,\"open", &Options::new());
        assert_eq!(value, json!([{"a": "1", "b": "open"}]));
    }

    #[test]
    fn test_json_to_csv_flattens() {
        let text = r#"[
            {"name": "Ada", "meta": {"lang": "en", "level": 3}, "tags": ["x", "y"]},
            {"name": "Bob, Jr.", "extra": null}
        ]"#;
        let out = JsonToCsv::new().transform(text, &Options::new()).unwrap();
        assert_eq!(
            out.output,
            "name,meta.lang,meta.level,tags,extra\n\
             Ada,en,3,\"x,y\",\n\
             \"Bob, Jr.\",,,,"
        );
    }

    #[test]
    fn test_json_to_csv_round_trip() {
        let csv = "a,b\n1,\"two \"\"quoted\"\"\"\n3,4";
        let json = CsvToJson::new().transform(csv, &Options::new()).unwrap().output;
        let back = JsonToCsv::new().transform(&json, &Options::new()).unwrap().output;
        assert_eq!(back, csv);
    }

    #[test]
    fn test_json_to_csv_rejects_wrong_shapes() {
        assert!(matches!(
            JsonToCsv::new().transform("[1,2]", &Options::new()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            JsonToCsv::new().transform("42", &Options::new()),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            JsonToCsv::new().transform("[{", &Options::new()),
            Err(Error::Syntax { .. })
        ));
    }

    #[test]
    fn test_dialect_validation() {
        let options = Options::new().with("delimiter", "\"");
        assert!(matches!(
            CsvToJson::new().transform("a", &options),
            Err(Error::InvalidOption { .. })
        ));
    }
}
