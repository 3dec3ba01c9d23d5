use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use once_cell::sync::Lazy;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::options::Options;
use crate::outcome::Position;
use crate::transforms::{Transform, Transformed};

/// Characters `encodeURIComponent` leaves untouched
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Component set plus the reserved characters a full URI keeps
const URI: &AsciiSet = &COMPONENT
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'#');

// Decoders accept input with or without trailing padding
const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
pub(crate) const STANDARD: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
pub(crate) const URL_SAFE: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

static HTML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});").unwrap());

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("copy", "©"),
    ("reg", "®"),
    ("trade", "™"),
    ("hellip", "…"),
    ("mdash", "—"),
    ("ndash", "–"),
    ("laquo", "«"),
    ("raquo", "»"),
    ("euro", "€"),
    ("pound", "£"),
    ("yen", "¥"),
    ("cent", "¢"),
    ("deg", "°"),
    ("times", "×"),
    ("divide", "÷"),
];

fn engine_for(options: &Options) -> Result<&'static GeneralPurpose> {
    Ok(if options.flag_or("url_safe", false)? {
        &URL_SAFE
    } else {
        &STANDARD
    })
}

/// Decodes Base64 text, ignoring ASCII whitespace, into raw bytes
pub fn decode_base64(text: &str, engine: &GeneralPurpose) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(engine.decode(compact)?)
}

/// Turns decoded bytes into text. Payloads that are not UTF-8 are mapped
/// byte for byte onto Latin-1 so that binary content survives.
pub fn bytes_to_text(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, true),
        Err(err) => (err.into_bytes().iter().map(|&b| b as char).collect(), false),
    }
}

pub struct Base64Encode;

impl Base64Encode {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for Base64Encode {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let mut encoded = engine_for(options)?.encode(text.as_bytes());
        if options.is_active("url_safe") && options.flag_or("strip_padding", false)? {
            encoded.truncate(encoded.trim_end_matches('=').len());
        }
        Ok(Transformed::new(encoded).count("input_bytes", text.len()))
    }
}

pub struct Base64Decode;

impl Base64Decode {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for Base64Decode {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let bytes = decode_base64(text, engine_for(options)?)?;
        let decoded_bytes = bytes.len();
        let (decoded, utf8) = bytes_to_text(bytes);
        Ok(Transformed::new(decoded)
            .count("decoded_bytes", decoded_bytes)
            .metric("utf8", crate::stats::Metric::Flag(utf8)))
    }
}

fn url_set(options: &Options) -> Result<&'static AsciiSet> {
    match options.string_or("mode", "component").as_str() {
        "component" => Ok(COMPONENT),
        "uri" => Ok(URI),
        other => Err(Error::option(
            "mode",
            format!("expected \"component\" or \"uri\", got \"{}\"", other),
        )),
    }
}

pub struct UrlEncode;

impl UrlEncode {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for UrlEncode {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let encoded = utf8_percent_encode(text, url_set(options)?).to_string();
        let escaped = encoded.matches('%').count();
        Ok(Transformed::new(encoded).count("escaped_bytes", escaped))
    }
}

pub struct UrlDecode;

impl UrlDecode {
    pub fn new() -> Self {
        Self
    }

    /// Rejects `%` not followed by two hex digits
    fn check_sequences(text: &str) -> Result<()> {
        let bytes = text.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if b != b'%' {
                continue;
            }
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let pos = Position::from_offset(text, i);
                return Err(Error::InvalidEncoding(format!(
                    "Invalid URL encoding: malformed percent sequence at column {}",
                    pos.column
                )));
            }
        }
        Ok(())
    }
}

impl Transform for UrlDecode {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        Self::check_sequences(text)?;
        let decoded = percent_decode_str(text)
            .decode_utf8()
            .map_err(|e| Error::InvalidEncoding(format!("Invalid URL encoding: {}", e)))?;
        Ok(Transformed::new(decoded.into_owned()))
    }
}

pub struct HtmlEncode;

impl HtmlEncode {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for HtmlEncode {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        let mut encoded = String::with_capacity(text.len());
        let mut escaped = 0;
        for c in text.chars() {
            let entity = match c {
                '&' => "&amp;",
                '<' => "&lt;",
                '>' => "&gt;",
                '"' => "&quot;",
                '\'' => "&#39;",
                _ => {
                    encoded.push(c);
                    continue;
                }
            };
            encoded.push_str(entity);
            escaped += 1;
        }
        Ok(Transformed::new(encoded).count("entities", escaped))
    }
}

pub struct HtmlDecode;

impl HtmlDecode {
    pub fn new() -> Self {
        Self
    }

    fn resolve(entity: &str) -> Option<String> {
        if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
            return u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from);
        }
        if let Some(dec) = entity.strip_prefix('#') {
            return dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from);
        }
        NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == entity)
            .map(|(_, value)| value.to_string())
    }
}

impl Transform for HtmlDecode {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        let mut resolved = 0;
        let decoded = HTML_ENTITY.replace_all(text, |caps: &Captures| {
            match Self::resolve(&caps[1]) {
                Some(value) => {
                    resolved += 1;
                    value
                }
                // unknown entities stay verbatim
                None => caps[0].to_string(),
            }
        });
        Ok(Transformed::new(decoded.into_owned()).count("entities", resolved))
    }
}
