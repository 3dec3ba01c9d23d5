use crate::error::{Error, Result};
use crate::options::Options;
use crate::transforms::{Transform, Transformed};

const STATUS_CODES: &[(u16, &str)] = &[
    (100, "Continue"),
    (101, "Switching Protocols"),
    (102, "Processing"),
    (103, "Early Hints"),
    (200, "OK"),
    (201, "Created"),
    (202, "Accepted"),
    (203, "Non-Authoritative Information"),
    (204, "No Content"),
    (205, "Reset Content"),
    (206, "Partial Content"),
    (207, "Multi-Status"),
    (208, "Already Reported"),
    (226, "IM Used"),
    (300, "Multiple Choices"),
    (301, "Moved Permanently"),
    (302, "Found"),
    (303, "See Other"),
    (304, "Not Modified"),
    (305, "Use Proxy"),
    (307, "Temporary Redirect"),
    (308, "Permanent Redirect"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (402, "Payment Required"),
    (403, "Forbidden"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (406, "Not Acceptable"),
    (407, "Proxy Authentication Required"),
    (408, "Request Timeout"),
    (409, "Conflict"),
    (410, "Gone"),
    (411, "Length Required"),
    (412, "Precondition Failed"),
    (413, "Content Too Large"),
    (414, "URI Too Long"),
    (415, "Unsupported Media Type"),
    (416, "Range Not Satisfiable"),
    (417, "Expectation Failed"),
    (418, "I'm a teapot"),
    (421, "Misdirected Request"),
    (422, "Unprocessable Content"),
    (423, "Locked"),
    (424, "Failed Dependency"),
    (425, "Too Early"),
    (426, "Upgrade Required"),
    (428, "Precondition Required"),
    (429, "Too Many Requests"),
    (431, "Request Header Fields Too Large"),
    (451, "Unavailable For Legal Reasons"),
    (500, "Internal Server Error"),
    (501, "Not Implemented"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
    (504, "Gateway Timeout"),
    (505, "HTTP Version Not Supported"),
    (506, "Variant Also Negotiates"),
    (507, "Insufficient Storage"),
    (508, "Loop Detected"),
    (510, "Not Extended"),
    (511, "Network Authentication Required"),
];

/// Reason phrase of a registered status code
pub fn reason_phrase(code: u16) -> Option<&'static str> {
    STATUS_CODES
        .binary_search_by_key(&code, |(c, _)| *c)
        .ok()
        .map(|index| STATUS_CODES[index].1)
}

/// Class of a status code, `None` outside 100..=599
pub fn status_class(code: u16) -> Option<&'static str> {
    match code {
        100..=199 => Some("Informational"),
        200..=299 => Some("Success"),
        300..=399 => Some("Redirection"),
        400..=499 => Some("Client Error"),
        500..=599 => Some("Server Error"),
        _ => None,
    }
}

/// Looks up an HTTP status code such as `404`
pub struct HttpStatusLookup;

impl HttpStatusLookup {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for HttpStatusLookup {
    fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
        let trimmed = text.trim();
        let code: u16 = trimmed
            .parse()
            .map_err(|_| Error::InvalidInput(format!("\"{}\" is not a status code", trimmed)))?;
        let class = status_class(code).ok_or_else(|| {
            Error::InvalidInput(format!("{} is outside the 100-599 range", code))
        })?;

        let reason = reason_phrase(code);
        let output = match reason {
            Some(reason) => format!("{} {}\n{}", code, reason, class),
            None => format!("{}\n{}", code, class),
        };
        Ok(Transformed::new(output)
            .count("code", code as usize)
            .metric("registered", crate::stats::Metric::Flag(reason.is_some())))
    }
}
