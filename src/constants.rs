//! Module for shared constants used across the codebase

/// Character sets used by the password generator
pub mod charset {
    pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
    pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    pub const NUMBERS: &str = "0123456789";
    pub const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
}

pub mod defaults {
    /// Indent width used by the JSON pretty printer
    pub const JSON_INDENT: usize = 2;

    pub const PASSWORD_LENGTH: usize = 16;
    pub const PASSWORD_MAX_LENGTH: usize = 1024;

    pub const UUID_COUNT: usize = 1;
    pub const UUID_MAX_COUNT: usize = 100;

    pub const CSV_DELIMITER: char = ',';
    pub const CSV_QUOTE: char = '"';

    pub const SLUG_SEPARATOR: &str = "-";

    pub const LINKEDIN_CONTENT: &str = "post";
    /// Characters shown in the LinkedIn feed before "see more"
    pub const LINKEDIN_PREVIEW_CHARS: usize = 150;

    pub const TOKEN_MODEL: &str = "gpt-4";
    /// Context window the usage percentage is measured against
    pub const TOKEN_CONTEXT_LIMIT: usize = 8192;

    pub const WORDS_PER_MINUTE: usize = 200;

    /// Delay before the "copied" flag of a tool session resets
    pub const COPIED_RESET_MS: u64 = 2000;
}

/// LinkedIn content types and their character limits
pub const LINKEDIN_LIMITS: &[(&str, &str, usize)] = &[
    ("post", "Post", 3000),
    ("comment", "Comment", 1250),
    ("headline", "Headline", 220),
    ("about", "About", 2600),
];

/// Token pricing per model: (id, chars per token, input $/1K, output $/1K)
pub const TOKEN_RATES: &[(&str, f64, f64, f64)] = &[
    ("gpt-4", 4.0, 0.03, 0.06),
    ("gpt-4-turbo", 4.0, 0.01, 0.03),
    ("gpt-3.5", 4.0, 0.0015, 0.002),
    ("claude-3", 3.5, 0.008, 0.024),
    ("claude-instant", 3.5, 0.0008, 0.0024),
];
