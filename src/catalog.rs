//! Static description of the tool pages handed to the presentation shell.

use serde::Deserialize;
use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    #[strum(serialize = "converters")]
    Converters,
    #[strum(serialize = "generators")]
    Generators,
    #[strum(serialize = "formatters")]
    Formatters,
    #[strum(serialize = "utilities")]
    Utilities,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Converters,
        Category::Generators,
        Category::Formatters,
        Category::Utilities,
    ];

    pub fn from_id(id: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.to_string() == id)
    }
}

/// Everything the shell needs to render one tool page. The shell renders
/// these verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPage {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub popular: bool,
    /// Engine operations backing the page, empty for pages rendered entirely
    /// by the shell
    pub operations: &'static [&'static str],
    pub instructions: &'static [&'static str],
    pub tips: &'static [&'static str],
}

const TOOLS: &[ToolPage] = &[
    ToolPage {
        slug: "url-encoderdecoder",
        title: "URL Encoder/Decoder",
        description: "Encode and decode URLs. Convert special characters to URL-safe format and back.",
        category: Category::Converters,
        popular: true,
        operations: &["url-encode", "url-decode"],
        instructions: &[
            "Paste your text or URL",
            "Pick component or full URI mode",
            "Encode or decode",
        ],
        tips: &[
            "Component mode also escapes / ? & =",
            "Use URI mode for complete URLs",
        ],
    },
    ToolPage {
        slug: "base64",
        title: "Base64 Converter",
        description: "Encode text to Base64 and decode Base64 back to text.",
        category: Category::Converters,
        popular: false,
        operations: &["base64-encode", "base64-decode"],
        instructions: &["Paste your text", "Choose encode or decode", "Copy the result"],
        tips: &[
            "Whitespace in Base64 input is ignored",
            "Enable URL-safe mode for tokens and URLs",
        ],
    },
    ToolPage {
        slug: "image-to-base64-converter",
        title: "Image to Base64",
        description: "Convert images to Base64 strings.",
        category: Category::Converters,
        popular: false,
        operations: &[],
        instructions: &[
            "Choose an image file",
            "Copy the data URI",
        ],
        tips: &[
            "Large images produce very long strings",
        ],
    },
    ToolPage {
        slug: "base64-to-image-converter",
        title: "Base64 to Image",
        description: "Decode Base64 back to images.",
        category: Category::Converters,
        popular: false,
        operations: &[],
        instructions: &[
            "Paste a Base64 string or data URI",
            "Preview and download the image",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "csv-to-json-converter",
        title: "CSV to JSON",
        description: "Convert CSV data to JSON format.",
        category: Category::Converters,
        popular: false,
        operations: &["csv-to-json"],
        instructions: &[
            "Paste CSV with a header row",
            "Set the delimiter if it is not a comma",
            "Convert and copy the JSON",
        ],
        tips: &[
            "Quoted fields may contain delimiters and line breaks",
            "Missing cells become empty strings",
        ],
    },
    ToolPage {
        slug: "json-to-csv-converter",
        title: "JSON to CSV Converter",
        description: "Convert JSON arrays to CSV format.",
        category: Category::Converters,
        popular: false,
        operations: &["json-to-csv"],
        instructions: &[
            "Paste JSON array of objects",
            "Verify the field mapping",
            "Click 'Convert' to generate CSV",
            "Copy or download the result",
        ],
        tips: &[
            "Input must be an array of objects",
            "All objects should have similar structure",
            "Nested objects are flattened",
            "Arrays become comma-separated",
        ],
    },
    ToolPage {
        slug: "markdown-to-html-converter",
        title: "Markdown to HTML",
        description: "Convert Markdown to HTML.",
        category: Category::Converters,
        popular: false,
        operations: &[],
        instructions: &[
            "Paste your Markdown",
            "Copy the generated HTML",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "html-to-markdown",
        title: "HTML to Markdown",
        description: "Convert HTML back to Markdown.",
        category: Category::Converters,
        popular: false,
        operations: &[],
        instructions: &[
            "Paste your HTML",
            "Copy the Markdown",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "html-entity-encoderdecoder",
        title: "HTML Entity Encoder",
        description: "Encode special HTML characters and decode entities back.",
        category: Category::Converters,
        popular: false,
        operations: &["html-encode", "html-decode"],
        instructions: &["Paste HTML or text", "Encode or decode entities"],
        tips: &["Numeric references like &#169; are decoded too"],
    },
    ToolPage {
        slug: "text-case-converter",
        title: "Text Case Converter",
        description: "Convert between cases: camel, snake, kebab.",
        category: Category::Converters,
        popular: false,
        operations: &["case-convert"],
        instructions: &["Paste your text", "Pick the target case"],
        tips: &["camelCase and snake_case input is split into words"],
    },
    ToolPage {
        slug: "slug-generator",
        title: "Slug Generator",
        description: "Create URL-friendly slugs from any text.",
        category: Category::Converters,
        popular: false,
        operations: &["slug"],
        instructions: &[
            "Enter your title or text",
            "Click 'Generate Slug'",
            "Copy the URL-friendly result",
            "Use in your URLs",
        ],
        tips: &[
            "Converts to lowercase",
            "Removes special characters",
            "Replaces spaces with hyphens",
            "Perfect for blog post URLs",
        ],
    },
    ToolPage {
        slug: "jwt-decoder",
        title: "JWT Decoder",
        description: "Decode JWT tokens to view header and payload.",
        category: Category::Converters,
        popular: true,
        operations: &["jwt-decode"],
        instructions: &["Paste the token", "Inspect header and payload claims"],
        tips: &[
            "The signature is not verified",
            "A leading \"Bearer \" is ignored",
        ],
    },
    ToolPage {
        slug: "password-generator",
        title: "Password Generator",
        description: "Generate secure, random passwords with customizable options.",
        category: Category::Generators,
        popular: true,
        operations: &["password-generate"],
        instructions: &["Choose the length", "Select character classes", "Generate and copy"],
        tips: &["Longer passwords beat more symbols"],
    },
    ToolPage {
        slug: "uuid-generator",
        title: "UUID Generator",
        description: "Generate random UUIDs (Universally Unique Identifiers) v4.",
        category: Category::Generators,
        popular: false,
        operations: &["uuid-v4"],
        instructions: &["Set how many UUIDs you need", "Generate and copy"],
        tips: &["Up to 100 UUIDs per batch"],
    },
    ToolPage {
        slug: "color-palette-generator",
        title: "Color Palette",
        description: "Generate beautiful color palettes.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "Pick a base color",
            "Copy the hex values",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "css-box-shadow-generator",
        title: "CSS Box Shadow",
        description: "Create CSS box-shadow styles.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "Adjust offset, blur and spread",
            "Copy the CSS rule",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "flexbox-generator",
        title: "Flexbox Generator",
        description: "Generate CSS flexbox layouts.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "Set direction, alignment and wrapping",
            "Copy the CSS rule",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "gradient-generator",
        title: "Gradient Generator",
        description: "Create CSS gradients.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "Choose the colors and angle",
            "Copy the CSS rule",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "lorem-ipsum-generator",
        title: "Lorem Ipsum",
        description: "Generate placeholder text.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "Choose how many paragraphs",
            "Copy the text",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "meta-tag-generator",
        title: "Meta Tags",
        description: "Generate SEO meta tags.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "Fill in title, description and image",
            "Paste the tags into your page head",
        ],
        tips: &[
            "Keep descriptions under 160 characters",
        ],
    },
    ToolPage {
        slug: "robots.txt-generator",
        title: "robots.txt",
        description: "Generate robots.txt files.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "List the paths to allow or disallow",
            "Add your sitemap URL",
            "Save as robots.txt at the site root",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "cron-expression-parser",
        title: "Cron Expression",
        description: "Parse and generate cron schedules.",
        category: Category::Generators,
        popular: false,
        operations: &[],
        instructions: &[
            "Enter a five-field cron expression",
            "Read the schedule in plain words",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "json-formatter",
        title: "JSON Formatter",
        description: "Format, minify, and validate JSON with error highlighting.",
        category: Category::Formatters,
        popular: true,
        operations: &["json-pretty", "json-minify", "json-validate"],
        instructions: &[
            "Paste your JSON",
            "Format, minify or validate it",
            "Copy the result",
        ],
        tips: &[
            "Errors report the line and column",
            "Key order is preserved",
        ],
    },
    ToolPage {
        slug: "css-minifier",
        title: "CSS Minifier",
        description: "Minify CSS code.",
        category: Category::Formatters,
        popular: false,
        operations: &[],
        instructions: &[
            "Paste your CSS",
            "Copy the minified output",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "javascript-minifier",
        title: "JS Minifier",
        description: "Minify JavaScript code.",
        category: Category::Formatters,
        popular: false,
        operations: &[],
        instructions: &[
            "Paste your JavaScript",
            "Copy the minified output",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "sql-formatter",
        title: "SQL Formatter",
        description: "Format SQL queries.",
        category: Category::Formatters,
        popular: false,
        operations: &[],
        instructions: &[
            "Paste your query",
            "Copy the formatted SQL",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "text-diff",
        title: "Text Diff",
        description: "Compare text differences line by line.",
        category: Category::Formatters,
        popular: false,
        operations: &["text-diff"],
        instructions: &["Paste the original text", "Paste the modified text", "Review the changes"],
        tips: &["Switch to LCS mode when lines were inserted or deleted"],
    },
    ToolPage {
        slug: "regex-tester",
        title: "Regex Tester",
        description: "Test regular expressions.",
        category: Category::Formatters,
        popular: false,
        operations: &[],
        instructions: &[
            "Enter a pattern and flags",
            "Paste the text to search",
            "Review the highlighted matches",
        ],
        tips: &[],
    },
    ToolPage {
        slug: "linkedin-counter",
        title: "LinkedIn Character Counter",
        description: "Count characters, words, and preview your LinkedIn posts, comments, and headlines.",
        category: Category::Utilities,
        popular: true,
        operations: &["linkedin-count"],
        instructions: &["Pick the content type", "Write or paste your text", "Check the preview"],
        tips: &["Only the first 150 characters show before \"see more\""],
    },
    ToolPage {
        slug: "token-counter",
        title: "AI Token Counter",
        description: "Count tokens for GPT-4, Claude, and other LLMs. Estimate API costs and optimize your prompts before sending to AI services.",
        category: Category::Utilities,
        popular: true,
        operations: &["token-count"],
        instructions: &[
            "Select the AI model you're using from the dropdown",
            "Paste your text or prompt into the input area",
            "View estimated token count in real-time",
            "Check the cost estimate for your usage",
            "Adjust your prompt to fit within token limits",
        ],
        tips: &[
            "GPT-4 averages ~4 characters per token",
            "Code uses more tokens than plain English",
            "Keep prompts under 75% of max for response room",
            "Longer context = higher costs but better results",
        ],
    },
    ToolPage {
        slug: "word-counter",
        title: "Word Counter",
        description: "Count words and characters.",
        category: Category::Utilities,
        popular: false,
        operations: &["word-count", "char-count"],
        instructions: &["Paste your text", "Read the counts and reading time"],
        tips: &["Reading time assumes 200 words per minute"],
    },
    ToolPage {
        slug: "line-counter",
        title: "Line Counter",
        description: "Count lines in text.",
        category: Category::Utilities,
        popular: false,
        operations: &["line-count"],
        instructions: &["Paste your text"],
        tips: &["Blank lines are counted separately"],
    },
    ToolPage {
        slug: "character-frequency-analyzer",
        title: "Character Frequency",
        description: "Analyze character usage.",
        category: Category::Utilities,
        popular: false,
        operations: &["char-frequency"],
        instructions: &["Paste your text", "Read the ranking"],
        tips: &["Enable ignore case to merge upper and lower case"],
    },
    ToolPage {
        slug: "screen-resolution-detector",
        title: "Screen Resolution",
        description: "Detect your screen specs.",
        category: Category::Utilities,
        popular: false,
        operations: &[],
        instructions: &[
            "Open the page on the device to inspect",
        ],
        tips: &[
            "Resize the window to see the viewport change",
        ],
    },
    ToolPage {
        slug: "http-status-code-checker",
        title: "HTTP Status Code Checker",
        description: "Check what different HTTP status codes mean.",
        category: Category::Utilities,
        popular: false,
        operations: &["http-status"],
        instructions: &[
            "Enter a status code",
            "See description and meaning",
            "Common codes listed for reference",
            "Use for debugging APIs",
        ],
        tips: &[
            "200 = OK, 404 = Not Found",
            "500 = Server Error",
            "301/302 = Redirects",
            "Learn common codes by heart",
        ],
    },
];

/// Every tool page, in display order
pub fn catalog() -> &'static [ToolPage] {
    TOOLS
}

/// Tools of a category (all when `None`) whose title or description contains
/// `query`, ignoring case. An empty query matches everything.
///
/// # Examples
///
/// ```
/// use devutils::catalog::{filter, Category};
///
/// let found = filter(Some(Category::Converters), "json");
/// assert!(found.iter().any(|t| t.slug == "csv-to-json-converter"));
/// assert!(found.iter().all(|t| t.category == Category::Converters));
/// ```
pub fn filter(category: Option<Category>, query: &str) -> Vec<&'static ToolPage> {
    let query = query.trim().to_lowercase();
    TOOLS
        .iter()
        .filter(|tool| category.map_or(true, |c| tool.category == c))
        .filter(|tool| {
            query.is_empty()
                || tool.title.to_lowercase().contains(&query)
                || tool.description.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn popular() -> Vec<&'static ToolPage> {
    TOOLS.iter().filter(|tool| tool.popular).collect()
}

pub fn find(slug: &str) -> Option<&'static ToolPage> {
    TOOLS.iter().find(|tool| tool.slug == slug)
}

/// Page hosting an operation
pub fn page_for_operation(operation: &str) -> Option<&'static ToolPage> {
    TOOLS.iter().find(|tool| tool.operations.contains(&operation))
}

#[derive(Deserialize, Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[strum(serialize = "light")]
    Light,
    #[strum(serialize = "dark")]
    Dark,
    #[default]
    #[strum(serialize = "system")]
    System,
}

/// Shell-wide settings passed to the presentation layer at startup
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShellConfig {
    pub theme: Theme,
    pub site_name: String,
    pub repository: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> ShellConfig {
        ShellConfig {
            theme: Theme::System,
            site_name: "DevUtils".to_string(),
            repository: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::TransformRegistry;

    #[test]
    fn test_catalog_counts() {
        assert_eq!(catalog().len(), 35);
        let counts: Vec<usize> = Category::ALL
            .iter()
            .map(|c| filter(Some(*c), "").len())
            .collect();
        assert_eq!(counts, vec![12, 10, 6, 7]);
        let shell_only = catalog().iter().filter(|t| t.operations.is_empty()).count();
        assert_eq!(shell_only, 17);
        assert_eq!(find("regex-tester").map(|t| t.category), Some(Category::Formatters));
    }

    #[test]
    fn test_every_operation_has_a_page() {
        let registry = TransformRegistry::default();
        for name in registry.names() {
            assert!(page_for_operation(name).is_some(), "no page for {}", name);
        }
        for tool in catalog() {
            for operation in tool.operations {
                assert!(registry.contains(operation), "{} is not registered", operation);
            }
        }
    }

    #[test]
    fn test_slugs_are_unique() {
        let mut slugs: Vec<&str> = catalog().iter().map(|t| t.slug).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), catalog().len());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let found = filter(None, "  TOKEN ");
        assert!(found.iter().any(|t| t.slug == "token-counter"));
        assert!(found.iter().any(|t| t.slug == "jwt-decoder"));
        assert_eq!(filter(None, "").len(), catalog().len());
        assert!(filter(Some(Category::Generators), "json").is_empty());
    }

    #[test]
    fn test_popular_tools() {
        let popular: Vec<&str> = popular().iter().map(|t| t.slug).collect();
        assert_eq!(
            popular,
            vec![
                "url-encoderdecoder",
                "jwt-decoder",
                "password-generator",
                "json-formatter",
                "linkedin-counter",
                "token-counter",
            ]
        );
    }

    #[test]
    fn test_category_ids() {
        for category in Category::ALL {
            assert_eq!(Category::from_id(&category.to_string()), Some(category));
        }
        assert_eq!(Category::from_id("all"), None);
    }

    #[test]
    fn test_shell_config() {
        let config: ShellConfig = toml::from_str("theme = \"dark\"").unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.site_name, "DevUtils");
        assert_eq!(ShellConfig::default().theme.to_string(), "system");
    }
}
