use super::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

pub struct TransformRegistry {
    transforms: HashMap<String, Arc<Box<dyn Transform>>>,
    order: Vec<String>,
}

impl Default for TransformRegistry {
    fn default() -> Self {
        let mut registry = TransformRegistry::new();
        registry.init();
        registry
    }
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self {
            transforms: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Initializes the registry with the built-in operations
    pub fn init(&mut self) {
        self.register("base64-encode", Base64Encode::new());
        self.register("base64-decode", Base64Decode::new());
        self.register("url-encode", UrlEncode::new());
        self.register("url-decode", UrlDecode::new());
        self.register("html-encode", HtmlEncode::new());
        self.register("html-decode", HtmlDecode::new());
        self.register("json-pretty", JsonPretty::new());
        self.register("json-minify", JsonMinify::new());
        self.register("json-validate", JsonValidate::new());
        self.register("jwt-decode", JwtDecode::new());
        self.register("csv-to-json", CsvToJson::new());
        self.register("json-to-csv", JsonToCsv::new());
        self.register("password-generate", PasswordGenerator::new());
        self.register("uuid-v4", UuidGenerator::new());
        self.register("char-count", CharCounter::new());
        self.register("word-count", WordCounter::new());
        self.register("line-count", LineCounter::new());
        self.register("linkedin-count", LinkedInCounter::new());
        self.register("token-count", TokenCounter::new());
        self.register("char-frequency", CharFrequency::new());
        self.register("text-diff", TextDiff::new());
        self.register("slug", Slugify::new());
        self.register("case-convert", CaseConverter::new());
        self.register("http-status", HttpStatusLookup::new());
    }

    /// Registers an operation. Registering an existing name replaces the
    /// handler but keeps its original position.
    pub fn register<T: Transform + 'static>(&mut self, name: &str, transform: T) {
        let boxed = Arc::new(Box::new(transform) as Box<dyn Transform>);
        if self.transforms.insert(name.to_string(), boxed).is_none() {
            self.order.push(name.to_string());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Box<dyn Transform>>> {
        self.transforms.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Operation names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Global transform manager that provides shared access to the default registry
pub struct TransformManager {
    registry: Arc<TransformRegistry>,
}

impl TransformManager {
    /// Gets a reference to the global transform manager
    pub fn get() -> &'static TransformManager {
        static INSTANCE: Lazy<TransformManager> = Lazy::new(|| TransformManager {
            registry: Arc::new(TransformRegistry::default()),
        });
        &INSTANCE
    }

    /// Gets a clone of the shared registry
    pub fn share(&self) -> Arc<TransformRegistry> {
        Arc::clone(&self.registry)
    }

    /// Gets a transform by name
    pub fn get_transform(&self, name: &str) -> Option<&Arc<Box<dyn Transform>>> {
        self.registry.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Upper;

    impl Transform for Upper {
        fn transform(&self, text: &str, _options: &Options) -> Result<Transformed> {
            Ok(Transformed::new(text.to_uppercase()))
        }
    }

    #[test]
    fn test_default_registry_has_every_operation() {
        let registry = TransformRegistry::default();
        for name in [
            "base64-encode",
            "url-decode",
            "json-pretty",
            "csv-to-json",
            "uuid-v4",
            "linkedin-count",
            "text-diff",
            "slug",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert_eq!(registry.names().next(), Some("base64-encode"));
        assert_eq!(registry.len(), registry.names().count());
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = TransformRegistry::new();
        registry.register("a", Upper);
        registry.register("b", Upper);
        registry.register("a", Upper);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);

        let out = registry
            .get("a")
            .unwrap()
            .transform("abc", &Options::new())
            .unwrap();
        assert_eq!(out.output, "ABC");
    }

    #[test]
    fn test_manager_shares_one_registry() {
        let first = TransformManager::get().share();
        let second = TransformManager::get().share();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(TransformManager::get().get_transform("slug").is_some());
    }
}
