use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::constants::defaults;
use crate::error::*;
use crate::options::Options;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub json: JsonDefaults,
    pub password: PasswordDefaults,
    pub uuid: UuidDefaults,
    pub linkedin: LinkedInDefaults,
    pub tokens: TokenDefaults,
    pub session: SessionDefaults,
    /// Free-form option overrides keyed by operation id
    pub operations: HashMap<String, toml::Table>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct JsonDefaults {
    pub indent: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PasswordDefaults {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub numbers: bool,
    pub symbols: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct UuidDefaults {
    pub count: usize,
    pub uppercase: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LinkedInDefaults {
    pub content: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TokenDefaults {
    pub model: String,
    pub context_limit: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionDefaults {
    /// Milliseconds before the copied flag of a session resets
    pub copied_reset_ms: u64,
}

impl Default for JsonDefaults {
    fn default() -> JsonDefaults {
        JsonDefaults {
            indent: defaults::JSON_INDENT,
        }
    }
}

impl Default for PasswordDefaults {
    fn default() -> PasswordDefaults {
        PasswordDefaults {
            length: defaults::PASSWORD_LENGTH,
            lowercase: true,
            uppercase: true,
            numbers: true,
            symbols: true,
        }
    }
}

impl Default for UuidDefaults {
    fn default() -> UuidDefaults {
        UuidDefaults {
            count: defaults::UUID_COUNT,
            uppercase: false,
        }
    }
}

impl Default for LinkedInDefaults {
    fn default() -> LinkedInDefaults {
        LinkedInDefaults {
            content: defaults::LINKEDIN_CONTENT.to_string(),
        }
    }
}

impl Default for TokenDefaults {
    fn default() -> TokenDefaults {
        TokenDefaults {
            model: defaults::TOKEN_MODEL.to_string(),
            context_limit: defaults::TOKEN_CONTEXT_LIMIT,
        }
    }
}

impl Default for SessionDefaults {
    fn default() -> SessionDefaults {
        SessionDefaults {
            copied_reset_ms: defaults::COPIED_RESET_MS,
        }
    }
}

impl EngineConfig {
    /// Parses the configuration from TOML text supplied by the host.
    /// Missing sections and keys keep their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use devutils::config::EngineConfig;
    ///
    /// let config = EngineConfig::from_toml_str("[password]\nlength = 24").unwrap();
    /// assert_eq!(config.password.length, 24);
    /// assert!(config.password.symbols);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=defaults::PASSWORD_MAX_LENGTH).contains(&self.password.length) {
            return Err(Error::ConfigError(format!(
                "password.length must be between 1 and {}",
                defaults::PASSWORD_MAX_LENGTH
            )));
        }
        if !(1..=defaults::UUID_MAX_COUNT).contains(&self.uuid.count) {
            return Err(Error::ConfigError(format!(
                "uuid.count must be between 1 and {}",
                defaults::UUID_MAX_COUNT
            )));
        }
        if self.tokens.context_limit == 0 {
            return Err(Error::ConfigError(
                "tokens.context_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Options a fresh tool instance of `operation` starts with
    pub fn defaults_for(&self, operation: &str) -> Options {
        let mut options = match operation {
            "json-pretty" | "csv-to-json" => Options::from([("indent", self.json.indent)]),
            "password-generate" => {
                let password = &self.password;
                Options::from([
                    ("lowercase", password.lowercase),
                    ("uppercase", password.uppercase),
                    ("numbers", password.numbers),
                    ("symbols", password.symbols),
                ])
                .with("length", password.length)
            }
            "uuid-v4" => Options::new()
                .with("count", self.uuid.count)
                .with("uppercase", self.uuid.uppercase),
            "linkedin-count" => Options::new().with("content", &self.linkedin.content),
            "token-count" => Options::new()
                .with("model", &self.tokens.model)
                .with("context_limit", self.tokens.context_limit),
            _ => Options::new(),
        };
        if let Some(overrides) = self.operations.get(operation) {
            options.extend(overrides.iter());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.session.copied_reset_ms, 2000);
        assert_eq!(config.tokens.model, "gpt-4");
    }

    #[test]
    fn test_defaults_for_operation() {
        let config = EngineConfig::from_toml_str(
            r#"
            [json]
            indent = 4

            [uuid]
            count = 3
            uppercase = true
            "#,
        )
        .unwrap();
        assert_eq!(config.defaults_for("json-pretty").usize_or("indent", 0).unwrap(), 4);
        let uuid = config.defaults_for("uuid-v4");
        assert_eq!(uuid.usize_or("count", 0).unwrap(), 3);
        assert!(uuid.flag_or("uppercase", false).unwrap());
        assert!(config.defaults_for("base64-encode").is_empty());
    }

    #[test]
    fn test_operation_overrides() {
        let config = EngineConfig::from_toml_str(
            r#"
            [password]
            length = 20

            [operations.password-generate]
            length = 32
            symbols = false

            [operations.slug]
            separator = "_"
            "#,
        )
        .unwrap();
        let password = config.defaults_for("password-generate");
        assert_eq!(password.usize_or("length", 0).unwrap(), 32);
        assert!(!password.flag_or("symbols", true).unwrap());
        assert!(password.flag_or("numbers", false).unwrap());
        assert_eq!(config.defaults_for("slug").get("separator"), Some("_"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            EngineConfig::from_toml_str("[uuid]\ncount = 0"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[json\nindent = 2"),
            Err(Error::ConfigError(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml_str("[json]\nindent = \"wide\""),
            Err(Error::ConfigError(_))
        ));
    }
}
