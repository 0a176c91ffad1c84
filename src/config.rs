use serde::Deserialize;
use std::fs;
use std::path::Path;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub document: DocumentConfig,
    pub code: CodeConfig,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DocumentConfig {
    /// Element wrapping the rendered document.
    pub root_tag: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            root_tag: "div".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodeConfig {
    pub language_class: bool,
    pub class_prefix: String,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            language_class: true,
            class_prefix: "language-".to_string(),
        }
    }
}

impl CodeConfig {
    /// The class attribute value for a code block, if one should be emitted.
    pub fn class_for(&self, language: Option<&str>) -> Option<String> {
        match language {
            Some(lang) if self.language_class => Some(format!("{}{}", self.class_prefix, lang)),
            _ => None,
        }
    }
}

impl Config {
    /// The bundled default config (validated at build time).
    pub fn compiled_default() -> Self {
        match toml::from_str(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "bundled config does not match schema, using defaults");
                Self::default()
            }
        }
    }

    /// Load config from a TOML file, or return defaults if it can't be read.
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config, using defaults");
                return Self::compiled_default();
            }
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::compiled_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bundled_config_deserializes() {
        let parsed: Result<Config, _> = toml::from_str(DEFAULT_CONFIG);
        assert!(parsed.is_ok(), "default_config.toml: {parsed:?}");
        let table: toml::Table = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert!(table.contains_key("document") && table.contains_key("code"));
    }

    #[test]
    fn compiled_default_matches_default() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[document]\nroot_tag = \"article\"\n").unwrap();
        assert_eq!(config.document.root_tag, "article");
        assert_eq!(config.code, CodeConfig::default());
    }

    #[test]
    fn code_class() {
        let code = CodeConfig::default();
        assert_eq!(code.class_for(Some("rust")).as_deref(), Some("language-rust"));
        assert_eq!(code.class_for(None), None);

        let code = CodeConfig {
            language_class: false,
            ..CodeConfig::default()
        };
        assert_eq!(code.class_for(Some("rust")), None);
    }

    #[test]
    fn missing_file_falls_back() {
        let config = Config::load(Path::new("/nonexistent/mdhtml.toml"));
        assert_eq!(config, Config::compiled_default());
    }
}
