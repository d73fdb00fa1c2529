//! Host-facing configuration
//!
//! Mirrors the `paredit.*` settings a host exposes: the starting key map,
//! whether commands run at all, the languages they run in and the closing
//! bracket guard of strict mode.

use super::errors::{EditorError, Result};
use paredit_core::PareditMode;

/// Languages commands run in when nothing else is configured
pub const DEFAULT_LANGUAGES: [&str; 3] = ["clojure", "lisp", "scheme"];

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct PareditConfig {
    /// Mode a new session starts in
    pub default_key_map: PareditMode,

    /// Whether structural commands run at all
    pub enabled: bool,

    /// Language identifiers commands run in, lowercase
    pub languages: Vec<String>,

    /// In strict mode, turn a typed unmatched closer into a move or nothing
    pub strict_prevent_unmatched_closing_bracket: bool,
}

impl Default for PareditConfig {
    fn default() -> Self {
        Self {
            default_key_map: PareditMode::Strict,
            enabled: true,
            languages: DEFAULT_LANGUAGES.iter().map(ToString::to_string).collect(),
            strict_prevent_unmatched_closing_bracket: true,
        }
    }
}

impl PareditConfig {
    /// Create the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting mode
    #[must_use]
    pub const fn with_default_key_map(mut self, mode: PareditMode) -> Self {
        self.default_key_map = mode;
        self
    }

    /// Enable or disable all commands
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Replace the language set
    #[must_use]
    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.languages = languages
            .into_iter()
            .map(|language| language.as_ref().trim().to_lowercase())
            .collect();
        self
    }

    /// Toggle the unmatched closing bracket guard
    #[must_use]
    pub const fn with_strict_prevent_unmatched_closing_bracket(mut self, on: bool) -> Self {
        self.strict_prevent_unmatched_closing_bracket = on;
        self
    }

    /// Check whether commands run for `language_id`
    #[must_use]
    pub fn supports_language(&self, language_id: &str) -> bool {
        self.languages
            .iter()
            .any(|language| language.eq_ignore_ascii_case(language_id))
    }

    /// Set one setting from its host key and string value
    ///
    /// Keys are the camel-case names hosts use, with or without a
    /// `paredit.` prefix. Languages are comma separated.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] for an unknown key or a value
    /// that does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let name = key.strip_prefix("paredit.").unwrap_or(key);
        match name {
            "defaultKeyMap" => {
                self.default_key_map = value
                    .parse()
                    .map_err(|_| EditorError::invalid_config(key, value))?;
            }
            "enabled" => self.enabled = parse_bool(key, value)?,
            "languages" => {
                self.languages = value
                    .split(',')
                    .map(str::trim)
                    .filter(|language| !language.is_empty())
                    .map(str::to_lowercase)
                    .collect();
            }
            "strictPreventUnmatchedClosingBracket" => {
                self.strict_prevent_unmatched_closing_bracket = parse_bool(key, value)?;
            }
            _ => return Err(EditorError::invalid_config(key, value)),
        }
        log::debug!("config {name} = {value}");
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "1" => Ok(true),
        "false" | "off" | "0" => Ok(false),
        _ => Err(EditorError::invalid_config(key, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_host_settings() {
        let config = PareditConfig::default();
        assert_eq!(config.default_key_map, PareditMode::Strict);
        assert!(config.enabled);
        assert!(config.strict_prevent_unmatched_closing_bracket);
        assert!(config.supports_language("clojure"));
        assert!(config.supports_language("Scheme"));
        assert!(!config.supports_language("rust"));
    }

    #[test]
    fn builder_methods() {
        let config = PareditConfig::new()
            .with_default_key_map(PareditMode::Original)
            .with_enabled(false)
            .with_languages([" Racket ", "fennel"]);
        assert_eq!(config.default_key_map, PareditMode::Original);
        assert!(!config.enabled);
        assert_eq!(config.languages, vec!["racket", "fennel"]);
    }

    #[test]
    fn set_from_host_keys() {
        let mut config = PareditConfig::default();
        config.set("paredit.defaultKeyMap", " Original ").unwrap();
        assert_eq!(config.default_key_map, PareditMode::Original);
        config.set("enabled", "false").unwrap();
        assert!(!config.enabled);
        config.set("languages", "clojure, janet,").unwrap();
        assert_eq!(config.languages, vec!["clojure", "janet"]);
        config
            .set("paredit.strictPreventUnmatchedClosingBracket", "off")
            .unwrap();
        assert!(!config.strict_prevent_unmatched_closing_bracket);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut config = PareditConfig::default();
        assert!(matches!(
            config.set("defaultKeyMap", "vim"),
            Err(EditorError::InvalidConfig { .. })
        ));
        assert!(config.set("enabled", "maybe").is_err());
        assert!(config.set("colour", "blue").is_err());
        assert_eq!(config, PareditConfig::default());
    }
}
