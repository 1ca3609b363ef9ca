use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Configuration for a [`Defaults`](crate::Defaults) facade.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Prepended verbatim to every key the facade hands out, e.g. `"app."`.
    pub key_prefix: Option<String>,
    /// When `true`, entries from one facade share a lock held for the whole
    /// of each batched change, so concurrent batched changes cannot
    /// interleave their before/after reads.
    pub serialize_batches: bool,
}

impl DefaultsConfig {
    /// Parse from TOML and validate.
    ///
    /// ```toml
    /// key_prefix = "app."
    /// serialize_batches = true
    /// ```
    pub fn from_toml_str(s: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject prefixes that cannot sensibly namespace keys.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(prefix) = &self.key_prefix {
            if prefix.is_empty() {
                return Err(ConfigError::InvalidPrefix {
                    prefix: prefix.clone(),
                    reason: "must not be empty, omit it instead".into(),
                });
            }
            if prefix.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidPrefix {
                    prefix: prefix.clone(),
                    reason: "must not contain whitespace".into(),
                });
            }
        }
        Ok(())
    }

    /// The store key for a caller-supplied key.
    pub fn qualify(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = DefaultsConfig::default();
        assert!(c.key_prefix.is_none());
        assert!(!c.serialize_batches);
        assert_eq!(c.qualify("theme"), "theme");
    }

    #[test]
    fn parse_toml() {
        let c = DefaultsConfig::from_toml_str("key_prefix = \"app.\"\nserialize_batches = true\n")
            .unwrap();
        assert_eq!(c.key_prefix.as_deref(), Some("app."));
        assert!(c.serialize_batches);
        assert_eq!(c.qualify("theme"), "app.theme");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let c = DefaultsConfig::from_toml_str("").unwrap();
        assert_eq!(c, DefaultsConfig::default());
    }

    #[test]
    fn reject_bad_prefix() {
        let err = DefaultsConfig::from_toml_str("key_prefix = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPrefix { .. }));

        let err = DefaultsConfig::from_toml_str("key_prefix = \"my app.\"").unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }

    #[test]
    fn reject_malformed_toml() {
        let err = DefaultsConfig::from_toml_str("serialize_batches = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
