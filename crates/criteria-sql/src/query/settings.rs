//! Translator configuration.

use crate::query::dialect::{Dialect, MySql, Postgres, Sqlite};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when loading or validating translator settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings document is not valid JSON for [`TranslatorSettings`].
    #[error("Invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    /// The table alias is not a plain SQL identifier.
    #[error("Invalid table alias: {0:?}")]
    InvalidAlias(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    Postgres,
    #[default]
    MySql,
    Sqlite,
}

impl DialectKind {
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::Postgres => &Postgres,
            DialectKind::MySql => &MySql,
            DialectKind::Sqlite => &Sqlite,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorSettings {
    /// Table alias prefixed to every column
    pub alias: String,
    /// SQL dialect used for placeholders
    pub dialect: DialectKind,
    /// Reject operator/value mismatches instead of emitting them
    pub strict: bool,
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            alias: "te".to_string(),
            dialect: DialectKind::default(),
            strict: false,
        }
    }
}

impl TranslatorSettings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: TranslatorSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut chars = self.alias.chars();
        let valid = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid {
            Ok(())
        } else {
            Err(SettingsError::InvalidAlias(self.alias.clone()))
        }
    }
}
