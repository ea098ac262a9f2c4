use serde::Deserialize;
use std::collections::HashMap;

use crate::config::settings::SettingsConfig;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    /// token name -> token config, fixed for the process lifetime
    #[serde(default)]
    pub tokens: HashMap<String, TokenConfig>,
}

/// ================================
/// Tokens
/// ================================
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct TokenConfig {
    #[serde(default)]
    pub scope: Vec<String>,
}

impl TokenConfig {
    pub fn new<S: Into<String>>(scope: impl IntoIterator<Item = S>) -> Self {
        Self {
            scope: scope.into_iter().map(Into::into).collect(),
        }
    }

    /// Scopes as sent in the `scope` form field.
    pub fn scope_param(&self) -> String {
        self.scope.join(" ")
    }
}
