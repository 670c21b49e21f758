//! Theme preference persistence.
//!
//! The preference is read at startup (falling back to the system preference
//! queried from the webview) and written on every toggle.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur while persisting the theme preference
#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Failed to read theme file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse theme file: {0}")]
    ParseError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// CSS class applied to the app root
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Load the persisted preference.
    /// Returns `None` if the file doesn't exist or can't be parsed.
    #[must_use]
    pub fn load() -> Option<Self> {
        let path = looptube_core::theme_path();

        if !path.exists() {
            return None;
        }

        match read_preference(&path) {
            Ok(theme) => {
                info!("Loaded theme preference from {:?}", path);
                Some(theme)
            }
            Err(e) => {
                warn!("Failed to load theme preference: {}", e);
                None
            }
        }
    }

    /// Persist the preference. Failures are logged, never fatal.
    pub fn save(self) {
        let path = looptube_core::theme_path();

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create theme preference directory: {}", e);
                return;
            }
        }

        match serde_json::to_string(&self) {
            Ok(content) => {
                if let Err(e) = fs::write(&path, content) {
                    warn!("Failed to write theme preference: {}", e);
                }
            }
            Err(e) => {
                warn!("Failed to serialize theme preference: {}", e);
            }
        }
    }
}

fn read_preference(path: &std::path::Path) -> Result<ThemePreference, ThemeError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Query the system color-scheme preference from the webview.
pub async fn detect_system() -> Option<ThemePreference> {
    let mut eval = document::eval(
        r#"dioxus.send(window.matchMedia("(prefers-color-scheme: dark)").matches);"#,
    );
    match eval.recv::<bool>().await {
        Ok(true) => Some(ThemePreference::Dark),
        Ok(false) => Some(ThemePreference::Light),
        Err(e) => {
            warn!("Failed to query system color scheme: {:?}", e);
            None
        }
    }
}
