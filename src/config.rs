use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::AppError;

/// Id of the optional inline JSON block in `index.html`.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub sample_path: String,
    pub sample_name: String,
    pub default_file_name: String,
    pub edited_marker: String,
    pub narrow_breakpoint: f64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sample_path: "./assets/sample.md".to_string(),
            sample_name: "sample.md".to_string(),
            default_file_name: "document.md".to_string(),
            edited_marker: "_edited".to_string(),
            narrow_breakpoint: 1024.0,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|e| AppError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the inline config block, if the page has one.
    pub fn from_document() -> Result<Self, AppError> {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match text {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("sample_path", &self.sample_path),
            ("sample_name", &self.sample_name),
            ("default_file_name", &self.default_file_name),
            ("edited_marker", &self.edited_marker),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{field} must not be empty")));
            }
        }
        if !(self.narrow_breakpoint.is_finite() && self.narrow_breakpoint > 0.0) {
            return Err(AppError::Config(format!(
                "narrow_breakpoint must be positive, got {}",
                self.narrow_breakpoint
            )));
        }
        self.max_log_level()?;
        Ok(())
    }

    pub fn max_log_level(&self) -> Result<tracing::Level, AppError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| AppError::Config(format!("unknown log level {:?}", self.log_level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "narrow_breakpoint": 768 }"#).unwrap();
        assert_eq!(config.narrow_breakpoint, 768.0);
        assert_eq!(config.default_file_name, "document.md");
        assert_eq!(config.edited_marker, "_edited");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            AppConfig::from_json(r#"{ "edited_marker": "" }"#),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "narrow_breakpoint": -1 }"#),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_json(r#"{ "log_level": "loud" }"#),
            Err(AppError::Config(_))
        ));
        assert!(AppConfig::from_json("not json").is_err());
    }

    #[test]
    fn parses_log_level() {
        let config = AppConfig {
            log_level: "debug".into(),
            ..AppConfig::default()
        };
        assert_eq!(config.max_log_level().unwrap(), tracing::Level::DEBUG);
    }
}
