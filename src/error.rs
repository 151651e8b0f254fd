use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Everything that can go wrong in the page. The `Display` text is what the
/// user sees in the warning dialog.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please select a valid Markdown (.md) file")]
    InvalidSource { name: String, media_type: String },
    #[error("Failed to load {what}")]
    ReadFailed { what: String, reason: String },
    #[error("Another file is still loading")]
    LoadInProgress,
    #[error("No content to download")]
    EmptyExport,
    #[error("Download failed: {0}")]
    DownloadFailed(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("browser API unavailable: {0}")]
    Browser(String),
}

impl AppError {
    pub fn read_failed(what: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            what: what.into(),
            reason: reason.into(),
        }
    }
}

/// Best-effort text for a thrown JS value.
pub fn describe_js(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Log the failure and raise it as a browser alert. The session is never
/// touched here; callers have already left it in a stable state.
pub fn notify(err: &AppError) {
    match err {
        AppError::ReadFailed { what, reason } => {
            tracing::warn!(%what, %reason, "read failed");
        }
        AppError::InvalidSource { name, media_type } => {
            tracing::warn!(%name, %media_type, "rejected non-markdown source");
        }
        other => tracing::warn!(error = %other, "user warning"),
    }

    let Some(window) = web_sys::window() else {
        return;
    };
    if let Err(e) = window.alert_with_message(&err.to_string()) {
        tracing::debug!("alert failed: {}", describe_js(&e));
    }
}
