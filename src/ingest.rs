use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, Response};

use crate::error::{describe_js, AppError};

pub const MARKDOWN_MEDIA_TYPE: &str = "text/markdown";
const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".markdown"];

/// A file the user offered through the picker or a drop, before any bytes
/// are read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkdownSource {
    pub name: String,
    pub media_type: String,
}

impl MarkdownSource {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
        }
    }

    pub fn from_file(file: &File) -> Self {
        Self::new(file.name(), file.type_())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let lower = self.name.to_ascii_lowercase();
        let has_extension = MARKDOWN_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
        if self.media_type == MARKDOWN_MEDIA_TYPE || has_extension {
            Ok(())
        } else {
            Err(AppError::InvalidSource {
                name: self.name.clone(),
                media_type: self.media_type.clone(),
            })
        }
    }
}

pub async fn read_file(file: &File) -> Result<String, AppError> {
    let name = file.name();
    let value = JsFuture::from(file.text())
        .await
        .map_err(|e| AppError::read_failed(name.clone(), describe_js(&e)))?;
    value
        .as_string()
        .ok_or_else(|| AppError::read_failed(name, "file contents were not text"))
}

/// Fetches a bundled asset relative to the page. Non-2xx responses count as
/// failures rather than being ingested as text.
pub async fn fetch_text(path: &str, what: &str) -> Result<String, AppError> {
    let fail = |reason: String| AppError::read_failed(what, reason);

    let window = web_sys::window().ok_or_else(|| AppError::Browser("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fail(describe_js(&e)))?
        .dyn_into()
        .map_err(|e| fail(describe_js(&e)))?;

    if !response.ok() {
        return Err(fail(format!("HTTP {} for {path}", response.status())));
    }

    let body = response.text().map_err(|e| fail(describe_js(&e)))?;
    JsFuture::from(body)
        .await
        .map_err(|e| fail(describe_js(&e)))?
        .as_string()
        .ok_or_else(|| fail("response body was not text".into()))
}
