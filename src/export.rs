use regex::Regex;
use std::sync::OnceLock;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use crate::config::AppConfig;
use crate::error::{describe_js, AppError};
use crate::ingest::MARKDOWN_MEDIA_TYPE;
use crate::session::DocumentSession;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub contents: String,
}

fn markdown_suffix() -> &'static Regex {
    static RE_SUFFIX: OnceLock<Regex> = OnceLock::new();
    RE_SUFFIX.get_or_init(|| Regex::new(r"(?i)\.(md|markdown)$").unwrap())
}

/// Name for the downloaded file.
///
/// Unnamed sessions get the configured default. An edited session gets the
/// edited marker before the extension, once: a name already carrying the
/// marker is kept as is.
pub fn export_file_name(session: &DocumentSession, config: &AppConfig) -> String {
    let name = session.file_name.as_str();
    if name.is_empty() {
        return config.default_file_name.clone();
    }
    if !session.is_edited() || name.contains(&config.edited_marker) {
        return name.to_string();
    }
    let stem = markdown_suffix().replace(name, "");
    format!("{stem}{}.md", config.edited_marker)
}

pub fn prepare(session: &DocumentSession, config: &AppConfig) -> Result<ExportFile, AppError> {
    if session.current_text.trim().is_empty() {
        return Err(AppError::EmptyExport);
    }
    Ok(ExportFile {
        name: export_file_name(session, config),
        contents: session.current_text.clone(),
    })
}

/// Hands the file to the browser through a temporary object URL and a
/// synthetic anchor click. The URL is revoked whether or not the click
/// went through.
pub fn trigger_download(file: &ExportFile) -> Result<(), AppError> {
    let fail = |e: JsValue| AppError::DownloadFailed(describe_js(&e));

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(&file.contents));
    let opts = BlobPropertyBag::new();
    opts.set_type(MARKDOWN_MEDIA_TYPE);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &opts).map_err(fail)?;

    let url = Url::create_object_url_with_blob(&blob).map_err(fail)?;
    let clicked = click_download_link(&url, &file.name);
    if let Err(e) = Url::revoke_object_url(&url) {
        tracing::debug!("revoke_object_url failed: {}", describe_js(&e));
    }
    clicked?;

    tracing::info!(name = %file.name, bytes = file.contents.len(), "exported document");
    Ok(())
}

fn click_download_link(url: &str, name: &str) -> Result<(), AppError> {
    let fail = |e: JsValue| AppError::DownloadFailed(describe_js(&e));

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Browser("no document".into()))?;
    let body = document
        .body()
        .ok_or_else(|| AppError::Browser("no body".into()))?;

    let link: HtmlAnchorElement = document
        .create_element("a")
        .map_err(fail)?
        .dyn_into()
        .map_err(|_| AppError::DownloadFailed("anchor element has wrong type".into()))?;
    link.set_href(url);
    link.set_download(name);

    body.append_child(&link).map_err(fail)?;
    link.click();
    body.remove_child(&link).map_err(fail)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(text: &str, name: &str) -> DocumentSession {
        DocumentSession::new().begin_load().ingest(text.to_string(), name)
    }

    #[test]
    fn unnamed_session_uses_default_name() {
        let config = AppConfig::default();
        let session = DocumentSession::new().edit("typed".into());
        assert_eq!(export_file_name(&session, &config), "document.md");
    }

    #[test]
    fn unedited_file_keeps_its_name() {
        let config = AppConfig::default();
        assert_eq!(export_file_name(&loaded("x", "notes.md"), &config), "notes.md");
    }

    #[test]
    fn edited_file_gets_marker_once() {
        let config = AppConfig::default();
        let session = loaded("x", "notes.md").edit("y".into());
        assert_eq!(export_file_name(&session, &config), "notes_edited.md");

        let reloaded = loaded("y", "notes_edited.md").edit("z".into());
        assert_eq!(export_file_name(&reloaded, &config), "notes_edited.md");
    }

    #[test]
    fn edited_name_strips_suffix_case_insensitively() {
        let config = AppConfig::default();
        let session = loaded("x", "Guide.MARKDOWN").edit("y".into());
        assert_eq!(export_file_name(&session, &config), "Guide_edited.md");

        let session = loaded("x", "notes.md.md").edit("y".into());
        assert_eq!(export_file_name(&session, &config), "notes.md_edited.md");
    }

    #[test]
    fn custom_marker_is_respected() {
        let config = AppConfig {
            edited_marker: "-draft".into(),
            ..AppConfig::default()
        };
        let session = loaded("x", "plan.md").edit("y".into());
        assert_eq!(export_file_name(&session, &config), "plan-draft.md");
    }

    #[test]
    fn refuses_blank_content() {
        let config = AppConfig::default();
        assert_eq!(
            prepare(&DocumentSession::new(), &config),
            Err(AppError::EmptyExport)
        );
        let blank = loaded("body", "a.md").edit(" \n\t ".into());
        assert_eq!(prepare(&blank, &config), Err(AppError::EmptyExport));
    }

    #[test]
    fn report_scenario() {
        let config = AppConfig::default();
        let session = loaded("# Hi", "report.md");
        assert!(!session.is_edited());

        let session = session.edit("# Hi!".into());
        assert!(session.is_edited());
        assert_eq!(
            prepare(&session, &config).unwrap(),
            ExportFile {
                name: "report_edited.md".into(),
                contents: "# Hi!".into(),
            }
        );
    }
}
