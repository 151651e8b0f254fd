use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::prelude::*;
use web_sys::{File, HtmlInputElement};

use crate::config::AppConfig;
use crate::error::{notify, AppError};
use crate::export;
use crate::ingest::{self, MarkdownSource};
use crate::layout::{self, Layout};
use crate::render::render_markdown;
use crate::session::DocumentSession;

const REPOSITORY_URL: &str = "https://github.com/sa-fw-an/markdown-parser";
const PROFILE_URL: &str = "https://github.com/sa-fw-an";
const AUTHOR_URL: &str = "https://www.safwansayeed.live";

/// Start a read if the session's gate allows it. Refusals leave the session
/// as it was; a busy refusal is only logged since the controls are disabled.
fn try_start(
    session: RwSignal<DocumentSession>,
    gate: impl FnOnce(&DocumentSession) -> Result<DocumentSession, AppError>,
) -> bool {
    match session.with_untracked(gate) {
        Ok(next) => {
            session.set(next);
            true
        }
        Err(AppError::LoadInProgress) => {
            tracing::debug!("ignoring ingestion while another read is in flight");
            false
        }
        Err(err) => {
            notify(&err);
            false
        }
    }
}

/// Replace the session wholesale with the result of a transition.
fn transition(
    session: RwSignal<DocumentSession>,
    f: impl FnOnce(DocumentSession) -> DocumentSession,
) {
    session.update(|s| *s = f(std::mem::take(s)));
}

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    let breakpoint = config.narrow_breakpoint;
    let config = StoredValue::new(config);

    let session = RwSignal::new(DocumentSession::new());
    let viewport_width = RwSignal::new(layout::viewport_width());
    let file_input: NodeRef<html::Input> = NodeRef::new();

    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |_: web_sys::Event| {
        viewport_width.set(layout::viewport_width());
    });
    let _ = window().add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
    closure.forget();

    let is_edited = Memo::new(move |_| session.with(DocumentSession::is_edited));
    let is_loaded = Memo::new(move |_| session.with(|s| s.is_loaded));
    let is_loading = Memo::new(move |_| session.with(|s| s.is_loading));
    let has_content = Memo::new(move |_| session.with(DocumentSession::has_content));
    let file_name = Memo::new(move |_| session.with(|s| s.file_name.clone()));
    let preview_html = Memo::new(move |_| session.with(|s| render_markdown(&s.current_text)));
    let narrow = Memo::new(move |_| layout::is_narrow(viewport_width.get(), breakpoint));
    let page_layout = Memo::new(move |_| {
        layout::resolve(viewport_width.get(), breakpoint, session.with(|s| s.view_mode))
    });

    let ingest_file = move |file: File| {
        let source = MarkdownSource::from_file(&file);
        if !try_start(session, |s| s.try_begin_file_load(&source)) {
            return;
        }
        tracing::info!(name = %source.name, "reading file");
        spawn_local(async move {
            match ingest::read_file(&file).await {
                Ok(text) => {
                    tracing::info!(name = %source.name, bytes = text.len(), "ingested file");
                    transition(session, move |s| s.ingest(text, source.name));
                }
                Err(err) => {
                    transition(session, DocumentSession::load_failed);
                    notify(&err);
                }
            }
        });
    };

    let load_sample = move |_| {
        if !try_start(session, DocumentSession::try_begin_load) {
            return;
        }
        let (path, name) = config.with_value(|c| (c.sample_path.clone(), c.sample_name.clone()));
        tracing::info!(%path, "loading sample");
        spawn_local(async move {
            match ingest::fetch_text(&path, "sample content").await {
                Ok(text) => transition(session, move |s| s.ingest(text, name)),
                Err(err) => {
                    transition(session, DocumentSession::load_failed);
                    notify(&err);
                }
            }
        });
    };

    let reset_picker = move || {
        if let Some(input) = file_input.get_untracked() {
            input.set_value("");
        }
    };

    let clear_content = move |_| {
        tracing::info!("clearing session");
        transition(session, DocumentSession::clear);
        reset_picker();
    };

    let start_fresh = move |_| {
        tracing::info!("starting fresh");
        transition(session, DocumentSession::start_fresh);
        reset_picker();
    };

    let download = move |_| {
        let result = session.with_untracked(|s| config.with_value(|c| export::prepare(s, c)));
        if let Err(err) = result.and_then(|file| export::trigger_download(&file)) {
            notify(&err);
        }
    };

    let toggle_preview = move |_| {
        let narrow = narrow.get_untracked();
        transition(session, move |s| s.toggle_view(narrow));
    };

    let on_file_change = move |ev: leptos::ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            ingest_file(file);
        }
    };

    let on_drop = move |ev: leptos::ev::DragEvent| {
        ev.prevent_default();
        let Some(files) = ev.data_transfer().and_then(|dt| dt.files()) else {
            return;
        };
        if files.length() > 1 {
            tracing::debug!(count = files.length(), "only the first dropped file is used");
        }
        if let Some(file) = files.get(0) {
            ingest_file(file);
        }
    };

    let open_picker = move |_| {
        if is_loading.get_untracked() {
            return;
        }
        if let Some(input) = file_input.get_untracked() {
            input.click();
        }
    };

    let file_panel = move || {
        if is_loaded.get() {
            view! {
                <div class="panel" style="padding: 1.5rem;">
                    <div style="display: flex; align-items: center; justify-content: space-between; margin-bottom: 1rem;">
                        <h2 class="panel-title">"Loaded File"</h2>
                        <button class="icon-button danger" on:click=clear_content aria-label="Remove file">"×"</button>
                    </div>
                    <div class="file-badge">
                        <span class="file-name">{move || file_name.get()}</span>
                        <Show when=move || is_edited.get()>
                            <span class="modified">"• Modified"</span>
                        </Show>
                    </div>
                    <div class="button-row">
                        <button class="button success" on:click=download>
                            {move || if is_edited.get() { "Download Edited" } else { "Download" }}
                        </button>
                        <button class="button muted" on:click=clear_content>"Clear All"</button>
                    </div>
                </div>
            }
            .into_any()
        } else {
            view! {
                <div class="panel" style="padding: 1.5rem;">
                    <h2 class="panel-title" style="margin-bottom: 1rem;">"Upload Markdown File"</h2>
                    <div
                        class="drop-zone"
                        class:disabled=move || is_loading.get()
                        aria-disabled=move || if is_loading.get() { "true" } else { "false" }
                        on:drop=on_drop
                        on:dragover=move |ev: leptos::ev::DragEvent| ev.prevent_default()
                        on:click=open_picker
                    >
                        <p style="margin: 0; font-weight: 500;">"Drop your markdown file here, or click to browse"</p>
                        <p style="margin: 0.25rem 0 0; font-size: 0.75rem; color: var(--text-muted);">"Supports .md files"</p>
                    </div>
                    <div class="button-row">
                        <button class="button primary" on:click=load_sample prop:disabled=move || is_loading.get()>
                            {move || if is_loading.get() { "Loading..." } else { "Load Sample" }}
                        </button>
                        <button class="button muted" on:click=start_fresh>"Start Fresh"</button>
                    </div>
                </div>
            }
            .into_any()
        }
    };

    let editor_pane = move || {
        view! {
            <div class="panel" style="flex: 1; display: flex; flex-direction: column; min-height: 0;">
                <div class="panel-header"><h2 class="panel-title">"Markdown Editor"</h2></div>
                <textarea
                    class="editor"
                    prop:value=move || session.with(|s| s.current_text.clone())
                    on:input=move |ev| {
                        let text = event_target_value(&ev);
                        transition(session, move |s| s.edit(text));
                    }
                    placeholder="Type or paste your markdown content here..."
                    spellcheck="false"
                ></textarea>
            </div>
        }
    };

    let preview_pane = move || {
        view! {
            <div class="panel" style="flex: 1; display: flex; flex-direction: column; min-height: 0;">
                <div class="panel-header"><h2 class="panel-title">"Live Preview"</h2></div>
                {move || if has_content.get() {
                    view! { <div class="preview markdown-body" inner_html=move || preview_html.get()></div> }.into_any()
                } else {
                    view! {
                        <div class="preview empty">
                            <h3>"No content to preview"</h3>
                            <p>"Upload a markdown file or start typing to see the live preview"</p>
                        </div>
                    }
                    .into_any()
                }}
            </div>
        }
    };

    let main_view = move || match page_layout.get() {
        Layout::SideBySide => view! {
            <div class="columns">
                <div class="column">{file_panel}{editor_pane()}</div>
                <div class="column">{preview_pane()}</div>
            </div>
        }
        .into_any(),
        Layout::EditorOnly => view! {
            <div class="column">{file_panel}{editor_pane()}</div>
        }
        .into_any(),
        Layout::PreviewOnly => view! { <div class="column">{preview_pane()}</div> }.into_any(),
    };

    view! {
        <div class="app-layout">
            <header class="topbar">
                <div>
                    <h1 style="margin: 0; font-size: 1.25rem;">"Markdown Parser"</h1>
                    <p style="margin: 0; font-size: 0.85rem; color: var(--text-muted);">"Beautiful markdown rendering"</p>
                </div>
                <div style="display: flex; gap: 0.5rem; align-items: center;">
                    <Show when=move || has_content.get()>
                        <button class="icon-button success" on:click=download aria-label="Download file">"⬇"</button>
                    </Show>
                    <Show when=move || narrow.get()>
                        <button class="icon-button" on:click=toggle_preview aria-label="Toggle preview">"👁"</button>
                    </Show>
                    <a class="icon-button" href=PROFILE_URL target="_blank" rel="noopener noreferrer" aria-label="View on GitHub">"GitHub"</a>
                </div>
            </header>
            <input
                node_ref=file_input
                type="file"
                accept=".md,.markdown"
                style="display: none;"
                on:change=on_file_change
            />
            <main class="content">{main_view}</main>
            <footer class="footer">
                <div>
                    <p style="margin: 0 0 0.5rem; font-size: 0.875rem;">
                        "Built with ❤️ by "
                        <a href=AUTHOR_URL target="_blank" rel="noopener noreferrer">"Safwan Sayeed"</a>
                    </p>
                    <p style="margin: 0; font-size: 0.75rem; color: var(--text-muted);">"Beautiful markdown rendering made simple"</p>
                </div>
                <div style="display: flex; gap: 1.5rem;">
                    <div style="text-align: center;">
                        <p class="footer-label">"Want to contribute?"</p>
                        <a href=REPOSITORY_URL target="_blank" rel="noopener noreferrer">"Repository"</a>
                    </div>
                    <div style="text-align: center;">
                        <p class="footer-label">"Follow me"</p>
                        <a href=PROFILE_URL target="_blank" rel="noopener noreferrer">"@sa-fw-an"</a>
                    </div>
                </div>
            </footer>
        </div>
    }
}
