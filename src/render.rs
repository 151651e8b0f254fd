use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag};

const BLOCKED_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options
}

/// Browsers drop tabs, newlines and control characters inside a scheme, so
/// `java\tscript:` must be caught too.
fn is_blocked_url(url: &str) -> bool {
    let normalized: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .take(16)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCKED_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_blocked_url(&url) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}

/// Markdown to preview HTML. Never fails; malformed input just renders as
/// whatever the parser makes of it. Raw HTML in the source is shown as text
/// and script-capable link or image targets are replaced with `#`.
pub fn render_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(text, options()).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        }),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
