use crate::session::ViewMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    SideBySide,
    EditorOnly,
    PreviewOnly,
}

pub fn is_narrow(viewport_width: f64, breakpoint: f64) -> bool {
    viewport_width < breakpoint
}

/// One session, two renderings: wide viewports show editor and preview
/// together and ignore the view mode.
pub fn resolve(viewport_width: f64, breakpoint: f64, mode: ViewMode) -> Layout {
    if !is_narrow(viewport_width, breakpoint) {
        return Layout::SideBySide;
    }
    match mode {
        ViewMode::Edit => Layout::EditorOnly,
        ViewMode::Preview => Layout::PreviewOnly,
    }
}

/// Current `innerWidth`, or a wide default when it cannot be read.
pub fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(f64::MAX)
}
