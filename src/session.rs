use crate::error::AppError;
use crate::ingest::MarkdownSource;

/// Which pane the narrow layout shows. Ignored when both panes fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Edit,
    Preview,
}

impl ViewMode {
    pub fn flipped(self) -> Self {
        match self {
            Self::Edit => Self::Preview,
            Self::Preview => Self::Edit,
        }
    }
}

/// The one document held by the page.
///
/// Transitions consume the old value and hand back a new one, so the page
/// replaces its session wholesale on every event. Whether the text has been
/// edited is always derived, see [`DocumentSession::is_edited`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentSession {
    pub current_text: String,
    pub original_text: String,
    pub file_name: String,
    pub is_loaded: bool,
    pub is_loading: bool,
    pub view_mode: ViewMode,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_edited(&self) -> bool {
        self.is_loaded && self.current_text != self.original_text
    }

    pub fn has_content(&self) -> bool {
        !self.current_text.is_empty()
    }

    /// Ingestion controls are disabled while a read is in flight.
    pub fn can_ingest(&self) -> bool {
        !self.is_loading
    }

    pub fn begin_load(self) -> Self {
        Self {
            is_loading: true,
            ..self
        }
    }

    /// Gate for every ingestion: refused while another read is in flight.
    /// On refusal the caller keeps its current session untouched.
    pub fn try_begin_load(&self) -> Result<Self, AppError> {
        if !self.can_ingest() {
            return Err(AppError::LoadInProgress);
        }
        Ok(self.clone().begin_load())
    }

    /// Gate for a user-offered file: busy check first, then the Markdown
    /// check. Nothing changes unless both pass.
    pub fn try_begin_file_load(&self, source: &MarkdownSource) -> Result<Self, AppError> {
        let next = self.try_begin_load()?;
        source.validate()?;
        Ok(next)
    }

    /// Installs fully read source text as both the baseline and the live text.
    ///
    /// Reads are not cancelled when superseded: whichever read completes last
    /// lands here last and wins.
    pub fn ingest(self, source: String, name: impl Into<String>) -> Self {
        Self {
            original_text: source.clone(),
            current_text: source,
            file_name: name.into(),
            is_loaded: true,
            is_loading: false,
            view_mode: self.view_mode,
        }
    }

    /// A read failed. Only the loading flag changes.
    pub fn load_failed(self) -> Self {
        Self {
            is_loading: false,
            ..self
        }
    }

    pub fn edit(self, new_text: String) -> Self {
        Self {
            current_text: new_text,
            ..self
        }
    }

    pub fn clear(self) -> Self {
        Self::new()
    }

    /// Same resulting state as [`DocumentSession::clear`]; the page offers
    /// both as separate buttons.
    pub fn start_fresh(self) -> Self {
        self.clear()
    }

    /// Flips the narrow-layout pane. A no-op when the layout is wide.
    pub fn toggle_view(self, narrow: bool) -> Self {
        if !narrow {
            return self;
        }
        Self {
            view_mode: self.view_mode.flipped(),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(text: &str, name: &str) -> DocumentSession {
        DocumentSession::new().begin_load().ingest(text.to_string(), name)
    }

    #[test]
    fn fresh_session_is_empty() {
        let session = DocumentSession::new();
        assert!(!session.is_loaded);
        assert!(!session.is_loading);
        assert!(!session.is_edited());
        assert!(!session.has_content());
        assert_eq!(session.view_mode, ViewMode::Edit);
    }

    #[test]
    fn ingest_sets_baseline_and_clears_loading() {
        let session = loaded("# Hi", "report.md");
        assert_eq!(session.original_text, session.current_text);
        assert_eq!(session.file_name, "report.md");
        assert!(session.is_loaded);
        assert!(!session.is_loading);
        assert!(!session.is_edited());
    }

    #[test]
    fn ingest_over_edited_session_resets_edited_flag() {
        let session = loaded("a", "a.md").edit("changed".into());
        assert!(session.is_edited());
        let session = session.ingest("b".into(), "b.md");
        assert!(!session.is_edited());
        assert_eq!(session.current_text, "b");
    }

    #[test]
    fn editing_only_touches_current_text() {
        let session = loaded("# Hi", "report.md").edit("# Hi!".into());
        assert!(session.is_edited());
        assert_eq!(session.original_text, "# Hi");
        assert_eq!(session.file_name, "report.md");

        let reverted = session.edit("# Hi".into());
        assert!(!reverted.is_edited());
    }

    #[test]
    fn typing_without_a_load_is_never_edited() {
        let session = DocumentSession::new().edit("scratch".into());
        assert!(session.has_content());
        assert!(!session.is_edited());
    }

    #[test]
    fn edit_accepts_empty_text() {
        let session = loaded("body", "x.md").edit(String::new());
        assert_eq!(session.current_text, "");
        assert!(session.is_edited());
    }

    #[test]
    fn clear_and_start_fresh_blank_everything() {
        let resets: [fn(DocumentSession) -> DocumentSession; 2] =
            [DocumentSession::clear, DocumentSession::start_fresh];
        for reset in resets {
            let session = reset(loaded("text", "notes.md").edit("more".into()));
            assert!(!session.is_loaded);
            assert_eq!(session.current_text, "");
            assert_eq!(session.original_text, "");
            assert_eq!(session.file_name, "");
            assert!(!session.is_edited());
        }
    }

    #[test]
    fn failed_load_only_drops_loading_flag() {
        let before = loaded("keep", "keep.md").edit("kept edit".into());
        let after = before.clone().begin_load().load_failed();
        assert_eq!(before, after);
    }

    #[test]
    fn loading_blocks_ingestion_controls() {
        let session = DocumentSession::new().begin_load();
        assert!(!session.can_ingest());
        assert!(session.ingest("x".into(), "x.md").can_ingest());
    }

    #[test]
    fn rejected_drop_leaves_session_unchanged() {
        let before = loaded("# Hi", "report.md").edit("# Hi!".into());
        let image = MarkdownSource::new("image.png", "image/png");

        let err = before.try_begin_file_load(&image).unwrap_err();
        assert!(matches!(err, AppError::InvalidSource { .. }));

        // Callers only replace the session on success.
        let after = before.try_begin_file_load(&image).unwrap_or_else(|_| before.clone());
        assert_eq!(after, before);
        assert!(!after.is_loading);
        assert!(after.is_edited());
    }

    #[test]
    fn file_offered_while_loading_is_refused() {
        let busy = DocumentSession::new().begin_load();
        let notes = MarkdownSource::new("notes.md", "text/markdown");
        assert_eq!(
            busy.try_begin_file_load(&notes),
            Err(AppError::LoadInProgress)
        );
        assert_eq!(busy.try_begin_load(), Err(AppError::LoadInProgress));

        // A busy session refuses even invalid files as busy, not as invalid.
        let image = MarkdownSource::new("image.png", "image/png");
        assert_eq!(
            busy.try_begin_file_load(&image),
            Err(AppError::LoadInProgress)
        );
    }

    #[test]
    fn accepted_file_starts_loading_without_touching_content() {
        let before = loaded("keep", "keep.md");
        let next = before
            .try_begin_file_load(&MarkdownSource::new("next.md", ""))
            .unwrap();
        assert!(next.is_loading);
        assert_eq!(next.current_text, "keep");
        assert_eq!(next.file_name, "keep.md");
    }

    #[test]
    fn last_completed_read_wins() {
        let session = DocumentSession::new()
            .begin_load()
            .begin_load()
            .ingest("second".into(), "second.md")
            .ingest("first".into(), "first.md");
        assert_eq!(session.file_name, "first.md");
        assert_eq!(session.current_text, "first");
    }

    #[test]
    fn toggle_view_only_in_narrow_layout() {
        let session = DocumentSession::new();
        assert_eq!(session.clone().toggle_view(false).view_mode, ViewMode::Edit);

        let session = session.toggle_view(true);
        assert_eq!(session.view_mode, ViewMode::Preview);
        assert_eq!(session.toggle_view(true).view_mode, ViewMode::Edit);
    }
}
