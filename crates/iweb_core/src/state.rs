/// Extraction state threaded through [`crate::update`], one instance per
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractState {
    pub(crate) recording: bool,
    pub(crate) in_title: bool,
    pub(crate) in_date: bool,
    pub(crate) depth: usize,
    pub(crate) cur_line: usize,
    pub(crate) output: String,
    pub(crate) images: Vec<String>,
    pub(crate) title: Option<String>,
    pub(crate) date: Option<String>,
    pub(crate) featured_image: Option<String>,
}

impl ExtractState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inside the content region.
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn in_title(&self) -> bool {
        self.in_title
    }

    pub fn in_date(&self) -> bool {
        self.in_date
    }

    /// Open-tag nesting within the content region; 0 when not recording.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn date_text(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn featured_image(&self) -> Option<&str> {
        self.featured_image.as_deref()
    }
}
