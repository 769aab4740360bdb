use std::path::PathBuf;

use cropbox_core::viewport::AspectRatio;

pub const ASPECT_CHOICES: &[&str] = &["1/1", "3/4", "4/3", "16/9"];

/// Parse one of `ASPECT_CHOICES`; the list only holds valid ratios.
pub fn aspect_choice(index: usize) -> AspectRatio {
    ASPECT_CHOICES
        .get(index)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

/// Overall UI state.
pub struct UiState {
    /// Path of the currently loaded image, if any.
    pub file_path: Option<PathBuf>,
    /// Zoom slider position, [-20, 20].
    pub zoom_slider: f64,
    /// Selected index into `ASPECT_CHOICES`.
    pub aspect_index: usize,
    /// Whether panning is clamped to the image bounds.
    pub clamp_bounds: bool,
    /// Whether the edit surface is showing.
    pub editor_open: bool,
    /// Filename shown in the committed-result strip.
    pub result_name: Option<String>,
    pub log_messages: Vec<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            file_path: None,
            zoom_slider: 0.0,
            aspect_index: 0,
            clamp_bounds: false,
            editor_open: false,
            result_name: None,
            log_messages: Vec::new(),
        }
    }
}

impl UiState {
    pub fn add_log(&mut self, msg: impl Into<String>) {
        self.log_messages.push(msg.into());
        if self.log_messages.len() > 200 {
            self.log_messages.remove(0);
        }
    }
}
