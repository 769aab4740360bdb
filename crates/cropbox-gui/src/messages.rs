use std::path::PathBuf;

use cropbox_core::source::SourceImage;

/// Commands sent from the UI thread to the worker thread.
pub enum WorkerCommand {
    /// Read and decode an image file.
    LoadImage { path: PathBuf },

    /// Write PNG bytes to disk.
    WriteResult { path: PathBuf, png: Vec<u8> },
}

/// Results sent from the worker thread back to the UI thread.
///
/// Loads are not cancellable; if two race, the UI drains the channel in
/// order and the last decode wins.
pub enum WorkerResult {
    ImageLoaded { path: PathBuf, source: SourceImage },
    ResultSaved { path: PathBuf },
    Error { message: String },
}
