/// A labeled event payload, carried in both encoded-string and binary form
/// where applicable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Base64(String),
    Blob(Vec<u8>),
}

impl Payload {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Base64(_) => "base64",
            Self::Blob(_) => "blob",
        }
    }
}

/// Outbound notifications from a crop session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CropEvent {
    /// A new image was decoded successfully.
    FileSelected { payloads: Vec<Payload> },
    /// A crop was exported and committed.
    CropSaved { payloads: Vec<Payload> },
    /// Editing was abandoned without saving.
    CropCanceled { canceled: bool },
    /// The edit surface was dismissed.
    EditorClosed { closed: bool },
}

/// Receiver for session events.
///
/// Implementors can bridge these to a UI, an upload routine, or logging.
/// The default implementation ignores everything.
pub trait EventSink: Send + Sync {
    fn on_event(&self, _event: CropEvent) {}
}

/// Sink that drops all events, used when the caller registers none.
pub struct NullSink;
impl EventSink for NullSink {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_labels() {
        assert_eq!(Payload::Base64(String::new()).label(), "base64");
        assert_eq!(Payload::Blob(Vec::new()).label(), "blob");
    }
}
