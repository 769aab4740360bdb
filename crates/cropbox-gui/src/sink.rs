use std::sync::mpsc;

use cropbox_core::events::{CropEvent, EventSink};

/// Event sink that forwards session events over an mpsc channel to the UI
/// thread.
pub struct ChannelEventSink {
    tx: mpsc::Sender<CropEvent>,
    ctx: egui::Context,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<CropEvent>, ctx: egui::Context) -> Self {
        Self { tx, ctx }
    }
}

impl EventSink for ChannelEventSink {
    fn on_event(&self, event: CropEvent) {
        let _ = self.tx.send(event);
        self.ctx.request_repaint();
    }
}
