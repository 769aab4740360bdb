use std::path::Path;
use std::sync::mpsc;

use cropbox_core::source::SourceImage;

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("cropbox-worker".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })
        .expect("Failed to spawn worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn send_error(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, msg: impl Into<String>) {
    send(tx, ctx, WorkerResult::Error { message: msg.into() });
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::LoadImage { path } => handle_load_image(&path, &tx, &ctx),
            WorkerCommand::WriteResult { path, png } => handle_write_result(&path, &png, &tx, &ctx),
        }
    }
}

fn handle_load_image(path: &Path, tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context) {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            send_error(tx, ctx, format!("Failed to read {}: {e}", path.display()));
            return;
        }
    };

    match SourceImage::decode(&bytes) {
        Ok(source) => send(
            tx,
            ctx,
            WorkerResult::ImageLoaded {
                path: path.to_path_buf(),
                source,
            },
        ),
        Err(e) => send_error(tx, ctx, format!("Failed to decode {}: {e}", path.display())),
    }
}

fn handle_write_result(
    path: &Path,
    png: &[u8],
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    match std::fs::write(path, png) {
        Ok(()) => send(
            tx,
            ctx,
            WorkerResult::ResultSaved {
                path: path.to_path_buf(),
            },
        ),
        Err(e) => send_error(tx, ctx, format!("Failed to write {}: {e}", path.display())),
    }
}
