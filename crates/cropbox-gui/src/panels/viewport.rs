use cropbox_core::consts::{ZOOM_STEP_IN, ZOOM_STEP_OUT};
use cropbox_core::transform::Transform;

use crate::app::CropboxApp;
use crate::panels::controls::step_zoom;

pub fn show(ctx: &egui::Context, app: &mut CropboxApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        let texture_id = match app.source_texture.as_ref() {
            Some(t) if app.session.has_image() && app.ui_state.editor_open => t.id(),
            _ => {
                show_placeholder(ui);
                return;
            }
        };

        let viewport = app.session.viewport();
        let crop_rect = egui::Rect::from_center_size(
            rect.center(),
            egui::vec2(viewport.width as f32, viewport.height as f32),
        );

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        handle_pan(&response, app);
        handle_wheel_zoom(ui, &response, app);
        if response.double_clicked() {
            recenter(app);
        }

        if let (Some(transform), Some(source)) =
            (app.session.transform().copied(), app.session.source())
        {
            let (dw, dh) = transform.displayed_size(source.width(), source.height());
            let img_rect = egui::Rect::from_min_size(
                crop_rect.min + egui::vec2(transform.offset_x as f32, transform.offset_y as f32),
                egui::vec2(dw as f32, dh as f32),
            );
            draw_image(ui, texture_id, img_rect);
        }

        draw_crop_window(ui, rect, crop_rect);
    });
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn handle_pan(response: &egui::Response, app: &mut CropboxApp) {
    if response.dragged_by(egui::PointerButton::Primary) {
        let delta = response.drag_delta();
        if delta != egui::Vec2::ZERO {
            let _ = app.session.pan(delta.x as f64, delta.y as f64);
        }
    }
}

fn handle_wheel_zoom(ui: &egui::Ui, response: &egui::Response, app: &mut CropboxApp) {
    let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
    if scroll_delta == 0.0 || !response.hovered() {
        return;
    }
    let step = if scroll_delta > 0.0 {
        ZOOM_STEP_IN
    } else {
        ZOOM_STEP_OUT
    };
    step_zoom(app, step);
}

/// Double-click: back to ratio 1 with the image centered.
fn recenter(app: &mut CropboxApp) {
    let Some(source) = app.session.source() else {
        return;
    };
    let (w, h) = (source.width(), source.height());
    let target = Transform::centered(w, h, app.session.viewport());

    if app.session.set_zoom_ratio(1.0).is_ok() {
        if let Some(current) = app.session.transform().copied() {
            let _ = app.session.pan(
                target.offset_x - current.offset_x,
                target.offset_y - current.offset_y,
            );
        }
        app.ui_state.zoom_slider = 0.0;
    }
}

fn draw_image(ui: &egui::Ui, texture_id: egui::TextureId, img_rect: egui::Rect) {
    ui.painter().image(
        texture_id,
        img_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

/// Dim everything outside the crop window and outline it.
fn draw_crop_window(ui: &egui::Ui, stage: egui::Rect, crop: egui::Rect) {
    let dim_color = egui::Color32::from_black_alpha(140);
    let painter = ui.painter();

    // Top
    painter.rect_filled(
        egui::Rect::from_min_max(stage.left_top(), egui::pos2(stage.right(), crop.top())),
        0.0,
        dim_color,
    );
    // Bottom
    painter.rect_filled(
        egui::Rect::from_min_max(egui::pos2(stage.left(), crop.bottom()), stage.right_bottom()),
        0.0,
        dim_color,
    );
    // Left (between top and bottom)
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(stage.left(), crop.top()),
            egui::pos2(crop.left(), crop.bottom()),
        ),
        0.0,
        dim_color,
    );
    // Right (between top and bottom)
    painter.rect_filled(
        egui::Rect::from_min_max(
            egui::pos2(crop.right(), crop.top()),
            egui::pos2(stage.right(), crop.bottom()),
        ),
        0.0,
        dim_color,
    );

    let border_color = egui::Color32::from_white_alpha(220);
    painter.rect_stroke(
        crop,
        0.0,
        egui::Stroke::new(1.5, border_color),
        egui::epaint::StrokeKind::Outside,
    );

    let label = format!("{}x{}", crop.width().round(), crop.height().round());
    painter.text(
        egui::pos2(crop.right() - 4.0, crop.bottom() + 4.0),
        egui::Align2::RIGHT_TOP,
        label,
        egui::FontId::proportional(12.0),
        border_color,
    );
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open an image to begin cropping")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
