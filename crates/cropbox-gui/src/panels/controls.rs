use cropbox_core::consts::{ZOOM_SLIDER_MAX, ZOOM_SLIDER_MIN, ZOOM_STEP_IN, ZOOM_STEP_OUT};
use cropbox_core::transform::BoundsPolicy;

use crate::app::CropboxApp;
use crate::panels::section_header;
use crate::state::{aspect_choice, ASPECT_CHOICES};

pub fn show(ctx: &egui::Context, app: &mut CropboxApp) {
    egui::SidePanel::right("controls")
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.add_space(4.0);
            image_section(ui, app);
            ui.separator();
            zoom_section(ui, app);
            ui.separator();
            window_section(ui, app);
            ui.separator();
            action_section(ui, app);
            ui.separator();
            result_section(ui, app);
        });
}

fn image_section(ui: &mut egui::Ui, app: &mut CropboxApp) {
    let status = app
        .session
        .source()
        .map(|s| format!("{}x{}", s.width(), s.height()));
    section_header(ui, "Image", status.as_deref());

    if ui.button("Open Image...").clicked() {
        super::menu_bar::open_file(app);
    }
    if let Some(ref path) = app.ui_state.file_path {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            ui.small(name);
        }
    }
}

fn zoom_section(ui: &mut egui::Ui, app: &mut CropboxApp) {
    let status = app
        .session
        .transform()
        .map(|t| format!("{:.0}%", t.ratio * 100.0));
    section_header(ui, "Zoom", status.as_deref());

    let enabled = app.session.has_image() && app.ui_state.editor_open;
    ui.add_enabled_ui(enabled, |ui| {
        let slider = egui::Slider::new(
            &mut app.ui_state.zoom_slider,
            ZOOM_SLIDER_MIN..=ZOOM_SLIDER_MAX,
        )
        .show_value(false);
        if ui.add(slider).changed() {
            let _ = app.session.set_zoom_slider(app.ui_state.zoom_slider);
        }

        ui.horizontal(|ui| {
            if ui.button("\u{2212}").clicked() {
                step_zoom(app, ZOOM_STEP_OUT);
            }
            if ui.button("+").clicked() {
                step_zoom(app, ZOOM_STEP_IN);
            }
        });
    });
}

/// Multiply the current ratio by `step` and move the slider to match.
pub(super) fn step_zoom(app: &mut CropboxApp, step: f64) {
    let Some(ratio) = app.session.transform().map(|t| t.ratio) else {
        return;
    };
    if app.session.set_zoom_ratio(ratio * step).is_ok() {
        if let Some(t) = app.session.transform() {
            app.ui_state.zoom_slider =
                ((t.ratio - 1.0) * 20.0).clamp(ZOOM_SLIDER_MIN, ZOOM_SLIDER_MAX);
        }
    }
}

fn window_section(ui: &mut egui::Ui, app: &mut CropboxApp) {
    let viewport = app.session.viewport();
    let status = format!("{}x{}", viewport.width, viewport.height);
    section_header(ui, "Crop Window", Some(&status));

    let mut changed = false;
    egui::ComboBox::from_label("Aspect")
        .selected_text(ASPECT_CHOICES[app.ui_state.aspect_index])
        .show_ui(ui, |ui| {
            for (i, name) in ASPECT_CHOICES.iter().enumerate() {
                if ui
                    .selectable_value(&mut app.ui_state.aspect_index, i, *name)
                    .changed()
                {
                    changed = true;
                }
            }
        });
    if changed {
        let aspect = aspect_choice(app.ui_state.aspect_index);
        if let Err(e) = app.session.set_aspect_ratio(aspect) {
            app.ui_state.add_log(format!("ERROR: {e}"));
        }
    }

    if ui
        .checkbox(&mut app.ui_state.clamp_bounds, "Clamp panning")
        .changed()
    {
        let policy = if app.ui_state.clamp_bounds {
            BoundsPolicy::Clamp
        } else {
            BoundsPolicy::Unconstrained
        };
        app.session.set_bounds_policy(policy);
    }
}

fn action_section(ui: &mut egui::Ui, app: &mut CropboxApp) {
    section_header(ui, "Actions", None);
    let editing = app.session.has_image() && app.ui_state.editor_open;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(editing, egui::Button::new("Crop && Save"))
            .clicked()
        {
            app.save_crop();
        }
        if ui.add_enabled(editing, egui::Button::new("Cancel")).clicked() {
            app.cancel_edit();
        }
    });
}

fn result_section(ui: &mut egui::Ui, app: &mut CropboxApp) {
    section_header(ui, "Result", app.ui_state.result_name.as_deref());

    let Some(texture) = app.result_texture.clone() else {
        ui.small("No crop saved yet");
        return;
    };

    let size = texture.size_vec2();
    let max_edge = 160.0;
    let scale = (max_edge / size.x).min(max_edge / size.y).min(1.0);
    ui.image((texture.id(), size * scale));

    if ui.button("Remove").clicked() {
        app.session.remove_result();
        app.result_texture = None;
        app.ui_state.result_name = None;
    }
}
