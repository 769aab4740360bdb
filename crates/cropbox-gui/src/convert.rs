use image::RgbaImage;

/// Convert an RGBA bitmap to an egui ColorImage.
pub fn rgba_to_color_image(rgba: &RgbaImage) -> egui::ColorImage {
    let w = rgba.width() as usize;
    let h = rgba.height() as usize;
    let mut pixels = Vec::with_capacity(w * h);

    for p in rgba.pixels() {
        pixels.push(egui::Color32::from_rgba_unmultiplied(
            p.0[0], p.0[1], p.0[2], p.0[3],
        ));
    }

    egui::ColorImage {
        size: [w, h],
        pixels,
        source_size: Default::default(),
    }
}
