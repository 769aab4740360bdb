use image::RgbaImage;
use rayon::prelude::*;
use tracing::warn;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::transform::Transform;
use crate::viewport::Viewport;

/// Rasterize the viewport's visible region of `source` under `transform`.
///
/// The output is exactly `viewport.width` x `viewport.height`. Pixels the
/// source image does not cover are transparent, matching what compositing
/// the image onto an empty canvas would produce. A window that misses the
/// image entirely is shifted to the nearest in-bounds position first.
pub fn rasterize(source: &RgbaImage, viewport: Viewport, transform: &Transform) -> RgbaImage {
    let mut window = transform.source_window(viewport);
    if !window.intersects(source.width(), source.height()) {
        warn!(
            x = window.x,
            y = window.y,
            "crop window entirely outside the source image, clamping into bounds"
        );
        window = window.shifted_into(source.width(), source.height());
    }

    let out_w = viewport.width as usize;
    let out_h = viewport.height as usize;
    let scale_x = window.width / viewport.width as f64;
    let scale_y = window.height / viewport.height as f64;

    #[cfg(feature = "rotate")]
    let rotation = transform.rotation_degrees.to_radians();

    let row_fn = |oy: usize, row: &mut [u8]| {
        for ox in 0..out_w {
            // Sample at the output pixel's center.
            #[allow(unused_mut)]
            let (mut px, mut py) = (ox as f64 + 0.5, oy as f64 + 0.5);

            #[cfg(feature = "rotate")]
            if rotation != 0.0 {
                let cx = viewport.width as f64 / 2.0;
                let cy = viewport.height as f64 / 2.0;
                let (dx, dy) = (px - cx, py - cy);
                let (sin, cos) = (-rotation).sin_cos();
                px = cx + dx * cos - dy * sin;
                py = cy + dx * sin + dy * cos;
            }

            let sx = window.x + px * scale_x - 0.5;
            let sy = window.y + py * scale_y - 0.5;
            let rgba = sample_bilinear(source, sx, sy);
            row[ox * 4..ox * 4 + 4].copy_from_slice(&rgba);
        }
    };

    let mut pixels = vec![0u8; out_w * out_h * 4];
    if out_w * out_h >= PARALLEL_PIXEL_THRESHOLD {
        pixels
            .par_chunks_mut(out_w * 4)
            .enumerate()
            .for_each(|(oy, row)| row_fn(oy, row));
    } else {
        for (oy, row) in pixels.chunks_mut(out_w * 4).enumerate() {
            row_fn(oy, row);
        }
    }

    RgbaImage::from_raw(viewport.width, viewport.height, pixels)
        .expect("buffer size matches viewport dimensions")
}

/// Bilinear sample at fractional source coordinates. Texels outside the
/// image contribute transparent black, so edges fade instead of smearing.
fn sample_bilinear(img: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;

    let texel = |tx: i64, ty: i64| -> [f64; 4] {
        if tx < 0 || ty < 0 || tx >= img.width() as i64 || ty >= img.height() as i64 {
            [0.0; 4]
        } else {
            let p = img.get_pixel(tx as u32, ty as u32).0;
            [p[0] as f64, p[1] as f64, p[2] as f64, p[3] as f64]
        }
    };

    let (x0, y0) = (x0 as i64, y0 as i64);
    let p00 = texel(x0, y0);
    let p10 = texel(x0 + 1, y0);
    let p01 = texel(x0, y0 + 1);
    let p11 = texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] * (1.0 - fx) + p10[c] * fx;
        let bottom = p01[c] * (1.0 - fx) + p11[c] * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// 400x300 test image: left half red, right half blue, fully opaque.
    fn two_tone() -> RgbaImage {
        RgbaImage::from_fn(400, 300, |x, _| {
            if x < 200 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    fn vp() -> Viewport {
        Viewport::new(200, 200).unwrap()
    }

    #[test]
    fn test_identity_centered_crop_matches_source() {
        let src = two_tone();
        let t = Transform::centered(400, 300, vp());
        let out = rasterize(&src, vp(), &t);
        assert_eq!((out.width(), out.height()), (200, 200));
        // Window is (100, 50)..(300, 250): output (ox, oy) = source (100+ox, 50+oy).
        assert_eq!(out.get_pixel(0, 0), src.get_pixel(100, 50));
        assert_eq!(out.get_pixel(99, 0), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(100, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(out.get_pixel(199, 199), src.get_pixel(299, 249));
    }

    #[test]
    fn test_partial_window_fills_transparent() {
        let src = two_tone();
        let mut t = Transform::centered(400, 300, vp());
        t.pan(150.0, 0.0); // offset_x = 50: columns 0..50 sample left of the image
        let out = rasterize(&src, vp(), &t);
        assert_eq!(out.get_pixel(10, 100).0[3], 0);
        assert_eq!(out.get_pixel(100, 100).0[3], 255);
    }

    #[test]
    fn test_full_miss_window_is_clamped() {
        let src = two_tone();
        let mut t = Transform::centered(400, 300, vp());
        t.pan(10_000.0, 0.0);
        let out = rasterize(&src, vp(), &t);
        // Clamped to the left edge of the image: opaque red content.
        assert_eq!(out.get_pixel(100, 100), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_zoomed_in_crop_dimensions() {
        let src = two_tone();
        let viewport = vp();
        let mut t = Transform::centered(400, 300, viewport);
        t.set_ratio(2.0, viewport);
        let out = rasterize(&src, viewport, &t);
        assert_eq!((out.width(), out.height()), (200, 200));
        // Viewport center still shows the source center, which is the
        // red/blue boundary; left of it stays red.
        assert_eq!(out.get_pixel(40, 100), &Rgba([255, 0, 0, 255]));
        assert_eq!(out.get_pixel(160, 100), &Rgba([0, 0, 255, 255]));
    }
}
