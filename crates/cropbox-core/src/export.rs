use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};

use crate::error::Result;

/// The rasterized bitmap produced by exporting the current viewport view,
/// in both encoded-string and binary form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropResult {
    png: Vec<u8>,
    data_url: String,
    width: u32,
    height: u32,
}

impl CropResult {
    pub fn from_bitmap(bitmap: &RgbaImage) -> Result<Self> {
        let png = encode_png(bitmap)?;
        let data_url = png_data_url(&png);
        Ok(Self {
            png,
            data_url,
            width: bitmap.width(),
            height: bitmap.height(),
        })
    }

    /// PNG-encoded bytes (the "blob" payload).
    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    /// `data:image/png;base64,...` string (the "base64" payload).
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Encode an RGBA bitmap as PNG.
pub fn encode_png(bitmap: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    bitmap.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Wrap PNG bytes in a `data:` URL.
pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_round_trip_dimensions() {
        let bitmap = RgbaImage::from_pixel(20, 10, Rgba([1, 2, 3, 255]));
        let result = CropResult::from_bitmap(&bitmap).unwrap();
        assert_eq!((result.width(), result.height()), (20, 10));

        let decoded = image::load_from_memory(result.png_bytes()).unwrap().to_rgba8();
        assert_eq!(decoded, bitmap);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let bitmap = RgbaImage::from_fn(16, 16, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        let a = encode_png(&bitmap).unwrap();
        let b = encode_png(&bitmap).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_data_url_prefix() {
        assert!(png_data_url(&[1, 2, 3]).starts_with("data:image/png;base64,"));
    }
}
