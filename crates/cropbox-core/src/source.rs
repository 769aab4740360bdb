use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};

use crate::error::Result;

/// The originally loaded, unmodified decoded image.
///
/// Holds both the decoded RGBA pixels and the raw bytes the caller supplied,
/// so events can carry the input in blob and base64 form without re-encoding.
#[derive(Clone, Debug)]
pub struct SourceImage {
    rgba: RgbaImage,
    raw: Vec<u8>,
    format: ImageFormat,
}

impl SourceImage {
    /// Decode image bytes, sniffing the format from the payload.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes)?;
        let rgba = image::load_from_memory_with_format(bytes, format)?.to_rgba8();
        Ok(Self {
            rgba,
            raw: bytes.to_vec(),
            format,
        })
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.rgba
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// The raw bytes as supplied to `decode`.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// The raw bytes as a `data:` URL with the sniffed MIME type.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.to_mime_type(),
            BASE64.encode(&self.raw)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let bytes = png_bytes(8, 6);
        let src = SourceImage::decode(&bytes).unwrap();
        assert_eq!((src.width(), src.height()), (8, 6));
        assert_eq!(src.format(), ImageFormat::Png);
        assert_eq!(src.raw_bytes(), &bytes[..]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(SourceImage::decode(b"not an image at all").is_err());
    }

    #[test]
    fn test_data_url_prefix() {
        let src = SourceImage::decode(&png_bytes(2, 2)).unwrap();
        assert!(src.data_url().starts_with("data:image/png;base64,"));
    }
}
