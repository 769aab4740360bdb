use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropboxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("No image loaded")]
    NoImage,

    #[error("Invalid aspect ratio: {0}")]
    InvalidAspectRatio(String),

    #[error("Invalid viewport dimensions: {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, CropboxError>;
