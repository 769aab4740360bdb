use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CropboxError, Result};

/// Crop window aspect ratio, written as `"w/h"` (e.g. `"1/1"`, `"16/9"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    pub w: u32,
    pub h: u32,
}

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio { w: 1, h: 1 };

    pub fn new(w: u32, h: u32) -> Result<Self> {
        if w == 0 || h == 0 {
            return Err(CropboxError::InvalidAspectRatio(format!("{w}/{h}")));
        }
        Ok(Self { w, h })
    }

    /// Width over height as a real number.
    pub fn value(&self) -> f64 {
        self.w as f64 / self.h as f64
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::SQUARE
    }
}

impl FromStr for AspectRatio {
    type Err = CropboxError;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || CropboxError::InvalidAspectRatio(s.to_string());
        let (w, h) = s.split_once('/').ok_or_else(bad)?;
        let w: u32 = w.trim().parse().map_err(|_| bad())?;
        let h: u32 = h.trim().parse().map_err(|_| bad())?;
        AspectRatio::new(w, h)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.w, self.h)
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = CropboxError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(a: AspectRatio) -> String {
        a.to_string()
    }
}

/// The fixed-size visible crop window, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CropboxError::InvalidViewport { width, height });
        }
        Ok(Self { width, height })
    }

    /// Fit `aspect` into a `max_w` x `max_h` box, shrinking whichever
    /// dimension overflows. The shorter ratio term fills its axis first.
    pub fn fit(aspect: AspectRatio, max_w: f64, max_h: f64) -> Result<Self> {
        let wr = aspect.w as f64;
        let hr = aspect.h as f64;

        let (mut w, mut h);
        if wr <= hr {
            w = max_h / hr * wr;
            h = max_h;
            if w > max_w {
                h = h / w * max_w;
                w = max_w;
            }
        } else {
            w = max_w;
            h = max_w / wr * hr;
            if h > max_h {
                w = w / h * max_h;
                h = max_h;
            }
        }

        Viewport::new(w.round() as u32, h.round() as u32)
    }
}
