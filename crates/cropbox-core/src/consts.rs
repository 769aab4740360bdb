/// Lowest zoom ratio the engine accepts. Keeps `ratio > 0` even when the
/// slider sits at its negative extreme.
pub const MIN_ZOOM_RATIO: f64 = 0.05;

/// Highest zoom ratio the engine accepts.
pub const MAX_ZOOM_RATIO: f64 = 10.0;

/// Zoom slider domain exposed to UI controls.
pub const ZOOM_SLIDER_MIN: f64 = -20.0;
pub const ZOOM_SLIDER_MAX: f64 = 20.0;

/// Divisor mapping a slider value to a ratio: `ratio = 1 + value / SCALE`.
pub const ZOOM_SLIDER_SCALE: f64 = 20.0;

/// Multiplicative step for wheel/button zoom in and out.
pub const ZOOM_STEP_IN: f64 = 1.1;
pub const ZOOM_STEP_OUT: f64 = 0.9;

/// Padding (in pixels) subtracted from the stage box before fitting the
/// viewport's aspect ratio into it.
pub const VIEWPORT_FIT_PADDING: f64 = 20.0;

/// Minimum output pixel count (w*h) to use row-level Rayon parallelism
/// during rasterization.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
