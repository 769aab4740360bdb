use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use cropbox_core::config::{CropboxConfig, StageConfig};
use cropbox_core::session::CropSession;
use cropbox_core::transform::BoundsPolicy;
use cropbox_core::viewport::AspectRatio;

#[derive(Args)]
pub struct CropArgs {
    /// Input image files
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output file (only valid with a single input; auto-generated otherwise)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Crop window aspect ratio, written as w/h
    #[arg(long, default_value = "1/1")]
    pub aspect: String,

    /// Stage box the crop window is fitted into, as WxH
    #[arg(long, default_value = "512x512", value_parser = parse_box)]
    pub stage: (f64, f64),

    /// Zoom slider value in [-20, 20]; 0 maps to ratio 1.0
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub zoom: f64,

    /// Pan offset to apply after centering, in viewport pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_x: f64,
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_y: f64,

    /// Clamp panning so the crop window stays on the image
    #[arg(long)]
    pub clamp: bool,
}

pub fn run(args: &CropArgs) -> Result<()> {
    if args.output.is_some() && args.files.len() > 1 {
        bail!("--output only applies to a single input file");
    }

    let aspect: AspectRatio = args.aspect.parse()?;
    let config = CropboxConfig {
        aspect_ratio: aspect,
        stage: StageConfig {
            width: args.stage.0,
            height: args.stage.1,
            padding: 0.0,
        },
        bounds: if args.clamp {
            BoundsPolicy::Clamp
        } else {
            BoundsPolicy::Unconstrained
        },
        ..CropboxConfig::default()
    };

    let viewport = config.viewport()?;
    println!(
        "Cropping {} file(s) through a {}x{} viewport (aspect {})",
        args.files.len(),
        viewport.width,
        viewport.height,
        aspect
    );

    let pb = ProgressBar::new(args.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("Cropping [{bar:40}] {pos}/{len}")
            .unwrap()
            .progress_chars("=> "),
    );

    for file in &args.files {
        let output_path = args
            .output
            .clone()
            .unwrap_or_else(|| crop_output_path(file, viewport.width, viewport.height));
        crop_one(file, &output_path, &config, args)?;
        pb.inc(1);
    }
    pb.finish();

    Ok(())
}

fn crop_one(input: &Path, output: &Path, config: &CropboxConfig, args: &CropArgs) -> Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let mut session = CropSession::new(config.clone())?;
    session
        .load_image(&bytes)
        .with_context(|| format!("Failed to decode {}", input.display()))?;

    if args.zoom != 0.0 {
        session.set_zoom_slider(args.zoom)?;
    }
    if args.pan_x != 0.0 || args.pan_y != 0.0 {
        session.pan(args.pan_x, args.pan_y)?;
    }

    let result = session.crop()?;
    std::fs::write(output, result.png_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::debug!(output = %output.display(), "crop written");

    Ok(())
}

fn crop_output_path(source: &Path, w: u32, h: u32) -> PathBuf {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let parent = source.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_crop{w}x{h}.png"))
}

fn parse_box(s: &str) -> std::result::Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("bad width in '{s}'"))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("bad height in '{s}'"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err(format!("stage dimensions must be positive, got '{s}'"));
    }
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_box() {
        assert_eq!(parse_box("512x512").unwrap(), (512.0, 512.0));
        assert_eq!(parse_box("640X480").unwrap(), (640.0, 480.0));
        assert!(parse_box("512").is_err());
        assert!(parse_box("0x10").is_err());
    }

    #[test]
    fn test_crop_output_path() {
        let p = crop_output_path(Path::new("/tmp/avatar.jpg"), 200, 200);
        assert_eq!(p, PathBuf::from("/tmp/avatar_crop200x200.png"));
    }

    #[test]
    fn test_crop_one_writes_png() {
        use image::{ImageFormat, Rgba, RgbaImage};

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");

        let img = RgbaImage::from_pixel(400, 300, Rgba([5, 6, 7, 255]));
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        std::fs::write(&input, buf.into_inner()).unwrap();

        let args = CropArgs {
            files: vec![input.clone()],
            output: Some(output.clone()),
            aspect: "1/1".into(),
            stage: (200.0, 200.0),
            zoom: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
            clamp: false,
        };
        let config = CropboxConfig {
            stage: StageConfig {
                width: 200.0,
                height: 200.0,
                padding: 0.0,
            },
            ..CropboxConfig::default()
        };

        crop_one(&input, &output, &config, &args).unwrap();
        let decoded = image::open(&output).unwrap().to_rgba8();
        assert_eq!((decoded.width(), decoded.height()), (200, 200));
    }
}
