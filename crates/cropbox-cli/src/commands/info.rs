use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use cropbox_core::source::SourceImage;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let source = SourceImage::decode(&bytes)
        .with_context(|| format!("Failed to decode {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Format:      {:?}", source.format());
    println!("Dimensions:  {}x{}", source.width(), source.height());

    let size_kb = bytes.len() as f64 / 1024.0;
    println!("Data size:   {:.1} KB", size_kb);

    Ok(())
}
