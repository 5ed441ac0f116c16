use clap::Parser;
use std::path::PathBuf;
use transparent_icon::processor::{is_background, load_image, Pixel};
use transparent_icon::settings::DEFAULT_THRESHOLD;

/// Print alpha statistics for an image, e.g. to check converter output.
#[derive(Parser)]
struct Args {
    /// Image to inspect
    path: PathBuf,

    /// Also count opaque pixels that would still be classified as background
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let img = load_image(&args.path)?;

    let (mut opaque, mut transparent, mut partial, mut leftover) = (0usize, 0usize, 0usize, 0usize);
    for p in img.pixels() {
        match p[3] {
            0 => transparent += 1,
            255 => opaque += 1,
            _ => partial += 1,
        }
        if p[3] > 0 && is_background(Pixel::from(*p), args.threshold) {
            leftover += 1;
        }
    }

    println!("Size: {}x{}", img.width(), img.height());
    println!("Opaque pixels: {}", opaque);
    println!("Transparent pixels: {}", transparent);
    println!("Partially transparent pixels: {}", partial);
    println!("Visible background pixels (threshold {}): {}", args.threshold, leftover);

    Ok(())
}
