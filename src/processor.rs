//! Background Transparency Conversion
//!
//! Pixels whose red, green and blue channels all exceed a threshold are treated
//! as background and replaced with fully transparent white. Everything else is
//! passed through untouched, including its original alpha.
//!
//! The pipeline is decode -> normalize to RGBA -> classify -> encode PNG. The
//! encoded PNG is held in memory and swapped into place with a rename, so the
//! output path may be the input path and a failed run never leaves a partial file.

use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use serde::Serialize;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use crate::error::{Result, TransparencyError};
use crate::settings::ConvertSettings;

// ============================================================================
// PIXEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// What every background pixel becomes
    pub const TRANSPARENT: Pixel = Pixel { r: 255, g: 255, b: 255, a: 0 };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba<u8>> for Pixel {
    fn from(p: Rgba<u8>) -> Self {
        let [r, g, b, a] = p.0;
        Self { r, g, b, a }
    }
}

impl From<Pixel> for Rgba<u8> {
    fn from(p: Pixel) -> Self {
        Rgba([p.r, p.g, p.b, p.a])
    }
}

/// Strictly brighter than `threshold` on all three colour channels. Alpha is ignored.
pub fn is_background(pixel: Pixel, threshold: u8) -> bool {
    pixel.r > threshold && pixel.g > threshold && pixel.b > threshold
}

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    pub size: (u32, u32),
    pub total_pixels: usize,
    pub converted_pixels: usize,
    pub output_path: PathBuf,
}

// ============================================================================
// IN-MEMORY PROCESSING
// ============================================================================

/// Bring any decoded image to 8-bit RGBA.
///
/// Images with an alpha channel keep it (rescaled to 8 bits). Images without
/// one are expanded to RGB and every pixel is made fully opaque.
pub fn normalize_rgba(img: DynamicImage) -> RgbaImage {
    if img.color().has_alpha() {
        return img.into_rgba8();
    }

    let rgb = img.into_rgb8();
    RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Rgba([r, g, b, 255])
    })
}

/// Build a new grid with background pixels made transparent.
///
/// Returns the new image and how many pixels were converted.
pub fn make_transparent(img: &RgbaImage, threshold: u8) -> (RgbaImage, usize) {
    let mut out = img.clone();
    let mut converted = 0;

    for pixel in out.pixels_mut() {
        if is_background(Pixel::from(*pixel), threshold) {
            *pixel = Pixel::TRANSPARENT.into();
            converted += 1;
        }
    }

    (out, converted)
}

// ============================================================================
// FILE I/O
// ============================================================================

/// Decode an image from disk and normalize it to RGBA.
///
/// The format is sniffed from the file contents, so a PNG with the wrong
/// extension still loads.
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let decode_err = |source| TransparencyError::Decode { path: path.to_path_buf(), source };

    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;

    log::debug!("Decoded {} ({}x{}, {:?})", path.display(), img.width(), img.height(), img.color());
    Ok(normalize_rgba(img))
}

/// Encode image as PNG bytes
pub fn encode_png(img: &RgbaImage) -> image::ImageResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Write an image to `path` as PNG.
///
/// The PNG is encoded fully in memory, written to a temporary file next to
/// the destination and renamed over it. An existing `path` is resolved first,
/// so a symlinked icon updates the file it points to. The parent directory
/// must already exist and a read-only destination is refused. On failure
/// nothing at `path` changes.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let bytes = encode_png(img).map_err(|e| TransparencyError::write(path, e))?;

    let target = match std::fs::metadata(path) {
        Ok(meta) => {
            if meta.permissions().readonly() {
                let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "file is read-only");
                return Err(TransparencyError::write(path, denied));
            }
            std::fs::canonicalize(path).map_err(|e| TransparencyError::write(path, e))?
        }
        Err(_) => path.to_path_buf(),
    };

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| TransparencyError::write(path, e))?;
    tmp.write_all(&bytes).map_err(|e| TransparencyError::write(path, e))?;
    tmp.as_file().sync_all().map_err(|e| TransparencyError::write(path, e))?;

    // Keep the permissions of the file being replaced
    if let Ok(meta) = std::fs::metadata(&target) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| TransparencyError::write(path, e))?;
    }

    tmp.persist(&target).map_err(|e| TransparencyError::write(path, e.error))?;

    log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());
    Ok(())
}

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// Convert near-white pixels of `input_path` to transparent and save the result as PNG.
pub fn convert(input_path: &Path, output_path: &Path, threshold: u8) -> Result<ConvertResult> {
    // Fully loaded before anything is written, so in-place conversion is safe
    let rgba = load_image(input_path)?;
    let size = rgba.dimensions();
    let total_pixels = rgba.pixels().len();

    let (converted, converted_pixels) = make_transparent(&rgba, threshold);

    save_png(&converted, output_path)?;

    log::info!(
        "Cleared {} of {} pixels (threshold {}) into {}",
        converted_pixels,
        total_pixels,
        threshold,
        output_path.display()
    );

    Ok(ConvertResult {
        size,
        total_pixels,
        converted_pixels,
        output_path: output_path.to_path_buf(),
    })
}

/// Settings-driven variant of [`convert`]
pub fn convert_with(settings: &ConvertSettings) -> Result<ConvertResult> {
    settings.validate()?;
    convert(&settings.input_path, &settings.output_path, settings.threshold)
}

// ============================================================================
// TESTS
// ============================================================================
