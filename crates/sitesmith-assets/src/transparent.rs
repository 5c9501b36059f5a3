//! Logo background removal.

use std::path::Path;

use image::ImageFormat;

/// Color-key the logo's background to transparent.
///
/// The top-left pixel is taken as the background color. Every pixel whose
/// channels all lie within `tolerance` of it becomes fully transparent. The
/// result is written back to `path` as PNG. Returns `false` when nothing
/// changed, e.g. the corner is already transparent.
pub fn make_background_transparent(path: &Path, tolerance: u8) -> Result<bool, image::ImageError> {
    let mut img = image::open(path)?.to_rgba8();
    if img.width() == 0 || img.height() == 0 {
        return Ok(false);
    }

    let key = *img.get_pixel(0, 0);
    if key[3] == 0 {
        return Ok(false);
    }

    let mut cleared = 0usize;
    for pixel in img.pixels_mut() {
        let close = (0..3).all(|c| pixel[c].abs_diff(key[c]) <= tolerance);
        if close && pixel[3] != 0 {
            pixel[3] = 0;
            cleared += 1;
        }
    }

    if cleared == 0 {
        return Ok(false);
    }

    img.save_with_format(path, ImageFormat::Png)?;
    tracing::debug!("Cleared {} background pixels in {}", cleared, path.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn clears_background_and_keeps_mark() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("logo.png");

        let mut img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 1, Rgba([250, 252, 251, 255]));
        img.put_pixel(4, 4, Rgba([180, 40, 90, 255]));
        img.save(&path).unwrap();

        assert!(make_background_transparent(&path, 24).unwrap());

        let out = image::open(&path).unwrap().to_rgba8();
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(1, 1)[3], 0);
        assert_eq!(*out.get_pixel(4, 4), Rgba([180, 40, 90, 255]));

        assert!(!make_background_transparent(&path, 24).unwrap());
    }
}
