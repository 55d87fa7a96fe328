use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};

/// Canvas fill behind the thumbnails
const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);

/// Paste thumbnails onto a dark canvas in row-major order.
///
/// Thumbnail `i` lands at `((i % cols) * thumb_w, (i / cols) * thumb_h)`.
/// The caller guarantees exactly `cols * rows` images of `thumb_size` via
/// padding; no margins, no overlap handling.
pub fn build_grid(images: &[RgbImage], cols: u32, rows: u32, thumb_size: (u32, u32)) -> RgbImage {
    let (thumb_w, thumb_h) = thumb_size;
    let mut canvas = RgbImage::from_pixel(cols * thumb_w, rows * thumb_h, BACKGROUND);

    for (idx, img) in images.iter().enumerate() {
        let x = (idx as u32 % cols) * thumb_w;
        let y = (idx as u32 / cols) * thumb_h;
        imageops::overlay(&mut canvas, img, i64::from(x), i64::from(y));
    }

    canvas
}

/// Resize the composed grid to the final output resolution.
pub fn finalize(grid: &RgbImage, target_size: (u32, u32)) -> RgbImage {
    let (width, height) = target_size;
    imageops::resize(grid, width, height, FilterType::Lanczos3)
}
