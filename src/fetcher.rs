use image::imageops::FilterType;
use image::RgbImage;
use rand::Rng;
use std::time::Duration;
use thiserror::Error;

/// User agents rotated across image downloads to avoid bot detection
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// Why a candidate URL did not become a thumbnail.
///
/// Candidates are dropped one at a time with no retry; the run driver counts
/// these per brand instead of surfacing them.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("not portrait ({width}x{height})")]
    NotPortrait { width: u32, height: u32 },
}

impl SkipReason {
    /// Stable key for metrics counters.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::Download(_) => "download",
            SkipReason::Decode(_) => "decode",
            SkipReason::NotPortrait { .. } => "orientation",
        }
    }
}

/// Downloads candidate images and keeps only portrait-oriented ones,
/// resized to a fixed square thumbnail.
pub struct ImageFetcher {
    client: reqwest::Client,
    thumb_size: (u32, u32),
}

impl ImageFetcher {
    pub fn new(timeout: Duration, thumb_size: (u32, u32)) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client, thumb_size })
    }

    fn random_user_agent() -> &'static str {
        let index = rand::thread_rng().gen_range(0..USER_AGENTS.len());
        USER_AGENTS[index]
    }

    /// One timed GET, one decode, one orientation check. Any failure skips
    /// the candidate; there is no retry.
    pub async fn fetch_portrait(&self, url: &str) -> Result<RgbImage, SkipReason> {
        let bytes = self
            .client
            .get(url)
            .header("User-Agent", Self::random_user_agent())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        portrait_thumbnail(&bytes, self.thumb_size)
    }
}

/// Decode image bytes, accept only portrait orientation (height strictly
/// greater than width), and resize to the exact thumbnail dimensions.
pub fn portrait_thumbnail(bytes: &[u8], thumb_size: (u32, u32)) -> Result<RgbImage, SkipReason> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = (img.width(), img.height());

    if height <= width {
        return Err(SkipReason::NotPortrait { width, height });
    }

    let (thumb_w, thumb_h) = thumb_size;
    Ok(img.resize_exact(thumb_w, thumb_h, FilterType::Lanczos3).to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 40, 200]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_portrait_accepted_and_resized() {
        let bytes = png_bytes(100, 200);
        let thumb = portrait_thumbnail(&bytes, (540, 540)).unwrap();
        assert_eq!(thumb.dimensions(), (540, 540));
    }

    #[test]
    fn test_landscape_rejected() {
        let bytes = png_bytes(200, 100);
        match portrait_thumbnail(&bytes, (540, 540)) {
            Err(SkipReason::NotPortrait { width, height }) => {
                assert_eq!((width, height), (200, 100));
            }
            other => panic!("expected orientation rejection, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_square_rejected() {
        // strict inequality: height must exceed width
        let bytes = png_bytes(100, 100);
        assert!(matches!(
            portrait_thumbnail(&bytes, (540, 540)),
            Err(SkipReason::NotPortrait { .. })
        ));
    }

    #[test]
    fn test_non_image_bytes_are_a_decode_skip() {
        let result = portrait_thumbnail(b"<html>not an image</html>", (540, 540));
        match result {
            Err(reason) => assert_eq!(reason.kind(), "decode"),
            Ok(_) => panic!("expected decode failure"),
        }
    }

    #[test]
    fn test_skip_reason_kinds() {
        let reason = SkipReason::NotPortrait { width: 2, height: 1 };
        assert_eq!(reason.kind(), "orientation");
        assert_eq!(reason.to_string(), "not portrait (2x1)");
    }

    #[tokio::test]
    async fn test_fetcher_creation() {
        let fetcher = ImageFetcher::new(Duration::from_secs(10), (540, 540));
        assert!(fetcher.is_ok());
    }
}
