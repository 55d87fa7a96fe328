use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::models::Brand;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Prepended to every base brand to form the search query
    #[serde(default = "default_search_prefix")]
    pub search_prefix: String,

    /// Base brand labels; one output grid per entry
    #[serde(default = "default_base_brands")]
    pub base_brands: Vec<String>,

    /// Thumbnails per grid (cols * rows)
    #[serde(default = "default_images_per_brand")]
    pub images_per_brand: usize,

    #[serde(default = "default_grid_cols")]
    pub grid_cols: u32,

    #[serde(default = "default_grid_rows")]
    pub grid_rows: u32,

    /// Square thumbnail edge in pixels
    #[serde(default = "default_thumb_size")]
    pub thumb_size: u32,

    /// Final output resolution (9:16 vertical by default)
    #[serde(default = "default_target_width")]
    pub target_width: u32,

    #[serde(default = "default_target_height")]
    pub target_height: u32,

    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_used_urls_file")]
    pub used_urls_file: String,

    /// Maximum viewport scrolls per search page
    #[serde(default = "default_max_scrolls")]
    pub max_scrolls: u32,

    /// Pause after each scroll so lazy-loaded content renders
    #[serde(default = "default_scroll_pause_ms")]
    pub scroll_pause_ms: u64,

    /// Wait for the first img[srcset] element after navigation
    #[serde(default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for each image download
    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    #[serde(default = "default_browser_headless")]
    pub browser_headless: bool,
}

fn default_search_prefix() -> String {
    "streetwear".to_string()
}

fn default_base_brands() -> Vec<String> {
    [
        "Broken Planet",
        "Maison Margiela",
        "Trapstar",
        "Stone Island",
        "Prada",
        "Casablanca",
        "Acne Studios",
        "Gallery Dept",
        "Nike Tech",
        "Amiri",
        "Stussy",
        "Louis Vuitton",
        "Denim Tears",
        "Chrome Hearts",
        "Syna World",
        "Corteiz",
        "Bape",
        "Polo Ralph Lauren",
        "Dior",
        "Fear of God Essentials",
        "Supreme",
        "Balenciaga",
        "sp5der",
        "Burberry",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_images_per_brand() -> usize { 4 }
fn default_grid_cols() -> u32 { 2 }
fn default_grid_rows() -> u32 { 2 }
fn default_thumb_size() -> u32 { 540 }
fn default_target_width() -> u32 { 1080 }
fn default_target_height() -> u32 { 1920 }
fn default_output_dir() -> String { "grids".to_string() }
fn default_used_urls_file() -> String { "used_urls.txt".to_string() }
fn default_max_scrolls() -> u32 { 10 }
fn default_scroll_pause_ms() -> u64 { 1000 }
fn default_page_timeout() -> u64 { 10 }
fn default_download_timeout() -> u64 { 10 }
fn default_browser_headless() -> bool { true }

impl Default for Config {
    fn default() -> Self {
        Self {
            search_prefix: default_search_prefix(),
            base_brands: default_base_brands(),
            images_per_brand: default_images_per_brand(),
            grid_cols: default_grid_cols(),
            grid_rows: default_grid_rows(),
            thumb_size: default_thumb_size(),
            target_width: default_target_width(),
            target_height: default_target_height(),
            output_dir: default_output_dir(),
            used_urls_file: default_used_urls_file(),
            max_scrolls: default_max_scrolls(),
            scroll_pause_ms: default_scroll_pause_ms(),
            page_timeout_secs: default_page_timeout(),
            download_timeout_secs: default_download_timeout(),
            browser_headless: default_browser_headless(),
        }
    }
}

impl Config {
    /// Load config.toml from the working directory, falling back to the
    /// compiled defaults if it is missing or malformed.
    pub fn load() -> Self {
        let path = Path::new("config.toml");
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                match toml::from_str::<Config>(&content) {
                    Ok(cfg) => return cfg,
                    Err(_) => log::warn!("config.toml is not valid TOML, using defaults"),
                }
            }
        }
        Self::default()
    }

    /// Derive the per-brand search queries from the prefix and base labels.
    pub fn brands(&self) -> Vec<Brand> {
        self.base_brands
            .iter()
            .map(|base| Brand::new(base, &self.search_prefix))
            .collect()
    }

    pub fn thumb_dimensions(&self) -> (u32, u32) {
        (self.thumb_size, self.thumb_size)
    }

    pub fn target_dimensions(&self) -> (u32, u32) {
        (self.target_width, self.target_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_expected_run_shape() {
        let cfg = Config::default();
        assert_eq!(cfg.search_prefix, "streetwear");
        assert_eq!(cfg.images_per_brand, 4);
        assert_eq!(cfg.grid_cols * cfg.grid_rows, cfg.images_per_brand as u32);
        assert_eq!(cfg.thumb_dimensions(), (540, 540));
        assert_eq!(cfg.target_dimensions(), (1080, 1920));
        assert_eq!(cfg.max_scrolls, 10);
        assert!(cfg.base_brands.contains(&"Nike Tech".to_string()));
    }

    #[test]
    fn test_partial_toml_overrides_keep_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            search_prefix = "techwear"
            base_brands = ["Acronym"]
            images_per_brand = 6
            grid_cols = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.search_prefix, "techwear");
        assert_eq!(cfg.base_brands, vec!["Acronym".to_string()]);
        assert_eq!(cfg.images_per_brand, 6);
        assert_eq!(cfg.grid_cols, 3);
        // untouched fields fall back to defaults
        assert_eq!(cfg.grid_rows, 2);
        assert_eq!(cfg.output_dir, "grids");
        assert_eq!(cfg.used_urls_file, "used_urls.txt");
    }

    #[test]
    fn test_brand_queries_derived_from_prefix() {
        let cfg: Config = toml::from_str(
            r#"
            search_prefix = "streetwear"
            base_brands = ["Nike Tech", "Supreme"]
            "#,
        )
        .unwrap();
        let brands = cfg.brands();
        assert_eq!(brands.len(), 2);
        assert_eq!(brands[0].query, "streetwear Nike Tech");
        assert_eq!(brands[1].query, "streetwear Supreme");
    }
}
