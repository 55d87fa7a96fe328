use brand_grid_scraper::browser_client::{BrowserClient, BrowserConfig};
use brand_grid_scraper::collector;
use brand_grid_scraper::config::Config;
use brand_grid_scraper::fetcher::ImageFetcher;
use brand_grid_scraper::grid;
use brand_grid_scraper::ledger::UrlLedger;
use brand_grid_scraper::metrics::MetricsTracker;
use brand_grid_scraper::models::Brand;
use log::{error, info, warn};
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    log4rs::init_file("log4rs.yml", Default::default()).unwrap();

    let cfg = Config::load();
    std::fs::create_dir_all(&cfg.output_dir)?;

    let mut ledger = UrlLedger::load(&cfg.used_urls_file)?;

    // One browser session for the whole run; a launch failure is fatal.
    let browser = BrowserClient::with_config(BrowserConfig {
        headless: cfg.browser_headless,
        page_timeout: Duration::from_secs(cfg.page_timeout_secs),
        scroll_pause: Duration::from_millis(cfg.scroll_pause_ms),
        max_scrolls: cfg.max_scrolls,
        ..BrowserConfig::default()
    })?;

    let fetcher = ImageFetcher::new(
        Duration::from_secs(cfg.download_timeout_secs),
        cfg.thumb_dimensions(),
    )?;

    let metrics = MetricsTracker::new();

    info!(
        "Starting run: {} brands, {} images each, {} grid output",
        cfg.base_brands.len(),
        cfg.images_per_brand,
        cfg.output_dir
    );

    // A failed brand never aborts the run; the ledger save and browser close
    // below must always be reached.
    for brand in cfg.brands() {
        let start = Instant::now();
        match process_brand(&browser, &fetcher, &cfg, &mut ledger, &metrics, &brand).await {
            Ok(()) => metrics.record_completed(&brand.base, start.elapsed()),
            Err(e) => error!("Skipping brand {}: {}", brand.base, e),
        }
    }

    browser.close()?;
    metrics.log_summary();
    ledger.save()?;

    let report_path = std::path::Path::new(&cfg.output_dir).join("run_report.json");
    std::fs::write(&report_path, metrics.export_json())?;
    info!("Run report written to {}", report_path.display());

    Ok(())
}

/// Collect, download, filter, compose and save one brand's grid, then merge
/// the actually-used URLs into the ledger.
async fn process_brand(
    browser: &BrowserClient,
    fetcher: &ImageFetcher,
    cfg: &Config,
    ledger: &mut UrlLedger,
    metrics: &MetricsTracker,
    brand: &Brand,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Searching {} images for {} ({})",
        cfg.images_per_brand, brand.base, brand.query
    );

    // Oversample to compensate for orientation-filter rejection
    let candidates =
        collector::collect_candidates(browser, &brand.query, cfg.images_per_brand * 2, ledger)?;
    metrics.record_candidates(&brand.base, candidates.len());

    let mut thumbs = Vec::new();
    let mut selected = Vec::new();

    for url in &candidates {
        match fetcher.fetch_portrait(url).await {
            Ok(thumb) => {
                thumbs.push(thumb);
                selected.push(url.clone());
                metrics.record_accepted(&brand.base);
                if thumbs.len() >= cfg.images_per_brand {
                    break;
                }
            }
            Err(reason) => {
                log::debug!("Candidate {} skipped: {}", url, reason);
                metrics.record_skip(&brand.base, reason.kind());
            }
        }
    }

    if thumbs.is_empty() {
        warn!(
            "No portrait images accepted for {}, skipping grid",
            brand.base
        );
        metrics.record_starved(&brand.base);
        return Ok(());
    }

    // Fill the grid by repeating the last accepted thumbnail
    let padded = cfg.images_per_brand.saturating_sub(thumbs.len());
    if let Some(filler) = thumbs.last().cloned() {
        while thumbs.len() < cfg.images_per_brand {
            thumbs.push(filler.clone());
        }
    }
    metrics.record_padded(&brand.base, padded);

    info!("Composing grid for {}", brand.base);
    let composed = grid::build_grid(&thumbs, cfg.grid_cols, cfg.grid_rows, cfg.thumb_dimensions());
    let final_image = grid::finalize(&composed, cfg.target_dimensions());

    let out_path = brand.output_path(&cfg.output_dir);
    final_image.save(&out_path)?;
    info!("Saved {}", out_path.display());

    // Only URLs that were fetched and passed the filter count as used
    ledger.merge(selected);

    Ok(())
}
