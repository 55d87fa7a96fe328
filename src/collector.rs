use crate::browser_client::{BrowserClient, IMAGE_SELECTOR};
use crate::ledger::UrlLedger;

/// Collect up to `desired_count` unique candidate image URLs for one search
/// query, in discovery order.
///
/// Scans the rendered image elements, keeps the highest-resolution URL from
/// each srcset descriptor, and scrolls for more content until the quota or
/// the scroll budget is exhausted. URLs already in the ledger are never
/// returned. Finding fewer than `desired_count` is not an error; the caller
/// handles shortfall.
pub fn collect_candidates(
    browser: &BrowserClient,
    query: &str,
    desired_count: usize,
    ledger: &UrlLedger,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    let tab = browser.open_search(query)?;

    let mut urls: Vec<String> = Vec::new();
    let mut scrolls = 0u32;

    while urls.len() < desired_count && scrolls < browser.config().max_scrolls {
        let elements = match tab.find_elements(IMAGE_SELECTOR) {
            Ok(elements) => elements,
            Err(e) => {
                log::debug!("Element scan failed, scrolling on: {}", e);
                Vec::new()
            }
        };

        // Nodes can go stale between enumeration and the attribute read;
        // a failed read skips that element, not the scan.
        let descriptors = elements
            .iter()
            .filter_map(|element| element.get_attribute_value("srcset").ok().flatten());

        admit_descriptors(descriptors, &mut urls, desired_count, ledger);

        browser.scroll_once(&tab)?;
        scrolls += 1;
    }

    log::info!(
        "Collected {}/{} candidates for '{}' after {} scrolls",
        urls.len(),
        desired_count,
        query,
        scrolls
    );

    urls.truncate(desired_count);
    Ok(urls)
}

/// Fold one scan pass of srcset descriptors into the result list, skipping
/// URLs already collected this call or recorded in the ledger. Stops as soon
/// as `desired_count` URLs are accumulated.
pub fn admit_descriptors<I>(
    descriptors: I,
    urls: &mut Vec<String>,
    desired_count: usize,
    ledger: &UrlLedger,
) where
    I: IntoIterator<Item = String>,
{
    if urls.len() >= desired_count {
        return;
    }
    for srcset in descriptors {
        if let Some(url) = highest_resolution_url(&srcset) {
            if !urls.iter().any(|u| u == url) && !ledger.contains(url) {
                urls.push(url.to_string());
                if urls.len() >= desired_count {
                    return;
                }
            }
        }
    }
}

/// Pick the URL of the last entry of a responsive-source descriptor.
///
/// A srcset lists variants low-to-high ("a.jpg 100w, b.jpg 300w, c.jpg 600w"),
/// so the last entry is the highest-resolution candidate. A single-entry
/// descriptor is valid; an empty or whitespace descriptor yields nothing.
pub fn highest_resolution_url(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .next_back()?
        .split_whitespace()
        .next()
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_ledger() -> UrlLedger {
        UrlLedger::load(format!(
            "{}/brand_grid_scraper_no_such_ledger_{}",
            std::env::temp_dir().display(),
            std::process::id()
        ))
        .unwrap()
    }

    #[test]
    fn test_picks_last_entry() {
        let srcset = "a.jpg 100w, b.jpg 300w, c.jpg 600w";
        assert_eq!(highest_resolution_url(srcset), Some("c.jpg"));
    }

    #[test]
    fn test_single_entry_is_valid() {
        assert_eq!(highest_resolution_url("a.jpg 100w"), Some("a.jpg"));
    }

    #[test]
    fn test_entry_without_size_descriptor() {
        assert_eq!(highest_resolution_url("a.jpg"), Some("a.jpg"));
    }

    #[test]
    fn test_pixel_density_descriptors() {
        let srcset = "low.jpg 1x, high.jpg 2x";
        assert_eq!(highest_resolution_url(srcset), Some("high.jpg"));
    }

    #[test]
    fn test_whitespace_around_entries() {
        let srcset = " a.jpg 100w ,  b.jpg 300w ";
        assert_eq!(highest_resolution_url(srcset), Some("b.jpg"));
    }

    #[test]
    fn test_empty_descriptor_yields_nothing() {
        assert_eq!(highest_resolution_url(""), None);
        assert_eq!(highest_resolution_url("   "), None);
    }

    #[test]
    fn test_admit_skips_ledgered_urls() {
        let mut ledger = empty_ledger();
        ledger.merge(vec!["used.jpg".to_string()]);

        let mut urls = Vec::new();
        admit_descriptors(
            vec![
                "tiny.jpg 100w, used.jpg 600w".to_string(),
                "tiny.jpg 100w, fresh.jpg 600w".to_string(),
            ],
            &mut urls,
            4,
            &ledger,
        );
        assert_eq!(urls, vec!["fresh.jpg".to_string()]);
    }

    #[test]
    fn test_admit_dedups_within_call() {
        let ledger = empty_ledger();
        let mut urls = Vec::new();
        admit_descriptors(
            vec![
                "a.jpg 600w".to_string(),
                "a.jpg 600w".to_string(),
                "b.jpg 600w".to_string(),
            ],
            &mut urls,
            4,
            &ledger,
        );
        assert_eq!(urls, vec!["a.jpg".to_string(), "b.jpg".to_string()]);
    }

    #[test]
    fn test_admit_stops_at_desired_count() {
        let ledger = empty_ledger();
        let mut urls = Vec::new();
        admit_descriptors(
            (0..10).map(|i| format!("img{}.jpg 600w", i)),
            &mut urls,
            3,
            &ledger,
        );
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0], "img0.jpg");
        assert_eq!(urls[2], "img2.jpg");
    }
}
