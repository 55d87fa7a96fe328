use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::time::Duration;

const SEARCH_URL: &str = "https://www.pinterest.com/search/pins/?q=";

/// Selector the search page must render before collection starts
pub const IMAGE_SELECTOR: &str = "img[srcset]";

/// Configuration for the headless browser session
#[derive(Clone)]
pub struct BrowserConfig {
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    /// How long to wait for the first image element after navigation
    pub page_timeout: Duration,
    /// Pause after each scroll so lazy-loaded content renders
    pub scroll_pause: Duration,
    /// Maximum viewport scrolls per search page
    pub max_scrolls: u32,
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1280,
            window_height: 1024,
            page_timeout: Duration::from_secs(10),
            scroll_pause: Duration::from_millis(1000),
            max_scrolls: 10,
            user_agent: Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

/// One headless Chrome session, owned for the whole run.
pub struct BrowserClient {
    browser: Browser,
    config: BrowserConfig,
}

impl BrowserClient {
    /// Create a browser client with default configuration
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_config(BrowserConfig::default())
    }

    /// Launch headless Chrome. A missing or broken Chrome binary is fatal
    /// and propagates, no retry.
    pub fn with_config(config: BrowserConfig) -> Result<Self, Box<dyn std::error::Error>> {
        use std::ffi::OsStr;

        let user_agent_arg = config.user_agent.as_ref().map(|ua| format!("--user-agent={}", ua));

        let mut args: Vec<&OsStr> = vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-setuid-sandbox"),
        ];

        if let Some(ref ua) = user_agent_arg {
            args.push(OsStr::new(ua));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.window_width, config.window_height)))
            .args(args)
            .build()?;

        let browser = Browser::new(launch_options)?;

        Ok(Self { browser, config })
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    fn create_tab(&self) -> Result<Arc<Tab>, Box<dyn std::error::Error>> {
        let tab = self.browser.new_tab()?;

        // Override navigator properties to avoid detection
        let stealth_script = r#"
            Object.defineProperty(navigator, 'webdriver', {
                get: () => undefined
            });
            Object.defineProperty(navigator, 'languages', {
                get: () => ['en-US', 'en']
            });
        "#;
        tab.evaluate(stealth_script, false)?;

        Ok(tab)
    }

    /// Build the search URL for a query, percent-escaping spaces.
    pub fn search_url(query: &str) -> String {
        format!("{}{}", SEARCH_URL, query.replace(' ', "%20"))
    }

    /// Navigate a fresh tab to the search results for `query` and wait until
    /// at least one image element with a srcset descriptor has rendered.
    /// Times out with an error if none appears within the page timeout.
    pub fn open_search(&self, query: &str) -> Result<Arc<Tab>, Box<dyn std::error::Error>> {
        let url = Self::search_url(query);
        log::info!("Browser navigating to: {}", url);

        let tab = self.create_tab()?;

        tab.navigate_to(&url)?.wait_until_navigated()?;
        tab.wait_for_element_with_custom_timeout(IMAGE_SELECTOR, self.config.page_timeout)?;

        Ok(tab)
    }

    /// Scroll one viewport height and give lazy-loaded content time to render.
    pub fn scroll_once(&self, tab: &Arc<Tab>) -> Result<(), Box<dyn std::error::Error>> {
        tab.evaluate("window.scrollBy(0, window.innerHeight);", false)?;
        std::thread::sleep(self.config.scroll_pause);
        Ok(())
    }

    /// Release the browser session. The underlying Chrome process exits when
    /// the handle drops.
    pub fn close(self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}

impl Drop for BrowserClient {
    fn drop(&mut self) {
        log::debug!("Browser client dropped");
    }
}
