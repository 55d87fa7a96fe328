use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Persisted set of image URLs already used in earlier runs.
///
/// One URL per line on disk. Loaded once at startup, saved once at shutdown;
/// nothing else touches the file. Grows monotonically, no eviction.
pub struct UrlLedger {
    path: PathBuf,
    urls: HashSet<String>,
}

impl UrlLedger {
    /// Read the ledger file if it exists; a missing file is an empty ledger.
    /// Lines are trimmed, empty lines dropped. No validation beyond that.
    pub fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let urls = match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashSet::new(),
            Err(e) => return Err(e),
        };
        log::info!("Loaded {} used URLs from {}", urls.len(), path.display());
        Ok(Self { path, urls })
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Add a batch of URLs. Set semantics, so merging is idempotent.
    pub fn merge<I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = String>,
    {
        for url in urls {
            self.urls.insert(url);
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Overwrite the ledger file with the full set, one URL per line,
    /// newline-terminated. Lines are sorted so the file is deterministic.
    pub fn save(&self) -> io::Result<()> {
        let mut lines: Vec<&str> = self.urls.iter().map(String::as_str).collect();
        lines.sort_unstable();

        let mut content = lines.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        log::info!("Saved {} used URLs to {}", self.urls.len(), self.path.display());
        Ok(())
    }
}
