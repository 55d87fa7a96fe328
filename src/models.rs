use serde::Serialize;
use std::path::{Path, PathBuf};

/// A brand to search for, paired with the derived search query.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Brand {
    /// Base label, also used for output naming ("Nike Tech")
    pub base: String,
    /// Full search query ("streetwear Nike Tech")
    pub query: String,
}

impl Brand {
    pub fn new(base: &str, search_prefix: &str) -> Self {
        Self {
            base: base.to_string(),
            query: format!("{} {}", search_prefix, base),
        }
    }

    /// Output file stem: the base label with spaces replaced by underscores.
    pub fn file_stem(&self) -> String {
        self.base.replace(' ', "_")
    }

    pub fn output_path(&self, output_dir: &str) -> PathBuf {
        Path::new(output_dir).join(format!("{}.png", self.file_stem()))
    }
}
