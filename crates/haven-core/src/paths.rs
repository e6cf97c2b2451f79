//! Standard paths used by Haven tools

use std::path::PathBuf;

/// Standard Haven paths
pub struct Paths {
    /// Config directory (~/.config/haven)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("haven");

        Self { config }
    }

    /// Get the JSON config file for a tool
    pub fn config_file(&self, tool: &str) -> PathBuf {
        self.config.join(format!("{}.json", tool))
    }
}
