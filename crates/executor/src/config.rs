//! Mock configuration via `docmock.toml`
//!
//! Every field is optional; a missing file section or an empty file yields
//! the defaults the protocol documents.

use serde::{Deserialize, Serialize};
use std::path::Path;

use docmock_core::DEFAULT_ITEM_SIZE_MAX;

use crate::error::{Error, Result};

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "docmock.toml";

/// Mock configuration loaded from `docmock.toml`.
///
/// # Example
///
/// ```toml
/// item_size_max = 20971520
/// max_create_retries = 100
/// num_vbuckets = 64
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Largest body a mutation may produce, in bytes (xattrs excluded)
    #[serde(default = "default_item_size_max")]
    pub item_size_max: usize,
    /// How often a command may lose a document-creation race before giving up
    #[serde(default = "default_max_create_retries")]
    pub max_create_retries: u32,
    /// Vbucket count for the in-memory store
    #[serde(default = "default_num_vbuckets")]
    pub num_vbuckets: u16,
}

fn default_item_size_max() -> usize {
    DEFAULT_ITEM_SIZE_MAX
}

fn default_max_create_retries() -> u32 {
    100
}

fn default_num_vbuckets() -> u16 {
    64
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            item_size_max: default_item_size_max(),
            max_create_retries: default_max_create_retries(),
            num_vbuckets: default_num_vbuckets(),
        }
    }
}

impl MockConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# docmock configuration
#
# Largest document body a mutation may produce, in bytes.
# Extended attributes do not count towards this limit.
item_size_max = 20971520

# How many times a command may lose a document-creation race
# before answering a temporary failure.
max_create_retries = 100

# Number of vbuckets keys are spread over (mutation tokens).
num_vbuckets = 64
"#
    }

    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the text is not valid TOML for this type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: MockConfig = toml::from_str(text)
            .map_err(|e| Error::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn validate(&self) -> Result<()> {
        if self.num_vbuckets == 0 {
            return Err(Error::config("num_vbuckets must be at least 1"));
        }
        Ok(())
    }
}
