//! What a deploy wrote (or would write, for a dry run).

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployedFile {
    /// `linux library`, `windows library` or `binding`
    pub role: String,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployReceipt {
    pub command: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload_id: Option<String>,
    /// Dry run only: the real run may use a different id
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub provisional_id: bool,
    pub dry_run: bool,
    pub plugins_dir: PathBuf,
    pub files: Vec<DeployedFile>,
}

impl DeployReceipt {
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.bytes).sum()
    }
}
