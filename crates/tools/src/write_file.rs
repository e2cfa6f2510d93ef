//! File writer for `[writefile(...)]` directives.
//!
//! Creates parent directories, writes the exact content between the tags,
//! and reports success or failure as an outcome value.

use ori_core::directive::ExecutionOutcome;
use tracing::debug;

/// Writes directive content to the named path.
pub struct FileWriter;

impl FileWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write `content` to `path`, creating parent directories as needed.
    pub async fn write(&self, path: &str, content: &str) -> ExecutionOutcome {
        debug!(path = %path, bytes = content.len(), "Writing file");

        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = tokio::fs::create_dir_all(parent).await
        {
            return ExecutionOutcome::failure(format!("Failed to create directory: {e}"));
        }

        match tokio::fs::write(path, content).await {
            Ok(()) => ExecutionOutcome::success(format!(
                "Wrote {} bytes to {path}",
                content.len()
            )),
            Err(e) => ExecutionOutcome::failure(format!("Failed to write {path}: {e}")),
        }
    }
}

impl Default for FileWriter {
    fn default() -> Self {
        Self::new()
    }
}
