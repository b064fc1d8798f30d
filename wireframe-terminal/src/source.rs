/// Mesh text read from the local filesystem
use wireframe_core::{LoadError, MeshSource};

/// Reads plain paths and `file://` locations
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl MeshSource for FileSource {
    async fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        let path = location.strip_prefix("file://").unwrap_or(location);
        std::fs::read_to_string(path).map_err(|e| LoadError::fetch(format!("{path}: {e}")))
    }
}
