/// One-shot mesh loading from a text source
use std::collections::HashMap;
use std::future::Future;

use tracing::{debug, info};

use crate::error::LoadError;
use crate::geometry::Mesh;
use crate::off::parse_off;

/// Where mesh text comes from: HTTP on the web, the filesystem in a terminal
pub trait MeshSource {
    fn fetch_text(&self, location: &str) -> impl Future<Output = Result<String, LoadError>>;
}

/// A fixed set of named mesh texts
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(location.into(), text.into());
        self
    }
}

impl MeshSource for MemorySource {
    async fn fetch_text(&self, location: &str) -> Result<String, LoadError> {
        self.entries
            .get(location)
            .cloned()
            .ok_or_else(|| LoadError::fetch(format!("{location}: not found")))
    }
}

/// Fetch a mesh and parse it
pub async fn load<S: MeshSource>(source: &S, location: &str) -> Result<Mesh, LoadError> {
    debug!(location, "fetching mesh");
    let text = source.fetch_text(location).await?;
    let mesh = parse_off(&text)?;
    info!(
        location,
        polygons = mesh.len(),
        vertices = mesh.vertex_count(),
        "mesh loaded"
    );
    Ok(mesh)
}
