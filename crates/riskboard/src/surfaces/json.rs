use std::path::PathBuf;

use riskboard_core::{RenderPlan, RenderSurface, SurfaceError};

use crate::util::io::atomic_write;

/// Dumps the plan as pretty-printed JSON for inspection or other renderers
#[derive(Debug, Clone)]
pub struct JsonSurface {
    path: PathBuf,
}

impl JsonSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RenderSurface for JsonSurface {
    type Output = PathBuf;

    fn draw(&mut self, plan: &RenderPlan) -> Result<PathBuf, SurfaceError> {
        let json = serde_json::to_string_pretty(plan)
            .map_err(|e| SurfaceError::Backend(format!("Failed to serialize plan: {}", e)))?;
        atomic_write(&self.path, &json)?;
        tracing::info!(path = %self.path.display(), "wrote render plan");
        Ok(self.path.clone())
    }
}
