//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Warn when the SPA assets are missing; the API keeps working without them.
/// Returns whether `index.html` was found.
pub async fn ensure_frontend(frontend_dir: &str) -> bool {
    let index = Path::new(frontend_dir).join("index.html");
    match tokio::fs::metadata(&index).await {
        Ok(meta) if meta.is_file() => {
            info!(%frontend_dir, "serving frontend assets");
            true
        }
        _ => {
            warn!(%frontend_dir, "frontend index.html not found; static assets will 404");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_frontend_is_reported() {
        assert!(!ensure_frontend("/nonexistent-frontend-dir").await);
    }
}
