//! Static file responder.
//!
//! Path traversal, index files, conditional requests, and ranges are all
//! handled by `ServeDir`; this module only binds it to a site's root.

use std::convert::Infallible;
use std::path::{Path, PathBuf};

use axum::{body::Body, http::Request, response::Response};
use tower::ServiceExt;
use tower_http::services::ServeDir;

/// A directory served for one static site.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    service: ServeDir,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            service: ServeDir::new(&root),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve `request` from the root directory.
    pub async fn serve(&self, request: Request<Body>) -> Response {
        let result: Result<_, Infallible> = self.service.clone().oneshot(request).await;
        match result {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}
