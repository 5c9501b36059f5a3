//! Local preview of a bootstrapped site.
//!
//! Serves only what would be published: the shell templates and `site.toml`
//! answer 404, and HTML still holding placeholders is reported at start-up.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::Router;
use sitesmith_pages::scan_unresolved;
use tower_http::services::ServeDir;

use crate::settings::{SiteSettings, SETTINGS_FILE};

/// Site inputs that are never part of the published tree.
#[derive(Debug, Clone)]
struct Unpublished {
    shells_dir: String,
}

impl Unpublished {
    fn new(settings: &SiteSettings) -> Self {
        Self {
            shells_dir: settings.site.shells_dir.trim_matches('/').to_string(),
        }
    }

    /// Whether a request path points into the site inputs.
    fn contains(&self, path: &str) -> bool {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        match segments.next() {
            Some(first) if first.eq_ignore_ascii_case(&self.shells_dir) => true,
            Some(first) => first.eq_ignore_ascii_case(SETTINGS_FILE) && segments.next().is_none(),
            None => false,
        }
    }
}

async fn hide_unpublished(
    State(unpublished): State<Arc<Unpublished>>,
    request: Request,
    next: Next,
) -> Response {
    if unpublished.contains(request.uri().path()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf) -> Result<()> {
    if !dir.join("index.html").is_file() {
        anyhow::bail!(
            "No index.html in {}. Run 'sitesmith bootstrap' first.",
            dir.display()
        );
    }

    let settings = SiteSettings::load(&dir)?;
    let unresolved = scan_unresolved(&dir, &[settings.shells_dir()])?;
    for (path, tokens) in &unresolved {
        tracing::warn!("{} still has {}", path.display(), tokens.join(", "));
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Previewing {} at http://{}", dir.display(), addr);

    let unpublished = Arc::new(Unpublished::new(&settings));
    let app = Router::new()
        .fallback_service(ServeDir::new(&dir))
        .layer(middleware::from_fn_with_state(unpublished, hide_unpublished));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let url = format!("http://{}", addr);
    if let Err(e) = open::that(&url) {
        tracing::debug!("Could not open browser: {}", e);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
