//! Unresolved placeholder check.

use std::path::PathBuf;

use anyhow::Result;
use sitesmith_pages::scan_unresolved;

use crate::settings::SiteSettings;

/// Run the check command. Fails when any HTML file still holds a placeholder.
pub fn run(site: PathBuf) -> Result<()> {
    let settings = SiteSettings::load(&site)?;
    let found = scan_unresolved(&site, &[settings.shells_dir()])?;

    if found.is_empty() {
        tracing::info!("No unresolved placeholders in {}", site.display());
        return Ok(());
    }

    for (path, tokens) in &found {
        tracing::warn!("{}: {}", path.display(), tokens.join(", "));
    }

    anyhow::bail!("{} file(s) with unresolved placeholders", found.len())
}
