//! Logo and hero image provisioning.
//!
//! Each asset lives under two names: the canonical one templates reference
//! (`logo.png`, `hero_ai.jpg`) and a brand-suffixed copy. Whatever happens to
//! the service call, both names end up holding the same bytes when any version
//! of the asset exists.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use sitesmith_theme::{SiteConfig, CANONICAL_HERO, CANONICAL_LOGO};

use crate::traits::{GenerateError, GeneratedImage, GenerativeClient};

/// The two provisioned assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Logo,
    Hero,
}

impl AssetKind {
    pub fn canonical_name(self) -> &'static str {
        match self {
            AssetKind::Logo => CANONICAL_LOGO,
            AssetKind::Hero => CANONICAL_HERO,
        }
    }

    pub fn branded_name(self, site: &SiteConfig) -> String {
        match self {
            AssetKind::Logo => site.logo_file_name().to_string(),
            AssetKind::Hero => site.hero_file_name().to_string(),
        }
    }

    pub fn format(self) -> ImageFormat {
        match self {
            AssetKind::Logo => ImageFormat::Png,
            AssetKind::Hero => ImageFormat::Jpeg,
        }
    }

    pub fn prompt(self, site: &SiteConfig) -> String {
        match self {
            AssetKind::Logo => format!(
                "Design a minimal, modern square logo mark for a website called \"{}\" about {}. \
                 Flat vector style, a single bold symbol, no text, centered on a plain solid white background.",
                site.brand(),
                site.topic()
            ),
            AssetKind::Hero => format!(
                "Create a wide cinematic hero photograph for a website about {}. \
                 Atmospheric lighting, rich but dark tones, room for overlaid text, \
                 no words, no logos, no watermarks.",
                site.topic()
            ),
        }
    }
}

/// How an asset was obtained in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Freshly generated and written under both names.
    Generated,
    /// An existing file was kept (and mirrored to the other name).
    Reused,
    /// No version of the asset exists.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionReport {
    pub logo: AssetOutcome,
    pub hero: AssetOutcome,
}

impl ProvisionReport {
    pub fn outcome(&self, kind: AssetKind) -> AssetOutcome {
        match kind {
            AssetKind::Logo => self.logo,
            AssetKind::Hero => self.hero,
        }
    }
}

/// Errors that can occur while provisioning assets.
///
/// Service failures are not errors here; only local I/O is.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Ensures the logo and hero image exist under both names.
pub struct AssetProvisioner<C> {
    site_root: PathBuf,
    client: Option<C>,
}

impl<C: GenerativeClient> AssetProvisioner<C> {
    /// `client` is `None` when generation is disabled or no credential is set.
    pub fn new(site_root: impl Into<PathBuf>, client: Option<C>) -> Self {
        Self {
            site_root: site_root.into(),
            client,
        }
    }

    pub fn client(&self) -> Option<&C> {
        self.client.as_ref()
    }

    pub async fn provision(&self, site: &SiteConfig) -> Result<ProvisionReport, ProvisionError> {
        let logo = self.provision_one(AssetKind::Logo, site).await?;
        let hero = self.provision_one(AssetKind::Hero, site).await?;

        Ok(ProvisionReport { logo, hero })
    }

    async fn provision_one(
        &self,
        kind: AssetKind,
        site: &SiteConfig,
    ) -> Result<AssetOutcome, ProvisionError> {
        let canonical = self.site_root.join(kind.canonical_name());
        let branded = self.site_root.join(kind.branded_name(site));

        if let Some(client) = &self.client {
            tracing::info!("Generating {}...", kind.canonical_name());

            match generate(client, kind, site).await {
                Ok(bytes) => {
                    write(&canonical, &bytes)?;
                    write(&branded, &bytes)?;
                    tracing::info!(
                        "Generated {} ({} bytes)",
                        kind.canonical_name(),
                        bytes.len()
                    );
                    return Ok(AssetOutcome::Generated);
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not generate {}, keeping existing file: {}",
                        kind.canonical_name(),
                        e
                    );
                }
            }
        }

        let outcome = if canonicalize(&canonical, &branded)? {
            AssetOutcome::Reused
        } else {
            tracing::warn!("No {} available", kind.canonical_name());
            AssetOutcome::Missing
        };

        Ok(outcome)
    }
}

async fn generate<C: GenerativeClient>(
    client: &C,
    kind: AssetKind,
    site: &SiteConfig,
) -> Result<Vec<u8>, GenerateError> {
    let generated = client.generate_image(&kind.prompt(site)).await?;
    encode(&generated, kind.format())
}

/// Re-encode whatever the service returned into the asset's file format.
fn encode(generated: &GeneratedImage, format: ImageFormat) -> Result<Vec<u8>, GenerateError> {
    let decoded = image::load_from_memory(&generated.bytes)
        .map_err(|e| GenerateError::Decode(e.to_string()))?;

    let decoded = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => decoded,
    };

    let mut out = Cursor::new(Vec::new());
    decoded
        .write_to(&mut out, format)
        .map_err(|e| GenerateError::Decode(e.to_string()))?;

    Ok(out.into_inner())
}

/// Make `canonical` and `branded` hold the same bytes.
///
/// A lone file is copied to the missing name. When both exist and differ,
/// the more recently modified one wins. Returns `false` when neither exists.
pub fn canonicalize(canonical: &Path, branded: &Path) -> Result<bool, ProvisionError> {
    let (source, target) = match (canonical.is_file(), branded.is_file()) {
        (false, false) => return Ok(false),
        (true, false) => (canonical, branded),
        (false, true) => (branded, canonical),
        (true, true) => {
            if read(canonical)? == read(branded)? {
                return Ok(true);
            }
            if modified(branded) > modified(canonical) {
                (branded, canonical)
            } else {
                (canonical, branded)
            }
        }
    };

    tracing::debug!("Copying {} -> {}", source.display(), target.display());
    write(target, &read(source)?)?;

    Ok(true)
}

fn modified(path: &Path) -> Option<std::time::SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn read(path: &Path) -> Result<Vec<u8>, ProvisionError> {
    fs::read(path).map_err(|e| ProvisionError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), ProvisionError> {
    fs::write(path, bytes).map_err(|e| ProvisionError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
