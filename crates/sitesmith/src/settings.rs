//! Per-site settings file (site.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sitesmith_pages::{normalize_languages, MaterializeConfig, SUPPORTED_LANGUAGES};
use sitesmith_theme::HexColor;

pub const SETTINGS_FILE: &str = "site.toml";

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct SiteSettings {
    #[serde(default)]
    pub site: SiteSection,
    #[serde(default)]
    pub theme: ThemeSection,
    #[serde(default)]
    pub assets: AssetSection,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct SiteSection {
    #[serde(default = "default_shells_dir")]
    pub shells_dir: String,
    #[serde(default = "default_home_shell")]
    pub home_shell: String,
    #[serde(default = "default_blog_shell")]
    pub blog_shell: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Domains the shells were cut from; rewritten to the new domain
    #[serde(default = "default_legacy_domains")]
    pub legacy_domains: Vec<String>,
    #[serde(default = "default_switcher")]
    pub switcher: String,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ThemeSection {
    #[serde(default = "default_true")]
    pub minify: bool,
    /// Overrides the topic palette's base background (`#rrggbb`)
    pub background: Option<String>,
    /// Overrides the topic palette's accent (`#rrggbb`)
    pub accent: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct AssetSection {
    #[serde(default = "default_true")]
    pub generate: bool,
    #[serde(default = "default_true")]
    pub transparent_logo: bool,
    #[serde(default = "default_tolerance")]
    pub transparency_tolerance: u8,
}

fn default_shells_dir() -> String {
    "_shells".to_string()
}
fn default_home_shell() -> String {
    "index.html".to_string()
}
fn default_blog_shell() -> String {
    "blog-index.html".to_string()
}
fn default_languages() -> Vec<String> {
    ["en", "ru", "es", "de", "fr"]
        .iter()
        .map(|l| l.to_string())
        .collect()
}
fn default_language() -> String {
    "en".to_string()
}
fn default_legacy_domains() -> Vec<String> {
    vec!["myugc.studio".to_string(), "www.myugc.studio".to_string()]
}
fn default_switcher() -> String {
    "i18n-switcher.js".to_string()
}
fn default_true() -> bool {
    true
}
fn default_tolerance() -> u8 {
    24
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            shells_dir: default_shells_dir(),
            home_shell: default_home_shell(),
            blog_shell: default_blog_shell(),
            languages: default_languages(),
            default_language: default_language(),
            legacy_domains: default_legacy_domains(),
            switcher: default_switcher(),
        }
    }
}

impl Default for ThemeSection {
    fn default() -> Self {
        Self {
            minify: true,
            background: None,
            accent: None,
        }
    }
}

impl Default for AssetSection {
    fn default() -> Self {
        Self {
            generate: true,
            transparent_logo: true,
            transparency_tolerance: default_tolerance(),
        }
    }
}

impl SiteSettings {
    /// Load `site.toml` from the site root if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(site_root: &Path) -> Result<Self> {
        let path = site_root.join(SETTINGS_FILE);
        if !path.exists() {
            tracing::debug!("No {} in {}, using defaults", SETTINGS_FILE, site_root.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: SiteSettings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        settings
            .validate()
            .with_context(|| format!("Invalid settings in {}", path.display()))?;

        tracing::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        let default_language = self.site.default_language.trim().to_ascii_lowercase();
        if !SUPPORTED_LANGUAGES.contains(&default_language.as_str()) {
            anyhow::bail!(
                "default_language \"{}\" is not one of {}",
                self.site.default_language,
                SUPPORTED_LANGUAGES.join(", ")
            );
        }

        for (key, value) in [
            ("background", &self.theme.background),
            ("accent", &self.theme.accent),
        ] {
            if let Some(value) = value {
                if value.parse::<HexColor>().is_err() {
                    tracing::warn!(
                        "Ignoring [theme] {} = \"{}\": not a #rrggbb color",
                        key,
                        value
                    );
                }
            }
        }

        Ok(())
    }

    /// Supported languages in switcher order, `en` first.
    pub fn enabled_languages(&self) -> Vec<String> {
        normalize_languages(&self.site.languages)
    }

    pub fn shells_dir(&self) -> PathBuf {
        PathBuf::from(&self.site.shells_dir)
    }

    pub fn materialize_config(&self, site_root: &Path) -> MaterializeConfig {
        let default_language = self.site.default_language.trim().to_ascii_lowercase();
        let languages = self
            .enabled_languages()
            .into_iter()
            .filter(|lang| *lang != default_language)
            .collect();

        MaterializeConfig {
            site_root: site_root.to_path_buf(),
            shells_dir: self.shells_dir(),
            home_shell: self.site.home_shell.clone(),
            blog_shell: self.site.blog_shell.clone(),
            default_language,
            languages,
        }
    }
}
