//! Per-run site identity.

use serde::Serialize;

use crate::palette::{Animation, UnknownAnimation};

pub const MIN_ANIMATION_SPEED: u32 = 8;
pub const MAX_ANIMATION_SPEED: u32 = 60;
pub const DEFAULT_ANIMATION_SPEED: u32 = 34;

/// File name templates reference for the logo.
pub const CANONICAL_LOGO: &str = "logo.png";
/// File name templates reference for the hero image.
pub const CANONICAL_HERO: &str = "hero_ai.jpg";

/// Raw command-line input, before validation.
#[derive(Debug, Clone, Default)]
pub struct SiteInput {
    pub domain: String,
    pub brand: String,
    pub topic: String,
    pub speed: Option<i64>,
    pub subscribe_email: Option<String>,
    pub animation: Option<String>,
}

/// Validated identity of the site being generated.
///
/// Built once per run by [`SiteConfig::from_input`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteConfig {
    domain: String,
    brand: String,
    topic: String,
    slug: String,
    animation_speed_secs: u32,
    animation: Option<Animation>,
    contact_email: String,
    subscribe_email: String,
    logo_file_name: String,
    hero_file_name: String,
}

impl SiteConfig {
    pub fn from_input(input: SiteInput) -> Result<Self, ConfigError> {
        let domain = normalize_domain(&input.domain)?;
        let brand = required("brand", &input.brand)?;
        let topic = required("topic", &input.topic)?;

        let animation = match input.animation.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(name.parse::<Animation>()?),
        };

        let contact_email = format!("info@{}", domain);
        let subscribe_email = match input.subscribe_email.as_deref().map(str::trim) {
            None | Some("") => contact_email.clone(),
            Some(email) if is_email(email) => email.to_string(),
            Some(email) => return Err(ConfigError::InvalidEmail(email.to_string())),
        };

        let slug = slugify(&brand);

        Ok(Self {
            logo_file_name: format!("logo-{}.png", slug),
            hero_file_name: format!("hero_ai-{}.jpg", slug),
            animation_speed_secs: input
                .speed
                .map(clamp_animation_speed)
                .unwrap_or(DEFAULT_ANIMATION_SPEED),
            domain,
            brand,
            topic,
            slug,
            animation,
            contact_email,
            subscribe_email,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// URL-safe form of the brand, used in asset file names.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn animation_speed_secs(&self) -> u32 {
        self.animation_speed_secs
    }

    /// Explicit animation override, if one was requested.
    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }

    pub fn contact_email(&self) -> &str {
        &self.contact_email
    }

    pub fn subscribe_email(&self) -> &str {
        &self.subscribe_email
    }

    /// Brand-suffixed logo file name.
    pub fn logo_file_name(&self) -> &str {
        &self.logo_file_name
    }

    /// Brand-suffixed hero file name.
    pub fn hero_file_name(&self) -> &str {
        &self.hero_file_name
    }
}

/// Headline and subtitle shown in the home-page hero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeroCopy {
    pub title: String,
    pub subtitle: String,
}

impl HeroCopy {
    /// Copy used when no generated text is available.
    pub fn fallback(site: &SiteConfig) -> Self {
        Self {
            title: site.brand().to_string(),
            subtitle: format!("Stories, guides and inspiration about {}.", site.topic()),
        }
    }
}

/// Clamp a requested animation period into the supported range.
pub fn clamp_animation_speed(raw: i64) -> u32 {
    raw.clamp(
        i64::from(MIN_ANIMATION_SPEED),
        i64::from(MAX_ANIMATION_SPEED),
    ) as u32
}

/// Lower-case alphanumeric words joined by `-`.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());

    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "site".to_string()
    } else {
        slug.to_string()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(field));
    }
    Ok(value.to_string())
}

fn normalize_domain(raw: &str) -> Result<String, ConfigError> {
    let raw = required("domain", raw)?;
    let stripped = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw.as_str())
        .trim_end_matches('/')
        .to_ascii_lowercase();

    if stripped.is_empty() || stripped.contains(char::is_whitespace) || stripped.contains('/') {
        return Err(ConfigError::InvalidDomain(raw));
    }

    Ok(stripped)
}

fn is_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, host)) => {
            !local.is_empty() && !host.is_empty() && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Errors that can occur when validating site input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required value: --{0}")]
    Missing(&'static str),

    #[error("Invalid domain: {0:?}")]
    InvalidDomain(String),

    #[error("Invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error(transparent)]
    UnknownAnimation(#[from] UnknownAnimation),
}
