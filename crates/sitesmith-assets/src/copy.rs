//! Generated hero headline and subtitle.

use serde::Deserialize;
use sitesmith_theme::{HeroCopy, SiteConfig};

use crate::traits::GenerativeClient;

#[derive(Debug, Deserialize)]
struct RawHeroCopy {
    #[serde(default)]
    title: String,
    #[serde(default)]
    subtitle: String,
}

fn prompt(site: &SiteConfig) -> String {
    format!(
        "Write hero copy for the home page of \"{}\", a website about {}. \
         Respond with JSON only: {{\"title\": \"...\", \"subtitle\": \"...\"}}. \
         The title is at most 8 words, the subtitle one sentence of at most 20 words.",
        site.brand(),
        site.topic()
    )
}

/// Ask `client` for hero copy, falling back to [`HeroCopy::fallback`].
pub async fn hero_copy<C: GenerativeClient>(client: Option<&C>, site: &SiteConfig) -> HeroCopy {
    let Some(client) = client else {
        return HeroCopy::fallback(site);
    };

    match client.generate_text(&prompt(site)).await {
        Ok(text) => parse_hero_copy(&text).unwrap_or_else(|| {
            tracing::warn!("Unusable hero copy response, using fallback");
            HeroCopy::fallback(site)
        }),
        Err(e) => {
            tracing::warn!("Could not generate hero copy: {}", e);
            HeroCopy::fallback(site)
        }
    }
}

/// Extract `{title, subtitle}` from a model response.
///
/// Tolerates Markdown code fences and prose around the JSON object. Returns
/// `None` when either field is missing or blank.
pub fn parse_hero_copy(text: &str) -> Option<HeroCopy> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }

    let raw: RawHeroCopy = serde_json::from_str(&text[start..=end]).ok()?;
    let title = raw.title.trim();
    let subtitle = raw.subtitle.trim();

    if title.is_empty() || subtitle.is_empty() {
        return None;
    }

    Some(HeroCopy {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
    })
}
