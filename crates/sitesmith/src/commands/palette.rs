//! Palette preview command.

use anyhow::{Context, Result};
use sitesmith_theme::{palette_for_topic, Animation};

/// Print the palette `bootstrap` would use for `topic`.
pub fn run(topic: &str, animation: Option<&str>) -> Result<()> {
    let mut palette = palette_for_topic(topic);
    if let Some(name) = animation {
        let animation: Animation = name.parse()?;
        palette = palette.with_animation(animation);
    }

    let json = serde_json::to_string_pretty(&palette).context("Failed to serialize palette")?;
    println!("{}", json);

    Ok(())
}
