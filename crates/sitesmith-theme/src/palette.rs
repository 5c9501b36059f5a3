//! Topic-driven color palettes.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::{HexColor, Rgb, Rgba};

/// Background animation preset. Selects the three glow colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Animation {
    Wine,
    Aurora,
    Sunset,
    Minimal,
}

impl Animation {
    pub const ALL: [Animation; 4] = [
        Animation::Wine,
        Animation::Aurora,
        Animation::Sunset,
        Animation::Minimal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Animation::Wine => "wine",
            Animation::Aurora => "aurora",
            Animation::Sunset => "sunset",
            Animation::Minimal => "minimal",
        }
    }

    /// Glow colors for this preset over the given base background.
    pub fn glows(self, base: Rgb) -> [Rgba; 3] {
        let [g1, g2, g3] = match self {
            Animation::Wine => [
                base.mix(Rgb(190, 24, 93), 0.55),
                base.mix(Rgb(225, 29, 72), 0.35),
                base.mix(Rgb(136, 19, 55), 0.45),
            ],
            Animation::Aurora => [Rgb(56, 189, 248), Rgb(168, 85, 247), Rgb(34, 197, 94)],
            Animation::Sunset => [Rgb(251, 146, 60), Rgb(244, 63, 94), Rgb(245, 158, 11)],
            Animation::Minimal => [
                base.mix(Rgb::WHITE, 0.1),
                base.mix(Rgb::BLACK, 0.1),
                base.mix(Rgb::WHITE, 0.2),
            ],
        };

        [g1.with_alpha(0.62), g2.with_alpha(0.44), g3.with_alpha(0.58)]
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Animation {
    type Err = UnknownAnimation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Animation::ALL
            .into_iter()
            .find(|a| a.name() == wanted)
            .ok_or_else(|| UnknownAnimation(s.to_string()))
    }
}

/// An animation name outside the known presets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown animation {0:?} (expected one of: wine, aurora, sunset, minimal)")]
pub struct UnknownAnimation(pub String);

/// Colors applied uniformly across a generated site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Palette {
    /// Which table entry produced this palette
    pub name: &'static str,
    pub background0: HexColor,
    pub background1: HexColor,
    pub background2: HexColor,
    pub accent: HexColor,
    pub accent_hover: HexColor,
    pub glow1: Rgba,
    pub glow2: Rgba,
    pub glow3: Rgba,
    pub animation: Animation,
}

impl Palette {
    /// Derive the full palette from a base background and an accent.
    pub fn derive(
        name: &'static str,
        base: HexColor,
        accent: HexColor,
        animation: Animation,
    ) -> Self {
        let rgb = base.rgb();
        let [glow1, glow2, glow3] = animation.glows(rgb);

        Self {
            name,
            background0: base,
            background1: rgb.mix(Rgb::BLACK, 0.35).to_hex(),
            background2: rgb.mix(Rgb::WHITE, 0.22).to_hex(),
            accent,
            accent_hover: accent.rgb().mix(Rgb::BLACK, 0.18).to_hex(),
            glow1,
            glow2,
            glow3,
            animation,
        }
    }

    pub fn wine() -> Self {
        Self::derive(
            "wine",
            HexColor::from_rgb(0x12, 0x07, 0x0c),
            HexColor::from_rgb(0xb6, 0x3a, 0x5a),
            Animation::Wine,
        )
    }

    /// Re-derive from operator-supplied colors.
    ///
    /// Values that are not 6-digit hex colors keep the current base or accent.
    pub fn with_colors(self, background: Option<&str>, accent: Option<&str>) -> Self {
        let base = background
            .map(|v| HexColor::parse_or(v, self.background0))
            .unwrap_or(self.background0);
        let accent = accent
            .map(|v| HexColor::parse_or(v, self.accent))
            .unwrap_or(self.accent);

        Self::derive(self.name, base, accent, self.animation)
    }

    /// Swap the glow preset, keeping backgrounds and accents.
    pub fn with_animation(self, animation: Animation) -> Self {
        let [glow1, glow2, glow3] = animation.glows(self.background0.rgb());
        Self {
            glow1,
            glow2,
            glow3,
            animation,
            ..self
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::derive(
            "default",
            HexColor::from_rgb(0x0b, 0x10, 0x20),
            HexColor::from_rgb(0x4f, 0x7c, 0xff),
            Animation::Aurora,
        )
    }
}

/// Keyword table checked against the lower-cased topic, first match wins.
const TOPIC_PALETTES: &[(&str, fn() -> Palette)] = &[("wine", Palette::wine)];

/// Pick the palette for a topic. Topics matching no keyword get the default.
pub fn palette_for_topic(topic: &str) -> Palette {
    let topic = topic.to_lowercase();

    TOPIC_PALETTES
        .iter()
        .find(|(keyword, _)| topic.contains(keyword))
        .map(|(_, build)| build())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wine_topics_get_wine_palette() {
        for topic in ["wine", "Wine travel", "best WINERIES in Rioja", "swine"] {
            assert_eq!(palette_for_topic(topic), Palette::wine(), "{topic}");
        }
    }

    #[test]
    fn other_topics_get_default_palette() {
        for topic in ["", "coffee", "AI automation", "vineyard hotels"] {
            assert_eq!(palette_for_topic(topic), Palette::default(), "{topic}");
        }
    }

    #[test]
    fn operator_colors_rederive_palette() {
        let p = Palette::wine().with_colors(Some("#FFFFFF"), Some("00ff00"));

        assert_eq!(p.background0.to_string(), "#ffffff");
        assert_eq!(p.accent.to_string(), "#00ff00");
        assert_eq!(p.accent_hover.to_string(), "#00d100");
        assert_eq!(p.animation, Animation::Wine);
        assert_eq!(p.name, "wine");
    }

    #[test]
    fn invalid_operator_colors_are_ignored() {
        let p = Palette::wine().with_colors(Some("red"), None);
        assert_eq!(p, Palette::wine());
    }

    #[test]
    fn wine_palette_values() {
        let p = Palette::wine();

        assert_eq!(p.background0.to_string(), "#12070c");
        assert_eq!(p.background1.to_string(), "#0c0508");
        assert_eq!(p.background2.to_string(), "#463e41");
        assert_eq!(p.accent.to_string(), "#b63a5a");
        assert_eq!(p.accent_hover.to_string(), "#95304a");
        assert_eq!(p.glow1.to_string(), "rgba(113,16,57,0.62)");
        assert_eq!(p.glow2.to_string(), "rgba(90,15,33,0.44)");
        assert_eq!(p.glow3.to_string(), "rgba(71,12,31,0.58)");
    }

    #[test]
    fn hex_values_are_well_formed() {
        for p in [Palette::wine(), Palette::default()] {
            for hex in [
                p.background0,
                p.background1,
                p.background2,
                p.accent,
                p.accent_hover,
            ] {
                let s = hex.to_string();
                assert_eq!(s.len(), 7);
                assert!(s.starts_with('#'));
                assert!(s[1..].chars().all(|c| c.is_ascii_hexdigit()));
            }
        }
    }

    #[test]
    fn animation_override_only_changes_glows() {
        let wine = Palette::wine();
        let sunset = wine.clone().with_animation(Animation::Sunset);

        assert_eq!(sunset.background0, wine.background0);
        assert_eq!(sunset.accent, wine.accent);
        assert_eq!(sunset.glow1.to_string(), "rgba(251,146,60,0.62)");
        assert_eq!(sunset.animation, Animation::Sunset);
    }

    #[test]
    fn parses_animation_names() {
        assert_eq!("Aurora".parse::<Animation>(), Ok(Animation::Aurora));
        assert_eq!(" minimal ".parse::<Animation>(), Ok(Animation::Minimal));
        assert!("disco".parse::<Animation>().is_err());
    }
}
