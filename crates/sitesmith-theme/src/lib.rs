//! Site identity and color theming.
//!
//! Turns command-line input into an immutable [`SiteConfig`] and derives the
//! [`Palette`] and override stylesheet applied to every generated page.

pub mod color;
pub mod config;
pub mod css;
pub mod palette;

pub use color::{ColorError, HexColor, Rgb, Rgba};
pub use config::{
    clamp_animation_speed, slugify, ConfigError, HeroCopy, SiteConfig, SiteInput, CANONICAL_HERO,
    CANONICAL_LOGO, DEFAULT_ANIMATION_SPEED, MAX_ANIMATION_SPEED, MIN_ANIMATION_SPEED,
};
pub use css::theme_override_css;
pub use palette::{palette_for_topic, Animation, Palette, UnknownAnimation};
