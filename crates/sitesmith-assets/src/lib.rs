//! Generated brand assets.
//!
//! Talks to a generative-image service through the [`GenerativeClient`] seam,
//! stores the results under canonical and brand-suffixed names, and falls back
//! to whatever assets already exist whenever the service is unavailable.

pub mod copy;
pub mod gemini;
pub mod provision;
pub mod traits;
pub mod transparent;

pub use copy::{hero_copy, parse_hero_copy};
pub use gemini::{GeminiClient, GeminiSettings};
pub use provision::{
    canonicalize, AssetKind, AssetOutcome, AssetProvisioner, ProvisionError, ProvisionReport,
};
pub use traits::{GenerateError, GeneratedImage, GenerativeClient};
pub use transparent::make_background_transparent;
