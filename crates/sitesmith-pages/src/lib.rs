//! Page generation for sitesmith sites.
//!
//! Materializes HTML shell templates into a site tree, resolves placeholder
//! tokens, writes the legal notice pages and applies the theme stylesheet.

pub mod materialize;
pub mod placeholders;
pub mod policy;
pub mod replace;
pub mod switcher;
pub mod templates;
pub mod theme;

pub use materialize::{MaterializeConfig, MaterializeError, MaterializeReport, PageMaterializer};
pub use placeholders::{
    legacy_domain_pairs, scan_unresolved, unresolved_tokens, Placeholder, Substitutions,
};
pub use policy::{PolicyError, PolicyPage, PolicyWriter};
pub use replace::{collect_files, ReplaceError, ReplaceReport, TokenReplacer, TEXT_EXTENSIONS};
pub use switcher::{
    normalize_languages, update_switcher, SwitcherError, SwitcherUpdate, SUPPORTED_LANGUAGES,
};
pub use templates::TemplateEngine;
pub use theme::{apply_theme_override, inject_override, minify_css, OVERRIDE_STYLE_ID};
