//! Legal notice pages.

use std::fs;
use std::path::{Path, PathBuf};

use pulldown_cmark::{html, Options, Parser};
use sitesmith_theme::{Palette, SiteConfig, CANONICAL_LOGO};

use crate::templates::{PolicyContext, TemplateEngine};

/// The fixed set of policy pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyPage {
    Privacy,
    Terms,
    Refund,
}

impl PolicyPage {
    pub const ALL: [PolicyPage; 3] = [PolicyPage::Privacy, PolicyPage::Terms, PolicyPage::Refund];

    pub fn slug(self) -> &'static str {
        match self {
            PolicyPage::Privacy => "privacy",
            PolicyPage::Terms => "terms",
            PolicyPage::Refund => "refund",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PolicyPage::Privacy => "Privacy Policy",
            PolicyPage::Terms => "Terms of Service",
            PolicyPage::Refund => "Refund Policy",
        }
    }

    fn body_template(self) -> String {
        format!("{}.md", self.slug())
    }

    /// Output path relative to the site root, e.g. `policy/privacy/index.html`.
    pub fn relative_path(self) -> PathBuf {
        PathBuf::from("policy").join(self.slug()).join("index.html")
    }
}

/// Errors that can occur while writing policy pages.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Failed to render {page}: {message}")]
    TemplateError { page: &'static str, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Renders and writes the policy pages for a site.
pub struct PolicyWriter {
    site_root: PathBuf,
    templates: TemplateEngine,
}

impl PolicyWriter {
    pub fn new(site_root: impl Into<PathBuf>) -> Result<Self, PolicyError> {
        let templates = TemplateEngine::new().map_err(|e| PolicyError::TemplateError {
            page: "policy shell",
            message: e.to_string(),
        })?;

        Ok(Self {
            site_root: site_root.into(),
            templates,
        })
    }

    /// Render one page to a complete HTML document.
    pub fn render(
        &self,
        page: PolicyPage,
        site: &SiteConfig,
        palette: &Palette,
    ) -> Result<String, PolicyError> {
        let template_error = |e: minijinja::Error| PolicyError::TemplateError {
            page: page.slug(),
            message: e.to_string(),
        };

        let context = PolicyContext {
            title: page.title().to_string(),
            brand: site.brand().to_string(),
            domain: site.domain().to_string(),
            email: site.contact_email().to_string(),
            logo: CANONICAL_LOGO.to_string(),
            background: palette.background0.to_string(),
            accent: palette.accent.to_string(),
        };

        let markdown = self
            .templates
            .render_body(&page.body_template(), &context)
            .map_err(template_error)?;

        self.templates
            .render_page(&context, &markdown_to_html(&markdown))
            .map_err(template_error)
    }

    /// Write every policy page, creating directories as needed.
    pub fn write_all(
        &self,
        site: &SiteConfig,
        palette: &Palette,
    ) -> Result<Vec<PathBuf>, PolicyError> {
        let mut written = Vec::with_capacity(PolicyPage::ALL.len());

        for page in PolicyPage::ALL {
            let html = self.render(page, site, palette)?;
            let relative = page.relative_path();
            write(&self.site_root.join(&relative), &html)?;
            written.push(relative);
        }

        tracing::info!("Wrote {} policy pages", written.len());

        Ok(written)
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn write(path: &Path, html: &str) -> Result<(), PolicyError> {
    let write_error = |e: std::io::Error| PolicyError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, html).map_err(write_error)
}
