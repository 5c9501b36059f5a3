//! Theme stylesheet injection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::replace::{collect_files, ReplaceError, ReplaceReport};

/// `id` of the `<style>` element carrying the theme override.
pub const OVERRIDE_STYLE_ID: &str = "site-theme-override";

/// Minify CSS using lightningcss.
pub fn minify_css(css: &str) -> Result<String, String> {
    use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

    let stylesheet = StyleSheet::parse(css, ParserOptions::default())
        .map_err(|e| format!("CSS parse error: {}", e))?;

    let minified = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| format!("CSS minify error: {}", e))?;

    Ok(minified.code)
}

static OVERRIDE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<style\s+id="site-theme-override">.*?</style>"#)
        .expect("override pattern is valid")
});

/// Insert or refresh the override block in one HTML document.
///
/// Replaces an existing block, otherwise inserts before `</head>`. Returns
/// `None` when the document has no `</head>` or would not change.
pub fn inject_override(html: &str, css: &str) -> Option<String> {
    let block = format!("<style id=\"{}\">\n{}\n</style>", OVERRIDE_STYLE_ID, css.trim());

    let updated = if OVERRIDE_BLOCK.is_match(html) {
        OVERRIDE_BLOCK
            .replace(html, NoExpand(block.as_str()))
            .into_owned()
    } else if html.contains("</head>") {
        html.replacen("</head>", &format!("{}\n</head>", block), 1)
    } else {
        return None;
    };

    (updated != html).then_some(updated)
}

/// Apply the override stylesheet to every HTML file under `root`.
pub fn apply_theme_override(
    root: &Path,
    css: &str,
    skip_dirs: &[PathBuf],
) -> Result<ReplaceReport, ReplaceError> {
    let mut report = ReplaceReport::default();

    for relative in collect_files(root, &["html", "htm"], skip_dirs)? {
        let path = root.join(&relative);
        let html = fs::read_to_string(&path).map_err(|e| ReplaceError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        report.scanned += 1;

        match inject_override(&html, css) {
            Some(updated) => {
                fs::write(&path, updated).map_err(|e| ReplaceError::WriteError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                report.changed.push(relative);
            }
            None if !html.contains("</head>") => {
                tracing::debug!("No </head> in {}, theme not applied", path.display());
            }
            None => {}
        }
    }

    tracing::info!(
        "Applied theme override to {} of {} HTML files",
        report.changed.len(),
        report.scanned
    );

    Ok(report)
}
