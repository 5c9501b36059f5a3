//! Enabled languages for the i18n switcher script.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Languages the switcher knows how to serve.
pub const SUPPORTED_LANGUAGES: [&str; 5] = ["en", "ru", "es", "de", "fr"];

/// Filter to supported languages, drop duplicates and force `en` first.
///
/// An empty or fully unsupported input leaves only `en`.
pub fn normalize_languages<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();

    for lang in raw {
        let lang = lang.as_ref().trim().to_ascii_lowercase();
        if SUPPORTED_LANGUAGES.contains(&lang.as_str()) && !out.contains(&lang) {
            out.push(lang);
        }
    }

    if let Some(pos) = out.iter().position(|l| l == "en") {
        out.remove(pos);
    }
    out.insert(0, "en".to_string());
    out
}

/// What happened to the switcher script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherUpdate {
    Updated,
    Unchanged,
    Missing,
}

/// Errors that can occur while updating the switcher.
#[derive(Debug, thiserror::Error)]
pub enum SwitcherError {
    #[error("No `var supported = [...]` array in {0}")]
    MissingArray(String),

    #[error("Failed to update {path}: {message}")]
    Io { path: String, message: String },
}

static SUPPORTED_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var\s+supported\s*=\s*\[[^\]]*\];").expect("supported pattern is valid")
});

/// Rewrite the `var supported = [...]` array in the switcher script.
pub fn update_switcher(path: &Path, languages: &[String]) -> Result<SwitcherUpdate, SwitcherError> {
    let io_error = |e: io::Error| SwitcherError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SwitcherUpdate::Missing),
        Err(e) => return Err(io_error(e)),
    };

    if !SUPPORTED_ARRAY.is_match(&source) {
        return Err(SwitcherError::MissingArray(path.display().to_string()));
    }

    let quoted: Vec<String> = languages.iter().map(|l| format!("\"{}\"", l)).collect();
    let array = format!("var supported = [{}];", quoted.join(", "));
    let updated = SUPPORTED_ARRAY.replace(&source, NoExpand(array.as_str()));

    if updated == source {
        return Ok(SwitcherUpdate::Unchanged);
    }

    fs::write(path, updated.as_bytes()).map_err(io_error)?;
    Ok(SwitcherUpdate::Updated)
}
