//! Literal token replacement across a site tree.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Extensions treated as text by default.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "html",
    "htm",
    "css",
    "js",
    "mjs",
    "json",
    "xml",
    "txt",
    "md",
    "svg",
    "webmanifest",
];

/// Directories never descended into.
const ALWAYS_SKIPPED: &[&str] = &[".git", "node_modules"];

/// Errors that can occur while replacing tokens.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    #[error("Site root not found: {0}")]
    RootNotFound(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
}

/// Outcome of a replacement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceReport {
    /// Number of files inspected
    pub scanned: usize,

    /// Files rewritten, relative to the root
    pub changed: Vec<PathBuf>,
}

/// Replaces literal tokens in text files.
///
/// Matching is plain substring comparison. Tokens are tried longest first at
/// each position and replaced values are never re-scanned.
#[derive(Debug, Clone)]
pub struct TokenReplacer {
    pairs: Vec<(String, String)>,
    extensions: Vec<String>,
    skip_dirs: Vec<PathBuf>,
}

impl TokenReplacer {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        // Stable sort keeps caller order among equal lengths.
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            pairs,
            extensions: TEXT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            skip_dirs: Vec::new(),
        }
    }

    /// Restrict the pass to files with these extensions.
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = extensions.iter().map(|e| e.to_ascii_lowercase()).collect();
        self
    }

    /// Skip a directory, given relative to the root.
    pub fn skip_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.skip_dirs.push(dir.into());
        self
    }

    /// Replace every token in `text`. Returns `None` when nothing matched.
    pub fn apply(&self, text: &str) -> Option<String> {
        if !self.pairs.iter().any(|(token, _)| text.contains(token.as_str())) {
            return None;
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        'scan: while let Some(c) = rest.chars().next() {
            for (token, value) in &self.pairs {
                if rest.starts_with(token.as_str()) {
                    out.push_str(value);
                    rest = &rest[token.len()..];
                    continue 'scan;
                }
            }
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if out == text {
            None
        } else {
            Some(out)
        }
    }

    /// Rewrite the given root-relative files in place.
    ///
    /// Files without a match are left untouched. Missing files are skipped.
    pub fn replace_in_files(
        &self,
        root: &Path,
        files: &[PathBuf],
    ) -> Result<ReplaceReport, ReplaceError> {
        if !root.is_dir() {
            return Err(ReplaceError::RootNotFound(root.display().to_string()));
        }

        let mut report = ReplaceReport::default();

        for relative in files {
            let path = root.join(relative);

            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::warn!("Skipping missing file {}", path.display());
                    continue;
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    tracing::debug!("Skipping non-UTF-8 file {}", path.display());
                    continue;
                }
                Err(e) => {
                    return Err(ReplaceError::ReadError {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })
                }
            };

            report.scanned += 1;

            if let Some(updated) = self.apply(&content) {
                fs::write(&path, updated).map_err(|e| ReplaceError::WriteError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                report.changed.push(relative.clone());
            }
        }

        Ok(report)
    }

    /// Rewrite every matching text file under `root`.
    pub fn replace_in_tree(&self, root: &Path) -> Result<ReplaceReport, ReplaceError> {
        let extensions: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        let files = collect_files(root, &extensions, &self.skip_dirs)?;
        let report = self.replace_in_files(root, &files)?;

        tracing::debug!(
            "Replaced tokens in {} of {} files under {}",
            report.changed.len(),
            report.scanned,
            root.display()
        );

        Ok(report)
    }
}

/// List files under `root` with one of `extensions`, relative to `root` and sorted.
///
/// `skip_dirs` are relative to `root`. `.git` and `node_modules` are always skipped.
pub fn collect_files(
    root: &Path,
    extensions: &[&str],
    skip_dirs: &[PathBuf],
) -> Result<Vec<PathBuf>, ReplaceError> {
    if !root.is_dir() {
        return Err(ReplaceError::RootNotFound(root.display().to_string()));
    }

    let skipped: Vec<PathBuf> = skip_dirs.iter().map(|d| root.join(d)).collect();
    let mut files = Vec::new();

    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let path = entry.path();
        if !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_str().unwrap_or("");
        !ALWAYS_SKIPPED.contains(&name) && !skipped.iter().any(|s| s == path)
    });

    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !extensions.contains(&ext.as_str()) {
            continue;
        }

        if let Ok(relative) = path.strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn replaces_all_occurrences() {
        let replacer = TokenReplacer::new([("__BRAND__", "Acme"), ("__DOMAIN__", "acme.io")]);

        let out = replacer
            .apply("__BRAND__ at __DOMAIN__, again __BRAND__")
            .unwrap();

        assert_eq!(out, "Acme at acme.io, again Acme");
    }

    #[test]
    fn returns_none_without_matches() {
        let replacer = TokenReplacer::new([("__BRAND__", "Acme")]);
        assert_eq!(replacer.apply("nothing to see"), None);
    }

    #[test]
    fn prefers_longer_tokens() {
        let replacer = TokenReplacer::new([
            ("old.com", "new.io"),
            ("www.old.com", "www.new.io"),
        ]);

        assert_eq!(
            replacer.apply("https://www.old.com and old.com").unwrap(),
            "https://www.new.io and new.io"
        );
    }

    #[test]
    fn does_not_rescan_replacements() {
        let replacer = TokenReplacer::new([("__A__", "__B__"), ("__B__", "b")]);
        assert_eq!(replacer.apply("__A__").unwrap(), "__B__");
    }

    #[test]
    fn handles_multibyte_text() {
        let replacer = TokenReplacer::new([("__BRAND__", "Вино")]);
        assert_eq!(replacer.apply("¡Hola __BRAND__ ünd").unwrap(), "¡Hola Вино ünd");
    }

    #[test]
    fn rewrites_only_changed_files() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("a.txt"), "hello __BRAND__").unwrap();
        fs::write(root.join("css/site.css"), "body {}").unwrap();
        fs::write(root.join("logo.png"), [0u8, 159, 146, 150]).unwrap();

        let report = TokenReplacer::new([("__BRAND__", "Acme")])
            .replace_in_tree(root)
            .unwrap();

        assert_eq!(report.scanned, 2);
        assert_eq!(report.changed, vec![PathBuf::from("a.txt")]);
        assert_eq!(fs::read_to_string(root.join("a.txt")).unwrap(), "hello Acme");
        assert_eq!(fs::read_to_string(root.join("css/site.css")).unwrap(), "body {}");
    }

    #[test]
    fn skips_missing_and_non_utf8_files() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "hello __BRAND__").unwrap();
        fs::write(root.join("binary.txt"), [0xffu8, 0xfe, 0x00, 0x5f]).unwrap();

        let report = TokenReplacer::new([("__BRAND__", "Acme")])
            .replace_in_files(
                root,
                &[
                    PathBuf::from("missing.txt"),
                    PathBuf::from("binary.txt"),
                    PathBuf::from("a.txt"),
                ],
            )
            .unwrap();

        assert_eq!(report.scanned, 1);
        assert_eq!(report.changed, vec![PathBuf::from("a.txt")]);
        assert_eq!(fs::read(root.join("binary.txt")).unwrap(), vec![0xff, 0xfe, 0x00, 0x5f]);
        assert!(!root.join("missing.txt").exists());
    }

    #[test]
    fn skips_configured_and_hidden_dirs() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        for dir in ["_shells", ".git", "node_modules", "blog"] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("index.html"), "__BRAND__").unwrap();
        }

        let report = TokenReplacer::new([("__BRAND__", "Acme")])
            .skip_dir("_shells")
            .replace_in_tree(root)
            .unwrap();

        assert_eq!(report.changed, vec![PathBuf::from("blog/index.html")]);
        assert_eq!(
            fs::read_to_string(root.join("_shells/index.html")).unwrap(),
            "__BRAND__"
        );
    }

    #[test]
    fn respects_extension_filter() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("index.html"), "__BRAND__").unwrap();
        fs::write(root.join("app.js"), "__BRAND__").unwrap();

        let report = TokenReplacer::new([("__BRAND__", "Acme")])
            .with_extensions(&["js"])
            .replace_in_tree(root)
            .unwrap();

        assert_eq!(report.changed, vec![PathBuf::from("app.js")]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempdir().unwrap();
        let result = TokenReplacer::new([("a", "b")]).replace_in_tree(&temp.path().join("nope"));

        assert!(matches!(result, Err(ReplaceError::RootNotFound(_))));
    }
}
