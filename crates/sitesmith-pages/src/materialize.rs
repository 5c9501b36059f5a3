//! Page materialization from shell templates.

use std::fs;
use std::path::{Path, PathBuf};

use crate::placeholders::{escape_html, scan_unresolved, Placeholder, Substitutions};
use crate::replace::ReplaceError;

/// Where the shells live and where their copies go.
#[derive(Debug, Clone)]
pub struct MaterializeConfig {
    /// Site root; every output is written below it
    pub site_root: PathBuf,

    /// Directory holding the shells, relative to the root. Never modified.
    pub shells_dir: PathBuf,

    /// Home-page shell file name inside `shells_dir`
    pub home_shell: String,

    /// Blog-index shell file name inside `shells_dir`
    pub blog_shell: String,

    /// Language served at the root
    pub default_language: String,

    /// Additional languages, each served under `/<lang>/blog/`
    pub languages: Vec<String>,
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            site_root: PathBuf::from("."),
            shells_dir: PathBuf::from("_shells"),
            home_shell: "index.html".to_string(),
            blog_shell: "blog-index.html".to_string(),
            default_language: "en".to_string(),
            languages: vec![
                "ru".to_string(),
                "es".to_string(),
                "de".to_string(),
                "fr".to_string(),
            ],
        }
    }
}

impl MaterializeConfig {
    pub fn home_shell_path(&self) -> PathBuf {
        self.site_root.join(&self.shells_dir).join(&self.home_shell)
    }

    pub fn blog_shell_path(&self) -> PathBuf {
        self.site_root.join(&self.shells_dir).join(&self.blog_shell)
    }
}

/// Result of a materialization run.
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Pages written from shells, relative to the root
    pub pages: Vec<PathBuf>,

    /// HTML files inspected by the substitution pass
    pub scanned: usize,

    /// Existing HTML files rewritten by the substitution pass
    pub substituted: usize,
}

/// Errors that can occur while materializing pages.
#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("Site root not found: {0}")]
    RootNotFound(String),

    #[error("Required shell template missing: {0}")]
    MissingShell(String),

    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },

    #[error(transparent)]
    Replace(#[from] ReplaceError),

    #[error("Unresolved placeholders in {path}: {}", .tokens.join(", "))]
    Unresolved { path: String, tokens: Vec<String> },
}

/// Copies shells into the site tree and resolves their placeholders.
pub struct PageMaterializer {
    config: MaterializeConfig,
}

impl PageMaterializer {
    pub fn new(config: MaterializeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaterializeConfig {
        &self.config
    }

    /// Check the required inputs without writing anything.
    pub fn preflight(&self) -> Result<(), MaterializeError> {
        if !self.config.site_root.is_dir() {
            return Err(MaterializeError::RootNotFound(
                self.config.site_root.display().to_string(),
            ));
        }

        for shell in [self.config.home_shell_path(), self.config.blog_shell_path()] {
            if !shell.is_file() {
                return Err(MaterializeError::MissingShell(shell.display().to_string()));
            }
        }

        Ok(())
    }

    /// Blog-index outputs as `(language, path relative to root)`.
    pub fn blog_targets(&self) -> Vec<(String, PathBuf)> {
        let mut targets = vec![(
            self.config.default_language.clone(),
            PathBuf::from("blog").join("index.html"),
        )];

        for lang in &self.config.languages {
            if *lang == self.config.default_language {
                continue;
            }
            targets.push((lang.clone(), PathBuf::from(lang).join("blog").join("index.html")));
        }

        targets
    }

    /// Write the pages and substitute placeholders in every HTML file.
    ///
    /// Fails before writing anything if a shell is missing, and after the pass
    /// if any HTML file still contains a placeholder.
    pub fn materialize(
        &self,
        subs: &Substitutions,
        legacy_pairs: &[(String, String)],
    ) -> Result<MaterializeReport, MaterializeError> {
        self.preflight()?;

        let root = &self.config.site_root;
        let home = read(&self.config.home_shell_path())?;
        let blog = read(&self.config.blog_shell_path())?;

        let replacer = subs
            .replacer(legacy_pairs)
            .with_extensions(&["html", "htm"])
            .skip_dir(&self.config.shells_dir);

        let mut report = MaterializeReport::default();

        let home_html = replacer.apply(&home).unwrap_or(home);
        write(root, Path::new("index.html"), &home_html)?;
        report.pages.push(PathBuf::from("index.html"));

        for (lang, target) in self.blog_targets() {
            let localized = blog.replace(Placeholder::Lang.token(), &escape_html(&lang));
            let html = replacer.apply(&localized).unwrap_or(localized);
            write(root, &target, &html)?;
            report.pages.push(target);
        }

        let pass = replacer.replace_in_tree(root)?;
        report.scanned = pass.scanned;
        report.substituted = pass.changed.len();

        if let Some((path, tokens)) =
            scan_unresolved(root, &[self.config.shells_dir.clone()])?.into_iter().next()
        {
            return Err(MaterializeError::Unresolved {
                path: path.display().to_string(),
                tokens,
            });
        }

        tracing::info!(
            "Materialized {} pages, substituted placeholders in {} of {} HTML files",
            report.pages.len(),
            report.substituted,
            report.scanned
        );

        Ok(report)
    }
}

fn read(path: &Path) -> Result<String, MaterializeError> {
    fs::read_to_string(path).map_err(|e| MaterializeError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn write(root: &Path, relative: &Path, content: &str) -> Result<(), MaterializeError> {
    let path = root.join(relative);
    let write_error = |e: std::io::Error| MaterializeError::WriteError {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(&path, content).map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholders::legacy_domain_pairs;
    use sitesmith_theme::{HeroCopy, Palette, SiteConfig, SiteInput};
    use tempfile::tempdir;

    const HOME: &str = r#"<html lang="__LANG__"><head><title>__BRAND__</title></head>
<body style="--a:__ACCENT__"><img src="/__LOGO_FILE__"><h1>__HERO_TITLE__</h1>
<a href="https://myugc.studio/">__DOMAIN__</a></body></html>"#;

    const BLOG: &str = r#"<html lang="__LANG__"><body>__BRAND__ blog · __SUBSCRIBE_EMAIL__</body></html>"#;

    fn site() -> SiteConfig {
        SiteConfig::from_input(SiteInput {
            domain: "example.com".to_string(),
            brand: "Example Co".to_string(),
            topic: "coffee".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    fn setup(root: &Path) -> PageMaterializer {
        fs::create_dir_all(root.join("_shells")).unwrap();
        fs::write(root.join("_shells/index.html"), HOME).unwrap();
        fs::write(root.join("_shells/blog-index.html"), BLOG).unwrap();

        PageMaterializer::new(MaterializeConfig {
            site_root: root.to_path_buf(),
            ..Default::default()
        })
    }

    fn subs() -> Substitutions {
        let site = site();
        Substitutions::for_site(&site, &Palette::default(), &HeroCopy::fallback(&site), "en")
    }

    #[test]
    fn writes_home_and_localized_blogs() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let materializer = setup(root);
        let legacy = legacy_domain_pairs(&["myugc.studio".to_string()], "example.com");

        let report = materializer.materialize(&subs(), &legacy).unwrap();

        assert_eq!(report.pages.len(), 6);
        let home = fs::read_to_string(root.join("index.html")).unwrap();
        assert!(home.contains(r#"<html lang="en">"#));
        assert!(home.contains("<title>Example Co</title>"));
        assert!(home.contains("/logo-example-co.png"));
        assert!(home.contains("https://example.com/"));
        assert!(!home.contains("myugc.studio"));

        let de = fs::read_to_string(root.join("de/blog/index.html")).unwrap();
        assert!(de.contains(r#"<html lang="de">"#));
        assert!(de.contains("info@example.com"));
        assert!(root.join("blog/index.html").exists());
        assert!(!root.join("en/blog/index.html").exists());
    }

    #[test]
    fn leaves_shells_untouched() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let materializer = setup(root);

        materializer.materialize(&subs(), &[]).unwrap();

        assert_eq!(fs::read_to_string(root.join("_shells/index.html")).unwrap(), HOME);
        assert_eq!(
            fs::read_to_string(root.join("_shells/blog-index.html")).unwrap(),
            BLOG
        );
    }

    #[test]
    fn substitutes_existing_pages() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let materializer = setup(root);
        fs::create_dir_all(root.join("about")).unwrap();
        fs::write(root.join("about/index.html"), "<p>About __BRAND__</p>").unwrap();

        let report = materializer.materialize(&subs(), &[]).unwrap();

        assert_eq!(report.substituted, 1);
        assert_eq!(
            fs::read_to_string(root.join("about/index.html")).unwrap(),
            "<p>About Example Co</p>"
        );
    }

    #[test]
    fn missing_shell_aborts_before_writing() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let materializer = setup(root);
        fs::remove_file(root.join("_shells/blog-index.html")).unwrap();

        let result = materializer.materialize(&subs(), &[]);

        assert!(matches!(result, Err(MaterializeError::MissingShell(_))));
        assert!(!root.join("index.html").exists());
    }

    #[test]
    fn unknown_placeholder_fails_the_run() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let materializer = setup(root);
        fs::write(root.join("promo.html"), "<p>__PROMO_CODE__</p>").unwrap();

        let result = materializer.materialize(&subs(), &[]);

        match result {
            Err(MaterializeError::Unresolved { path, tokens }) => {
                assert_eq!(path, "promo.html");
                assert_eq!(tokens, vec!["__PROMO_CODE__".to_string()]);
            }
            other => panic!("expected unresolved error, got {:?}", other),
        }
    }

    #[test]
    fn rerun_is_byte_identical() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let materializer = setup(root);

        materializer.materialize(&subs(), &[]).unwrap();
        let first = fs::read(root.join("index.html")).unwrap();
        materializer.materialize(&subs(), &[]).unwrap();

        assert_eq!(fs::read(root.join("index.html")).unwrap(), first);
    }

    #[test]
    fn locale_value_is_escaped() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        let mut materializer = setup(root);
        materializer.config.languages = vec!["x\"y".to_string()];

        materializer.materialize(&subs(), &[]).unwrap();

        let html = fs::read_to_string(root.join("x\"y/blog/index.html")).unwrap();
        assert!(html.contains(r#"<html lang="x&quot;y">"#));
    }
}
