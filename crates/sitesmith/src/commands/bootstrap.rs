//! Site bootstrap command.
//!
//! One linear pass over a site directory: generic token replacement, palette,
//! assets, pages, policy pages, theme override, language switcher and logo
//! clean-up. Required inputs are checked before anything is written.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sitesmith_assets::{
    hero_copy, make_background_transparent, AssetKind, AssetOutcome, AssetProvisioner,
    GeminiClient, GeminiSettings, GenerateError, GenerativeClient, ProvisionReport,
};
use sitesmith_pages::{
    apply_theme_override, legacy_domain_pairs, minify_css, update_switcher, PageMaterializer,
    PolicyWriter, Substitutions, SwitcherUpdate, TokenReplacer, TEXT_EXTENSIONS,
};
use sitesmith_theme::{palette_for_topic, theme_override_css, SiteConfig, SiteInput};

use crate::settings::SiteSettings;
use crate::BootstrapArgs;

/// What a bootstrap run produced.
#[derive(Debug)]
pub struct BootstrapSummary {
    pub pages: Vec<PathBuf>,
    pub policies: Vec<PathBuf>,
    pub assets: ProvisionReport,
    pub themed: usize,
    pub bootstrapped: usize,
}

/// Options that are not part of the site identity.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub minify: bool,
}

/// Run the bootstrap command.
pub async fn run(args: BootstrapArgs) -> Result<()> {
    let site = SiteConfig::from_input(SiteInput {
        domain: args.domain,
        brand: args.brand,
        topic: args.topic,
        speed: args.speed,
        subscribe_email: args.subscribe_email,
        animation: args.animation,
    })
    .context("Invalid site input")?;

    let root = args.site;
    if !root.is_dir() {
        anyhow::bail!("Site directory not found: {}", root.display());
    }

    let settings = SiteSettings::load(&root)?;
    let options = RunOptions {
        minify: settings.theme.minify && !args.no_minify,
    };

    let client = if args.no_ai || !settings.assets.generate {
        tracing::info!("Asset generation disabled, using existing assets");
        None
    } else {
        match GeminiClient::new(GeminiSettings::from_env()) {
            Ok(client) => Some(client),
            Err(GenerateError::MissingCredential) => {
                tracing::warn!("No GEMINI_API_KEY or GOOGLE_API_KEY set, using existing assets");
                None
            }
            Err(e) => {
                tracing::warn!("Generative client unavailable, using existing assets: {}", e);
                None
            }
        }
    };

    let summary = run_pipeline(&root, &site, &settings, client, options).await?;

    tracing::info!(
        "Bootstrapped {} ({}): {} pages, {} policy pages, logo {:?}, hero {:?}",
        site.brand(),
        site.domain(),
        summary.pages.len(),
        summary.policies.len(),
        summary.assets.logo,
        summary.assets.hero
    );
    tracing::debug!(
        "Token pass changed {} files, theme applied to {} files",
        summary.bootstrapped,
        summary.themed
    );

    Ok(())
}

/// Run every step against `root`.
pub async fn run_pipeline<C: GenerativeClient>(
    root: &Path,
    site: &SiteConfig,
    settings: &SiteSettings,
    client: Option<C>,
    options: RunOptions,
) -> Result<BootstrapSummary> {
    let materializer = PageMaterializer::new(settings.materialize_config(root));
    materializer.preflight()?;

    let legacy = legacy_domain_pairs(&settings.site.legacy_domains, site.domain());

    // Generic bootstrap over non-HTML text; HTML goes through the materializer.
    let generic = TokenReplacer::new(
        [
            ("__BRAND__".to_string(), site.brand().to_string()),
            ("__DOMAIN__".to_string(), site.domain().to_string()),
            ("__CONTACT_EMAIL__".to_string(), site.contact_email().to_string()),
            ("__SUBSCRIBE_EMAIL__".to_string(), site.subscribe_email().to_string()),
        ]
        .into_iter()
        .chain(legacy.iter().cloned()),
    )
    .with_extensions(&non_html_extensions())
    .skip_dir(settings.shells_dir());
    let bootstrapped = generic.replace_in_tree(root)?;

    let mut palette = palette_for_topic(site.topic()).with_colors(
        settings.theme.background.as_deref(),
        settings.theme.accent.as_deref(),
    );
    if let Some(animation) = site.animation() {
        palette = palette.with_animation(animation);
    }
    tracing::info!("Using {} palette ({} glow)", palette.name, palette.animation.name());

    let provisioner = AssetProvisioner::new(root, client);
    let assets = provisioner.provision(site).await?;
    let hero = hero_copy(provisioner.client(), site).await;

    let subs = Substitutions::for_site(
        site,
        &palette,
        &hero,
        &materializer.config().default_language,
    );
    let pages = materializer.materialize(&subs, &legacy)?;

    let policies = PolicyWriter::new(root)?.write_all(site, &palette)?;

    let mut css = theme_override_css(&palette, site.animation_speed_secs());
    if options.minify {
        match minify_css(&css) {
            Ok(minified) => css = minified,
            Err(e) => tracing::warn!("Theme stylesheet left unminified: {}", e),
        }
    }
    let themed = apply_theme_override(root, &css, &[settings.shells_dir()])?;

    let switcher = root.join(&settings.site.switcher);
    match update_switcher(&switcher, &settings.enabled_languages()) {
        Ok(SwitcherUpdate::Missing) => {
            tracing::warn!("No language switcher at {}", switcher.display());
        }
        Ok(update) => tracing::debug!("Language switcher {:?}", update),
        Err(e) => tracing::warn!("Language switcher not updated: {}", e),
    }

    if assets.logo == AssetOutcome::Generated && settings.assets.transparent_logo {
        clear_logo_background(root, site, settings.assets.transparency_tolerance);
    }

    Ok(BootstrapSummary {
        pages: pages.pages,
        policies,
        assets,
        themed: themed.changed.len(),
        bootstrapped: bootstrapped.changed.len(),
    })
}

fn non_html_extensions() -> Vec<&'static str> {
    TEXT_EXTENSIONS
        .iter()
        .copied()
        .filter(|ext| !matches!(*ext, "html" | "htm"))
        .collect()
}

/// Best effort: failures are logged and the pipeline carries on.
fn clear_logo_background(root: &Path, site: &SiteConfig, tolerance: u8) {
    let canonical = root.join(AssetKind::Logo.canonical_name());

    match make_background_transparent(&canonical, tolerance) {
        Ok(true) => {
            let branded = root.join(AssetKind::Logo.branded_name(site));
            if let Err(e) = fs::copy(&canonical, &branded) {
                tracing::warn!("Could not copy transparent logo to {}: {}", branded.display(), e);
            } else {
                tracing::info!("Made logo background transparent");
            }
        }
        Ok(false) => tracing::debug!("Logo background already transparent"),
        Err(e) => tracing::warn!("Could not make logo background transparent: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::scaffold;
    use pretty_assertions::assert_eq;
    use sitesmith_pages::scan_unresolved;
    use tempfile::tempdir;

    fn site(speed: Option<i64>) -> SiteConfig {
        SiteConfig::from_input(SiteInput {
            domain: "example.com".to_string(),
            brand: "Example Co".to_string(),
            topic: "Natural wine bars".to_string(),
            speed,
            ..Default::default()
        })
        .unwrap()
    }

    async fn bootstrap(root: &Path, site: &SiteConfig) -> Result<BootstrapSummary> {
        let settings = SiteSettings::load(root)?;
        run_pipeline(root, site, &settings, None::<GeminiClient>, RunOptions { minify: true }).await
    }

    fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        sitesmith_pages::collect_files(root, &["html", "js", "png", "jpg"], &[])
            .unwrap()
            .into_iter()
            .map(|rel| {
                let bytes = fs::read(root.join(&rel)).unwrap();
                (rel, bytes)
            })
            .collect()
    }

    #[tokio::test]
    async fn produces_the_site_layout() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();

        let summary = bootstrap(root, &site(None)).await.unwrap();

        for path in [
            "index.html",
            "blog/index.html",
            "ru/blog/index.html",
            "es/blog/index.html",
            "de/blog/index.html",
            "fr/blog/index.html",
            "policy/privacy/index.html",
            "policy/terms/index.html",
            "policy/refund/index.html",
        ] {
            assert!(root.join(path).is_file(), "missing {}", path);
        }

        assert_eq!(summary.pages.len(), 6);
        assert_eq!(summary.policies.len(), 3);
        assert!(scan_unresolved(root, &[PathBuf::from("_shells")]).unwrap().is_empty());

        let home = fs::read_to_string(root.join("index.html")).unwrap();
        assert!(home.contains("<html lang=\"en\">"));
        assert!(home.contains("#b63a5a"));
        assert!(home.contains("id=\"site-theme-override\""));
        assert!(home.contains("logo-example-co.png"));

        let ru = fs::read_to_string(root.join("ru/blog/index.html")).unwrap();
        assert!(ru.contains("<html lang=\"ru\">"));

        let switcher = fs::read_to_string(root.join("i18n-switcher.js")).unwrap();
        assert!(switcher.contains("Language switcher for Example Co (https://example.com)"));

        let shell = fs::read_to_string(root.join("_shells/index.html")).unwrap();
        assert!(shell.contains("__BRAND__"));
    }

    #[tokio::test]
    async fn second_run_is_byte_identical() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();
        let site = site(Some(20));

        bootstrap(root, &site).await.unwrap();
        let first = snapshot(root);
        bootstrap(root, &site).await.unwrap();

        assert_eq!(snapshot(root), first);
    }

    #[tokio::test]
    async fn keeps_existing_assets_without_credential() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();
        fs::write(root.join("logo.png"), b"existing logo").unwrap();
        fs::write(root.join("hero_ai.jpg"), b"existing hero").unwrap();

        let summary = bootstrap(root, &site(None)).await.unwrap();

        assert_eq!(summary.assets.logo, AssetOutcome::Reused);
        assert_eq!(fs::read(root.join("logo.png")).unwrap(), b"existing logo");
        assert_eq!(fs::read(root.join("hero_ai.jpg")).unwrap(), b"existing hero");
        assert_eq!(
            fs::read(root.join("logo-example-co.png")).unwrap(),
            b"existing logo"
        );
    }

    #[tokio::test]
    async fn policy_pages_name_domain_and_contact() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();

        bootstrap(root, &site(None)).await.unwrap();

        for page in ["privacy", "terms", "refund"] {
            let html = fs::read_to_string(root.join("policy").join(page).join("index.html")).unwrap();
            assert!(html.contains("example.com"));
            assert!(html.contains("mailto:info@example.com"));
        }
    }

    #[tokio::test]
    async fn missing_shell_aborts_before_writing() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();
        fs::remove_file(root.join("_shells/blog-index.html")).unwrap();
        let switcher_before = fs::read_to_string(root.join("i18n-switcher.js")).unwrap();

        let err = bootstrap(root, &site(None)).await.unwrap_err();

        assert!(err.to_string().contains("blog-index.html"));
        assert!(!root.join("index.html").exists());
        assert!(!root.join("policy").exists());
        assert_eq!(
            fs::read_to_string(root.join("i18n-switcher.js")).unwrap(),
            switcher_before
        );
    }

    #[tokio::test]
    async fn clamps_animation_speed_into_pages() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();

        bootstrap(root, &site(Some(5))).await.unwrap();
        let home = fs::read_to_string(root.join("index.html")).unwrap();
        assert!(home.contains("animation: shift 8s ease infinite"));

        bootstrap(root, &site(Some(999))).await.unwrap();
        let home = fs::read_to_string(root.join("index.html")).unwrap();
        assert!(home.contains("animation: shift 60s ease infinite"));
    }

    #[tokio::test]
    async fn rewrites_legacy_domains_once() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();
        fs::write(root.join("robots.txt"), "Sitemap: https://www.myugc.studio/sitemap.xml\n").unwrap();

        bootstrap(root, &site(None)).await.unwrap();
        bootstrap(root, &site(None)).await.unwrap();

        assert_eq!(
            fs::read_to_string(root.join("robots.txt")).unwrap(),
            "Sitemap: https://example.com/sitemap.xml\n"
        );
    }

    #[tokio::test]
    async fn theme_colors_from_settings_reach_pages() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();
        fs::write(
            root.join("site.toml"),
            "[theme]\nbackground = \"#203040\"\naccent = \"FF8800\"\n",
        )
        .unwrap();

        bootstrap(root, &site(None)).await.unwrap();

        let home = fs::read_to_string(root.join("index.html")).unwrap();
        assert!(home.contains("--bg0: #203040;"));
        assert!(home.contains("--accent: #ff8800;"));
        assert!(!home.contains("#b63a5a"));

        let terms = fs::read_to_string(root.join("policy/terms/index.html")).unwrap();
        assert!(terms.contains("color: #ff8800;"));
    }

    #[tokio::test]
    async fn unsupported_languages_leave_only_english() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        scaffold(root, false).unwrap();
        fs::write(root.join("site.toml"), "[site]\nlanguages = [\"xx\"]\n").unwrap();

        let summary = bootstrap(root, &site(None)).await.unwrap();

        assert_eq!(
            summary.pages,
            vec![PathBuf::from("index.html"), PathBuf::from("blog/index.html")]
        );
        assert!(!root.join("ru/blog/index.html").exists());
        let switcher = fs::read_to_string(root.join("i18n-switcher.js")).unwrap();
        assert!(switcher.contains("var supported = [\"en\"];"));
    }
}
