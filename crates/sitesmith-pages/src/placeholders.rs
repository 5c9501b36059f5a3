//! Placeholder tokens used in shell templates.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use sitesmith_theme::{HeroCopy, Palette, SiteConfig};

use crate::replace::{collect_files, ReplaceError, TokenReplacer};

/// Every placeholder a shell template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Brand,
    Domain,
    Topic,
    LogoFile,
    HeroFile,
    Background0,
    Background1,
    Background2,
    Accent,
    AccentHover,
    Glow1,
    Glow2,
    Glow3,
    AnimationSpeed,
    HeroTitle,
    HeroSubtitle,
    ContactEmail,
    SubscribeEmail,
    Lang,
}

impl Placeholder {
    pub const ALL: [Placeholder; 19] = [
        Placeholder::Brand,
        Placeholder::Domain,
        Placeholder::Topic,
        Placeholder::LogoFile,
        Placeholder::HeroFile,
        Placeholder::Background0,
        Placeholder::Background1,
        Placeholder::Background2,
        Placeholder::Accent,
        Placeholder::AccentHover,
        Placeholder::Glow1,
        Placeholder::Glow2,
        Placeholder::Glow3,
        Placeholder::AnimationSpeed,
        Placeholder::HeroTitle,
        Placeholder::HeroSubtitle,
        Placeholder::ContactEmail,
        Placeholder::SubscribeEmail,
        Placeholder::Lang,
    ];

    /// The literal marker as it appears in templates.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Brand => "__BRAND__",
            Placeholder::Domain => "__DOMAIN__",
            Placeholder::Topic => "__TOPIC__",
            Placeholder::LogoFile => "__LOGO_FILE__",
            Placeholder::HeroFile => "__HERO_FILE__",
            Placeholder::Background0 => "__BG0__",
            Placeholder::Background1 => "__BG1__",
            Placeholder::Background2 => "__BG2__",
            Placeholder::Accent => "__ACCENT__",
            Placeholder::AccentHover => "__ACCENT_HOVER__",
            Placeholder::Glow1 => "__GLOW1__",
            Placeholder::Glow2 => "__GLOW2__",
            Placeholder::Glow3 => "__GLOW3__",
            Placeholder::AnimationSpeed => "__ANIM_SPEED__",
            Placeholder::HeroTitle => "__HERO_TITLE__",
            Placeholder::HeroSubtitle => "__HERO_SUBTITLE__",
            Placeholder::ContactEmail => "__CONTACT_EMAIL__",
            Placeholder::SubscribeEmail => "__SUBSCRIBE_EMAIL__",
            Placeholder::Lang => "__LANG__",
        }
    }
}

/// Resolved values for every [`Placeholder`], ready to insert into HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    values: Vec<(Placeholder, String)>,
}

impl Substitutions {
    pub fn for_site(site: &SiteConfig, palette: &Palette, hero: &HeroCopy, lang: &str) -> Self {
        let values = Placeholder::ALL
            .iter()
            .map(|&p| (p, escape_html(&raw_value(p, site, palette, hero, lang))))
            .collect();

        Self { values }
    }

    pub fn get(&self, placeholder: Placeholder) -> &str {
        self.values
            .iter()
            .find(|(p, _)| *p == placeholder)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default()
    }

    /// A replacer covering every placeholder plus the given extra pairs.
    pub fn replacer(&self, extra: &[(String, String)]) -> TokenReplacer {
        TokenReplacer::new(
            self.values
                .iter()
                .map(|(p, v)| (p.token().to_string(), v.clone()))
                .chain(extra.iter().cloned()),
        )
    }
}

fn raw_value(
    placeholder: Placeholder,
    site: &SiteConfig,
    palette: &Palette,
    hero: &HeroCopy,
    lang: &str,
) -> String {
    match placeholder {
        Placeholder::Brand => site.brand().to_string(),
        Placeholder::Domain => site.domain().to_string(),
        Placeholder::Topic => site.topic().to_string(),
        Placeholder::LogoFile => site.logo_file_name().to_string(),
        Placeholder::HeroFile => site.hero_file_name().to_string(),
        Placeholder::Background0 => palette.background0.to_string(),
        Placeholder::Background1 => palette.background1.to_string(),
        Placeholder::Background2 => palette.background2.to_string(),
        Placeholder::Accent => palette.accent.to_string(),
        Placeholder::AccentHover => palette.accent_hover.to_string(),
        Placeholder::Glow1 => palette.glow1.to_string(),
        Placeholder::Glow2 => palette.glow2.to_string(),
        Placeholder::Glow3 => palette.glow3.to_string(),
        Placeholder::AnimationSpeed => site.animation_speed_secs().to_string(),
        Placeholder::HeroTitle => hero.title.clone(),
        Placeholder::HeroSubtitle => hero.subtitle.clone(),
        Placeholder::ContactEmail => site.contact_email().to_string(),
        Placeholder::SubscribeEmail => site.subscribe_email().to_string(),
        Placeholder::Lang => lang.to_string(),
    }
}

/// Legacy domain → new domain pairs.
///
/// A legacy string contained in the new domain is dropped, otherwise a second
/// run would rewrite the new domain again.
pub fn legacy_domain_pairs(legacy: &[String], domain: &str) -> Vec<(String, String)> {
    legacy
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !domain.contains(*l))
        .map(|l| (l.to_string(), domain.to_string()))
        .collect()
}

static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"__[A-Z][A-Z0-9]*(?:_[A-Z0-9]+)*__").expect("placeholder pattern is valid")
});

/// Placeholder-shaped tokens still present in `text`, sorted and de-duplicated.
pub fn unresolved_tokens(text: &str) -> Vec<String> {
    TOKEN_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// HTML files under `root` that still contain placeholder tokens.
pub fn scan_unresolved(
    root: &Path,
    skip_dirs: &[PathBuf],
) -> Result<Vec<(PathBuf, Vec<String>)>, ReplaceError> {
    let mut found = Vec::new();

    for relative in collect_files(root, &["html", "htm"], skip_dirs)? {
        let path = root.join(&relative);
        let content = fs::read_to_string(&path).map_err(|e| ReplaceError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let tokens = unresolved_tokens(&content);
        if !tokens.is_empty() {
            found.push((relative, tokens));
        }
    }

    Ok(found)
}

pub(crate) fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sitesmith_theme::SiteInput;
    use tempfile::tempdir;

    fn site(brand: &str) -> SiteConfig {
        SiteConfig::from_input(SiteInput {
            domain: "example.com".to_string(),
            brand: brand.to_string(),
            topic: "wine".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn every_placeholder_has_a_value() {
        let site = site("Example Co");
        let subs = Substitutions::for_site(&site, &Palette::wine(), &HeroCopy::fallback(&site), "en");

        for p in Placeholder::ALL {
            assert!(!subs.get(p).is_empty(), "{:?} resolved to nothing", p);
        }
        assert_eq!(subs.get(Placeholder::Accent), "#b63a5a");
        assert_eq!(subs.get(Placeholder::LogoFile), "logo-example-co.png");
    }

    #[test]
    fn catalogue_tokens_match_detector() {
        let all: String = Placeholder::ALL.iter().map(|p| p.token()).collect();
        let found = unresolved_tokens(&all);

        assert_eq!(found.len(), Placeholder::ALL.len());
    }

    #[test]
    fn escapes_values_for_html() {
        let site = site("Tom & Jerry's <Wines>");
        let subs = Substitutions::for_site(&site, &Palette::wine(), &HeroCopy::fallback(&site), "en");

        assert_eq!(
            subs.get(Placeholder::Brand),
            "Tom &amp; Jerry&#39;s &lt;Wines&gt;"
        );
    }

    #[test]
    fn replacer_resolves_all_tokens() {
        let site = site("Example Co");
        let subs = Substitutions::for_site(&site, &Palette::default(), &HeroCopy::fallback(&site), "en");
        let template: String = Placeholder::ALL
            .iter()
            .map(|p| format!("<i>{}</i>", p.token()))
            .collect();

        let out = subs.replacer(&[]).apply(&template).unwrap();

        assert!(unresolved_tokens(&out).is_empty());
        assert!(out.contains("<i>example.com</i>"));
    }

    #[test]
    fn detects_adjacent_and_ignores_lowercase_tokens() {
        assert_eq!(
            unresolved_tokens("__BRAND____DOMAIN__ __init__ __BRAND__"),
            vec!["__BRAND__".to_string(), "__DOMAIN__".to_string()]
        );
    }

    #[test]
    fn legacy_pairs_skip_contained_domains() {
        let legacy = vec!["myugc.studio".to_string(), "www.myugc.studio".to_string()];

        assert_eq!(
            legacy_domain_pairs(&legacy, "example.com"),
            vec![
                ("myugc.studio".to_string(), "example.com".to_string()),
                ("www.myugc.studio".to_string(), "example.com".to_string()),
            ]
        );
        assert!(legacy_domain_pairs(&legacy, "shop.myugc.studio")
            .iter()
            .all(|(l, _)| l != "myugc.studio"));
    }

    #[test]
    fn scans_tree_for_leftovers() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("_shells")).unwrap();
        fs::write(root.join("index.html"), "<h1>__BRAND__</h1>").unwrap();
        fs::write(root.join("ok.html"), "<h1>Acme</h1>").unwrap();
        fs::write(root.join("_shells/index.html"), "__BRAND__").unwrap();

        let found = scan_unresolved(root, &[PathBuf::from("_shells")]).unwrap();

        assert_eq!(
            found,
            vec![(PathBuf::from("index.html"), vec!["__BRAND__".to_string()])]
        );
    }
}
