//! Initialize a site skeleton.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::settings::SETTINGS_FILE;

/// Run the init command.
pub fn run(site: PathBuf, yes: bool) -> Result<()> {
    tracing::info!("Initializing site in {}...", site.display());

    let written = scaffold(&site, yes)?;
    if written.is_empty() {
        tracing::warn!("All starter files already exist. Use --yes to overwrite.");
        return Ok(());
    }

    for path in &written {
        tracing::info!("Created {}", path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'sitesmith bootstrap --domain ... --brand ... --topic ...' next.");

    Ok(())
}

/// Write the starter files under `site`, returning the root-relative paths written.
///
/// Existing files are kept unless `overwrite` is set.
pub fn scaffold(site: &Path, overwrite: bool) -> Result<Vec<PathBuf>> {
    let files: [(&str, &str); 4] = [
        (SETTINGS_FILE, DEFAULT_SETTINGS),
        ("_shells/index.html", HOME_SHELL),
        ("_shells/blog-index.html", BLOG_SHELL),
        ("i18n-switcher.js", SWITCHER),
    ];

    let mut written = Vec::new();

    for (relative, content) in files {
        let path = site.join(relative);
        if path.exists() && !overwrite {
            tracing::debug!("Keeping existing {}", path.display());
            continue;
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(PathBuf::from(relative));
    }

    Ok(written)
}

const DEFAULT_SETTINGS: &str = r#"# sitesmith site settings

[site]
# Directory holding the shell templates (never modified)
shells_dir = "_shells"
home_shell = "index.html"
blog_shell = "blog-index.html"

# Languages offered by the switcher; "en" is always first
languages = ["en", "ru", "es", "de", "fr"]
default_language = "en"

# Domains the shells were cut from, rewritten to the new domain
legacy_domains = ["myugc.studio", "www.myugc.studio"]

switcher = "i18n-switcher.js"

[theme]
minify = true

[assets]
# Set to false to never call the image service
generate = true
transparent_logo = true
transparency_tolerance = 24
"#;

const HOME_SHELL: &str = r#"<!doctype html>
<html lang="__LANG__">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>__BRAND__ | __TOPIC__</title>
  <meta name="description" content="__HERO_SUBTITLE__">
  <link rel="canonical" href="https://__DOMAIN__/">
  <meta property="og:image" content="https://__DOMAIN__/__HERO_FILE__">
  <link rel="icon" href="/__LOGO_FILE__">
  <style>
    :root {
      --bg0: __BG0__;
      --bg1: __BG1__;
      --bg2: __BG2__;
      --accent: __ACCENT__;
      --accent-hover: __ACCENT_HOVER__;
    }
    body { margin: 0; background: var(--bg0); color: #f5f5f5; font-family: system-ui, sans-serif; }
    a { color: var(--accent); }
    a:hover { color: var(--accent-hover); }
    .fixed-bg { position: fixed; inset: 0; z-index: -1; background: linear-gradient(160deg, var(--bg0), var(--bg1) 60%, var(--bg2)); }
    .fixed-bg:before {
      content: ""; position: absolute; inset: 0;
      background:
        radial-gradient(circle at 18% 26%, __GLOW1__ 0%, transparent 36%),
        radial-gradient(circle at 82% 16%, __GLOW2__ 0%, transparent 40%),
        radial-gradient(circle at 50% 76%, __GLOW3__ 0%, transparent 42%);
      animation: shift __ANIM_SPEED__s ease infinite;
    }
    .hero { min-height: 60vh; display: grid; place-content: center; text-align: center; background: url("/__HERO_FILE__") center / cover; }
  </style>
</head>
<body>
  <div class="fixed-bg"></div>
  <header><img src="/__LOGO_FILE__" alt="__BRAND__" height="48"></header>
  <section class="hero">
    <h1>__HERO_TITLE__</h1>
    <p>__HERO_SUBTITLE__</p>
    <a href="/blog/">Read the blog</a>
  </section>
  <form action="mailto:__SUBSCRIBE_EMAIL__" method="post">
    <input type="email" name="email" placeholder="you@example.com">
    <button type="submit">Subscribe</button>
  </form>
  <footer>
    <a href="mailto:__CONTACT_EMAIL__">__CONTACT_EMAIL__</a> ·
    <a href="/policy/privacy/">Privacy</a> ·
    <a href="/policy/terms/">Terms</a> ·
    <a href="/policy/refund/">Refunds</a>
  </footer>
  <script src="/i18n-switcher.js"></script>
</body>
</html>
"#;

const BLOG_SHELL: &str = r#"<!doctype html>
<html lang="__LANG__">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>__BRAND__ Blog</title>
  <link rel="canonical" href="https://__DOMAIN__/blog/">
  <link rel="icon" href="/__LOGO_FILE__">
  <style>
    body { margin: 0; background: __BG0__; color: #f5f5f5; font-family: system-ui, sans-serif; }
    a { color: __ACCENT__; }
  </style>
</head>
<body>
  <div class="fixed-bg"></div>
  <header><a href="/"><img src="/__LOGO_FILE__" alt="__BRAND__" height="40"></a></header>
  <main>
    <h1>__BRAND__ Blog</h1>
    <p>Articles about __TOPIC__.</p>
    <ul id="posts"></ul>
  </main>
  <footer><a href="mailto:__CONTACT_EMAIL__">__CONTACT_EMAIL__</a></footer>
  <script src="/i18n-switcher.js"></script>
</body>
</html>
"#;

const SWITCHER: &str = r#"// Language switcher for __BRAND__ (https://__DOMAIN__)
(function () {
  var supported = ["en", "ru", "es", "de", "fr"];
  var path = window.location.pathname;
  var current = supported.filter(function (l) { return l !== "en" && path.indexOf("/" + l + "/") === 0; })[0] || "en";

  var nav = document.createElement("nav");
  nav.className = "lang-switcher";
  supported.forEach(function (lang) {
    var a = document.createElement("a");
    a.textContent = lang.toUpperCase();
    a.href = lang === "en" ? "/blog/" : "/" + lang + "/blog/";
    if (lang === current) a.setAttribute("aria-current", "true");
    nav.appendChild(a);
  });
  document.body.appendChild(nav);
})();
"#;
