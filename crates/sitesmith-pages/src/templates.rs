//! Template engine for the legal notice pages.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::placeholders::escape_html;

/// Values available to every policy template.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyContext {
    /// Page title
    pub title: String,
    /// Brand name
    pub brand: String,
    /// Site domain
    pub domain: String,
    /// Contact address
    pub email: String,
    /// Canonical logo path
    pub logo: String,
    /// Page background color
    pub background: String,
    /// Link and heading color
    pub accent: String,
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the built-in policy templates.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        // `.html` names are auto-escaped, `.md` names use the `md` filter.
        env.add_filter("md", markdown_text);
        env.add_template("policy.html", POLICY_SHELL)?;
        env.add_template("privacy.md", PRIVACY_BODY)?;
        env.add_template("terms.md", TERMS_BODY)?;
        env.add_template("refund.md", REFUND_BODY)?;

        Ok(Self { env })
    }

    /// Render a Markdown body template.
    pub fn render_body(
        &self,
        template: &str,
        context: &PolicyContext,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template(template)?.render(context)
    }

    /// Wrap rendered body HTML in the shared page shell.
    pub fn render_page(
        &self,
        context: &PolicyContext,
        body_html: &str,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("policy.html")?;

        tmpl.render(context! {
            title => &context.title,
            brand => &context.brand,
            domain => &context.domain,
            email => &context.email,
            logo => &context.logo,
            background => &context.background,
            accent => &context.accent,
            body => body_html,
        })
    }
}

/// Escape a value for use as literal text inside Markdown.
fn markdown_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '`' | '*' | '_' | '{' | '}' | '[' | ']' | '(' | ')' | '#' | '+' | '!' | '|' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    escape_html(&out)
}

const POLICY_SHELL: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }} - {{ brand }}</title>
  <link rel="canonical" href="https://{{ domain }}/">
  <style>
    body { margin: 0; font-family: system-ui, -apple-system, sans-serif; background: {{ background }}; color: #f3f3f3; line-height: 1.65; }
    header, main, footer { max-width: 760px; margin: 0 auto; padding: 1.5rem; }
    header a { display: flex; align-items: center; gap: .75rem; color: inherit; text-decoration: none; font-weight: 700; }
    header img { width: 40px; height: 40px; }
    h1, h2 { color: {{ accent }}; }
    a { color: {{ accent }}; }
    footer { font-size: .875rem; opacity: .7; }
  </style>
</head>
<body>
  <header>
    <a href="/"><img src="/{{ logo }}" alt="{{ brand }}"><span>{{ brand }}</span></a>
  </header>
  <main>
    <h1>{{ title }}</h1>
    {{ body | safe }}
  </main>
  <footer>
    <p>&copy; {{ brand }} &middot; {{ domain }} &middot; <a href="mailto:{{ email }}">{{ email }}</a></p>
  </footer>
</body>
</html>
"##;

const PRIVACY_BODY: &str = r#"This notice explains how **{{ brand|md }}** ("we", "us") handles information
collected through **{{ domain|md }}**.

## Information we collect

- Details you send us directly, such as your name and email address when you
  subscribe or contact us.
- Basic technical data sent by your browser, such as pages visited and device
  type, gathered through cookies and server logs.

## How we use it

We use this information to operate and improve {{ domain|md }}, to answer your
messages, and to send newsletters you asked for. We do not sell personal data.

## Your choices

You can unsubscribe from emails at any time using the link in each message, and
you can ask us to access or delete your data.

## Contact

Questions about privacy can be sent to [{{ email }}](mailto:{{ email }}).
"#;

const TERMS_BODY: &str = r#"These terms govern your use of **{{ domain|md }}**, operated by **{{ brand|md }}**.
By using the site you agree to them.

## Content

Articles and guides are provided for general information only. We try to keep
them accurate but make no guarantee that they are complete or current.

## Acceptable use

Do not misuse the site, attempt to disrupt it, or copy its content for
commercial purposes without permission.

## Links

{{ domain|md }} may link to third-party sites. We are not responsible for their
content or practices.

## Changes

We may update these terms from time to time. Continued use of the site means
you accept the current version.

## Contact

Send questions about these terms to [{{ email }}](mailto:{{ email }}).
"#;

const REFUND_BODY: &str = r#"This policy covers purchases made through **{{ domain|md }}** from **{{ brand|md }}**.

## Eligibility

If you are not satisfied with a paid product or subscription, contact us within
14 days of purchase to request a refund.

## How to request a refund

Email [{{ email }}](mailto:{{ email }}) with your order details and the reason
for the request. We reply within a few business days.

## Processing

Approved refunds are returned to the original payment method. Your bank may
take additional time to post the credit.
"#;
