//! Fixed page markup
//!
//! The page controller swaps this in as the body contents; the preview CLI
//! wraps it in a full document.

use std::fmt::Write;

use crate::theme::colors;

use super::config::PageConfig;

/// Escape text for use in element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Body markup: particle container, brand, heading, form, social links
pub fn render_body(config: &PageConfig) -> String {
    let content = &config.content;
    let ids = &config.ids;

    let mut social = String::new();
    for link in &content.social_links {
        // Writing to a String cannot fail
        let _ = write!(
            social,
            r#"<li><a href="{href}" target="_blank" rel="noopener noreferrer" aria-label="{label}">{label}</a></li>"#,
            href = escape(&link.href),
            label = escape(&link.label),
        );
    }

    format!(
        r#"<div id="{container}" class="particle-container"></div>
<main class="overlay">
  <div class="logo">{brand}</div>
  <h1 class="heading">{heading}</h1>
  <p class="tagline">{tagline}</p>
  <form id="{form}" class="email-form" novalidate>
    <input id="{input}" type="email" name="email" placeholder="{placeholder}" autocomplete="email">
    <button id="{button}" type="submit">{label}</button>
  </form>
  <p id="{message}" class="success-message" hidden>{success}</p>
  <ul class="social-links">{social}</ul>
</main>"#,
        container = escape(&ids.particle_container),
        brand = escape(&content.brand),
        heading = escape(&content.heading),
        tagline = escape(&content.tagline),
        form = escape(&ids.email_form),
        input = escape(&ids.email_input),
        placeholder = escape(&content.input_placeholder),
        button = escape(&ids.submit_button),
        label = escape(&content.button_label),
        message = escape(&ids.success_message),
        success = escape(&content.success_message),
        social = social,
    )
}

/// Page stylesheet, colors from the theme
pub fn stylesheet() -> String {
    format!(
        r#"* {{ box-sizing: border-box; margin: 0; padding: 0; }}
html, body {{ height: 100%; overflow: hidden; background: {bg}; color: {text}; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; }}
.particle-container {{ position: fixed; inset: 0; z-index: 0; }}
.particle-container canvas {{ display: block; }}
.overlay {{ position: relative; z-index: 1; height: 100%; display: flex; flex-direction: column; align-items: center; justify-content: center; gap: 1.25rem; padding: 1.5rem; text-align: center; pointer-events: none; }}
.overlay > * {{ pointer-events: auto; }}
.logo {{ font-size: 1rem; letter-spacing: 0.4em; text-transform: uppercase; color: {secondary}; }}
.heading {{ font-size: clamp(2.5rem, 8vw, 5rem); font-weight: 700; letter-spacing: -0.02em; }}
.tagline {{ max-width: 32rem; color: {secondary}; line-height: 1.6; }}
.email-form {{ display: flex; gap: 0.5rem; width: min(28rem, 100%); }}
.email-form input {{ flex: 1; padding: 0.8rem 1rem; border: 1px solid {border}; border-radius: 0.5rem; background: {elevated}; color: {text}; font-size: 1rem; }}
.email-form input::placeholder {{ color: {muted}; }}
.email-form button {{ padding: 0.8rem 1.4rem; border: 0; border-radius: 0.5rem; background: {accent}; color: {text}; font-weight: 600; cursor: pointer; }}
.success-message {{ color: {success}; }}
.social-links {{ display: flex; gap: 1.5rem; list-style: none; }}
.social-links a {{ color: {secondary}; text-decoration: none; }}
.social-links a:hover {{ color: {accent}; }}
@media (max-width: 767px) {{ .email-form {{ flex-direction: column; }} }}
"#,
        bg = colors::BG_PRIMARY.css(),
        text = colors::TEXT_PRIMARY.css(),
        secondary = colors::TEXT_SECONDARY.css(),
        muted = colors::TEXT_MUTED.css(),
        elevated = colors::BG_ELEVATED.css(),
        border = colors::TEXT_MUTED.css_alpha(0.4),
        accent = colors::ACCENT.css(),
        success = colors::SUCCESS.css(),
    )
}

/// Standalone HTML document for static previews
pub fn render_document(config: &PageConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
{style}</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(&format!("{} | {}", config.content.brand, config.content.heading)),
        style = stylesheet(),
        body = render_body(config),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SocialLink;

    #[test]
    fn escape_special_characters() {
        assert_eq!(escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn body_contains_required_elements() {
        let body = render_body(&PageConfig::default());
        assert!(body.contains(r#"id="particle-container""#));
        assert!(body.contains(r#"<form id="email-form""#));
        assert!(body.contains(r#"<input id="email-input" type="email""#));
        assert!(body.contains(r#"<button id="submit-button" type="submit">Notify Me</button>"#));
        assert!(body.contains(r#"id="success-message" class="success-message" hidden"#));
        assert!(body.contains("<h1 class=\"heading\">Coming Soon</h1>"));
    }

    #[test]
    fn every_social_link_is_listed() {
        let config = PageConfig::default();
        let body = render_body(&config);
        for link in &config.content.social_links {
            assert!(body.contains(&format!(r#"href="{}""#, link.href)));
        }
        assert_eq!(body.matches("<li>").count(), config.content.social_links.len());
        assert_eq!(body.matches(r#"rel="noopener noreferrer""#).count(), config.content.social_links.len());
    }

    #[test]
    fn configured_text_is_escaped() {
        let mut config = PageConfig::default();
        config.content.heading = "<script>alert(1)</script>".into();
        config.content.social_links = vec![SocialLink::new("X", "https://x.com/?a=1&b=\"2\"")];
        let body = render_body(&config);
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
        assert!(body.contains("a=1&amp;b=&quot;2&quot;"));
    }

    #[test]
    fn custom_ids_are_used() {
        let mut config = PageConfig::default();
        config.ids.email_form = "signup".into();
        let body = render_body(&config);
        assert!(body.contains(r#"<form id="signup""#));
        assert!(!body.contains(r#"id="email-form""#));
    }

    #[test]
    fn stylesheet_uses_theme_background() {
        assert!(stylesheet().contains(&colors::BG_PRIMARY.css()));
    }

    #[test]
    fn document_wraps_body_and_style() {
        let doc = render_document(&PageConfig::default());
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Nebula | Coming Soon</title>"));
        assert!(doc.contains("<style>"));
        assert!(doc.contains(r#"id="particle-container""#));
    }
}
