//! Plain-text fallback rendering for targets without an isolated surface
//!
//! Picks the plain-text part when the mail has one, otherwise strips tag
//! syntax and common entities from the HTML body. Embedded references are
//! never resolved here (there is no surface to show them in); that is an
//! accepted degradation, not a bug.

use crate::MailBody;

/// Deterministic text-stripping transform: tags removed, the common HTML
/// entities unescaped, whitespace runs collapsed to one space, result
/// trimmed.
pub fn strip_markup(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                // A removed tag still separates words
                text.push(' ');
            }
            _ if in_tag => {}
            _ => text.push(ch),
        }
    }

    // `&amp;` goes last so already-unescaped entities are not re-expanded
    let unescaped = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&");

    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fallback body renderer used whenever an isolated render surface cannot
/// be created on the current runtime target
pub struct FallbackRenderer;

impl FallbackRenderer {
    pub fn new() -> Self {
        FallbackRenderer
    }

    /// Produce the plain-text view of a mail body
    pub fn render_text(&self, mail: &MailBody) -> String {
        if let Some(text) = &mail.text {
            return text.clone();
        }
        mail.html.as_deref().map(strip_markup).unwrap_or_default()
    }
}

impl Default for FallbackRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_part_wins_over_html() {
        let mail = MailBody {
            mail_id: "m1".to_string(),
            html: Some("<p>html version</p>".to_string()),
            text: Some("text version".to_string()),
            attachments: Default::default(),
        };
        assert_eq!(FallbackRenderer::new().render_text(&mail), "text version");
    }

    #[test]
    fn strip_removes_tags_and_collapses_whitespace() {
        let out = strip_markup("<div>\n  <p>Hello</p>\n  <p>world</p>\n</div>");
        assert_eq!(out, "Hello world");
    }

    #[test]
    fn strip_unescapes_common_entities() {
        let out = strip_markup("a&nbsp;&lt;b&gt;&quot;c&quot;&amp;d");
        assert_eq!(out, "a <b>\"c\"&d");
    }

    #[test]
    fn double_escaped_ampersand_is_not_expanded_twice() {
        assert_eq!(strip_markup("&amp;lt;"), "&lt;");
    }

    #[test]
    fn strip_is_trimmed() {
        assert_eq!(strip_markup("  <br>  hi  <br>  "), "hi");
    }

    #[test]
    fn html_body_without_text_part_is_stripped() {
        let mail = MailBody {
            mail_id: "m1".to_string(),
            html: Some("<b>Bold</b> &amp; plain".to_string()),
            text: None,
            attachments: Default::default(),
        };
        assert_eq!(FallbackRenderer::new().render_text(&mail), "Bold & plain");
    }

    #[test]
    fn embedded_references_stay_unresolved() {
        let mail = MailBody {
            mail_id: "m1".to_string(),
            html: Some("<p>see <img src=\"cid:img1\" alt=\"\"> above</p>".to_string()),
            text: None,
            attachments: Default::default(),
        };
        let out = FallbackRenderer::new().render_text(&mail);
        assert!(!out.contains("data:"));
    }

    #[test]
    fn empty_body_renders_empty_string() {
        let mail = MailBody::default();
        assert_eq!(FallbackRenderer::new().render_text(&mail), "");
    }
}
