//! Isolated render-surface document construction
//!
//! The resolved markup is wrapped in a minimal template that forces a fixed
//! light color scheme, opens every link in a new top-level context, and
//! injects the measurement/scroll instrumentation script. The host mounts
//! the resulting document into whatever isolated context it has (webview,
//! sandboxed iframe); this module only builds the text.

use crate::channel::CHANNEL_TAG;
use crate::RenderConfig;

const BODY_TOKEN: &str = "__MS_RESOLVED_BODY__";
const CHANNEL_TOKEN: &str = "__MS_CHANNEL__";
const DEBOUNCE_TOKEN: &str = "__MS_DEBOUNCE_MS__";

// The document template deliberately carries its own <style>: the surface
// must render light regardless of the host theme, because mail HTML is
// authored against a white background.
const DOCUMENT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="color-scheme" content="light only">
<base target="_blank">
<style>
:root { color-scheme: light only; }
html, body { background: #ffffff; color: #1a1a1a; }
body { margin: 8px; overflow-wrap: break-word; }
img { max-width: 100%; }
</style>
</head>
<body>
__MS_RESOLVED_BODY__
<script>
__MS_HARNESS__
</script>
</body>
</html>
"#;

/// Build the isolated document hosting the resolved markup.
///
/// Token substitution over a fixed template keeps the markup out of any
/// `format!` escaping; `str::replace` treats both sides literally.
pub fn build_isolated_document(resolved_markup: &str, config: &RenderConfig) -> String {
    let harness = include_str!("surface_harness.js")
        .replace(CHANNEL_TOKEN, CHANNEL_TAG)
        .replace(DEBOUNCE_TOKEN, &config.height_debounce_ms.to_string());

    DOCUMENT_TEMPLATE
        .replace("__MS_HARNESS__", &harness)
        .replace(BODY_TOKEN, resolved_markup)
}
