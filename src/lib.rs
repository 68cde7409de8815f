//! # blockpage
//!
//! A renderer for block-based website pages: a page document made of a
//! title, some page-level metadata and an ordered tree of content blocks
//! is turned into an output node tree and then into HTML.
//!
//! ## Quick Start
//!
//! ```rust
//! use blockpage::{parse_document, render_page, render_html, HtmlConfig};
//!
//! let input = r#"{
//!     "title": "Welcome",
//!     "content": { "blocks": [
//!         { "type": "heading", "level": 1, "content": "Hello" },
//!         { "type": "text", "content": "<p>Glad you're here.</p>" },
//!         { "type": "button", "link": "/courses", "text": "Browse courses" }
//!     ] }
//! }"#;
//!
//! // Decode the document; malformed blocks become empty slots
//! let doc = parse_document(input).unwrap();
//!
//! // Render to the output tree
//! let page = render_page(&doc);
//!
//! // Serialize to HTML
//! let html = render_html(&page, &HtmlConfig::default()).unwrap();
//! println!("{}", html);
//! ```
//!
//! ## Page Document
//!
//! ```text
//! {
//!   "title": "About",
//!   "seo_title": "About us | Acme",      optional, used for <title>
//!   "custom_css": "h1 { color: red; }",  optional, injected verbatim
//!   "custom_js": "console.log(1);",      optional, injected verbatim
//!   "content": { "blocks": [ ... ] }
//! }
//! ```
//!
//! ## Block Kinds
//!
//! | type | attributes |
//! |---|---|
//! | `heading` | `content`, `level` (1–4, default 2), `style` |
//! | `text`, `paragraph` | `content` (raw markup), `style` |
//! | `image` | `src` or `url`, `alt`, `caption`, `style` |
//! | `button` | `link` or `url`, `text` or `content`, `newTab`, `style` |
//! | `video` | `url`, `style` |
//! | `divider` | `style` |
//! | `spacer` | `height` (default `20px`) |
//! | `html` | `content` or `html` (raw markup) |
//! | `container`, `section` | `children`, `style` |
//! | `columns` | `columns` (2–4), `children`, `style` |
//! | `list` | `items`, `ordered`, `style` |
//! | `quote`, `blockquote` | `content`, `style` |
//! | `code` | `content` |
//!
//! Unknown kinds, blocks without a `type` and blocks with malformed
//! attributes render as nothing; their siblings are unaffected.
//!
//! ## Trusted Markup
//!
//! `text` and `html` block content, `custom_css` and `custom_js` are
//! written to the output without escaping. Page authors are trusted
//! platform users. All such content is carried as [`TrustedHtml`].
//!
//! ## Configuration
//!
//! [`HtmlConfig`] selects fragment or standalone output, the CSS class
//! prefix and the document language. It can be loaded from TOML:
//!
//! ```text
//! standalone = true
//! class_prefix = "site-"
//! lang = "de"
//! ```
//!
//! ## FFI
//!
//! The library provides a C-compatible FFI. See the `ffi` module.
//!
//! ## Features
//!
//! - `wasm`: Enable WebAssembly bindings (requires `wasm-bindgen`)
//! - `cli`: Build the `blockpage` command-line tool

pub mod ast;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod render;
pub mod site;

// FFI module (only for non-WASM builds)
#[cfg(not(target_arch = "wasm32"))]
pub mod ffi;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Convenience re-exports
pub use ast::{Block, BlockSlot, PageDocument, Style, TrustedHtml};
pub use diagnostics::{check_page, Diagnostic};
pub use error::{BlockError, ConfigError, Error, LookupError, ParseError, RenderError, Result};
pub use parser::{decode_block, parse_document};
pub use render::{
    render_block, render_html, render_not_found, render_page, HtmlConfig, Node, RenderedPage,
};
pub use site::{load_page, DirectorySource, MemorySource, NotFound, PageSource, PageView};

/// Parse and render page JSON to HTML in one step.
///
/// # Example
///
/// ```rust
/// use blockpage::render;
///
/// let html = render(r#"{"title": "T", "content": {"blocks": [{"type": "divider"}]}}"#, None).unwrap();
/// assert!(html.contains("<hr"));
/// ```
pub fn render(input: &str, html_config: Option<&HtmlConfig>) -> Result<String> {
    let doc = parse_document(input)?;
    render::render(&doc, html_config.unwrap_or(&HtmlConfig::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pipeline() {
        let input = r#"{
            "title": "T",
            "content": {"blocks": [
                {"type": "heading", "level": 1, "content": "Hi"},
                {"type": "unknown"},
                {"type": "list", "ordered": true, "items": ["a", "b"]}
            ]}
        }"#;

        let html = render(input, None).unwrap();

        assert!(html.contains("<h1"));
        assert!(html.contains(">Hi</h1>"));
        assert!(html.contains("<ol"));
        assert!(html.contains("<li>a</li>\n<li>b</li>"));
    }

    #[test]
    fn test_button_defaults() {
        let html = render(r#"{"title": "T", "content": {"blocks": [{"type": "button"}]}}"#, None)
            .unwrap();

        assert!(html.contains(r##"href="#""##));
        assert!(html.contains(">Click Here</a>"));
    }

    #[test]
    fn test_nested_layout() {
        let input = r#"{
            "title": "Courses",
            "content": {"blocks": [
                {"type": "section", "style": {"padding": 32}, "children": [
                    {"type": "heading", "content": "Featured"},
                    {"type": "columns", "columns": 3, "children": [
                        {"type": "image", "src": "/a.png", "alt": "A"},
                        {"type": "image", "src": "/b.png", "alt": "B"},
                        {"type": "image", "src": "/c.png", "alt": "C"}
                    ]}
                ]}
            ]}
        }"#;

        let html = render(input, None).unwrap();

        assert!(html.contains(r#"<section class="bp-section" style="padding: 32px">"#));
        assert!(html.contains(r#"<h2 class="bp-heading bp-heading-lg">Featured</h2>"#));
        assert!(html.contains(r#"class="bp-columns bp-columns-3""#));
        let a = html.find("/a.png").unwrap();
        let b = html.find("/b.png").unwrap();
        let c = html.find("/c.png").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_not_json_is_error() {
        assert!(matches!(render("<html>", None), Err(Error::Parse(_))));
    }
}
