//! HTML writer for rendered pages.

use super::blocks::RenderedPage;
use super::node::{Element, Node};
use crate::error::{ConfigError, RenderError, Result};
use crate::site::NotFound;
use serde::Deserialize;
use std::fmt::Write as _;

/// Configuration for HTML rendering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    /// Whether to generate a complete HTML document or just the page content.
    pub standalone: bool,
    /// Document title override (for standalone mode).
    pub title: Option<String>,
    /// CSS class prefix for styling.
    pub class_prefix: String,
    /// `lang` attribute of the standalone document.
    pub lang: String,
    /// Whether standalone documents carry the built-in layout styles.
    pub default_styles: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            title: None,
            class_prefix: "bp-".to_string(),
            lang: "en".to_string(),
            default_styles: true,
        }
    }
}

impl HtmlConfig {
    /// Load a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input).map_err(ConfigError::from)?)
    }

    fn validate(&self) -> Result<()> {
        let valid = self
            .class_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RenderError::ClassPrefix(self.class_prefix.clone()).into());
        }
        Ok(())
    }
}

/// Render a page to HTML.
pub fn render_html(page: &RenderedPage, config: &HtmlConfig) -> Result<String> {
    config.validate()?;
    let mut writer = HtmlWriter::new(config);
    writer.write_page(page)?;
    Ok(writer.finish())
}

/// Render the not-found view to HTML.
pub fn render_not_found(not_found: &NotFound, config: &HtmlConfig) -> Result<String> {
    config.validate()?;
    let mut writer = HtmlWriter::new(config);
    let title = config.title.as_deref().unwrap_or(not_found.title);
    writer.write_document(title, None, None, |w| w.write_node(&not_found.to_node()))?;
    Ok(writer.finish())
}

struct HtmlWriter<'a> {
    config: &'a HtmlConfig,
    output: String,
}

impl<'a> HtmlWriter<'a> {
    fn new(config: &'a HtmlConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    fn finish(self) -> String {
        self.output
    }

    fn write_page(&mut self, page: &RenderedPage) -> Result<()> {
        let config = self.config;
        let title = config.title.as_deref().unwrap_or(&page.document_title);

        self.write_document(
            title,
            page.custom_css.as_ref().map(|css| css.as_str()),
            page.custom_js.as_ref().map(|js| js.as_str()),
            |w| {
                for node in page.nodes() {
                    w.write_node(node)?;
                }
                Ok(())
            },
        )
    }

    /// Write `body` either bare (fragment mode) or inside a full document.
    /// Custom CSS and JS are passed through verbatim in both modes.
    fn write_document(
        &mut self,
        title: &str,
        custom_css: Option<&str>,
        custom_js: Option<&str>,
        body: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        let p = self.config.class_prefix.clone();

        if self.config.standalone {
            self.output.push_str("<!DOCTYPE html>\n");
            writeln!(self.output, "<html lang=\"{}\">", escape_html(&self.config.lang))
                .map_err(RenderError::from)?;
            self.output.push_str("<head>\n<meta charset=\"UTF-8\">\n");
            self.output.push_str(
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
            );
            writeln!(self.output, "<title>{}</title>", escape_html(title))
                .map_err(RenderError::from)?;

            if self.config.default_styles {
                self.output.push_str(&default_styles(&p));
            }
            if let Some(css) = custom_css {
                self.write_custom_css(css);
            }

            self.output.push_str("</head>\n<body>\n");
            writeln!(self.output, "<main class=\"{}page\">", p).map_err(RenderError::from)?;
        } else if let Some(css) = custom_css {
            self.write_custom_css(css);
        }

        body(self)?;

        if self.config.standalone {
            self.output.push_str("</main>\n");
        }
        if let Some(js) = custom_js {
            self.output.push_str("<script>\n");
            self.output.push_str(js);
            self.output.push_str("\n</script>\n");
        }
        if self.config.standalone {
            self.output.push_str("</body>\n</html>");
        }

        Ok(())
    }

    fn write_custom_css(&mut self, css: &str) {
        self.output.push_str("<style>\n");
        self.output.push_str(css);
        self.output.push_str("\n</style>\n");
    }

    fn write_node(&mut self, node: &Node) -> Result<()> {
        self.write_inline(node)?;
        self.output.push('\n');
        Ok(())
    }

    fn write_inline(&mut self, node: &Node) -> Result<()> {
        match node {
            Node::Element(element) => self.write_element(element)?,
            Node::Text(text) => self.output.push_str(&escape_html(text)),
            Node::Raw(html) => self.output.push_str(html.as_str()),
        }
        Ok(())
    }

    fn write_element(&mut self, element: &Element) -> Result<()> {
        self.output.push('<');
        self.output.push_str(element.tag);

        if !element.classes.is_empty() {
            let classes: Vec<String> = element
                .classes
                .iter()
                .map(|c| format!("{}{}", self.config.class_prefix, c))
                .collect();
            write!(self.output, r#" class="{}""#, classes.join(" ")).map_err(RenderError::from)?;
        }

        for (name, value) in &element.attrs {
            if value.is_empty() && is_boolean_attr(name) {
                write!(self.output, " {}", name).map_err(RenderError::from)?;
            } else {
                write!(self.output, r#" {}="{}""#, name, escape_html(value))
                    .map_err(RenderError::from)?;
            }
        }

        if let Some(style) = element.style.as_ref().filter(|s| !s.is_empty()) {
            write!(self.output, r#" style="{}""#, escape_html(&style.to_css()))
                .map_err(RenderError::from)?;
        }

        self.output.push('>');

        if element.is_void() {
            return Ok(());
        }

        // Block-level children go on their own lines; inline content stays put
        let block_children = element.children.iter().any(|c| matches!(c, Node::Element(_)))
            && !matches!(element.tag, "pre" | "li" | "figcaption" | "a" | "code");
        if block_children {
            self.output.push('\n');
            for child in &element.children {
                self.write_node(child)?;
            }
        } else {
            for child in &element.children {
                self.write_inline(child)?;
            }
        }

        write!(self.output, "</{}>", element.tag).map_err(RenderError::from)?;
        Ok(())
    }
}

fn is_boolean_attr(name: &str) -> bool {
    matches!(name, "controls" | "allowfullscreen")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn default_styles(p: &str) -> String {
    format!(
        r#"<style>
.{p}page {{ max-width: 1100px; margin: 0 auto; padding: 2em 1em; font-family: system-ui, sans-serif; line-height: 1.6; }}
.{p}heading-xl {{ font-size: 2.5rem; font-weight: 700; }}
.{p}heading-lg {{ font-size: 2rem; font-weight: 700; }}
.{p}heading-md {{ font-size: 1.5rem; font-weight: 600; }}
.{p}heading-sm {{ font-size: 1.25rem; font-weight: 600; }}
.{p}image {{ margin: 1.5em 0; }}
.{p}image img {{ max-width: 100%; height: auto; }}
.{p}image figcaption {{ color: #666; font-size: 0.9em; text-align: center; }}
.{p}button {{ display: inline-block; padding: 0.6em 1.4em; border-radius: 6px; background: #2563eb; color: #fff; text-decoration: none; }}
.{p}video {{ position: relative; aspect-ratio: 16 / 9; }}
.{p}video iframe, .{p}video video {{ width: 100%; height: 100%; }}
.{p}divider {{ border: none; border-top: 1px solid #ddd; margin: 2em 0; }}
.{p}columns {{ display: grid; gap: 1.5em; }}
.{p}columns-2 {{ grid-template-columns: repeat(2, minmax(0, 1fr)); }}
.{p}columns-3 {{ grid-template-columns: repeat(3, minmax(0, 1fr)); }}
.{p}columns-4 {{ grid-template-columns: repeat(4, minmax(0, 1fr)); }}
.{p}quote {{ border-left: 4px solid #ccc; margin: 1.5em 0; padding: 0.5em 1em; font-style: italic; }}
.{p}code {{ background: #f5f5f5; padding: 1em; overflow-x: auto; font-family: ui-monospace, monospace; }}
.{p}not-found {{ text-align: center; padding: 4em 1em; }}
.{p}not-found ul {{ display: inline-block; text-align: left; }}
</style>
"#,
        p = p
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_document;
    use crate::render::render_page;
    use pretty_assertions::assert_eq;

    fn page(json: &str) -> RenderedPage {
        render_page(&parse_document(json).unwrap())
    }

    #[test]
    fn test_render_fragment() {
        let page = page(
            r#"{"title": "T", "content": {"blocks": [
                {"type": "heading", "level": 1, "content": "Hi"},
                {"type": "unknown"},
                {"type": "list", "ordered": true, "items": ["a", "b"]}
            ]}}"#,
        );
        let html = render_html(&page, &HtmlConfig::default()).unwrap();

        assert_eq!(
            html,
            "<h1 class=\"bp-heading bp-heading-xl\">Hi</h1>\n\
             <ol class=\"bp-list\">\n<li>a</li>\n<li>b</li>\n</ol>\n"
        );
    }

    #[test]
    fn test_render_standalone() {
        let page = page(
            r#"{
                "title": "Home",
                "seo_title": "Home & Garden",
                "custom_css": "h1 { color: red; }",
                "custom_js": "console.log('hi');",
                "content": {"blocks": [{"type": "divider"}]}
            }"#,
        );
        let config = HtmlConfig {
            standalone: true,
            ..Default::default()
        };
        let html = render_html(&page, &config).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Home &amp; Garden</title>"));
        assert!(html.contains("<style>\nh1 { color: red; }\n</style>"));
        assert!(html.contains("<script>\nconsole.log('hi');\n</script>\n</body>"));
        assert!(html.contains("<hr class=\"bp-divider\">"));
        assert!(html.contains(".bp-columns-3"));
    }

    #[test]
    fn test_title_override() {
        let page = page(r#"{"title": "Home"}"#);
        let config = HtmlConfig {
            standalone: true,
            title: Some("Override".to_string()),
            default_styles: false,
            ..Default::default()
        };
        let html = render_html(&page, &config).unwrap();
        assert!(html.contains("<title>Override</title>"));
        assert!(!html.contains(".bp-page"));
    }

    #[test]
    fn test_raw_and_escaped_content() {
        let page = page(
            r#"{"title": "T", "content": {"blocks": [
                {"type": "text", "content": "<p>Hello <b>world</b></p>"},
                {"type": "quote", "content": "<script>alert(1)</script>"},
                {"type": "code", "content": "a < b && c"}
            ]}}"#,
        );
        let html = render_html(&page, &HtmlConfig::default()).unwrap();

        assert!(html.contains("<div class=\"bp-text\"><p>Hello <b>world</b></p></div>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("<pre class=\"bp-code\"><code>a &lt; b &amp;&amp; c</code></pre>"));
    }

    #[test]
    fn test_button_and_style_attributes() {
        let page = page(
            r##"{"title": "T", "content": {"blocks": [
                {"type": "button", "link": "/a?x=1&y=2", "text": "Go", "newTab": true,
                 "style": {"backgroundColor": "#000"}}
            ]}}"##,
        );
        let html = render_html(&page, &HtmlConfig::default()).unwrap();

        assert_eq!(
            html,
            "<a class=\"bp-button\" href=\"/a?x=1&amp;y=2\" target=\"_blank\" \
             rel=\"noopener noreferrer\" style=\"background-color: #000\">Go</a>\n"
        );
    }

    #[test]
    fn test_video_boolean_attributes() {
        let page = page(
            r#"{"title": "T", "content": {"blocks": [
                {"type": "video", "url": "/clip.mp4"}
            ]}}"#,
        );
        let html = render_html(&page, &HtmlConfig::default()).unwrap();
        assert!(html.contains("<video controls src=\"/clip.mp4\"></video>"));
    }

    #[test]
    fn test_class_prefix() {
        let page = page(r#"{"title": "T", "content": {"blocks": [{"type": "divider"}]}}"#);
        let config = HtmlConfig {
            class_prefix: "site-".to_string(),
            ..Default::default()
        };
        assert_eq!(
            render_html(&page, &config).unwrap(),
            "<hr class=\"site-divider\">\n"
        );

        let config = HtmlConfig {
            class_prefix: "\"><script>".to_string(),
            ..Default::default()
        };
        assert!(render_html(&page, &config).is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let config = HtmlConfig::from_toml_str(
            r#"
standalone = true
class_prefix = "acme-"
"#,
        )
        .unwrap();

        assert!(config.standalone);
        assert_eq!(config.class_prefix, "acme-");
        assert_eq!(config.lang, "en");
        assert!(config.default_styles);

        assert!(HtmlConfig::from_toml_str("unknown_key = 1").is_err());
    }
}
