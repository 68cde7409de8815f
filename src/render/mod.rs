//! Rendering layer: block trees to output nodes, and output nodes to HTML.

pub mod blocks;
pub mod html;
pub mod node;

pub use blocks::{render_block, render_page, render_slot, youtube_embed_url, RenderedPage};
pub use html::{render_html, render_not_found, HtmlConfig};
pub use node::{Element, Node};

use crate::ast::PageDocument;
use crate::error::Result;

/// Render a page document straight to HTML.
pub fn render(document: &PageDocument, config: &HtmlConfig) -> Result<String> {
    render_html(&render_page(document), config)
}
