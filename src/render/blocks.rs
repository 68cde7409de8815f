//! Block dispatch: typed blocks to output nodes.

use super::node::{Element, Node};
use crate::ast::{
    Block, BlockSlot, ColumnCount, ContainerKind, HeadingLevel, PageDocument, Style, TrustedHtml,
};

/// Label for buttons that have neither `text` nor `content`.
pub const DEFAULT_BUTTON_LABEL: &str = "Click Here";

/// Target for buttons that have neither `link` nor `url`.
pub const DEFAULT_BUTTON_TARGET: &str = "#";

/// Spacer height when none is given.
pub const DEFAULT_SPACER_HEIGHT: &str = "20px";

const HEADING_TAGS: [&str; 4] = ["h1", "h2", "h3", "h4"];
const HEADING_SIZES: [&str; 4] = ["heading-xl", "heading-lg", "heading-md", "heading-sm"];

/// A page after rendering: one output slot per top-level block plus the
/// page metadata the shell needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub title: String,
    /// `seo_title`, or `title` when there is none
    pub document_title: String,
    pub custom_css: Option<TrustedHtml>,
    pub custom_js: Option<TrustedHtml>,
    pub slots: Vec<Option<Node>>,
}

impl RenderedPage {
    /// The rendered nodes, skipping empty slots.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }
}

/// Render every top-level block of a page.
pub fn render_page(doc: &PageDocument) -> RenderedPage {
    RenderedPage {
        title: doc.title.clone(),
        document_title: doc.document_title().to_string(),
        custom_css: doc.custom_css.clone(),
        custom_js: doc.custom_js.clone(),
        slots: doc.blocks.iter().map(render_slot).collect(),
    }
}

/// Render one slot; unrecognized and malformed slots are empty.
pub fn render_slot(slot: &BlockSlot) -> Option<Node> {
    render_block(slot.block())
}

/// Render a single block.
pub fn render_block(block: Option<&Block>) -> Option<Node> {
    let node = match block? {
        Block::Heading {
            content,
            level,
            style,
        } => {
            let level = HeadingLevel::normalize(*level);
            let index = usize::from(level.get() - 1);
            Element::new(HEADING_TAGS[index])
                .class("heading")
                .class(HEADING_SIZES[index])
                .style(style.clone())
                .child(Node::text(content))
        }
        Block::Text { content, style } => Element::new("div")
            .class("text")
            .style(style.clone())
            .child(Node::Raw(content.clone())),
        Block::Image {
            src,
            url,
            alt,
            caption,
            style,
        } => render_image(
            src.as_ref().filter(|s| !s.is_empty()).or(url.as_ref()),
            alt.as_deref(),
            caption.as_deref(),
        )
        .style(style.clone()),
        Block::Button {
            link,
            url,
            text,
            content,
            new_tab,
            style,
        } => {
            let href = link
                .as_deref()
                .filter(|s| !s.is_empty())
                .or_else(|| url.as_deref().filter(|s| !s.is_empty()))
                .unwrap_or(DEFAULT_BUTTON_TARGET);
            let label = text
                .as_deref()
                .filter(|s| !s.is_empty())
                .or_else(|| content.as_deref().filter(|s| !s.is_empty()))
                .unwrap_or(DEFAULT_BUTTON_LABEL);

            let mut button = Element::new("a").class("button").attr("href", href);
            if *new_tab {
                button = button
                    .attr("target", "_blank")
                    .attr("rel", "noopener noreferrer");
            }
            button.style(style.clone()).child(Node::text(label))
        }
        Block::Video { url, style } => render_video(url.as_deref()).style(style.clone()),
        Block::Divider { style } => Element::new("hr").class("divider").style(style.clone()),
        Block::Spacer { height } => {
            let mut style = Style::new();
            style.push(
                "height",
                height
                    .as_deref()
                    .filter(|h| !h.trim().is_empty())
                    .unwrap_or(DEFAULT_SPACER_HEIGHT),
            );
            Element::new("div")
                .class("spacer")
                .attr("aria-hidden", "true")
                .style(Some(style))
        }
        Block::Html { content, html } => {
            let markup = content
                .as_ref()
                .filter(|c| !c.is_empty())
                .or(html.as_ref())
                .cloned()
                .unwrap_or_default();
            Element::new("div").class("html").child(Node::Raw(markup))
        }
        Block::Container {
            kind,
            children,
            style,
        } => {
            // No `children` at all renders nothing; an empty list still gets a wrapper
            let children = children.as_deref()?;
            let (tag, class) = match kind {
                ContainerKind::Container => ("div", "container"),
                ContainerKind::Section => ("section", "section"),
            };
            Element::new(tag)
                .class(class)
                .style(style.clone())
                .children(render_children(children))
        }
        Block::Columns {
            columns,
            children,
            style,
        } => {
            let children = children.as_deref()?;
            let lanes = ColumnCount::normalize(*columns);
            Element::new("div")
                .class("columns")
                .class(lanes_class(lanes))
                .attr("data-columns", lanes.lanes().to_string())
                .style(style.clone())
                .children(
                    render_children(children)
                        .map(|child| Node::from(Element::new("div").class("column").child(child))),
                )
        }
        Block::List {
            items,
            ordered,
            style,
        } => Element::new(if *ordered { "ol" } else { "ul" })
            .class("list")
            .style(style.clone())
            .children(
                items
                    .iter()
                    .map(|item| Node::from(Element::new("li").child(Node::text(item)))),
            ),
        Block::Quote { content, style } => Element::new("blockquote")
            .class("quote")
            .style(style.clone())
            .child(Node::text(content)),
        Block::Code { content } => Element::new("pre")
            .class("code")
            .child(Element::new("code").child(Node::text(content))),
    };

    Some(node.into())
}

/// Render nested slots in order, dropping empty ones.
fn render_children(children: &[BlockSlot]) -> impl Iterator<Item = Node> + '_ {
    children.iter().filter_map(render_slot)
}

fn render_image(src: Option<&String>, alt: Option<&str>, caption: Option<&str>) -> Element {
    let mut img = Element::new("img");
    if let Some(src) = src {
        img = img.attr("src", src.as_str());
    }
    img = img.attr("alt", alt.unwrap_or_default());

    let mut figure = Element::new("figure").class("image").child(img);
    if let Some(caption) = caption.filter(|c| !c.is_empty()) {
        figure = figure.child(Element::new("figcaption").child(Node::text(caption)));
    }
    figure
}

fn render_video(url: Option<&str>) -> Element {
    let wrapper = Element::new("div").class("video");

    match url.and_then(youtube_embed_url) {
        Some(embed) => wrapper.child(
            Element::new("iframe")
                .attr("src", embed)
                .attr("frameborder", "0")
                .attr(
                    "allow",
                    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture",
                )
                .attr("allowfullscreen", ""),
        ),
        None => {
            let mut video = Element::new("video").attr("controls", "");
            if let Some(url) = url {
                video = video.attr("src", url);
            }
            wrapper.child(video)
        }
    }
}

/// Embeddable form of a YouTube URL, or `None` for other providers.
///
/// Plain substring matching: anything containing `youtube` is treated as
/// YouTube and its first `watch?v=` becomes `embed/`.
pub fn youtube_embed_url(url: &str) -> Option<String> {
    if url.contains("youtube") {
        Some(url.replacen("watch?v=", "embed/", 1))
    } else {
        None
    }
}

fn lanes_class(lanes: ColumnCount) -> &'static str {
    match lanes {
        ColumnCount::Two => "columns-2",
        ColumnCount::Three => "columns-3",
        ColumnCount::Four => "columns-4",
    }
}
