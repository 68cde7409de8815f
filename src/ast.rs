//! Typed model of a published page and its content blocks.

use crate::error::BlockError;
use std::fmt;

/// A complete page document, as fetched from the authoring backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    /// Page title
    pub title: String,
    /// Title for the browser tab / search engines, if it differs from `title`
    pub seo_title: Option<String>,
    /// Author-supplied stylesheet, injected verbatim
    pub custom_css: Option<TrustedHtml>,
    /// Author-supplied script, injected verbatim
    pub custom_js: Option<TrustedHtml>,
    /// Top-level block sequence
    pub blocks: Vec<BlockSlot>,
}

impl PageDocument {
    /// The title shown in the browser tab: `seo_title`, falling back to `title`.
    pub fn document_title(&self) -> &str {
        self.seo_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.title)
    }
}

/// One position in a block sequence.
///
/// Decoding never fails for a single block; instead the position keeps
/// a marker so that siblings keep their place in the output.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockSlot {
    /// A block of a known kind
    Block(Block),
    /// `type` missing or not one of the known kinds
    Unrecognized(Option<String>),
    /// A known kind whose attributes could not be decoded
    Malformed { kind: String, error: BlockError },
}

impl BlockSlot {
    /// The decoded block, if any.
    pub fn block(&self) -> Option<&Block> {
        match self {
            Self::Block(block) => Some(block),
            _ => None,
        }
    }
}

impl From<Block> for BlockSlot {
    fn from(block: Block) -> Self {
        Self::Block(block)
    }
}

/// Content blocks.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A heading; `level` is kept as authored and normalized when rendering
    Heading {
        content: String,
        level: Option<i64>,
        style: Option<Style>,
    },

    /// `text` or `paragraph`: raw author markup
    Text {
        content: TrustedHtml,
        style: Option<Style>,
    },

    /// An image
    Image {
        src: Option<String>,
        url: Option<String>,
        alt: Option<String>,
        caption: Option<String>,
        style: Option<Style>,
    },

    /// A link styled as a button
    Button {
        link: Option<String>,
        url: Option<String>,
        text: Option<String>,
        content: Option<String>,
        new_tab: bool,
        style: Option<Style>,
    },

    /// An embedded video
    Video {
        url: Option<String>,
        style: Option<Style>,
    },

    /// A horizontal rule
    Divider { style: Option<Style> },

    /// Vertical whitespace of a CSS length
    Spacer { height: Option<String> },

    /// Raw author markup from either `content` or `html`
    Html {
        content: Option<TrustedHtml>,
        html: Option<TrustedHtml>,
    },

    /// `container` or `section`: a wrapper around nested blocks
    Container {
        kind: ContainerKind,
        children: Option<Vec<BlockSlot>>,
        style: Option<Style>,
    },

    /// Nested blocks laid out in lanes
    Columns {
        columns: Option<i64>,
        children: Option<Vec<BlockSlot>>,
        style: Option<Style>,
    },

    /// Plain-text list
    List {
        items: Vec<String>,
        ordered: bool,
        style: Option<Style>,
    },

    /// `quote` or `blockquote`
    Quote {
        content: String,
        style: Option<Style>,
    },

    /// Preformatted code
    Code { content: String },
}

impl Block {
    /// The `type` name this block is written as.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Button { .. } => "button",
            Self::Video { .. } => "video",
            Self::Divider { .. } => "divider",
            Self::Spacer { .. } => "spacer",
            Self::Html { .. } => "html",
            Self::Container { kind, .. } => kind.as_str(),
            Self::Columns { .. } => "columns",
            Self::List { .. } => "list",
            Self::Quote { .. } => "quote",
            Self::Code { .. } => "code",
        }
    }

    /// Nested block slots, for the recursive kinds.
    pub fn children(&self) -> Option<&[BlockSlot]> {
        match self {
            Self::Container { children, .. } | Self::Columns { children, .. } => {
                children.as_deref()
            }
            _ => None,
        }
    }
}

/// Which wrapper element a container block renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Container,
    Section,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Section => "section",
        }
    }
}

/// Heading depth after normalization into the four styled buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const DEFAULT: Self = Self(2);

    /// Clamp an authored level into 1..=4; absent means 2.
    pub fn normalize(level: Option<i64>) -> Self {
        match level {
            Some(level) => Self(level.clamp(1, 4) as u8),
            None => Self::DEFAULT,
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// Number of lanes a `columns` block lays its children out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnCount {
    Two,
    Three,
    Four,
}

impl ColumnCount {
    /// 2, 3 and 4 map to themselves; anything else, including absent, is 2.
    pub fn normalize(columns: Option<i64>) -> Self {
        match columns {
            Some(3) => Self::Three,
            Some(4) => Self::Four,
            _ => Self::Two,
        }
    }

    pub fn lanes(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

/// Markup passed through to the output without escaping.
///
/// Every raw-markup channel (text and html blocks, custom CSS and JS)
/// goes through this type, so a sanitizer would only need to hook in
/// [`TrustedHtml::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inline CSS declarations in authored order, with kebab-case property names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, replacing an earlier one for the same property.
    pub fn push(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.declarations.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property, value)),
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn declarations(&self) -> &[(String, String)] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Serialize as the value of an HTML `style` attribute.
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(p, v)| format!("{}: {}", p, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamps() {
        assert_eq!(HeadingLevel::normalize(None).get(), 2);
        assert_eq!(HeadingLevel::normalize(Some(0)).get(), 1);
        assert_eq!(HeadingLevel::normalize(Some(-7)).get(), 1);
        assert_eq!(HeadingLevel::normalize(Some(3)).get(), 3);
        assert_eq!(HeadingLevel::normalize(Some(6)).get(), 4);
    }

    #[test]
    fn test_column_count_defaults_to_two() {
        assert_eq!(ColumnCount::normalize(Some(3)).lanes(), 3);
        assert_eq!(ColumnCount::normalize(Some(4)).lanes(), 4);
        assert_eq!(ColumnCount::normalize(Some(2)).lanes(), 2);
        assert_eq!(ColumnCount::normalize(Some(5)).lanes(), 2);
        assert_eq!(ColumnCount::normalize(Some(1)).lanes(), 2);
        assert_eq!(ColumnCount::normalize(None).lanes(), 2);
    }

    #[test]
    fn test_style_push_replaces() {
        let mut style = Style::new();
        style.push("color", "red");
        style.push("margin", "0");
        style.push("color", "blue");
        assert_eq!(style.to_css(), "color: blue; margin: 0");
        assert_eq!(style.get("margin"), Some("0"));
    }

    #[test]
    fn test_document_title_prefers_seo_title() {
        let mut doc = PageDocument {
            title: "Home".to_string(),
            seo_title: None,
            custom_css: None,
            custom_js: None,
            blocks: vec![],
        };
        assert_eq!(doc.document_title(), "Home");
        doc.seo_title = Some("Home | Acme".to_string());
        assert_eq!(doc.document_title(), "Home | Acme");
    }
}
