//! Page lookup by owner and slug, and the view shown when it fails.

use crate::ast::PageDocument;
use crate::error::LookupError;
use crate::parser::{parse_document_value, parse_document};
use crate::render::{render_page, Element, Node, RenderedPage};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;

/// Something that can fetch a published page document.
pub trait PageSource {
    fn fetch(&self, owner: &str, slug: &str) -> Result<PageDocument, LookupError>;
}

/// What a visitor sees for an `(owner, slug)` request.
#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Found(RenderedPage),
    NotFound(NotFound),
}

/// Fetch and render a page. Lookup failures become the not-found view.
pub fn load_page<S: PageSource + ?Sized>(source: &S, owner: &str, slug: &str) -> PageView {
    match source.fetch(owner, slug) {
        Ok(doc) => PageView::Found(render_page(&doc)),
        Err(err) => {
            log::warn!("serving not-found page: {}", err);
            PageView::NotFound(NotFound::from_error(&err))
        }
    }
}

/// The not-found view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    pub title: &'static str,
    pub reason: String,
    pub guidance: [&'static str; 3],
}

impl NotFound {
    pub const TITLE: &'static str = "Page Not Found";

    pub const GUIDANCE: [&'static str; 3] = [
        "Check that the web address is spelled correctly",
        "The page may have been unpublished or removed by its owner",
        "Try the site's home page to find what you are looking for",
    ];

    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            title: Self::TITLE,
            reason: reason.into(),
            guidance: Self::GUIDANCE,
        }
    }

    pub fn from_error(err: &LookupError) -> Self {
        let reason = match err {
            LookupError::NotFound { .. } => "The page you're looking for doesn't exist.",
            LookupError::NotPublished { .. } => "The page you're looking for isn't published.",
            LookupError::Unreadable { .. } => "The page you're looking for couldn't be loaded.",
        };
        Self::new(reason)
    }

    pub fn to_node(&self) -> Node {
        Element::new("div")
            .class("not-found")
            .child(Element::new("h1").child(Node::text(self.title)))
            .child(Element::new("p").child(Node::text(self.reason.as_str())))
            .child(Element::new("ul").children(
                self.guidance
                    .iter()
                    .map(|line| Node::from(Element::new("li").child(Node::text(*line)))),
            ))
            .into()
    }
}

/// Reads `<root>/<owner>/<slug>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, owner: &str, slug: &str) -> Option<PathBuf> {
        if is_segment(owner) && is_segment(slug) {
            Some(self.root.join(owner).join(format!("{}.json", slug)))
        } else {
            None
        }
    }
}

impl PageSource for DirectorySource {
    fn fetch(&self, owner: &str, slug: &str) -> Result<PageDocument, LookupError> {
        let not_found = || LookupError::NotFound {
            owner: owner.to_string(),
            slug: slug.to_string(),
        };
        let unreadable = |reason: String| LookupError::Unreadable {
            owner: owner.to_string(),
            slug: slug.to_string(),
            reason,
        };

        let path = self.path_for(owner, slug).ok_or_else(not_found)?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(unreadable(format!("{}: {}", path.display(), e))),
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))?;
        if value.get("is_published") == Some(&Value::Bool(false)) {
            return Err(LookupError::NotPublished {
                owner: owner.to_string(),
                slug: slug.to_string(),
            });
        }

        parse_document_value(value).map_err(|e| unreadable(e.to_string()))
    }
}

/// Pages held in memory, keyed by owner and slug.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: HashMap<(String, String), (PageDocument, bool)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a published page.
    pub fn insert(&mut self, owner: &str, slug: &str, doc: PageDocument) {
        self.pages
            .insert((owner.to_string(), slug.to_string()), (doc, true));
    }

    /// Add a page that exists but is not visible to visitors.
    pub fn insert_unpublished(&mut self, owner: &str, slug: &str, doc: PageDocument) {
        self.pages
            .insert((owner.to_string(), slug.to_string()), (doc, false));
    }

    /// Parse and add a published page from JSON.
    pub fn insert_json(&mut self, owner: &str, slug: &str, json: &str) -> crate::error::Result<()> {
        let doc = parse_document(json)?;
        self.insert(owner, slug, doc);
        Ok(())
    }
}

impl PageSource for MemorySource {
    fn fetch(&self, owner: &str, slug: &str) -> Result<PageDocument, LookupError> {
        match self.pages.get(&(owner.to_string(), slug.to_string())) {
            Some((doc, true)) => Ok(doc.clone()),
            Some((_, false)) => Err(LookupError::NotPublished {
                owner: owner.to_string(),
                slug: slug.to_string(),
            }),
            None => Err(LookupError::NotFound {
                owner: owner.to_string(),
                slug: slug.to_string(),
            }),
        }
    }
}

/// Owner and slug segments: non-empty `[A-Za-z0-9_-]`.
fn is_segment(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_not_found, HtmlConfig};
    use pretty_assertions::assert_eq;
    use std::fs;

    const PAGE: &str = r#"{"title": "About", "content": {"blocks": [{"type": "divider"}]}}"#;

    #[test]
    fn test_memory_source_found() {
        let mut source = MemorySource::new();
        source.insert_json("acme", "about", PAGE).unwrap();

        match load_page(&source, "acme", "about") {
            PageView::Found(page) => {
                assert_eq!(page.title, "About");
                assert_eq!(page.slots.len(), 1);
            }
            PageView::NotFound(nf) => panic!("unexpected not found: {:?}", nf),
        }
    }

    #[test]
    fn test_missing_slug_is_not_found() {
        let source = MemorySource::new();

        let PageView::NotFound(nf) = load_page(&source, "acme", "nope") else {
            panic!("expected not found");
        };
        assert_eq!(nf.title, "Page Not Found");
        assert_eq!(nf.guidance.len(), 3);
        assert_eq!(nf.reason, "The page you're looking for doesn't exist.");
    }

    #[test]
    fn test_unpublished_is_not_found() {
        let mut source = MemorySource::new();
        source.insert_unpublished(
            "acme",
            "draft",
            crate::parser::parse_document(PAGE).unwrap(),
        );

        let PageView::NotFound(nf) = load_page(&source, "acme", "draft") else {
            panic!("expected not found");
        };
        assert_eq!(nf.reason, "The page you're looking for isn't published.");
    }

    #[test]
    fn test_not_found_html() {
        let nf = NotFound::new("Gone.");
        let html = render_not_found(&nf, &HtmlConfig::default()).unwrap();

        assert!(html.contains("<h1>Page Not Found</h1>"));
        assert!(html.contains("<p>Gone.</p>"));
        assert_eq!(html.matches("<li>").count(), 3);
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("acme")).unwrap();
        fs::write(dir.path().join("acme").join("about.json"), PAGE).unwrap();
        fs::write(
            dir.path().join("acme").join("draft.json"),
            r#"{"title": "Draft", "is_published": false}"#,
        )
        .unwrap();
        fs::write(dir.path().join("acme").join("broken.json"), "{").unwrap();

        let source = DirectorySource::new(dir.path());

        assert_eq!(source.fetch("acme", "about").unwrap().title, "About");
        assert!(matches!(
            source.fetch("acme", "missing"),
            Err(LookupError::NotFound { .. })
        ));
        assert!(matches!(
            source.fetch("acme", "draft"),
            Err(LookupError::NotPublished { .. })
        ));
        assert!(matches!(
            source.fetch("acme", "broken"),
            Err(LookupError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_directory_source_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("secret.json"), PAGE).unwrap();
        fs::create_dir(dir.path().join("acme")).unwrap();

        let source = DirectorySource::new(dir.path().join("acme"));

        assert!(matches!(
            source.fetch("..", "secret"),
            Err(LookupError::NotFound { .. })
        ));
        assert!(matches!(
            source.fetch("acme", "../../secret"),
            Err(LookupError::NotFound { .. })
        ));
        assert!(matches!(
            source.fetch("", "about"),
            Err(LookupError::NotFound { .. })
        ));
    }
}
