//! Lenient decoder from page JSON to the typed block tree.
//!
//! Page documents come from an external authoring tool and may be partly
//! malformed. Only a document that is not a JSON object at all is an
//! error; every block is decoded on its own and a bad one becomes an
//! empty [`BlockSlot`] without disturbing its siblings.

mod style;

pub use style::{decode_style, parse_declarations};

use crate::ast::{Block, BlockSlot, ContainerKind, PageDocument, TrustedHtml};
use crate::error::{BlockError, ParseError, Result};
use serde_json::{Map, Value};

/// Parse a complete page document from JSON text.
pub fn parse_document(input: &str) -> Result<PageDocument> {
    let value: Value = serde_json::from_str(input).map_err(ParseError::from)?;
    parse_document_value(value)
}

/// Decode a page document from an already-parsed JSON value.
pub fn parse_document_value(value: Value) -> Result<PageDocument> {
    let map = match value {
        Value::Object(map) => map,
        other => return Err(ParseError::NotAnObject(json_type(&other)).into()),
    };

    let title = map
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let seo_title = non_empty_str(&map, "seo_title").map(String::from);
    let custom_css = non_empty_str(&map, "custom_css").map(TrustedHtml::new);
    let custom_js = non_empty_str(&map, "custom_js").map(TrustedHtml::new);

    let blocks = match map.get("content") {
        Some(content) => decode_content(content),
        None => Vec::new(),
    };

    Ok(PageDocument {
        title,
        seo_title,
        custom_css,
        custom_js,
        blocks,
    })
}

/// Decode the `content` field: `{ "blocks": [...] }`, or the same object
/// stored as a JSON string.
fn decode_content(content: &Value) -> Vec<BlockSlot> {
    match content {
        Value::Object(obj) => match obj.get("blocks") {
            Some(Value::Array(blocks)) => decode_blocks(blocks),
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                log::warn!(
                    "page content `blocks` is {}, not an array; rendering no blocks",
                    json_type(other)
                );
                Vec::new()
            }
        },
        Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
            Ok(inner @ Value::Object(_)) => decode_content(&inner),
            _ => {
                log::warn!("page content string is not a JSON object; rendering no blocks");
                Vec::new()
            }
        },
        Value::Null => Vec::new(),
        other => {
            log::warn!(
                "page content is {}, not an object; rendering no blocks",
                json_type(other)
            );
            Vec::new()
        }
    }
}

/// Decode a sequence of blocks, one slot per input element.
pub fn decode_blocks(values: &[Value]) -> Vec<BlockSlot> {
    values.iter().map(decode_block).collect()
}

/// Decode a single block.
///
/// Never fails: unknown kinds and malformed attributes come back as
/// empty slots.
pub fn decode_block(value: &Value) -> BlockSlot {
    let Some(obj) = value.as_object() else {
        log::debug!("skipping {} in block position", json_type(value));
        return BlockSlot::Unrecognized(None);
    };

    let Some(kind) = obj.get("type").and_then(Value::as_str) else {
        log::debug!("skipping block without a `type`");
        return BlockSlot::Unrecognized(None);
    };

    match decode_known(kind, obj) {
        Ok(Some(block)) => BlockSlot::Block(block),
        Ok(None) => {
            log::debug!("skipping block of unrecognized type `{}`", kind);
            BlockSlot::Unrecognized(Some(kind.to_string()))
        }
        Err(error) => {
            log::warn!("skipping malformed `{}` block: {}", kind, error);
            BlockSlot::Malformed {
                kind: kind.to_string(),
                error,
            }
        }
    }
}

fn decode_known(
    kind: &str,
    obj: &Map<String, Value>,
) -> std::result::Result<Option<Block>, BlockError> {
    let block = match kind {
        "heading" => Block::Heading {
            content: string_attr(obj, "content")?.unwrap_or_default(),
            level: int_attr(obj, "level")?,
            style: style_attr(obj)?,
        },
        "text" | "paragraph" => Block::Text {
            content: TrustedHtml::new(string_attr(obj, "content")?.unwrap_or_default()),
            style: style_attr(obj)?,
        },
        "image" => Block::Image {
            src: string_attr(obj, "src")?,
            url: string_attr(obj, "url")?,
            alt: string_attr(obj, "alt")?,
            caption: string_attr(obj, "caption")?,
            style: style_attr(obj)?,
        },
        "button" => Block::Button {
            link: string_attr(obj, "link")?,
            url: string_attr(obj, "url")?,
            text: string_attr(obj, "text")?,
            content: string_attr(obj, "content")?,
            new_tab: bool_attr(obj, "newTab"),
            style: style_attr(obj)?,
        },
        "video" => Block::Video {
            url: string_attr(obj, "url")?,
            style: style_attr(obj)?,
        },
        "divider" => Block::Divider {
            style: style_attr(obj)?,
        },
        "spacer" => Block::Spacer {
            height: length_attr(obj, "height")?,
        },
        "html" => Block::Html {
            content: string_attr(obj, "content")?.map(TrustedHtml::new),
            html: string_attr(obj, "html")?.map(TrustedHtml::new),
        },
        "container" | "section" => Block::Container {
            kind: if kind == "section" {
                ContainerKind::Section
            } else {
                ContainerKind::Container
            },
            children: children_attr(obj)?,
            style: style_attr(obj)?,
        },
        "columns" => Block::Columns {
            columns: int_attr(obj, "columns")?,
            children: children_attr(obj)?,
            style: style_attr(obj)?,
        },
        "list" => Block::List {
            items: items_attr(obj)?,
            ordered: bool_attr(obj, "ordered"),
            style: style_attr(obj)?,
        },
        "quote" | "blockquote" => Block::Quote {
            content: string_attr(obj, "content")?.unwrap_or_default(),
            style: style_attr(obj)?,
        },
        "code" => Block::Code {
            content: string_attr(obj, "content")?.unwrap_or_default(),
        },
        _ => return Ok(None),
    };

    Ok(Some(block))
}

/// A string attribute. Scalars are accepted in their text form.
fn string_attr(
    obj: &Map<String, Value>,
    attr: &'static str,
) -> std::result::Result<Option<String>, BlockError> {
    match obj.get(attr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(BlockError::Attribute {
            attr,
            expected: "a string",
        }),
    }
}

/// An integer attribute, given as a number or a numeric string.
/// Unparseable strings count as absent.
fn int_attr(
    obj: &Map<String, Value>,
    attr: &'static str,
) -> std::result::Result<Option<i64>, BlockError> {
    match obj.get(attr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))),
        Some(Value::String(s)) => Ok(s.trim().parse().ok()),
        Some(Value::Bool(_)) => Ok(None),
        Some(_) => Err(BlockError::Attribute {
            attr,
            expected: "an integer",
        }),
    }
}

fn bool_attr(obj: &Map<String, Value>, attr: &str) -> bool {
    matches!(obj.get(attr), Some(Value::Bool(true)))
}

/// A CSS length: strings verbatim, bare numbers in pixels.
fn length_attr(
    obj: &Map<String, Value>,
    attr: &'static str,
) -> std::result::Result<Option<String>, BlockError> {
    match obj.get(attr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(format!("{}px", n))),
        Some(_) => Err(BlockError::Attribute {
            attr,
            expected: "a CSS length",
        }),
    }
}

fn children_attr(
    obj: &Map<String, Value>,
) -> std::result::Result<Option<Vec<BlockSlot>>, BlockError> {
    match obj.get("children") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(children)) => Ok(Some(decode_blocks(children))),
        Some(_) => Err(BlockError::Attribute {
            attr: "children",
            expected: "an array of blocks",
        }),
    }
}

fn items_attr(obj: &Map<String, Value>) -> std::result::Result<Vec<String>, BlockError> {
    match obj.get("items") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()),
        Some(_) => Err(BlockError::Attribute {
            attr: "items",
            expected: "an array of strings",
        }),
    }
}

fn style_attr(obj: &Map<String, Value>) -> std::result::Result<Option<crate::ast::Style>, BlockError> {
    decode_style(obj.get("style"))
}

fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Style;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_document_metadata() {
        let input = r#"{
            "title": "About",
            "seo_title": "About us | Acme",
            "custom_css": "body { color: red; }",
            "custom_js": "",
            "slug": "about",
            "content": { "blocks": [] }
        }"#;

        let doc = parse_document(input).unwrap();

        assert_eq!(doc.title, "About");
        assert_eq!(doc.seo_title.as_deref(), Some("About us | Acme"));
        assert_eq!(
            doc.custom_css.as_ref().map(TrustedHtml::as_str),
            Some("body { color: red; }")
        );
        assert_eq!(doc.custom_js, None);
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn test_missing_content_is_empty() {
        let doc = parse_document(r#"{"title": "Empty"}"#).unwrap();
        assert!(doc.blocks.is_empty());

        let doc = parse_document(r#"{"title": "Empty", "content": {}}"#).unwrap();
        assert!(doc.blocks.is_empty());
    }

    #[test]
    fn test_content_as_json_string() {
        let input = r#"{"title": "T", "content": "{\"blocks\": [{\"type\": \"divider\"}]}"}"#;
        let doc = parse_document(input).unwrap();
        assert_eq!(
            doc.blocks,
            vec![BlockSlot::Block(Block::Divider { style: None })]
        );
    }

    #[test]
    fn test_non_object_document_is_error() {
        let err = parse_document("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::NotAnObject("an array"))));

        let err = parse_document("{not json").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::Json(_))));
    }

    #[test]
    fn test_unrecognized_and_missing_type() {
        assert_eq!(
            decode_block(&json!({"type": "carousel"})),
            BlockSlot::Unrecognized(Some("carousel".to_string()))
        );
        assert_eq!(
            decode_block(&json!({"content": "no type"})),
            BlockSlot::Unrecognized(None)
        );
        assert_eq!(decode_block(&Value::Null), BlockSlot::Unrecognized(None));
        assert_eq!(decode_block(&json!(7)), BlockSlot::Unrecognized(None));
    }

    #[test]
    fn test_malformed_block_is_contained() {
        let slots = decode_blocks(&[
            json!({"type": "list", "items": "not an array"}),
            json!({"type": "code", "content": "fn main() {}"}),
        ]);

        assert_eq!(
            slots[0],
            BlockSlot::Malformed {
                kind: "list".to_string(),
                error: BlockError::Attribute {
                    attr: "items",
                    expected: "an array of strings",
                },
            }
        );
        assert_eq!(
            slots[1],
            BlockSlot::Block(Block::Code {
                content: "fn main() {}".to_string()
            })
        );
    }

    #[test]
    fn test_malformed_child_keeps_parent() {
        let slot = decode_block(&json!({
            "type": "container",
            "children": [
                {"type": "heading", "content": {"nested": true}},
                {"type": "divider"}
            ]
        }));

        let children = slot.block().and_then(Block::children).unwrap();
        assert_eq!(children.len(), 2);
        assert!(matches!(children[0], BlockSlot::Malformed { .. }));
        assert!(matches!(children[1], BlockSlot::Block(Block::Divider { .. })));
    }

    #[test]
    fn test_aliases_decode_to_same_variant() {
        let text = decode_block(&json!({"type": "text", "content": "<b>x</b>"}));
        let paragraph = decode_block(&json!({"type": "paragraph", "content": "<b>x</b>"}));
        assert_eq!(text, paragraph);

        let quote = decode_block(&json!({"type": "quote", "content": "q"}));
        let blockquote = decode_block(&json!({"type": "blockquote", "content": "q"}));
        assert_eq!(quote, blockquote);

        let section = decode_block(&json!({"type": "section", "children": []}));
        assert!(matches!(
            section,
            BlockSlot::Block(Block::Container {
                kind: ContainerKind::Section,
                ..
            })
        ));
    }

    #[test]
    fn test_lenient_scalars() {
        let heading = decode_block(&json!({"type": "heading", "level": "3", "content": 42}));
        assert_eq!(
            heading,
            BlockSlot::Block(Block::Heading {
                content: "42".to_string(),
                level: Some(3),
                style: None,
            })
        );

        let spacer = decode_block(&json!({"type": "spacer", "height": 48}));
        assert_eq!(
            spacer,
            BlockSlot::Block(Block::Spacer {
                height: Some("48px".to_string())
            })
        );

        let button = decode_block(&json!({"type": "button", "newTab": "yes"}));
        assert!(matches!(
            button,
            BlockSlot::Block(Block::Button { new_tab: false, .. })
        ));
    }

    #[test]
    fn test_list_items_non_strings() {
        let list = decode_block(&json!({"type": "list", "items": ["a", 2, null], "ordered": true}));
        assert_eq!(
            list,
            BlockSlot::Block(Block::List {
                items: vec!["a".to_string(), "2".to_string(), "null".to_string()],
                ordered: true,
                style: None,
            })
        );
    }

    #[test]
    fn test_block_style_decoded() {
        let divider = decode_block(&json!({"type": "divider", "style": {"marginTop": 8}}));
        let mut expected = Style::new();
        expected.push("margin-top", "8px");
        assert_eq!(
            divider,
            BlockSlot::Block(Block::Divider {
                style: Some(expected)
            })
        );
    }
}
