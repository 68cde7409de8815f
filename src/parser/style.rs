//! Decoding of per-block `style` attributes.
//!
//! Authoring tools emit either a style object (`{"backgroundColor": "#fff",
//! "padding": 16}`) or a CSS declaration string (`"background-color: #fff;
//! padding: 16px"`). Both normalize to a [`Style`] with kebab-case
//! property names. Values are never validated.

use crate::ast::Style;
use crate::error::BlockError;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_while1},
    character::complete::{char, multispace0},
    combinator::{eof, map, opt, peek, recognize, success},
    multi::{many1, separated_list0},
    sequence::{delimited, preceded, separated_pair, terminated},
    IResult,
};
use serde_json::Value;

/// Properties that take plain numbers; everything else gets `px`.
const UNITLESS: &[&str] = &[
    "opacity",
    "z-index",
    "font-weight",
    "line-height",
    "flex",
    "flex-grow",
    "flex-shrink",
    "order",
    "grid-row",
    "grid-row-start",
    "grid-row-end",
    "grid-column",
    "grid-column-start",
    "grid-column-end",
    "column-count",
    "tab-size",
    "zoom",
    "orphans",
    "widows",
];

/// Decode a `style` attribute. Empty styles decode as `None`.
pub fn decode_style(value: Option<&Value>) -> Result<Option<Style>, BlockError> {
    let style = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(obj)) => {
            let mut style = Style::new();
            for (key, value) in obj {
                let property = property_name(key);
                let value = match value {
                    Value::String(s) => s.trim().to_string(),
                    Value::Number(n) => number_value(&property, n),
                    // Booleans, nulls and nested values carry no CSS
                    _ => continue,
                };
                if !value.is_empty() {
                    style.push(property, value);
                }
            }
            style
        }
        Some(Value::String(css)) => {
            let mut style = Style::new();
            for (property, value) in parse_declarations(css) {
                style.push(property_name(property), value);
            }
            style
        }
        Some(_) => {
            return Err(BlockError::Attribute {
                attr: "style",
                expected: "an object or a CSS declaration string",
            })
        }
    };

    Ok((!style.is_empty()).then_some(style))
}

/// Parse `prop: value; prop: value` into pairs, skipping anything that
/// is not a well-formed declaration.
pub fn parse_declarations(input: &str) -> Vec<(&str, &str)> {
    match declaration_list(input) {
        Ok((_, declarations)) => declarations.into_iter().flatten().collect(),
        Err(_) => Vec::new(),
    }
}

fn declaration_list(input: &str) -> IResult<&str, Vec<Option<(&str, &str)>>> {
    separated_list0(
        char(';'),
        alt((
            // A declaration only counts if it runs up to the next `;`
            map(terminated(declaration, peek(alt((tag(";"), eof)))), Some),
            map(is_not(";"), |_| None),
            success(None),
        )),
    )(input)
}

fn declaration(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        property,
        delimited(multispace0, char(':'), multispace0),
        value,
    )(input)
}

fn property(input: &str) -> IResult<&str, &str> {
    preceded(
        multispace0,
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    )(input)
}

/// Everything up to the next `;` outside quotes, trimmed.
fn value(input: &str) -> IResult<&str, &str> {
    map(recognize(many1(alt((quoted, is_not(";\"'"))))), str::trim)(input)
}

fn quoted(input: &str) -> IResult<&str, &str> {
    alt((
        recognize(delimited(char('"'), opt(is_not("\"")), char('"'))),
        recognize(delimited(char('\''), opt(is_not("'")), char('\''))),
    ))(input)
}

/// `backgroundColor` → `background-color`; `WebkitBoxShadow` →
/// `-webkit-box-shadow`; `msTransform` → `-ms-transform`. Custom
/// properties (`--brand`) are kept as written.
fn property_name(key: &str) -> String {
    let key = key.trim();
    if key.starts_with("--") {
        return key.to_string();
    }
    if key.contains('-') {
        return key.to_ascii_lowercase();
    }

    let mut out = String::with_capacity(key.len() + 4);
    if key.starts_with("ms") && key[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.push('-');
    }
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn number_value(property: &str, n: &serde_json::Number) -> String {
    let zero = n.as_f64() == Some(0.0);
    if zero || property.starts_with("--") || UNITLESS.contains(&property) {
        n.to_string()
    } else {
        format!("{}px", n)
    }
}
