//! Author-facing report of blocks that render as nothing.
//!
//! Rendering drops unrecognized and malformed blocks silently. Authoring
//! tools can run [`check_page`] to show the author what was dropped.

use crate::ast::{BlockSlot, PageDocument};
use crate::error::BlockError;
use serde::Serialize;
use std::fmt;

/// A dropped block and where it sits in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Index path from the top-level block list through `children`
    pub path: Vec<usize>,
    pub message: String,
    #[serde(skip)]
    pub problem: Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// `type` missing or unknown
    Unrecognized(Option<String>),
    /// Known kind with undecodable attributes
    Malformed { kind: String, error: BlockError },
}

impl Diagnostic {
    /// `blocks[1].children[0]` style location.
    pub fn location(&self) -> String {
        let mut out = String::from("blocks");
        for (depth, index) in self.path.iter().enumerate() {
            if depth > 0 {
                out.push_str(".children");
            }
            out.push_str(&format!("[{}]", index));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location(), self.message)
    }
}

/// Walk the whole block tree and report every empty slot, in document order.
pub fn check_page(doc: &PageDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut path = Vec::new();
    walk(&doc.blocks, &mut path, &mut diagnostics);
    diagnostics
}

fn walk(slots: &[BlockSlot], path: &mut Vec<usize>, out: &mut Vec<Diagnostic>) {
    for (index, slot) in slots.iter().enumerate() {
        path.push(index);
        match slot {
            BlockSlot::Block(block) => {
                if let Some(children) = block.children() {
                    walk(children, path, out);
                }
            }
            BlockSlot::Unrecognized(kind) => {
                let message = match kind {
                    Some(kind) => format!("unrecognized block type `{}`", kind),
                    None => "block has no `type`".to_string(),
                };
                out.push(Diagnostic {
                    path: path.clone(),
                    message,
                    problem: Problem::Unrecognized(kind.clone()),
                });
            }
            BlockSlot::Malformed { kind, error } => out.push(Diagnostic {
                path: path.clone(),
                message: format!("malformed `{}` block: {}", kind, error),
                problem: Problem::Malformed {
                    kind: kind.clone(),
                    error: error.clone(),
                },
            }),
        }
        path.pop();
    }
}
