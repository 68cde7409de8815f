//! WebAssembly bindings for JavaScript/TypeScript.
//!
//! # Usage (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { renderPage, parsePage, validatePage, RenderOptions } from '@blockpage/wasm';
//!
//! await init();
//!
//! // Fragment for embedding into an existing page shell
//! const html = renderPage(pageJson);
//!
//! // Complete document
//! const options = new RenderOptions();
//! options.setStandalone(true);
//! const fullHtml = renderPage(pageJson, options);
//!
//! // Block summary and dropped-block warnings for an editor
//! const info = parsePage(pageJson);
//! const report = validatePage(pageJson);
//! ```

#![cfg(feature = "wasm")]

use crate::ast::{BlockSlot, PageDocument};
use crate::diagnostics::check_page;
use crate::parser::parse_document;
use crate::render::{render, HtmlConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

// ============================================================================
// Main API Functions
// ============================================================================

/// Parse page JSON and render it to HTML.
///
/// # Errors
///
/// Returns an error if the input is not a JSON object or the options are
/// invalid. Individual bad blocks are skipped, not reported.
#[wasm_bindgen(js_name = renderPage)]
pub fn render_page(input: &str, options: Option<RenderOptions>) -> Result<String, JsError> {
    let doc = parse_document(input).map_err(|e| JsError::new(&e.to_string()))?;
    let html_config = options.map(|o| o.to_html_config()).unwrap_or_default();

    render(&doc, &html_config).map_err(|e| JsError::new(&e.to_string()))
}

/// Parse page JSON and return its metadata and block outline.
#[wasm_bindgen(js_name = parsePage)]
pub fn parse_page(input: &str) -> Result<JsValue, JsError> {
    let doc = parse_document(input).map_err(|e| JsError::new(&e.to_string()))?;
    let info = PageInfo::from_document(&doc);

    serde_wasm_bindgen::to_value(&info)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Report blocks that will render as nothing.
#[wasm_bindgen(js_name = validatePage)]
pub fn validate_page(input: &str) -> Result<JsValue, JsError> {
    let result = match parse_document(input) {
        Ok(doc) => {
            let warnings: Vec<String> = check_page(&doc).iter().map(ToString::to_string).collect();
            ValidationResult {
                valid: true,
                errors: vec![],
                warnings,
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            errors: vec![e.to_string()],
            warnings: vec![],
        },
    };

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// ============================================================================
// Configuration Types
// ============================================================================

/// Configuration options for rendering.
#[wasm_bindgen]
#[derive(Clone)]
pub struct RenderOptions {
    config: HtmlConfig,
}

#[wasm_bindgen]
impl RenderOptions {
    /// Create a new options object with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            config: HtmlConfig::default(),
        }
    }

    /// Set whether to generate a complete HTML document.
    #[wasm_bindgen(js_name = setStandalone)]
    pub fn set_standalone(&mut self, standalone: bool) {
        self.config.standalone = standalone;
    }

    /// Get standalone setting.
    #[wasm_bindgen(js_name = getStandalone)]
    pub fn get_standalone(&self) -> bool {
        self.config.standalone
    }

    /// Override the document title (for standalone mode).
    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) {
        self.config.title = Some(title.to_string());
    }

    /// Set the CSS class prefix.
    #[wasm_bindgen(js_name = setClassPrefix)]
    pub fn set_class_prefix(&mut self, prefix: &str) {
        self.config.class_prefix = prefix.to_string();
    }

    /// Set the `lang` attribute of standalone documents.
    #[wasm_bindgen(js_name = setLang)]
    pub fn set_lang(&mut self, lang: &str) {
        self.config.lang = lang.to_string();
    }

    /// Include or leave out the built-in layout styles.
    #[wasm_bindgen(js_name = setDefaultStyles)]
    pub fn set_default_styles(&mut self, enabled: bool) {
        self.config.default_styles = enabled;
    }

    fn to_html_config(&self) -> HtmlConfig {
        self.config.clone()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Serializable Types for JS Interop
// ============================================================================

#[derive(Serialize)]
struct PageInfo {
    title: String,
    seo_title: Option<String>,
    has_custom_css: bool,
    has_custom_js: bool,
    blocks: Vec<BlockInfo>,
    block_count: usize,
}

#[derive(Serialize)]
struct BlockInfo {
    #[serde(rename = "type")]
    block_type: Option<String>,
    rendered: bool,
    children: Vec<BlockInfo>,
}

#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl PageInfo {
    fn from_document(doc: &PageDocument) -> Self {
        let blocks: Vec<BlockInfo> = doc.blocks.iter().map(BlockInfo::from_slot).collect();
        let block_count = blocks.iter().map(BlockInfo::count).sum();

        Self {
            title: doc.title.clone(),
            seo_title: doc.seo_title.clone(),
            has_custom_css: doc.custom_css.is_some(),
            has_custom_js: doc.custom_js.is_some(),
            blocks,
            block_count,
        }
    }
}

impl BlockInfo {
    fn from_slot(slot: &BlockSlot) -> Self {
        match slot {
            BlockSlot::Block(block) => Self {
                block_type: Some(block.kind().to_string()),
                rendered: true,
                children: block
                    .children()
                    .unwrap_or_default()
                    .iter()
                    .map(Self::from_slot)
                    .collect(),
            },
            BlockSlot::Unrecognized(kind) => Self {
                block_type: kind.clone(),
                rendered: false,
                children: vec![],
            },
            BlockSlot::Malformed { kind, .. } => Self {
                block_type: Some(kind.clone()),
                rendered: false,
                children: vec![],
            },
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}
