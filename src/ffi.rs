//! C FFI layer for cross-language interoperability.

use crate::ast::PageDocument;
use crate::parser::parse_document;
use crate::render::{render, render_not_found, HtmlConfig};
use crate::site::{DirectorySource, PageSource};
use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::ptr;

/// Opaque handle to a parsed page document.
pub struct BlockPageDocument {
    inner: PageDocument,
}

/// Configuration for rendering.
#[repr(C)]
pub struct BlockPageConfig {
    /// Whether to generate standalone HTML (with DOCTYPE, head, etc.)
    pub standalone: c_int,
    /// CSS class prefix (null for the default `bp-`)
    pub class_prefix: *const c_char,
}

impl Default for BlockPageConfig {
    fn default() -> Self {
        Self {
            standalone: 0,
            class_prefix: ptr::null(),
        }
    }
}

/// Result type for FFI operations.
#[repr(C)]
pub struct BlockPageResult {
    /// Pointer to result string (caller must free with blockpage_free_string)
    pub data: *mut c_char,
    /// Error message if data is null (caller must free with blockpage_free_string)
    pub error: *mut c_char,
    /// 1 when a looked-up page was found, 0 when `data` holds the not-found page
    pub found: c_int,
}

impl BlockPageResult {
    /// Output containing a NUL byte cannot cross the C boundary intact.
    fn ok(data: String) -> Self {
        match CString::new(data) {
            Ok(data) => Self {
                data: data.into_raw(),
                error: ptr::null_mut(),
                found: 1,
            },
            Err(_) => Self::err("output contains NUL byte".to_string()),
        }
    }

    fn not_found(data: String) -> Self {
        Self {
            found: 0,
            ..Self::ok(data)
        }
    }

    fn err(error: String) -> Self {
        Self {
            data: ptr::null_mut(),
            error: CString::new(error.replace('\0', ""))
                .unwrap_or_default()
                .into_raw(),
            found: 0,
        }
    }
}

/// Read a C string argument; `None` for null or invalid UTF-8.
unsafe fn c_str<'a>(s: *const c_char) -> Option<&'a str> {
    if s.is_null() {
        None
    } else {
        CStr::from_ptr(s).to_str().ok()
    }
}

unsafe fn html_config(config: *const BlockPageConfig) -> HtmlConfig {
    if config.is_null() {
        return HtmlConfig::default();
    }
    let cfg = &*config;
    let mut html_config = HtmlConfig {
        standalone: cfg.standalone != 0,
        ..Default::default()
    };
    if let Some(prefix) = c_str(cfg.class_prefix) {
        html_config.class_prefix = prefix.to_string();
    }
    html_config
}

/// Parse a page document and return a handle.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - The returned document must be freed with `blockpage_free_document`.
#[no_mangle]
pub unsafe extern "C" fn blockpage_parse(input: *const c_char) -> *mut BlockPageDocument {
    let Some(input) = c_str(input) else {
        return ptr::null_mut();
    };

    match parse_document(input) {
        Ok(doc) => Box::into_raw(Box::new(BlockPageDocument { inner: doc })),
        Err(_) => ptr::null_mut(),
    }
}

/// Render a parsed document to HTML.
///
/// # Safety
///
/// - `doc` must be a valid pointer from `blockpage_parse`.
/// - `config` must be null or a valid pointer to `BlockPageConfig`.
/// - The returned strings must be freed with `blockpage_free_result`.
#[no_mangle]
pub unsafe extern "C" fn blockpage_render_document(
    doc: *const BlockPageDocument,
    config: *const BlockPageConfig,
) -> BlockPageResult {
    if doc.is_null() {
        return BlockPageResult::err("Null document pointer".to_string());
    }

    match render(&(*doc).inner, &html_config(config)) {
        Ok(html) => BlockPageResult::ok(html),
        Err(e) => BlockPageResult::err(e.to_string()),
    }
}

/// Parse and render page JSON in one step.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - `config` must be null or a valid pointer to `BlockPageConfig`.
/// - The returned strings must be freed with `blockpage_free_result`.
#[no_mangle]
pub unsafe extern "C" fn blockpage_render_json(
    input: *const c_char,
    config: *const BlockPageConfig,
) -> BlockPageResult {
    if input.is_null() {
        return BlockPageResult::err("Null input pointer".to_string());
    }
    let Some(input) = c_str(input) else {
        return BlockPageResult::err("Invalid UTF-8 input".to_string());
    };

    match crate::render(input, Some(&html_config(config))) {
        Ok(html) => BlockPageResult::ok(html),
        Err(e) => BlockPageResult::err(e.to_string()),
    }
}

/// Look up `<root>/<owner>/<slug>.json` and render it, or render the
/// not-found page with `found` set to 0.
///
/// # Safety
///
/// - `root`, `owner` and `slug` must be valid null-terminated UTF-8 strings.
/// - `config` must be null or a valid pointer to `BlockPageConfig`.
/// - The returned strings must be freed with `blockpage_free_result`.
#[no_mangle]
pub unsafe extern "C" fn blockpage_render_from_directory(
    root: *const c_char,
    owner: *const c_char,
    slug: *const c_char,
    config: *const BlockPageConfig,
) -> BlockPageResult {
    let (Some(root), Some(owner), Some(slug)) = (c_str(root), c_str(owner), c_str(slug)) else {
        return BlockPageResult::err("Null or invalid string argument".to_string());
    };
    let config = html_config(config);

    match DirectorySource::new(root).fetch(owner, slug) {
        Ok(doc) => match render(&doc, &config) {
            Ok(html) => BlockPageResult::ok(html),
            Err(e) => BlockPageResult::err(e.to_string()),
        },
        Err(lookup) => {
            log::warn!("serving not-found page: {}", lookup);
            let not_found = crate::site::NotFound::from_error(&lookup);
            match render_not_found(&not_found, &config) {
                Ok(html) => BlockPageResult::not_found(html),
                Err(e) => BlockPageResult::err(e.to_string()),
            }
        }
    }
}

/// Free a string returned by blockpage functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by a blockpage function, or null.
#[no_mangle]
pub unsafe extern "C" fn blockpage_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Free a document handle.
///
/// # Safety
///
/// - `doc` must be a pointer returned by `blockpage_parse`, or null.
#[no_mangle]
pub unsafe extern "C" fn blockpage_free_document(doc: *mut BlockPageDocument) {
    if !doc.is_null() {
        drop(Box::from_raw(doc));
    }
}

/// Free a result struct.
///
/// # Safety
///
/// - `result` must be a valid BlockPageResult.
#[no_mangle]
pub unsafe extern "C" fn blockpage_free_result(result: BlockPageResult) {
    blockpage_free_string(result.data);
    blockpage_free_string(result.error);
}

/// Get the library version.
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn blockpage_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
