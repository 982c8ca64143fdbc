//! WASM bindings for browser-based LRF viewing.
//!
//! This module exposes the parser and serializers to JavaScript via wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::Document;
use crate::export::{ExportConfig, to_html, to_lrs};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Convert LRF to LRS-XML.
///
/// Takes raw LRF bytes and returns the XML text.
#[wasm_bindgen]
pub fn lrf_to_lrs(data: &[u8]) -> Result<String, JsValue> {
    let doc = Document::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_lrs(&doc, &ExportConfig::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert LRF to a standalone HTML page.
#[wasm_bindgen]
pub fn lrf_to_html(data: &[u8]) -> Result<String, JsValue> {
    let doc = Document::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_html(&doc, &ExportConfig::default()).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Book title from the metadata block, or an empty string.
#[wasm_bindgen]
pub fn lrf_title(data: &[u8]) -> Result<String, JsValue> {
    let doc = Document::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(doc.info().map(|info| info.title.clone()).unwrap_or_default())
}
