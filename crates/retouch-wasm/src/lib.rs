//! Retouch WASM - WebAssembly bindings for Retouch
//!
//! This crate exposes the retouch-core editing session to JavaScript/TypeScript
//! applications. Decoding and encoding stay on the host side: pass raw pixels
//! in (for example `ImageData.data` from a canvas) and paint the returned
//! pixels back out.
//!
//! # Module Structure
//!
//! - `session` - The editing session (filters, adjustments, undo, viewport)
//! - `catalog` - Filter catalog and adjustment keys
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, JsImage, filter_catalog } from '@retouch/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new JsEditSession();
//! session.load(new JsImage(width, height, 4, imageData.data));
//! const display = session.apply_adjustment("brightness", 1.2);
//! ```

use wasm_bindgen::prelude::*;

mod catalog;
mod session;
mod types;

// Re-export public types
pub use catalog::{adjustment_keys, filter_catalog, filter_names};
pub use session::JsEditSession;
pub use types::JsImage;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
