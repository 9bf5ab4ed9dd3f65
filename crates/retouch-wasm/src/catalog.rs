//! Catalog bindings: what a host can offer in its filter and adjustment UI.

use wasm_bindgen::prelude::*;

/// Every filter as `{ name, default_parameter }`, in display order.
///
/// # Example (TypeScript)
///
/// ```typescript
/// for (const { name, default_parameter } of filter_catalog()) {
///   addFilterButton(name, default_parameter);
/// }
/// ```
#[wasm_bindgen]
pub fn filter_catalog() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&retouch_core::catalog())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Display names of every filter, in display order.
#[wasm_bindgen]
pub fn filter_names() -> Vec<String> {
    retouch_core::catalog()
        .into_iter()
        .map(|entry| entry.name)
        .collect()
}

/// Adjustment keys accepted by `JsEditSession.apply_adjustment`, in the
/// order they are applied.
#[wasm_bindgen]
pub fn adjustment_keys() -> Vec<String> {
    retouch_core::adjustment_keys().map(str::to_string).collect()
}
