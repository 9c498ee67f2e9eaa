use wasm_bindgen::prelude::*;

/// Compile a JSON manifest with inline SVG icons to TTF bytes.
#[wasm_bindgen]
pub fn build_font(manifest_json: &str) -> Result<Vec<u8>, JsValue> {
    crate::build_font_json(manifest_json)
        .map(|build| build.ttf)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
