use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn workspace_xml_to_python(source: &str) -> Result<String, JsValue> {
    crate::generate_from_xml(source).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn workspace_json_to_python(source: &str) -> Result<String, JsValue> {
    crate::generate_from_json(source).map_err(|e| JsValue::from_str(&e.to_string()))
}
