//! WASM bindings for creative-pack.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.

use crate::text::{json, HexMode, LegacySerializer};
use crate::{AssetCategory, FormatRangeTable, PackSource, PackValidator, ResourceKey};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

/// Parse a resource key and return its canonical `namespace:path` form.
#[wasm_bindgen]
pub fn parse_key(raw: &str) -> Result<String, JsError> {
    ResourceKey::parse(raw)
        .map(|key| key.to_string())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Legacy text options.
#[wasm_bindgen]
#[derive(Default)]
pub struct TextOptions {
    ampersand: bool,
    hex: bool,
    strict: bool,
}

#[wasm_bindgen]
impl TextOptions {
    #[wasm_bindgen(constructor)]
    pub fn new() -> TextOptions {
        TextOptions::default()
    }

    #[wasm_bindgen(setter)]
    pub fn set_ampersand(&mut self, value: bool) {
        self.ampersand = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_hex(&mut self, value: bool) {
        self.hex = value;
    }

    #[wasm_bindgen(setter)]
    pub fn set_strict(&mut self, value: bool) {
        self.strict = value;
    }
}

impl TextOptions {
    fn serializer(&self) -> LegacySerializer {
        let base = if self.ampersand {
            LegacySerializer::ampersand()
        } else {
            LegacySerializer::section()
        };
        let hex_mode = if self.hex { HexMode::Bungee } else { HexMode::Downsample };
        base.with_hex_mode(hex_mode).strict(self.strict)
    }
}

/// Convert a JSON text component to legacy text.
#[wasm_bindgen]
pub fn json_to_legacy(component: &str, options: Option<TextOptions>) -> Result<String, JsError> {
    let options = options.unwrap_or_default();
    let component = json::from_json_str(component).map_err(|e| JsError::new(&e.to_string()))?;
    options
        .serializer()
        .serialize(&component)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Convert legacy text to a JSON text component.
#[wasm_bindgen]
pub fn legacy_to_json(text: &str, options: Option<TextOptions>) -> String {
    let options = options.unwrap_or_default();
    let component = options.serializer().deserialize(text);
    json::to_json_string(&component)
}

/// A resource pack loaded from ZIP bytes.
#[wasm_bindgen]
pub struct PackHandle {
    inner: PackSource,
}

#[wasm_bindgen]
impl PackHandle {
    /// Load a resource pack from a ZIP file's bytes.
    #[wasm_bindgen(constructor)]
    pub fn new(data: &[u8]) -> Result<PackHandle, JsError> {
        let pack = crate::load_resource_pack_from_bytes(data)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(PackHandle { inner: pack })
    }

    /// `pack_format` from `pack.mcmeta`, if the pack has one.
    #[wasm_bindgen(getter)]
    pub fn pack_format(&self) -> Option<i32> {
        self.inner.meta().map(|meta| meta.format)
    }

    /// Pack description as legacy text.
    #[wasm_bindgen(getter)]
    pub fn description(&self) -> Option<String> {
        let meta = self.inner.meta()?;
        LegacySerializer::section().serialize(&meta.description).ok()
    }

    #[wasm_bindgen(getter)]
    pub fn asset_count(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn texture_count(&self) -> usize {
        self.inner.count(AssetCategory::Texture)
    }

    #[wasm_bindgen(getter)]
    pub fn model_count(&self) -> usize {
        self.inner.count(AssetCategory::Model)
    }

    #[wasm_bindgen(getter)]
    pub fn sound_count(&self) -> usize {
        self.inner.count(AssetCategory::Sound)
    }

    #[wasm_bindgen(getter)]
    pub fn lang_count(&self) -> usize {
        self.inner.count(AssetCategory::Lang)
    }

    /// Validate against `target` using a JSON format table and return the issues as messages.
    pub fn validate(&self, target: &str, formats: &str) -> Result<Vec<String>, JsError> {
        let table = FormatRangeTable::from_json_bytes(formats.as_bytes())
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(self.issues(table, target))
    }

    /// Validate against the built-in snapshot of vanilla releases.
    pub fn validate_vanilla(&self, target: &str) -> Vec<String> {
        self.issues(FormatRangeTable::vanilla(), target)
    }
}

impl PackHandle {
    fn issues(&self, table: FormatRangeTable, target: &str) -> Vec<String> {
        PackValidator::new(table)
            .validate_source(&self.inner, target)
            .issues()
            .iter()
            .map(|issue| issue.to_string())
            .collect()
    }
}
