//! Browser entry point
//!
//! The host page owns a `ComingSoonPage` and drives its lifecycle
//! explicitly: construct on load, `destroy()` on `pagehide`.

mod page;
mod renderer;

use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Window};

use crate::core::PageConfig;

use page::PageController;

/// Element holding an optional JSON config override
const CONFIG_ELEMENT_ID: &str = "page-config";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();
}

/// The mounted page. Created by the host script, torn down by it.
#[wasm_bindgen]
pub struct ComingSoonPage {
    controller: Option<PageController>,
}

#[wasm_bindgen]
impl ComingSoonPage {
    /// Mount with defaults, or with `<script id="page-config">` JSON if present
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ComingSoonPage, JsValue> {
        let config = load_page_config(&document()?);
        Self::mount(config)
    }

    /// Mount with an explicit JSON config
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<ComingSoonPage, JsValue> {
        let config = PageConfig::from_json(json).map_err(|e| js_err(&e.to_string()))?;
        Self::mount(config)
    }

    /// Stop animation, clear timers, release GPU resources. Safe to call twice.
    pub fn destroy(&mut self) {
        if let Some(mut controller) = self.controller.take() {
            controller.destroy();
            info!("Page destroyed");
        }
    }

    #[wasm_bindgen(getter, js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.controller.is_some()
    }
}

impl ComingSoonPage {
    fn mount(config: PageConfig) -> Result<ComingSoonPage, JsValue> {
        let controller = PageController::mount(config)?;
        Ok(Self {
            controller: Some(controller),
        })
    }
}

fn load_page_config(document: &Document) -> PageConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return PageConfig::default();
    };

    match PageConfig::from_json(&json) {
        Ok(config) => {
            info!("Loaded page config override");
            config
        }
        Err(e) => {
            warn!(error = %e, "Invalid page config, using defaults");
            PageConfig::default()
        }
    }
}

pub(crate) fn js_err(message: &str) -> JsValue {
    JsValue::from_str(message)
}

pub(crate) fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_err("missing window"))
}

pub(crate) fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| js_err("missing document"))
}

/// Look up an element by id and cast it. Missing or mistyped elements are
/// logged and skipped, never fatal.
pub(crate) fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    let Some(element) = document.get_element_by_id(id) else {
        warn!(id, "Element not found, skipping");
        return None;
    };
    match element.dyn_into::<T>() {
        Ok(el) => Some(el),
        Err(_) => {
            warn!(id, "Element has unexpected type, skipping");
            None
        }
    }
}
