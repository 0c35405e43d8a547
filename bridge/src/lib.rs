use serde::Serialize;
use st_core::{
    BlockId, BlockList, ContentType, HeaderEditor, HeaderElement, Key, KeyInput, KeyOutcome, KeyValueStore,
    PersistError, UndoRedo,
};
use st_engine::{GridConfig, GridEngine, HeightCache};
use wasm_bindgen::prelude::*;

pub mod logging;

/// `window.localStorage` as a key-value store.
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage.get_item(key).map_err(backend_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage.set_item(key, value).map_err(backend_error)
    }
}

fn backend_error(err: JsValue) -> PersistError {
    PersistError::Backend(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("serialization failed: {}", e)))
}

fn parse_element(name: &str) -> Result<HeaderElement, JsValue> {
    match name {
        "button" | "isButton" => Ok(HeaderElement::Button),
        "social" | "isSocial" => Ok(HeaderElement::Social),
        "cart" | "isCart" => Ok(HeaderElement::Cart),
        "account" | "isAccount" => Ok(HeaderElement::Account),
        other => Err(JsValue::from_str(&format!("unknown header element: {}", other))),
    }
}

fn parse_content_type(name: &str) -> Result<ContentType, JsValue> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| JsValue::from_str(&format!("unknown content type: {}", name)))
}

fn parse_key(name: &str) -> Key {
    match name {
        "Enter" => Key::Enter,
        "Backspace" => Key::Backspace,
        _ => Key::Other,
    }
}

/// Header editor handle passed to the page instead of a window global.
#[wasm_bindgen]
pub struct HeaderEditorHandle {
    editor: HeaderEditor,
}

#[wasm_bindgen]
impl HeaderEditorHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        logging::init_logging();
        let editor = match LocalStorage::open() {
            Some(store) => HeaderEditor::with_store(Box::new(store)),
            None => {
                tracing::warn!("localStorage unavailable, header state will not persist");
                HeaderEditor::default()
            }
        };
        Self { editor }
    }

    #[wasm_bindgen(js_name = toggleElement)]
    pub fn toggle_element(&mut self, element: &str) -> Result<bool, JsValue> {
        Ok(self.editor.toggle_element(parse_element(element)?))
    }

    #[wasm_bindgen(js_name = setHeight)]
    pub fn set_height(&mut self, height: i32) -> bool {
        self.editor.set_height(height)
    }

    #[wasm_bindgen(js_name = displayHeight)]
    pub fn display_height(&self) -> i32 {
        self.editor.state().display_height(self.editor.bounds())
    }

    #[wasm_bindgen(js_name = setLayout)]
    pub fn set_layout(&mut self, layout: &str) -> bool {
        self.editor.set_layout(layout)
    }

    #[wasm_bindgen(js_name = setBgColor)]
    pub fn set_bg_color(&mut self, color: &str) -> bool {
        self.editor.set_bg_color(color)
    }

    #[wasm_bindgen(js_name = undo)]
    pub fn undo(&mut self) -> bool {
        UndoRedo::undo(&mut self.editor)
    }

    #[wasm_bindgen(js_name = redo)]
    pub fn redo(&mut self) -> bool {
        UndoRedo::redo(&mut self.editor)
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    #[wasm_bindgen(js_name = state)]
    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(self.editor.state())
    }

    #[wasm_bindgen(js_name = isDirty)]
    pub fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    /// Persists and returns the state for the parent to adopt.
    #[wasm_bindgen(js_name = save)]
    pub fn save(&mut self) -> Result<JsValue, JsValue> {
        to_js(self.editor.save())
    }

    #[wasm_bindgen(js_name = syncFromParent)]
    pub fn sync_from_parent(&mut self, layout: &str, bg_color: &str) -> bool {
        self.editor.sync_from_parent(layout, bg_color)
    }

    /// Calls `callback({ canUndo, canRedo })` after every history change.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, callback: js_sys::Function) {
        self.editor.subscribe(Box::new(move |flags| {
            if let Ok(value) = serde_wasm_bindgen::to_value(&flags) {
                if let Err(err) = callback.call1(&JsValue::NULL, &value) {
                    tracing::warn!(error = ?err, "onChange callback threw");
                }
            }
        }));
    }
}

impl Default for HeaderEditorHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentTypeOption {
    content_type: ContentType,
    label: &'static str,
}

/// Notes block board: structural edits plus row-span recompute.
#[wasm_bindgen]
pub struct NoteBoardHandle {
    list: BlockList,
    grid: GridEngine,
    cache: HeightCache,
    config: GridConfig,
}

#[wasm_bindgen]
impl NoteBoardHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        logging::init_logging();
        let mut board = Self {
            list: BlockList::sequential(),
            grid: GridEngine::new(),
            cache: HeightCache::new(),
            config: GridConfig::default(),
        };
        board.refresh();
        board
    }

    #[wasm_bindgen(js_name = blocks)]
    pub fn blocks(&self) -> Result<JsValue, JsValue> {
        to_js(self.list.blocks())
    }

    #[wasm_bindgen(js_name = contentTypes)]
    pub fn content_types(&self) -> Result<JsValue, JsValue> {
        let options: Vec<ContentTypeOption> = ContentType::ALL
            .iter()
            .map(|&content_type| ContentTypeOption { content_type, label: content_type.label() })
            .collect();
        to_js(&options)
    }

    /// Returns the id to focus, or `undefined` when the host should apply
    /// its default key handling.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&mut self, id: &str, key: &str, shift: bool) -> Option<String> {
        let input = KeyInput { key: parse_key(key), shift };
        match self.list.handle_key(&BlockId::from(id), input) {
            KeyOutcome::Focus(next) => {
                self.refresh();
                Some(next.0)
            }
            KeyOutcome::Passthrough => None,
        }
    }

    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, id: &str, text: &str) -> bool {
        let changed = self.list.set_text(&BlockId::from(id), text);
        if changed {
            self.refresh();
        }
        changed
    }

    #[wasm_bindgen(js_name = setContentType)]
    pub fn set_content_type(&mut self, id: &str, content_type: &str) -> Result<bool, JsValue> {
        let changed = self.list.set_content_type(&BlockId::from(id), parse_content_type(content_type)?);
        if changed {
            self.refresh();
        }
        Ok(changed)
    }

    #[wasm_bindgen(js_name = addBlock)]
    pub fn add_block(&mut self, content_type: &str) -> Result<String, JsValue> {
        let id = self.list.add_block(parse_content_type(content_type)?);
        self.refresh();
        Ok(id.0)
    }

    /// Adopts a new container width; returns how many row spans changed.
    #[wasm_bindgen(js_name = relayout)]
    pub fn relayout(&mut self, width: f32) -> usize {
        self.config = GridConfig::for_width(width);
        self.refresh()
    }
}

impl NoteBoardHandle {
    fn refresh(&mut self) -> usize {
        self.grid.relayout(&mut self.list, &self.config, &mut self.cache)
    }
}

impl Default for NoteBoardHandle {
    fn default() -> Self {
        Self::new()
    }
}
