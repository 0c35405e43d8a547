use crate::{
    load_json, save_json, ChangeListener, HeaderCommand, History, HistoryConfig, KeyValueStore, UndoRedo,
    HEADER_STATE_KEY,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderElement {
    Button,
    Social,
    Cart,
    Account,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderElements {
    pub is_button: bool,
    pub is_social: bool,
    pub is_cart: bool,
    pub is_account: bool,
}

impl HeaderElements {
    pub fn get(&self, element: HeaderElement) -> bool {
        match element {
            HeaderElement::Button => self.is_button,
            HeaderElement::Social => self.is_social,
            HeaderElement::Cart => self.is_cart,
            HeaderElement::Account => self.is_account,
        }
    }

    pub fn set(&mut self, element: HeaderElement, value: bool) {
        let slot = match element {
            HeaderElement::Button => &mut self.is_button,
            HeaderElement::Social => &mut self.is_social,
            HeaderElement::Cart => &mut self.is_cart,
            HeaderElement::Account => &mut self.is_account,
        };
        *slot = value;
    }

    pub fn toggle(&mut self, element: HeaderElement) {
        let current = self.get(element);
        self.set(element, !current);
    }
}

/// The fixed set of header layout templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutTemplate {
    #[default]
    Option1,
    Option2,
    Option3,
    Option4,
}

impl LayoutTemplate {
    pub const ALL: [LayoutTemplate; 4] =
        [LayoutTemplate::Option1, LayoutTemplate::Option2, LayoutTemplate::Option3, LayoutTemplate::Option4];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutTemplate::Option1 => "Option 1",
            LayoutTemplate::Option2 => "Option 2",
            LayoutTemplate::Option3 => "Option 3",
            LayoutTemplate::Option4 => "Option 4",
        }
    }

    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderBounds {
    pub min_height: i32,
    pub max_height: i32,
}

impl Default for HeaderBounds {
    fn default() -> Self {
        Self { min_height: 100, max_height: 200 }
    }
}

impl HeaderBounds {
    pub fn clamp(&self, height: i32) -> i32 {
        height.clamp(self.min_height, self.max_height)
    }
}

pub const DEFAULT_BG_COLOR: &str = "bg-black";

/// Persisted header configuration. Missing fields decode to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeaderState {
    pub elements: HeaderElements,
    pub header_height: i32,
    pub selected_layout: String,
    pub bg_color: String,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            elements: HeaderElements::default(),
            header_height: HeaderBounds::default().min_height,
            selected_layout: LayoutTemplate::default().as_str().to_string(),
            bg_color: DEFAULT_BG_COLOR.to_string(),
        }
    }
}

impl HeaderState {
    /// Height as rendered; the stored value may sit outside the bounds.
    pub fn display_height(&self, bounds: HeaderBounds) -> i32 {
        bounds.clamp(self.header_height)
    }

    pub fn layout(&self) -> LayoutTemplate {
        LayoutTemplate::parse(&self.selected_layout).unwrap_or_default()
    }
}

/// Header editor session: undoable state plus an optional backing store.
pub struct HeaderEditor {
    history: History<HeaderState>,
    bounds: HeaderBounds,
    store: Option<Box<dyn KeyValueStore>>,
    saved: HeaderState,
}

impl HeaderEditor {
    pub fn new(initial: HeaderState) -> Self {
        Self {
            history: History::new(initial.clone()),
            bounds: HeaderBounds::default(),
            store: None,
            saved: initial,
        }
    }

    /// Builds an editor backed by `store` and loads any saved state.
    pub fn with_store(store: Box<dyn KeyValueStore>) -> Self {
        let mut editor = Self::new(HeaderState::default());
        editor.store = Some(store);
        editor.load();
        editor
    }

    /// Keeps existing entries and subscribers.
    pub fn with_config(mut self, bounds: HeaderBounds, history: HistoryConfig) -> Self {
        self.bounds = bounds;
        self.history.set_config(history);
        self
    }

    pub fn state(&self) -> &HeaderState {
        self.history.present()
    }

    pub fn bounds(&self) -> HeaderBounds {
        self.bounds
    }

    pub fn history(&self) -> &History<HeaderState> {
        &self.history
    }

    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.history.subscribe(listener);
    }

    pub fn execute(&mut self, cmd: HeaderCommand) -> bool {
        match cmd {
            HeaderCommand::ToggleElement(element) => self.toggle_element(element),
            HeaderCommand::SetElement(element, value) => self.set_element(element, value),
            HeaderCommand::SetHeight(height) => self.set_height(height),
            HeaderCommand::SetLayout(layout) => self.set_layout(&layout),
            HeaderCommand::SetBgColor(color) => self.set_bg_color(&color),
            HeaderCommand::Undo => UndoRedo::undo(self),
            HeaderCommand::Redo => UndoRedo::redo(self),
        }
    }

    pub fn toggle_element(&mut self, element: HeaderElement) -> bool {
        self.edit(|s| s.elements.toggle(element))
    }

    pub fn set_element(&mut self, element: HeaderElement, value: bool) -> bool {
        self.edit(|s| s.elements.set(element, value))
    }

    /// Programmatic sets are clamped like slider input.
    pub fn set_height(&mut self, height: i32) -> bool {
        let height = self.bounds.clamp(height);
        self.edit(|s| s.header_height = height)
    }

    pub fn set_layout(&mut self, layout: &str) -> bool {
        self.edit(|s| s.selected_layout = layout.to_string())
    }

    pub fn set_bg_color(&mut self, color: &str) -> bool {
        self.edit(|s| s.bg_color = color.to_string())
    }

    /// True while the present differs from the last saved or loaded state.
    pub fn is_dirty(&self) -> bool {
        *self.history.present() != self.saved
    }

    /// Adopts a parent-owned layout/background selection. Local edits win
    /// while the session is dirty; the parent sees them on `save`.
    pub fn sync_from_parent(&mut self, layout: &str, bg_color: &str) -> bool {
        if self.is_dirty() {
            tracing::debug!(layout, bg_color, "ignoring parent selection during active edit");
            return false;
        }
        let changed = self.edit(|s| {
            s.selected_layout = layout.to_string();
            s.bg_color = bg_color.to_string();
        });
        self.saved = self.history.present().clone();
        changed
    }

    /// Reloads from the backing store, falling back to defaults.
    pub fn load(&mut self) {
        let state = match self.store.as_deref() {
            Some(store) => load_json::<HeaderState>(store, HEADER_STATE_KEY).unwrap_or_default(),
            None => HeaderState::default(),
        };
        self.saved = state.clone();
        self.history.reset(state);
    }

    /// Writes the present state to the store and returns it for the parent.
    pub fn save(&mut self) -> &HeaderState {
        let present = self.history.present().clone();
        if let Some(store) = self.store.as_deref_mut() {
            save_json(store, HEADER_STATE_KEY, &present);
        }
        self.saved = present;
        self.history.present()
    }

    fn edit<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut HeaderState),
    {
        let mut next = self.history.present().clone();
        f(&mut next);
        self.history.push(next)
    }
}

impl UndoRedo for HeaderEditor {
    fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn undo(&mut self) -> bool {
        UndoRedo::undo(&mut self.history)
    }

    fn redo(&mut self) -> bool {
        UndoRedo::redo(&mut self.history)
    }
}

impl Default for HeaderEditor {
    fn default() -> Self {
        Self::new(HeaderState::default())
    }
}
