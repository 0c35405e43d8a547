use st_core::{
    CapabilityFlags, HeaderBounds, HeaderCommand, HeaderEditor, HeaderElement, HeaderState, HistoryConfig,
    KeyValueStore, LayoutTemplate, MemoryStore, UndoRedo, HEADER_STATE_KEY,
};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn defaults_match_documented_values() {
    let state = HeaderState::default();
    assert_eq!(state.header_height, 100);
    assert_eq!(state.selected_layout, "Option 1");
    assert_eq!(state.bg_color, "bg-black");
    assert!(!state.elements.is_button && !state.elements.is_social);
    assert!(!state.elements.is_cart && !state.elements.is_account);
}

#[test]
fn partial_json_falls_back_per_field() {
    let state: HeaderState = serde_json::from_str(r#"{"headerHeight":150,"elements":{"isCart":true}}"#).unwrap();
    assert_eq!(state.header_height, 150);
    assert!(state.elements.is_cart);
    assert!(!state.elements.is_button);
    assert_eq!(state.selected_layout, "Option 1");
    assert_eq!(state.bg_color, "bg-black");
}

#[test]
fn serialized_layout_uses_camel_case() {
    let json = serde_json::to_value(HeaderState::default()).unwrap();
    assert_eq!(json["headerHeight"], 100);
    assert_eq!(json["selectedLayout"], "Option 1");
    assert_eq!(json["bgColor"], "bg-black");
    assert_eq!(json["elements"]["isAccount"], false);
}

#[test]
fn display_height_is_clamped() {
    let bounds = HeaderBounds::default();
    let mut state = HeaderState::default();
    state.header_height = 450;
    assert_eq!(state.display_height(bounds), 200);
    state.header_height = 20;
    assert_eq!(state.display_height(bounds), 100);
}

#[test]
fn unknown_layout_falls_back() {
    let mut state = HeaderState::default();
    state.selected_layout = "Option 3".into();
    assert_eq!(state.layout(), LayoutTemplate::Option3);
    state.selected_layout = "Mystery".into();
    assert_eq!(state.layout(), LayoutTemplate::Option1);
}

#[test]
fn edits_are_undoable() {
    let mut editor = HeaderEditor::default();
    editor.toggle_element(HeaderElement::Cart);
    editor.set_height(160);
    editor.set_layout("Option 2");
    assert!(editor.state().elements.is_cart);

    assert!(UndoRedo::undo(&mut editor));
    assert_eq!(editor.state().selected_layout, "Option 1");
    assert!(UndoRedo::undo(&mut editor));
    assert_eq!(editor.state().header_height, 100);
    assert!(UndoRedo::redo(&mut editor));
    assert_eq!(editor.state().header_height, 160);
    assert!(editor.can_undo() && editor.can_redo());
}

#[test]
fn set_height_clamps_programmatic_values() {
    let mut editor = HeaderEditor::default();
    editor.set_height(999);
    assert_eq!(editor.state().header_height, 200);
    assert!(!editor.set_height(250));
    assert_eq!(editor.history().past().len(), 1);
}

#[test]
fn redundant_edits_do_not_add_history() {
    let mut editor = HeaderEditor::default();
    assert!(!editor.set_bg_color("bg-black"));
    assert!(!editor.set_element(HeaderElement::Social, false));
    assert!(!editor.can_undo());
}

#[test]
fn execute_dispatches_commands() {
    let mut editor = HeaderEditor::default();
    assert!(editor.execute(HeaderCommand::SetBgColor("bg-white".into())));
    assert!(editor.execute(HeaderCommand::ToggleElement(HeaderElement::Account)));
    assert!(editor.execute(HeaderCommand::Undo));
    assert!(!editor.state().elements.is_account);
    assert!(editor.execute(HeaderCommand::Redo));
    assert!(editor.state().elements.is_account);
    assert!(!editor.execute(HeaderCommand::Redo));
}

#[test]
fn change_listener_replaces_polling() {
    let flags = Rc::new(RefCell::new(CapabilityFlags::default()));
    let sink = flags.clone();
    let mut editor = HeaderEditor::default();
    editor.subscribe(Box::new(move |f| *sink.borrow_mut() = f));

    editor.set_height(120);
    assert_eq!(*flags.borrow(), CapabilityFlags { can_undo: true, can_redo: false });
    UndoRedo::undo(&mut editor);
    assert_eq!(*flags.borrow(), CapabilityFlags { can_undo: false, can_redo: true });
}

#[test]
fn save_and_reload_through_store() {
    let mut editor = HeaderEditor::with_store(Box::new(MemoryStore::new()));
    editor.set_height(180);
    editor.set_bg_color("bg-blue");
    assert!(editor.is_dirty());
    let saved = editor.save().clone();
    assert!(!editor.is_dirty());

    editor.set_height(120);
    editor.load();
    assert_eq!(editor.state(), &saved);
    assert!(!editor.can_undo());
}

#[test]
fn malformed_saved_state_uses_defaults() {
    let mut store = MemoryStore::new();
    store.set(HEADER_STATE_KEY, "{not json").unwrap();
    let editor = HeaderEditor::with_store(Box::new(store));
    assert_eq!(editor.state(), &HeaderState::default());
}

#[test]
fn saved_state_is_restored_on_construction() {
    let mut store = MemoryStore::new();
    store
        .set(HEADER_STATE_KEY, r#"{"elements":{"isButton":true},"headerHeight":140,"selectedLayout":"Option 4","bgColor":"bg-white"}"#)
        .unwrap();
    let editor = HeaderEditor::with_store(Box::new(store));
    assert!(editor.state().elements.is_button);
    assert_eq!(editor.state().header_height, 140);
    assert_eq!(editor.state().layout(), LayoutTemplate::Option4);
}

#[test]
fn parent_sync_defers_to_local_edits() {
    let mut editor = HeaderEditor::default();
    assert!(editor.sync_from_parent("Option 2", "bg-white"));
    assert_eq!(editor.state().selected_layout, "Option 2");
    assert!(!editor.is_dirty());

    editor.set_layout("Option 3");
    assert!(!editor.sync_from_parent("Option 4", "bg-red"));
    assert_eq!(editor.state().selected_layout, "Option 3");
    assert_eq!(editor.state().bg_color, "bg-white");

    editor.save();
    assert!(editor.sync_from_parent("Option 4", "bg-red"));
    assert_eq!(editor.state().selected_layout, "Option 4");
}

#[test]
fn reconfiguring_keeps_listeners_and_entries() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let sink = calls.clone();
    let mut editor = HeaderEditor::default();
    editor.subscribe(Box::new(move |f| sink.borrow_mut().push(f)));
    editor.set_height(120);

    let bounds = HeaderBounds { min_height: 100, max_height: 300 };
    let mut editor = editor.with_config(bounds, HistoryConfig { max_depth: Some(10) });
    assert!(editor.can_undo());
    assert_eq!(editor.bounds().max_height, 300);

    editor.set_height(250);
    assert_eq!(editor.state().header_height, 250);
    assert_eq!(calls.borrow().len(), 2);
    assert_eq!(calls.borrow()[1], CapabilityFlags { can_undo: true, can_redo: false });
}
