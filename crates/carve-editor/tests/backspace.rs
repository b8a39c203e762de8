//! Backspace behaviour end to end
//!
//! Drives the backspace state machine through the editor facade and through
//! a bare handler with custom plugins.

use std::cell::Cell;
use std::rc::Rc;

use carve_dom::NodeId;
use carve_editor::handlers::{BackspaceHandler, BackspaceOutcome, BackspacePlugin};
use carve_editor::plugins::lump_node::FLAGGED_REMOVE;
use carve_editor::{
    Config, Editor, EditorController, Key, KeyEvent, Manipulation, ManipulationGuidance,
};

const LUMP_NODE: &str =
    r#"<div property="http://lblod.data.gift/vocabularies/editor/isLumpNode">bar</div>"#;

fn editor(html: &str) -> Editor {
    Editor::from_html(html, Config::default()).unwrap()
}

fn press_backspace(editor: &mut Editor) {
    smol::block_on(editor.handle_event(&KeyEvent::key_down(Key::Backspace))).unwrap();
}

fn root_child(controller: &EditorController, index: usize) -> NodeId {
    controller
        .tree()
        .child_at(controller.root_node(), index)
        .unwrap()
}

struct VetoPlugin;

impl BackspacePlugin for VetoPlugin {
    fn label(&self) -> &str {
        "veto everything"
    }

    fn guidance_for_manipulation(
        &self,
        _manipulation: &Manipulation,
        _controller: &EditorController,
    ) -> Option<ManipulationGuidance> {
        Some(ManipulationGuidance::deny())
    }
}

/// Claims every character removal and does nothing
struct InertPlugin {
    calls: Rc<Cell<usize>>,
}

impl BackspacePlugin for InertPlugin {
    fn label(&self) -> &str {
        "inert"
    }

    fn guidance_for_manipulation(
        &self,
        manipulation: &Manipulation,
        _controller: &EditorController,
    ) -> Option<ManipulationGuidance> {
        if !matches!(manipulation, Manipulation::RemoveCharacter { .. }) {
            return None;
        }
        let calls = Rc::clone(&self.calls);
        Some(ManipulationGuidance::execute_with(move |_, _| {
            calls.set(calls.get() + 1);
            Ok(())
        }))
    }
}

// ============================================================================
// CHARACTERS
// ============================================================================

#[test]
fn test_single_character_deletion() {
    let mut editor = editor("Capybaras");
    editor.controller_mut().set_current_position(9).unwrap();
    press_backspace(&mut editor);
    assert_eq!(editor.controller().inner_html(), "Capybara");
    assert_eq!(editor.controller().current_position(), Some(8));
}

#[test]
fn test_repeated_deletion_across_elements() {
    let mut editor = editor("ab<b>cd</b>");
    editor.controller_mut().set_current_position(4).unwrap();
    for _ in 0..3 {
        press_backspace(&mut editor);
    }
    assert_eq!(editor.controller().text_content().replace('\u{200B}', ""), "a");
    assert_eq!(editor.controller().current_position(), Some(1));
}

#[test]
fn test_at_editor_start_nothing_happens() {
    let mut controller = EditorController::from_html("abc", Config::default()).unwrap();
    controller.set_current_position(0).unwrap();
    let handler = BackspaceHandler::new(&Config::default());
    let outcome = smol::block_on(handler.backspace(&mut controller)).unwrap();
    assert_eq!(outcome, BackspaceOutcome::AtEditorStart);
    assert_eq!(controller.inner_html(), "abc");
}

// ============================================================================
// ELEMENTS
// ============================================================================

#[test]
fn test_empty_element_removal() {
    let mut editor = editor("baz <span></span>foo");
    let foo = root_child(editor.controller(), 2);
    editor.controller_mut().set_caret(foo, 0).unwrap();
    press_backspace(&mut editor);
    assert_eq!(editor.controller().inner_html(), "baz foo");
    assert_eq!(editor.controller().current_position(), Some(4));
}

#[test]
fn test_void_element_removal() {
    let mut editor = editor("ab<img>cd");
    let cd = root_child(editor.controller(), 2);
    editor.controller_mut().set_caret(cd, 0).unwrap();
    press_backspace(&mut editor);
    assert_eq!(editor.controller().inner_html(), "abcd");
    assert_eq!(editor.controller().current_position(), Some(2));
}

#[test]
fn test_invisible_leftovers_go_with_next_character() {
    let mut editor = editor("x<b>y</b>");
    editor.controller_mut().set_current_position(2).unwrap();
    press_backspace(&mut editor);
    assert_eq!(editor.controller().inner_html(), "x<b>\u{200B}</b>");
    assert_eq!(editor.controller().current_position(), Some(1));

    // the emptied bold element is invisible, so the same keystroke also takes the x
    let mut controller = EditorController::from_html("x<b>\u{200B}</b>", Config::default()).unwrap();
    controller.set_current_position(1).unwrap();
    let bold = root_child(&controller, 1);
    let placeholder = controller.tree().first_child(bold).unwrap();
    controller.set_caret(placeholder, 0).unwrap();
    let handler = BackspaceHandler::new(&Config::default());
    let outcome = smol::block_on(handler.backspace(&mut controller)).unwrap();
    assert_eq!(outcome, BackspaceOutcome::Changed { attempts: 2 });
    assert_eq!(controller.inner_html(), "\u{200B}");
}

// ============================================================================
// PLUGINS
// ============================================================================

#[test]
fn test_plugin_veto_blocks_default_execution() {
    let mut controller = EditorController::from_html("Capybaras", Config::default()).unwrap();
    controller.set_current_position(9).unwrap();
    let mut handler = BackspaceHandler::without_plugins(&Config::default());
    handler.register_plugin(VetoPlugin);

    let outcome = smol::block_on(handler.backspace(&mut controller)).unwrap();
    assert_eq!(outcome, BackspaceOutcome::Vetoed);
    assert_eq!(controller.inner_html(), "Capybaras");
    assert_eq!(controller.current_position(), Some(9));
}

#[test]
fn test_retry_bound_terminates() {
    let config = Config {
        max_backspace_retries: 7,
        ..Config::default()
    };
    let mut controller = EditorController::from_html("Capybaras", config.clone()).unwrap();
    controller.set_current_position(9).unwrap();
    let calls = Rc::new(Cell::new(0));
    let mut handler = BackspaceHandler::without_plugins(&config);
    handler.register_plugin(InertPlugin {
        calls: Rc::clone(&calls),
    });

    let outcome = smol::block_on(handler.backspace(&mut controller)).unwrap();
    assert_eq!(outcome, BackspaceOutcome::RetriesExhausted);
    assert_eq!(calls.get(), 7);
    assert_eq!(controller.inner_html(), "Capybaras");
}

#[test]
fn test_conflicting_plugins_fail_the_keystroke() {
    let mut controller = EditorController::from_html("Capybaras", Config::default()).unwrap();
    controller.set_current_position(9).unwrap();
    let mut handler = BackspaceHandler::without_plugins(&Config::default());
    for _ in 0..2 {
        handler.register_plugin(InertPlugin {
            calls: Rc::new(Cell::new(0)),
        });
    }
    let result = smol::block_on(handler.backspace(&mut controller));
    assert!(matches!(
        result,
        Err(carve_editor::EditorError::ManipulationConflict { .. })
    ));
    assert_eq!(controller.inner_html(), "Capybaras");
}

// ============================================================================
// LUMP NODES
// ============================================================================

#[test]
fn test_lump_node_two_step_removal() {
    let mut editor = editor(&format!("baz {LUMP_NODE}foo"));
    let lump = root_child(editor.controller(), 1);
    let foo = root_child(editor.controller(), 2);
    editor.controller_mut().set_caret(foo, 0).unwrap();

    press_backspace(&mut editor);
    assert_eq!(editor.controller().text_content(), "baz barfoo");
    assert_eq!(
        editor.controller().tree().get_attr(lump, FLAGGED_REMOVE),
        Some("complete")
    );

    press_backspace(&mut editor);
    assert_eq!(editor.controller().inner_html(), "baz foo");
    assert_eq!(editor.controller().current_position(), Some(4));
}

// ============================================================================
// RDFA
// ============================================================================

#[test]
fn test_annotated_element_is_removed_in_steps() {
    let mut editor = editor(r#"x<span property="http://example.org/name">ab</span>"#);
    let span = root_child(editor.controller(), 1);
    editor.controller_mut().set_current_position(3).unwrap();

    press_backspace(&mut editor);
    let tree = editor.controller().tree();
    assert_eq!(tree.get_attr(span, FLAGGED_REMOVE), Some("almost-complete"));
    assert_eq!(editor.controller().text_content(), "xa");

    press_backspace(&mut editor);
    assert_eq!(
        editor.controller().tree().get_attr(span, FLAGGED_REMOVE),
        Some("complete")
    );
    assert_eq!(editor.controller().text_content(), "x\u{200B}");

    press_backspace(&mut editor);
    assert_eq!(editor.controller().inner_html(), "x");
    assert_eq!(editor.controller().current_position(), Some(1));
}
