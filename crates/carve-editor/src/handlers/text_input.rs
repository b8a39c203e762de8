//! Text input handler

use crate::{EditorController, EditorError, EditorResult, HandlerResponse, Key, KeyEvent};

const NO_BREAK_SPACE: char = '\u{00A0}';

/// Characters typed straight into the document
pub fn is_supported_input_character(c: char) -> bool {
    c.is_ascii_alphanumeric() || ".,!@#$%^&*={};'\"+-?_()/\\ :<>".contains(c)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextInputHandler;

impl TextInputHandler {
    pub fn is_handler_for(&self, event: &KeyEvent, controller: &EditorController) -> bool {
        let Key::Char(c) = event.key else {
            return false;
        };
        event.is_key_down()
            && !event.ctrl
            && !event.alt
            && is_supported_input_character(c)
            && controller.current_selection_is_a_cursor()
    }

    pub fn handle_event(
        &self,
        event: &KeyEvent,
        controller: &mut EditorController,
    ) -> EditorResult<HandlerResponse> {
        if let Key::Char(c) = event.key {
            self.insert_character(c, controller)?;
        }
        Ok(HandlerResponse::handled())
    }

    /// Insert `input` at the caret and move the caret behind it
    pub fn insert_character(&self, input: char, controller: &mut EditorController) -> EditorResult<()> {
        let position = controller.current_position().ok_or(EditorError::NoCursor)?;
        let root = controller.rich_tree().root();
        let id = controller.find_suitable_node_in_rich_node(root, position)?;
        let node = controller.rich_tree()[id].dom_node;
        let relative = position.saturating_sub(controller.rich_tree()[id].start);

        let input = if input == ' ' { NO_BREAK_SPACE } else { input };
        let mut chars: Vec<char> = controller.tree().text(node).unwrap_or_default().chars().collect();
        let relative = relative.min(chars.len());
        chars.insert(relative, input);
        if relative > 0 && input != NO_BREAK_SPACE && chars[relative - 1] == NO_BREAK_SPACE {
            chars[relative - 1] = ' ';
        }

        controller
            .document_mut()
            .set_text(node, chars.into_iter().collect::<String>())?;
        controller.update_rich_node();
        controller.set_current_position(position + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn controller_at(html: &str, position: usize) -> EditorController {
        let mut controller = EditorController::from_html(html, Config::default()).unwrap();
        controller.set_current_position(position).unwrap();
        controller
    }

    #[test]
    fn test_supported_characters() {
        assert!(is_supported_input_character('a'));
        assert!(is_supported_input_character('7'));
        assert!(is_supported_input_character(' '));
        assert!(is_supported_input_character('<'));
        assert!(!is_supported_input_character('é'));
        assert!(!is_supported_input_character('\n'));
    }

    #[test]
    fn test_insert_in_the_middle() {
        let mut controller = controller_at("<b>cat</b>", 1);
        TextInputHandler.insert_character('h', &mut controller).unwrap();
        assert_eq!(controller.inner_html(), "<b>chat</b>");
        assert_eq!(controller.current_position(), Some(2));
    }

    #[test]
    fn test_space_becomes_no_break_space_until_followed() {
        let mut controller = controller_at("ab", 2);
        TextInputHandler.insert_character(' ', &mut controller).unwrap();
        assert_eq!(controller.text_content(), "ab\u{00A0}");
        TextInputHandler.insert_character('c', &mut controller).unwrap();
        assert_eq!(controller.text_content(), "ab c");
        assert_eq!(controller.current_position(), Some(4));
    }

    #[test]
    fn test_is_handler_for() {
        let controller = controller_at("ab", 0);
        let handler = TextInputHandler;
        assert!(handler.is_handler_for(&KeyEvent::key_down(Key::Char('x')), &controller));
        assert!(!handler.is_handler_for(&KeyEvent::key_down(Key::Char('x')).with_ctrl(), &controller));
        assert!(!handler.is_handler_for(&KeyEvent::key_down(Key::Enter), &controller));
    }
}
