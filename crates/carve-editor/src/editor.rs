//! Editor facade
//!
//! Bundles a controller with the keystroke handlers. Events go to the tab,
//! backspace and text input handlers in that order; the first one that
//! claims an event handles it.

use crate::handlers::{BackspaceHandler, TabHandler, TextInputHandler};
use crate::observers::LumpNodeMovementObserver;
use crate::{ChangeSource, Config, EditorController, EditorResult, HandlerResponse, KeyEvent};

pub struct Editor {
    controller: EditorController,
    backspace: BackspaceHandler,
    tab: TabHandler,
    text_input: TextInputHandler,
}

impl Editor {
    pub fn new(mut controller: EditorController, config: &Config) -> Self {
        controller.register_movement_observer(LumpNodeMovementObserver);
        Self {
            controller,
            backspace: BackspaceHandler::new(config),
            tab: TabHandler::default(),
            text_input: TextInputHandler,
        }
    }

    /// Editor over a fresh document holding `html`
    pub fn from_html(html: &str, config: Config) -> EditorResult<Self> {
        let controller = EditorController::from_html(html, config.clone())?;
        Ok(Self::new(controller, &config))
    }

    pub fn controller(&self) -> &EditorController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut EditorController {
        &mut self.controller
    }

    pub fn backspace_handler_mut(&mut self) -> &mut BackspaceHandler {
        &mut self.backspace
    }

    pub fn tab_handler_mut(&mut self) -> &mut TabHandler {
        &mut self.tab
    }

    /// Dispatch a key event to the first handler that claims it.
    ///
    /// Errors are logged before they are returned.
    pub async fn handle_event(&mut self, event: &KeyEvent) -> EditorResult<HandlerResponse> {
        let result = self.dispatch(event).await;
        if let Err(err) = &result {
            tracing::error!("Handling {:?} failed: {}", event.key, err);
        }
        result
    }

    async fn dispatch(&mut self, event: &KeyEvent) -> EditorResult<HandlerResponse> {
        if self.tab.is_handler_for(event, &self.controller) {
            return self.tab.handle_event(event, &mut self.controller);
        }
        if self.backspace.is_handler_for(event, &self.controller) {
            self.controller.create_snapshot();
            let response = self.backspace.handle_event(&mut self.controller).await?;
            self.controller.generate_diff_events(ChangeSource::Backspace);
            return Ok(response);
        }
        if self.text_input.is_handler_for(event, &self.controller) {
            self.controller.create_snapshot();
            let response = self.text_input.handle_event(event, &mut self.controller)?;
            self.controller.generate_diff_events(ChangeSource::TextInput);
            return Ok(response);
        }
        tracing::trace!("No handler for {:?}", event.key);
        Ok(HandlerResponse::propagate())
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("controller", &self.controller)
            .field("backspace_plugins", &self.backspace.plugin_labels())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EditorError, Key};

    #[test]
    fn test_unhandled_keys_propagate() {
        let mut editor = Editor::from_html("abc", Config::default()).unwrap();
        let response =
            smol::block_on(editor.handle_event(&KeyEvent::key_down(Key::Named("ArrowLeft".into()))))
                .unwrap();
        assert_eq!(response, HandlerResponse::propagate());
        assert!(editor.controller().history().is_empty());
    }

    #[test]
    fn test_conflict_reaches_the_caller() {
        use crate::handlers::BackspacePlugin;
        use crate::{Manipulation, ManipulationGuidance};

        struct Claim;

        impl BackspacePlugin for Claim {
            fn label(&self) -> &str {
                "claim"
            }

            fn guidance_for_manipulation(
                &self,
                _manipulation: &Manipulation,
                _controller: &EditorController,
            ) -> Option<ManipulationGuidance> {
                Some(ManipulationGuidance::execute_with(|_, _| Ok(())))
            }
        }

        let mut editor = Editor::from_html("ab", Config::default()).unwrap();
        editor.controller_mut().set_current_position(2).unwrap();
        editor.backspace_handler_mut().register_plugin(Claim);
        editor.backspace_handler_mut().register_plugin(Claim);
        let result = smol::block_on(editor.handle_event(&KeyEvent::key_down(Key::Backspace)));
        assert!(matches!(result, Err(EditorError::ManipulationConflict { .. })));
        assert_eq!(editor.controller().inner_html(), "ab");
    }

    #[test]
    fn test_typing_snapshots_history() {
        let mut editor = Editor::from_html("ab", Config::default()).unwrap();
        editor.controller_mut().set_current_position(2).unwrap();
        let response = smol::block_on(editor.handle_event(&KeyEvent::key_down(Key::Char('c')))).unwrap();
        assert_eq!(response, HandlerResponse::handled());
        assert_eq!(editor.controller().inner_html(), "abc");
        assert_eq!(editor.controller().history().len(), 1);
    }
}
