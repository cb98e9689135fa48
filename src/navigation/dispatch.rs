use super::{Action, FocusState, KeyEvent, NavigationEvent, Navigator};
use crate::ast::Location;
use crate::error::NavigationError;

impl Navigator {
    /// Translates a key press into an action and runs it. Returns whether
    /// anything handled it.
    ///
    /// While the cursor is on a field, the field handler gets first refusal.
    pub fn on_key_press(&mut self, event: &KeyEvent) -> bool {
        let Some(action) = self.key_map.action_for(event) else {
            tracing::trace!(key = %event, "unbound key");
            return false;
        };
        if self.keyboard_accessibility && self.focus == FocusState::Workspace {
            if let Some(Location::Field(field)) = self.cursor.location() {
                if self
                    .field_handler
                    .on_action(&mut self.workspace, field, action)
                {
                    return true;
                }
            }
        }
        self.on_action(action)
    }

    /// Routes an action to the handler table of the focused context.
    ///
    /// An action the context does not know is reported as unhandled, never
    /// as an error. With keyboard accessibility off, only the toggle is
    /// honoured; read-only editors only honour movement.
    pub fn on_action(&mut self, action: Action) -> bool {
        if action == Action::ToggleKeyboardNav {
            if self.keyboard_accessibility {
                self.disable_keyboard_accessibility();
            } else {
                self.enable_keyboard_accessibility();
            }
            return true;
        }
        if !self.keyboard_accessibility {
            return false;
        }
        if self.config.read_only && !action.is_navigation() {
            return false;
        }

        let handled = match self.focus {
            FocusState::Workspace => self.workspace_on_action(action),
            FocusState::Flyout => self.flyout_on_action(action),
            FocusState::Toolbox => self.toolbox_on_action(action),
        };
        tracing::trace!(%action, focus = %self.focus, handled, "action dispatched");
        handled
    }

    fn workspace_on_action(&mut self, action: Action) -> bool {
        let from = self.cursor.location();
        match action {
            Action::Previous => {
                self.cursor.prev(&self.workspace, &self.config);
            }
            Action::Next => {
                self.cursor.next(&self.workspace, &self.config);
            }
            Action::In => {
                self.cursor.step_in(&self.workspace, &self.config);
            }
            Action::Out => {
                self.cursor.step_out(&self.workspace, &self.config);
            }
            Action::Insert => {
                self.modify();
                return true;
            }
            Action::Mark => {
                self.handle_enter_for_workspace();
                return true;
            }
            Action::Disconnect => {
                self.disconnect_blocks();
                return true;
            }
            Action::Toolbox => {
                return if self.toolbox.is_some() {
                    self.focus_toolbox()
                } else {
                    self.focus_flyout()
                };
            }
            Action::Exit | Action::ToggleKeyboardNav => return false,
        }
        self.record_cursor_move(from);
        true
    }

    /// Enter on the workspace: edit a field, mark a connection or point,
    /// refuse blocks and stacks.
    fn handle_enter_for_workspace(&mut self) {
        let Some(location) = self.cursor.location() else {
            self.logger.report(&NavigationError::NoCursor);
            return;
        };
        match location {
            Location::Field(field) => {
                self.field_handler.show_editor(&mut self.workspace, field);
            }
            Location::Connection { .. } | Location::Workspace { .. } => self.mark_at_cursor(),
            Location::Block(_) | Location::Stack(_) => {
                self.logger
                    .report(&NavigationError::CannotMark(location.kind()));
            }
        }
    }

    fn flyout_on_action(&mut self, action: Action) -> bool {
        match action {
            Action::Previous | Action::Next => {
                let Some(flyout) = self.flyout.as_ref() else {
                    return false;
                };
                let moved = if action == Action::Next {
                    self.flyout_cursor.next(flyout)
                } else {
                    self.flyout_cursor.prev(flyout)
                };
                if moved {
                    self.events.push(NavigationEvent::FlyoutSelectionChanged {
                        block: self.flyout_cursor.block(),
                    });
                }
                true
            }
            Action::Insert => {
                self.insert_from_flyout();
                true
            }
            Action::Out => self.focus_toolbox(),
            Action::Exit => {
                self.focus_workspace();
                true
            }
            Action::In
            | Action::Mark
            | Action::Disconnect
            | Action::Toolbox
            | Action::ToggleKeyboardNav => false,
        }
    }

    fn toolbox_on_action(&mut self, action: Action) -> bool {
        let Some(toolbox) = self.toolbox.as_mut() else {
            return false;
        };
        match action {
            Action::Previous | Action::Next => {
                let moved = if action == Action::Next {
                    toolbox.select_next()
                } else {
                    toolbox.select_previous()
                };
                if moved {
                    self.refresh_flyout_from_toolbox();
                }
                true
            }
            Action::Out => {
                if toolbox.select_parent() {
                    self.refresh_flyout_from_toolbox();
                    true
                } else {
                    false
                }
            }
            Action::In => {
                if toolbox.select_child() {
                    self.refresh_flyout_from_toolbox();
                    true
                } else {
                    self.focus_flyout()
                }
            }
            Action::Exit => {
                self.focus_workspace();
                true
            }
            Action::Insert
            | Action::Mark
            | Action::Disconnect
            | Action::Toolbox
            | Action::ToggleKeyboardNav => false,
        }
    }
}
