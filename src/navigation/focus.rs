use super::{NavigationEvent, Navigator};
use crate::ast::Location;
use std::fmt;

/// Which part of the editor receives keyboard actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FocusState {
    #[default]
    Workspace,
    Flyout,
    Toolbox,
}

impl FocusState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FocusState::Workspace => "workspace",
            FocusState::Flyout => "flyout",
            FocusState::Toolbox => "toolbox",
        }
    }
}

impl fmt::Display for FocusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Navigator {
    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub(super) fn set_focus(&mut self, to: FocusState) {
        let from = self.focus;
        if from == to {
            return;
        }
        self.focus = to;
        self.events.push(NavigationEvent::FocusChanged { from, to });
        tracing::debug!(%from, %to, "focus changed");
    }

    /// Returns focus to the workspace.
    ///
    /// The flyout selection is cleared; with a toolbox the flyout is hidden
    /// and the category selection dropped (it is restored on the next visit).
    /// A missing or stale cursor is placed on the first stack, or on an
    /// empty workspace at the default position.
    pub fn focus_workspace(&mut self) {
        let toolbox_present = self.toolbox.is_some();
        self.reset_flyout(toolbox_present);
        if let Some(toolbox) = self.toolbox.as_mut() {
            if toolbox.selected_path().is_some() {
                toolbox.clear_selection();
                self.events
                    .push(NavigationEvent::ToolboxSelectionChanged { path: None });
            }
        }
        self.set_focus(FocusState::Workspace);

        let needs_cursor = self
            .cursor
            .location()
            .is_none_or(|l| !l.is_valid(&self.workspace));
        if needs_cursor {
            let location = match self.workspace.top_blocks(true).first() {
                Some(top) => Location::top_of(&self.workspace, *top),
                None => Some(Location::on_workspace(
                    &self.workspace,
                    self.config.default_cursor_position,
                )),
            };
            self.set_cursor_location(location);
        }
    }

    /// Moves focus into the toolbox, selecting the last visited (or first)
    /// category and showing its blocks. Returns `false` without a toolbox.
    pub fn focus_toolbox(&mut self) -> bool {
        if self.toolbox.is_none() {
            return false;
        }
        self.set_focus(FocusState::Toolbox);
        self.reset_flyout(false);
        if self.marker.location().is_none() {
            self.mark_at_cursor();
        }
        if let Some(toolbox) = self.toolbox.as_mut() {
            toolbox.select_first_or_restore();
        }
        self.refresh_flyout_from_toolbox();
        true
    }

    /// Moves focus into the flyout and highlights its first template.
    /// Returns `false` without a flyout.
    pub fn focus_flyout(&mut self) -> bool {
        if self.flyout.is_none() {
            return false;
        }
        self.set_focus(FocusState::Flyout);
        if self.marker.location().is_none() {
            self.mark_at_cursor();
        }
        let first = self.flyout.as_ref().and_then(|f| f.first_template());
        self.flyout_cursor.set_block(first);
        self.events
            .push(NavigationEvent::FlyoutSelectionChanged { block: first });
        true
    }

    /// Clears the flyout selection and, when `hide` is set, hides the
    /// flyout.
    pub(super) fn reset_flyout(&mut self, hide: bool) {
        if self.flyout_cursor.block().is_some() {
            self.flyout_cursor.clear();
            self.events
                .push(NavigationEvent::FlyoutSelectionChanged { block: None });
        }
        if hide {
            if let Some(flyout) = self.flyout.as_mut() {
                flyout.hide();
            }
        }
    }

    /// Shows the blocks of the selected category in the flyout.
    pub(super) fn refresh_flyout_from_toolbox(&mut self) {
        let (Some(toolbox), Some(flyout)) = (self.toolbox.as_ref(), self.flyout.as_mut()) else {
            return;
        };
        self.events.push(NavigationEvent::ToolboxSelectionChanged {
            path: toolbox.selected_path().map(<[usize]>::to_vec),
        });
        let blocks = toolbox.selected_blocks().to_vec();
        if let Err(error) = flyout.show(&blocks) {
            self.logger.error(&error.to_string());
        }
    }
}
