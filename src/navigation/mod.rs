//! The keyboard navigation session.
//!
//! A [`Navigator`] owns everything one editor needs to be driven from the
//! keyboard: the workspace, the optional toolbox and flyout, the cursor and
//! marker, the focus state, the key map and the logger. Several navigators
//! can coexist; nothing here is global.

mod action;
mod cursor;
mod dispatch;
mod event;
mod field;
mod focus;
mod keymap;
mod resolution;

pub use action::Action;
pub use cursor::{Cursor, FlyoutCursor, Marker};
pub use event::NavigationEvent;
pub use field::{FieldHandler, NoopFieldHandler};
pub use focus::FocusState;
pub use keymap::{KeyEvent, KeyMap};

use crate::ast::Location;
use crate::config::NavigationConfig;
use crate::graph::{BlockId, Workspace};
use crate::log::{Logger, LoggingCallback};
use crate::toolbox::{Flyout, Toolbox};

pub struct Navigator {
    workspace: Workspace,
    toolbox: Option<Toolbox>,
    flyout: Option<Flyout>,
    cursor: Cursor,
    marker: Marker,
    flyout_cursor: FlyoutCursor,
    focus: FocusState,
    keyboard_accessibility: bool,
    key_map: KeyMap,
    field_handler: Box<dyn FieldHandler>,
    logger: Logger,
    config: NavigationConfig,
    events: Vec<NavigationEvent>,
}

pub struct NavigatorBuilder {
    workspace: Workspace,
    toolbox: Option<Toolbox>,
    flyout: Option<Flyout>,
    config: NavigationConfig,
    logger: Logger,
    key_map: KeyMap,
    field_handler: Box<dyn FieldHandler>,
}

impl NavigatorBuilder {
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            toolbox: None,
            flyout: None,
            config: NavigationConfig::default(),
            logger: Logger::new(),
            key_map: KeyMap::standard(),
            field_handler: Box::new(NoopFieldHandler),
        }
    }

    /// Adds a category toolbox. A flyout for its blocks is created at build
    /// time unless one is supplied.
    pub fn with_toolbox(mut self, toolbox: Toolbox) -> Self {
        self.toolbox = Some(toolbox);
        self
    }

    pub fn with_flyout(mut self, flyout: Flyout) -> Self {
        self.flyout = Some(flyout);
        self
    }

    pub fn with_config(mut self, config: NavigationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_logging_callback(mut self, callback: LoggingCallback) -> Self {
        self.logger.set_callback(Some(callback));
        self
    }

    pub fn with_key_map(mut self, key_map: KeyMap) -> Self {
        self.key_map = key_map;
        self
    }

    pub fn with_field_handler(mut self, handler: Box<dyn FieldHandler>) -> Self {
        self.field_handler = handler;
        self
    }

    pub fn build(self) -> Navigator {
        let mut workspace = self.workspace;
        workspace.set_snap_radius(self.config.snap_radius);
        let flyout = match (self.flyout, &self.toolbox) {
            (Some(flyout), _) => Some(flyout),
            (None, Some(_)) => Some(Flyout::for_workspace(&workspace, self.config.flyout_gap)),
            (None, None) => None,
        };
        Navigator {
            workspace,
            toolbox: self.toolbox,
            flyout,
            cursor: Cursor::new(),
            marker: Marker::new(),
            flyout_cursor: FlyoutCursor::default(),
            focus: FocusState::Workspace,
            keyboard_accessibility: false,
            key_map: self.key_map,
            field_handler: self.field_handler,
            logger: self.logger,
            config: self.config,
            events: Vec::new(),
        }
    }
}

impl Navigator {
    pub fn builder(workspace: Workspace) -> NavigatorBuilder {
        NavigatorBuilder::new(workspace)
    }

    // --- Collaborators ---

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Direct access to the graph. Deleting or reshaping blocks through
    /// this bypasses cursor relocation; use [`Navigator::delete_block`] and
    /// [`Navigator::mutate_block`] instead.
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn toolbox(&self) -> Option<&Toolbox> {
        self.toolbox.as_ref()
    }

    pub fn flyout(&self) -> Option<&Flyout> {
        self.flyout.as_ref()
    }

    pub fn flyout_mut(&mut self) -> Option<&mut Flyout> {
        self.flyout.as_mut()
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn set_logging_callback(&mut self, callback: Option<LoggingCallback>) {
        self.logger.set_callback(callback);
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    pub fn set_key_map(&mut self, key_map: KeyMap) {
        self.key_map = key_map;
    }

    pub fn set_field_handler(&mut self, handler: Box<dyn FieldHandler>) {
        self.field_handler = handler;
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.config.read_only = read_only;
    }

    // --- Cursor and marker ---

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    /// Replaces the cursor.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        let from = self.cursor.location();
        self.cursor = cursor;
        self.record_cursor_move(from);
    }

    /// Replaces the marker.
    pub fn set_marker(&mut self, marker: Marker) {
        self.marker = marker;
        self.events.push(NavigationEvent::MarkerMoved {
            to: self.marker.location(),
        });
    }

    pub fn set_cursor_location(&mut self, location: Option<Location>) {
        let from = self.cursor.location();
        self.cursor.set_location(location);
        self.record_cursor_move(from);
    }

    pub fn set_marker_location(&mut self, location: Option<Location>) {
        self.marker.set_location(location);
        self.events.push(NavigationEvent::MarkerMoved { to: location });
    }

    /// Drops the marker on the cursor's location.
    pub fn mark_at_cursor(&mut self) {
        self.set_marker_location(self.cursor.location());
    }

    pub fn remove_mark(&mut self) {
        self.set_marker_location(None);
    }

    pub fn flyout_selection(&self) -> Option<BlockId> {
        self.flyout_cursor.block()
    }

    /// Highlights a flyout template. Only meaningful while the flyout has
    /// focus; returns `false` for blocks that are not templates.
    pub fn select_flyout_block(&mut self, block: Option<BlockId>) -> bool {
        if let Some(b) = block {
            let is_template = self
                .flyout
                .as_ref()
                .is_some_and(|f| f.templates().contains(&b));
            if !is_template {
                return false;
            }
        }
        self.flyout_cursor.set_block(block);
        self.events.push(NavigationEvent::FlyoutSelectionChanged { block });
        true
    }

    // --- Accessibility mode ---

    pub fn keyboard_accessibility(&self) -> bool {
        self.keyboard_accessibility
    }

    pub fn enable_keyboard_accessibility(&mut self) {
        if self.keyboard_accessibility {
            return;
        }
        self.keyboard_accessibility = true;
        self.events
            .push(NavigationEvent::KeyboardAccessibilityChanged { enabled: true });
        tracing::debug!("keyboard accessibility enabled");
        self.focus_workspace();
    }

    pub fn disable_keyboard_accessibility(&mut self) {
        if !self.keyboard_accessibility {
            return;
        }
        self.keyboard_accessibility = false;
        self.cursor.hide();
        self.marker.hide();
        let toolbox_present = self.toolbox.is_some();
        self.reset_flyout(toolbox_present);
        self.set_focus(FocusState::Workspace);
        self.events
            .push(NavigationEvent::KeyboardAccessibilityChanged { enabled: false });
        tracing::debug!("keyboard accessibility disabled");
    }

    /// Returns and clears the session changes recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.events)
    }

    fn record_cursor_move(&mut self, from: Option<Location>) {
        let to = self.cursor.location();
        if from != to {
            self.events.push(NavigationEvent::CursorMoved { from, to });
        }
    }
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("workspace", &self.workspace.id())
            .field("focus", &self.focus)
            .field("cursor", &self.cursor)
            .field("marker", &self.marker)
            .field("flyout_cursor", &self.flyout_cursor)
            .field("keyboard_accessibility", &self.keyboard_accessibility)
            .finish_non_exhaustive()
    }
}
