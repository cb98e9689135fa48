use crate::error::NavigationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of keyboard actions the dispatch tables understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Previous,
    Next,
    In,
    Out,
    /// Attach the cursor's element at the marked location.
    Insert,
    /// Drop the marker at the cursor (or edit the field under it).
    Mark,
    Disconnect,
    /// Open the toolbox, or the flyout in toolbox-less editors.
    Toolbox,
    Exit,
    ToggleKeyboardNav,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::Previous,
        Action::Next,
        Action::In,
        Action::Out,
        Action::Insert,
        Action::Mark,
        Action::Disconnect,
        Action::Toolbox,
        Action::Exit,
        Action::ToggleKeyboardNav,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::Previous => "previous",
            Action::Next => "next",
            Action::In => "in",
            Action::Out => "out",
            Action::Insert => "insert",
            Action::Mark => "mark",
            Action::Disconnect => "disconnect",
            Action::Toolbox => "toolbox",
            Action::Exit => "exit",
            Action::ToggleKeyboardNav => "toggle_keyboard_nav",
        }
    }

    /// Pure cursor movement; the only actions honoured on read-only
    /// workspaces.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Action::Previous | Action::Next | Action::In | Action::Out)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| NavigationError::UnknownAction(s.to_string()))
    }
}
