use super::Action;
use crate::error::DefinitionError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw key press as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    /// Physical key code, e.g. `KeyW` or `Enter`.
    pub code: String,
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl KeyEvent {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            ..Default::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Modifier names followed by the key code, joined by `+`, for example
    /// `Shift+Control+KeyK`.
    pub fn serialize(&self) -> String {
        let modifiers = [
            (self.shift, "Shift"),
            (self.ctrl, "Control"),
            (self.alt, "Alt"),
            (self.meta, "Meta"),
        ];
        modifiers
            .iter()
            .filter(|(pressed, _)| *pressed)
            .map(|(_, name)| *name)
            .chain(std::iter::once(self.code.as_str()))
            .collect::<Vec<_>>()
            .join("+")
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Maps serialised keys to actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap {
    bindings: AHashMap<String, Action>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// WASD movement, I insert, Enter mark, X disconnect, T toolbox, E or
    /// Escape exit and Shift+Control+K to toggle keyboard navigation.
    pub fn standard() -> Self {
        let mut map = Self::new();
        let bindings = [
            (KeyEvent::new("KeyW"), Action::Previous),
            (KeyEvent::new("KeyS"), Action::Next),
            (KeyEvent::new("KeyA"), Action::Out),
            (KeyEvent::new("KeyD"), Action::In),
            (KeyEvent::new("KeyI"), Action::Insert),
            (KeyEvent::new("Enter"), Action::Mark),
            (KeyEvent::new("KeyX"), Action::Disconnect),
            (KeyEvent::new("KeyT"), Action::Toolbox),
            (KeyEvent::new("KeyE"), Action::Exit),
            (KeyEvent::new("Escape"), Action::Exit),
            (KeyEvent::new("KeyK").with_shift().with_ctrl(), Action::ToggleKeyboardNav),
        ];
        for (key, action) in bindings {
            map.bind(&key, action);
        }
        map
    }

    /// Loads a map of serialised keys to action names, e.g.
    /// `{ "KeyJ": "next" }`.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }

    pub fn bind(&mut self, key: &KeyEvent, action: Action) {
        self.bindings.insert(key.serialize(), action);
    }

    pub fn unbind(&mut self, key: &KeyEvent) -> Option<Action> {
        self.bindings.remove(&key.serialize())
    }

    pub fn action_for(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings.get(&key.serialize()).copied()
    }

    /// Serialised keys bound to `action`, sorted.
    pub fn keys_for(&self, action: Action) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}
