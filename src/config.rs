use crate::error::DefinitionError;
use crate::graph::{Coordinate, DEFAULT_SNAP_RADIUS};
use serde::{Deserialize, Serialize};

/// Tunables of a navigation session.
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides:
///
/// ```rust
/// use kumiki::config::NavigationConfig;
///
/// let config = NavigationConfig::from_json(r#"{ "read_only": true }"#).unwrap();
/// assert!(config.read_only);
/// assert_eq!(config.snap_radius, 28.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// How far a displaced tree is bumped away from the connection it left.
    pub snap_radius: f64,
    /// Vertical offset of the workspace point reached by stepping out of a
    /// stack.
    pub stack_out_offset_y: f64,
    /// Where the cursor lands when focusing an empty workspace.
    pub default_cursor_position: Coordinate,
    /// Vertical space between templates in the flyout.
    pub flyout_gap: f64,
    /// Also stop on non-editable fields (labels) while navigating.
    pub navigate_all_fields: bool,
    /// Only navigation actions are honoured.
    pub read_only: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            snap_radius: DEFAULT_SNAP_RADIUS,
            stack_out_offset_y: -20.0,
            default_cursor_position: Coordinate::new(100.0, 100.0),
            flyout_gap: 24.0,
            navigate_all_fields: false,
            read_only: false,
        }
    }
}

impl NavigationConfig {
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::JsonParseError(e.to_string()))
    }
}
