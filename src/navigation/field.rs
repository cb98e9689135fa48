use super::Action;
use crate::graph::{FieldId, Workspace};

/// Editor hooks for fields, supplied by the presentation layer.
pub trait FieldHandler {
    /// Offered every action while the cursor is on `field`, before the
    /// dispatch tables. Returns `true` when the action was consumed.
    fn on_action(&mut self, _workspace: &mut Workspace, _field: FieldId, _action: Action) -> bool {
        false
    }

    /// Opens the editor for `field`.
    fn show_editor(&mut self, workspace: &mut Workspace, field: FieldId);
}

/// Consumes nothing and has no editor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFieldHandler;

impl FieldHandler for NoopFieldHandler {
    fn show_editor(&mut self, _workspace: &mut Workspace, field: FieldId) {
        tracing::debug!(%field, "no field editor installed");
    }
}
