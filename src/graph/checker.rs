use super::{Connection, ConnectionId, Workspace};
use crate::error::ConnectionError;

/// Decides whether two connection points may be joined.
///
/// The workspace consults its checker before every join, so a custom checker
/// can tighten (or relax) the rules for a whole editor.
pub trait ConnectionChecker: Send + Sync {
    /// Returns `Ok(())` when `a` and `b` can be joined, or the first reason
    /// they cannot.
    fn can_connect(
        &self,
        workspace: &Workspace,
        a: ConnectionId,
        b: ConnectionId,
    ) -> Result<(), ConnectionError>;

    /// Compares the type checks of two connections. A connection without a
    /// check accepts anything.
    fn check_types(&self, a: &Connection, b: &Connection) -> bool {
        match (a.check(), b.check()) {
            (Some(left), Some(right)) => left.iter().any(|t| right.contains(t)),
            _ => true,
        }
    }
}

/// The standard rules: opposite wire types, distinct blocks, overlapping
/// type checks, and no non-shadow child under a shadow parent.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConnectionChecker;

impl ConnectionChecker for DefaultConnectionChecker {
    fn can_connect(
        &self,
        workspace: &Workspace,
        a: ConnectionId,
        b: ConnectionId,
    ) -> Result<(), ConnectionError> {
        let this = workspace
            .connection(a)
            .ok_or(ConnectionError::TargetMissing(a))?;
        let other = workspace
            .connection(b)
            .ok_or(ConnectionError::TargetMissing(b))?;

        let (superior, inferior) = if this.is_superior() {
            (this, other)
        } else {
            (other, this)
        };

        if superior.source_block() == inferior.source_block() {
            return Err(ConnectionError::SelfConnection);
        }
        if other.kind() != this.kind().opposite() {
            return Err(ConnectionError::WrongType {
                from: this.kind(),
                to: other.kind(),
            });
        }
        if !self.check_types(this, other) {
            return Err(ConnectionError::ChecksFailed {
                superior: superior.check().map(<[String]>::to_vec).unwrap_or_default(),
                inferior: inferior.check().map(<[String]>::to_vec).unwrap_or_default(),
            });
        }
        if workspace.is_shadow(superior.source_block())
            && !workspace.is_shadow(inferior.source_block())
        {
            return Err(ConnectionError::ShadowParent);
        }
        Ok(())
    }
}
