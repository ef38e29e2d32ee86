use crate::id::EntityId;
use crate::model::EntityKind;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditError>;

/// Why a connection request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionRejection {
    SelfLoop,
    Duplicate,
    UnknownEndpoint,
    IncompatibleKinds,
}

impl ConnectionRejection {
    pub fn reason(self) -> &'static str {
        match self {
            ConnectionRejection::SelfLoop => "self-loop",
            ConnectionRejection::Duplicate => "duplicate",
            ConnectionRejection::UnknownEndpoint => "unknown-endpoint",
            ConnectionRejection::IncompatibleKinds => "incompatible-kinds",
        }
    }
}

impl std::fmt::Display for ConnectionRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// Errors raised by document and session operations.
///
/// None of these are meant to reach the render path: the interaction machine
/// turns them into logged no-ops.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("no element with id {0}")]
    NotFound(EntityId),

    #[error("connection rejected: {0}")]
    InvalidConnection(ConnectionRejection),

    #[error("degenerate geometry: {width}x{height}")]
    DegenerateGeometry { width: f64, height: f64 },

    #[error("nothing to export")]
    EmptyExport,

    #[error("entity {id} is a {expected} node, payload is {found}")]
    KindMismatch {
        id: EntityId,
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("a gesture is in progress")]
    GestureActive,

    #[error("no pending request with token {0}")]
    UnknownRequest(u64),

    #[error("select at least {needed} suitable nodes (found {found})")]
    InsufficientSelection { needed: usize, found: usize },
}

impl From<ConnectionRejection> for EditError {
    fn from(r: ConnectionRejection) -> Self {
        EditError::InvalidConnection(r)
    }
}
