//! The collaborator contract.
//!
//! A request is built synchronously from the prompt and the current
//! selection; the response arrives later and is applied by the session,
//! matched back to its chat placeholder by token.

use crate::summary::EntitySummary;
use nw_core::{EntityKind, Payload};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistRequest {
    pub prompt: String,
    pub context: Vec<EntitySummary>,
}

/// A new entity the collaborator wants on the canvas.
///
/// Carries no position: the session lays specs out in a fresh row when the
/// response is applied, so concurrent responses never land on the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub payload: Payload,
}

impl EntitySpec {
    pub fn kind(&self) -> EntityKind {
        self.payload.kind()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum AssistResponse {
    NewEntities(Vec<EntitySpec>),
    Message(String),
}

/// Anything that can answer a prompt about the canvas.
pub trait Collaborator {
    fn respond(&self, request: &AssistRequest) -> AssistResponse;
}
