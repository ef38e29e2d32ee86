//! Canned collaborator used in place of a real reasoning backend.
//!
//! Generation directives always win over questions; with no directive the
//! mock describes the selected entities, and with nothing selected it
//! explains what it can do.

use crate::directive::{Directive, find_directive};
use crate::request::{AssistRequest, AssistResponse, Collaborator, EntitySpec};
use nw_core::{EntityKind, Payload};
use std::sync::atomic::{AtomicU64, Ordering};

pub const FALLBACK_MESSAGE: &str =
    "I can only answer questions about selected assets or generate new ones with @image or @3d.";

#[derive(Debug, Default)]
pub struct MockCollaborator {
    // Feeds placeholder image URLs so consecutive images differ.
    picture_seed: AtomicU64,
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    fn image_spec(&self, request: &AssistRequest) -> EntitySpec {
        let seed = self.picture_seed.fetch_add(1, Ordering::Relaxed) % 1000;
        EntitySpec {
            payload: Payload::AiOutputImage {
                content: format!("Mock {} result", EntityKind::AiOutputImage),
                source_prompt: request.prompt.clone(),
                parent: request.context.first().map(|s| s.id),
                file_url: Some(format!("https://picsum.photos/id/{seed}/300/300")),
            },
        }
    }

    fn model_spec(&self, request: &AssistRequest) -> EntitySpec {
        EntitySpec {
            payload: Payload::AiOutput3d {
                content: format!("Mock {} result", EntityKind::AiOutput3d),
                source_prompt: request.prompt.clone(),
                parent: request.context.first().map(|s| s.id),
            },
        }
    }
}

impl Collaborator for MockCollaborator {
    fn respond(&self, request: &AssistRequest) -> AssistResponse {
        log::debug!(
            "mock collaborator: {:?} with {} context entities",
            request.prompt,
            request.context.len()
        );

        match find_directive(&request.prompt) {
            Some(Directive::Images(n)) => {
                return AssistResponse::NewEntities(
                    (0..n).map(|_| self.image_spec(request)).collect(),
                );
            }
            Some(Directive::Model3d) => {
                return AssistResponse::NewEntities(vec![self.model_spec(request)]);
            }
            None => {}
        }

        if request.context.is_empty() {
            return AssistResponse::Message(FALLBACK_MESSAGE.to_string());
        }

        let lines: Vec<String> = request
            .context
            .iter()
            .map(|s| format!("• Node #{} ({}) {}", s.id, s.kind, s.describe()))
            .collect();
        AssistResponse::Message(format!(
            "Here's an analysis of the selected nodes:\n{}\n\nYou asked: \"{}\"",
            lines.join("\n"),
            request.prompt
        ))
    }
}
