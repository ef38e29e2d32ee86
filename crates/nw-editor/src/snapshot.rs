//! Serializable view of everything the host needs to draw one frame.

use crate::chat::ChatMessage;
use crate::tools::ToolKind;
use nw_core::{Entity, EntityId, Rect, Shape, TextBlock, Viewport};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityView {
    #[serde(flatten)]
    pub entity: Entity,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WireView {
    pub from: EntityId,
    pub to: EntityId,
    /// SVG path data for the curve.
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub viewport: Viewport,
    pub tool: ToolKind,
    pub gesture: &'static str,
    /// Back to front.
    pub entities: Vec<EntityView>,
    pub wires: Vec<WireView>,
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_rect: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft_wire: Option<String>,
    pub chat: Vec<ChatMessage>,
}
