//! Edits produced by the gesture machine.
//!
//! The machine only reads state; every change it wants is returned as an
//! `EditMutation` and applied by `Session::apply_mutation`.

use crate::tools::ToolKind;
use nw_core::{EntityId, Point, Size, Vec2};
use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq)]
pub enum EditMutation {
    ClearSelection,
    ToggleSelection(EntityId),
    /// Set the viewport offset (screen pixels).
    Pan { offset: Vec2 },
    /// Translate entities by a world-space delta.
    MoveEntities {
        ids: SmallVec<[EntityId; 8]>,
        delta: Vec2,
    },
    MoveShape { id: EntityId, delta: Vec2 },
    ResizeShape { id: EntityId, size: Size },
    MoveText { id: EntityId, position: Point },
    /// Commit a rectangle spanned by two world corners.
    AddShape { a: Point, b: Point },
    AddText { position: Point },
    Connect { from: EntityId, to: EntityId },
    SetTool(ToolKind),
}
