//! Tool selection.
//!
//! The active tool decides which branch the gesture machine takes on
//! pointer-down, ahead of whatever sits under the pointer.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// Select, drag, pan and wire.
    #[default]
    Pointer,
    /// Draw a free rectangle, then revert to `Pointer`.
    Rectangle,
    /// Drop a text block, then revert to `Pointer`.
    Text,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pointer => "pointer",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Text => "text",
        }
    }

    /// Parse a host tool name. `"mouse"` and `"select"` are accepted for the pointer.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pointer" | "mouse" | "select" => Some(ToolKind::Pointer),
            "rectangle" | "rect" => Some(ToolKind::Rectangle),
            "text" => Some(ToolKind::Text),
            _ => None,
        }
    }

    /// Tools that fire once and hand control back to the pointer.
    pub fn is_one_shot(self) -> bool {
        !matches!(self, ToolKind::Pointer)
    }
}
