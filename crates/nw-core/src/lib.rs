pub mod config;
pub mod connections;
pub mod document;
pub mod error;
pub mod id;
pub mod layout;
pub mod model;
pub mod selection;
pub mod store;
pub mod viewport;

pub use config::EditorConfig;
pub use connections::{ConnectionGraph, curve_between};
pub use document::Document;
pub use error::{ConnectionRejection, EditError, Result};
pub use id::{EntityId, IdAllocator};
pub use layout::{layout_next_row, row_slot, visible_center};
pub use model::*;
pub use selection::Selection;
pub use store::EntityStore;
pub use viewport::{CanvasSize, Viewport, WheelCoalescer, WheelEvent, ZoomDirection};

// Re-export kurbo geometry so downstream crates share one set of types
pub use kurbo::{CubicBez, Point, Rect, Size, Vec2};
