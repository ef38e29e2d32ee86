//! Pointer gesture state machine.
//!
//! A single register holds the active gesture. Pointer-down decides which
//! gesture starts (the active tool first, then the hit target); move and up
//! are routed to whatever gesture is active. The machine reads the document
//! but never mutates it: it returns `EditMutation`s for the session to apply.
//!
//! | Down on…                  | Tool      | Gesture           |
//! |---------------------------|-----------|-------------------|
//! | anything                  | Rectangle | `DrawingRect`     |
//! | anything                  | Text      | (text placed, stays `Idle`) |
//! | background                | Pointer   | `Panning`         |
//! | entity body / input socket| Pointer   | `DraggingEntity`  |
//! | shape body                | Pointer   | `DraggingEntity`  |
//! | resize handle             | Pointer   | `ResizingShape`   |
//! | text block                | Pointer   | `DraggingText`    |
//! | output socket             | Pointer   | `Wiring`          |

use crate::input::InputEvent;
use crate::mutation::EditMutation;
use crate::tools::ToolKind;
use nw_core::{Document, EntityId, Point, Rect, Size, Vec2, Viewport};
use nw_render::{HitTarget, hit_test};
use smallvec::SmallVec;

/// What a `DraggingEntity` gesture moves.
#[derive(Debug, Clone, PartialEq)]
pub enum DragTarget {
    Entities(SmallVec<[EntityId; 8]>),
    Shape(EntityId),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// `anchor = pointer - offset` at pointer-down (screen space).
    Panning { anchor: Vec2 },
    /// World-space corners of the draft rectangle, unnormalized.
    DrawingRect { anchor: Point, current: Point },
    /// `last` is the previous screen position.
    DraggingEntity { target: DragTarget, last: Point },
    ResizingShape {
        id: EntityId,
        start_size: Size,
        start_pointer: Point,
    },
    /// `grab` is the world offset from the text origin to the pointer.
    DraggingText { id: EntityId, grab: Vec2 },
    /// Provisional wire from `from`'s output socket to `current` (world).
    Wiring { from: EntityId, current: Point },
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Panning { .. } => "panning",
            Gesture::DrawingRect { .. } => "drawing-rectangle",
            Gesture::DraggingEntity { .. } => "dragging-entity",
            Gesture::ResizingShape { .. } => "resizing-shape",
            Gesture::DraggingText { .. } => "dragging-text",
            Gesture::Wiring { .. } => "wiring-connection",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GestureMachine {
    state: Gesture,
}

impl GestureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &Gesture {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, Gesture::Idle)
    }

    /// Abandon the active gesture. Drafts are discarded; edits already
    /// applied by earlier moves stay.
    pub fn cancel(&mut self) {
        if self.is_active() {
            log::debug!("gesture cancelled: {}", self.state.name());
        }
        self.state = Gesture::Idle;
    }

    /// Normalized draft rectangle while drawing.
    pub fn draft_rect(&self) -> Option<Rect> {
        match self.state {
            Gesture::DrawingRect { anchor, current } => Some(Rect::from_points(anchor, current)),
            _ => None,
        }
    }

    /// Source and loose end of the wire being dragged.
    pub fn draft_wire(&self) -> Option<(EntityId, Point)> {
        match self.state {
            Gesture::Wiring { from, current } => Some((from, current)),
            _ => None,
        }
    }

    /// Feed one pointer event. Wheel events are not gestures and yield nothing.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        doc: &Document,
        viewport: &Viewport,
        tool: ToolKind,
    ) -> Vec<EditMutation> {
        let screen = event.position();
        match event {
            InputEvent::PointerDown { .. } => self.pointer_down(screen, doc, viewport, tool),
            InputEvent::PointerMove { .. } => self.pointer_move(screen, viewport),
            InputEvent::PointerUp { .. } => self.pointer_up(screen, doc, viewport),
            InputEvent::Wheel { .. } => Vec::new(),
        }
    }

    fn pointer_down(
        &mut self,
        screen: Point,
        doc: &Document,
        viewport: &Viewport,
        tool: ToolKind,
    ) -> Vec<EditMutation> {
        if self.is_active() {
            log::trace!("pointer-down ignored during {}", self.state.name());
            return Vec::new();
        }
        let world = viewport.screen_to_world(screen);

        match tool {
            ToolKind::Rectangle => {
                self.state = Gesture::DrawingRect {
                    anchor: world,
                    current: world,
                };
                return Vec::new();
            }
            ToolKind::Text => {
                return vec![
                    EditMutation::AddText { position: world },
                    EditMutation::SetTool(ToolKind::Pointer),
                ];
            }
            ToolKind::Pointer => {}
        }

        match hit_test(doc, world) {
            HitTarget::Background => {
                self.state = Gesture::Panning {
                    anchor: screen.to_vec2() - viewport.offset,
                };
                vec![EditMutation::ClearSelection]
            }
            HitTarget::Entity(id) | HitTarget::InputSocket(id) => {
                // Group is fixed by the selection at pointer-down; the toggle
                // below does not change who moves.
                let group = doc.selection().drag_group(id);
                self.state = Gesture::DraggingEntity {
                    target: DragTarget::Entities(group),
                    last: screen,
                };
                vec![EditMutation::ToggleSelection(id)]
            }
            HitTarget::ShapeBody(id) => {
                self.state = Gesture::DraggingEntity {
                    target: DragTarget::Shape(id),
                    last: screen,
                };
                Vec::new()
            }
            HitTarget::ResizeHandle(id) => {
                if let Some(shape) = doc.shape(id) {
                    self.state = Gesture::ResizingShape {
                        id,
                        start_size: shape.rect.size(),
                        start_pointer: screen,
                    };
                }
                Vec::new()
            }
            HitTarget::TextBlock(id) => {
                if let Some(text) = doc.text(id) {
                    self.state = Gesture::DraggingText {
                        id,
                        grab: world - text.position,
                    };
                }
                Vec::new()
            }
            HitTarget::OutputSocket(from) => {
                self.state = Gesture::Wiring {
                    from,
                    current: world,
                };
                Vec::new()
            }
        }
    }

    fn pointer_move(&mut self, screen: Point, viewport: &Viewport) -> Vec<EditMutation> {
        let world = viewport.screen_to_world(screen);
        match &mut self.state {
            Gesture::Idle => Vec::new(),
            Gesture::Panning { anchor } => vec![EditMutation::Pan {
                offset: screen.to_vec2() - *anchor,
            }],
            Gesture::DrawingRect { current, .. } => {
                *current = world;
                Vec::new()
            }
            Gesture::DraggingEntity { target, last } => {
                let delta = viewport.screen_delta_to_world(screen - *last);
                *last = screen;
                log::trace!("drag by ({}, {})", delta.x, delta.y);
                match target {
                    DragTarget::Entities(ids) => vec![EditMutation::MoveEntities {
                        ids: ids.clone(),
                        delta,
                    }],
                    DragTarget::Shape(id) => vec![EditMutation::MoveShape { id: *id, delta }],
                }
            }
            Gesture::ResizingShape {
                id,
                start_size,
                start_pointer,
            } => {
                let delta = viewport.screen_delta_to_world(screen - *start_pointer);
                vec![EditMutation::ResizeShape {
                    id: *id,
                    size: Size::new(
                        start_size.width + delta.x,
                        start_size.height + delta.y,
                    ),
                }]
            }
            Gesture::DraggingText { id, grab } => vec![EditMutation::MoveText {
                id: *id,
                position: world - *grab,
            }],
            Gesture::Wiring { current, .. } => {
                *current = world;
                Vec::new()
            }
        }
    }

    fn pointer_up(&mut self, screen: Point, doc: &Document, viewport: &Viewport) -> Vec<EditMutation> {
        let world = viewport.screen_to_world(screen);
        let finished = std::mem::take(&mut self.state);
        match finished {
            Gesture::DrawingRect { anchor, .. } => vec![
                EditMutation::AddShape { a: anchor, b: world },
                EditMutation::SetTool(ToolKind::Pointer),
            ],
            Gesture::Wiring { from, .. } => match hit_test(doc, world) {
                HitTarget::InputSocket(to) if to != from => {
                    vec![EditMutation::Connect { from, to }]
                }
                _ => {
                    log::debug!("wire from {from} dropped on nothing");
                    Vec::new()
                }
            },
            _ => Vec::new(),
        }
    }
}
