//! Editing session: the single owner of all canvas state.
//!
//! Every host interaction goes through `&mut Session`, so a render that
//! reads the session between two calls always sees a consistent document.
//! Pointer events run through the gesture machine and come back as
//! `EditMutation`s; wheel events are buffered and applied once per frame by
//! `flush_frame`; prompts are split into `submit_prompt` and
//! `complete_request` so any number may be in flight.

use crate::chat::{ChatLog, RequestToken};
use crate::gesture::GestureMachine;
use crate::input::InputEvent;
use crate::mutation::EditMutation;
use crate::snapshot::{EntityView, SceneSnapshot, WireView};
use crate::tools::ToolKind;
use nw_assist::{AssistRequest, AssistResponse, Collaborator, EntitySummary, FALLBACK_MESSAGE};
use nw_core::{
    CanvasSize, Color, Document, EditError, EditorConfig, EntityId, EntityKind, EntityPatch, Lane,
    Payload, Point, Result, Vec2, Viewport, WheelCoalescer, WheelEvent, ZoomDirection,
    layout_next_row, row_slot, visible_center,
};
use nw_render::{SvgExport, connection_curve, export_svg, path_data};

/// Source prompt recorded on outputs created from the toolbar.
pub const BUTTON_PROMPT: &str = "Generated via button";

/// Which AI output a toolbar "generate" creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Image,
    Model3d,
}

impl OutputKind {
    pub fn entity_kind(self) -> EntityKind {
        match self {
            OutputKind::Image => EntityKind::AiOutputImage,
            OutputKind::Model3d => EntityKind::AiOutput3d,
        }
    }

    fn notice(self) -> &'static str {
        match self {
            OutputKind::Image => "Generating image result...",
            OutputKind::Model3d => "Generating 3D result...",
        }
    }
}

/// A prompt that has been logged and is waiting for its response.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub request: AssistRequest,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    doc: Document,
    viewport: Viewport,
    canvas: CanvasSize,
    tool: ToolKind,
    gesture: GestureMachine,
    wheel: WheelCoalescer,
    chat: ChatLog,
}

impl Session {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            doc: Document::new(config),
            ..Default::default()
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &EditorConfig {
        self.doc.config()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas = CanvasSize { width, height };
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn gesture(&self) -> &GestureMachine {
        &self.gesture
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Switch tools. Refused while a gesture is in progress.
    pub fn set_tool(&mut self, tool: ToolKind) -> Result<()> {
        if self.gesture.is_active() {
            return Err(EditError::GestureActive);
        }
        self.tool = tool;
        Ok(())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one input event. Returns `true` if the frame needs a redraw.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::Wheel { x, y, delta_y } = *event {
            self.queue_wheel(Point::new(x, y), delta_y);
            return false;
        }
        let was_active = self.gesture.is_active();
        let mutations = self
            .gesture
            .handle(event, &self.doc, &self.viewport, self.tool);
        let applied = !mutations.is_empty();
        for mutation in mutations {
            if let Err(e) = self.apply_mutation(mutation) {
                log::debug!("mutation rejected: {e}");
            }
        }
        applied || was_active || self.gesture.is_active()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(&InputEvent::from_pointer_down(x, y))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(&InputEvent::from_pointer_move(x, y))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.handle_input(&InputEvent::from_pointer_up(x, y))
    }

    /// Abandon the active gesture.
    pub fn cancel_gesture(&mut self) {
        self.gesture.cancel();
    }

    /// Buffer a wheel notch; only the latest one per frame is applied.
    pub fn queue_wheel(&mut self, screen: Point, delta_y: f64) {
        self.wheel.push(WheelEvent { screen, delta_y });
    }

    /// Apply the buffered wheel zoom, if any. Returns `true` if the viewport changed.
    pub fn flush_frame(&mut self) -> bool {
        let Some(event) = self.wheel.take() else {
            return false;
        };
        let next = self.viewport.zoom_at(
            event.screen,
            ZoomDirection::from_wheel_delta(event.delta_y),
            self.doc.config(),
        );
        let changed = next != self.viewport;
        self.viewport = next;
        changed
    }

    /// Apply one mutation.
    pub fn apply_mutation(&mut self, mutation: EditMutation) -> Result<()> {
        match mutation {
            EditMutation::ClearSelection => {
                self.doc.clear_selection();
                Ok(())
            }
            EditMutation::ToggleSelection(id) => self.doc.toggle_selection(id).map(|_| ()),
            EditMutation::Pan { offset } => {
                self.viewport.pan_to(offset);
                Ok(())
            }
            EditMutation::MoveEntities { ids, delta } => {
                self.doc.move_entities(&ids, delta);
                Ok(())
            }
            EditMutation::MoveShape { id, delta } => self.doc.move_shape(id, delta),
            EditMutation::ResizeShape { id, size } => self.doc.resize_shape(id, size),
            EditMutation::MoveText { id, position } => self.doc.move_text(id, position),
            EditMutation::AddShape { a, b } => self.doc.add_shape(a, b).map(|_| ()),
            EditMutation::AddText { position } => {
                let placeholder = self.doc.config().text_placeholder.clone();
                self.doc.add_text(position, placeholder);
                Ok(())
            }
            EditMutation::Connect { from, to } => {
                self.doc.connect(from, to).map_err(EditError::from)
            }
            EditMutation::SetTool(tool) => {
                self.tool = tool;
                Ok(())
            }
        }
    }

    // ─── Toolbar commands ────────────────────────────────────────────────

    /// Top-left corner that centers a node under the visible canvas center.
    fn centered_node_origin(&self) -> Point {
        let center = visible_center(self.canvas, &self.viewport, self.doc.config());
        let size = self.doc.config().node_size;
        center - Vec2::new(size.width / 2.0, size.height / 2.0)
    }

    /// Add a node with default payload at the visible canvas center.
    pub fn add_node(&mut self, kind: EntityKind) -> EntityId {
        let origin = self.centered_node_origin();
        self.add_node_at(kind, origin)
    }

    /// Add a node with default payload, top-left corner at `world`.
    pub fn add_node_at(&mut self, kind: EntityKind, world: Point) -> EntityId {
        self.doc
            .create_entity(Payload::default_for(kind), world, Lane::Nodes)
    }

    /// Create a mix node fed by every selected text, image or AI image.
    pub fn create_mix_from_selection(&mut self) -> Result<EntityId> {
        let sources: Vec<EntityId> = self
            .doc
            .selected_entities()
            .filter(|e| {
                matches!(
                    e.kind(),
                    EntityKind::Text | EntityKind::Image | EntityKind::AiOutputImage
                )
            })
            .map(|e| e.id)
            .collect();
        if sources.len() < 2 {
            return Err(EditError::InsufficientSelection {
                needed: 2,
                found: sources.len(),
            });
        }
        let mix = self.add_node(EntityKind::Mix);
        for source in sources {
            if let Err(r) = self.doc.connect(source, mix) {
                log::warn!("mix input {source} refused: {r}");
            }
        }
        Ok(mix)
    }

    /// Create an AI output wired from every selected entity that has an output.
    pub fn generate_from_selection(&mut self, output: OutputKind) -> Result<EntityId> {
        let selected: Vec<EntityId> = self.doc.selection().iter().collect();
        let Some(&parent) = selected.first() else {
            return Err(EditError::InsufficientSelection {
                needed: 1,
                found: 0,
            });
        };
        self.chat.push_assistant(output.notice());

        let kind = output.entity_kind();
        let content = format!("Mock {kind} result");
        let payload = match output {
            OutputKind::Image => Payload::AiOutputImage {
                content,
                source_prompt: BUTTON_PROMPT.to_string(),
                parent: Some(parent),
                file_url: None,
            },
            OutputKind::Model3d => Payload::AiOutput3d {
                content,
                source_prompt: BUTTON_PROMPT.to_string(),
                parent: Some(parent),
            },
        };
        let origin = self.centered_node_origin();
        let id = self.doc.create_entity(payload, origin, Lane::Nodes);

        for source in selected {
            let has_output = self
                .doc
                .entity(source)
                .is_some_and(|e| e.kind().has_output());
            if has_output && let Err(r) = self.doc.connect(source, id) {
                log::debug!("generate: {source} -> {id} skipped: {r}");
            }
        }
        Ok(id)
    }

    pub fn compile_workflow(&mut self) {
        self.chat.push_assistant("Compiling workflow...");
    }

    // ─── Entity edits ────────────────────────────────────────────────────

    fn edit_payload(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        edit: impl FnOnce(&mut Payload),
    ) -> Result<()> {
        let entity = self.doc.entity(id).ok_or(EditError::NotFound(id))?;
        if entity.kind() != kind {
            return Err(EditError::KindMismatch {
                id,
                expected: entity.kind(),
                found: kind,
            });
        }
        let mut payload = entity.payload().clone();
        edit(&mut payload);
        self.doc.update_entity(
            id,
            EntityPatch {
                payload: Some(payload),
                ..Default::default()
            },
        )
    }

    pub fn set_text_content(&mut self, id: EntityId, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        self.edit_payload(id, EntityKind::Text, |p| {
            if let Payload::Text { content } = p {
                *content = text;
            }
        })
    }

    pub fn set_image_file(&mut self, id: EntityId, reference: Option<String>) -> Result<()> {
        self.edit_payload(id, EntityKind::Image, |p| {
            if let Payload::Image { file } = p {
                *file = reference;
            }
        })
    }

    /// Set a color node's color and opacity (percent, clamped to 100).
    pub fn set_color(&mut self, id: EntityId, value: Color, opacity: u8) -> Result<()> {
        self.edit_payload(id, EntityKind::Color, |p| {
            if let Payload::Color { color, opacity: o } = p {
                *color = value;
                *o = opacity.min(100);
            }
        })
    }

    pub fn set_size_values(
        &mut self,
        id: EntityId,
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    ) -> Result<()> {
        self.edit_payload(id, EntityKind::Size, |p| {
            if let Payload::Size { x: px, y: py, z: pz } = p {
                (*px, *py, *pz) = (x, y, z);
            }
        })
    }

    pub fn set_input_weight(&mut self, target: EntityId, source: EntityId, weight: i64) -> Result<()> {
        self.doc.set_input_weight(target, source, weight)
    }

    pub fn set_text_block(&mut self, id: EntityId, text: impl Into<String>) -> Result<()> {
        self.doc.set_text(id, text)
    }

    pub fn toggle_selection(&mut self, id: EntityId) -> Result<bool> {
        self.doc.toggle_selection(id)
    }

    pub fn connect(&mut self, from: EntityId, to: EntityId) -> Result<()> {
        self.doc.connect(from, to).map_err(EditError::from)
    }

    pub fn disconnect(&mut self, from: EntityId, to: EntityId) -> bool {
        self.doc.disconnect(from, to)
    }

    pub fn delete_entity(&mut self, id: EntityId) -> bool {
        self.doc.delete_entity(id)
    }

    pub fn delete_shape(&mut self, id: EntityId) -> bool {
        self.doc.delete_shape(id)
    }

    pub fn delete_text(&mut self, id: EntityId) -> bool {
        self.doc.delete_text(id)
    }

    // ─── Assistant ───────────────────────────────────────────────────────

    /// Log a prompt and open a placeholder for its answer.
    ///
    /// Context is the current selection, in selection order. Returns `None`
    /// for a blank prompt.
    pub fn submit_prompt(&mut self, prompt: &str) -> Option<PendingRequest> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }
        self.chat.push_user(prompt);
        let token = self.chat.push_placeholder();
        let context = self
            .doc
            .selected_entities()
            .map(EntitySummary::of)
            .collect();
        log::debug!("prompt {} submitted", token.raw());
        Some(PendingRequest {
            token,
            request: AssistRequest {
                prompt: prompt.to_string(),
                context,
            },
        })
    }

    /// Apply the response for `token` and resolve its placeholder.
    ///
    /// New entities are laid out in a fresh row below everything currently
    /// on the canvas. An empty entity list is answered like a message
    /// response with no text. Returns the ids created.
    pub fn complete_request(
        &mut self,
        token: RequestToken,
        response: AssistResponse,
    ) -> Result<Vec<EntityId>> {
        if !self.chat.is_pending(token) {
            return Err(EditError::UnknownRequest(token.raw()));
        }
        match response {
            AssistResponse::Message(text) => {
                self.chat.resolve(token, text)?;
                Ok(Vec::new())
            }
            AssistResponse::NewEntities(specs) if specs.is_empty() => {
                log::debug!("prompt {} answered with no assets", token.raw());
                self.chat.resolve(token, FALLBACK_MESSAGE)?;
                Ok(Vec::new())
            }
            AssistResponse::NewEntities(specs) => {
                let config = self.doc.config();
                let size = config.asset_size;
                let gap = config.row_margin;
                let origin = layout_next_row(
                    self.doc.entity_bounds(),
                    size,
                    self.canvas,
                    &self.viewport,
                    config,
                );
                let ids: Vec<EntityId> = specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, spec)| {
                        self.doc.create_entity_sized(
                            spec.payload,
                            row_slot(origin, size, i, gap),
                            size,
                            Lane::Assets,
                        )
                    })
                    .collect();
                self.chat
                    .resolve(token, format!("Created {} new asset(s)!", ids.len()))?;
                Ok(ids)
            }
        }
    }

    /// Submit, answer and complete a prompt in one go.
    pub fn ask(&mut self, prompt: &str, collaborator: &dyn Collaborator) -> Result<Vec<EntityId>> {
        let Some(pending) = self.submit_prompt(prompt) else {
            return Ok(Vec::new());
        };
        let response = collaborator.respond(&pending.request);
        self.complete_request(pending.token, response)
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn export_svg(&self) -> Result<SvgExport> {
        export_svg(&self.doc)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        let selection = self.doc.selection();
        let entities = self
            .doc
            .entities()
            .map(|e| EntityView {
                entity: e.clone(),
                label: e.kind().label(),
                selected: selection.contains(e.id),
            })
            .collect();
        let wires = self
            .doc
            .connections()
            .into_iter()
            .filter_map(|c| {
                connection_curve(&self.doc, c).map(|curve| WireView {
                    from: c.from,
                    to: c.to,
                    path: path_data(&curve),
                })
            })
            .collect();
        let draft_wire = self.gesture.draft_wire().and_then(|(from, loose)| {
            let start = self.doc.entity(from)?.output_anchor();
            Some(path_data(&nw_core::curve_between(start, loose)))
        });

        SceneSnapshot {
            viewport: self.viewport,
            tool: self.tool,
            gesture: self.gesture.state().name(),
            entities,
            wires,
            shapes: self.doc.shapes().to_vec(),
            texts: self.doc.texts().to_vec(),
            draft_rect: self.gesture.draft_rect(),
            draft_wire,
            chat: self.chat.messages().to_vec(),
        }
    }
}
